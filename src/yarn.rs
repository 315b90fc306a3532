//! Yarn inventory records.

use serde::{Deserialize, Serialize};

use crate::error::{Result, YarnviewError};

/// One stored yarn record. Every field is free text as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Yarn {
    pub id: String,
    /// Number of skeins on hand
    pub num: String,
    pub color: String,
    pub weight: String,
    pub length: String,
}

/// Editable fields of a [`Yarn`], keyed as in the document store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YarnField {
    Num,
    Color,
    Weight,
    Length,
}

impl YarnField {
    pub const ALL: [Self; 4] = [Self::Num, Self::Color, Self::Weight, Self::Length];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Num => "num",
            Self::Color => "color",
            Self::Weight => "weight",
            Self::Length => "length",
        }
    }

    /// Parse a document key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == key)
    }
}

/// Partial yarn: the add form, a card's in-progress edit, or an update payload.
///
/// `None` fields are left untouched when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YarnDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
}

impl YarnDraft {
    /// A draft with every field present and empty, as the add form starts.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            num: Some(String::new()),
            color: Some(String::new()),
            weight: Some(String::new()),
            length: Some(String::new()),
        }
    }

    fn slot(&mut self, field: YarnField) -> &mut Option<String> {
        match field {
            YarnField::Num => &mut self.num,
            YarnField::Color => &mut self.color,
            YarnField::Weight => &mut self.weight,
            YarnField::Length => &mut self.length,
        }
    }

    pub fn set(&mut self, field: YarnField, value: impl Into<String>) {
        *self.slot(field) = Some(value.into());
    }

    #[must_use]
    pub fn get(&self, field: YarnField) -> Option<&str> {
        match field {
            YarnField::Num => self.num.as_deref(),
            YarnField::Color => self.color.as_deref(),
            YarnField::Weight => self.weight.as_deref(),
            YarnField::Length => self.length.as_deref(),
        }
    }

    /// Check the quantity, which the form collects as a number.
    ///
    /// # Errors
    /// Returns [`YarnviewError::Validation`] if `num` is present, non-empty
    /// and not a non-negative number.
    pub fn validate(&self) -> Result<()> {
        let Some(num) = self.num.as_deref().map(str::trim) else {
            return Ok(());
        };
        if num.is_empty() {
            return Ok(());
        }
        match num.parse::<f64>() {
            Ok(n) if n.is_finite() && n >= 0.0 => Ok(()),
            _ => Err(YarnviewError::Validation(format!(
                "quantity must be a number, got {num:?}"
            ))),
        }
    }
}

impl From<&Yarn> for YarnDraft {
    fn from(yarn: &Yarn) -> Self {
        Self {
            num: Some(yarn.num.clone()),
            color: Some(yarn.color.clone()),
            weight: Some(yarn.weight.clone()),
            length: Some(yarn.length.clone()),
        }
    }
}

impl Yarn {
    /// Build a record from a draft, with absent fields empty.
    #[must_use]
    pub fn from_draft(id: impl Into<String>, draft: &YarnDraft) -> Self {
        let mut yarn = Self {
            id: id.into(),
            ..Self::default()
        };
        yarn.apply(draft);
        yarn
    }

    /// Overwrite the fields present in `draft`.
    pub fn apply(&mut self, draft: &YarnDraft) {
        for field in YarnField::ALL {
            if let Some(value) = draft.get(field) {
                *self.field_mut(field) = value.to_string();
            }
        }
    }

    #[must_use]
    pub fn field(&self, field: YarnField) -> &str {
        match field {
            YarnField::Num => &self.num,
            YarnField::Color => &self.color,
            YarnField::Weight => &self.weight,
            YarnField::Length => &self.length,
        }
    }

    fn field_mut(&mut self, field: YarnField) -> &mut String {
        match field {
            YarnField::Num => &mut self.num,
            YarnField::Color => &mut self.color,
            YarnField::Weight => &mut self.weight,
            YarnField::Length => &mut self.length,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn sample() -> Yarn {
        Yarn {
            id: "y1".into(),
            num: "3".into(),
            color: "Forest Green".into(),
            weight: "worsted".into(),
            length: "200m".into(),
        }
    }

    #[test]
    fn test_field_keys() {
        for field in YarnField::ALL {
            assert_eq!(YarnField::from_key(field.as_str()), Some(field));
        }
        assert_eq!(YarnField::from_key("id"), None);
        assert_eq!(serde_json::to_string(&YarnField::Weight).unwrap(), "\"weight\"");
    }

    #[test]
    fn test_apply_partial_draft() {
        let mut yarn = sample();
        let mut draft = YarnDraft::default();
        draft.set(YarnField::Color, "Mauve");
        yarn.apply(&draft);
        assert_eq!(yarn.color, "Mauve");
        assert_eq!(yarn.num, "3");
        assert_eq!(yarn.id, "y1");
    }

    #[test]
    fn test_draft_from_yarn_round_trips_fields() {
        let yarn = sample();
        let draft = YarnDraft::from(&yarn);
        assert_eq!(Yarn::from_draft("y1", &draft), yarn);
    }

    #[test]
    fn test_draft_serializes_only_present_fields() {
        let mut draft = YarnDraft::default();
        draft.set(YarnField::Length, "120yd");
        assert_eq!(serde_json::to_string(&draft).unwrap(), r#"{"length":"120yd"}"#);
    }

    #[test_case("", true ; "empty")]
    #[test_case("4", true ; "integer")]
    #[test_case(" 2.5 ", true ; "decimal")]
    #[test_case("-1", false ; "negative")]
    #[test_case("lots", false ; "text")]
    #[test_case("NaN", false ; "nan")]
    fn test_validate_num(num: &str, ok: bool) {
        let mut draft = YarnDraft::blank();
        draft.set(YarnField::Num, num);
        assert_eq!(draft.validate().is_ok(), ok);
    }
}
