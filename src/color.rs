//! Color label normalization and contrast evaluation
//!
//! Handles yarn color labels as typed by the user, `#rgb`/`#rrggbb` parsing,
//! and the perceived-luminance test that picks light or dark card text.

use serde::Serialize;

/// Label used when a yarn has no color at all
pub const DEFAULT_LABEL: &str = "slate";

/// Rec. 709 luma coefficients for perceived luminance
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Luminance (0-255 scale) below which a background counts as dark
pub const DARK_THRESHOLD: f64 = 128.0;

/// Normalize a raw color label: lower-case, trimmed, `"slate"` when empty.
///
/// ```
/// use yarnview::color::normalize;
/// assert_eq!(normalize(Some("  Forest Green ")), "forest green");
/// assert_eq!(normalize(None), "slate");
/// ```
#[must_use]
pub fn normalize(raw: Option<&str>) -> String {
    let label = raw.unwrap_or_default().trim().to_lowercase();
    if label.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        label
    }
}

/// Parse `#rgb` or `#rrggbb` into channel values.
///
/// Three-digit forms are expanded by doubling each digit (`#abc` -> `#aabbcc`).
/// Anything else, including named colors, returns `None`.
#[must_use]
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let digits = color.trim().strip_prefix('#')?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        3 => {
            let mut channels = digits.chars().filter_map(|c| c.to_digit(16));
            let mut next = || channels.next().and_then(|d| u8::try_from(d * 17).ok());
            Some((next()?, next()?, next()?))
        }
        6 => {
            let channel = |range: std::ops::Range<usize>| {
                digits
                    .get(range)
                    .and_then(|s| u8::from_str_radix(s, 16).ok())
            };
            Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
        }
        _ => None,
    }
}

/// Perceived luminance of an sRGB color on the 0-255 scale
#[must_use]
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    LUMA_B.mul_add(
        f64::from(b),
        LUMA_R.mul_add(f64::from(r), LUMA_G * f64::from(g)),
    )
}

/// Whether text on this background should be light.
///
/// `black` is always dark. Hex colors are dark when their perceived
/// luminance is under [`DARK_THRESHOLD`]. Any other value cannot be
/// evaluated and is assumed light.
#[must_use]
pub fn is_dark_background(color: &str) -> bool {
    let value = color.trim();
    if value.eq_ignore_ascii_case("black") {
        return true;
    }
    parse_hex(value).is_some_and(|(r, g, b)| luminance(r, g, b) < DARK_THRESHOLD)
}

/// Foreground tone for text drawn over a resolved color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    Light,
    Dark,
}

impl TextTone {
    /// Tone that stays legible on the given background
    #[must_use]
    pub fn for_background(color: &str) -> Self {
        if is_dark_background(color) {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// A renderable background color plus its contrast decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColor {
    /// Hex color or the normalized label itself
    pub color: String,
    /// True when the background is dark and text should be light
    pub is_dark: bool,
}

impl ResolvedColor {
    #[must_use]
    pub fn new(color: impl Into<String>) -> Self {
        let color = color.into();
        let is_dark = is_dark_background(&color);
        Self { color, is_dark }
    }

    #[must_use]
    pub fn text_tone(&self) -> TextTone {
        if self.is_dark {
            TextTone::Light
        } else {
            TextTone::Dark
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, "slate" ; "absent")]
    #[test_case(Some(""), "slate" ; "empty")]
    #[test_case(Some("   "), "slate" ; "whitespace only")]
    #[test_case(Some("  Forest Green "), "forest green" ; "trim and lower")]
    #[test_case(Some("#ABC"), "#abc" ; "hex is lowered")]
    #[test_case(Some("Mauve"), "mauve" ; "plain name")]
    fn test_normalize(raw: Option<&str>, expected: &str) {
        assert_eq!(normalize(raw), expected);
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["", "  Forest Green ", "BLACK", "#AaBbCc", " slate", "Dusty  Rose"] {
            let once = normalize(Some(raw));
            assert_eq!(normalize(Some(&once)), once);
        }
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_hex("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_hex("#ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("#336699"), Some((0x33, 0x66, 0x99)));
        assert_eq!(parse_hex("#abc"), Some((0xaa, 0xbb, 0xcc)));
        assert_eq!(parse_hex("#ABC"), parse_hex("#aabbcc"));
    }

    #[test_case("mauve" ; "named color")]
    #[test_case("336699" ; "missing hash")]
    #[test_case("#12345" ; "five digits")]
    #[test_case("#1234" ; "four digits")]
    #[test_case("#12345678" ; "eight digits")]
    #[test_case("#ggg" ; "non hex digits")]
    #[test_case("#+1+2+3" ; "signed digits")]
    #[test_case("#" ; "bare hash")]
    fn test_parse_hex_rejects(input: &str) {
        assert_eq!(parse_hex(input), None);
    }

    #[test]
    fn test_luminance_extremes() {
        assert!(luminance(0, 0, 0).abs() < f64::EPSILON);
        assert!((luminance(255, 255, 255) - 255.0).abs() < 1e-9);
    }

    #[test_case("black", true ; "black keyword")]
    #[test_case("Black", true ; "black keyword any case")]
    #[test_case("#000000", true ; "hex black")]
    #[test_case("#ffffff", false ; "hex white")]
    #[test_case("#336699", true ; "dark blue")]
    #[test_case("#ffcc00", false ; "yellow")]
    #[test_case("#00f", true ; "short blue")]
    #[test_case("mauve", false ; "unparseable name")]
    #[test_case("slate", false ; "default label")]
    #[test_case("#12", false ; "malformed hex")]
    fn test_is_dark_background(color: &str, expected: bool) {
        assert_eq!(is_dark_background(color), expected);
    }

    #[test]
    fn test_short_hex_matches_expanded() {
        for (short, long) in [("#abc", "#aabbcc"), ("#123", "#112233"), ("#f80", "#ff8800")] {
            assert_eq!(is_dark_background(short), is_dark_background(long));
        }
        // #aabbcc: 0.2126*170 + 0.7152*187 + 0.0722*204 = 184.5
        assert!(!is_dark_background("#abc"));
    }

    #[test]
    fn test_threshold_boundary() {
        // Coefficients sum to 1, so a gray's luminance is its channel value.
        assert!(is_dark_background("#7f7f7f"));
        assert!(!is_dark_background("#818181"));
    }

    #[test]
    fn test_resolved_color_tone() {
        let dark = ResolvedColor::new("#000000");
        assert!(dark.is_dark);
        assert_eq!(dark.text_tone(), TextTone::Light);

        let light = ResolvedColor::new("slate");
        assert!(!light.is_dark);
        assert_eq!(light.text_tone(), TextTone::Dark);
        assert_eq!(TextTone::for_background("black"), TextTone::Light);
    }
}
