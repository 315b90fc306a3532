//! CLI tool for yarnview - resolves yarn color labels to display colors
//!
//! Usage:
//!   yarnview_cli <label>...                       # One line per label
//!   yarnview_cli --retries 0 <label>...           # No retry on 429
//!   yarnview_cli --base-url http://host/v1 <label>...
//!
//! Output is `label<TAB>color<TAB>dark|light`. All labels share one
//! session, so repeated labels are served from the cache.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::env;
    use yarnview::lookup::{HttpLookup, LookupConfig, ThreadSleep};
    use yarnview::ColorSession;

    env_logger::init();

    let usage = "Usage: yarnview_cli [--base-url URL] [--retries N] <label>...";
    let mut config = LookupConfig::default();
    let mut labels = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--base-url" => match args.next() {
                Some(url) => config.base_url = url,
                None => {
                    eprintln!("{usage}");
                    std::process::exit(2);
                }
            },
            "--retries" => match args.next().map(|n| n.parse::<u32>()) {
                Some(Ok(n)) => config.max_retries = n,
                _ => {
                    eprintln!("--retries expects a non-negative integer");
                    eprintln!("{usage}");
                    std::process::exit(2);
                }
            },
            "-h" | "--help" => {
                println!("{usage}");
                return;
            }
            _ => labels.push(arg),
        }
    }

    if labels.is_empty() {
        eprintln!("{usage}");
        std::process::exit(2);
    }

    if let Err(e) = config.names_url("slate") {
        eprintln!("Bad --base-url: {e}");
        std::process::exit(2);
    }

    let lookup = match HttpLookup::new() {
        Ok(lookup) => lookup,
        Err(e) => {
            eprintln!("Error creating HTTP client: {e}");
            std::process::exit(1);
        }
    };

    let session = ColorSession::with_config(lookup, ThreadSleep, config);
    for label in &labels {
        let resolved = pollster::block_on(session.resolve(Some(label.as_str())));
        let tone = if resolved.is_dark { "dark" } else { "light" };
        println!("{label}\t{}\t{tone}", resolved.color);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
