pub mod config;
pub mod media;

use regex::Regex;
use std::sync::OnceLock;

/// Split free-form tag input on commas (ASCII or full-width) and whitespace.
pub fn parse_tags(input: &str) -> Vec<String> {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[,，\s]+").expect("valid tag separator"));

    separators
        .split(input)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Human readable byte count, e.g. `1.5 KB`.
pub fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes <= 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
