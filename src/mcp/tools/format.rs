//! Text rendering helpers shared by the tools.

use std::fmt::Display;

use crate::engine::TrackSummary;

pub(super) fn or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "Unknown".to_string(), |v| v.to_string())
}

pub(super) fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// "happy hour" -> "Happy Hour"
pub(super) fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// 12345 -> "12,345"
pub(super) fn with_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Numbered entry: "1. **Name** by Artist" plus an indented detail line.
pub(super) fn track_entry(position: usize, track: &TrackSummary, details: &str) -> String {
    format!(
        "{}. **{}** by {}\n   {}\n\n",
        position, track.name, track.artist, details
    )
}
