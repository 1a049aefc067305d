//! Small Markdown building blocks shared by the structure outline and the
//! per-file sections.

use chrono::{DateTime, Local};
use std::path::{Component, Path};
use std::time::SystemTime;

const MARKDOWN_SPECIAL: &[char] = &['#', '*', '_', '`', '[', ']', '(', ')', '<', '>', '|'];

/// In-document anchor for a path relative to the root: components joined by `-`.
pub fn anchor_for(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Fence long enough that no backtick run inside `content` can close it.
pub fn fence_for(content: &str) -> String {
    let longest = content
        .lines()
        .map(|line| line.trim_start().chars().take_while(|&c| c == '`').count())
        .max()
        .unwrap_or(0);

    "`".repeat(longest.max(2) + 1)
}

/// Wraps `content` verbatim in a fenced block, optionally language-tagged.
pub fn fenced(content: &str, language: Option<&str>) -> String {
    let fence = fence_for(content);
    format!("{}{}\n{}\n{}", fence, language.unwrap_or(""), content, fence)
}

/// `1234567` -> `1,234,567`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(ch);
    }

    formatted
}

pub fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Blanks control characters and backslash-escapes Markdown punctuation.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for ch in text.chars() {
        if is_blanked_control(ch) {
            escaped.push(' ');
        } else if MARKDOWN_SPECIAL.contains(&ch) {
            escaped.push('\\');
            escaped.push(ch);
        } else {
            escaped.push(ch);
        }
    }

    escaped
}

fn is_blanked_control(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}
