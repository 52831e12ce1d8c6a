//! Heuristic contact-field extraction from resume text.

use std::sync::OnceLock;

use regex::Regex;

/// Only the top of the resume is considered when looking for a name.
const NAME_SCAN_LINES: usize = 6;
const NAME_MAX_TOKENS: usize = 4;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("static regex")
    })
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\+?\d{1,3}[-.\t ]?)?(\d{10}|\d{3}[-.\t ]\d{3}[-.\t ]\d{4})")
            .expect("static regex")
    })
}

pub fn extract_email(text: &str) -> Option<String> {
    email_re().find(text).map(|m| m.as_str().to_string())
}

/// Ten contiguous digits or a 3-3-4 grouping on one line, with an optional country prefix.
pub fn extract_phone(text: &str) -> Option<String> {
    phone_re().find(text).map(|m| m.as_str().trim().to_string())
}

/// First short, letter-bearing line near the top that is not a "Resume" heading.
pub fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| {
            !line.to_lowercase().contains("resume")
                && line.chars().any(char::is_alphabetic)
                && line.split_whitespace().count() <= NAME_MAX_TOKENS
        })
        .map(str::to_string)
}
