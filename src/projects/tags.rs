// src/projects/tags.rs
//! Tag normalization rules
//!
//! Tags are stored lowercased with everything outside latin alphanumerics,
//! hangul, and hyphens stripped, so "React!" and "react" are the same tag.

use regex::Regex;
use std::sync::OnceLock;

pub const TAG_MIN_LEN: usize = 2;
pub const TAG_MAX_LEN: usize = 20;
pub const MAX_TAGS_PER_PROJECT: usize = 10;

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9가-힣][a-z0-9가-힣-]{1,19}$").expect("invalid tag regex")
    })
}

/// Lowercase and strip characters outside the tag alphabet
pub fn sanitize_tag(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || *c == '-'
                || ('가'..='힣').contains(c)
        })
        .collect()
}

/// Whether a (sanitized) tag matches the storage rules
pub fn is_valid_tag(tag: &str) -> bool {
    tag_regex().is_match(tag)
}

/// Suggest the stored form of a raw tag input.
///
/// Returns `None` when the sanitized input falls below the minimum length or
/// still fails the tag rules.
pub fn suggest_tag(input: &str) -> Option<String> {
    let sanitized = sanitize_tag(input);
    let len = sanitized.chars().count();
    if len < TAG_MIN_LEN || len > TAG_MAX_LEN {
        return None;
    }
    if !is_valid_tag(&sanitized) {
        return None;
    }
    Some(sanitized)
}
