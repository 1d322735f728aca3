// src/comments/validators.rs

use crate::common::ValidationResult;

pub const CONTENT_MAX_LEN: usize = 1000;

/// Validate comment content (create and update share the same rule)
pub fn validate_content(content: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if content.trim().is_empty() {
        result.add_error("content", "Comment cannot be empty");
    } else if content.chars().count() > CONTENT_MAX_LEN {
        result.add_error(
            "content",
            &format!("Comment must be at most {} characters", CONTENT_MAX_LEN),
        );
    }

    result
}
