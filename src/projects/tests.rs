//! Tests for projects module
//!
//! These tests verify tag normalization rules and project validation.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    // ============================================================================
    // Tag Rules
    // ============================================================================

    #[test]
    fn test_sanitize_tag_lowercases_and_strips() {
        assert_eq!(tags::sanitize_tag("React!"), "react");
        assert_eq!(tags::sanitize_tag("Next.JS"), "nextjs");
        assert_eq!(tags::sanitize_tag("러스트"), "러스트");
        assert_eq!(tags::sanitize_tag("C++"), "c");
    }

    #[test]
    fn test_suggest_tag_valid_input() {
        assert_eq!(tags::suggest_tag("React!"), Some("react".to_string()));
        assert_eq!(tags::suggest_tag("사이드프로젝트"), Some("사이드프로젝트".to_string()));
    }

    #[test]
    fn test_suggest_tag_below_minimum_length() {
        // A single character falls below the 2-char minimum
        assert_eq!(tags::suggest_tag("a"), None);
        assert_eq!(tags::suggest_tag("!"), None);
        assert_eq!(tags::suggest_tag(""), None);
    }

    #[test]
    fn test_suggested_tags_pass_the_tag_regex() {
        for input in ["React!", "Vue 3", "game-dev", "개발일지"] {
            if let Some(tag) = tags::suggest_tag(input) {
                assert!(tags::is_valid_tag(&tag), "suggested tag {:?} failed the regex", tag);
            }
        }
    }

    #[test]
    fn test_tag_regex_rejects_leading_hyphen() {
        assert!(!tags::is_valid_tag("-rust"));
        assert!(tags::is_valid_tag("rust-lang"));
    }

    // ============================================================================
    // Project Validators
    // ============================================================================

    fn valid_create_request() -> models::CreateProjectRequest {
        models::CreateProjectRequest {
            title: "가계부 앱".to_string(),
            description: "심플한 가계부 사이드 프로젝트입니다".to_string(),
            category: "mobile".to_string(),
            tags: vec!["flutter".to_string(), "가계부".to_string()],
        }
    }

    #[test]
    fn test_create_project_valid() {
        let result = validators::ProjectValidator.validate(&valid_create_request());
        assert!(result.is_valid());
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_create_project_title_too_short() {
        let mut request = valid_create_request();
        request.title = "a".to_string();

        let result = validators::ProjectValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn test_create_project_unknown_category() {
        let mut request = valid_create_request();
        request.category = "blockchain".to_string();

        let result = validators::ProjectValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "category"));
    }

    #[test]
    fn test_create_project_too_many_tags() {
        let mut request = valid_create_request();
        request.tags = (0..11).map(|i| format!("tag{}", i)).collect();

        let result = validators::ProjectValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "tags"));
    }

    #[test]
    fn test_create_project_invalid_tag_reported() {
        let mut request = valid_create_request();
        request.tags = vec!["!".to_string()];

        let result = validators::ProjectValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "tags"));
    }

    #[test]
    fn test_update_project_requires_a_field() {
        let request = models::UpdateProjectRequest {
            title: None,
            description: None,
            category: None,
            tags: None,
        };

        let result = validators::ProjectValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "general"));
    }

    #[test]
    fn test_update_project_partial_fields_validated() {
        let request = models::UpdateProjectRequest {
            title: Some("새 제목".to_string()),
            description: None,
            category: Some("web".to_string()),
            tags: None,
        };

        let result = validators::ProjectValidator.validate(&request);
        assert!(result.is_valid());
    }
}
