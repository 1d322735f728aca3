//! Tests for comments module

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_comment_rejected() {
        let result = validators::validate_content("   ");
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "content"));
    }

    #[test]
    fn test_comment_over_limit_rejected() {
        let long = "글".repeat(1001);
        let result = validators::validate_content(&long);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("at most")));
    }

    #[test]
    fn test_comment_valid() {
        let result = validators::validate_content("멋진 프로젝트네요!");
        assert!(result.is_valid());
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_comment_at_exact_limit_accepted() {
        let content = "a".repeat(1000);
        let result = validators::validate_content(&content);
        assert!(result.is_valid());
    }
}
