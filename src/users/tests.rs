//! Tests for users module
//!
//! These tests verify username and profile validation rules and the avatar
//! content sniffing helper.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    #[test]
    fn test_username_below_minimum_length_rejected() {
        let result = validators::validate_username("ab");
        assert!(!result.is_valid(), "Two-character username must be rejected");
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "username" && e.message.contains("at least")));
    }

    #[test]
    fn test_username_valid_accepted() {
        let result = validators::validate_username("validUser123");
        assert!(result.is_valid());
        assert_eq!(result.errors.len(), 0);
    }

    #[test]
    fn test_username_hangul_accepted() {
        let result = validators::validate_username("개발자_kim");
        assert!(result.is_valid());
    }

    #[test]
    fn test_username_special_characters_rejected() {
        let result = validators::validate_username("not ok!");
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "username"));
    }

    #[test]
    fn test_username_over_maximum_length_rejected() {
        let long = "a".repeat(21);
        let result = validators::validate_username(&long);
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.message.contains("at most")));
    }

    #[test]
    fn test_profile_update_requires_a_field() {
        let request = models::UpdateProfileRequest {
            name: None,
            bio: None,
        };

        let result = validators::ProfileValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "general"));
    }

    #[test]
    fn test_profile_update_bio_too_long() {
        let request = models::UpdateProfileRequest {
            name: None,
            bio: Some("자".repeat(501)),
        };

        let result = validators::ProfileValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "bio"));
    }

    #[test]
    fn test_profile_update_valid() {
        let request = models::UpdateProfileRequest {
            name: Some("김개발".to_string()),
            bio: Some("사이드 프로젝트를 좋아합니다".to_string()),
        };

        let result = validators::ProfileValidator.validate(&request);
        assert!(result.is_valid());
    }

    #[test]
    fn test_image_extension_sniffing() {
        // PNG magic bytes
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(handlers::avatar::image_extension(&png), Some("png"));

        // Not an image
        let text = b"hello world, definitely not an image";
        assert_eq!(handlers::avatar::image_extension(text), None);
    }
}
