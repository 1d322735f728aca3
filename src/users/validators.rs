// src/users/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::UpdateProfileRequest;
use crate::common::{ValidationResult, Validator};

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;
pub const BIO_MAX_LEN: usize = 500;
pub const NAME_MAX_LEN: usize = 50;

fn username_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Latin alphanumerics, underscore, and hangul
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_가-힣]+$").expect("invalid username regex"))
}

/// Validate a requested username (onboarding and availability checks)
pub fn validate_username(username: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    let char_count = username.chars().count();

    if char_count < USERNAME_MIN_LEN {
        result.add_error(
            "username",
            &format!("Username must be at least {} characters", USERNAME_MIN_LEN),
        );
        return result;
    }

    if char_count > USERNAME_MAX_LEN {
        result.add_error(
            "username",
            &format!("Username must be at most {} characters", USERNAME_MAX_LEN),
        );
        return result;
    }

    if !username_regex().is_match(username) {
        result.add_error(
            "username",
            "Username may only contain letters, digits, underscores, and hangul",
        );
    }

    result
}

pub struct ProfileValidator;

impl Validator<UpdateProfileRequest> for ProfileValidator {
    fn validate(&self, data: &UpdateProfileRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.is_none() && data.bio.is_none() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(name) = &data.name {
            if name.trim().is_empty() {
                result.add_error("name", "Name cannot be empty");
            } else if name.chars().count() > NAME_MAX_LEN {
                result.add_error(
                    "name",
                    &format!("Name must be at most {} characters", NAME_MAX_LEN),
                );
            }
        }

        if let Some(bio) = &data.bio {
            if bio.chars().count() > BIO_MAX_LEN {
                result.add_error(
                    "bio",
                    &format!("Bio must be at most {} characters", BIO_MAX_LEN),
                );
            }
        }

        result
    }
}
