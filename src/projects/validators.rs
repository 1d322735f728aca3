// src/projects/validators.rs

use super::models::{CreateProjectRequest, UpdateProjectRequest};
use super::tags::{suggest_tag, MAX_TAGS_PER_PROJECT};
use crate::common::{ValidationResult, Validator};

pub const TITLE_MIN_LEN: usize = 2;
pub const TITLE_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// Closed category set for the project feed filter
pub const CATEGORIES: &[&str] = &["web", "mobile", "game", "ai", "tool", "embedded", "other"];

pub struct ProjectValidator;

impl Validator<CreateProjectRequest> for ProjectValidator {
    fn validate(&self, data: &CreateProjectRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_title(&mut result, &data.title);
        validate_description(&mut result, &data.description);
        validate_category(&mut result, &data.category);
        validate_tags(&mut result, &data.tags);

        result
    }
}

impl Validator<UpdateProjectRequest> for ProjectValidator {
    fn validate(&self, data: &UpdateProjectRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.is_none()
            && data.description.is_none()
            && data.category.is_none()
            && data.tags.is_none()
        {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(title) = &data.title {
            validate_title(&mut result, title);
        }
        if let Some(description) = &data.description {
            validate_description(&mut result, description);
        }
        if let Some(category) = &data.category {
            validate_category(&mut result, category);
        }
        if let Some(tags) = &data.tags {
            validate_tags(&mut result, tags);
        }

        result
    }
}

fn validate_title(result: &mut ValidationResult, title: &str) {
    let len = title.trim().chars().count();
    if len < TITLE_MIN_LEN {
        result.add_error(
            "title",
            &format!("Title must be at least {} characters", TITLE_MIN_LEN),
        );
    } else if len > TITLE_MAX_LEN {
        result.add_error(
            "title",
            &format!("Title must be at most {} characters", TITLE_MAX_LEN),
        );
    }
}

fn validate_description(result: &mut ValidationResult, description: &str) {
    if description.trim().is_empty() {
        result.add_error("description", "Description is required");
    } else if description.chars().count() > DESCRIPTION_MAX_LEN {
        result.add_error(
            "description",
            &format!(
                "Description must be at most {} characters",
                DESCRIPTION_MAX_LEN
            ),
        );
    }
}

fn validate_category(result: &mut ValidationResult, category: &str) {
    if !CATEGORIES.contains(&category) {
        result.add_error(
            "category",
            &format!("Category must be one of: {}", CATEGORIES.join(", ")),
        );
    }
}

fn validate_tags(result: &mut ValidationResult, tags: &[String]) {
    if tags.len() > MAX_TAGS_PER_PROJECT {
        result.add_error(
            "tags",
            &format!("At most {} tags are allowed", MAX_TAGS_PER_PROJECT),
        );
    }

    for tag in tags {
        if suggest_tag(tag).is_none() {
            result.add_error("tags", &format!("Invalid tag: {}", tag));
        }
    }
}
