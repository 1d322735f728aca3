// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., P_K7NP3X for projects)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - ~1 billion combinations per entity type (32^6)
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User (U_)
    User,
    /// Project (P_)
    Project,
    /// Comment (C_)
    Comment,
    /// Like relation (K_) - K to keep C_ for comments
    Like,
    /// Screenshot (S_)
    Screenshot,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Project => "P",
            EntityPrefix::Comment => "C",
            EntityPrefix::Like => "K",
            EntityPrefix::Screenshot => "S",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed entity ID
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_project_id() -> String {
    generate_id(EntityPrefix::Project)
}

pub fn generate_comment_id() -> String {
    generate_id(EntityPrefix::Comment)
}

pub fn generate_like_id() -> String {
    generate_id(EntityPrefix::Like)
}

pub fn generate_screenshot_id() -> String {
    generate_id(EntityPrefix::Screenshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_has_prefix_and_length() {
        let id = generate_project_id();
        assert!(id.starts_with("P_"));
        assert_eq!(id.len(), 8);
    }

    #[test]
    fn test_ids_use_crockford_alphabet() {
        let id = generate_user_id();
        let body = id.strip_prefix("U_").expect("prefix missing");
        assert!(body
            .bytes()
            .all(|b| CROCKFORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_ids_are_not_constant() {
        let a = generate_comment_id();
        let b = generate_comment_id();
        // 32^6 space makes collisions in two draws effectively impossible
        assert_ne!(a, b);
    }
}
