use lazy_static::lazy_static;
use regex::Regex;
use restaurant_wallet_core::{MAX_REJECTION_REASON_LENGTH, MAX_SEARCH_LENGTH};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref CONTROL_CHARS: Regex = Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("control char pattern");
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("whitespace pattern");
    static ref RECORD_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("record id pattern");
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub data: Option<String>,
    pub error: Option<String>,
}

impl ValidationResult {
    fn ok(data: Option<String>) -> Self {
        Self {
            valid: true,
            data,
            error: None,
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<String>, String> {
        if self.valid {
            Ok(self.data)
        } else {
            Err(self.error.unwrap_or_else(|| "Invalid input".to_string()))
        }
    }
}

#[derive(Default)]
pub struct InputSanitizer;

impl InputSanitizer {
    pub fn new() -> Self {
        Self
    }

    fn clean(&self, input: &str) -> String {
        let stripped = CONTROL_CHARS.replace_all(input, "");
        WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned()
    }

    /// Blank terms are dropped; long ones are refused.
    pub fn sanitize_search(&self, input: Option<&str>) -> ValidationResult {
        let Some(input) = input else {
            return ValidationResult::ok(None);
        };
        let cleaned = self.clean(input);
        if cleaned.is_empty() {
            return ValidationResult::ok(None);
        }
        if cleaned.chars().count() > MAX_SEARCH_LENGTH {
            return ValidationResult::invalid(format!("Search term must be at most {} characters", MAX_SEARCH_LENGTH));
        }
        ValidationResult::ok(Some(cleaned))
    }

    pub fn sanitize_reason(&self, input: Option<&str>) -> ValidationResult {
        let Some(input) = input else {
            return ValidationResult::ok(None);
        };
        // Keep line breaks in reasons, only strip control characters.
        let cleaned = CONTROL_CHARS.replace_all(input, "").trim().to_string();
        if cleaned.is_empty() {
            return ValidationResult::ok(None);
        }
        if cleaned.chars().count() > MAX_REJECTION_REASON_LENGTH {
            return ValidationResult::invalid(format!(
                "Rejection reason must be at most {} characters",
                MAX_REJECTION_REASON_LENGTH
            ));
        }
        ValidationResult::ok(Some(cleaned))
    }

    pub fn sanitize_id(&self, input: &str) -> ValidationResult {
        let trimmed = input.trim();
        if RECORD_ID.is_match(trimmed) {
            ValidationResult::ok(Some(trimmed.to_string()))
        } else {
            ValidationResult::invalid("Invalid identifier format")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_trimmed_and_collapsed() {
        let sanitizer = InputSanitizer::new();
        let result = sanitizer.sanitize_search(Some("  golden \t\x07 dragon "));
        assert_eq!(result.data.as_deref(), Some("golden dragon"));
        assert_eq!(sanitizer.sanitize_search(Some("   ")), ValidationResult::ok(None));
        assert_eq!(sanitizer.sanitize_search(None), ValidationResult::ok(None));
    }

    #[test]
    fn test_search_too_long() {
        let long = "x".repeat(MAX_SEARCH_LENGTH + 1);
        assert!(!InputSanitizer::new().sanitize_search(Some(&long)).valid);
    }

    #[test]
    fn test_reason_keeps_newlines() {
        let result = InputSanitizer::new().sanitize_reason(Some(" Bank details\nmissing\x00 "));
        assert_eq!(result.into_result().unwrap().as_deref(), Some("Bank details\nmissing"));
    }

    #[test]
    fn test_reason_limit() {
        let long = "a".repeat(MAX_REJECTION_REASON_LENGTH + 1);
        assert!(InputSanitizer::new().sanitize_reason(Some(&long)).into_result().is_err());
    }

    #[test]
    fn test_sanitize_id() {
        let sanitizer = InputSanitizer::new();
        assert!(sanitizer.sanitize_id("4f1c2b7e-9d3a-4a51-8e0b-2c6d7f8a9b10").valid);
        assert!(!sanitizer.sanitize_id("../etc/passwd").valid);
        assert!(!sanitizer.sanitize_id("").valid);
    }
}
