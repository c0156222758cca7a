//! Input validation helpers shared across input schemas.
//!
//! The `validator` derive covers length/range/format constraints; the
//! functions here cover the shape rules it has no built-in for (username
//! alphabet, password complexity, terms acceptance) and the conversion of
//! [`ValidationErrors`] into a flat field-path → message map for API
//! responses.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Allowed username alphabet.
pub static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[a-zA-Z0-9_]+$").unwrap()
});

/// Validate that a username only contains letters, numbers, and underscores.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset")
            .with_message("Username can only contain letters, numbers, and underscores".into()))
    }
}

/// Validate password complexity: at least one uppercase letter, one
/// lowercase letter, one digit, and one special character.
pub fn validate_password_strength(value: &str) -> Result<(), ValidationError> {
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(
            "Password must contain an uppercase letter, a lowercase letter, a number, and a special character"
                .into(),
        ))
    }
}

/// Validate that the terms of service were accepted.
pub fn validate_accept_terms(value: &bool) -> Result<(), ValidationError> {
    if *value {
        Ok(())
    } else {
        Err(ValidationError::new("accept_terms")
            .with_message("You must accept the terms and conditions".into()))
    }
}

/// Flatten [`ValidationErrors`] into a field-path → message map.
///
/// Nested struct errors are joined with `.`; when a rule carries no custom
/// message the rule code is used instead.
#[must_use]
pub fn collect_field_errors(errors: &ValidationErrors) -> HashMap<String, String> {
    let mut out = HashMap::new();
    collect_into(errors, "", &mut out);
    out
}

fn collect_into(errors: &ValidationErrors, prefix: &str, out: &mut HashMap<String, String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            (*field).to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                if let Some(first) = field_errors.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map_or_else(|| first.code.to_string(), std::string::ToString::to_string);
                    out.insert(path, message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_into(nested, &path, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_into(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(length(min = 5, max = 200, message = "Title must be 5-200 characters"))]
        title: String,
        #[validate(custom(function = validate_accept_terms))]
        accept_terms: bool,
    }

    #[test]
    fn test_username_charset() {
        assert!(validate_username("abc_123").is_ok());
        assert!(validate_username("ab-c").is_err());
        assert!(validate_username("a b").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Abcdef1!").is_ok());
        assert!(validate_password_strength("abcdef1!").is_err()); // no uppercase
        assert!(validate_password_strength("ABCDEF1!").is_err()); // no lowercase
        assert!(validate_password_strength("Abcdefg!").is_err()); // no digit
        assert!(validate_password_strength("Abcdefg1").is_err()); // no special
    }

    #[test]
    fn test_collect_field_errors_paths_and_messages() {
        let sample = Sample {
            title: "abcd".to_string(),
            accept_terms: false,
        };
        let errors = sample.validate().unwrap_err();
        let map = collect_field_errors(&errors);

        assert_eq!(
            map.get("title").map(String::as_str),
            Some("Title must be 5-200 characters")
        );
        assert!(map.contains_key("accept_terms"));
    }

    #[test]
    fn test_title_boundary_length() {
        let short = Sample {
            title: "abcd".to_string(),
            accept_terms: true,
        };
        assert!(short.validate().is_err());

        let exact = Sample {
            title: "abcde".to_string(),
            accept_terms: true,
        };
        assert!(exact.validate().is_ok());
    }
}
