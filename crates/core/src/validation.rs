//! Input validation helpers shared by the request handlers.

use validator::ValidateEmail;

use crate::error::CoreError;

/// Validate that `email` looks like an e-mail address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Normalise an e-mail address for storage and lookup.
///
/// Addresses are trimmed and lower-cased so `Ann@Example.com` and
/// `ann@example.com ` refer to the same account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Treat `None`, empty and whitespace-only strings as missing.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Reject `value` unless it is one of `allowed`.
pub fn validate_choice(field: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if !allowed.contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be one of {}, got '{value}'",
            allowed.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        assert!(validate_email("ann@example.com").is_ok());
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert!(validate_email("ann.example.com").is_err());
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
    }

    #[test]
    fn blank_values_are_missing() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(Some(" x ")), Some("x"));
    }

    #[test]
    fn choices_are_checked() {
        assert!(validate_choice("theme", "dark", &["light", "dark"]).is_ok());
        let err = validate_choice("theme", "neon", &["light", "dark"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input: theme must be one of light, dark, got 'neon'"
        );
    }
}
