//! Field rules shared by the auth forms. Each rule returns the message shown
//! next to the field when it fails.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MIN_NAME_LENGTH: usize = 2;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_UPPERCASE: &str = "Password must contain at least one uppercase letter";
pub const PASSWORD_LOWERCASE: &str = "Password must contain at least one lowercase letter";
pub const PASSWORD_NUMBER: &str = "Password must contain at least one number";
pub const PASSWORD_SPECIAL: &str = "Password must contain at least one special character";
pub const PASSWORDS_DONT_MATCH: &str = "Passwords don't match";

// Local part and labels follow the usual browser-side email check; consecutive
// and leading dots are rejected separately because `regex` has no lookahead.
static EMAIL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .ok()
});

pub fn valid_email(email: &str) -> bool {
    if email.starts_with('.') || email.contains("..") {
        return false;
    }
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// # Errors
/// Returns the field message when `email` is not a valid address.
pub fn email(email: &str) -> Result<(), String> {
    if valid_email(email) {
        Ok(())
    } else {
        Err(INVALID_EMAIL.to_string())
    }
}

/// Checks run in order and the first failure wins.
///
/// # Errors
/// Returns the field message of the first rule `password` breaks.
pub fn password(password: &str) -> Result<(), String> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        ));
    }

    let checks: [(fn(&char) -> bool, &str); 4] = [
        (char::is_ascii_uppercase, PASSWORD_UPPERCASE),
        (char::is_ascii_lowercase, PASSWORD_LOWERCASE),
        (char::is_ascii_digit, PASSWORD_NUMBER),
        (|c: &char| !c.is_ascii_alphanumeric(), PASSWORD_SPECIAL),
    ];
    for (check, message) in checks {
        if !password.chars().any(|c| check(&c)) {
            return Err(message.to_string());
        }
    }

    Ok(())
}

/// # Errors
/// Returns `"<label> must be at least <min> characters"` for short values.
pub fn min_length(value: &str, min: usize, label: &str) -> Result<(), String> {
    if value.chars().count() < min {
        Err(format!("{label} must be at least {min} characters"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for address in [
            "user@example.com",
            "first.last@sub.example.co",
            "o'brien+tag@example.io",
            "a_b-c@x-y.org",
        ] {
            assert!(valid_email(address), "{address} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for address in [
            "",
            "plain",
            "@example.com",
            "user@",
            "user@example",
            "user@example.c",
            ".user@example.com",
            "us..er@example.com",
            "user.@example.com",
            "user name@example.com",
            "user@-example.com",
        ] {
            assert!(!valid_email(address), "{address} should be invalid");
        }
    }

    #[test]
    fn password_reports_first_failing_rule() {
        assert_eq!(
            password("Ab1!"),
            Err("Password must be at least 8 characters".to_string())
        );
        assert_eq!(
            password(&"Aa1!".repeat(40)),
            Err("Password must be at most 128 characters".to_string())
        );
        assert_eq!(password("abcdefg1!"), Err(PASSWORD_UPPERCASE.to_string()));
        assert_eq!(password("ABCDEFG1!"), Err(PASSWORD_LOWERCASE.to_string()));
        assert_eq!(password("Abcdefgh!"), Err(PASSWORD_NUMBER.to_string()));
        assert_eq!(password("Abcdefgh1"), Err(PASSWORD_SPECIAL.to_string()));
        assert_eq!(password("Abcdefg1!"), Ok(()));
    }

    #[test]
    fn password_length_counts_characters() {
        // Eight characters, more than eight bytes.
        assert_eq!(password("Ab1!éééé"), Ok(()));
    }

    #[test]
    fn min_length_uses_label() {
        assert_eq!(
            min_length("A", 2, "First name"),
            Err("First name must be at least 2 characters".to_string())
        );
        assert_eq!(min_length("Al", 2, "First name"), Ok(()));
    }
}
