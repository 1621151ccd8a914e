//! Login, registration and password-reset forms.
//!
//! Forms arrive as `application/x-www-form-urlencoded` bodies. Missing fields
//! deserialize as empty strings so they fail validation with a field message
//! instead of a rejection from the extractor. Only the first message per field
//! is reported.

pub mod rules;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Field name to message, serialized as a flat JSON object.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already failed.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Checkbox value, `"on"` when ticked.
    pub remember: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct LoginSubmission {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    /// # Errors
    /// Returns the field errors when any rule fails.
    pub fn validate(self) -> Result<LoginSubmission, FormErrors> {
        let email = self.email.trim().to_string();

        let mut errors = FormErrors::new();
        errors.check("email", rules::email(&email));
        errors.check("password", rules::password(&self.password));

        errors.into_result(LoginSubmission {
            email,
            password: self.password,
            remember: self.remember.as_deref() == Some("on"),
        })
    }
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RegisterSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// The password confirmation is compared only once every field is valid.
    ///
    /// # Errors
    /// Returns the field errors when any rule fails or the passwords differ.
    pub fn validate(self) -> Result<RegisterSubmission, FormErrors> {
        let email = self.email.trim().to_string();

        let mut errors = FormErrors::new();
        errors.check(
            "firstName",
            rules::min_length(&self.first_name, rules::MIN_NAME_LENGTH, "First name"),
        );
        errors.check(
            "lastName",
            rules::min_length(&self.last_name, rules::MIN_NAME_LENGTH, "Last name"),
        );
        errors.check("email", rules::email(&email));
        errors.check("password", rules::password(&self.password));
        errors.check("confirmPassword", rules::password(&self.confirm_password));

        if errors.is_empty() && self.password != self.confirm_password {
            errors.add("confirmPassword", rules::PASSWORDS_DONT_MATCH);
        }

        errors.into_result(RegisterSubmission {
            first_name: self.first_name,
            last_name: self.last_name,
            email,
            password: self.password,
        })
    }
}

#[derive(ToSchema, Deserialize, Debug, Default)]
#[serde(default)]
pub struct ResetForm {
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ResetSubmission {
    pub email: String,
}

impl ResetForm {
    /// # Errors
    /// Returns the field errors when the email is invalid.
    pub fn validate(self) -> Result<ResetSubmission, FormErrors> {
        let email = self.email.trim().to_string();

        let mut errors = FormErrors::new();
        errors.check("email", rules::email(&email));

        errors.into_result(ResetSubmission { email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_PASSWORD: &str = "Sup3r$ecret";

    fn register(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn form_errors_keep_first_message() {
        let mut errors = FormErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn form_errors_serialize_flat() -> anyhow::Result<()> {
        let mut errors = FormErrors::new();
        errors.add("email", rules::INVALID_EMAIL);
        errors.add("password", "Password is required");

        let json = serde_json::to_value(&errors)?;
        assert_eq!(
            json,
            serde_json::json!({ "email": rules::INVALID_EMAIL, "password": "Password is required" })
        );
        Ok(())
    }

    #[test]
    fn login_valid_submission() {
        let form = LoginForm {
            email: "  user@example.com ".to_string(),
            password: GOOD_PASSWORD.to_string(),
            remember: Some("on".to_string()),
        };
        assert_eq!(
            form.validate(),
            Ok(LoginSubmission {
                email: "user@example.com".to_string(),
                password: GOOD_PASSWORD.to_string(),
                remember: true,
            })
        );
    }

    #[test]
    fn login_remember_only_when_on() {
        let form = LoginForm {
            email: "user@example.com".to_string(),
            password: GOOD_PASSWORD.to_string(),
            remember: Some("yes".to_string()),
        };
        assert!(form.validate().is_ok_and(|submission| !submission.remember));
    }

    #[test]
    fn login_empty_form_reports_both_fields() {
        let Err(errors) = LoginForm::default().validate() else {
            panic!("empty form must fail");
        };
        assert_eq!(errors.get("email"), Some(rules::INVALID_EMAIL));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn register_requires_names() {
        let mut form = register(GOOD_PASSWORD, GOOD_PASSWORD);
        form.first_name = "A".to_string();
        form.last_name = String::new();

        let Err(errors) = form.validate() else {
            panic!("short names must fail");
        };
        assert_eq!(
            errors.get("firstName"),
            Some("First name must be at least 2 characters")
        );
        assert_eq!(
            errors.get("lastName"),
            Some("Last name must be at least 2 characters")
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn register_mismatch_reported_on_confirmation() {
        let Err(errors) = register(GOOD_PASSWORD, "Other$ecret1").validate() else {
            panic!("mismatched passwords must fail");
        };
        assert_eq!(errors.get("confirmPassword"), Some(rules::PASSWORDS_DONT_MATCH));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn register_mismatch_skipped_while_fields_invalid() {
        let mut form = register(GOOD_PASSWORD, "Other$ecret1");
        form.email = "nope".to_string();

        let Err(errors) = form.validate() else {
            panic!("invalid email must fail");
        };
        assert_eq!(errors.get("email"), Some(rules::INVALID_EMAIL));
        assert_eq!(errors.get("confirmPassword"), None);
    }

    #[test]
    fn register_valid_submission() {
        let submission = register(GOOD_PASSWORD, GOOD_PASSWORD).validate();
        assert!(submission.is_ok_and(|s| s.first_name == "Ada" && s.email == "ada@example.com"));
    }

    #[test]
    fn reset_checks_email() {
        assert!(
            ResetForm {
                email: "user@example.com".to_string()
            }
            .validate()
            .is_ok()
        );

        let Err(errors) = ResetForm::default().validate() else {
            panic!("empty email must fail");
        };
        assert_eq!(errors.get("email"), Some(rules::INVALID_EMAIL));
    }
}
