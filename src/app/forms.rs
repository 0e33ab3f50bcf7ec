//! Form payloads and their validation rules.
//!
//! Forms deserialize from `application/x-www-form-urlencoded` bodies; a
//! missing field reads as empty so it is reported by validation rather
//! than rejected by the extractor. Lengths are counted in characters.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

/// Field name → messages, in field order for stable rendering.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Flatten validator output into per-field messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(error("required", "title is required"));
    }
    let len = char_len(title);
    if !(3..=40).contains(&len) {
        return Err(error("length", "title must be between 3 and 40 characters"));
    }
    Ok(())
}

fn validate_body(body: &str) -> Result<(), ValidationError> {
    if body.is_empty() {
        return Err(error("required", "body is required"));
    }
    if char_len(body) < 10 {
        return Err(error("length", "body must be at least 10 characters"));
    }
    Ok(())
}

/// Article create/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ArticleForm {
    #[validate(custom(function = "validate_title"))]
    pub title: String,

    #[validate(custom(function = "validate_body"))]
    pub body: String,
}

impl ArticleForm {
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(error("required", "name is required"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(error("alpha_num", "name may only contain letters and digits"));
    }
    if !(3..=20).contains(&char_len(name)) {
        return Err(error("length", "name must be between 3 and 20 characters"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(error("required", "email is required"));
    }
    if !(4..=30).contains(&char_len(email)) {
        return Err(error("length", "email must be between 4 and 30 characters"));
    }
    if !email.validate_email() {
        return Err(error("email", "email must be a valid email address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(error("required", "password is required"));
    }
    if char_len(password) < 6 {
        return Err(error("length", "password must be at least 6 characters"));
    }
    Ok(())
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegistrationForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[validate(custom(function = "validate_email"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "the two passwords do not match"))]
    pub password_confirm: String,
}

impl RegistrationForm {
    /// Field rules only; uniqueness is checked against the user store by
    /// the caller.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(|e| field_errors(&e))
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, body: &str) -> ArticleForm {
        ArticleForm {
            title: title.into(),
            body: body.into(),
        }
    }

    #[test]
    fn test_article_rules() {
        assert!(article("Hello", "fifteen chars!!").check().is_ok());

        let errors = article("", "").check().unwrap_err();
        assert_eq!(errors["title"], vec!["title is required"]);
        assert_eq!(errors["body"], vec!["body is required"]);

        let errors = article("Hi", "too short").check().unwrap_err();
        assert_eq!(errors["title"], vec!["title must be between 3 and 40 characters"]);
        assert_eq!(errors["body"], vec!["body must be at least 10 characters"]);

        let long = "x".repeat(41);
        assert!(article(&long, "long enough body").check().is_err());
    }

    #[test]
    fn test_lengths_count_characters() {
        // Three characters, nine bytes.
        assert!(article("日本語", "十個の文字があります。").check().is_ok());
    }

    fn registration(name: &str, email: &str, password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirm: confirm.into(),
        }
    }

    #[test]
    fn test_registration_rules() {
        assert!(registration("alice", "a@b.io", "secret1", "secret1").check().is_ok());

        let errors = registration("al ice", "not-an-email", "12345", "54321")
            .check()
            .unwrap_err();
        assert!(errors.contains_key("name"));
        assert_eq!(errors["email"], vec!["email must be a valid email address"]);
        assert_eq!(errors["password"], vec!["password must be at least 6 characters"]);
        assert_eq!(errors["password_confirm"], vec!["the two passwords do not match"]);
    }

    #[test]
    fn test_registration_required_fields() {
        let errors = RegistrationForm::default().check().unwrap_err();
        assert_eq!(errors["name"], vec!["name is required"]);
        assert_eq!(errors["email"], vec!["email is required"]);
        assert_eq!(errors["password"], vec!["password is required"]);
        assert!(!errors.contains_key("password_confirm"));
    }
}
