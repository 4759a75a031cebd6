//! Field validation policy for phone numbers, full names and passwords.
//!
//! The [`Validator`] is a service object holding an account-store handle
//! (phone numbers must also be unused). Each failing rule yields a
//! [`FieldError`] rendered as `"<field>: <message>"`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use userhub_core::error::{UserHubError, UserHubResult};
use userhub_core::repository::AccountRepository;

pub const PHONE_NUMBER_FORMAT_MESSAGE: &str =
    r#"Phone numbers must start with "+62" and have 10 to 13 digits."#;
pub const PHONE_NUMBER_TAKEN_MESSAGE: &str = "Phone numbers already exists.";
pub const FULL_NAME_MESSAGE: &str =
    "Full name must be at minimum 3 characters and maximum 60 characters.";
pub const PASSWORD_MESSAGE: &str = "Passwords must have at least 6 characters, \
    including 1 capital letter, 1 number, and 1 special character.";

const MIN_FULL_NAME_LENGTH: usize = 3;
const MAX_FULL_NAME_LENGTH: usize = 60;
const MIN_PASSWORD_LENGTH: usize = 6;

static PHONE_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+62[0-9]{10,13}$").expect("valid phone regex"));
static UPPERCASE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid uppercase regex"));
static DIGIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit regex"));
static SPECIAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("valid special-char regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PhoneNumber,
    FullName,
    Password,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::PhoneNumber => "phone_number",
            Field::FullName => "full_name",
            Field::Password => "password",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// The value breaks a format rule.
    Invalid,
    /// The value is well-formed (or not) but already owned by an account.
    Taken,
}

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    fn invalid(field: Field, message: &'static str) -> Self {
        Self {
            field,
            kind: FieldErrorKind::Invalid,
            message,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field.as_str(), self.message)
    }
}

impl From<FieldError> for UserHubError {
    fn from(err: FieldError) -> Self {
        match err.kind {
            FieldErrorKind::Taken => UserHubError::Conflict {
                message: err.to_string(),
            },
            FieldErrorKind::Invalid => UserHubError::Validation {
                messages: vec![err.to_string()],
            },
        }
    }
}

/// Outcome of a single field check.
pub type FieldCheck = Result<(), FieldError>;

/// Validates registration and profile fields.
#[derive(Clone)]
pub struct Validator<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> Validator<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Check format and uniqueness of a phone number.
    ///
    /// When the number is already stored the "already exists" message is
    /// reported, whether or not the format was valid. Storage failures
    /// during the lookup propagate as the outer error.
    pub async fn validate_phone_number(&self, phone_number: &str) -> UserHubResult<FieldCheck> {
        let mut check = if PHONE_NUMBER_REGEX.is_match(phone_number) {
            Ok(())
        } else {
            Err(FieldError::invalid(
                Field::PhoneNumber,
                PHONE_NUMBER_FORMAT_MESSAGE,
            ))
        };

        if self.repo.phone_number_exists(phone_number).await? {
            check = Err(FieldError {
                field: Field::PhoneNumber,
                kind: FieldErrorKind::Taken,
                message: PHONE_NUMBER_TAKEN_MESSAGE,
            });
        }

        Ok(check)
    }

    pub fn validate_full_name(&self, full_name: &str) -> FieldCheck {
        let len = full_name.chars().count();
        if (MIN_FULL_NAME_LENGTH..=MAX_FULL_NAME_LENGTH).contains(&len) {
            Ok(())
        } else {
            Err(FieldError::invalid(Field::FullName, FULL_NAME_MESSAGE))
        }
    }

    /// All four rules must hold; the message never says which one failed.
    pub fn validate_password(&self, password: &str) -> FieldCheck {
        let valid = password.chars().count() >= MIN_PASSWORD_LENGTH
            && UPPERCASE_REGEX.is_match(password)
            && DIGIT_REGEX.is_match(password)
            && SPECIAL_REGEX.is_match(password);

        if valid {
            Ok(())
        } else {
            Err(FieldError::invalid(Field::Password, PASSWORD_MESSAGE))
        }
    }
}
