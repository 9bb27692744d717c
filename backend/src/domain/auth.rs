//! Authentication primitives such as login credentials and password policy.
//!
//! Inbound payloads are parsed into these types before a handler talks to a
//! port, so services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum password length, in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length, in UTF-8 bytes. bcrypt ignores anything beyond.
pub const PASSWORD_MAX: usize = 72;

/// Errors returned when login or password payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    Email(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password had fewer than [`PASSWORD_MIN`] or more than [`PASSWORD_MAX`] characters.
    PasswordLength {
        /// Allowed minimum.
        min: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// Password encodes to more than [`PASSWORD_MAX`] bytes.
    PasswordTooLong {
        /// Allowed maximum, in bytes.
        max_bytes: usize,
    },
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordLength { min, max } => {
                write!(f, "password must be between {min} and {max} characters")
            }
            Self::PasswordTooLong { max_bytes } => {
                write!(f, "password must not exceed {max_bytes} bytes when UTF-8 encoded")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl CredentialsValidationError {
    /// Request field the error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::EmptyPassword
            | Self::PasswordLength { .. }
            | Self::PasswordTooLong { .. } => "password",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised (see [`Email`]).
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use salesdesk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@Bank.Example", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@bank.example");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::Email)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the user lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A new password that satisfies the length policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Validate a candidate password.
    pub fn new(password: &str) -> Result<Self, CredentialsValidationError> {
        let length = password.chars().count();
        if length == 0 {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(CredentialsValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        if password.len() > PASSWORD_MAX {
            return Err(CredentialsValidationError::PasswordTooLong {
                max_bytes: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Plain-text password, for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(..)")
    }
}
