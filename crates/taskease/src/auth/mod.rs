//! Account creation, sign-in and the session-change stream.

mod local;
mod traits;

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{TaskEaseError, TaskEaseResult};

pub use local::LocalAuth;
pub use traits::AuthClient;

/// Minimum accepted password length, in characters
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Reject addresses that are obviously not email addresses.
pub fn validate_email(email: &str) -> TaskEaseResult<()> {
    let pattern = EMAIL_PATTERN
        .as_ref()
        .map_err(|e| TaskEaseError::Internal {
            reason: format!("Invalid email regex: {e}"),
        })?;
    if pattern.is_match(email) {
        Ok(())
    } else {
        Err(TaskEaseError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_CHARS`].
pub fn validate_password(password: &str) -> TaskEaseResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(TaskEaseError::WeakPassword {
            min_len: MIN_PASSWORD_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("ada@example").is_err());
        assert!(validate_email("not an email").is_err());
        assert!(validate_email("").is_err());
        // compiled once, reused
        assert!(validate_email("grace@example.org").is_ok());
        assert!(EMAIL_PATTERN.is_ok());
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("secret").is_ok());
        assert!(matches!(
            validate_password("12345"),
            Err(TaskEaseError::WeakPassword { min_len: 6 })
        ));
    }
}
