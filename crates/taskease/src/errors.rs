//! Error types for the taskease crate.

use thiserror::Error;

/// Error types for task list, account and AI operations
#[derive(Error, Debug, Clone)]
pub enum TaskEaseError {
    // Validation errors
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    #[error("Invalid description: {reason}")]
    InvalidDescription { reason: String },

    #[error("Invalid email address: '{email}'")]
    InvalidEmail { email: String },

    #[error("Password must be at least {min_len} characters")]
    WeakPassword { min_len: usize },

    // Precondition errors
    #[error("{reason}")]
    PreconditionFailed { reason: String },

    #[error("You must be signed in")]
    NotSignedIn,

    // Task errors
    #[error("Task '{task_id}' not found")]
    TaskNotFound { task_id: String },

    #[error("Permission denied for task '{task_id}'")]
    PermissionDenied { task_id: String },

    #[error("Batch write rejected: {reason}")]
    BatchRejected { reason: String },

    // Auth errors
    #[error("This email is already registered. Please log in instead.")]
    EmailAlreadyInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    // Storage errors
    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },

    #[error("Live subscription failed: {reason}")]
    SubscriptionFailed { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidConfigValue { key: String, reason: String },

    // AI errors
    #[error("AI error: {0}")]
    Ai(String),

    #[error("AI response parse error: {reason}")]
    AiResponseParseError { reason: String },

    // General errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl TaskEaseError {
    /// Whether the same operation may succeed if the user simply tries again.
    ///
    /// Validation and precondition failures need different input first, as
    /// do rejections by the store or auth service (unknown task, foreign
    /// task, taken email, wrong password).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StorageError { .. }
                | Self::FileReadError { .. }
                | Self::FileWriteError { .. }
                | Self::SubscriptionFailed { .. }
                | Self::BatchRejected { .. }
                | Self::Ai(_)
                | Self::AiResponseParseError { .. }
        )
    }

    /// Whether the error was raised before any external call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTitle { .. }
                | Self::InvalidDescription { .. }
                | Self::InvalidEmail { .. }
                | Self::WeakPassword { .. }
        )
    }
}

impl From<std::io::Error> for TaskEaseError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TaskEaseError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for taskease operations
pub type TaskEaseResult<T> = Result<T, TaskEaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskEaseError::TaskNotFound {
            task_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Task 'abc' not found");
    }

    #[test]
    fn test_precondition_message_is_passed_through() {
        let err = TaskEaseError::PreconditionFailed {
            reason: "You need at least two active tasks".to_string(),
        };
        assert_eq!(err.to_string(), "You need at least two active tasks");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(TaskEaseError::Ai("down".to_string()).is_retryable());
        assert!(TaskEaseError::BatchRejected {
            reason: "x".to_string()
        }
        .is_retryable());
        assert!(!TaskEaseError::WeakPassword { min_len: 6 }.is_retryable());
        assert!(TaskEaseError::WeakPassword { min_len: 6 }.is_validation());
    }

    #[test]
    fn test_service_rejections_are_not_retryable() {
        let rejections = [
            TaskEaseError::TaskNotFound {
                task_id: "t".to_string(),
            },
            TaskEaseError::PermissionDenied {
                task_id: "t".to_string(),
            },
            TaskEaseError::EmailAlreadyInUse,
            TaskEaseError::InvalidCredentials,
        ];
        for err in rejections {
            assert!(!err.is_retryable(), "{err} should not be retryable");
            assert!(!err.is_validation());
        }
        assert!(TaskEaseError::SubscriptionFailed {
            reason: "x".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TaskEaseError = io_err.into();
        assert!(matches!(err, TaskEaseError::StorageError { .. }));
    }
}
