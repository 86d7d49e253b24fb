// --- File: crates/pushmynotifs_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The error type shared by the registrar and its collaborators.
///
/// None of these are fatal. Lifecycle code logs them where they are detected
/// and carries on; only startup (configuration) errors leave the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The user declined alert/badge/sound authorization
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The OS push service could not issue a device token
    #[error("Remote notification registration failed: {0}")]
    RegistrationFailed(String),

    /// The messaging provider refused or dropped the session connect
    #[error("Messaging session connect failed: {0}")]
    ConnectFailed(String),

    /// A token could not be decoded
    #[error("Invalid device token: {0}")]
    InvalidToken(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The host event stream has no receiver left
    #[error("Host event channel closed")]
    ChannelClosed,
}

impl NotificationError {
    /// Short stable name used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationError::PermissionDenied => "permission_denied",
            NotificationError::RegistrationFailed(_) => "registration_failed",
            NotificationError::ConnectFailed(_) => "connect_failed",
            NotificationError::InvalidToken(_) => "invalid_token",
            NotificationError::ConfigError(_) => "config_error",
            NotificationError::ChannelClosed => "channel_closed",
        }
    }
}

impl From<hex::FromHexError> for NotificationError {
    fn from(err: hex::FromHexError) -> Self {
        NotificationError::InvalidToken(err.to_string())
    }
}

pub fn registration_failed<T: fmt::Display>(message: T) -> NotificationError {
    NotificationError::RegistrationFailed(message.to_string())
}

pub fn connect_failed<T: fmt::Display>(message: T) -> NotificationError {
    NotificationError::ConnectFailed(message.to_string())
}

pub fn config_error<T: fmt::Display>(message: T) -> NotificationError {
    NotificationError::ConfigError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_matching_variants() {
        assert_eq!(
            registration_failed("no network"),
            NotificationError::RegistrationFailed("no network".to_string())
        );
        assert_eq!(connect_failed("timeout").kind(), "connect_failed");
        assert_eq!(
            config_error("bad topic").to_string(),
            "Configuration error: bad topic"
        );
    }

    #[test]
    fn test_hex_errors_become_invalid_token() {
        let err: NotificationError = hex::decode("zz").unwrap_err().into();
        assert_eq!(err.kind(), "invalid_token");
    }
}
