// --- File: crates/pushmynotifs_common/src/models.rs ---

// Data structures shared between the registrar, the host runtime and the
// collaborator implementations.

use crate::error::NotificationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use pushmynotifs_config::{AuthorizationOptions, TokenEnvironment};

/// Opaque identifier issued by the OS push service for this app install.
///
/// The bytes are owned by the OS; the app only observes them. Displayed as
/// lowercase hex, which is also how operators see it in the logs.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceToken(Vec<u8>);

impl DeviceToken {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decodes a hex string as produced by `to_hex`.
    pub fn from_hex(encoded: &str) -> Result<Self, NotificationError> {
        let bytes = hex::decode(encoded.trim())?;
        if bytes.is_empty() {
            return Err(NotificationError::InvalidToken("empty token".to_string()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceToken({})", self.to_hex())
    }
}

impl From<&str> for DeviceToken {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().to_vec())
    }
}

/// Logical connection state between the app and the provider's delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
}

/// A data message delivered by the messaging provider while a session is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMessage {
    /// Provider assigned message id, when the provider reports one
    pub message_id: Option<String>,

    /// Custom key-value data sent with the message
    pub app_data: HashMap<String, String>,

    /// When the message reached this process
    pub received_at: DateTime<Utc>,
}

impl RemoteMessage {
    pub fn new(message_id: Option<String>, app_data: HashMap<String, String>) -> Self {
        Self {
            message_id,
            app_data,
            received_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_token_displays_as_hex() {
        let token = DeviceToken::from("abc123");
        assert_eq!(token.to_string(), "616263313233");
        assert_eq!(format!("{:?}", token), "DeviceToken(616263313233)");
        assert_eq!(token.as_bytes(), b"abc123");
    }

    #[test]
    fn test_device_token_from_hex() {
        let token = DeviceToken::from_hex("78797a373839").unwrap();
        assert_eq!(token, DeviceToken::from("xyz789"));
    }

    #[test]
    fn test_device_token_rejects_bad_hex_and_empty() {
        assert!(matches!(
            DeviceToken::from_hex("not-hex"),
            Err(NotificationError::InvalidToken(_))
        ));
        assert!(matches!(
            DeviceToken::from_hex("  "),
            Err(NotificationError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_session_starts_disconnected() {
        assert_eq!(SessionState::default(), SessionState::Disconnected);
    }
}
