// --- File: crates/pushmynotifs_common/src/services.rs ---
//! Abstractions over the two external collaborators.
//!
//! The registrar never talks to the OS push service or the messaging provider
//! directly; it goes through these traits so the host can plug in a platform
//! binding, and tests can plug in recorders.

use crate::error::NotificationError;
use crate::models::{AuthorizationOptions, DeviceToken, TokenEnvironment};
use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// The OS push-notification service.
pub trait PushService: Send + Sync {
    /// Ask the user for authorization to present notifications.
    ///
    /// Resolves to whether the user granted it. The OS prompts at most once
    /// per install and answers later calls from the recorded decision.
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> BoxFuture<'_, bool, NotificationError>;

    /// Ask the OS to obtain a device token.
    ///
    /// Returns immediately. The outcome is delivered later on the host event
    /// stream, either as a token or as a registration failure.
    fn register_for_remote_notifications(&self);
}

/// The cloud messaging provider SDK.
pub trait MessagingProvider: Send + Sync {
    /// Associate this install with the provider using the OS device token.
    fn set_token(&self, token: &DeviceToken, environment: TokenEnvironment);

    /// The provider's own registration token, once it has derived one.
    fn current_token(&self) -> Option<String>;

    /// Open the data-message channel.
    fn connect(&self) -> BoxFuture<'_, (), NotificationError>;

    /// Close the data-message channel. Safe when nothing is open.
    fn disconnect(&self);

    /// Subscribe this install to a broadcast topic.
    fn subscribe(&self, topic: &str);
}
