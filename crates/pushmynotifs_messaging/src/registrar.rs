//! The notification registrar.
//!
//! Owns this install's registration with the messaging provider: asks for
//! permission, registers with the OS push service, forwards the device token,
//! and keeps the messaging session in step with the app's foreground state.
//!
//! Every failure here is logged where it is detected and then dropped. Nothing
//! is retried and nothing reaches the UI; a broken registration shows up only
//! as notifications that never arrive.

use crate::events::{EventFuture, RegistrationEvents};
use crate::lifecycle::AppLifecycleEvent;
use pushmynotifs_common::{
    log_error, DeviceToken, MessagingProvider, NotificationError, PushService, RemoteMessage,
    SessionState,
};
use pushmynotifs_config::MessagingConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

/// Registration state held by a single registrar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrarContext {
    token: Option<DeviceToken>,
    session: SessionState,
    refresh_observer_registered: bool,
}

impl RegistrarContext {
    /// The device token currently known, if registration ever succeeded.
    pub fn token(&self) -> Option<&DeviceToken> {
        self.token.as_ref()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Whether token refresh events are being observed (set at launch).
    pub fn is_observing_token_refresh(&self) -> bool {
        self.refresh_observer_registered
    }
}

pub struct NotificationRegistrar {
    push: Arc<dyn PushService>,
    messaging: Arc<dyn MessagingProvider>,
    config: MessagingConfig,
    context: RegistrarContext,
}

impl NotificationRegistrar {
    pub fn new(
        push: Arc<dyn PushService>,
        messaging: Arc<dyn MessagingProvider>,
        config: MessagingConfig,
    ) -> Self {
        Self {
            push,
            messaging,
            config,
            context: RegistrarContext::default(),
        }
    }

    pub fn context(&self) -> &RegistrarContext {
        &self.context
    }

    /// Asks the OS for alert/badge/sound authorization.
    ///
    /// Runs in the background; the caller does not wait. A denial only means
    /// notifications will not be shown, so registration carries on either way.
    /// The handle is returned for callers that want to observe completion.
    pub fn request_permission(&self) -> JoinHandle<()> {
        let push = Arc::clone(&self.push);
        let options = self.config.authorization;

        tokio::spawn(async move {
            match push.request_authorization(options).await {
                Ok(true) => info!(?options, "Notification permission granted"),
                Ok(false) => warn!(
                    kind = NotificationError::PermissionDenied.kind(),
                    "{}; registration continues without visible notifications",
                    NotificationError::PermissionDenied
                ),
                Err(err) => log_error(err, "Notification permission request failed"),
            }
        })
    }

    /// Asks the OS push service for a device token.
    ///
    /// The outcome comes back later as a host event.
    pub fn register_for_remote_notifications(&self) {
        debug!("Registering for remote notifications");
        self.push.register_for_remote_notifications();
    }

    /// Stores the token and associates this install with the provider.
    pub fn on_registration_succeeded(&mut self, token: DeviceToken) {
        let environment = self.config.token_environment;
        self.messaging.set_token(&token, environment);

        info!(device_token = %token, %environment, "Registered for remote notifications");
        match self.messaging.current_token() {
            Some(registration_token) => {
                info!(%registration_token, "Messaging provider registration token")
            }
            None => debug!("Messaging provider has not issued a registration token yet"),
        }

        self.context.token = Some(token);
    }

    /// Records a failed token acquisition. Any previously known token is kept.
    pub fn on_registration_failed(&mut self, error: NotificationError) {
        error!(
            kind = error.kind(),
            had_token = self.context.token.is_some(),
            "{}",
            error
        );
    }

    /// Opens a messaging session, replacing any open one.
    ///
    /// Without a known token this does nothing. Otherwise the provider is
    /// always told to disconnect first, so at most one session exists.
    pub async fn connect_session(&mut self) {
        let Some(token) = self.context.token.as_ref() else {
            debug!("No device token yet, skipping messaging connect");
            return;
        };
        debug!(device_token = %token, "Connecting messaging session");

        self.disconnect_session();

        let messaging = Arc::clone(&self.messaging);
        match messaging.connect().await {
            Ok(()) => {
                self.context.session = SessionState::Connected;
                info!("Connected to messaging provider");
            }
            Err(err) => {
                error!(kind = err.kind(), "{}", err);
            }
        }
    }

    /// Closes the messaging session. Safe when none is open.
    pub fn disconnect_session(&mut self) {
        self.messaging.disconnect();
        if self.context.session == SessionState::Connected {
            info!("Disconnected from messaging provider");
        }
        self.context.session = SessionState::Disconnected;
    }

    /// Adopts a superseding token and re-establishes delivery under it.
    pub async fn on_token_refreshed(&mut self, token: DeviceToken) {
        let environment = self.config.token_environment;
        info!(device_token = %token, "Device token refreshed");
        self.messaging.set_token(&token, environment);
        self.context.token = Some(token);

        self.connect_session().await;
    }

    pub fn on_message_received(&self, message: &RemoteMessage) {
        info!(
            message_id = message.message_id.as_deref().unwrap_or("-"),
            app_data = ?message.app_data,
            received_at = %message.received_at,
            "Received data message"
        );
    }

    /// Maps one process lifecycle transition onto registrar operations.
    pub async fn handle_lifecycle(&mut self, event: AppLifecycleEvent) {
        trace!(%event, "Lifecycle transition");
        if event == AppLifecycleEvent::Launch {
            self.launch();
        } else if event.closes_session() {
            self.disconnect_session();
        } else if event.opens_session() {
            self.connect_session().await;
        }
    }

    fn launch(&mut self) {
        // outcome is only logged, a panicked request included
        let permission = self.request_permission();
        tokio::spawn(async move {
            if let Err(err) = permission.await {
                log_error(err, "Notification permission task failed");
            }
        });
        self.register_for_remote_notifications();
        self.context.refresh_observer_registered = true;
        debug!("Observing device token refresh");
    }
}

impl RegistrationEvents for NotificationRegistrar {
    fn on_token(&mut self, token: DeviceToken) {
        self.on_registration_succeeded(token);
    }

    fn on_registration_error(&mut self, error: NotificationError) {
        self.on_registration_failed(error);
    }

    fn on_token_refresh(&mut self, token: DeviceToken) -> EventFuture<'_> {
        Box::pin(self.on_token_refreshed(token))
    }
}
