//! In-process stand-ins for the OS push service and the messaging provider.
//!
//! The demo host runs against these, and the tests use the provider's call
//! log to check ordering. Neither implements any transport.

use crate::events::{EventSender, HostEvent, WeakEventSender};
use once_cell::sync::OnceCell;
use pushmynotifs_common::{
    connect_failed, log_error, registration_failed, AuthorizationOptions, BoxFuture, DeviceToken,
    MessagingProvider, NotificationError, PushService, RemoteMessage, TokenEnvironment,
};
use pushmynotifs_config::SimulationConfig;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// What the OS answers when asked for a device token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Token(DeviceToken),
    Failure(String),
}

pub struct SimulatedPushService {
    events: WeakEventSender,
    grant_permission: bool,
    outcome: RegistrationOutcome,
    decision: OnceCell<bool>,
    prompts: AtomicUsize,
    registration_requests: AtomicUsize,
}

impl SimulatedPushService {
    pub fn new(events: &EventSender, grant_permission: bool, outcome: RegistrationOutcome) -> Self {
        Self {
            events: events.downgrade(),
            grant_permission,
            outcome,
            decision: OnceCell::new(),
            prompts: AtomicUsize::new(0),
            registration_requests: AtomicUsize::new(0),
        }
    }

    pub fn from_config(
        events: &EventSender,
        config: &SimulationConfig,
    ) -> Result<Self, NotificationError> {
        let outcome = match &config.fail_registration {
            Some(reason) => RegistrationOutcome::Failure(reason.clone()),
            None => RegistrationOutcome::Token(DeviceToken::from_hex(&config.device_token)?),
        };
        Ok(Self::new(events, config.grant_permission, outcome))
    }

    /// How many times the user actually saw the permission prompt.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }

    pub fn registration_requests(&self) -> usize {
        self.registration_requests.load(Ordering::SeqCst)
    }
}

impl PushService for SimulatedPushService {
    fn request_authorization(
        &self,
        options: AuthorizationOptions,
    ) -> BoxFuture<'_, bool, NotificationError> {
        let granted = *self.decision.get_or_init(|| {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            debug!(?options, granted = self.grant_permission, "Permission prompt answered");
            self.grant_permission
        });
        Box::pin(async move { Ok(granted) })
    }

    fn register_for_remote_notifications(&self) {
        self.registration_requests.fetch_add(1, Ordering::SeqCst);

        let event = match &self.outcome {
            RegistrationOutcome::Token(token) => {
                HostEvent::RegisteredForRemoteNotifications(token.clone())
            }
            RegistrationOutcome::Failure(reason) => {
                HostEvent::FailedToRegisterForRemoteNotifications(registration_failed(reason))
            }
        };
        if let Err(err) = self.events.send(event) {
            log_error(err, "Could not deliver registration outcome");
        }
    }
}

/// One call made against the messaging provider, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    SetToken {
        token: DeviceToken,
        environment: TokenEnvironment,
    },
    /// `token` is the device token the provider held when asked to connect
    Connect { token: Option<DeviceToken> },
    Disconnect,
    Subscribe { topic: String },
}

#[derive(Debug, Default)]
struct ProviderState {
    calls: Vec<ProviderCall>,
    token: Option<(DeviceToken, TokenEnvironment)>,
    open_sessions: usize,
    max_open_sessions: usize,
    subscriptions: BTreeSet<String>,
}

pub struct SimulatedMessagingProvider {
    events: WeakEventSender,
    fail_connect: AtomicBool,
    state: Mutex<ProviderState>,
}

impl SimulatedMessagingProvider {
    pub fn new(events: &EventSender) -> Self {
        Self {
            events: events.downgrade(),
            fail_connect: AtomicBool::new(false),
            state: Mutex::new(ProviderState::default()),
        }
    }

    /// Makes every following `connect()` fail (or succeed again).
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state().calls.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, ProviderCall::Connect { .. }))
            .count()
    }

    pub fn open_sessions(&self) -> usize {
        self.state().open_sessions
    }

    /// The most sessions that were ever open at the same time.
    pub fn max_open_sessions(&self) -> usize {
        self.state().max_open_sessions
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.state().subscriptions.iter().cloned().collect()
    }

    /// Provider-initiated token rotation, posted to the host like the real SDK would.
    pub fn rotate_token(&self, token: DeviceToken) -> Result<(), NotificationError> {
        debug!(device_token = %token, "Provider rotated token");
        self.events.send(HostEvent::TokenRefreshed(token))
    }

    /// Delivers a data message to the app.
    pub fn deliver_message(
        &self,
        message_id: Option<String>,
        app_data: HashMap<String, String>,
    ) -> Result<(), NotificationError> {
        self.events
            .send(HostEvent::MessageReceived(RemoteMessage::new(message_id, app_data)))
    }

    fn state(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MessagingProvider for SimulatedMessagingProvider {
    fn set_token(&self, token: &DeviceToken, environment: TokenEnvironment) {
        let mut state = self.state();
        state.calls.push(ProviderCall::SetToken {
            token: token.clone(),
            environment,
        });
        state.token = Some((token.clone(), environment));
    }

    fn current_token(&self) -> Option<String> {
        self.state()
            .token
            .as_ref()
            .map(|(token, environment)| format!("{}:{}", environment, token.to_hex()))
    }

    fn connect(&self) -> BoxFuture<'_, (), NotificationError> {
        let result = {
            let mut state = self.state();
            let token = state.token.as_ref().map(|(token, _)| token.clone());
            state.calls.push(ProviderCall::Connect {
                token: token.clone(),
            });

            if self.fail_connect.load(Ordering::SeqCst) {
                Err(connect_failed("simulated provider refused the connection"))
            } else if token.is_none() {
                Err(connect_failed("no token set with the provider"))
            } else {
                state.open_sessions += 1;
                state.max_open_sessions = state.max_open_sessions.max(state.open_sessions);
                Ok(())
            }
        };
        Box::pin(async move { result })
    }

    fn disconnect(&self) {
        let mut state = self.state();
        state.calls.push(ProviderCall::Disconnect);
        state.open_sessions = 0;
    }

    fn subscribe(&self, topic: &str) {
        let mut state = self.state();
        state.calls.push(ProviderCall::Subscribe {
            topic: topic.to_string(),
        });
        if state.subscriptions.insert(topic.to_string()) {
            info!(topic, "Subscribed to topic");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_channel;

    #[tokio::test]
    async fn test_permission_prompt_shown_once() {
        let (sender, _receiver) = event_channel();
        let push = SimulatedPushService::new(
            &sender,
            false,
            RegistrationOutcome::Token(DeviceToken::from("abc123")),
        );

        let first = push.request_authorization(AuthorizationOptions::default()).await;
        let second = push.request_authorization(AuthorizationOptions::default()).await;

        assert_eq!(first, Ok(false));
        assert_eq!(second, Ok(false));
        assert_eq!(push.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_registration_failure_is_posted_as_event() {
        let (sender, mut receiver) = event_channel();
        let push = SimulatedPushService::new(
            &sender,
            true,
            RegistrationOutcome::Failure("no network".to_string()),
        );

        push.register_for_remote_notifications();

        match receiver.try_recv() {
            Some(HostEvent::FailedToRegisterForRemoteNotifications(err)) => {
                assert_eq!(err, registration_failed("no network"))
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(push.registration_requests(), 1);
    }

    #[test]
    fn test_from_config_rejects_bad_token() {
        let (sender, _receiver) = event_channel();
        let config = SimulationConfig {
            device_token: "xyz".to_string(),
            ..SimulationConfig::default()
        };
        assert!(SimulatedPushService::from_config(&sender, &config).is_err());
    }

    #[tokio::test]
    async fn test_provider_refuses_connect_without_token() {
        let (sender, _receiver) = event_channel();
        let provider = SimulatedMessagingProvider::new(&sender);

        let result = provider.connect().await;

        assert!(matches!(result, Err(NotificationError::ConnectFailed(_))));
        assert_eq!(provider.open_sessions(), 0);
        assert_eq!(provider.current_token(), None);
    }

    #[tokio::test]
    async fn test_provider_derives_registration_token() {
        let (sender, _receiver) = event_channel();
        let provider = SimulatedMessagingProvider::new(&sender);

        provider.set_token(&DeviceToken::from("abc123"), TokenEnvironment::Sandbox);

        assert_eq!(
            provider.current_token().as_deref(),
            Some("sandbox:616263313233")
        );
        assert_eq!(provider.connect().await, Ok(()));
        assert_eq!(provider.open_sessions(), 1);
    }

    #[test]
    fn test_repeated_subscribe_keeps_one_subscription() {
        let (sender, _receiver) = event_channel();
        let provider = SimulatedMessagingProvider::new(&sender);

        provider.subscribe("/topics/news");
        provider.subscribe("/topics/news");

        assert_eq!(provider.subscriptions(), vec!["/topics/news".to_string()]);
        assert_eq!(provider.calls().len(), 2);
    }
}
