//! Test fixtures for host runtime tests
//!
//! Builds a complete host wired to the simulated OS push service and
//! messaging provider.

#![allow(dead_code)]

use pushmynotifs_config::MessagingConfig;
use pushmynotifs_messaging::{
    event_channel, AppHost, EventSender, NotificationRegistrar, RegistrationOutcome,
    SimulatedMessagingProvider, SimulatedPushService, TopicView,
};
use std::sync::Arc;

pub struct TestApp {
    pub host: AppHost,
    pub sender: EventSender,
    pub push: Arc<SimulatedPushService>,
    pub provider: Arc<SimulatedMessagingProvider>,
}

/// Creates a host whose OS registration answers with `outcome`.
pub fn create_test_app(outcome: RegistrationOutcome) -> TestApp {
    create_test_app_with_config(outcome, MessagingConfig::default())
}

pub fn create_test_app_with_config(
    outcome: RegistrationOutcome,
    config: MessagingConfig,
) -> TestApp {
    let (sender, receiver) = event_channel();
    let push = Arc::new(SimulatedPushService::new(&sender, true, outcome));
    let provider = Arc::new(SimulatedMessagingProvider::new(&sender));
    let view = TopicView::new(config.topic.clone(), provider.clone());
    let registrar = NotificationRegistrar::new(push.clone(), provider.clone(), config);

    TestApp {
        host: AppHost::new(registrar, receiver).with_view(view),
        sender,
        push,
        provider,
    }
}
