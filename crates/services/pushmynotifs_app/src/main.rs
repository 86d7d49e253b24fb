// File: services/pushmynotifs_app/src/main.rs
use pushmynotifs_common::{config_error, logging, DeviceToken, NotificationError};
use pushmynotifs_config::{load_config, SimulationConfig};
use pushmynotifs_messaging::{
    event_channel, AppHost, AppLifecycleEvent, EventSender, HostEvent, NotificationRegistrar,
    SimulatedMessagingProvider, SimulatedPushService, TopicView,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// One scripted thing that happens to the app.
#[derive(Debug, Clone, PartialEq)]
enum Step {
    Host(HostEvent),
    RotateToken(DeviceToken),
    DeliverMessage,
}

impl From<AppLifecycleEvent> for Step {
    fn from(event: AppLifecycleEvent) -> Self {
        Step::Host(HostEvent::Lifecycle(event))
    }
}

/// A full app session: launch, use, background, come back, refresh, quit.
fn session_script(simulation: &SimulationConfig) -> Result<Vec<Step>, NotificationError> {
    use AppLifecycleEvent::*;

    let mut steps = vec![
        Step::from(Launch),
        Step::Host(HostEvent::ViewDidLoad),
        Step::from(DidBecomeActive),
        Step::DeliverMessage,
        Step::from(WillResignActive),
        Step::from(DidEnterBackground),
        Step::from(WillEnterForeground),
        Step::from(DidBecomeActive),
    ];
    if let Some(refreshed) = &simulation.refreshed_token {
        steps.push(Step::RotateToken(DeviceToken::from_hex(refreshed)?));
    }
    steps.push(Step::from(WillResignActive));
    steps.push(Step::from(WillTerminate));
    Ok(steps)
}

fn post(
    step: Step,
    sender: &EventSender,
    messaging: &SimulatedMessagingProvider,
) -> Result<(), NotificationError> {
    match step {
        Step::Host(event) => sender.send(event),
        Step::RotateToken(token) => messaging.rotate_token(token),
        Step::DeliverMessage => {
            let mut data = HashMap::new();
            data.insert("headline".to_string(), "Hello from the news topic".to_string());
            messaging.deliver_message(Some("0:1".to_string()), data)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config().map_err(config_error)?;
    let _log_guard = logging::init_from_config(&config.logging);
    info!(app = %config.app.name, environment = %config.messaging.token_environment, "Starting");

    let (sender, receiver) = event_channel();
    let push = Arc::new(SimulatedPushService::from_config(
        &sender,
        &config.simulation,
    )?);
    let messaging = Arc::new(SimulatedMessagingProvider::new(&sender));
    messaging.set_fail_connect(config.simulation.fail_connect);

    let registrar = NotificationRegistrar::new(push.clone(), messaging.clone(), config.messaging.clone());
    let view = TopicView::new(config.messaging.topic.clone(), messaging.clone());
    let mut host = AppHost::new(registrar, receiver).with_view(view);

    let delay = Duration::from_millis(config.simulation.step_delay_ms);
    for step in session_script(&config.simulation)? {
        post(step, &sender, &messaging)?;
        if !host.drain().await {
            break;
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let context = host.registrar().context();
    info!(
        device_token = ?context.token(),
        session = ?context.session(),
        provider_calls = messaging.calls().len(),
        connects = messaging.connect_count(),
        prompts = push.prompt_count(),
        subscriptions = ?messaging.subscriptions(),
        "Session finished"
    );
    Ok(())
}
