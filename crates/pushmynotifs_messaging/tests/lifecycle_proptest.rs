//! Property tests over arbitrary event sequences.

mod fixtures;

use fixtures::create_test_app;
use proptest::prelude::*;
use pushmynotifs_common::{registration_failed, DeviceToken, SessionState};
use pushmynotifs_messaging::{AppLifecycleEvent, HostEvent, ProviderCall, RegistrationOutcome};

#[derive(Debug, Clone)]
enum Step {
    Lifecycle(AppLifecycleEvent),
    Registered(u8),
    RegistrationFailed,
    Refreshed(u8),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => prop::sample::select(AppLifecycleEvent::ALL.to_vec()).prop_map(Step::Lifecycle),
        1 => (0u8..4).prop_map(Step::Registered),
        1 => Just(Step::RegistrationFailed),
        1 => (0u8..4).prop_map(Step::Refreshed),
    ]
}

fn to_event(step: &Step) -> HostEvent {
    match step {
        Step::Lifecycle(event) => HostEvent::Lifecycle(*event),
        Step::Registered(n) => {
            HostEvent::RegisteredForRemoteNotifications(DeviceToken::new(vec![*n + 1]))
        }
        Step::RegistrationFailed => {
            HostEvent::FailedToRegisterForRemoteNotifications(registration_failed("offline"))
        }
        Step::Refreshed(n) => HostEvent::TokenRefreshed(DeviceToken::new(vec![*n + 100])),
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn session_invariants_hold_for_any_event_sequence(
        steps in prop::collection::vec(step_strategy(), 0..40),
        os_fails in any::<bool>(),
    ) {
        let outcome = if os_fails {
            RegistrationOutcome::Failure("offline".to_string())
        } else {
            RegistrationOutcome::Token(DeviceToken::from("abc123"))
        };

        runtime().block_on(async {
            let mut app = create_test_app(outcome);
            for step in &steps {
                app.sender.send(to_event(step)).unwrap();
                if !app.host.drain().await {
                    break;
                }
            }

            let calls = app.provider.calls();
            let mut token_seen = false;
            for (i, call) in calls.iter().enumerate() {
                match call {
                    ProviderCall::SetToken { .. } => token_seen = true,
                    ProviderCall::Connect { token } => {
                        // never connect without a token
                        prop_assert!(token_seen);
                        prop_assert!(token.is_some());
                        // always closed first
                        prop_assert!(i > 0 && calls[i - 1] == ProviderCall::Disconnect);
                    }
                    _ => {}
                }
            }
            prop_assert!(app.provider.max_open_sessions() <= 1);

            if app.host.is_terminated() {
                prop_assert_eq!(calls.last(), Some(&ProviderCall::Disconnect));
                prop_assert_eq!(
                    app.host.registrar().context().session(),
                    SessionState::Disconnected
                );
            }
            Ok(())
        })?;
    }

    #[test]
    fn refresh_after_launch_connects_exactly_once(n in 0u8..4) {
        runtime().block_on(async {
            let mut app = create_test_app(RegistrationOutcome::Token(DeviceToken::from("abc123")));
            app.sender.send(AppLifecycleEvent::Launch).unwrap();
            app.host.drain().await;
            let before = app.provider.connect_count();

            app.sender.send(HostEvent::TokenRefreshed(DeviceToken::new(vec![n]))).unwrap();
            app.host.drain().await;

            prop_assert_eq!(app.provider.connect_count(), before + 1);
            Ok(())
        })?;
    }
}
