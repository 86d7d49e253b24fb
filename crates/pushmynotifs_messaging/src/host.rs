//! Host runtime: the single event loop that drives the registrar.
//!
//! Events are handled strictly one after another, so the registrar is only
//! ever mutated from here and needs no locking.

use crate::events::{EventReceiver, HostEvent, RegistrationEvents};
use crate::lifecycle::AppLifecycleEvent;
use crate::registrar::{NotificationRegistrar, RegistrarContext};
use crate::topics::TopicView;
use tracing::{debug, info, warn};

pub struct AppHost {
    registrar: NotificationRegistrar,
    receiver: EventReceiver,
    view: Option<TopicView>,
    terminated: bool,
}

impl AppHost {
    pub fn new(registrar: NotificationRegistrar, receiver: EventReceiver) -> Self {
        Self {
            registrar,
            receiver,
            view: None,
            terminated: false,
        }
    }

    pub fn with_view(mut self, view: TopicView) -> Self {
        self.view = Some(view);
        self
    }

    pub fn registrar(&self) -> &NotificationRegistrar {
        &self.registrar
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Handles one event. Returns `false` once the app has terminated.
    pub async fn dispatch(&mut self, event: HostEvent) -> bool {
        if self.terminated {
            warn!(?event, "Event after termination dropped");
            return false;
        }
        debug!(?event, "Dispatching host event");

        match event {
            HostEvent::Lifecycle(lifecycle) => {
                self.registrar.handle_lifecycle(lifecycle).await;
                if lifecycle == AppLifecycleEvent::WillTerminate {
                    self.terminated = true;
                    return false;
                }
            }
            HostEvent::ViewDidLoad => match &self.view {
                Some(view) => view.did_load(),
                None => debug!("No view attached"),
            },
            HostEvent::RegisteredForRemoteNotifications(token) => self.registrar.on_token(token),
            HostEvent::FailedToRegisterForRemoteNotifications(error) => {
                self.registrar.on_registration_error(error)
            }
            HostEvent::TokenRefreshed(token) => {
                if self.registrar.context().is_observing_token_refresh() {
                    self.registrar.on_token_refresh(token).await;
                } else {
                    debug!(device_token = %token, "Token refresh before launch ignored");
                }
            }
            HostEvent::MessageReceived(message) => self.registrar.on_message_received(&message),
        }
        true
    }

    /// Handles every event already queued, without waiting for more.
    ///
    /// Events posted while draining are handled in the same pass.
    pub async fn drain(&mut self) -> bool {
        while let Some(event) = self.receiver.try_recv() {
            if !self.dispatch(event).await {
                return false;
            }
        }
        !self.terminated
    }

    /// Runs until the app terminates or every sender is dropped.
    pub async fn run(mut self) -> RegistrarContext {
        while let Some(event) = self.receiver.recv().await {
            if !self.dispatch(event).await {
                break;
            }
        }
        info!(
            session = ?self.registrar.context().session(),
            "Host event loop finished"
        );
        self.registrar.context().clone()
    }
}
