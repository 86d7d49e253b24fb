//! The host event stream and the registration event interface.
//!
//! Everything the OS or the messaging provider reports back arrives as a
//! [`HostEvent`] on one channel. The host runtime drains that channel and
//! invokes [`RegistrationEvents`] on the registrar, which keeps the registrar
//! independent of how callbacks are scheduled.

use crate::lifecycle::AppLifecycleEvent;
use pushmynotifs_common::{DeviceToken, NotificationError, RemoteMessage};
use std::future::Future;
use std::pin::Pin;
use tokio::sync::mpsc;

/// Future returned by event handlers that have to await the provider.
pub type EventFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Everything that can happen to the app from the outside.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Lifecycle(AppLifecycleEvent),
    /// The topic screen finished loading
    ViewDidLoad,
    RegisteredForRemoteNotifications(DeviceToken),
    FailedToRegisterForRemoteNotifications(NotificationError),
    TokenRefreshed(DeviceToken),
    MessageReceived(RemoteMessage),
}

impl From<AppLifecycleEvent> for HostEvent {
    fn from(event: AppLifecycleEvent) -> Self {
        HostEvent::Lifecycle(event)
    }
}

/// Callbacks the host runtime invokes on the registrar.
pub trait RegistrationEvents {
    /// The OS issued a device token.
    fn on_token(&mut self, token: DeviceToken);

    /// The OS could not issue a device token.
    fn on_registration_error(&mut self, error: NotificationError);

    /// A new token superseded the previous one.
    fn on_token_refresh(&mut self, token: DeviceToken) -> EventFuture<'_>;
}

/// Posting half of the host event stream. Cheap to clone.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<HostEvent>);

impl EventSender {
    pub fn send(&self, event: impl Into<HostEvent>) -> Result<(), NotificationError> {
        self.0
            .send(event.into())
            .map_err(|_| NotificationError::ChannelClosed)
    }

    /// A handle that posts without keeping the stream open.
    pub fn downgrade(&self) -> WeakEventSender {
        WeakEventSender(self.0.downgrade())
    }
}

/// Posting handle held by collaborators living inside the host.
///
/// The host owns those collaborators, so a strong sender there would keep the
/// stream open forever. Posting fails with `ChannelClosed` once every
/// `EventSender` is gone.
#[derive(Debug, Clone)]
pub struct WeakEventSender(mpsc::WeakUnboundedSender<HostEvent>);

impl WeakEventSender {
    pub fn send(&self, event: impl Into<HostEvent>) -> Result<(), NotificationError> {
        let sender = self.0.upgrade().ok_or(NotificationError::ChannelClosed)?;
        sender
            .send(event.into())
            .map_err(|_| NotificationError::ChannelClosed)
    }
}

/// Receiving half of the host event stream, owned by the host runtime.
#[derive(Debug)]
pub struct EventReceiver(mpsc::UnboundedReceiver<HostEvent>);

impl EventReceiver {
    /// Waits for the next event; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        self.0.recv().await
    }

    /// Takes the next queued event without waiting.
    pub fn try_recv(&mut self) -> Option<HostEvent> {
        self.0.try_recv().ok()
    }
}

pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender(tx), EventReceiver(rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_send_order() {
        let (sender, mut receiver) = event_channel();
        sender.send(AppLifecycleEvent::Launch).unwrap();
        sender
            .send(HostEvent::RegisteredForRemoteNotifications(DeviceToken::from("abc123")))
            .unwrap();

        assert!(matches!(
            receiver.recv().await,
            Some(HostEvent::Lifecycle(AppLifecycleEvent::Launch))
        ));
        assert!(matches!(
            receiver.try_recv(),
            Some(HostEvent::RegisteredForRemoteNotifications(_))
        ));
        assert!(receiver.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_send_after_receiver_dropped_reports_closed_channel() {
        let (sender, receiver) = event_channel();
        drop(receiver);
        assert_eq!(
            sender.send(AppLifecycleEvent::DidBecomeActive),
            Err(NotificationError::ChannelClosed)
        );
    }

    #[tokio::test]
    async fn test_weak_sender_does_not_keep_stream_open() {
        let (sender, mut receiver) = event_channel();
        let weak = sender.downgrade();

        weak.send(AppLifecycleEvent::Launch).unwrap();
        drop(sender);

        assert!(matches!(
            receiver.recv().await,
            Some(HostEvent::Lifecycle(AppLifecycleEvent::Launch))
        ));
        assert!(receiver.recv().await.is_none());
        assert_eq!(
            weak.send(AppLifecycleEvent::DidBecomeActive),
            Err(NotificationError::ChannelClosed)
        );
    }
}
