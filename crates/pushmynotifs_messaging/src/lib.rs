//! Push notification registration for PushMyNotifs
//!
//! This crate owns the device's registration lifecycle with a cloud messaging
//! provider: permission request, OS push registration, device token
//! forwarding, and a messaging session that follows the app's
//! foreground/background state.
//!
//! # Features
//!
//! - `NotificationRegistrar` holding token and session state in an explicit context
//! - `AppHost`, a single event loop fed by the OS and the provider through one channel
//! - Session reconnect on device token refresh
//! - Topic subscription from the app's view
//! - Simulated OS push service and messaging provider for the demo host and tests
//!
//! # Example
//!
//! ```rust,no_run
//! use pushmynotifs_config::AppConfig;
//! use pushmynotifs_messaging::{
//!     event_channel, AppHost, AppLifecycleEvent, NotificationRegistrar,
//!     SimulatedMessagingProvider, SimulatedPushService,
//! };
//! use std::sync::Arc;
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::default();
//!     let (sender, receiver) = event_channel();
//!     let push = Arc::new(SimulatedPushService::from_config(&sender, &config.simulation)?);
//!     let messaging = Arc::new(SimulatedMessagingProvider::new(&sender));
//!     let registrar = NotificationRegistrar::new(push, messaging, config.messaging);
//!
//!     let mut host = AppHost::new(registrar, receiver);
//!     sender.send(AppLifecycleEvent::Launch)?;
//!     host.drain().await; // also handles the token the OS posts back
//!     sender.send(AppLifecycleEvent::DidBecomeActive)?;
//!     host.drain().await;
//!     Ok(())
//! }
//! ```

pub mod events;
pub mod host;
pub mod lifecycle;
pub mod registrar;
pub mod simulated;
pub mod topics;


pub use events::{
    event_channel, EventFuture, EventReceiver, EventSender, HostEvent, RegistrationEvents,
    WeakEventSender,
};
pub use host::AppHost;
pub use lifecycle::AppLifecycleEvent;
pub use registrar::{NotificationRegistrar, RegistrarContext};
pub use simulated::{ProviderCall, RegistrationOutcome, SimulatedMessagingProvider, SimulatedPushService};
pub use topics::TopicView;
