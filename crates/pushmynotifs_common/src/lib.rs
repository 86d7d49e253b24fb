// --- File: crates/pushmynotifs_common/src/lib.rs ---

pub mod error;    // Error handling
pub mod logging;  // Logging utilities
pub mod models;   // Shared data structures
pub mod services; // Collaborator abstractions

pub use error::{config_error, connect_failed, registration_failed, NotificationError};

pub use logging::{init_from_config, init_with_level, log_error};

pub use models::{
    AuthorizationOptions, DeviceToken, RemoteMessage, SessionState, TokenEnvironment,
};

pub use services::{BoxFuture, MessagingProvider, PushService};
