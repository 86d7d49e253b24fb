// --- File: crates/pushmynotifs_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General App Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppSection {
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "PushMyNotifs".to_string()
}

/// Which push gateway the device token was issued for.
///
/// Handed to the messaging provider together with the token so it can route
/// deliveries to the matching gateway.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl std::fmt::Display for TokenEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenEnvironment::Sandbox => write!(f, "sandbox"),
            TokenEnvironment::Production => write!(f, "production"),
        }
    }
}

/// Presentation capabilities requested from the OS when asking for permission.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    #[serde(default = "enabled")]
    pub alert: bool,
    #[serde(default = "enabled")]
    pub badge: bool,
    #[serde(default = "enabled")]
    pub sound: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            alert: true,
            badge: true,
            sound: true,
        }
    }
}

fn enabled() -> bool {
    true
}

// --- Messaging Provider Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MessagingConfig {
    #[serde(default)]
    pub token_environment: TokenEnvironment,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default)]
    pub authorization: AuthorizationOptions,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            token_environment: TokenEnvironment::default(),
            topic: default_topic(),
            authorization: AuthorizationOptions::default(),
        }
    }
}

fn default_topic() -> String {
    "/topics/news".to_string()
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    // Daily rolling log files are written here when set
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

// --- Simulation Config ---
// Drives the in-process OS push service and messaging provider used by the demo host.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SimulationConfig {
    #[serde(default = "default_device_token")]
    pub device_token: String, // hex encoded
    #[serde(default)]
    pub refreshed_token: Option<String>, // hex encoded
    #[serde(default = "enabled")]
    pub grant_permission: bool,
    #[serde(default)]
    pub fail_registration: Option<String>, // failure reason reported by the OS
    #[serde(default)]
    pub fail_connect: bool,
    #[serde(default)]
    pub step_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            device_token: default_device_token(),
            refreshed_token: None,
            grant_permission: true,
            fail_registration: None,
            fail_connect: false,
            step_delay_ms: 0,
        }
    }
}

fn default_device_token() -> String {
    "616263313233".to_string()
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub messaging: MessagingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}
