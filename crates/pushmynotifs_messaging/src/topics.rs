//! The app's single screen, which subscribes this install to a broadcast topic.

use pushmynotifs_common::MessagingProvider;
use std::sync::Arc;
use tracing::debug;

pub struct TopicView {
    topic: String,
    messaging: Arc<dyn MessagingProvider>,
}

impl TopicView {
    pub fn new(topic: impl Into<String>, messaging: Arc<dyn MessagingProvider>) -> Self {
        Self {
            topic: topic.into(),
            messaging,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Called once the view is on screen.
    pub fn did_load(&self) {
        debug!(topic = %self.topic, "Topic view loaded");
        self.messaging.subscribe(&self.topic);
    }
}
