//! Process lifecycle hooks delivered by the host application runtime.

use std::fmt;

/// One transition of the application process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppLifecycleEvent {
    Launch,
    WillResignActive,
    DidEnterBackground,
    WillEnterForeground,
    DidBecomeActive,
    WillTerminate,
}

impl AppLifecycleEvent {
    pub const ALL: [AppLifecycleEvent; 6] = [
        AppLifecycleEvent::Launch,
        AppLifecycleEvent::WillResignActive,
        AppLifecycleEvent::DidEnterBackground,
        AppLifecycleEvent::WillEnterForeground,
        AppLifecycleEvent::DidBecomeActive,
        AppLifecycleEvent::WillTerminate,
    ];

    /// Whether this transition closes the messaging session.
    pub fn closes_session(self) -> bool {
        matches!(
            self,
            AppLifecycleEvent::DidEnterBackground | AppLifecycleEvent::WillTerminate
        )
    }

    /// Whether this transition (re)opens the messaging session.
    pub fn opens_session(self) -> bool {
        matches!(
            self,
            AppLifecycleEvent::WillEnterForeground | AppLifecycleEvent::DidBecomeActive
        )
    }
}

impl fmt::Display for AppLifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppLifecycleEvent::Launch => "launch",
            AppLifecycleEvent::WillResignActive => "will_resign_active",
            AppLifecycleEvent::DidEnterBackground => "did_enter_background",
            AppLifecycleEvent::WillEnterForeground => "will_enter_foreground",
            AppLifecycleEvent::DidBecomeActive => "did_become_active",
            AppLifecycleEvent::WillTerminate => "will_terminate",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions_are_disjoint() {
        for event in AppLifecycleEvent::ALL {
            assert!(!(event.opens_session() && event.closes_session()), "{event}");
        }
        assert!(!AppLifecycleEvent::Launch.opens_session());
        assert!(!AppLifecycleEvent::WillResignActive.closes_session());
    }
}
