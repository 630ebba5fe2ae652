//! Dashboard state machine (resolve → fetch → ready).
//!
//! Transitions are pure; the controller decides *whether* a message is
//! allowed to drive a transition (stale generations never reach here).

/// Where the dashboard is in its current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardState {
    #[default]
    Idle,
    Resolving,
    Fetching,
    Ready,
    Error,
}

impl DashboardState {
    /// True while a query is in flight.
    pub fn is_busy(self) -> bool {
        matches!(self, DashboardState::Resolving | DashboardState::Fetching)
    }

    /// State after a search, suggestion pick, or device-location request.
    ///
    /// Allowed from every state; a newer query supersedes an in-flight one.
    pub fn on_request(self) -> Self {
        DashboardState::Resolving
    }

    /// State after the location has been resolved.
    pub fn on_resolved(self) -> Self {
        match self {
            DashboardState::Resolving => DashboardState::Fetching,
            other => other,
        }
    }

    /// State after the view-model has been built.
    pub fn on_ready(self) -> Self {
        match self {
            DashboardState::Fetching => DashboardState::Ready,
            other => other,
        }
    }

    /// State after a resolve or fetch failure.
    pub fn on_failure(self) -> Self {
        match self {
            DashboardState::Resolving | DashboardState::Fetching => DashboardState::Error,
            other => other,
        }
    }

    /// State after the error banner timed out.
    pub fn on_error_expired(self) -> Self {
        match self {
            DashboardState::Error => DashboardState::Idle,
            other => other,
        }
    }
}

impl std::fmt::Display for DashboardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DashboardState::Idle => "idle",
            DashboardState::Resolving => "resolving",
            DashboardState::Fetching => "fetching",
            DashboardState::Ready => "ready",
            DashboardState::Error => "error",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path() {
        let s = DashboardState::Idle.on_request();
        assert_eq!(s, DashboardState::Resolving);
        let s = s.on_resolved();
        assert_eq!(s, DashboardState::Fetching);
        let s = s.on_ready();
        assert_eq!(s, DashboardState::Ready);
    }

    #[test]
    fn request_is_reentrant() {
        for s in [
            DashboardState::Idle,
            DashboardState::Resolving,
            DashboardState::Fetching,
            DashboardState::Ready,
            DashboardState::Error,
        ] {
            assert_eq!(s.on_request(), DashboardState::Resolving);
        }
    }

    #[test]
    fn failure_only_from_busy_states() {
        assert_eq!(DashboardState::Resolving.on_failure(), DashboardState::Error);
        assert_eq!(DashboardState::Fetching.on_failure(), DashboardState::Error);
        assert_eq!(DashboardState::Ready.on_failure(), DashboardState::Ready);
        assert_eq!(DashboardState::Idle.on_failure(), DashboardState::Idle);
    }

    #[test]
    fn ready_requires_fetching() {
        assert_eq!(DashboardState::Resolving.on_ready(), DashboardState::Resolving);
        assert_eq!(DashboardState::Idle.on_resolved(), DashboardState::Idle);
    }

    #[test]
    fn error_expiry_returns_to_idle() {
        assert_eq!(DashboardState::Error.on_error_expired(), DashboardState::Idle);
        assert_eq!(
            DashboardState::Resolving.on_error_expired(),
            DashboardState::Resolving
        );
    }

    #[test]
    fn busy_states() {
        assert!(DashboardState::Resolving.is_busy());
        assert!(DashboardState::Fetching.is_busy());
        assert!(!DashboardState::Ready.is_busy());
        assert!(!DashboardState::Error.is_busy());
    }
}
