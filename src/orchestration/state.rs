use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a single-use orchestrator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    /// Constructed, no tasks submitted
    #[default]
    Idle,
    /// Tasks submitted, waiting for the pool to drain
    Running,
    /// Every task reported before the shutdown timeout
    Terminated,
    /// Pool was force-cancelled by timeout or interruption
    ForcedShutdown,
}

impl OrchestratorState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated | Self::ForcedShutdown)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Idle → Running → (Terminated | ForcedShutdown); nothing leads back to Idle
    pub fn can_transition_to(&self, next: OrchestratorState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running)
                | (Self::Running, Self::Terminated)
                | (Self::Running, Self::ForcedShutdown)
        )
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Terminated => write!(f, "terminated"),
            Self::ForcedShutdown => write!(f, "forced_shutdown"),
        }
    }
}

impl std::str::FromStr for OrchestratorState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "terminated" => Ok(Self::Terminated),
            "forced_shutdown" => Ok(Self::ForcedShutdown),
            _ => Err(format!("Invalid orchestrator state: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_check() {
        assert!(OrchestratorState::Terminated.is_terminal());
        assert!(OrchestratorState::ForcedShutdown.is_terminal());
        assert!(!OrchestratorState::Idle.is_terminal());
        assert!(!OrchestratorState::Running.is_terminal());
    }

    #[test]
    fn test_transitions_never_return_to_idle() {
        use OrchestratorState::*;
        let all = [Idle, Running, Terminated, ForcedShutdown];
        for from in all {
            assert!(!from.can_transition_to(Idle));
        }
        assert!(Idle.can_transition_to(Running));
        assert!(Running.can_transition_to(Terminated));
        assert!(Running.can_transition_to(ForcedShutdown));
        assert!(!Idle.can_transition_to(Terminated));
        assert!(!Terminated.can_transition_to(ForcedShutdown));
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(OrchestratorState::default(), OrchestratorState::Idle);
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(OrchestratorState::ForcedShutdown.to_string(), "forced_shutdown");
        assert_eq!(
            "running".parse::<OrchestratorState>().unwrap(),
            OrchestratorState::Running
        );
        assert!("paused".parse::<OrchestratorState>().is_err());
    }

    #[test]
    fn test_state_serde() {
        let json = serde_json::to_string(&OrchestratorState::ForcedShutdown).unwrap();
        assert_eq!(json, "\"forced_shutdown\"");
        let parsed: OrchestratorState = serde_json::from_str("\"terminated\"").unwrap();
        assert_eq!(parsed, OrchestratorState::Terminated);
    }
}
