//! Panel activation state
//!
//! ```text
//! Inactive --activate--> Active
//! Active   --another panel activates--> Inactive
//! ```
//!
//! `disabled` is a separate flag on the panel; it blocks `Inactive -> Active`
//! and nothing else.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelState {
    #[default]
    Inactive,
    Active,
}

impl PanelState {
    pub fn is_active(&self) -> bool {
        matches!(self, PanelState::Active)
    }

    /// Whether a panel in this state may move to `target`. Only activation
    /// depends on the panel's `disabled` flag.
    pub fn can_transition_to(&self, target: PanelState, disabled: bool) -> bool {
        match (self, target) {
            (PanelState::Inactive, PanelState::Active) => !disabled,
            (PanelState::Active, PanelState::Inactive) => true,
            (a, b) => *a == b,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelState::Inactive => "inactive",
            PanelState::Active => "active",
        }
    }
}

impl std::fmt::Display for PanelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PanelState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inactive" => Ok(PanelState::Inactive),
            "active" => Ok(PanelState::Active),
            _ => Err(format!("Unknown panel state: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Active".parse::<PanelState>().unwrap(), PanelState::Active);
        assert_eq!(PanelState::Inactive.to_string(), "inactive");
        assert!("frozen".parse::<PanelState>().is_err());
    }

    #[test]
    fn test_transitions() {
        assert!(PanelState::Inactive.can_transition_to(PanelState::Active, false));
        assert!(!PanelState::Inactive.can_transition_to(PanelState::Active, true));
        // A disabled panel can still be deactivated
        assert!(PanelState::Active.can_transition_to(PanelState::Inactive, true));
        assert!(PanelState::Active.can_transition_to(PanelState::Active, true));
    }
}
