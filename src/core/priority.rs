//! Named update priorities.

use serde::{Deserialize, Serialize};

/// Well-known listener priorities, highest first.
///
/// Listeners with a higher numeric priority run earlier within a tick. Any
/// `i32` is accepted by the ticker; these are the values used by convention.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePriority {
    /// Utility work that should run after everything else.
    Utility = -50,
    /// Low priority, e.g. rendering.
    Low = -25,
    /// Default priority.
    #[default]
    Normal = 0,
    /// High priority, e.g. animation updates.
    High = 25,
    /// Interaction handling, runs first.
    Interaction = 50,
}

impl UpdatePriority {
    /// Numeric value of the priority.
    pub const fn value(self) -> i32 {
        self as i32
    }
}

impl From<UpdatePriority> for i32 {
    fn from(priority: UpdatePriority) -> Self {
        priority.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(UpdatePriority::Interaction > UpdatePriority::High);
        assert!(UpdatePriority::High > UpdatePriority::Normal);
        assert!(UpdatePriority::Normal > UpdatePriority::Low);
        assert!(UpdatePriority::Low > UpdatePriority::Utility);
    }

    #[test]
    fn test_priority_values() {
        assert_eq!(i32::from(UpdatePriority::Interaction), 50);
        assert_eq!(i32::from(UpdatePriority::High), 25);
        assert_eq!(i32::from(UpdatePriority::Normal), 0);
        assert_eq!(i32::from(UpdatePriority::Low), -25);
        assert_eq!(UpdatePriority::Utility.value(), -50);
        assert_eq!(UpdatePriority::default(), UpdatePriority::Normal);
    }

    #[test]
    fn test_priority_serde() {
        let json = serde_json::to_string(&UpdatePriority::Interaction).unwrap();
        assert_eq!(json, "\"interaction\"");
        let back: UpdatePriority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(back, UpdatePriority::Low);
    }
}
