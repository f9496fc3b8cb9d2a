use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Opaque per-connection handle, minted when a connection is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(Ulid);

impl ParticipantId {
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for ParticipantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Connection lifecycle of a participant
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    Connecting,
    Active,
    Closing,
    Closed,
}

impl Lifecycle {
    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(self, next: Lifecycle) -> bool {
        matches!(
            (self, next),
            (Lifecycle::Connecting, Lifecycle::Active)
                | (Lifecycle::Connecting, Lifecycle::Closing)
                | (Lifecycle::Active, Lifecycle::Closing)
                | (Lifecycle::Closing, Lifecycle::Closed)
        )
    }
}

/// What to do after a participant sends a payload we do not relay (binary frames)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPayloadPolicy {
    /// Broadcast a notice naming the sender and keep the connection open
    #[default]
    Notify,
    /// Broadcast the notice, then close the connection
    Disconnect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_ids_are_unique() {
        let a = ParticipantId::new();
        let b = ParticipantId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 26);
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(Lifecycle::Connecting.can_transition_to(Lifecycle::Active));
        assert!(Lifecycle::Active.can_transition_to(Lifecycle::Closing));
        assert!(Lifecycle::Closing.can_transition_to(Lifecycle::Closed));

        assert!(!Lifecycle::Active.can_transition_to(Lifecycle::Connecting));
        assert!(!Lifecycle::Closed.can_transition_to(Lifecycle::Active));
        assert!(!Lifecycle::Active.can_transition_to(Lifecycle::Closed));
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&UnsupportedPayloadPolicy::Disconnect).unwrap();
        assert_eq!(json, "\"disconnect\"");
        assert_eq!(UnsupportedPayloadPolicy::default(), UnsupportedPayloadPolicy::Notify);
    }
}
