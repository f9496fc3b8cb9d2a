//! Broadcast fan-out over the registry
//!
//! A broadcast holds the registry lock for the whole sweep, so it is
//! serialized with joins, leaves and other broadcasts. Each recipient gets
//! exactly one non-blocking delivery attempt; a failed attempt is logged and
//! the sweep moves on. Failing recipients stay registered until their own
//! read loop notices the dead connection.

use std::sync::Arc;

use crate::protocol::{self, Outbound};
use crate::registry::{Members, Recipient, Registry};
use crate::types::ParticipantId;

/// Outcome of one delivery sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Deliver `line` to every member except `sender`. With no sender (a system
/// message) every member receives it. Caller must hold the registry lock.
pub fn sweep(members: &Members, line: &str, sender: Option<ParticipantId>) -> Delivery {
    let frame = Outbound::line(line);
    let mut delivery = Delivery::default();

    for recipient in members.iter() {
        if sender == Some(recipient.id) {
            continue;
        }
        delivery.attempted += 1;
        match recipient.deliver(frame.clone()) {
            Ok(()) => delivery.delivered += 1,
            Err(e) => {
                delivery.failed += 1;
                tracing::warn!(participant = %recipient.id, error = %e, "Delivery failed");
            }
        }
    }

    delivery
}

/// Routes chat lines and system notices to registered participants
#[derive(Debug, Clone, Default)]
pub struct Router {
    registry: Arc<Registry>,
}

impl Router {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Deliver `line` to everyone but `sender` (everyone when `sender` is None)
    pub async fn broadcast(&self, line: &str, sender: Option<ParticipantId>) -> Delivery {
        let members = self.registry.lock().await;
        let delivery = sweep(&members, line, sender);
        tracing::debug!(
            recipients = delivery.attempted,
            failed = delivery.failed,
            "Broadcast"
        );
        delivery
    }

    /// Send the current live count to every participant
    pub async fn broadcast_presence(&self) -> Delivery {
        let members = self.registry.lock().await;
        presence_sweep(&members)
    }

    /// Register a participant and announce the new count in the same critical
    /// section. Returns the count after joining.
    pub async fn join(&self, recipient: Recipient) -> usize {
        let id = recipient.id;
        let mut members = self.registry.lock().await;
        if !members.insert(recipient) {
            tracing::warn!(participant = %id, "Participant already registered");
        }
        presence_sweep(&members);
        members.count()
    }

    /// Unregister a participant, then announce the new count and its departure
    /// in the same critical section. Does nothing if it was not registered.
    pub async fn leave(&self, id: &ParticipantId, name: &str) -> Option<usize> {
        let mut members = self.registry.lock().await;
        if !members.remove(id) {
            tracing::debug!(participant = %id, "Leave for unregistered participant ignored");
            return None;
        }
        presence_sweep(&members);
        sweep(&members, &protocol::left_notice(name), None);
        Some(members.count())
    }

    pub async fn count(&self) -> usize {
        self.registry.count().await
    }
}

fn presence_sweep(members: &Members) -> Delivery {
    let count = members.count();
    tracing::debug!(count, "Presence update");
    sweep(members, &protocol::presence(count), None)
}
