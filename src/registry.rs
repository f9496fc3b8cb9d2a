//! Connection registry
//!
//! The set of participants whose read loop is still running, behind one
//! mutex. Every read or mutation of membership, the live counter included,
//! happens while that mutex is held. There is no second lock.

use std::collections::HashMap;
use tokio::sync::{mpsc, Mutex, MutexGuard};

use crate::error::DeliveryError;
use crate::protocol::Outbound;
use crate::types::ParticipantId;

/// Delivery endpoint of one participant: its id plus the sending half of its
/// outbound queue. Cloning shares the same queue.
#[derive(Debug, Clone)]
pub struct Recipient {
    pub id: ParticipantId,
    tx: mpsc::Sender<Outbound>,
}

impl Recipient {
    pub fn new(id: ParticipantId, tx: mpsc::Sender<Outbound>) -> Self {
        Self { id, tx }
    }

    /// Create a recipient with a fresh id and an outbound queue of `capacity`
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(ParticipantId::new(), tx), rx)
    }

    /// Queue a frame without waiting
    pub fn deliver(&self, frame: Outbound) -> Result<(), DeliveryError> {
        self.tx.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Full,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Membership as seen while the registry lock is held
#[derive(Debug, Default)]
pub struct Members {
    recipients: HashMap<ParticipantId, Recipient>,
    live: usize,
}

impl Members {
    /// Insert a participant. Returns false if the handle was already present.
    pub fn insert(&mut self, recipient: Recipient) -> bool {
        if self.recipients.contains_key(&recipient.id) {
            return false;
        }
        self.recipients.insert(recipient.id, recipient);
        self.live += 1;
        true
    }

    /// Remove a participant. Removing an absent handle is a no-op.
    pub fn remove(&mut self, id: &ParticipantId) -> bool {
        if self.recipients.remove(id).is_some() {
            self.live = self.live.saturating_sub(1);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.recipients.contains_key(id)
    }

    pub fn count(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.values()
    }
}

/// Shared registry of active participants
#[derive(Debug, Default)]
pub struct Registry {
    members: Mutex<Members>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the registry lock. Membership cannot change until the guard drops.
    pub async fn lock(&self) -> MutexGuard<'_, Members> {
        self.members.lock().await
    }

    pub async fn register(&self, recipient: Recipient) -> bool {
        let id = recipient.id;
        let inserted = self.lock().await.insert(recipient);
        if !inserted {
            tracing::warn!(participant = %id, "Participant already registered");
        }
        inserted
    }

    pub async fn unregister(&self, id: &ParticipantId) -> bool {
        self.lock().await.remove(id)
    }

    pub async fn count(&self) -> usize {
        self.lock().await.count()
    }

    pub async fn contains(&self, id: &ParticipantId) -> bool {
        self.lock().await.contains(id)
    }
}
