//! Per-connection participant state
//!
//! A `Participant` lives exactly as long as its connection's read loop and is
//! only touched from that connection's task. Other participants reach it
//! solely through the registry, by queueing frames on its outbound channel.

use tokio::sync::mpsc;

use crate::broadcast::Router;
use crate::protocol::{self, Outbound};
use crate::registry::Recipient;
use crate::types::{Lifecycle, ParticipantId};

#[derive(Debug)]
pub struct Participant {
    recipient: Recipient,
    name: String,
    state: Lifecycle,
}

impl Participant {
    /// Create a participant in `Connecting` state together with the receiving
    /// half of its outbound queue
    pub fn new(default_name: &str, outbound_buffer: usize) -> (Self, mpsc::Receiver<Outbound>) {
        let (recipient, rx) = Recipient::channel(outbound_buffer);
        (Self::from_recipient(recipient, default_name), rx)
    }

    pub fn from_recipient(recipient: Recipient, default_name: &str) -> Self {
        Self {
            recipient,
            name: default_name.to_string(),
            state: Lifecycle::Connecting,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.recipient.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: String) {
        tracing::info!(participant = %self.id(), old = %self.name, new = %name, "Username changed");
        self.name = name;
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == Lifecycle::Active
    }

    /// Queue a line for this participant only
    pub fn send_direct(&self, line: &str) {
        if let Err(e) = self.recipient.deliver(Outbound::line(line)) {
            tracing::warn!(participant = %self.id(), error = %e, "Direct send failed");
        }
    }

    /// Queue a raw frame (pong) for this participant only
    pub fn send_frame(&self, frame: Outbound) {
        if let Err(e) = self.recipient.deliver(frame) {
            tracing::debug!(participant = %self.id(), error = %e, "Frame dropped");
        }
    }

    /// Connecting -> Active: send the welcome banner, then register and
    /// announce the new count. Returns the count after joining.
    pub async fn activate(&mut self, router: &Router) -> usize {
        if !self.transition(Lifecycle::Active) {
            return router.count().await;
        }
        for line in protocol::WELCOME_LINES {
            self.send_direct(line);
        }
        let count = router.join(self.recipient.clone()).await;
        tracing::info!(participant = %self.id(), name = %self.name, count, "Participant joined");
        count
    }

    /// Mark the read loop as finished
    pub fn begin_close(&mut self) {
        self.transition(Lifecycle::Closing);
    }

    /// Closing -> Closed: unregister, announce the new count and the
    /// departure. Consumes the participant, dropping its outbound sender.
    pub async fn teardown(mut self, router: &Router) {
        if self.state != Lifecycle::Closing {
            self.begin_close();
        }
        let remaining = router.leave(&self.id(), &self.name).await;
        self.transition(Lifecycle::Closed);
        tracing::info!(
            participant = %self.id(),
            name = %self.name,
            remaining = ?remaining,
            "Participant left"
        );
    }

    fn transition(&mut self, next: Lifecycle) -> bool {
        if self.state.can_transition_to(next) {
            tracing::debug!(participant = %self.id(), from = ?self.state, to = ?next, "Lifecycle");
            self.state = next;
            true
        } else {
            tracing::warn!(
                participant = %self.id(),
                from = ?self.state,
                to = ?next,
                "Ignoring invalid lifecycle transition"
            );
            false
        }
    }
}
