//! Consumer facing presence callbacks.
//!
//! Both roles are invoked on the connection's delivery task, which is shared
//! with every other stanza. Implementations must not block; hand long work off
//! to a channel or a spawned task.

use crate::record::PresenceRecord;

/// Receives every presence that carries a status.
pub trait PresenceListener: Send + Sync {
  fn presence_received(&self, presence: &PresenceRecord);
}

impl<F> PresenceListener for F
where
  F: Fn(&PresenceRecord) + Send + Sync,
{
  fn presence_received(&self, presence: &PresenceRecord) {
    self(presence)
  }
}

/// Receives presences only while active, ready and interested in the sender.
pub trait PresenceHandler: Send + Sync {
  fn is_active(&self) -> bool;

  fn is_ready(&self) -> bool;

  fn is_relevant(&self, account_id: &str) -> bool;

  fn handle_presence(&self, presence: &PresenceRecord);
}
