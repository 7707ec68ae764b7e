//! Capabilities the presence resource needs from an XMPP connection.
//!
//! Session establishment, TLS and stanza parsing stay with the connection
//! implementation. The resource only registers a presence callback and talks
//! to the roster.

use std::future::Future;
use std::sync::Arc;
use party_protocol::{Jid, Presence};
use crate::error::RosterError;

/// Receives presence stanzas on the connection's delivery task.
pub trait PresenceStanzaListener: Send + Sync {
  fn process_presence(&self, presence: &Presence);
}

/// Contact list of the logged in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
  /// Bare address of the contact.
  pub jid: Jid,
  pub name: Option<String>,
}

impl RosterEntry {
  pub fn new(jid: Jid) -> Self {
    Self { jid: jid.bare(), name: None }
  }
}

pub trait Roster: Send + Sync + 'static {
  /// Request a roster reload without waiting for the result.
  fn reload(&self) -> Result<(), RosterError>;

  /// Reload and wait for the server round trip.
  fn reload_and_wait(&self) -> impl Future<Output = Result<(), RosterError>> + Send;

  fn entries(&self) -> Vec<RosterEntry>;

  /// Last known presence of `jid`. Contacts never seen are unavailable.
  fn presence(&self, jid: &Jid) -> Presence;
}

pub trait Connection: Send + Sync + 'static {
  type Roster: Roster;

  fn roster(&self) -> Arc<Self::Roster>;

  fn add_async_presence_listener(&self, listener: Arc<dyn PresenceStanzaListener>);

  /// Removes a listener previously added, matched by identity.
  fn remove_async_presence_listener(&self, listener: &Arc<dyn PresenceStanzaListener>);
}
