use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;
use party_protocol::Presence;
use crate::connection::{Connection, PresenceStanzaListener, Roster};
use crate::observer::{PresenceHandler, PresenceListener};
use crate::record::PresenceRecord;
use crate::registry::{HandlerRegistry, ListenerRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceOptions {
  /// Ignore stanzas that are not `available` (unavailable, probes, subscriptions).
  pub only_handle_available_presences: bool,
}

impl Default for PresenceOptions {
  fn default() -> Self {
    Self { only_handle_available_presences: true }
  }
}

/// Normalizes stanzas and fans them out. Registered on the connection.
#[derive(Debug)]
struct PresenceDispatcher {
  listeners: ListenerRegistry,
  handlers: HandlerRegistry,
  only_handle_available_presences: AtomicBool,
}

impl PresenceDispatcher {
  fn handle_presence(&self, presence: &Presence) {
    let Some(record) = PresenceRecord::from_presence(presence) else {
      return;
    };

    // no info logging here, presence traffic is constant
    tracing::trace!(account_id = record.account_id(), "dispatching presence");

    for listener in self.listeners.snapshot().iter() {
      listener.presence_received(&record);
    }

    let account_id = record.account_id();
    self.handlers.snapshot()
      .iter()
      .filter(|handler| handler.is_active() && handler.is_ready() && handler.is_relevant(account_id))
      .for_each(|handler| handler.handle_presence(&record));
  }
}

impl PresenceStanzaListener for PresenceDispatcher {
  fn process_presence(&self, presence: &Presence) {
    if self.only_handle_available_presences.load(Ordering::Relaxed) && !presence.is_available() {
      return;
    }
    self.handle_presence(presence);
  }
}

/// Presence fan-out bound to a connection and its roster.
///
/// Listeners receive every presence that carries a status. Handlers receive
/// it only while they report themselves active, ready and relevant to the
/// sender. Both registries survive [`reinitialize`](Self::reinitialize).
pub struct PresenceResource<C: Connection> {
  connection: Arc<C>,
  roster: Arc<C::Roster>,
  dispatcher: Arc<PresenceDispatcher>,
  stanza_listener: Arc<dyn PresenceStanzaListener>,
}

impl<C: Connection> Debug for PresenceResource<C> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PresenceResource")
      .field("listeners", &self.dispatcher.listeners.len())
      .field("handlers", &self.dispatcher.handlers.len())
      .field("only_handle_available_presences", &self.only_handle_available_presences())
      .finish()
  }
}

impl<C: Connection> PresenceResource<C> {
  pub fn new(connection: Arc<C>) -> Self {
    Self::with_options(connection, PresenceOptions::default())
  }

  #[instrument(skip(connection))]
  pub fn with_options(connection: Arc<C>, options: PresenceOptions) -> Self {
    let dispatcher = Arc::new(PresenceDispatcher {
      listeners: ListenerRegistry::new(),
      handlers: HandlerRegistry::new(),
      only_handle_available_presences: AtomicBool::new(options.only_handle_available_presences),
    });
    let stanza_listener: Arc<dyn PresenceStanzaListener> = dispatcher.clone();

    let roster = connection.roster();
    connection.add_async_presence_listener(stanza_listener.clone());
    tracing::debug!("presence resource bound to connection");

    Self {
      connection,
      roster,
      dispatcher,
      stanza_listener,
    }
  }

  pub fn add_presence_listener(&self, listener: Arc<dyn PresenceListener>) {
    self.dispatcher.listeners.add(listener);
  }

  pub fn remove_presence_listener(&self, listener: &Arc<dyn PresenceListener>) -> bool {
    self.dispatcher.listeners.remove(listener)
  }

  pub fn add_presence_handler(&self, handler: Arc<dyn PresenceHandler>) {
    self.dispatcher.handlers.add(handler);
  }

  pub fn remove_presence_handler(&self, handler: &Arc<dyn PresenceHandler>) -> bool {
    self.dispatcher.handlers.remove(handler)
  }

  /// Best effort: failures are logged and swallowed.
  ///
  /// With `wait` this awaits a server round trip, keep it off latency
  /// sensitive paths.
  #[instrument(skip(self))]
  pub async fn reload_roster(&self, wait: bool) {
    let result = if wait {
      self.roster.reload_and_wait().await
    } else {
      self.roster.reload()
    };

    if let Err(error) = result {
      tracing::warn!(
        error = %error,
        "Failed to reload roster. Reloading is not recommended for accounts with large friend lists"
      );
    }
  }

  /// Replays the last known presence of every roster entry through dispatch.
  #[instrument(skip(self))]
  pub fn handle_all_roster_entries(&self) {
    let entries = self.roster.entries();
    tracing::debug!(count = entries.len(), "replaying roster presences");

    for entry in entries {
      self.dispatcher.handle_presence(&self.roster.presence(&entry.jid));
    }
  }

  pub fn set_only_handle_available_presences(&self, only_available: bool) {
    self.dispatcher.only_handle_available_presences.store(only_available, Ordering::Relaxed);
  }

  pub fn only_handle_available_presences(&self) -> bool {
    self.dispatcher.only_handle_available_presences.load(Ordering::Relaxed)
  }

  pub fn roster(&self) -> &Arc<C::Roster> {
    &self.roster
  }

  pub fn connection(&self) -> &Arc<C> {
    &self.connection
  }

  /// Rebinds to a replacement connection. Observers and the availability
  /// filter carry over.
  #[instrument(skip(self, connection))]
  pub fn reinitialize(&mut self, connection: Arc<C>) {
    self.connection.remove_async_presence_listener(&self.stanza_listener);
    self.roster = connection.roster();
    connection.add_async_presence_listener(self.stanza_listener.clone());
    self.connection = connection;
    tracing::debug!("presence resource rebound to new connection");
  }

  /// Stops receiving presences but keeps every registered observer.
  #[instrument(skip(self))]
  pub fn dispose_connection(&self) {
    self.connection.remove_async_presence_listener(&self.stanza_listener);
  }

  /// Unregisters from the connection and drops every observer.
  ///
  /// Must not race an in-flight dispatch; close after the connection has
  /// stopped delivering.
  #[instrument(skip(self))]
  pub fn close(self) {
    self.connection.remove_async_presence_listener(&self.stanza_listener);
    self.dispatcher.listeners.clear();
    self.dispatcher.handlers.clear();
    tracing::debug!("presence resource closed");
  }
}
