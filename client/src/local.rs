//! In-memory connection.
//!
//! Stands in for a live XMPP session: presences handed to
//! [`LocalConnection::deliver`] are queued and pushed to the registered
//! stanza listeners from a separate delivery task, the way a real connection
//! delivers stanzas off the caller's thread.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use parking_lot::RwLock;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::instrument;
use party_protocol::{Jid, Presence};
use crate::connection::{Connection, PresenceStanzaListener, Roster, RosterEntry};
use crate::error::{ClientError, RosterError};
use crate::registry::StanzaListenerRegistry;

const DELIVERY_QUEUE: usize = 64;

#[derive(Debug)]
pub struct LocalRoster {
  entries: RwLock<Vec<RosterEntry>>,
  presences: RwLock<HashMap<Jid, Presence>>,
  logged_in: AtomicBool,
  connected: AtomicBool,
  reloads: AtomicUsize,
  shutdown: CancellationToken,
}

impl LocalRoster {
  fn new(shutdown: CancellationToken) -> Self {
    Self {
      entries: RwLock::new(Vec::new()),
      presences: RwLock::new(HashMap::new()),
      logged_in: AtomicBool::new(true),
      connected: AtomicBool::new(true),
      reloads: AtomicUsize::new(0),
      shutdown,
    }
  }

  /// Adds a contact unless its bare address is already present.
  pub fn add_entry(&self, entry: RosterEntry) -> bool {
    let mut entries = self.entries.write();
    if entries.iter().any(|e| e.jid == entry.jid) {
      return false;
    }
    entries.push(entry);
    true
  }

  /// Adds a contact along with its last known presence.
  pub fn seed(&self, presence: Presence) {
    self.add_entry(RosterEntry::new(presence.from.clone()));
    self.record(&presence);
  }

  pub fn set_logged_in(&self, logged_in: bool) {
    self.logged_in.store(logged_in, Ordering::Relaxed);
  }

  pub fn set_connected(&self, connected: bool) {
    self.connected.store(connected, Ordering::Relaxed);
  }

  /// Number of reloads that reached the "server".
  pub fn reload_count(&self) -> usize {
    self.reloads.load(Ordering::Relaxed)
  }

  fn record(&self, presence: &Presence) {
    self.presences.write().insert(presence.from.bare(), presence.clone());
  }

  fn check_session(&self) -> Result<(), RosterError> {
    if !self.logged_in.load(Ordering::Relaxed) {
      return Err(RosterError::NotLoggedIn);
    }
    if !self.connected.load(Ordering::Relaxed) {
      return Err(RosterError::NotConnected);
    }
    Ok(())
  }
}

impl Roster for LocalRoster {
  fn reload(&self) -> Result<(), RosterError> {
    self.check_session()?;
    self.reloads.fetch_add(1, Ordering::Relaxed);
    Ok(())
  }

  async fn reload_and_wait(&self) -> Result<(), RosterError> {
    self.check_session()?;

    tokio::select! {
      _ = self.shutdown.cancelled() => Err(RosterError::Interrupted),
      _ = tokio::task::yield_now() => {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        Ok(())
      }
    }
  }

  fn entries(&self) -> Vec<RosterEntry> {
    self.entries.read().clone()
  }

  fn presence(&self, jid: &Jid) -> Presence {
    self.presences.read()
      .get(&jid.bare())
      .cloned()
      .unwrap_or_else(|| Presence::unavailable(jid.clone()))
  }
}

#[derive(Debug)]
enum Delivery {
  Presence(Presence),
  Flush(oneshot::Sender<()>),
}

#[derive(Debug)]
pub struct LocalConnection {
  listeners: Arc<StanzaListenerRegistry>,
  roster: Arc<LocalRoster>,
  sender: mpsc::Sender<Delivery>,
  shutdown: CancellationToken,
}

impl LocalConnection {
  /// Creates the connection and spawns its delivery task on the current runtime.
  pub fn start() -> Arc<Self> {
    let shutdown = CancellationToken::new();
    let listeners = Arc::new(StanzaListenerRegistry::new());
    let roster = Arc::new(LocalRoster::new(shutdown.clone()));
    let (sender, receiver) = mpsc::channel(DELIVERY_QUEUE);

    tokio::spawn(delivery_loop(receiver, listeners.clone(), roster.clone(), shutdown.clone()));

    Arc::new(Self {
      listeners,
      roster,
      sender,
      shutdown,
    })
  }

  /// Queues a presence as if it had arrived from the server.
  pub async fn deliver(&self, presence: Presence) -> Result<(), ClientError> {
    self.sender.send(Delivery::Presence(presence))
      .await
      .map_err(|_| ClientError::ConnectionClosed)
  }

  /// Waits until every presence queued so far has been handed to the listeners.
  pub async fn flush(&self) -> Result<(), ClientError> {
    let (done, flushed) = oneshot::channel();
    self.sender.send(Delivery::Flush(done))
      .await
      .map_err(|_| ClientError::ConnectionClosed)?;
    flushed.await.map_err(|_| ClientError::ConnectionClosed)
  }

  pub fn local_roster(&self) -> &Arc<LocalRoster> {
    &self.roster
  }

  /// Number of stanza listeners currently registered.
  pub fn listener_count(&self) -> usize {
    self.listeners.len()
  }

  /// Stops delivery and interrupts pending roster reloads.
  #[instrument(skip(self))]
  pub fn shutdown(&self) {
    self.shutdown.cancel();
  }
}

async fn delivery_loop(
  mut receiver: mpsc::Receiver<Delivery>,
  listeners: Arc<StanzaListenerRegistry>,
  roster: Arc<LocalRoster>,
  shutdown: CancellationToken,
) {
  loop {
    tokio::select! {
      _ = shutdown.cancelled() => {
        tracing::debug!("local connection shutting down...");
        break;
      }

      delivery = receiver.recv() => {
        match delivery {
          Some(Delivery::Presence(presence)) => {
            roster.record(&presence);
            for listener in listeners.snapshot().iter() {
              listener.process_presence(&presence);
            }
          }
          Some(Delivery::Flush(done)) => {
            let _ = done.send(());
          }
          None => break,
        }
      }
    }
  }
}

impl Connection for LocalConnection {
  type Roster = LocalRoster;

  fn roster(&self) -> Arc<LocalRoster> {
    self.roster.clone()
  }

  fn add_async_presence_listener(&self, listener: Arc<dyn PresenceStanzaListener>) {
    self.listeners.add(listener);
  }

  fn remove_async_presence_listener(&self, listener: &Arc<dyn PresenceStanzaListener>) {
    self.listeners.remove(listener);
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;
  use claims::{assert_err_eq, assert_ok};
  use super::*;

  struct Forward(mpsc::UnboundedSender<Presence>);

  impl PresenceStanzaListener for Forward {
    fn process_presence(&self, presence: &Presence) {
      let _ = self.0.send(presence.clone());
    }
  }

  async fn recv(rx: &mut mpsc::UnboundedReceiver<Presence>) -> Option<Presence> {
    tokio::time::timeout(Duration::from_millis(100), rx.recv())
      .await
      .ok()
      .flatten()
  }

  fn jid(local: &str) -> Jid {
    Jid::new(local, "prod.ol.epicgames.com")
  }

  #[tokio::test]
  async fn test_delivers_to_registered_listeners() {
    let connection = LocalConnection::start();
    let (tx, mut rx) = mpsc::unbounded_channel();
    connection.add_async_presence_listener(Arc::new(Forward(tx)));

    let presence = Presence::available(jid("abc").with_resource("pc")).with_status("{}");
    assert_ok!(connection.deliver(presence.clone()).await);

    assert_eq!(recv(&mut rx).await, Some(presence));
  }

  #[tokio::test]
  async fn test_removed_listener_stops_receiving() {
    let connection = LocalConnection::start();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener: Arc<dyn PresenceStanzaListener> = Arc::new(Forward(tx));
    connection.add_async_presence_listener(listener.clone());
    connection.remove_async_presence_listener(&listener);

    assert_ok!(connection.deliver(Presence::available(jid("abc"))).await);
    assert!(recv(&mut rx).await.is_none());
    assert_eq!(connection.listener_count(), 0);
  }

  #[tokio::test]
  async fn test_roster_remembers_last_presence() {
    let connection = LocalConnection::start();
    let (tx, mut rx) = mpsc::unbounded_channel();
    connection.add_async_presence_listener(Arc::new(Forward(tx)));

    let latest = Presence::available(jid("abc").with_resource("pc")).with_status("second");
    assert_ok!(connection.deliver(Presence::available(jid("abc")).with_status("first")).await);
    assert_ok!(connection.deliver(latest.clone()).await);
    recv(&mut rx).await;
    recv(&mut rx).await;

    assert_eq!(connection.roster().presence(&jid("abc")), latest);
    assert!(!connection.roster().presence(&jid("unknown")).is_available());
  }

  #[tokio::test]
  async fn test_roster_deduplicates_entries() {
    let connection = LocalConnection::start();
    let roster = connection.local_roster();

    assert!(roster.add_entry(RosterEntry::new(jid("abc").with_resource("pc"))));
    assert!(!roster.add_entry(RosterEntry::new(jid("abc"))));
    assert_eq!(roster.entries().len(), 1);
  }

  #[tokio::test]
  async fn test_roster_reload_reports_session_state() {
    let connection = LocalConnection::start();
    let roster = connection.roster();

    assert_ok!(roster.reload());
    assert_ok!(roster.reload_and_wait().await);
    assert_eq!(roster.reload_count(), 2);

    roster.set_connected(false);
    assert_err_eq!(roster.reload(), RosterError::NotConnected);

    roster.set_logged_in(false);
    assert_err_eq!(roster.reload_and_wait().await, RosterError::NotLoggedIn);
    assert_eq!(roster.reload_count(), 2);
  }

  #[tokio::test]
  async fn test_flush_waits_for_queued_presences() {
    let connection = LocalConnection::start();
    let (tx, mut rx) = mpsc::unbounded_channel();
    connection.add_async_presence_listener(Arc::new(Forward(tx)));

    for i in 0..10 {
      assert_ok!(connection.deliver(Presence::available(jid(&format!("user{}", i)))).await);
    }
    assert_ok!(connection.flush().await);

    let mut delivered = 0;
    while rx.try_recv().is_ok() {
      delivered += 1;
    }
    assert_eq!(delivered, 10);
  }

  #[tokio::test]
  async fn test_deliver_fails_after_shutdown() {
    let connection = LocalConnection::start();
    connection.shutdown();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert!(matches!(
      connection.deliver(Presence::available(jid("abc"))).await,
      Err(ClientError::ConnectionClosed)
    ));
  }

  #[tokio::test]
  async fn test_presence_resource_over_local_connection() {
    let connection = LocalConnection::start();
    let resource = crate::PresenceResource::new(connection.clone());
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    resource.add_presence_listener(Arc::new(move |presence: &crate::PresenceRecord| {
      let _ = tx.send(presence.account_id().to_string());
    }));

    let sender = jid("abc").with_resource("V2:Fortnite:WIN::1");
    assert_ok!(connection.deliver(Presence::unavailable(sender.clone()).with_status("{}")).await);
    assert_ok!(connection.deliver(Presence::available(sender.clone())).await);
    assert_ok!(connection.deliver(Presence::available(sender).with_status("{}")).await);
    assert_ok!(connection.flush().await);

    assert_eq!(rx.try_recv().ok(), Some("abc".to_string()));
    assert!(rx.try_recv().is_err());

    connection.local_roster().add_entry(RosterEntry::new(jid("abc")));
    resource.handle_all_roster_entries();
    assert_eq!(rx.try_recv().ok(), Some("abc".to_string()));

    resource.close();
    assert_eq!(connection.listener_count(), 0);
  }

  #[tokio::test]
  async fn test_shutdown_interrupts_waiting_reload() {
    let connection = LocalConnection::start();
    connection.shutdown();

    assert_err_eq!(connection.roster().reload_and_wait().await, RosterError::Interrupted);
  }
}
