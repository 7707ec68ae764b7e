//! Copy-on-write observer registries.
//!
//! Dispatch iterates an immutable snapshot while mutation swaps in a new
//! list, so callbacks may add or remove observers (their own included) from
//! inside a dispatch without blocking or disturbing the pass in flight.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use arc_swap::ArcSwap;
use crate::connection::PresenceStanzaListener;
use crate::observer::{PresenceHandler, PresenceListener};

pub type Snapshot<T> = Arc<Vec<Arc<T>>>;

pub struct Registry<T: ?Sized> {
  entries: ArcSwap<Vec<Arc<T>>>,
}

pub type ListenerRegistry = Registry<dyn PresenceListener>;
pub type HandlerRegistry = Registry<dyn PresenceHandler>;
pub type StanzaListenerRegistry = Registry<dyn PresenceStanzaListener>;

impl<T: ?Sized> Registry<T> {
  pub fn new() -> Self {
    Self { entries: ArcSwap::from_pointee(Vec::new()) }
  }

  pub fn add(&self, entry: Arc<T>) {
    self.entries.rcu(|current| {
      let mut next = Vec::clone(current);
      next.push(entry.clone());
      next
    });
  }

  /// Removes the first registration of `entry`, compared by identity.
  pub fn remove(&self, entry: &Arc<T>) -> bool {
    let mut removed = false;
    self.entries.rcu(|current| {
      let mut next = Vec::clone(current);
      removed = match next.iter().position(|e| Arc::ptr_eq(e, entry)) {
        Some(pos) => {
          next.remove(pos);
          true
        }
        None => false,
      };
      next
    });
    removed
  }

  pub fn clear(&self) {
    self.entries.store(Arc::new(Vec::new()));
  }

  /// Registrations at this instant, in registration order.
  pub fn snapshot(&self) -> Snapshot<T> {
    self.entries.load_full()
  }

  pub fn len(&self) -> usize {
    self.entries.load().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<T: ?Sized> Default for Registry<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> Debug for Registry<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Registry")
      .field("len", &self.len())
      .finish()
  }
}
