//! Request envelope and revision tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

/// Message type of every party data update.
pub const PARTY_DATA_TYPE: &str = "com.Epic.Party.Data";

/// Outbound party request, ready to be sent as a message body.
pub trait PartyRequest {
  fn payload(&self) -> &str;
}

/// Wraps request bodies and hands out revisions.
///
/// The backend uses `Rev` for optimistic concurrency, so one builder should be
/// shared by everything that updates the same party.
#[derive(Debug, Default)]
pub struct RequestBuilder {
  revision: AtomicU64,
}

impl RequestBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Continue counting from a revision already acknowledged by the backend.
  pub fn starting_at(revision: u64) -> Self {
    Self { revision: AtomicU64::new(revision) }
  }

  /// Next revision, starting at 1.
  pub fn next_revision(&self) -> u64 {
    self.revision.fetch_add(1, Ordering::Relaxed) + 1
  }

  /// Last revision handed out, 0 if none yet.
  pub fn current_revision(&self) -> u64 {
    self.revision.load(Ordering::Relaxed)
  }

  /// `{"payload": {"partyId", "payload": body}, "timestamp", "type"}`
  pub fn double_payload(&self, party_id: &str, body: Value) -> Value {
    json!({
      "payload": {
        "partyId": party_id,
        "payload": body,
      },
      "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
      "type": PARTY_DATA_TYPE,
    })
  }
}
