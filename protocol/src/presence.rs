//! Presence stanzas as delivered by the XMPP connection.

use serde::Deserialize;
use serde_json::{Map, Value};
use crate::error::ProtocolError;
use crate::jid::Jid;

/// Presence stanza `type` attribute. An absent attribute means available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceType {
  #[default]
  Available,
  Unavailable,
  Subscribe,
  Subscribed,
  Unsubscribe,
  Unsubscribed,
  Probe,
  Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
  /// Sender address, usually `account@domain/resource`.
  pub from: Jid,
  pub kind: PresenceType,
  /// Free-form status text. Game clients put a JSON document here.
  pub status: Option<String>,
}

impl Presence {
  pub fn available(from: Jid) -> Self {
    Self {
      from,
      kind: PresenceType::Available,
      status: None,
    }
  }

  pub fn unavailable(from: Jid) -> Self {
    Self {
      from,
      kind: PresenceType::Unavailable,
      status: None,
    }
  }

  pub fn with_status(mut self, status: impl Into<String>) -> Self {
    self.status = Some(status.into());
    self
  }

  pub fn is_available(&self) -> bool {
    self.kind == PresenceType::Available
  }
}

/// Game client status published inside the presence status text.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameStatus {
  #[serde(rename = "Status")]
  pub status: String,
  #[serde(rename = "bIsPlaying")]
  pub is_playing: bool,
  #[serde(rename = "bIsJoinable")]
  pub is_joinable: bool,
  #[serde(rename = "bHasVoiceSupport")]
  pub has_voice_support: bool,
  #[serde(rename = "SessionId")]
  pub session_id: String,
  /// Game specific properties (party join info, kairos profile, ...).
  #[serde(rename = "Properties")]
  pub properties: Map<String, Value>,
}

impl GameStatus {
  pub fn parse(status: &str) -> Result<Self, ProtocolError> {
    Ok(serde_json::from_str(status)?)
  }

  pub fn property(&self, key: &str) -> Option<&Value> {
    self.properties.get(key)
  }
}
