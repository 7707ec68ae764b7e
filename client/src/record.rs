use party_protocol::{GameStatus, Jid, Presence, ProtocolError};

/// Presence of a game account, normalized from a stanza.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceRecord {
  account_id: String,
  status: String,
  from: Jid,
}

impl PresenceRecord {
  /// `None` when the stanza has no status or the sender has no local part.
  pub fn from_presence(presence: &Presence) -> Option<Self> {
    let status = presence.status.as_ref()?;
    let account_id = presence.from.localpart_unescaped()?;

    Some(Self {
      account_id,
      status: status.clone(),
      from: presence.from.clone(),
    })
  }

  pub fn account_id(&self) -> &str {
    &self.account_id
  }

  pub fn status(&self) -> &str {
    &self.status
  }

  /// Full sender address, including the client resource.
  pub fn from(&self) -> &Jid {
    &self.from
  }

  pub fn game_status(&self) -> Result<GameStatus, ProtocolError> {
    GameStatus::parse(&self.status)
  }
}
