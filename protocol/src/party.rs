//! Party model as seen by the payload builders.

/// Who may find and join the party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivacySetting {
  #[default]
  Public,
  FriendsAllowFriendsOfFriends,
  Friends,
  PrivateAllowFriendsOfFriends,
  Private,
}

/// Caller supplied configuration for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartyConfiguration {
  privacy: PrivacySetting,
}

impl PartyConfiguration {
  pub fn new(privacy: PrivacySetting) -> Self {
    Self { privacy }
  }

  pub fn settings(&self) -> PrivacySetting {
    self.privacy
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyMember {
  pub account_id: String,
  pub display_name: Option<String>,
}

impl PartyMember {
  pub fn new(account_id: impl Into<String>) -> Self {
    Self {
      account_id: account_id.into(),
      display_name: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
  pub party_id: String,
  pub leader_id: Option<String>,
  /// Members in join order. May or may not contain the leader.
  pub members: Vec<PartyMember>,
}

impl Party {
  pub fn new(party_id: impl Into<String>) -> Self {
    Self {
      party_id: party_id.into(),
      leader_id: None,
      members: Vec::new(),
    }
  }

  pub fn with_leader(mut self, leader_id: impl Into<String>) -> Self {
    self.leader_id = Some(leader_id.into());
    self
  }

  pub fn with_member(mut self, member: PartyMember) -> Self {
    self.members.push(member);
    self
  }

  pub fn party_id(&self) -> &str {
    &self.party_id
  }

  pub fn leader_id(&self) -> Option<&str> {
    self.leader_id.as_deref()
  }
}

/// Playlists every client knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardPlaylist {
  DefaultSolo,
  DefaultDuo,
  DefaultSquad,
  Playground,
}

impl StandardPlaylist {
  pub fn name(&self) -> &'static str {
    match self {
      StandardPlaylist::DefaultSolo => "Playlist_DefaultSolo",
      StandardPlaylist::DefaultDuo => "Playlist_DefaultDuo",
      StandardPlaylist::DefaultSquad => "Playlist_DefaultSquad",
      StandardPlaylist::Playground => "Playlist_Playground",
    }
  }
}

impl AsRef<str> for StandardPlaylist {
  fn as_ref(&self) -> &str {
    self.name()
  }
}
