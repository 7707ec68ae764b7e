//! Privacy setting derivation.
//!
//! The backend wants two independent strings per setting plus a flag derived
//! from the invite restriction. Keep the two tables separate: a setting may
//! be private and still allow any member to invite.

use serde::Serialize;
use crate::party::PrivacySetting;

pub const FRIENDS_ONLY: &str = "FriendsOnly";
pub const PUBLIC: &str = "Public";
pub const PRIVATE: &str = "Private";

pub const ANY_MEMBER: &str = "AnyMember";
pub const LEADER_ONLY: &str = "LeaderOnly";

pub fn party_type(setting: PrivacySetting) -> &'static str {
  match setting {
    PrivacySetting::Friends | PrivacySetting::FriendsAllowFriendsOfFriends => FRIENDS_ONLY,
    PrivacySetting::Public => PUBLIC,
    PrivacySetting::PrivateAllowFriendsOfFriends | PrivacySetting::Private => PRIVATE,
  }
}

pub fn invite_restriction(setting: PrivacySetting) -> &'static str {
  match setting {
    PrivacySetting::FriendsAllowFriendsOfFriends
    | PrivacySetting::PrivateAllowFriendsOfFriends
    | PrivacySetting::Public => ANY_MEMBER,
    PrivacySetting::Friends | PrivacySetting::Private => LEADER_ONLY,
  }
}

/// `PrivacySettings` object of the party attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrivacySettings {
  #[serde(rename = "partyType")]
  pub party_type: &'static str,
  #[serde(rename = "partyInviteRestriction")]
  pub party_invite_restriction: &'static str,
  #[serde(rename = "bOnlyLeaderFriendsCanJoin")]
  pub only_leader_friends_can_join: bool,
}

impl PrivacySettings {
  pub fn derive(setting: PrivacySetting) -> Self {
    let party_invite_restriction = invite_restriction(setting);
    Self {
      party_type: party_type(setting),
      party_invite_restriction,
      only_leader_friends_can_join: party_invite_restriction.eq_ignore_ascii_case(LEADER_ONLY),
    }
  }
}
