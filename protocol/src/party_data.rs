//! `com.Epic.Party.Data` request payloads.
//!
//! Attribute names carry the backend's type tags (`_s` string, `_b` bool,
//! `_j` json, `_U` unsigned sent as string) and must be sent verbatim. Fields
//! that are "unset" are sent as empty strings, never omitted.

use serde::Serialize;
use serde_json::{json, Value};
use crate::party::{Party, PartyConfiguration};
use crate::privacy::PrivacySettings;
use crate::request::{PartyRequest, RequestBuilder};
use crate::squad::{assign_member_indexes, SquadAssignment};

/// Region every full party update is pinned to.
pub const DEFAULT_REGION: &str = "NAE";
/// Looking-for-group time the backend treats as "never".
pub const UNSET_LFG_TIME: &str = "0001-01-01T00:00:00.000Z";

#[derive(Debug, Serialize)]
struct TileStates {
  #[serde(rename = "TileStates")]
  tile_states: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct PlaylistData<'a> {
  #[serde(rename = "playlistName")]
  playlist_name: &'a str,
  #[serde(rename = "tournamentId")]
  tournament_id: &'a str,
  #[serde(rename = "eventWindowId")]
  event_window_id: &'a str,
  #[serde(rename = "regionId", skip_serializing_if = "Option::is_none")]
  region_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PlaylistAttribute<'a> {
  #[serde(rename = "PlaylistData")]
  playlist_data: PlaylistData<'a>,
}

#[derive(Debug, Serialize)]
struct RawSquadAssignments {
  #[serde(rename = "RawSquadAssignments")]
  raw_squad_assignments: Vec<SquadAssignment>,
}

#[derive(Debug, Serialize)]
struct PrivacyAttribute {
  #[serde(rename = "PrivacySettings")]
  privacy_settings: PrivacySettings,
}

#[derive(Debug, Serialize)]
struct PlatformSessions {
  #[serde(rename = "PlatformSessions")]
  platform_sessions: Vec<Value>,
}

/// `Attrs` object. Only populated fields are serialized, in declaration order.
#[derive(Debug, Default, Serialize)]
struct PartyAttributes<'a> {
  #[serde(rename = "PrimaryGameSessionId_s", skip_serializing_if = "Option::is_none")]
  primary_game_session_id: Option<&'a str>,
  #[serde(rename = "PartyState_s", skip_serializing_if = "Option::is_none")]
  party_state: Option<&'a str>,
  #[serde(rename = "LobbyConnectionStarted_b", skip_serializing_if = "Option::is_none")]
  lobby_connection_started: Option<bool>,
  #[serde(rename = "MatchmakingResult_s", skip_serializing_if = "Option::is_none")]
  matchmaking_result: Option<&'a str>,
  #[serde(rename = "MatchmakingState_s", skip_serializing_if = "Option::is_none")]
  matchmaking_state: Option<&'a str>,
  #[serde(rename = "SessionIsCriticalMission_b", skip_serializing_if = "Option::is_none")]
  session_is_critical_mission: Option<bool>,
  #[serde(rename = "ZoneTileIndex_U", skip_serializing_if = "Option::is_none")]
  zone_tile_index: Option<&'a str>,
  #[serde(rename = "ZoneInstanceId_s", skip_serializing_if = "Option::is_none")]
  zone_instance_id: Option<&'a str>,
  #[serde(rename = "TheaterId_s", skip_serializing_if = "Option::is_none")]
  theater_id: Option<&'a str>,
  #[serde(rename = "TileStates_j", skip_serializing_if = "Option::is_none")]
  tile_states: Option<TileStates>,
  #[serde(rename = "MatchmakingInfoString_s", skip_serializing_if = "Option::is_none")]
  matchmaking_info_string: Option<&'a str>,
  #[serde(rename = "CustomMatchKey_s", skip_serializing_if = "Option::is_none")]
  custom_match_key: Option<&'a str>,
  #[serde(rename = "PlaylistData_j", skip_serializing_if = "Option::is_none")]
  playlist_data: Option<PlaylistAttribute<'a>>,
  #[serde(rename = "AllowJoinInProgress_b", skip_serializing_if = "Option::is_none")]
  allow_join_in_progress: Option<bool>,
  #[serde(rename = "LFGTime_s", skip_serializing_if = "Option::is_none")]
  lfg_time: Option<&'a str>,
  #[serde(rename = "AthenaSquadFill_b", skip_serializing_if = "Option::is_none")]
  athena_squad_fill: Option<bool>,
  #[serde(rename = "PartyIsJoinedInProgress_b", skip_serializing_if = "Option::is_none")]
  party_is_joined_in_progress: Option<bool>,
  #[serde(rename = "GameSessionKey_s", skip_serializing_if = "Option::is_none")]
  game_session_key: Option<&'a str>,
  #[serde(rename = "RawSquadAssignments_j", skip_serializing_if = "Option::is_none")]
  raw_squad_assignments: Option<RawSquadAssignments>,
  #[serde(rename = "PrivacySettings_j", skip_serializing_if = "Option::is_none")]
  privacy_settings: Option<PrivacyAttribute>,
  #[serde(rename = "PlatformSessions_j", skip_serializing_if = "Option::is_none")]
  platform_sessions: Option<PlatformSessions>,
}

fn squad_attribute(party: &Party) -> RawSquadAssignments {
  RawSquadAssignments { raw_squad_assignments: assign_member_indexes(party) }
}

fn privacy_attribute(configuration: &PartyConfiguration) -> PrivacyAttribute {
  PrivacyAttribute { privacy_settings: PrivacySettings::derive(configuration.settings()) }
}

/// Serialized party data update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyData {
  payload: String,
}

impl PartyData {
  /// Complete party state: matchmaking defaults, playlist, squad slots and privacy.
  pub fn with_configuration(
    requests: &RequestBuilder,
    configuration: &PartyConfiguration,
    playlist: impl AsRef<str>,
    party: &Party,
  ) -> Self {
    let attributes = PartyAttributes {
      primary_game_session_id: Some(""),
      party_state: Some("BattleRoyaleView"),
      lobby_connection_started: Some(false),
      matchmaking_result: Some("NoResults"),
      matchmaking_state: Some("NotMatchmaking"),
      session_is_critical_mission: Some(false),
      zone_tile_index: Some("-1"),
      zone_instance_id: Some(""),
      theater_id: Some(""),
      tile_states: Some(TileStates { tile_states: Vec::new() }),
      matchmaking_info_string: Some(""),
      custom_match_key: Some(""),
      playlist_data: Some(PlaylistAttribute {
        playlist_data: PlaylistData {
          playlist_name: playlist.as_ref(),
          tournament_id: "",
          event_window_id: "",
          region_id: Some(DEFAULT_REGION),
        },
      }),
      allow_join_in_progress: Some(false),
      lfg_time: Some(UNSET_LFG_TIME),
      athena_squad_fill: Some(false),
      party_is_joined_in_progress: Some(false),
      game_session_key: Some(""),
      raw_squad_assignments: Some(squad_attribute(party)),
      privacy_settings: Some(privacy_attribute(configuration)),
      platform_sessions: Some(PlatformSessions { platform_sessions: Vec::new() }),
    };

    Self::build(requests, party.party_id(), &attributes)
  }

  /// Switch the party to another playlist.
  pub fn for_new_playlist(requests: &RequestBuilder, playlist: impl AsRef<str>, party_id: &str) -> Self {
    Self::playlist_or_custom_key(requests, playlist.as_ref(), None, party_id)
  }

  /// Set the custom matchmaking key. An empty key clears it.
  pub fn for_new_custom_key(requests: &RequestBuilder, custom_key: &str, party_id: &str) -> Self {
    Self::playlist_or_custom_key(requests, "", Some(custom_key), party_id)
  }

  /// Only the privacy settings of an existing party.
  pub fn for_new_privacy_settings(
    requests: &RequestBuilder,
    configuration: &PartyConfiguration,
    party_id: &str,
  ) -> Self {
    let attributes = PartyAttributes {
      privacy_settings: Some(privacy_attribute(configuration)),
      ..Default::default()
    };

    Self::build(requests, party_id, &attributes)
  }

  /// Only the squad slots of an existing party.
  pub fn for_raw_squad_assignment(requests: &RequestBuilder, party: &Party) -> Self {
    let attributes = PartyAttributes {
      raw_squad_assignments: Some(squad_attribute(party)),
      ..Default::default()
    };

    Self::build(requests, party.party_id(), &attributes)
  }

  /// A present custom key, even an empty one, wins over the playlist.
  fn playlist_or_custom_key(
    requests: &RequestBuilder,
    playlist: &str,
    custom_key: Option<&str>,
    party_id: &str,
  ) -> Self {
    let attributes = match custom_key {
      Some(key) => PartyAttributes {
        custom_match_key: Some(key),
        ..Default::default()
      },
      None => PartyAttributes {
        playlist_data: Some(PlaylistAttribute {
          playlist_data: PlaylistData {
            playlist_name: playlist,
            tournament_id: "",
            event_window_id: "",
            region_id: None,
          },
        }),
        ..Default::default()
      },
    };

    Self::build(requests, party_id, &attributes)
  }

  fn build(requests: &RequestBuilder, party_id: &str, attributes: &PartyAttributes<'_>) -> Self {
    let body = json!({
      "Rev": requests.next_revision(),
      "Attrs": attributes,
    });

    Self { payload: requests.double_payload(party_id, body).to_string() }
  }
}

impl PartyRequest for PartyData {
  fn payload(&self) -> &str {
    &self.payload
  }
}

#[cfg(test)]
mod tests {
  use claims::{assert_ok, assert_some};
  use serde_json::Map;
  use super::*;
  use crate::party::{PartyMember, PrivacySetting, StandardPlaylist};

  fn decode(data: &PartyData) -> Value {
    assert_ok!(serde_json::from_str::<Value>(data.payload()))
  }

  fn attrs(data: &PartyData) -> Map<String, Value> {
    let value = decode(data);
    let attrs = assert_some!(value["payload"]["payload"]["Attrs"].as_object());
    attrs.clone()
  }

  fn squad() -> Party {
    Party::new("party-1")
      .with_leader("L")
      .with_member(PartyMember::new("A"))
      .with_member(PartyMember::new("L"))
      .with_member(PartyMember::new("B"))
  }

  #[test]
  fn it_builds_full_party_data() {
    let requests = RequestBuilder::new();
    let configuration = PartyConfiguration::new(PrivacySetting::Friends);
    let data = PartyData::with_configuration(&requests, &configuration, StandardPlaylist::DefaultSquad, &squad());

    let value = decode(&data);
    assert_eq!(value["type"], "com.Epic.Party.Data");
    assert_eq!(value["payload"]["partyId"], "party-1");
    assert_eq!(value["payload"]["payload"]["Rev"], 1);

    let attrs = assert_ok!(serde_json::to_string_pretty(&value["payload"]["payload"]["Attrs"]));
    insta::assert_snapshot!(attrs);
  }

  #[test]
  fn it_keeps_attribute_order_on_the_wire() {
    let requests = RequestBuilder::new();
    let data = PartyData::with_configuration(&requests, &PartyConfiguration::default(), "Playlist_DefaultSolo", &squad());

    let keys = attrs(&data).keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys.first().map(String::as_str), Some("PrimaryGameSessionId_s"));
    assert_eq!(keys.last().map(String::as_str), Some("PlatformSessions_j"));
    assert_eq!(keys.len(), 21);
  }

  #[test]
  fn it_sets_only_custom_key() {
    let requests = RequestBuilder::new();
    let data = PartyData::for_new_custom_key(&requests, "", "party-1");

    let attrs = attrs(&data);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs["CustomMatchKey_s"], "");
    assert!(!attrs.contains_key("PlaylistData_j"));
  }

  #[test]
  fn it_sets_only_playlist() {
    let requests = RequestBuilder::new();
    let data = PartyData::for_new_playlist(&requests, "arena-solo", "party-1");

    let attrs = attrs(&data);
    assert_eq!(attrs.len(), 1);
    assert_eq!(
      attrs["PlaylistData_j"],
      json!({
        "PlaylistData": {
          "playlistName": "arena-solo",
          "tournamentId": "",
          "eventWindowId": "",
        }
      })
    );
  }

  #[test]
  fn it_sets_only_privacy_settings() {
    let requests = RequestBuilder::new();
    let configuration = PartyConfiguration::new(PrivacySetting::Public);
    let data = PartyData::for_new_privacy_settings(&requests, &configuration, "party-9");

    assert_eq!(decode(&data)["payload"]["partyId"], "party-9");
    let attrs = attrs(&data);
    assert_eq!(attrs.len(), 1);
    assert_eq!(
      attrs["PrivacySettings_j"],
      json!({
        "PrivacySettings": {
          "partyType": "Public",
          "partyInviteRestriction": "AnyMember",
          "bOnlyLeaderFriendsCanJoin": false,
        }
      })
    );
  }

  #[test]
  fn it_sets_only_squad_assignments() {
    let requests = RequestBuilder::new();
    let data = PartyData::for_raw_squad_assignment(&requests, &squad());

    let attrs = attrs(&data);
    assert_eq!(attrs.len(), 1);
    assert_eq!(
      attrs["RawSquadAssignments_j"],
      json!({
        "RawSquadAssignments": [
          { "memberId": "L", "absoluteMemberIdx": 0 },
          { "memberId": "A", "absoluteMemberIdx": 1 },
          { "memberId": "B", "absoluteMemberIdx": 2 },
        ]
      })
    );
  }

  #[test]
  fn it_bumps_revision_per_request() {
    let requests = RequestBuilder::new();

    let first = PartyData::for_new_playlist(&requests, StandardPlaylist::DefaultDuo, "party-1");
    let second = PartyData::for_new_custom_key(&requests, "abc", "party-1");

    assert_eq!(decode(&first)["payload"]["payload"]["Rev"], 1);
    assert_eq!(decode(&second)["payload"]["payload"]["Rev"], 2);
  }
}
