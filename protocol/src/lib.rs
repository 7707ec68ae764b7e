//! Party control payloads and presence stanza types for the game's XMPP
//! party channel.

pub mod error;
pub mod jid;
pub mod party;
pub mod party_data;
pub mod presence;
pub mod privacy;
pub mod request;
pub mod squad;

// Re-export commonly used types
pub use error::ProtocolError;
pub use jid::Jid;
pub use party::{Party, PartyConfiguration, PartyMember, PrivacySetting, StandardPlaylist};
pub use party_data::PartyData;
pub use presence::{GameStatus, Presence, PresenceType};
pub use privacy::PrivacySettings;
pub use request::{PartyRequest, RequestBuilder};
pub use squad::{assign_member_indexes, SquadAssignment};
