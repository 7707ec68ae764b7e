//! Presence fan-out over an XMPP connection for game party clients.

pub mod config;
pub mod connection;
pub mod error;
pub mod local;
pub mod observer;
pub mod record;
pub mod registry;
pub mod replay;
pub mod resource;

pub use config::ClientConfig;
pub use connection::{Connection, PresenceStanzaListener, Roster, RosterEntry};
pub use error::{ClientError, RosterError};
pub use local::{LocalConnection, LocalRoster};
pub use observer::{PresenceHandler, PresenceListener};
pub use record::PresenceRecord;
pub use registry::{HandlerRegistry, ListenerRegistry, Registry};
pub use resource::{PresenceOptions, PresenceResource};
