//! Client error types.

use thiserror::Error;
use party_protocol::ProtocolError;

/// Failures reported by a roster reload.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterError {
  #[error("Not logged in")]
  NotLoggedIn,
  #[error("Not connected")]
  NotConnected,
  #[error("Interrupted while waiting for the roster")]
  Interrupted,
}

#[derive(Error, Debug)]
pub enum ClientError {
  #[error("Configuration error: {0}")]
  Config(#[from] figment::Error),
  #[error("Unknown log level: {0:?}")]
  InvalidLogLevel(String),
  #[error("Cannot parse presence line: {0:?}")]
  InvalidLine(String),
  #[error("Protocol error: {0}")]
  Protocol(#[from] ProtocolError),
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Connection is shut down")]
  ConnectionClosed,
}
