//! Protocol error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
  #[error("Invalid JID: {0:?}")]
  InvalidJid(String),
  #[error("Malformed JSON: {0}")]
  Json(#[from] serde_json::Error),
}
