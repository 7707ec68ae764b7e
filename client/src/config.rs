use std::str::FromStr;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::Level;
use crate::error::ClientError;
use crate::resource::PresenceOptions;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
  only_handle_available_presences: bool,
  domain: String,
  resync_on_start: bool,
  /// Contacts known before any input, one replay line each.
  contacts: Vec<String>,
  log_level: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      only_handle_available_presences: true,
      domain: "prod.ol.epicgames.com".to_string(),
      resync_on_start: false,
      contacts: Vec::new(),
      log_level: "info".to_string(),
    }
  }
}

impl ClientConfig {
  /// System file, then local file, then `PARTY_*` environment, over defaults.
  pub fn figment() -> Figment {
    Figment::new()
      .merge(Toml::file("/etc/party-client/config.toml"))
      .merge(Toml::file("party-client.toml"))
      .merge(Env::prefixed("PARTY_"))
      .join(Serialized::defaults(ClientConfig::default()))
  }

  pub fn load() -> Result<Self, ClientError> {
    Ok(Self::figment().extract()?)
  }

  pub fn presence_options(&self) -> PresenceOptions {
    PresenceOptions {
      only_handle_available_presences: self.only_handle_available_presences,
    }
  }

  /// Domain used to qualify bare account ids.
  pub fn domain(&self) -> &str {
    &self.domain
  }

  pub fn resync_on_start(&self) -> bool {
    self.resync_on_start
  }

  pub fn contacts(&self) -> &[String] {
    &self.contacts
  }

  pub fn log_level(&self) -> Result<Level, ClientError> {
    Level::from_str(&self.log_level).map_err(|_| ClientError::InvalidLogLevel(self.log_level.clone()))
  }
}
