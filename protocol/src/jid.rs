//! XMPP addresses (`local@domain/resource`).
//!
//! Game account ids travel as the local part of the sender address, so the
//! only thing most callers need is [`Jid::localpart_unescaped`].

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use crate::error::ProtocolError;

/// XEP-0106 escape sequences and the characters they stand for.
const ESCAPES: [(&str, char); 10] = [
  ("20", ' '),
  ("22", '"'),
  ("26", '&'),
  ("27", '\''),
  ("2f", '/'),
  ("3a", ':'),
  ("3c", '<'),
  ("3e", '>'),
  ("40", '@'),
  ("5c", '\\'),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Jid {
  local: Option<String>,
  domain: String,
  resource: Option<String>,
}

impl Jid {
  /// Bare address `local@domain`.
  pub fn new(local: impl Into<String>, domain: impl Into<String>) -> Self {
    Self {
      local: Some(local.into()),
      domain: domain.into(),
      resource: None,
    }
  }

  /// Domain-only address, as used by servers and components.
  pub fn domain_only(domain: impl Into<String>) -> Self {
    Self {
      local: None,
      domain: domain.into(),
      resource: None,
    }
  }

  pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
    self.resource = Some(resource.into());
    self
  }

  /// Local part exactly as it appeared on the wire.
  pub fn localpart(&self) -> Option<&str> {
    self.local.as_deref()
  }

  /// Local part with XEP-0106 escapes reversed. Unknown sequences stay as-is.
  pub fn localpart_unescaped(&self) -> Option<String> {
    self.local.as_deref().map(unescape)
  }

  pub fn domain(&self) -> &str {
    &self.domain
  }

  pub fn resource(&self) -> Option<&str> {
    self.resource.as_deref()
  }

  pub fn bare(&self) -> Jid {
    Jid {
      local: self.local.clone(),
      domain: self.domain.clone(),
      resource: None,
    }
  }
}

fn unescape(input: &str) -> String {
  let mut output = String::with_capacity(input.len());
  let mut rest = input;

  while let Some(pos) = rest.find('\\') {
    output.push_str(&rest[..pos]);
    let tail = &rest[pos + 1..];
    let replacement = tail.get(..2).and_then(|code| {
      ESCAPES.iter()
        .find(|(seq, _)| seq.eq_ignore_ascii_case(code))
        .map(|(_, ch)| *ch)
    });

    match replacement {
      Some(ch) => {
        output.push(ch);
        rest = &tail[2..];
      }
      None => {
        output.push('\\');
        rest = tail;
      }
    }
  }

  output.push_str(rest);
  output
}

impl FromStr for Jid {
  type Err = ProtocolError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || ProtocolError::InvalidJid(s.to_string());

    // resource may itself contain '@' and '/', so split it off first
    let (address, resource) = match s.split_once('/') {
      Some((_, resource)) if resource.is_empty() => return Err(invalid()),
      Some((address, resource)) => (address, Some(resource.to_string())),
      None => (s, None),
    };

    let (local, domain) = match address.split_once('@') {
      Some((local, _)) if local.is_empty() => return Err(invalid()),
      Some((local, domain)) => (Some(local.to_string()), domain),
      None => (None, address),
    };

    if domain.is_empty() || domain.contains('@') {
      return Err(invalid());
    }

    Ok(Jid {
      local,
      domain: domain.to_string(),
      resource,
    })
  }
}

impl Display for Jid {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if let Some(local) = &self.local {
      write!(f, "{}@", local)?;
    }
    write!(f, "{}", self.domain)?;
    if let Some(resource) = &self.resource {
      write!(f, "/{}", resource)?;
    }
    Ok(())
  }
}
