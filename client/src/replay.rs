//! Line format of the replay tool: `<account-or-jid> <available|unavailable> [status]`.

use party_protocol::{Jid, Presence, PresenceType};
use crate::error::ClientError;
use crate::local::LocalRoster;

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_presence_line(line: &str, domain: &str) -> Result<Option<Presence>, ClientError> {
  let line = line.trim();
  if line.is_empty() || line.starts_with('#') {
    return Ok(None);
  }

  let mut parts = line.splitn(3, char::is_whitespace);
  let (Some(sender), Some(kind)) = (parts.next(), parts.next()) else {
    return Err(ClientError::InvalidLine(line.to_string()));
  };

  let from = if sender.contains('@') {
    sender.parse::<Jid>()?
  } else {
    Jid::new(sender, domain)
  };

  let kind = match kind {
    "available" => PresenceType::Available,
    "unavailable" => PresenceType::Unavailable,
    _ => return Err(ClientError::InvalidLine(line.to_string())),
  };

  let status = parts.next()
    .map(str::trim)
    .filter(|status| !status.is_empty())
    .map(str::to_string);

  Ok(Some(Presence { from, kind, status }))
}

/// Seeds `roster` with one contact per line. Returns how many were added.
pub fn seed_roster(roster: &LocalRoster, lines: &[String], domain: &str) -> Result<usize, ClientError> {
  let mut seeded = 0;
  for line in lines {
    if let Some(presence) = parse_presence_line(line, domain)? {
      roster.seed(presence);
      seeded += 1;
    }
  }
  Ok(seeded)
}
