use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use party_client::replay::{parse_presence_line, seed_roster};
use party_client::{ClientConfig, LocalConnection, PresenceRecord, PresenceResource, RosterEntry};

fn log_presence(presence: &PresenceRecord) {
  match presence.game_status() {
    Ok(status) => tracing::info!(
      account_id = presence.account_id(),
      from = %presence.from(),
      status = %status.status,
      playing = status.is_playing,
      joinable = status.is_joinable,
      "Presence received"
    ),
    Err(_) => tracing::info!(
      account_id = presence.account_id(),
      from = %presence.from(),
      status = presence.status(),
      "Presence received"
    ),
  }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = ClientConfig::load()?;

  let subscriber = tracing_subscriber::FmtSubscriber::builder()
    .with_max_level(config.log_level()?)
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  let connection = LocalConnection::start();
  let resource = PresenceResource::with_options(connection.clone(), config.presence_options());
  resource.add_presence_listener(Arc::new(log_presence));

  let seeded = seed_roster(connection.local_roster(), config.contacts(), config.domain())?;
  tracing::debug!(seeded, "roster seeded from config");

  resource.reload_roster(true).await;
  if config.resync_on_start() {
    resource.handle_all_roster_entries();
  }

  tracing::info!(domain = config.domain(), "Reading presences from stdin...");
  let mut lines = BufReader::new(tokio::io::stdin()).lines();

  loop {
    tokio::select! {
      _ = signal::ctrl_c() => {
        tracing::info!("Received Ctrl+C, shutting down...");
        break;
      }

      line = lines.next_line() => {
        let Some(line) = line? else {
          break;
        };

        match parse_presence_line(&line, config.domain()) {
          Ok(Some(presence)) => {
            connection.local_roster().add_entry(RosterEntry::new(presence.from.clone()));
            connection.deliver(presence).await?;
          }
          Ok(None) => {}
          Err(e) => tracing::warn!(error = %e, "skipping line"),
        }
      }
    }
  }

  connection.flush().await?;
  resource.close();
  connection.shutdown();
  tracing::info!("Shutdown complete");
  Ok(())
}
