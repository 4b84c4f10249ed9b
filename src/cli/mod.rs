pub mod config;
pub mod consult;
pub mod favorites;
pub mod history;
pub mod render;

use std::fs;
use std::io::{self, Write};

use crate::config::{data_path, Settings, DB_FILE};
use crate::library::{Confirm, Library};
use crate::query::GeminiClient;
use crate::session::Session;
use crate::store::{InMemoryStore, SqliteStore, Store};

/// Confirmer that asks on the terminal
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, message: &str) -> bool {
        print!("{} [y/N] ", message);
        io::stdout().flush().ok();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            return false;
        }
        input.trim().eq_ignore_ascii_case("y")
    }
}

/// Open the durable store, falling back to memory if it is unavailable
fn open_store() -> Box<dyn Store> {
    let dir = data_path();
    if let Err(e) = fs::create_dir_all(&dir) {
        tracing::warn!(path = %dir.display(), error = %e, "Cannot create data directory; changes will not be saved");
        return Box::new(InMemoryStore::new());
    }

    match SqliteStore::open(&dir.join(DB_FILE)) {
        Ok(store) => Box::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "Cannot open store; changes will not be saved");
            Box::new(InMemoryStore::new())
        }
    }
}

/// Build a session from the current settings and store
pub fn open_session() -> Result<Session<GeminiClient>, String> {
    let settings = Settings::load();
    let client = GeminiClient::new(
        &settings.base_url,
        &settings.model,
        settings.api_key.clone(),
        settings.timeout_secs,
    )
    .map_err(|e| e.to_string())?;

    tracing::debug!(model = client.model(), "Session opened");
    Ok(Session::new(client, Library::open(open_store()), settings.temperature))
}
