//! CLI command implementations

pub mod cycle;
pub mod exam;
pub mod init;
pub mod login;
pub mod reset;
pub mod session;
pub mod sim;
pub mod status;
pub mod watch;

use std::path::{Path, PathBuf};

use anyhow::Result;

use studyquest::config::Config;
use studyquest::store::JsonFileStorage;
use studyquest::{GamificationEvent, UnifiedStateStore};

/// Resolved config and state location shared by every command
pub struct CliContext {
    pub config: Config,
    pub state_path: PathBuf,
}

impl CliContext {
    /// `--state` wins over `[persistence] state_path`
    pub fn load(config_path: Option<&Path>, state_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let state_path = state_path.unwrap_or_else(|| config.state_path());
        tracing::debug!("Using state document {}", state_path.display());
        Ok(Self { config, state_path })
    }

    /// Open the state document and credit today's login
    pub fn open_store(&self) -> UnifiedStateStore {
        let mut store = UnifiedStateStore::open(
            JsonFileStorage::new(&self.state_path),
            self.config.rules(),
            self.config.debounce(),
        );
        print_events(&store.check_login_on_start());
        store
    }
}

/// Print notification intents, one per line
pub fn print_events(events: &[GamificationEvent]) {
    for event in events {
        println!("  * {}", event);
    }
}

/// Flush pending writes and surface a storage failure, if any
pub fn finish(store: UnifiedStateStore) {
    store.flush();
    if let Some(advisory) = store.take_storage_advisory() {
        eprintln!("Warning: progress could not be saved: {}", advisory);
    }
}
