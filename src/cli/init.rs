//! Init command implementation

use anyhow::{bail, Result};
use std::path::Path;
use tracing::info;

use studyquest::config::Config;

/// Write the commented default config
pub fn init_command(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::global_config_path);

    if path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        );
    }

    Config::write_default(&path)?;
    info!("Created {}", path.display());
    println!("Created {}", path.display());
    Ok(())
}
