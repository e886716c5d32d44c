//! Configuration loader for Causerie.
//!
//! Reads `config.toml` from the data directory (`~/.causerie/` by default)
//! and deserializes it into [`BotConfig`]. Falls back to defaults when the
//! file is missing or malformed -- the bot must come up with an empty data
//! directory on first run.

use std::path::{Path, PathBuf};

use causerie_types::config::BotConfig;

/// Resolve the data directory holding `config.toml` and the credential file.
///
/// Precedence: `CAUSERIE_DATA_DIR` env var, then `~/.causerie`, then a
/// relative `.causerie` as a last resort.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CAUSERIE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".causerie");
    }

    PathBuf::from(".causerie")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: defaults, silently.
/// - Unreadable or unparsable file: warn and use defaults.
pub async fn load_config(data_dir: &Path) -> BotConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "no config.toml at {}, using defaults",
                config_path.display()
            );
            return BotConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return BotConfig::default();
        }
    };

    match toml::from_str::<BotConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            BotConfig::default()
        }
    }
}
