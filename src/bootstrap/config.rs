//! # Configuration Loader
//!
//! Reads the optional TOML file into the [`AppConfig`] DTO, then applies
//! defaults through [`AppConfig::resolve`]. No validation happens here.

use std::path::{Path, PathBuf};

use anyhow::Context;
use pl_core::config::AppConfig;
use pl_core::ports::AppDirsPort;
use pl_platform::DirsAppDirsAdapter;

/// File name looked up in the data directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// Pure data loading: missing sections and keys become empty values.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Build the effective configuration.
///
/// An explicit path must exist. Without one, `<data_dir>/config.toml` is
/// used when present, otherwise every value falls back to its default.
pub fn resolve_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let default_data_dir = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to determine the data directory")?
        .app_data_root;
    resolve_config_in(explicit, default_data_dir)
}

fn resolve_config_in(
    explicit: Option<&Path>,
    default_data_dir: PathBuf,
) -> anyhow::Result<AppConfig> {
    let raw = match explicit {
        Some(path) => load_config(path)?,
        None => {
            let candidate = default_data_dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                load_config(&candidate)?
            } else {
                AppConfig::empty()
            }
        }
    };
    Ok(raw.resolve(default_data_dir))
}
