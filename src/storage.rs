//! Config persistence: path discovery and JSON load/save.
//!
//! The config file is named after the running executable's stem, so copying
//! the binary under a new name gives it an independent alias set. Discovery
//! order: `<stem>.json` next to the executable, then
//! `{user config dir}/aka/<stem>.json`, falling back to the exe-adjacent path
//! (which is where `--add` creates the file on first use).

use crate::model::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "aka";

/// Locate the config file for this invocation.
pub fn default_config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("locating the running executable")?;
    let adjacent = exe.with_extension("json");
    if adjacent.is_file() {
        return Ok(adjacent);
    }

    if let Some(config_dir) = dirs::config_dir() {
        if let Some(file_name) = adjacent.file_name() {
            let in_config_dir = config_dir.join(CONFIG_DIR_NAME).join(file_name);
            if in_config_dir.is_file() {
                return Ok(in_config_dir);
            }
        }
    }

    Ok(adjacent)
}

/// Load the config. A missing file is an empty config, not an error.
pub fn load(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("reading config {}", path.display()));
        }
    };
    serde_json::from_str(&content).with_context(|| format!("decoding config {}", path.display()))
}

/// Write the config as pretty-printed JSON, creating parent directories as
/// needed.
pub fn save(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
    }
    let content = serde_json::to_string_pretty(config).context("encoding config")?;
    fs::write(path, content).with_context(|| format!("writing config {}", path.display()))
}
