//! CLI command implementations.

pub mod config;
pub mod describe;
pub mod providers;

use altai_core::Config;
use std::path::{Path, PathBuf};

/// Config file path: `--config` (with `~` expanded) or the platform default.
pub fn config_path(flag: Option<&str>) -> PathBuf {
    match flag {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => Config::default_path(),
    }
}

/// Load the config at `path`.
///
/// A missing file means defaults unless the path was given explicitly.
pub fn load_config(path: &Path, explicit: bool) -> anyhow::Result<Config> {
    if !explicit && !path.exists() {
        return Ok(Config::default());
    }
    Config::load_from(path)
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_expands_tilde() {
        let path = config_path(Some("~/altai.toml"));
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("altai.toml"));

        assert_eq!(config_path(None), Config::default_path());
    }

    #[test]
    fn test_missing_default_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_config(&path, false).unwrap();
        assert_eq!(config.harness.timeout_ms, 30_000);

        assert!(load_config(&path, true).is_err());
    }
}
