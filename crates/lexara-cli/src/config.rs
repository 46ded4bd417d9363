//! Optional TOML configuration file for `lexara-cli`'s own adapter
//! defaults (data directory, HTTP bind address). The engine's ranking
//! constants are fixed in `lexara_core::ranker` and are never read from
//! here.
//!
//! Precedence, highest to lowest: CLI flags > config file > built-in
//! defaults. There is no environment-variable layer for this surface.

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileConfig {
    /// Load the config file at `path` if it exists; a missing file is not
    /// an error, it just yields defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The default config file location, `~/.lexara/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs_home().map(|home| home.join(".lexara").join("config.toml"))
    }
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = FileConfig::load(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(config.data_dir.is_none());
        assert!(config.host.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn parses_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "host = \"0.0.0.0\"\nport = 8080\n").unwrap();

        let config = FileConfig::load(&path).unwrap();
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert!(config.data_dir.is_none());
    }
}
