//! Where `settings.toml` lives.
//!
//! `TEXT_PROCESSOR_CONFIG_DIR` overrides the platform directory; otherwise
//! `dirs::config_dir()/text-processor/` is used (`%APPDATA%` on Windows,
//! `~/Library/Application Support` on macOS, `~/.config` on Linux).

use std::path::{Path, PathBuf};

const APP_DIR: &str = "text-processor";
const SETTINGS_FILE: &str = "settings.toml";

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "TEXT_PROCESSOR_CONFIG_DIR";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub settings_file: PathBuf,
}

impl AppPaths {
    /// Resolve from the environment, then the platform, then `./text-processor`.
    pub fn new() -> Self {
        match std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => Self::in_dir(PathBuf::from(dir)),
            None => Self::in_dir(
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR),
            ),
        }
    }

    /// Paths rooted at an explicit directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let config_dir = dir.as_ref().to_path_buf();
        Self {
            settings_file: config_dir.join(SETTINGS_FILE),
            config_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_sits_in_the_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths::in_dir(dir.path());
        assert_eq!(paths.config_dir, dir.path());
        assert_eq!(paths.settings_file, dir.path().join("settings.toml"));
    }

    #[test]
    fn platform_default_is_named_after_the_app() {
        if std::env::var_os(CONFIG_DIR_ENV).is_some() {
            return;
        }
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_DIR));
        assert!(paths.settings_file.starts_with(&paths.config_dir));
    }
}
