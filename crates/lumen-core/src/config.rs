//! Application configuration
//!
//! Values are layered, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` (`--config PATH`, else `$LUMEN_CONFIG`, else the
//!    platform config dir, e.g. `~/.config/lumen/config.toml`)
//! 3. `LUMEN_DATA_DIR`, `LUMEN_LOG_FILE` and `LUMEN_SPLASH`
//!
//! Reading preferences (daily goal, streak threshold, reminders) are not
//! configuration; they live in the settings record next to the stats.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const APP_DIR: &str = "lumen";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_LOG_FILE: &str = "debug.log";

const ENV_CONFIG: &str = "LUMEN_CONFIG";
const ENV_DATA_DIR: &str = "LUMEN_DATA_DIR";
const ENV_LOG_FILE: &str = "LUMEN_LOG_FILE";
const ENV_SPLASH: &str = "LUMEN_SPLASH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the stats, settings and current-session records are kept
    pub data_dir: PathBuf,

    /// TUI log destination, `{data_dir}/debug.log` when unset
    pub log_file: Option<PathBuf>,

    /// Show the splash screen when the TUI starts
    pub splash: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            log_file: None,
            splash: true,
        }
    }
}

impl Config {
    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_with_cli_override(None)
    }

    /// Load from `path` when given on the command line, else the default location
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        Self::load_from_path(&Self::resolve_path(path))
    }

    /// Load from a file, falling back to defaults when it does not exist
    ///
    /// Creates the data directory so the first write has somewhere to go.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("Cannot read {}", path.display()));
            }
        };
        config.apply_env();

        std::fs::create_dir_all(&config.data_dir).with_context(|| {
            format!("Cannot create data directory {}", config.data_dir.display())
        })?;
        Ok(config)
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn apply_env(&mut self) {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            self.data_dir = dir.into();
        }
        if let Ok(file) = std::env::var(ENV_LOG_FILE) {
            // Set but empty means "back to the default"
            self.log_file = (!file.is_empty()).then(|| file.into());
        }
        if let Ok(flag) = std::env::var(ENV_SPLASH) {
            match flag.parse() {
                Ok(splash) => self.splash = splash,
                Err(_) => warn!("Ignoring {}={:?}, expected true or false", ENV_SPLASH, flag),
            }
        }
    }

    /// Write as TOML, creating parent directories as needed
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Cannot encode config")?;
        std::fs::write(path, text).with_context(|| format!("Cannot write {}", path.display()))
    }

    /// The config file in effect when no `--config` is given
    pub fn config_file_path() -> PathBuf {
        Self::resolve_path(None)
    }

    fn resolve_path(cli: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = cli {
            return path.clone();
        }
        if let Ok(path) = std::env::var(ENV_CONFIG) {
            return path.into();
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => path.clone(),
            None => self.data_dir.join(DEFAULT_LOG_FILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `f` with the LUMEN_* variables cleared, then set to `vars`
    fn with_env<R>(vars: &[(&str, &str)], f: impl FnOnce() -> R) -> R {
        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let names = [ENV_CONFIG, ENV_DATA_DIR, ENV_LOG_FILE, ENV_SPLASH];
        let saved: Vec<_> = names.iter().map(|n| (*n, env::var(n).ok())).collect();
        for name in names {
            env::remove_var(name);
        }
        for (name, value) in vars {
            env::set_var(name, value);
        }

        let result = f();

        for (name, value) in saved {
            match value {
                Some(v) => env::set_var(name, v),
                None => env::remove_var(name),
            }
        }
        result
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.splash);
        assert!(config.log_file.is_none());
        assert!(config.data_dir.ends_with("lumen"));
        assert_eq!(config.log_path(), config.data_dir.join("debug.log"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::parse("splash = false").unwrap();
        assert!(!config.splash);
        assert_eq!(config.data_dir, Config::default().data_dir);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "data_dir = \"/ignored\"\nsplash = true\n").unwrap();
        let data_dir = temp_dir.path().join("env-data");

        let config = with_env(
            &[
                (ENV_DATA_DIR, data_dir.to_str().unwrap()),
                (ENV_LOG_FILE, "/tmp/lumen-tui.log"),
                (ENV_SPLASH, "false"),
            ],
            || Config::load_from_path(&path).unwrap(),
        );

        assert_eq!(config.data_dir, data_dir);
        assert!(data_dir.is_dir());
        assert_eq!(config.log_path(), PathBuf::from("/tmp/lumen-tui.log"));
        assert!(!config.splash);
    }

    #[test]
    fn test_bad_splash_env_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        let config = with_env(
            &[(ENV_DATA_DIR, data_dir.to_str().unwrap()), (ENV_SPLASH, "sometimes")],
            || Config::load_from_path(&temp_dir.path().join("missing.toml")).unwrap(),
        );
        assert!(config.splash);
    }

    #[test]
    fn test_empty_log_file_env_clears_it() {
        let mut config = Config {
            log_file: Some("/var/log/lumen.log".into()),
            ..Config::default()
        };
        with_env(&[(ENV_LOG_FILE, "")], || config.apply_env());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_config_path_precedence() {
        let cli = PathBuf::from("/cli/config.toml");
        with_env(&[(ENV_CONFIG, "/env/config.toml")], || {
            assert_eq!(Config::resolve_path(Some(&cli)), cli);
            assert_eq!(Config::config_file_path(), PathBuf::from("/env/config.toml"));
        });
        with_env(&[], || {
            assert!(Config::config_file_path().ends_with("lumen/config.toml"));
        });
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "splash = \"yes please\"").unwrap();
        let result = with_env(&[], || Config::load_from_path(&path));
        assert!(result.is_err());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let saved = Config {
            data_dir: temp_dir.path().join("data"),
            log_file: None,
            splash: false,
        };
        saved.save_to_path(&path).unwrap();

        let loaded = with_env(&[], || Config::load_from_path(&path).unwrap());
        assert_eq!(loaded.data_dir, saved.data_dir);
        assert!(!loaded.splash);
    }
}
