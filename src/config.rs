use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "sshpick";
const CONFIG_FILE: &str = "sshpick.toml";

fn default_password_feeder() -> String {
    "sshpass".to_string()
}

fn default_ssh_program() -> String {
    "ssh".to_string()
}

fn default_remote_term() -> String {
    "xterm-256color".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// SSH client config to browse. Defaults to `~/.ssh/config`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_config_path: Option<PathBuf>,
    #[serde(default = "default_password_feeder")]
    pub password_feeder: String,
    #[serde(default = "default_ssh_program")]
    pub ssh_program: String,
    /// `TERM` exported for the interactive shell.
    #[serde(default = "default_remote_term")]
    pub remote_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ssh_config_path: None,
            password_feeder: default_password_feeder(),
            ssh_program: default_ssh_program(),
            remote_term: default_remote_term(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// The configured SSH config path, or `~/.ssh/config`.
    pub fn ssh_config_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.ssh_config_path {
            return Ok(path.clone());
        }
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".ssh").join("config"))
    }
}

#[derive(Debug)]
pub struct ConfigManager {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_DIR);
        Self::with_dir(config_dir)
    }

    pub fn with_dir(config_dir: PathBuf) -> Result<Self> {
        // Create config directory if it doesn't exist
        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        }

        let config_file = config_dir.join(CONFIG_FILE);
        Ok(Self {
            config_dir,
            config_file,
        })
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        // If config file doesn't exist, create it with default values
        if !self.config_file.exists() {
            self.save_config(&AppConfig::default())?;
        }

        let content =
            fs::read_to_string(&self.config_file).context("Failed to read config file")?;
        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        tracing::debug!("Loaded settings from {:?}", self.config_file);
        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(&self.config_file, toml).context("Failed to write config file")?;
        Ok(())
    }

    pub fn log_dir(&self, config: &AppConfig) -> PathBuf {
        config
            .log_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join("logs"))
    }

    #[cfg(test)]
    pub fn config_path(&self) -> &std::path::Path {
        &self.config_file
    }
}

/// Settings to run with and the directory to log into.
///
/// Settings that cannot be created or read fall back to the defaults with a
/// warning, so a read-only config directory does not stop the app.
pub fn load_settings(manager: Result<ConfigManager>) -> (AppConfig, Option<PathBuf>) {
    let manager = match manager {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Warning: {:#}; using default settings", e);
            let config = AppConfig::default();
            let log_dir = config.log_dir.clone();
            return (config, log_dir);
        }
    };

    let config = manager.load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {:#}; using default settings", e);
        AppConfig::default()
    });
    let log_dir = manager.log_dir(&config);
    (config, Some(log_dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().join("sshpick")).unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(manager.config_path().exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf()).unwrap();
        fs::write(
            manager.config_path(),
            "ssh_config_path = \"/etc/ssh/alt_config\"\npassword_feeder = \"/opt/bin/sshpass\"\n",
        )
        .unwrap();

        let config = manager.load_config().unwrap();
        assert_eq!(
            config.ssh_config_path().unwrap(),
            PathBuf::from("/etc/ssh/alt_config")
        );
        assert_eq!(config.password_feeder, "/opt/bin/sshpass");
        assert_eq!(config.ssh_program, "ssh");
        assert_eq!(config.remote_term, "xterm-256color");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.config_path(), "password_feeder = [").unwrap();
        assert!(manager.load_config().is_err());
    }

    #[test]
    fn test_log_dir_default_and_override() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf()).unwrap();
        let mut config = AppConfig::default();
        assert_eq!(manager.log_dir(&config), dir.path().join("logs"));

        config.log_dir = Some(PathBuf::from("/var/tmp/sshpick"));
        assert_eq!(manager.log_dir(&config), PathBuf::from("/var/tmp/sshpick"));
    }

    #[test]
    fn test_unusable_settings_dir_falls_back_to_defaults() {
        let (config, log_dir) = load_settings(Err(anyhow::anyhow!("read-only file system")));
        assert_eq!(config, AppConfig::default());
        assert_eq!(log_dir, None);
    }

    #[test]
    fn test_unreadable_settings_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.config_path(), "password_feeder = [").unwrap();

        let (config, log_dir) = load_settings(Ok(manager));
        assert_eq!(config, AppConfig::default());
        assert_eq!(log_dir, Some(dir.path().join("logs")));
    }
}
