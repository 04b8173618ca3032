use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Web form settings
    pub server: ServerConfig,

    /// YouTube client settings
    pub youtube: YoutubeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the web form listens on
    pub bind_addr: String,

    /// Number of HTTP workers (actix default when unset)
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Accept-Language header; YouTube localises track names with it
    pub accept_language: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Watch page URL, `{video_id}` is substituted
    pub watch_url: String,

    /// Innertube player endpoint, `{api_key}` is substituted
    pub innertube_url: String,

    /// Innertube client identity
    pub client_name: String,
    pub client_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            workers: None,
        }
    }
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
            accept_language: "en-US".to_string(),
            request_timeout_secs: 30,
            watch_url: "https://www.youtube.com/watch?v={video_id}".to_string(),
            innertube_url: "https://www.youtube.com/youtubei/v1/player?key={api_key}".to_string(),
            client_name: "ANDROID".to_string(),
            client_version: "20.10.38".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, `./config.yaml`, or the user config dir.
    /// Falls back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::config_path().ok().filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Read and parse one YAML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;
        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Save configuration to the user config path
    pub fn save(&self) -> Result<PathBuf> {
        let config_path = Self::user_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs_err::write(&config_path, content).context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        Self::user_config_path()
    }

    fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("tubescript").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_addr.trim().is_empty() {
            anyhow::bail!("server.bind_addr must not be empty");
        }
        if self.server.workers == Some(0) {
            anyhow::bail!("server.workers must be at least 1");
        }
        if self.youtube.request_timeout_secs == 0 {
            anyhow::bail!("youtube.request_timeout_secs must be greater than 0");
        }

        for (name, template) in [
            ("youtube.watch_url", &self.youtube.watch_url),
            ("youtube.innertube_url", &self.youtube.innertube_url),
        ] {
            Url::parse(template).with_context(|| format!("{} is not a valid URL: {}", name, template))?;
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Bind Address: {}", self.server.bind_addr);
        if let Some(workers) = self.server.workers {
            println!("  Workers: {}", workers);
        }
        println!("  Accept-Language: {}", self.youtube.accept_language);
        println!("  Request Timeout: {}s", self.youtube.request_timeout_secs);
        println!("  Innertube Client: {} {}", self.youtube.client_name, self.youtube.client_version);
        if let Ok(path) = Self::user_config_path() {
            println!("  Config File: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr, "127.0.0.1:5000");
        assert_eq!(config.youtube.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  bind_addr: 0.0.0.0:8080\n").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.youtube, YoutubeConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/definitely/not/here.yaml"))).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.youtube.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.youtube.watch_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.workers = Some(0);
        assert!(config.validate().is_err());
    }
}
