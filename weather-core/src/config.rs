use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Endpoint used when nothing is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000/api/chat";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// backend_url = "http://localhost:8000/api/chat"
/// timeout_secs = 30
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Chat endpoint of the inference backend.
    pub backend_url: Option<String>,

    /// Optional transport timeout. The query flow itself never times out.
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// The configured endpoint, or the default one, parsed and validated.
    pub fn backend_url(&self) -> Result<Url> {
        let raw = self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL);
        parse_backend_url(raw)
    }

    /// Validate and store a new endpoint.
    pub fn set_backend_url(&mut self, raw: &str) -> Result<()> {
        let url = parse_backend_url(raw)?;
        self.backend_url = Some(url.to_string());
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-query", "weather-query")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn parse_backend_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| {
        format!(
            "Invalid backend URL '{raw}'.\n\
             Hint: run `weather-query configure` or pass `--backend http://host:port/api/chat`."
        )
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Invalid backend URL '{raw}': unsupported scheme '{other}', expected http or https."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_backend_url_is_local_chat_endpoint() {
        let cfg = Config::default();
        let url = cfg.backend_url().expect("default url must parse");

        assert_eq!(url.as_str(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn set_backend_url_overrides_default() {
        let mut cfg = Config::default();
        cfg.set_backend_url("https://weather.example.com/api/chat").expect("valid url");

        let url = cfg.backend_url().expect("configured url must parse");
        assert_eq!(url.host_str(), Some("weather.example.com"));
        assert_eq!(url.path(), "/api/chat");
    }

    #[test]
    fn set_backend_url_rejects_garbage_and_keeps_previous() {
        let mut cfg = Config::default();
        cfg.set_backend_url("http://127.0.0.1:9000/chat").expect("valid url");

        let err = cfg.set_backend_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid backend URL"));

        let err = cfg.set_backend_url("ftp://example.com/chat").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));

        assert_eq!(cfg.backend_url.as_deref(), Some("http://127.0.0.1:9000/chat"));
    }

    #[test]
    fn zero_timeout_means_none() {
        let mut cfg = Config::default();
        assert_eq!(cfg.timeout(), None);

        cfg.timeout_secs = Some(0);
        assert_eq!(cfg.timeout(), None);

        cfg.timeout_secs = Some(15);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let cfg = Config {
            backend_url: Some("http://localhost:8000/api/chat".into()),
            timeout_secs: Some(20),
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn empty_file_parses_to_defaults() {
        let parsed: Config = toml::from_str("").expect("empty config is valid");
        assert_eq!(parsed, Config::default());
    }
}
