mod settings;

pub use settings::{
    ApiSettings, Config, DEFAULT_BASE_URL, DEFAULT_RETRY_ATTEMPTS, DEFAULT_TIMEOUT_SECS,
};

use crate::error::{ExtratoError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the API base URL from config.toml
pub const API_URL_ENV: &str = "EXTRATOS_API_URL";

/// Get the config directory path (~/.extratos/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "extratos") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.extratos/
    let home = dirs_home().ok_or_else(|| {
        ExtratoError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".extratos"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join("config.toml")
}

/// Load config.toml, falling back to defaults when the file does not exist
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_file(config_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| ExtratoError::ConfigParse { path, source: e })
}

/// Where the effective base URL came from, for `extratos status`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSource {
    Flag,
    Env,
    ConfigFile,
    Default,
}

impl std::fmt::Display for UrlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UrlSource::Flag => "--api-url",
            UrlSource::Env => API_URL_ENV,
            UrlSource::ConfigFile => "config.toml",
            UrlSource::Default => "default",
        };
        f.write_str(s)
    }
}

/// Resolve the API base URL: flag, then environment, then config file, then default.
pub fn resolve_base_url(
    flag: Option<&str>,
    env: Option<String>,
    config: &Config,
    config_present: bool,
) -> (String, UrlSource) {
    if let Some(url) = flag.filter(|u| !u.trim().is_empty()) {
        return (normalize_base_url(url), UrlSource::Flag);
    }
    if let Some(url) = env.filter(|u| !u.trim().is_empty()) {
        return (normalize_base_url(&url), UrlSource::Env);
    }
    if config_present {
        return (normalize_base_url(&config.api.base_url), UrlSource::ConfigFile);
    }
    (DEFAULT_BASE_URL.to_string(), UrlSource::Default)
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[api]
# Base URL of the statements service. EXTRATOS_API_URL overrides it.
base_url = "http://localhost:3000"
timeout_secs = 30
# Attempts per query for connection failures and 5xx responses (uploads never retry)
retry_attempts = 2
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_everything() {
        let config = Config::default();
        let (url, source) = resolve_base_url(
            Some("http://api.example:8080/"),
            Some("http://env:1".into()),
            &config,
            true,
        );
        assert_eq!(url, "http://api.example:8080");
        assert_eq!(source, UrlSource::Flag);
    }

    #[test]
    fn env_beats_config_file() {
        let config = Config::default();
        let (url, source) = resolve_base_url(None, Some("http://env:1".into()), &config, true);
        assert_eq!(url, "http://env:1");
        assert_eq!(source, UrlSource::Env);
    }

    #[test]
    fn falls_back_to_local_default() {
        let config = Config::default();
        let (url, source) = resolve_base_url(None, Some("  ".into()), &config, false);
        assert_eq!(url, DEFAULT_BASE_URL);
        assert_eq!(source, UrlSource::Default);
    }

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.api.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }
}
