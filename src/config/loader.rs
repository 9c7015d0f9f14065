// Configuration loader
// Loads client settings from ~/.finsight/config.toml and environment variables

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::ClientConfig;

pub const BASE_URL_ENV: &str = "FINSIGHT_BASE_URL";
pub const USER_ID_ENV: &str = "FINSIGHT_USER_ID";

#[derive(serde::Deserialize)]
struct TomlConfig {
    #[serde(default)]
    client: Option<ClientConfig>,
}

/// Default config file location (~/.finsight/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".finsight").join("config.toml"))
}

/// Load configuration: defaults, then the config file if present, then environment
pub fn load_config() -> Result<ClientConfig> {
    let mut config = match default_config_path() {
        Some(path) if path.exists() => read_config_file(&path)?,
        _ => ClientConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_config_from(path: &Path) -> Result<ClientConfig> {
    if !path.exists() {
        bail!("Config file not found: {}", path.display());
    }

    let mut config = read_config_file(path)?;
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ClientConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let toml_config: TomlConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(toml_config.client.unwrap_or_default())
}

fn apply_env_overrides(config: &mut ClientConfig) {
    if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
        if !base_url.trim().is_empty() {
            config.base_url = base_url.trim().to_string();
        }
    }
    if let Ok(user_id) = std::env::var(USER_ID_ENV) {
        if !user_id.trim().is_empty() {
            config.user_id = user_id.trim().to_string();
        }
    }
}

/// Check that the base URL is an absolute http(s) URL and the user id is set
pub fn validate(config: &ClientConfig) -> Result<()> {
    let url = reqwest::Url::parse(&config.base_url)
        .with_context(|| format!("Invalid base URL: {}", config.base_url))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("Base URL must use http or https: {}", config.base_url);
    }

    if config.user_id.trim().is_empty() {
        bail!("User id must not be empty");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_client_table() {
        let file = write_config(
            r#"
[client]
base_url = "http://10.0.0.5:9000"
user_id = "user_123"
timeout_seconds = 30
"#,
        );

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.user_id, "user_123");
        assert_eq!(config.timeout_seconds, Some(30));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let file = write_config("[client]\nuser_id = \"alice\"\n");

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.timeout_seconds, None);
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_malformed_toml_fails() {
        let file = write_config("[client\nbase_url = ");
        assert!(read_config_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_from(&dir.path().join("nope.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(validate(&ClientConfig::new("not a url")).is_err());
        assert!(validate(&ClientConfig::new("ftp://example.com")).is_err());
        assert!(validate(&ClientConfig::new("https://finsight.example.com/api")).is_ok());
        assert!(validate(&ClientConfig::default().with_user_id(" ")).is_err());
    }

    #[test]
    fn test_root_strips_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.root(), "http://localhost:8000");
    }
}
