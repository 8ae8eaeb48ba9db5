//! YAML configuration loading shared by the bridge and inspector binaries.

use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parses YAML, treating an empty document as all defaults.
pub fn from_yaml_str<T: DeserializeOwned + Default>(text: &str) -> Result<T, ConfigError> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

pub async fn load_from<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_yaml_str(&text)
}

/// Reads the file named by `env_var` (or `default_path`). A missing or invalid
/// file is logged and defaults are used.
pub async fn load_or_default<T: DeserializeOwned + Default>(env_var: &str, default_path: &str, component: &str) -> T {
    let path = std::env::var(env_var).unwrap_or_else(|_| default_path.to_string());
    let path = Path::new(&path);
    if !path.exists() {
        info!("[{component}] no {}, using default config", path.display());
        return T::default();
    }
    load_from(path).await.unwrap_or_else(|e| {
        warn!("[{component}] {e}, using default config");
        T::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        channel: String,
        port: u16,
    }

    #[test]
    fn empty_document_is_default() {
        let parsed: Sample = from_yaml_str("   \n").unwrap();
        assert_eq!(parsed, Sample::default());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let parsed: Sample = from_yaml_str("port: 1884\n").unwrap();
        assert_eq!(parsed.port, 1884);
        assert_eq!(parsed.channel, "");
    }

    #[test]
    fn invalid_document_is_an_error() {
        let parsed: Result<Sample, _> = from_yaml_str("port: [nope");
        assert!(matches!(parsed, Err(ConfigError::Yaml(_))));
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_default() {
        let parsed: Sample = load_or_default("SCENELENS_TEST_UNSET_CONFIG", "/nonexistent/scenelens.yaml", "test").await;
        assert_eq!(parsed, Sample::default());
    }
}
