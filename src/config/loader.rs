use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult, ConfigError};

use super::types::ClientConfig;

/// Default file names probed in the working directory, in order.
const DEFAULT_CONFIG_FILES: [&str; 2] = ["ucuptest.toml", "ucuptest.json"];

/// Loads a configuration file from the provided path or default locations.
///
/// # Errors
///
/// Returns an error when the config file cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> ClientResult<Option<ClientConfig>> {
    if let Some(path) = path {
        let path = PathBuf::from(path);
        return Ok(Some(load_config_file(&path)?));
    }

    for name in DEFAULT_CONFIG_FILES {
        let candidate = PathBuf::from(name);
        if candidate.exists() {
            return Ok(Some(load_config_file(&candidate)?));
        }
    }

    Ok(None)
}

/// Parses a single `.toml` or `.json` configuration file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, has an unsupported
/// extension, or does not deserialize into [`ClientConfig`].
pub fn load_config_file(path: &Path) -> ClientResult<ClientConfig> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        ClientError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            ClientError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            ClientError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(ClientError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(ClientError::config(ConfigError::MissingExtension)),
    }
}
