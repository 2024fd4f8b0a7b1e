//! Config file discovery and loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use tagflow::{TagflowError, config::AppConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for TagflowError {
    fn from(err: ConfigError) -> Self {
        TagflowError::Config(err.to_string())
    }
}

/// Relative path checked in the working directory.
const LOCAL_CONFIG: &str = "tagflow/config.toml";

/// Loads the [`AppConfig`] for this run.
///
/// An explicit path must exist. Otherwise the first existing file among
/// `./tagflow/config.toml` and `<platform config dir>/config.toml` is used,
/// and without either the defaults apply.
///
/// # Errors
///
/// Returns [`TagflowError::Config`] if the explicit file is missing or any
/// chosen file is not valid TOML for [`AppConfig`].
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, TagflowError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path:? = path; "Loading configuration from explicit path");
        return load_config_file(path);
    }

    match discovered_config() {
        Some(path) => {
            info!(path:? = path; "Loading discovered configuration");
            load_config_file(&path)
        }
        None => {
            debug!("No configuration file found, using default configuration");
            Ok(AppConfig::default())
        }
    }
}

/// First existing config file in the implicit search locations.
fn discovered_config() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG)];
    match ProjectDirs::from("com", "tagflow", "tagflow") {
        Some(dirs) => candidates.push(dirs.config_dir().join("config.toml")),
        None => debug!("Could not determine platform-specific config directory"),
    }

    candidates.into_iter().find(|path| {
        let exists = path.is_file();
        debug!(path:? = path, exists; "Checked configuration location");
        exists
    })
}

fn load_config_file(path: &Path) -> Result<AppConfig, TagflowError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
        .into()
    })
}
