use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{
    ext::WorkspacePathExt,
    filesystem::OverlapPolicy,
    provider::{DEFAULT_FALLBACK_REFERENCE, RefreshPolicy},
    source::ReferencePoint,
};

const CONFIG_FILE_NAME: &str = ".branch-diff.yaml";

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Settings read from `.branch-diff.yaml` in the workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub reference: Option<ReferencePoint>,
    pub fallback_reference: ReferencePoint,
    pub sort: bool,
    pub overlapping_paths: OverlapPolicy,
    pub refresh_policy: RefreshPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference: None,
            fallback_reference: ReferencePoint::new(DEFAULT_FALLBACK_REFERENCE),
            sort: false,
            overlapping_paths: OverlapPolicy::default(),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl Config {
    pub async fn read(root: &Path) -> Result<Self, ConfigError> {
        Self::from_path(get_config_file_path(root)).await
    }

    /// Reads the config file at `path`; a missing file yields the defaults.
    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigError> {
        debug!("Opening config file: {}", path.best_effort_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).context(ReadSnafu {
                    file_path: path.best_effort_display(),
                });
            }
        };
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_display(),
        })?;
        contents.as_str().try_into()
    }

    fn apply_entries(&mut self, top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<(), ConfigError> {
        for (key, value) in top_level {
            let Some(key) = key.as_str() else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };

            match key {
                "reference" => {
                    self.reference = optional_string(key, value)?
                        .map(ReferencePoint::new)
                        .filter(|reference| !reference.is_empty());
                }
                "fallback_reference" => {
                    self.fallback_reference = ReferencePoint::new(string(key, value)?);
                }
                "sort" => {
                    self.sort = boolean(key, value)?;
                }
                "overlapping_paths" => {
                    let name = string(key, value)?;
                    self.overlapping_paths =
                        OverlapPolicy::parse(name).context(InvalidValueSnafu {
                            key,
                            value: name,
                        })?;
                }
                "refresh_policy" => {
                    let name = string(key, value)?;
                    self.refresh_policy =
                        RefreshPolicy::parse(name).context(InvalidValueSnafu {
                            key,
                            value: name,
                        })?;
                }
                _ => debug!("Ignoring unknown config key '{}'", key),
            }
        }

        Ok(())
    }
}

fn string<'a>(key: &str, value: &'a Yaml) -> Result<&'a str, ConfigError> {
    value.as_str().context(InvalidValueSnafu {
        key,
        value: format!("{:?}", value),
    })
}

fn optional_string<'a>(key: &str, value: &'a Yaml) -> Result<Option<&'a str>, ConfigError> {
    match value {
        Yaml::Value(Scalar::Null) => Ok(None),
        _ => string(key, value).map(Some),
    }
}

fn boolean(key: &str, value: &Yaml) -> Result<bool, ConfigError> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
        _ => InvalidValueSnafu {
            key,
            value: format!("{:?}", value),
        }
        .fail(),
    }
}

impl TryFrom<&str> for Config {
    type Error = ConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| ConfigError::ParseError { source: e })?;

        let mut config = Config::default();
        let Some(document) = documents.first() else {
            return Ok(config);
        };
        if matches!(document, Yaml::Value(Scalar::Null)) {
            return Ok(config);
        }

        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;
        config.apply_entries(top_level)?;
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Invalid value for '{}': {}", key, value))]
    InvalidValue { key: String, value: String },
}
