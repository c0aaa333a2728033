//! Process-wide settings: where datasets are cached and which host serves
//! the archives.
//!
//! Resolution order, later wins:
//! 1. built-in defaults (`$HOME/.tractodata`, `https://osf.io/`)
//! 2. an optional JSON file
//! 3. environment variables (`TRACTODATA_HOME`, `TRACTODATA_URL`)
//! 4. explicit CLI flags
//!
//! The result is resolved once and passed down explicitly.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const HOME_ENV: &str = "TRACTODATA_HOME";
pub const URL_ENV: &str = "TRACTODATA_URL";

pub const DEFAULT_DIRNAME: &str = ".tractodata";
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://osf.io/";

const DATASETS_DIRNAME: &str = "datasets";
const REMOTE_DOWNLOAD_SUFFIX: &str = "download";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No home directory found; set TRACTODATA_HOME, --home or root_directory in the config file")]
    NoHomeDirectory,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TractodataConfig {
    /// Filesystem location of the cached datasets.
    pub root_directory: PathBuf,
    /// Host the dataset archives are served from.
    pub remote_base_url: String,
}

/// One settings layer (config file or CLI flags); any key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub root_directory: Option<PathBuf>,
    pub remote_base_url: Option<String>,
}

/// `$HOME/.tractodata`
pub fn default_root_directory() -> ConfigResult<PathBuf> {
    let mut dir = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    dir.push(DEFAULT_DIRNAME);
    Ok(dir)
}

impl TractodataConfig {
    /// Defaults, optionally overlaid by `config_path`, then by the
    /// environment, then by `flags`.
    pub fn load(config_path: Option<&Path>, flags: PartialConfig) -> ConfigResult<Self> {
        let file = match config_path {
            Some(path) => read_config_file(path)?,
            None => PartialConfig::default(),
        };
        Self::resolve(file, flags, |key| env::var(key).ok())
    }

    /// Read a JSON file; keys it omits keep their defaults.
    pub fn from_json_file(path: &Path) -> ConfigResult<Self> {
        Self::resolve(read_config_file(path)?, PartialConfig::default(), |_| None)
    }

    /// The home directory is only consulted when no layer names the root
    /// directory.
    fn resolve<F>(file: PartialConfig, flags: PartialConfig, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_home = lookup(HOME_ENV).filter(|v| !v.is_empty());
        if let Some(value) = &env_home {
            log::debug!("{HOME_ENV} overrides root directory: {value}");
        }
        let env_url = lookup(URL_ENV).filter(|v| !v.is_empty());
        if let Some(value) = &env_url {
            log::debug!("{URL_ENV} overrides remote base URL: {value}");
        }

        let root_directory = match flags
            .root_directory
            .or(env_home.map(PathBuf::from))
            .or(file.root_directory)
        {
            Some(dir) => dir,
            None => default_root_directory()?,
        };
        let remote_base_url = flags
            .remote_base_url
            .or(env_url)
            .or(file.remote_base_url)
            .unwrap_or_else(|| DEFAULT_REMOTE_BASE_URL.to_string());

        Ok(Self {
            root_directory,
            remote_base_url,
        })
    }

    /// `<root>/datasets`
    pub fn datasets_dir(&self) -> PathBuf {
        self.root_directory.join(DATASETS_DIRNAME)
    }

    /// `<root>/datasets/<components...>`, e.g. `["fibercup", "raw", "sub-01", "anat"]`.
    pub fn dataset_dir<I, P>(&self, components: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut dir = self.datasets_dir();
        dir.extend(components);
        dir
    }

    /// Download URL of a remote resource: `<base>/<resource_id>/download`.
    pub fn remote_url(&self, resource_id: &str) -> String {
        format!(
            "{}/{}/{REMOTE_DOWNLOAD_SUFFIX}",
            self.remote_base_url.trim_end_matches('/'),
            resource_id.trim_matches('/')
        )
    }
}

fn read_config_file(path: &Path) -> ConfigResult<PartialConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn fixed() -> TractodataConfig {
        TractodataConfig {
            root_directory: PathBuf::from("/data/tractodata"),
            remote_base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
        }
    }

    #[test]
    fn environment_overrides_set_values_only() {
        let vars: HashMap<&str, &str> = [(HOME_ENV, "/scratch/td"), (URL_ENV, "")].into();
        let file = PartialConfig {
            root_directory: Some(PathBuf::from("/data/tractodata")),
            remote_base_url: Some("https://mirror.example.org/".into()),
        };
        let lookup = |key: &str| vars.get(key).map(|v| v.to_string());
        let config = TractodataConfig::resolve(file.clone(), PartialConfig::default(), lookup).unwrap();

        assert_eq!(config.root_directory, PathBuf::from("/scratch/td"));
        assert_eq!(config.remote_base_url, "https://mirror.example.org/");

        let flags = PartialConfig {
            root_directory: Some(PathBuf::from("/mnt/td")),
            remote_base_url: None,
        };
        let config = TractodataConfig::resolve(file, flags, lookup).unwrap();
        assert_eq!(config.root_directory, PathBuf::from("/mnt/td"));
    }

    #[test]
    fn explicit_root_skips_home_lookup() {
        let file = PartialConfig {
            root_directory: Some(PathBuf::from("/data/tractodata")),
            remote_base_url: None,
        };
        let config = TractodataConfig::resolve(PartialConfig::default(), file, |_| None).unwrap();
        assert_eq!(config, fixed());
    }

    #[test]
    fn missing_home_is_reported() {
        let err = ConfigError::NoHomeDirectory;
        assert!(err.to_string().contains(HOME_ENV));

    }

    #[test]
    fn dataset_dir_nests_under_datasets() {
        let config = fixed();
        assert_eq!(
            config.dataset_dir(["fibercup", "raw", "sub-01", "anat"]),
            PathBuf::from("/data/tractodata/datasets/fibercup/raw/sub-01/anat")
        );
    }

    #[test]
    fn remote_url_has_single_separators() {
        let mut config = fixed();
        assert_eq!(config.remote_url("2xmgw"), "https://osf.io/2xmgw/download");
        config.remote_base_url = "https://mirror.example.org/files".into();
        assert_eq!(config.remote_url("/br4ds/"), "https://mirror.example.org/files/br4ds/download");
    }

    #[test]
    fn json_file_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tractodata.json");
        fs::write(&path, r#"{"root_directory": "/data/tractodata"}"#).unwrap();

        let config = TractodataConfig::from_json_file(&path).unwrap();
        assert_eq!(config, fixed());

        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TractodataConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
