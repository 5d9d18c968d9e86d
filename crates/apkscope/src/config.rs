use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    MissingFile(PathBuf),

    #[error("scan_workers must be at least 1")]
    NoWorkers,

    #[error(transparent)]
    Figment(#[from] figment::Error),
}

/// Service configuration.
///
/// Layered from built-in defaults, then a TOML file, then `APKSCOPE_*`
/// environment variables.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding installed packages.
    pub package_root: PathBuf,
    /// Destination of extracted packages.
    pub cache_dir: PathBuf,
    /// Upper bound on concurrently running scans.
    pub scan_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_root: PathBuf::from("/data/app"),
            cache_dir: std::env::temp_dir().join("apkscope"),
            scan_workers: 4,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "apkscope.toml";
    pub const ENV_PREFIX: &'static str = "APKSCOPE_";

    /// Load from `file` if given (which must then exist), else from
    /// `apkscope.toml` in the working directory when present.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(Self::FILE_NAME),
        };
        Self::figment(&file).extract::<Self>()?.validate()
    }

    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(Self::ENV_PREFIX))
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.scan_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.package_root, PathBuf::from("/data/app"));
        assert!(config.cache_dir.ends_with("apkscope"));
        assert_eq!(config.scan_workers, 4);
    }

    #[test]
    fn explicit_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile(_)));
    }

    #[test]
    fn layers_file_then_environment() {
        Jail::expect_with(|jail| {
            jail.create_file(
                Config::FILE_NAME,
                r#"
                    package_root = "/srv/packages"
                    scan_workers = 8
                "#,
            )?;
            jail.set_env("APKSCOPE_SCAN_WORKERS", "2");

            let config = Config::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.package_root, PathBuf::from("/srv/packages"));
            assert_eq!(config.scan_workers, 2);
            assert_eq!(config.cache_dir, Config::default().cache_dir);
            Ok(())
        });
    }

    #[test]
    fn zero_workers_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "scan_workers = 0")?;
            let err = Config::load(Some(Path::new("custom.toml"))).unwrap_err();
            assert!(matches!(err, ConfigError::NoWorkers));
            Ok(())
        });
    }

    #[test]
    fn absent_default_file_is_fine() {
        Jail::expect_with(|_| {
            assert_eq!(Config::load(None).map_err(|e| e.to_string())?, Config::default());
            Ok(())
        });
    }
}
