use std::fs;
use std::path::{Path, PathBuf};

use supplychain_game::{Catalog, CatalogError, ConfigError, DataLoader, GameConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Loads catalog and configuration from JSON files, falling back to the
/// built-in data for whichever path is absent.
#[derive(Debug, Clone, Default)]
pub struct FileData {
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl FileData {
    #[must_use]
    pub const fn new(catalog: Option<PathBuf>, config: Option<PathBuf>) -> Self {
        Self { catalog, config }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl DataLoader for FileData {
    type Error = LoadError;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        match &self.catalog {
            Some(path) => {
                log::info!("loading catalog from {}", path.display());
                Ok(Catalog::from_json(&read(path)?)?)
            }
            None => Ok(Catalog::standard().clone()),
        }
    }

    fn load_config(&self) -> Result<GameConfig, Self::Error> {
        match &self.config {
            Some(path) => {
                log::info!("loading config from {}", path.display());
                Ok(GameConfig::from_json(&read(path)?)?)
            }
            None => Ok(GameConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplychain_game::GameEngine;

    fn temp_file(label: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "supplychain-loader-{label}-{}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_to_builtin_data() {
        let loader = FileData::default();
        assert_eq!(loader.load_catalog().unwrap(), *Catalog::standard());
        assert_eq!(loader.load_config().unwrap(), GameConfig::default());
    }

    #[test]
    fn reads_partial_config_over_defaults() {
        let path = temp_file("config", r#"{ "max_rounds": 4, "initial_cash": 9000 }"#);
        let engine = GameEngine::new(FileData::new(None, Some(path))).unwrap();
        assert_eq!(engine.config().max_rounds, 4);
        assert_eq!(engine.config().initial_cash, 9_000);
        assert_eq!(
            engine.config().holding_cost_per_unit,
            GameConfig::default().holding_cost_per_unit
        );
    }

    #[test]
    fn reads_catalog_roundtrip() {
        let json = serde_json::to_string(Catalog::standard()).unwrap();
        let path = temp_file("catalog", &json);
        let loader = FileData::new(Some(path), None);
        assert_eq!(loader.load_catalog().unwrap(), *Catalog::standard());
    }

    #[test]
    fn missing_file_reports_path() {
        let loader = FileData::new(Some(PathBuf::from("/nonexistent/catalog.json")), None);
        let err = loader.load_catalog().unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let path = temp_file("bad-config", r#"{ "max_rounds": 0 }"#);
        let loader = FileData::new(None, Some(path));
        assert!(matches!(loader.load_config(), Err(LoadError::Config(_))));
    }
}
