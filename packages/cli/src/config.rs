//! Optional TOML settings file.
//!
//! Every setting can also come from a command-line flag or, for some, an
//! environment variable (handled by `clap`). A value given there always
//! wins over the file, and the file wins over the built-in default.
//!
//! ```toml
//! db_path = "data/geogrid.duckdb"
//! grid_km = 33.0
//! input = "boundaries/nigeria.geojson"
//! reference = "STATE"
//! states_file = "boundaries/states.json"
//! ```

use std::path::{Path, PathBuf};

use geogrid_grid::pipeline::DEFAULT_GRID_KM;
use geogrid_grid_models::ReferenceKind;
use serde::Deserialize;

/// Errors loading the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid settings TOML.
    #[error("Failed to parse config {path}: {source}")]
    Toml {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Database file.
    pub db_path: Option<PathBuf>,
    /// Grid cell size in kilometres.
    pub grid_km: Option<f64>,
    /// Boundary `GeoJSON` to grid.
    pub input: Option<PathBuf>,
    /// Which polygon table to use.
    pub reference: Option<ReferenceKind>,
    /// JSON file of state records for `seed-states`.
    pub states_file: Option<PathBuf>,
}

impl Settings {
    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::parse(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded settings from {}: {settings:?}", path.display());
        Ok(settings)
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::de::from_str(text)
    }

    /// Database path: flag or environment, then file, then
    /// `data/geogrid.duckdb`.
    #[must_use]
    pub fn db_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.db_path.clone())
            .unwrap_or_else(geogrid_database::paths::default_db_path)
    }

    /// Grid size: flag or environment, then file, then 33 km.
    #[must_use]
    pub fn grid_km(&self, flag: Option<f64>) -> f64 {
        flag.or(self.grid_km).unwrap_or(DEFAULT_GRID_KM)
    }

    /// Boundary input: flag or environment, then file. There is no default.
    #[must_use]
    pub fn input(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.input.clone())
    }

    /// Reference kind: flag, then file, then state.
    #[must_use]
    pub fn reference(&self, flag: Option<ReferenceKind>) -> ReferenceKind {
        flag.or(self.reference).unwrap_or(ReferenceKind::State)
    }

    /// States file: flag, then file. There is no default.
    #[must_use]
    pub fn states_file(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.states_file.clone())
    }
}
