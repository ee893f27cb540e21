//! Catalog configuration.

use std::path::PathBuf;
use std::sync::Arc;

use shelf_core::SeedCatalog;

use crate::seed::{BuiltinSeedSource, FileSeedSource, SeedSource, StaticSeedSource};

/// Where durable state lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// An in-memory SQLite database, gone when the catalog is dropped.
    Memory,
    /// A SQLite database file, created on first open.
    Path(PathBuf),
}

/// Where a new user's seed catalog comes from.
#[derive(Debug, Clone)]
pub enum SeedLocation {
    /// No seed document; new users get the built-in collections.
    Builtin,
    /// A JSON file.
    File(PathBuf),
    /// A document held in memory.
    Inline(SeedCatalog),
    /// A URL fetched over HTTP.
    #[cfg(feature = "http")]
    Url(String),
}

impl SeedLocation {
    /// Build the seed source this location describes.
    pub fn source(&self) -> Arc<dyn SeedSource> {
        match self {
            SeedLocation::Builtin => Arc::new(BuiltinSeedSource),
            SeedLocation::File(path) => Arc::new(FileSeedSource::new(path.clone())),
            SeedLocation::Inline(catalog) => Arc::new(StaticSeedSource::new(catalog.clone())),
            #[cfg(feature = "http")]
            SeedLocation::Url(url) => Arc::new(crate::seed::HttpSeedSource::new(url.clone())),
        }
    }
}

/// Configuration for a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Durable storage location.
    pub database: DatabaseLocation,
    /// Seed document location.
    pub seed: SeedLocation,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            seed: SeedLocation::File(PathBuf::from("db.json")),
            log_level: "info".to_string(),
        }
    }
}

impl CatalogConfig {
    /// Persist to a SQLite file at `path`.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = DatabaseLocation::Path(path.into());
        self
    }

    /// Seed new users from the given location.
    pub fn with_seed(mut self, seed: SeedLocation) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Install log output at this config's level, unless `RUST_LOG` says
    /// otherwise.
    pub fn init_logging(&self) -> anyhow::Result<()> {
        crate::logging::init(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();
        assert_eq!(config.database, DatabaseLocation::Memory);
        assert!(matches!(config.seed, SeedLocation::File(ref p) if p == &PathBuf::from("db.json")));
        assert_eq!(config.log_level, "info");
    }

    #[tokio::test]
    async fn test_inline_seed_source() {
        let catalog = SeedCatalog::fallback();
        let source = SeedLocation::Inline(catalog.clone()).source();
        assert_eq!(source.fetch().await.unwrap(), catalog);
    }

    #[test]
    fn test_builders() {
        let config = CatalogConfig::default()
            .with_database_path("/tmp/shelf.db")
            .with_seed(SeedLocation::Builtin)
            .with_log_level("debug");
        assert_eq!(config.database, DatabaseLocation::Path("/tmp/shelf.db".into()));
        assert!(matches!(config.seed, SeedLocation::Builtin));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_init_logging_uses_configured_level() {
        let config = CatalogConfig::default().with_log_level("shelf=debug");
        config.init_logging().unwrap();

        // RUST_LOG takes precedence over the configured level
        if std::env::var_os("RUST_LOG").is_none() {
            let bad = CatalogConfig::default().with_log_level("shelf=loudest");
            assert!(bad.init_logging().is_err());
        }
    }
}
