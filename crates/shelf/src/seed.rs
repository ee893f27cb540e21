//! Seed sources: where a new user's catalog comes from.
//!
//! The stores ask a [`SeedSource`] for the seed document exactly when a user
//! has no stored collection yet. Any failure is absorbed by the stores and
//! replaced with the built-in fallback, reported as [`SeedOutcome::Fallback`].

use std::path::PathBuf;

use async_trait::async_trait;
use shelf_core::SeedCatalog;

use crate::error::SeedError;

/// How a store arrived at its collection during initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The user's collection was already stored and was loaded verbatim.
    Loaded,
    /// The collection was taken from the seed document and persisted.
    Seeded,
    /// The seed document was unavailable; the built-in collection was
    /// persisted instead.
    Fallback { reason: String },
}

impl SeedOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, SeedOutcome::Fallback { .. })
    }
}

/// A provider of the seed catalog document.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Fetch and parse the seed document.
    async fn fetch(&self) -> Result<SeedCatalog, SeedError>;
}

/// Reads the seed document from a JSON file, such as a bundled `db.json`.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    path: PathBuf,
}

impl FileSeedSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(SeedCatalog::from_json(&bytes)?)
    }
}

/// Serves a seed document held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSeedSource {
    catalog: SeedCatalog,
}

impl StaticSeedSource {
    pub fn new(catalog: SeedCatalog) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl SeedSource for StaticSeedSource {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        Ok(self.catalog.clone())
    }
}

/// Has no seed document; every new user gets the built-in collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSeedSource;

#[async_trait]
impl SeedSource for BuiltinSeedSource {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        Err(SeedError::Unavailable("no seed document configured".into()))
    }
}

/// Fetches the seed document over HTTP.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

#[cfg(feature = "http")]
impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Fetch through a preconfigured client (timeouts, proxies).
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch(&self) -> Result<SeedCatalog, SeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        Ok(SeedCatalog::from_json(&body)?)
    }
}
