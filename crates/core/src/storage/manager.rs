use std::io::ErrorKind;
use std::path::Path;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;
use crate::models::price::CacheSnapshot;

use super::format;

/// High-level storage operations: save/load portfolio to/from JSON bytes or files.
///
/// Every save is a full overwrite of the document; there is no incremental
/// write and no schema version.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to state-file bytes.
    pub fn save_to_bytes(portfolio: &Portfolio) -> Result<Vec<u8>, CoreError> {
        format::write_file(portfolio)
    }

    /// Parse a portfolio from state-file bytes.
    pub fn load_from_bytes(data: &[u8]) -> Result<Portfolio, CoreError> {
        format::read_file(data)
    }

    /// Overwrite the state file with `portfolio`.
    pub fn save_to_file(portfolio: &Portfolio, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let bytes = Self::save_to_bytes(portfolio)?;
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), "portfolio saved");
        Ok(())
    }

    /// Read the state file. Fails if it does not exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Portfolio, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes)
    }

    /// Read the state file, or hand back the seed portfolio when there is no
    /// file yet. A file that exists but cannot be parsed is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Portfolio, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no state file, starting from the seed portfolio");
            return Ok(Portfolio::default());
        }
        Self::load_from_file(path)
    }

    // ── Price cache file ────────────────────────────────────────────

    /// Overwrite the cache file with `snapshot`. Compact JSON; the file is
    /// disposable and never read by people.
    pub fn save_cache_to_file(snapshot: &CacheSnapshot, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec(snapshot)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize cache: {e}")))?;
        std::fs::write(path, bytes)?;
        tracing::debug!(path = %path.display(), prices = snapshot.prices.len(), searches = snapshot.searches.len(), "cache saved");
        Ok(())
    }

    /// Read the cache file. A missing file is an empty cache.
    pub fn load_cache_from_file(path: impl AsRef<Path>) -> Result<CacheSnapshot, CoreError> {
        match std::fs::read(path.as_ref()) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(CacheSnapshot::default()),
            Err(e) => Err(e.into()),
        }
    }
}
