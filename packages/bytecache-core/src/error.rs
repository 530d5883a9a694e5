//! Error types for the namespace cache

use crate::config::ConfigError;
use std::sync::Arc;
use thiserror::Error;

/// Boxed error produced by a loader's own data source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a [`Loader`](crate::Loader).
///
/// A load error means "value unavailable". It is handed back to the caller of
/// [`Namespace::get`](crate::Namespace::get) and never cached.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Source(#[from] BoxError),
}

impl LoadError {
    pub fn not_found(key: impl Into<String>) -> Self {
        LoadError::NotFound(key.into())
    }

    pub fn message(msg: impl Into<String>) -> Self {
        LoadError::Message(msg.into())
    }

    /// Wrap any error coming from the backing source (database, filesystem, ...)
    pub fn other(err: impl Into<BoxError>) -> Self {
        LoadError::Source(err.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::Source(Box::new(err))
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Key must not be empty")]
    EmptyKey,

    /// The loader failed; nothing was written to the store.
    ///
    /// `source` is shared because coalesced loads hand the same failure to
    /// every waiting caller.
    #[error("Namespace '{namespace}': failed to load key '{key}': {source}")]
    Load {
        namespace: String,
        key: String,
        #[source]
        source: Arc<LoadError>,
    },

    #[error("Metrics registration failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl CacheError {
    pub(crate) fn load(namespace: &str, key: &str, source: Arc<LoadError>) -> Self {
        CacheError::Load {
            namespace: namespace.to_string(),
            key: key.to_string(),
            source,
        }
    }

    /// True when the loader reported the key as missing from its source
    pub fn is_not_found(&self) -> bool {
        match self {
            CacheError::Load { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Configuration errors are programming errors and should not be retried
    pub fn is_config(&self) -> bool {
        matches!(self, CacheError::Config(_))
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display_includes_namespace_and_key() {
        let err = CacheError::load("scores", "bob", Arc::new(LoadError::not_found("bob")));

        assert_eq!(
            err.to_string(),
            "Namespace 'scores': failed to load key 'bob': key not found: bob"
        );
        assert!(err.is_not_found());
        assert!(!err.is_config());
    }

    #[test]
    fn test_load_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = LoadError::from(io);

        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "disk gone");
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = CacheError::load("a", "k", Arc::new(LoadError::message("boom")));
        let source = err.source().map(|s| s.to_string());

        assert_eq!(source.as_deref(), Some("boom"));
    }
}
