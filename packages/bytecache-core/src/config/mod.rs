//! Namespace configuration
//!
//! Namespaces are usually created in code through
//! [`NamespaceBuilder`](crate::NamespaceBuilder), but their sizing can also be
//! declared up front in a versioned YAML file:
//!
//! ```rust,ignore
//! use bytecache_core::config::CacheConfigFileV1;
//!
//! let file = CacheConfigFileV1::from_yaml("caches.yaml")?;
//! for ns in &file.namespaces {
//!     registry.create_from_config(ns, loader_for(&ns.name))?;
//! }
//! ```

pub mod error;
pub mod io;
pub mod namespace_config;

pub use error::{ConfigError, ConfigResult};
pub use io::{CacheConfigFileV1, SUPPORTED_VERSIONS};
pub use namespace_config::{NamespaceConfig, MAX_TTL_SECS};
