/*
 * bytecache-core - Named, load-through byte caches
 *
 * Layout:
 * - byte_view : immutable shared values (ByteView)
 * - loader    : cache-miss handlers (Loader, LoaderFn)
 * - store     : byte-bounded moka store
 * - namespace : Namespace (group) + NamespaceBuilder
 * - registry  : name -> Namespace directory, process-wide instance
 * - config    : NamespaceConfig + YAML schema v1
 * - metrics   : prometheus counters per namespace
 *
 * Usage:
 *   let scores = bytecache_core::create_namespace("scores", 1024, LoaderFn::new(load_score))?;
 *   let view = scores.get("alice")?;
 *
 *   // elsewhere in the process
 *   let scores = bytecache_core::lookup_namespace("scores").expect("created at startup");
 */

/// Immutable byte values
pub mod byte_view;

/// Configuration (NamespaceConfig, YAML)
pub mod config;

/// Error types
pub mod error;

/// Loader trait and function adapter
pub mod loader;

/// Prometheus metrics
pub mod metrics;

/// Namespaces (groups)
pub mod namespace;

/// Namespace registry
pub mod registry;

/// Bounded store
pub mod store;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use byte_view::ByteView;
pub use config::{CacheConfigFileV1, ConfigError, ConfigResult, NamespaceConfig};
pub use error::{BoxError, CacheError, CacheResult, LoadError, LoadResult};
pub use loader::{loader_fn, Loader, LoaderFn};
pub use namespace::{Namespace, NamespaceBuilder, NamespaceStats};
pub use registry::{create_namespace, global, lookup_namespace, remove_namespace, NamespaceRegistry};
pub use store::BoundedStore;
