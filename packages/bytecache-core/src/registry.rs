//! Directory of namespaces by name

use crate::config::NamespaceConfig;
use crate::error::CacheResult;
use crate::loader::Loader;
use crate::metrics::RegistryMetrics;
use crate::namespace::{Namespace, NamespaceBuilder};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use prometheus::Registry;
use std::fmt;
use std::sync::Arc;

/// Name → [`Namespace`] map guarded by a reader/writer lock.
///
/// A namespace is constructed and inserted under the write lock, so a
/// lookup never sees a partially built one and the exported metric series
/// always belongs to the installed namespace. Validation happens before the
/// lock is taken. Creating a name that already exists replaces the entry; callers
/// still holding the old `Arc<Namespace>` keep a working handle.
///
/// Most code uses the process-wide instance through [`create_namespace`] and
/// [`lookup_namespace`]. Components that prefer explicit wiring can own a
/// registry of their own.
pub struct NamespaceRegistry {
    namespaces: RwLock<AHashMap<Arc<str>, Arc<Namespace>>>,
    metrics: RegistryMetrics,
    prometheus: Registry,
}

impl NamespaceRegistry {
    /// Registry with a private prometheus registry
    pub fn new() -> Self {
        let prometheus = Registry::new();
        // A fresh prometheus registry holds no descriptors to collide with
        let metrics = RegistryMetrics::new(&prometheus)
            .expect("bytecache metric descriptors are static and valid");

        Self {
            namespaces: RwLock::new(AHashMap::new()),
            metrics,
            prometheus,
        }
    }

    /// Registry that exports its metrics through a caller-owned prometheus
    /// registry. Fails if that registry already holds bytecache families.
    pub fn with_metrics_registry(prometheus: Registry) -> CacheResult<Self> {
        let metrics = RegistryMetrics::new(&prometheus)?;

        Ok(Self {
            namespaces: RwLock::new(AHashMap::new()),
            metrics,
            prometheus,
        })
    }

    /// Create `name` with the given byte budget and loader, replacing any
    /// existing namespace of that name.
    pub fn create_namespace<L: Loader + 'static>(
        &self,
        name: &str,
        capacity_bytes: u64,
        loader: L,
    ) -> CacheResult<Arc<Namespace>> {
        NamespaceBuilder::new(name)
            .capacity_bytes(capacity_bytes)
            .loader(loader)
            .register(self)
    }

    pub fn create_from_config<L: Loader + 'static>(
        &self,
        config: &NamespaceConfig,
        loader: L,
    ) -> CacheResult<Arc<Namespace>> {
        NamespaceBuilder::from_config(config.clone())
            .loader(loader)
            .register(self)
    }

    /// The namespace currently installed under `name`, if any
    pub fn lookup_namespace(&self, name: &str) -> Option<Arc<Namespace>> {
        self.namespaces.read().get(name).cloned()
    }

    /// Uninstall `name`. Handles already held elsewhere stay usable.
    pub fn remove_namespace(&self, name: &str) -> Option<Arc<Namespace>> {
        let mut namespaces = self.namespaces.write();
        let removed = namespaces.remove(name);
        if removed.is_some() {
            // Under the write lock so a concurrent create cannot lose its series
            self.metrics.drop_namespace(name);
        }
        drop(namespaces);

        if removed.is_some() {
            tracing::debug!("Removed namespace {}", name);
        }
        removed
    }

    /// Installed names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .namespaces
            .read()
            .keys()
            .map(|name| name.to_string())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.namespaces.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.read().is_empty()
    }

    /// Prometheus registry holding the `bytecache_*` families
    pub fn metrics_registry(&self) -> &Registry {
        &self.prometheus
    }

    /// Build and insert a namespace for an already validated config.
    ///
    /// The metric series for the name is reset and attached while the write
    /// lock is held, so the installed namespace always owns the exported
    /// series even when several creates of one name race.
    pub(crate) fn install(&self, config: NamespaceConfig, loader: Arc<dyn Loader>) -> Arc<Namespace> {
        let key: Arc<str> = Arc::from(config.name.as_str());

        let mut namespaces = self.namespaces.write();
        let metrics = self.metrics.for_namespace(&config.name);
        let namespace = Arc::new(Namespace::new(config, loader, metrics));
        let previous = namespaces.insert(key, Arc::clone(&namespace));
        drop(namespaces);

        if previous.is_some() {
            tracing::debug!(
                "Replaced namespace {} (capacity: {} bytes)",
                namespace.name(),
                namespace.capacity_bytes()
            );
        } else {
            tracing::debug!(
                "Created namespace {} (capacity: {} bytes)",
                namespace.name(),
                namespace.capacity_bytes()
            );
        }

        namespace
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NamespaceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceRegistry")
            .field("namespaces", &self.names())
            .finish_non_exhaustive()
    }
}

/// Process-wide registry, created on first use and never torn down
static GLOBAL_REGISTRY: Lazy<NamespaceRegistry> = Lazy::new(NamespaceRegistry::new);

pub fn global() -> &'static NamespaceRegistry {
    &GLOBAL_REGISTRY
}

/// Create a namespace in the process-wide registry
pub fn create_namespace<L: Loader + 'static>(
    name: &str,
    capacity_bytes: u64,
    loader: L,
) -> CacheResult<Arc<Namespace>> {
    global().create_namespace(name, capacity_bytes, loader)
}

/// Find a namespace in the process-wide registry
pub fn lookup_namespace(name: &str) -> Option<Arc<Namespace>> {
    global().lookup_namespace(name)
}

/// Remove a namespace from the process-wide registry
pub fn remove_namespace(name: &str) -> Option<Arc<Namespace>> {
    global().remove_namespace(name)
}
