//! Cache namespaces (groups)

use crate::byte_view::ByteView;
use crate::config::{ConfigError, NamespaceConfig};
use crate::error::{CacheError, CacheResult, LoadError};
use crate::loader::Loader;
use crate::metrics::NamespaceMetrics;
use crate::registry::NamespaceRegistry;
use crate::store::BoundedStore;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A named cache with its own key space, loader and byte budget.
///
/// Two namespaces never share entries or eviction budget, even when their
/// keys collide. Every field is fixed at construction.
pub struct Namespace {
    name: Arc<str>,
    loader: Arc<dyn Loader>,
    store: BoundedStore,
    config: NamespaceConfig,
    metrics: NamespaceMetrics,
}

/// Point-in-time counters for one namespace
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NamespaceStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub load_errors: u64,
    pub entries: u64,
    pub weighted_bytes: u64,
    pub capacity_bytes: u64,
    pub hit_rate: f64,
}

impl Namespace {
    pub(crate) fn new(
        config: NamespaceConfig,
        loader: Arc<dyn Loader>,
        metrics: NamespaceMetrics,
    ) -> Self {
        Self {
            name: Arc::from(config.name.as_str()),
            loader,
            store: BoundedStore::new(&config),
            config,
            metrics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte budget of the store (0 = unbounded)
    pub fn capacity_bytes(&self) -> u64 {
        self.config.capacity_bytes
    }

    pub fn loader(&self) -> &Arc<dyn Loader> {
        &self.loader
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.config
    }

    /// Look `key` up, loading and caching it on a miss.
    ///
    /// A hit returns the stored view itself (no copy). A miss calls the
    /// loader, caches the result and returns it. Loader errors are returned
    /// as [`CacheError::Load`] and leave the store untouched.
    pub fn get(&self, key: &str) -> CacheResult<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(view) = self.store.get(key) {
            self.metrics.hits.inc();
            tracing::trace!("{} hit: {}", self.name, key);
            return Ok(view);
        }

        self.metrics.misses.inc();
        tracing::trace!("{} miss: {}", self.name, key);

        let view = self.load(key).map_err(|e| CacheError::load(&self.name, key, Arc::new(e)))?;
        self.populate(key, view.clone());
        Ok(view)
    }

    /// Like [`get`](Self::get), but concurrent misses on the same key share a
    /// single loader call.
    pub fn get_coalesced(&self, key: &str) -> CacheResult<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(view) = self.store.get(key) {
            self.metrics.hits.inc();
            tracing::trace!("{} hit: {}", self.name, key);
            return Ok(view);
        }

        self.metrics.misses.inc();
        tracing::trace!("{} miss (coalesced): {}", self.name, key);

        let view = self
            .store
            .get_or_try_insert_with(key, || self.load(key))
            .map_err(|e| CacheError::load(&self.name, key, e))?;
        self.metrics.entries.set(self.store.entry_count() as i64);
        Ok(view)
    }

    fn load(&self, key: &str) -> Result<ByteView, LoadError> {
        match self.loader.load(key) {
            Ok(bytes) => {
                self.metrics.loads.inc();
                Ok(ByteView::from(bytes))
            }
            Err(e) => {
                self.metrics.load_errors.inc();
                tracing::debug!("{} failed to load {}: {}", self.name, key, e);
                Err(e)
            }
        }
    }

    /// Insert a view without consulting the loader
    pub fn populate(&self, key: &str, view: ByteView) {
        self.store.add(key, view);
        self.metrics.entries.set(self.store.entry_count() as i64);
    }

    /// True if `key` is cached. Never calls the loader.
    pub fn contains(&self, key: &str) -> bool {
        self.store.contains(key)
    }

    pub fn invalidate(&self, key: &str) {
        self.store.invalidate(key);
        self.metrics.entries.set(self.store.entry_count() as i64);
    }

    pub fn clear(&self) {
        self.store.clear();
        self.metrics.entries.set(0);
    }

    pub fn stats(&self) -> NamespaceStats {
        self.store.run_pending_tasks();

        let entries = self.store.entry_count();
        self.metrics.entries.set(entries as i64);

        NamespaceStats {
            hits: self.metrics.hits.get(),
            misses: self.metrics.misses.get(),
            loads: self.metrics.loads.get(),
            load_errors: self.metrics.load_errors.get(),
            entries,
            weighted_bytes: self.store.weighted_size(),
            capacity_bytes: self.store.capacity_bytes(),
            hit_rate: self.metrics.hit_rate(),
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.metrics.hit_rate()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("capacity_bytes", &self.config.capacity_bytes)
            .field("ttl", &self.config.ttl())
            .finish_non_exhaustive()
    }
}

/// Fluent constructor for [`Namespace`].
///
/// ```rust,ignore
/// let scores = NamespaceBuilder::new("scores")
///     .capacity_bytes(1024)
///     .ttl(Duration::from_secs(60))
///     .loader(LoaderFn::new(|key: &str| db.fetch(key)))
///     .register(&registry)?;
/// ```
///
/// Registering without a loader fails with
/// [`ConfigError::MissingLoader`] and nothing becomes visible in the registry.
pub struct NamespaceBuilder {
    config: NamespaceConfig,
    loader: Option<Arc<dyn Loader>>,
}

impl NamespaceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(NamespaceConfig::new(name, 0))
    }

    pub fn from_config(config: NamespaceConfig) -> Self {
        Self {
            config,
            loader: None,
        }
    }

    pub fn capacity_bytes(mut self, capacity_bytes: u64) -> Self {
        self.config.capacity_bytes = capacity_bytes;
        self
    }

    /// Entry time-to-live, rounded up to whole seconds
    pub fn ttl(mut self, ttl: Duration) -> Self {
        let secs = ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0));
        self.config.ttl_secs = Some(secs);
        self
    }

    pub fn enable_eviction_listener(mut self, enabled: bool) -> Self {
        self.config.enable_eviction_listener = enabled;
        self
    }

    pub fn loader<L: Loader + 'static>(mut self, loader: L) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Use an already shared loader (kept as-is, not re-wrapped)
    pub fn shared_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Build the namespace and install it in `registry`, replacing any
    /// namespace of the same name.
    pub fn register(self, registry: &NamespaceRegistry) -> CacheResult<Arc<Namespace>> {
        let (config, loader) = self.validated()?;
        Ok(registry.install(config, loader))
    }

    /// Install into the process-wide registry
    pub fn register_global(self) -> CacheResult<Arc<Namespace>> {
        self.register(crate::registry::global())
    }

    fn validated(self) -> CacheResult<(NamespaceConfig, Arc<dyn Loader>)> {
        self.config.validate()?;
        let loader = self
            .loader
            .ok_or_else(|| ConfigError::MissingLoader(self.config.name.clone()))?;

        Ok((self.config, loader))
    }
}
