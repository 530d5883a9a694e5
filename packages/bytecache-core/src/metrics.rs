//! Prometheus metrics for cache namespaces

use prometheus::{
    register_int_counter_vec_with_registry, register_int_gauge_vec_with_registry, IntCounter,
    IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
};

const NAMESPACE_LABEL: &str = "namespace";

/// Metric families shared by every namespace of one registry
///
/// Registered once per [`NamespaceRegistry`](crate::NamespaceRegistry) and
/// partitioned by the `namespace` label.
#[derive(Clone)]
pub struct RegistryMetrics {
    hits: IntCounterVec,
    misses: IntCounterVec,
    loads: IntCounterVec,
    load_errors: IntCounterVec,
    entries: IntGaugeVec,
}

impl RegistryMetrics {
    pub fn new(registry: &Registry) -> prometheus::Result<Self> {
        Ok(Self {
            hits: register_int_counter_vec_with_registry!(
                Opts::new("bytecache_hits_total", "Lookups served from the store"),
                &[NAMESPACE_LABEL],
                registry
            )?,
            misses: register_int_counter_vec_with_registry!(
                Opts::new("bytecache_misses_total", "Lookups that fell through to the loader"),
                &[NAMESPACE_LABEL],
                registry
            )?,
            loads: register_int_counter_vec_with_registry!(
                Opts::new("bytecache_loads_total", "Successful loader calls"),
                &[NAMESPACE_LABEL],
                registry
            )?,
            load_errors: register_int_counter_vec_with_registry!(
                Opts::new("bytecache_load_errors_total", "Failed loader calls"),
                &[NAMESPACE_LABEL],
                registry
            )?,
            entries: register_int_gauge_vec_with_registry!(
                Opts::new("bytecache_entries", "Entries currently held by the store"),
                &[NAMESPACE_LABEL],
                registry
            )?,
        })
    }

    /// Fresh series for `name`.
    ///
    /// Any series left behind by a previous namespace of the same name is
    /// dropped first, so a replacement starts counting from zero.
    pub fn for_namespace(&self, name: &str) -> NamespaceMetrics {
        self.drop_namespace(name);

        let labels = [name];
        NamespaceMetrics {
            hits: self.hits.with_label_values(&labels),
            misses: self.misses.with_label_values(&labels),
            loads: self.loads.with_label_values(&labels),
            load_errors: self.load_errors.with_label_values(&labels),
            entries: self.entries.with_label_values(&labels),
        }
    }

    /// Stop exporting the series of `name`
    pub fn drop_namespace(&self, name: &str) {
        let labels = [name];
        // Absent series are not an error here
        let _ = self.hits.remove_label_values(&labels);
        let _ = self.misses.remove_label_values(&labels);
        let _ = self.loads.remove_label_values(&labels);
        let _ = self.load_errors.remove_label_values(&labels);
        let _ = self.entries.remove_label_values(&labels);
    }
}

/// Per-namespace handles into [`RegistryMetrics`]
#[derive(Clone)]
pub struct NamespaceMetrics {
    pub hits: IntCounter,
    pub misses: IntCounter,
    pub loads: IntCounter,
    pub load_errors: IntCounter,
    pub entries: IntGauge,
}

impl NamespaceMetrics {
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.get() as f64;
        let total = hits + self.misses.get() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_families_once() {
        let registry = Registry::new();
        assert!(RegistryMetrics::new(&registry).is_ok());

        // Same descriptors twice in one registry collide
        assert!(RegistryMetrics::new(&registry).is_err());
    }

    #[test]
    fn test_namespace_series_are_labelled() {
        let registry = Registry::new();
        let metrics = RegistryMetrics::new(&registry).unwrap();

        let a = metrics.for_namespace("a");
        let b = metrics.for_namespace("b");
        a.hits.inc();
        a.hits.inc();
        b.misses.inc();

        assert_eq!(a.hits.get(), 2);
        assert_eq!(b.hits.get(), 0);
        assert_eq!(b.misses.get(), 1);

        let families = registry.gather();
        let hits = families
            .iter()
            .find(|f| f.get_name() == "bytecache_hits_total")
            .unwrap();
        assert_eq!(hits.get_metric().len(), 2);
    }

    #[test]
    fn test_replacement_resets_series() {
        let registry = Registry::new();
        let metrics = RegistryMetrics::new(&registry).unwrap();

        let first = metrics.for_namespace("a");
        first.loads.inc();

        let second = metrics.for_namespace("a");
        assert_eq!(second.loads.get(), 0);
    }

    #[test]
    fn test_hit_rate() {
        let registry = Registry::new();
        let metrics = RegistryMetrics::new(&registry).unwrap().for_namespace("a");

        assert_eq!(metrics.hit_rate(), 0.0);

        metrics.hits.inc();
        metrics.misses.inc();
        assert!((metrics.hit_rate() - 0.5).abs() < 0.01);
    }
}
