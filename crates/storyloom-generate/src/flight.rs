use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Per-theme flight locks
///
/// Guarantees at most one in-flight external generation per theme:
/// holders run the snapshot/spawn/poll sequence, waiters re-check the
/// resolver once the lock frees. Entries are never removed — the map is
/// bounded by the number of distinct themes seen by this process.
#[derive(Debug, Default)]
pub(crate) struct FlightRegistry {
    flights: DashMap<String, Arc<Mutex<()>>>,
}

impl FlightRegistry {
    pub fn lock_for(&self, theme: &str) -> Arc<Mutex<()>> {
        self.flights
            .entry(theme.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_theme_shares_a_lock() {
        let registry = FlightRegistry::default();
        let a = registry.lock_for("恐龙");
        let b = registry.lock_for("恐龙");

        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn distinct_themes_do_not_contend() {
        let registry = FlightRegistry::default();
        let a = registry.lock_for("恐龙");
        let b = registry.lock_for("海洋");

        assert!(!Arc::ptr_eq(&a, &b));
    }
}
