//! The published dataset: range index plus city/region catalog.
//!
//! One `Generation` is a complete, internally consistent snapshot produced
//! by a single ingestion run. `SharedDataset` publishes generations to
//! readers with a single atomic swap, so a reader never observes old range
//! rows joined against new catalog ids or vice versa.

mod catalog;
mod range;

pub use catalog::Catalog;
pub use range::{RangeSetError, RangeStore};

use std::sync::{Arc, RwLock};

/// A complete snapshot of the local dataset.
#[derive(Debug, Default)]
pub struct Generation {
    pub ranges: RangeStore,
    pub catalog: Catalog,
}

impl Generation {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// Handle to the currently published generation.
///
/// Cloning is cheap; all clones see the same publication. Point queries
/// take a snapshot and never block a concurrent publish for longer than
/// the pointer swap.
#[derive(Clone, Default)]
pub struct SharedDataset {
    inner: Arc<RwLock<Arc<Generation>>>,
}

impl SharedDataset {
    pub fn new(generation: Generation) -> Self {
        SharedDataset {
            inner: Arc::new(RwLock::new(Arc::new(generation))),
        }
    }

    /// Returns the currently published generation.
    pub fn snapshot(&self) -> Arc<Generation> {
        // A poisoned lock still holds a coherent generation: the swap in
        // publish() is a single pointer assignment.
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replaces the published generation.
    pub fn publish(&self, generation: Generation) {
        let next = Arc::new(generation);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RangeRecord;

    #[test]
    fn snapshot_outlives_publish() {
        let dataset = SharedDataset::default();
        let before = dataset.snapshot();
        assert!(before.is_empty());

        let ranges = RangeStore::new(vec![RangeRecord {
            ip_begin: 1,
            ip_end: 2,
            country_code: "RU".to_string(),
            city_id: 0,
        }])
        .expect("valid range set");
        dataset.publish(Generation {
            ranges,
            catalog: Catalog::default(),
        });

        // The old snapshot is unchanged; a fresh one sees the new generation.
        assert!(before.is_empty());
        assert_eq!(dataset.snapshot().ranges.len(), 1);
    }

    #[test]
    fn clones_share_the_publication() {
        let dataset = SharedDataset::default();
        let reader = dataset.clone();
        let ranges = RangeStore::new(vec![RangeRecord {
            ip_begin: 5,
            ip_end: 9,
            country_code: "UA".to_string(),
            city_id: 0,
        }])
        .expect("valid range set");
        dataset.publish(Generation {
            ranges,
            catalog: Catalog::default(),
        });
        assert_eq!(reader.snapshot().ranges.len(), 1);
    }
}
