//! The range lookup index.
//!
//! Maps a 32-bit IP value to the best-matching range record with one binary
//! search over the begin-sorted, non-overlapping set. The vendor feed
//! guarantees non-overlap, so the candidate with the largest `ip_begin <= ip`
//! is the only record that can possibly contain the address.

use thiserror::Error;

use crate::models::RangeRecord;

/// The input range set violates the sorted/non-overlapping invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeSetError {
    #[error("range at index {0} has ip_begin > ip_end")]
    Inverted(usize),

    #[error("ranges at indexes {0} and {1} are out of order or overlapping")]
    Overlap(usize, usize),
}

/// An immutable, begin-sorted set of non-overlapping range records.
///
/// Read-only after construction; safe for unbounded concurrent readers.
#[derive(Debug, Default)]
pub struct RangeStore {
    records: Vec<RangeRecord>,
}

impl RangeStore {
    /// Builds a store from records sorted by `ip_begin` ascending.
    ///
    /// Rejects inverted ranges and any pair that is out of order or
    /// overlapping. Callers feeding unsorted data must sort first.
    pub fn new(records: Vec<RangeRecord>) -> Result<Self, RangeSetError> {
        for (i, record) in records.iter().enumerate() {
            if record.ip_begin > record.ip_end {
                return Err(RangeSetError::Inverted(i));
            }
            // An unsorted pair always fails this check too: if the later
            // record begins at or before the earlier one, the earlier end
            // is >= its own begin >= the later begin.
            if i > 0 && records[i - 1].ip_end >= record.ip_begin {
                return Err(RangeSetError::Overlap(i - 1, i));
            }
        }
        Ok(RangeStore { records })
    }

    /// Finds the record containing `ip`, if any.
    ///
    /// Binary search for the record with the largest `ip_begin <= ip`,
    /// then verify `ip <= ip_end`. O(log n), no containment scan.
    pub fn lookup(&self, ip: u32) -> Option<&RangeRecord> {
        let idx = self.records.partition_point(|r| r.ip_begin <= ip);
        if idx == 0 {
            return None;
        }
        let candidate = &self.records[idx - 1];
        (ip <= candidate.ip_end).then_some(candidate)
    }

    pub fn records(&self) -> &[RangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(begin: u32, end: u32, city_id: u32) -> RangeRecord {
        RangeRecord {
            ip_begin: begin,
            ip_end: end,
            country_code: "RU".to_string(),
            city_id,
        }
    }

    fn store(records: Vec<RangeRecord>) -> RangeStore {
        RangeStore::new(records).expect("valid range set")
    }

    #[test]
    fn lookup_hits_both_interval_endpoints() {
        let s = store(vec![range(100, 200, 1), range(300, 400, 2)]);
        for r in s.records().to_vec() {
            assert_eq!(s.lookup(r.ip_begin), Some(&r));
            assert_eq!(s.lookup(r.ip_end), Some(&r));
        }
    }

    #[test]
    fn lookup_inside_interval() {
        let s = store(vec![range(16_777_216, 16_777_471, 1)]);
        let hit = s.lookup(16_777_300).expect("address inside range");
        assert_eq!(hit.country_code, "RU");
        assert_eq!(hit.city_id, 1);
    }

    #[test]
    fn lookup_misses_gap_between_ranges() {
        let s = store(vec![range(100, 200, 0), range(300, 400, 0)]);
        assert_eq!(s.lookup(201), None);
        assert_eq!(s.lookup(250), None);
        assert_eq!(s.lookup(299), None);
    }

    #[test]
    fn lookup_misses_before_first_and_after_last() {
        let s = store(vec![range(100, 200, 0)]);
        assert_eq!(s.lookup(0), None);
        assert_eq!(s.lookup(99), None);
        assert_eq!(s.lookup(201), None);
        assert_eq!(s.lookup(u32::MAX), None);
    }

    #[test]
    fn empty_store_always_misses() {
        let s = store(vec![]);
        assert_eq!(s.lookup(0), None);
        assert_eq!(s.lookup(u32::MAX), None);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = RangeStore::new(vec![range(200, 100, 0)]).unwrap_err();
        assert_eq!(err, RangeSetError::Inverted(0));
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let err = RangeStore::new(vec![range(100, 200, 0), range(150, 300, 0)]).unwrap_err();
        assert_eq!(err, RangeSetError::Overlap(0, 1));
    }

    #[test]
    fn rejects_touching_ranges() {
        // A shared boundary address would match two records.
        let err = RangeStore::new(vec![range(100, 200, 0), range(200, 300, 0)]).unwrap_err();
        assert_eq!(err, RangeSetError::Overlap(0, 1));
    }

    #[test]
    fn rejects_unsorted_input() {
        let err = RangeStore::new(vec![range(300, 400, 0), range(100, 200, 0)]).unwrap_err();
        assert_eq!(err, RangeSetError::Overlap(0, 1));
    }

    #[test]
    fn single_address_range() {
        let s = store(vec![range(42, 42, 0)]);
        assert!(s.lookup(42).is_some());
        assert_eq!(s.lookup(41), None);
        assert_eq!(s.lookup(43), None);
    }
}
