//! Order number generation
//!
//! Numbers are formatted `<PREFIX>-<YYYYMMDD>-<NNNNN>` with a 5-digit
//! zero-padded sequence drawn from the per-date counter. The counter
//! increment is atomic in the store, so concurrent creations on the same
//! date never share a sequence number. If the counter store fails, order
//! creation aborts; no order exists without a number.

use super::store::{OrderStore, StorageResult};

/// Generates unique, human-readable order numbers
#[derive(Clone)]
pub struct OrderNumberGenerator {
    store: OrderStore,
    prefix: String,
}

impl OrderNumberGenerator {
    pub fn new(store: OrderStore, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Next order number for the date containing `now` (Unix millis)
    pub fn next(&self, now: i64) -> StorageResult<String> {
        let date_key = shared::util::date_key(now);
        let seq = self.store.next_daily_sequence(&date_key)?;
        Ok(format!("{}-{}-{:05}", self.prefix, date_key, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // 2026-03-12 00:00:00 UTC
    const NOW: i64 = 1_773_273_600_000;

    #[test]
    fn test_number_format() {
        let store = OrderStore::open_in_memory().unwrap();
        let generator = OrderNumberGenerator::new(store, "ORD");
        assert_eq!(generator.next(NOW).unwrap(), "ORD-20260312-00001");
        assert_eq!(generator.next(NOW).unwrap(), "ORD-20260312-00002");
    }

    #[test]
    fn test_sequence_resets_per_date() {
        let store = OrderStore::open_in_memory().unwrap();
        let generator = OrderNumberGenerator::new(store, "ORD");
        generator.next(NOW).unwrap();
        let next_day = NOW + 24 * 60 * 60 * 1000;
        assert_eq!(generator.next(next_day).unwrap(), "ORD-20260313-00001");
    }

    #[test]
    fn test_concurrent_generation_unique() {
        let store = OrderStore::open_in_memory().unwrap();
        let generator = OrderNumberGenerator::new(store, "ORD");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let generator = generator.clone();
            handles.push(std::thread::spawn(move || {
                (0..10)
                    .map(|_| generator.next(NOW).unwrap())
                    .collect::<Vec<_>>()
            }));
        }

        let numbers: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let unique: HashSet<&String> = numbers.iter().collect();
        assert_eq!(unique.len(), 100, "duplicate order numbers generated");
    }
}
