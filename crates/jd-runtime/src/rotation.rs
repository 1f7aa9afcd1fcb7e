use std::collections::BTreeMap;

use jd_core::{JabdoriError, ResponsePools};
use tracing::{debug, warn};

pub const COUNTER_KEY_PREFIX: &str = "jabdori_msg_idx";

pub fn counter_key(label: &str) -> String {
    format!("{}_{}", COUNTER_KEY_PREFIX, label)
}

/// Stored counters are base-10 strings. The leading integer is read and
/// trailing garbage ignored, so `"3abc"` is 3. Negative or unparsable values
/// count as 0.
pub fn parse_counter(raw: &str) -> u64 {
    let trimmed = raw.trim_start();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(0)
}

/// Durable key-value namespace holding one rotation counter per key.
pub trait CounterStore {
    /// Current value, `0` when the key was never written.
    fn get(&self, key: &str) -> u64;

    fn set(&mut self, key: &str, value: u64) -> Result<(), JabdoriError>;
}

impl<S: CounterStore + ?Sized> CounterStore for Box<S> {
    fn get(&self, key: &str) -> u64 {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), JabdoriError> {
        (**self).set(key, value)
    }
}

/// Session-only store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCounterStore {
    values: BTreeMap<String, u64>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &BTreeMap<String, u64> {
        &self.values
    }
}

impl CounterStore for MemoryCounterStore {
    fn get(&self, key: &str) -> u64 {
        self.values.get(key).copied().unwrap_or(0)
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), JabdoriError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Picks the next closing message for `label` round-robin and advances its
/// counter. A failed write is logged; the message is returned regardless.
pub fn next_message<S: CounterStore + ?Sized>(
    store: &mut S,
    pools: &ResponsePools,
    label: &str,
) -> String {
    let pool = pools.pool_for(label);
    let key = counter_key(label);
    let counter = store.get(&key);
    let index = (counter % pool.len() as u64) as usize;
    let message = pool[index].clone();

    if let Err(error) = store.set(&key, counter.wrapping_add(1)) {
        warn!(key = key.as_str(), error = %error, "failed to persist rotation counter");
    }
    debug!(label, counter, index, "rotated closing message");
    message
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    fn pools() -> ResponsePools {
        let mut by_label = BTreeMap::new();
        by_label.insert(
            "coffee".to_string(),
            vec!["c0".to_string(), "c1".to_string(), "c2".to_string()],
        );
        ResponsePools::new(by_label, vec!["d0".to_string(), "d1".to_string()])
            .expect("pools should build")
    }

    #[derive(Debug, Default)]
    struct ReadOnlyStore;

    impl CounterStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> u64 {
            4
        }

        fn set(&mut self, _key: &str, _value: u64) -> Result<(), JabdoriError> {
            Err(JabdoriError::new("STORE_READ_ONLY", "read only"))
        }
    }

    #[test]
    fn counter_key_uses_fixed_prefix() {
        assert_eq!(counter_key("커피 한 잔"), "jabdori_msg_idx_커피 한 잔");
    }

    #[test]
    fn parse_counter_defaults_to_zero() {
        assert_eq!(parse_counter("7"), 7);
        assert_eq!(parse_counter(" 12\n"), 12);
        assert_eq!(parse_counter(""), 0);
        assert_eq!(parse_counter("abc"), 0);
        assert_eq!(parse_counter("-3"), 0);
    }

    #[test]
    fn parse_counter_reads_leading_integer() {
        assert_eq!(parse_counter("3abc"), 3);
        assert_eq!(parse_counter("+5"), 5);
        assert_eq!(parse_counter("  42 apples"), 42);
        assert_eq!(parse_counter("1.9"), 1);
        assert_eq!(parse_counter("x3"), 0);
        assert_eq!(parse_counter("+"), 0);
    }

    #[test]
    fn rotation_is_round_robin_from_the_stored_counter() {
        let pools = pools();
        let mut store = MemoryCounterStore::new();
        store.set(&counter_key("coffee"), 2).expect("seed");

        let messages = (0..5)
            .map(|_| next_message(&mut store, &pools, "coffee"))
            .collect::<Vec<_>>();
        assert_eq!(messages, vec!["c2", "c0", "c1", "c2", "c0"]);
        assert_eq!(store.get(&counter_key("coffee")), 7);
    }

    #[test]
    fn missing_label_rotates_default_pool_under_its_own_key() {
        let pools = pools();
        let mut store = MemoryCounterStore::new();
        assert_eq!(next_message(&mut store, &pools, "tea"), "d0");
        assert_eq!(next_message(&mut store, &pools, "tea"), "d1");
        assert_eq!(next_message(&mut store, &pools, "water"), "d0");
        assert_eq!(store.get(&counter_key("tea")), 2);
        assert_eq!(store.get(&counter_key("water")), 1);
    }

    #[test]
    fn counter_larger_than_pool_wraps() {
        let pools = pools();
        let mut store = MemoryCounterStore::new();
        store.set(&counter_key("coffee"), 100).expect("seed");
        assert_eq!(next_message(&mut store, &pools, "coffee"), "c1");
    }

    #[test]
    fn failed_write_still_returns_message() {
        let pools = pools();
        let mut store = ReadOnlyStore;
        assert_eq!(next_message(&mut store, &pools, "coffee"), "c1");

        let mut boxed: Box<dyn CounterStore> = Box::new(MemoryCounterStore::new());
        assert_eq!(next_message(&mut boxed, &pools, "coffee"), "c0");
        assert_eq!(boxed.get(&counter_key("coffee")), 1);
    }
}
