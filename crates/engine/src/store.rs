//! Sparse cell storage.
//!
//! Only cells that differ from the all-default empty cell are kept. Every
//! write path prunes entries that become default, so clearing a cell twice
//! leaves the same store as clearing it once.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::cell::CellData;

/// Coordinate key for the sparse store.
///
/// Encoded as `"row:col"` (0-based) in the document payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: usize,
    pub col: usize,
}

impl CellKey {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (r, c) = s
            .split_once(':')
            .ok_or_else(|| format!("cell key '{s}' is not row:col"))?;
        let row = r.parse().map_err(|_| format!("bad row in cell key '{s}'"))?;
        let col = c.parse().map_err(|_| format!("bad column in cell key '{s}'"))?;
        Ok(Self { row, col })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStore {
    cells: FxHashMap<CellKey, CellData>,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(row, col)`, or the default empty cell.
    pub fn get(&self, row: usize, col: usize) -> CellData {
        self.cells
            .get(&CellKey::new(row, col))
            .cloned()
            .unwrap_or_default()
    }

    /// Stored cell, if any. Use this on hot paths to avoid the clone.
    pub fn get_ref(&self, row: usize, col: usize) -> Option<&CellData> {
        self.cells.get(&CellKey::new(row, col))
    }

    /// Raw value (empty string for untouched cells).
    pub fn raw(&self, row: usize, col: usize) -> &str {
        self.get_ref(row, col).map(|c| c.value.as_str()).unwrap_or("")
    }

    pub fn set(&mut self, row: usize, col: usize, data: CellData) {
        let key = CellKey::new(row, col);
        if data.is_default() {
            self.cells.remove(&key);
        } else {
            self.cells.insert(key, data);
        }
    }

    /// Replace only the value, keeping formatting.
    pub fn set_value(&mut self, row: usize, col: usize, value: &str) {
        self.update(row, col, |cell| cell.value = value.to_string());
    }

    /// Mutate a cell in place, materializing it if needed and pruning it if
    /// the result is default.
    pub fn update<F: FnOnce(&mut CellData)>(&mut self, row: usize, col: usize, f: F) {
        let key = CellKey::new(row, col);
        let mut cell = self.cells.remove(&key).unwrap_or_default();
        f(&mut cell);
        if !cell.is_default() {
            self.cells.insert(key, cell);
        }
    }

    pub fn delete(&mut self, row: usize, col: usize) -> Option<CellData> {
        self.cells.remove(&CellKey::new(row, col))
    }

    /// Re-key every cell through the two mappers. A coordinate for which
    /// either mapper returns `None` is dropped.
    ///
    /// Mappers must be injective over the keys they keep, otherwise two cells
    /// would land on the same coordinate and one would be lost.
    pub fn remap<R, C>(&self, map_row: R, map_col: C) -> CellStore
    where
        R: Fn(usize) -> Option<usize>,
        C: Fn(usize) -> Option<usize>,
    {
        let mut cells = FxHashMap::default();
        cells.reserve(self.cells.len());
        for (key, data) in &self.cells {
            if let (Some(row), Some(col)) = (map_row(key.row), map_col(key.col)) {
                cells.insert(CellKey::new(row, col), data.clone());
            }
        }
        CellStore { cells }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &CellData)> {
        self.cells.iter()
    }

    /// Entries in (row, col) order. Used wherever output must be deterministic.
    pub fn sorted(&self) -> Vec<(CellKey, &CellData)> {
        let mut entries: Vec<_> = self.cells.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }

    /// Largest occupied (row, col), or None for an empty store.
    pub fn extent(&self) -> Option<(usize, usize)> {
        self.cells.keys().fold(None, |acc, k| match acc {
            None => Some((k.row, k.col)),
            Some((r, c)) => Some((r.max(k.row), c.max(k.col))),
        })
    }
}

impl Serialize for CellStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, data) in entries {
            map.serialize_entry(&key.to_string(), data)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CellStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, CellData>::deserialize(deserializer)?;
        let mut store = CellStore::new();
        for (key, data) in raw {
            let key: CellKey = key.parse().map_err(de::Error::custom)?;
            store.set(key.row, key.col, data);
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shift_insert(at: usize) -> impl Fn(usize) -> Option<usize> {
        move |i| Some(if i >= at { i + 1 } else { i })
    }

    fn shift_delete(pivot: usize) -> impl Fn(usize) -> Option<usize> {
        move |i| match i.cmp(&pivot) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        }
    }

    #[test]
    fn test_get_default_for_missing() {
        let store = CellStore::new();
        assert!(store.get(3, 4).is_default());
        assert_eq!(store.raw(3, 4), "");
        assert!(store.is_empty());
    }

    #[test]
    fn test_clearing_prunes_entry() {
        let mut store = CellStore::new();
        store.set_value(1, 1, "hello");
        assert_eq!(store.len(), 1);
        store.set_value(1, 1, "");
        assert!(store.is_empty());
        // Idempotent
        store.set_value(1, 1, "");
        assert!(store.is_empty());
    }

    #[test]
    fn test_formatting_keeps_empty_value_entry() {
        let mut store = CellStore::new();
        store.update(0, 0, |c| c.bold = true);
        assert_eq!(store.len(), 1);
        store.update(0, 0, |c| c.bold = false);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remap_drops_and_shifts() {
        let mut store = CellStore::new();
        store.set_value(0, 0, "a");
        store.set_value(1, 0, "b");
        store.set_value(2, 0, "c");

        let out = store.remap(shift_delete(1), Some);
        assert_eq!(out.raw(0, 0), "a");
        assert_eq!(out.raw(1, 0), "c");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_payload_keys() {
        let mut store = CellStore::new();
        store.set_value(2, 1, "x");
        store.set_value(0, 0, "y");
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"0:0":{"value":"y"},"2:1":{"value":"x"}}"#);

        let back: CellStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    #[test]
    fn test_payload_drops_empty_records() {
        let back: CellStore = serde_json::from_str(r#"{"0:0":{"value":""},"1:1":{}}"#).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_payload_rejects_bad_key() {
        assert!(serde_json::from_str::<CellStore>(r#"{"A1":{"value":"x"}}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_insert_then_delete_roundtrips(
            cells in proptest::collection::vec((0usize..40, 0usize..20, "[a-z0-9]{1,4}"), 0..60),
            pivot in 0usize..45,
            on_rows in any::<bool>(),
        ) {
            let mut store = CellStore::new();
            for (r, c, v) in &cells {
                store.set_value(*r, *c, v);
            }
            let back = if on_rows {
                store.remap(shift_insert(pivot), Some).remap(shift_delete(pivot), Some)
            } else {
                store.remap(Some, shift_insert(pivot)).remap(Some, shift_delete(pivot))
            };
            prop_assert_eq!(back, store);
        }

        #[test]
        fn prop_store_never_holds_defaults(
            ops in proptest::collection::vec((0usize..10, 0usize..10, prop::option::of("[a-c]{0,2}")), 0..80),
        ) {
            let mut store = CellStore::new();
            for (r, c, v) in ops {
                match v {
                    Some(v) => store.set_value(r, c, &v),
                    None => { store.delete(r, c); }
                }
            }
            prop_assert!(store.iter().all(|(_, d)| !d.is_default()));
        }
    }
}
