//! Implementation of a pattern history table (PHT).

use std::collections::BTreeMap;
use itertools::Itertools;

use crate::bit::*;
use crate::error::PredictorError;

/// A table mapping `key_bits`-wide keys to `value_bits`-wide counters.
///
/// Entries are materialized explicitly: [HistoryTable::get] on a key that
/// was never written is an error, so callers are expected to use
/// [HistoryTable::put_if_absent] first.
#[derive(Clone, Debug)]
pub struct HistoryTable {
    label: String,
    key_bits: usize,
    value_bits: usize,

    /// Bits reserved in the table capacity for a selector which is not part
    /// of the key.
    selector_bits: usize,

    data: BTreeMap<Bits, Bits>,
}

impl HistoryTable {
    pub fn new(label: impl Into<String>, key_bits: usize, value_bits: usize)
        -> Self
    {
        Self::with_selector(label, 0, key_bits, value_bits)
    }

    /// Create a table whose capacity also covers `selector_bits` rows.
    pub fn with_selector(label: impl Into<String>,
        selector_bits: usize, key_bits: usize, value_bits: usize
    ) -> Self
    {
        Self {
            label: label.into(),
            key_bits,
            value_bits,
            selector_bits,
            data: BTreeMap::new(),
        }
    }

    pub fn key_bits(&self) -> usize { self.key_bits }
    pub fn value_bits(&self) -> usize { self.value_bits }

    /// Base-2 logarithm of the number of entries the table can hold.
    pub fn capacity_bits(&self) -> usize { self.selector_bits + self.key_bits }

    /// Number of populated entries.
    pub fn len(&self) -> usize { self.data.len() }
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    fn check_key(&self, key: &BitStr) -> Result<(), PredictorError> {
        PredictorError::check_len("table key", self.key_bits, key.len())
    }

    fn check_value(&self, value: &BitStr) -> Result<(), PredictorError> {
        PredictorError::check_len("table value", self.value_bits, value.len())
    }

    /// Read the entry for `key`.
    pub fn get(&self, key: &BitStr) -> Result<&BitStr, PredictorError> {
        self.check_key(key)?;
        self.data.get(key)
            .map(|v| v.as_bitslice())
            .ok_or_else(|| PredictorError::MissingEntry { key: render(key) })
    }

    /// Write the entry for `key`, replacing any existing value.
    pub fn put(&mut self, key: &BitStr, value: &BitStr)
        -> Result<(), PredictorError>
    {
        self.check_key(key)?;
        self.check_value(value)?;
        self.data.insert(key.to_bitvec(), value.to_bitvec());
        Ok(())
    }

    /// Write `value` for `key` only if the key has no entry yet.
    pub fn put_if_absent(&mut self, key: &BitStr, value: &BitStr)
        -> Result<(), PredictorError>
    {
        self.check_key(key)?;
        self.check_value(value)?;
        if !self.data.contains_key(key) {
            self.data.insert(key.to_bitvec(), value.to_bitvec());
        }
        Ok(())
    }

    /// Iterate over populated entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BitStr, &BitStr)> {
        self.data.iter().map(|(k, v)| (k.as_bitslice(), v.as_bitslice()))
    }

    /// Diagnostic dump of every populated entry.
    pub fn monitor(&self) -> String {
        let header = format!("{} ({}/2^{} entries):\n",
            self.label, self.len(), self.capacity_bits()
        );
        let body = self.iter()
            .map(|(k, v)| format!("  {} -> {}\n", render(k), render(v)))
            .join("");
        header + &body
    }
}
