//! Occurrence counters keyed by a record or tube property.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use pipeline_model::SeamType;

/// Text of a counted value in reports; unknown values print as `-`.
pub trait Label {
    fn label(&self) -> String;
}

impl Label for i64 {
    fn label(&self) -> String {
        self.to_string()
    }
}

impl Label for String {
    fn label(&self) -> String {
        self.clone()
    }
}

impl Label for SeamType {
    fn label(&self) -> String {
        self.to_string()
    }
}

impl<T: Label> Label for Option<T> {
    fn label(&self) -> String {
        self.as_ref().map_or_else(|| "-".to_string(), Label::label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Counter {
    pub number: usize,
}

impl Counter {
    pub fn increment(&mut self) {
        self.number += 1;
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "num: {}", self.number)
    }
}

/// Count with summed tube length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CounterLength {
    pub number: usize,
    pub length: i64,
}

impl CounterLength {
    pub fn increase(&mut self, length: i64) {
        self.number += 1;
        self.length += length;
    }
}

impl fmt::Display for CounterLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "num: {} len: {}", self.number, self.length)
    }
}

/// Counts items by value and remembers which tubes they were found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyCounter<K: Ord> {
    pub number: usize,
    data: BTreeMap<K, Counter>,
    tubes: BTreeMap<K, BTreeSet<usize>>,
}

impl<K: Ord> Default for PropertyCounter<K> {
    fn default() -> Self {
        Self {
            number: 0,
            data: BTreeMap::new(),
            tubes: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> PropertyCounter<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one item with value `key` found on tube `tube`.
    pub fn add_item(&mut self, key: K, tube: usize) {
        self.number += 1;
        self.data.entry(key.clone()).or_default().increment();
        self.tubes.entry(key).or_default().insert(tube);
    }

    pub fn count(&self, key: &K) -> usize {
        self.data.get(key).map_or(0, |counter| counter.number)
    }

    /// Distinct tubes carrying an item with value `key`.
    pub fn tubes_with(&self, key: &K) -> usize {
        self.tubes.get(key).map_or(0, BTreeSet::len)
    }

    /// Distinct tubes carrying any counted item.
    pub fn tubes_all(&self) -> usize {
        self.tubes
            .values()
            .flatten()
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.data.keys()
    }
}

impl<K: Ord + Label> fmt::Display for PropertyCounter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total_num: {}", self.number)?;
        for (key, counter) in &self.data {
            write!(f, "\n{} {counter}", key.label())?;
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct CounterEntry<'a, K> {
    value: &'a K,
    number: usize,
    tubes: usize,
}

impl<K: Ord + Clone + Serialize> Serialize for PropertyCounter<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<CounterEntry<'_, K>> = self
            .data
            .iter()
            .map(|(value, counter)| CounterEntry {
                value,
                number: counter.number,
                tubes: self.tubes_with(value),
            })
            .collect();
        let mut state = serializer.serialize_struct("PropertyCounter", 3)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("tubes", &self.tubes_all())?;
        state.serialize_field("values", &values)?;
        state.end()
    }
}

/// Tube count and length by one tube property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TubeProperty<K: Ord> {
    pub number: usize,
    pub length: i64,
    data: BTreeMap<K, CounterLength>,
}

impl<K: Ord> Default for TubeProperty<K> {
    fn default() -> Self {
        Self {
            number: 0,
            length: 0,
            data: BTreeMap::new(),
        }
    }
}

impl<K: Ord> TubeProperty<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_data(&mut self, key: K, length: i64) {
        self.number += 1;
        self.length += length;
        self.data.entry(key).or_default().increase(length);
    }

    pub fn get(&self, key: &K) -> Option<&CounterLength> {
        self.data.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &CounterLength)> {
        self.data.iter()
    }
}

impl<K: Ord + Label> fmt::Display for TubeProperty<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total_num: {} total_len: {}", self.number, self.length)?;
        for (key, counter) in &self.data {
            write!(f, "\n{} {counter}", key.label())?;
        }
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct LengthEntry<'a, K> {
    value: &'a K,
    number: usize,
    length: i64,
}

impl<K: Ord + Serialize> Serialize for TubeProperty<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<LengthEntry<'_, K>> = self
            .data
            .iter()
            .map(|(value, counter)| LengthEntry {
                value,
                number: counter.number,
                length: counter.length,
            })
            .collect();
        let mut state = serializer.serialize_struct("TubeProperty", 3)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("length", &self.length)?;
        state.serialize_field("values", &values)?;
        state.end()
    }
}
