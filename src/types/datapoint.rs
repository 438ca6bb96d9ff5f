// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel datapoints and their ordered mapping.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{PairingId, Value};

/// One input or output of a channel.
///
/// Deserializes from the hub's JSON form:
///
/// ```
/// use freeathome_lib::types::{Datapoint, PairingId};
///
/// let dp: Datapoint = serde_json::from_str(r#"{"pairingID": 1, "value": "0"}"#).unwrap();
/// assert_eq!(dp.pairing_id, PairingId::SWITCH_ON_OFF);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    /// Semantic role of the datapoint.
    #[serde(rename = "pairingID")]
    pub pairing_id: PairingId,
    /// Current value. Missing or `null` in JSON means never set.
    #[serde(default, deserialize_with = "value_or_default")]
    pub value: Value,
}

fn value_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
    Option::<Value>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Datapoint {
    /// Creates a datapoint.
    #[must_use]
    pub fn new(pairing_id: impl Into<PairingId>, value: impl Into<Value>) -> Self {
        Self {
            pairing_id: pairing_id.into(),
            value: value.into(),
        }
    }
}

/// Named datapoints of one direction of a channel, in insertion order.
///
/// The mapping is small (a handful of entries per channel), so it is kept
/// as a vector and searched linearly. Iteration order is the order in which
/// names were first inserted; when deserialized, that is the JSON document
/// order. Inserting an existing name replaces its datapoint in place.
///
/// # Examples
///
/// ```
/// use freeathome_lib::types::{Datapoint, DatapointMap, PairingId};
///
/// let map: DatapointMap = [
///     ("idp0000", Datapoint::new(PairingId::SWITCH_ON_OFF, "0")),
///     ("idp0001", Datapoint::new(PairingId::ABSOLUTE_SET_VALUE_CONTROL, "50")),
/// ]
/// .into_iter()
/// .collect();
///
/// let (name, dp) = map.find_by_pairing_id(PairingId::SWITCH_ON_OFF).unwrap();
/// assert_eq!(name, "idp0000");
/// assert_eq!(dp.value.as_bool(), Some(false));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatapointMap {
    entries: Vec<(String, Datapoint)>,
}

impl DatapointMap {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a datapoint, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, datapoint: Datapoint) -> Option<Datapoint> {
        let name = name.into();
        if let Some(slot) = self.get_mut(&name) {
            return Some(std::mem::replace(slot, datapoint));
        }
        self.entries.push((name, datapoint));
        None
    }

    /// Returns the datapoint with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Datapoint> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, dp)| dp)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Datapoint> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, dp)| dp)
    }

    /// Returns `true` if a datapoint with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the first datapoint, in insertion order, carrying `pairing_id`.
    #[must_use]
    pub fn find_by_pairing_id(&self, pairing_id: PairingId) -> Option<(&str, &Datapoint)> {
        self.entries
            .iter()
            .find(|(_, dp)| dp.pairing_id == pairing_id)
            .map(|(name, dp)| (name.as_str(), dp))
    }

    /// Replaces the value of a named datapoint.
    ///
    /// Returns `None` if the name is unknown, otherwise `Some(changed)`.
    pub fn set_value(&mut self, name: &str, value: Value) -> Option<bool> {
        let dp = self.get_mut(name)?;
        if dp.value.same_as(&value) {
            return Some(false);
        }
        dp.value = value;
        Some(true)
    }

    /// Iterates over `(name, datapoint)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Datapoint)> {
        self.entries.iter().map(|(name, dp)| (name.as_str(), dp))
    }

    /// Returns the number of datapoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no datapoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Datapoint)> for DatapointMap {
    fn from_iter<I: IntoIterator<Item = (K, Datapoint)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, dp) in iter {
            map.insert(name, dp);
        }
        map
    }
}

impl Serialize for DatapointMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, dp) in &self.entries {
            map.serialize_entry(name, dp)?;
        }
        map.end()
    }
}

struct DatapointMapVisitor;

impl<'de> Visitor<'de> for DatapointMapVisitor {
    type Value = DatapointMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of datapoint names to datapoints")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> Result<Self::Value, M::Error> {
        let mut map = DatapointMap {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((name, dp)) = access.next_entry::<String, Datapoint>()? {
            map.insert(name, dp);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for DatapointMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DatapointMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatapointMap {
        [
            ("input1", Datapoint::new(PairingId::new(1), "input_value1")),
            ("input2", Datapoint::new(PairingId::new(2), "input_value2")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn find_by_pairing_id_returns_match() {
        let map = sample();
        let (name, dp) = map.find_by_pairing_id(PairingId::new(2)).unwrap();
        assert_eq!(name, "input2");
        assert_eq!(dp.value, Value::from("input_value2"));
    }

    #[test]
    fn find_by_pairing_id_missing() {
        assert!(sample().find_by_pairing_id(PairingId::new(99)).is_none());
    }

    #[test]
    fn find_by_pairing_id_first_inserted_wins() {
        let map: DatapointMap = [
            ("b", Datapoint::new(PairingId::new(7), "first")),
            ("a", Datapoint::new(PairingId::new(7), "second")),
        ]
        .into_iter()
        .collect();

        let (name, _) = map.find_by_pairing_id(PairingId::new(7)).unwrap();
        assert_eq!(name, "b");
    }

    #[test]
    fn insert_existing_name_keeps_position() {
        let mut map = sample();
        let old = map.insert("input1", Datapoint::new(PairingId::new(5), "replaced"));

        assert_eq!(old, Some(Datapoint::new(PairingId::new(1), "input_value1")));
        assert_eq!(map.len(), 2);
        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["input1", "input2"]);
        assert_eq!(map.get("input1").unwrap().pairing_id, PairingId::new(5));
    }

    #[test]
    fn set_value_reports_change() {
        let mut map = sample();
        assert_eq!(map.set_value("input1", Value::from("input_value1")), Some(false));
        assert_eq!(map.set_value("input1", Value::from("new")), Some(true));
        assert_eq!(map.set_value("missing", Value::from("x")), None);
        assert_eq!(map.get("input1").unwrap().value, Value::from("new"));
    }

    #[test]
    fn set_value_repeated_nan_is_unchanged() {
        let mut map = sample();
        assert_eq!(map.set_value("input2", Value::from(f64::NAN)), Some(true));
        assert_eq!(map.set_value("input2", Value::from(f64::NAN)), Some(false));
        assert_eq!(map.set_value("input2", Value::from(3.0)), Some(true));
    }

    #[test]
    fn deserialize_keeps_document_order() {
        let json = r#"{
            "zeta": {"pairingID": 1, "value": "z"},
            "alpha": {"pairingID": 1, "value": "a"},
            "mid": {"pairingID": 256}
        }"#;
        let map: DatapointMap = serde_json::from_str(json).unwrap();

        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(map.find_by_pairing_id(PairingId::new(1)).unwrap().0, "zeta");
        assert!(map.get("mid").unwrap().value.is_empty());
    }

    #[test]
    fn deserialize_null_value_as_unset() {
        let json = r#"{
            "odp0000": {"pairingID": 256, "value": null},
            "odp0001": {"pairingID": 272, "value": "40"}
        }"#;
        let map: DatapointMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.len(), 2);
        assert!(map.get("odp0000").unwrap().value.is_empty());
        assert_eq!(map.get("odp0001").unwrap().value, Value::from("40"));
    }

    #[test]
    fn serialize_uses_hub_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input1": {"pairingID": 1, "value": "input_value1"},
                "input2": {"pairingID": 2, "value": "input_value2"},
            })
        );
    }

    #[test]
    fn empty_map() {
        let map = DatapointMap::new();
        assert!(map.is_empty());
        assert!(!map.contains("input1"));
    }
}
