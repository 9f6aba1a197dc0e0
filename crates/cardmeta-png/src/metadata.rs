//! Decoded metadata entries and the map that collects them.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{CardFormat, ChunkType};

/// Transport encoding a payload was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Base64-wrapped JSON inside a `tEXt` chunk.
    Base64,
}

/// One decoded card payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    /// Type of the chunk the payload came from.
    #[serde(rename = "type")]
    pub chunk_type: ChunkType,
    pub data: Value,
    /// Length of the chunk payload in bytes.
    pub size: usize,
    pub format: CardFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
}

/// Decoded entries keyed by chunk type or `tEXt` keyword.
///
/// Keys are unique and iterate in the order they were first inserted.
/// Inserting an existing key replaces its entry in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMap {
    entries: Vec<(String, MetadataEntry)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced.
    pub fn insert(&mut self, key: impl Into<String>, entry: MetadataEntry) -> Option<MetadataEntry> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, entry)),
            None => {
                self.entries.push((key, entry));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetadataEntry> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entry)| entry)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataEntry)> {
        self.entries.iter().map(|(k, entry)| (k.as_str(), entry))
    }

    /// The entry most likely to hold the authoritative card.
    ///
    /// Prefers a v3 payload, then v2, then whatever was found first.
    pub fn primary(&self) -> Option<&MetadataEntry> {
        self.entries
            .iter()
            .map(|(_, entry)| entry)
            .find(|entry| entry.format == CardFormat::V3)
            .or_else(|| {
                self.entries
                    .iter()
                    .map(|(_, entry)| entry)
                    .find(|entry| entry.format == CardFormat::V2)
            })
            .or_else(|| self.entries.first().map(|(_, entry)| entry))
    }
}

impl IntoIterator for MetadataMap {
    type Item = (String, MetadataEntry);
    type IntoIter = std::vec::IntoIter<(String, MetadataEntry)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(data: Value) -> MetadataEntry {
        MetadataEntry {
            chunk_type: ChunkType::tEXt,
            format: CardFormat::classify(&data),
            data,
            size: 0,
            encoding: Some(Encoding::Base64),
        }
    }

    #[test]
    fn test_last_writer_wins_in_place() {
        let mut map = MetadataMap::new();
        assert!(map.insert("chara", entry(json!({"n": 1}))).is_none());
        map.insert("ccv3", entry(json!({"n": 2})));
        let old = map.insert("chara", entry(json!({"n": 3}))).unwrap();

        assert_eq!(old.data["n"], 1);
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), ["chara", "ccv3"]);
        assert_eq!(map.get("chara").unwrap().data["n"], 3);
    }

    #[test]
    fn test_primary_prefers_v3() {
        let mut map = MetadataMap::new();
        assert!(map.primary().is_none());

        map.insert("chara", entry(json!({"spec": "chara_card_v2"})));
        assert_eq!(map.primary().unwrap().format, CardFormat::V2);

        map.insert("ccv3", entry(json!({"spec": "chara_card_v3"})));
        assert_eq!(map.primary().unwrap().format, CardFormat::V3);
    }

    #[test]
    fn test_serialize_shape() {
        let mut map = MetadataMap::new();
        map.insert("chara", entry(json!({"name": "x", "description": "y"})));

        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(
            value,
            json!({
                "chara": {
                    "type": "tEXt",
                    "data": {"name": "x", "description": "y"},
                    "size": 0,
                    "format": "v1",
                    "encoding": "base64"
                }
            })
        );
    }
}
