use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw record as returned by the catalog list endpoint.
///
/// Every field is optional: the remote schema is heterogeneous and partial
/// entries are common. Normalization decides what survives.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawRecord {
    pub id: Option<i64>,
    pub slug: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub cover: Option<RawCover>,
    pub alternative_names: Option<Vec<RawAlternativeName>>,
}

/// Cover sub-object of a raw record.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawCover {
    pub url: Option<String>,
}

/// One entry of a raw record's alternate-name list.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RawAlternativeName {
    pub name: Option<String>,
}

/// The normalized, index-ready representation of one catalog entry.
///
/// This is also the fixture format: mock mode deserializes a JSON object
/// mapping `key` to these fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord {
    /// Stable external identifier, unique within a harvest. Never empty.
    pub key: String,
    /// Primary searchable field. Never empty.
    pub name: String,
    /// Searchable alternate names, source order, empty strings filtered.
    pub alternative_names: Vec<String>,
    /// Lower-weight searchable text; possibly empty, never absent.
    pub summary: String,
    /// Full-resolution image reference; not searchable.
    pub cover_image_url: String,
    /// Small-resolution image reference; not searchable.
    pub thumbnail_image_url: String,
}

/// Parameters of one page request against the catalog list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Exclusive lower bound on record ids (`id > after_id`).
    pub after_id: i64,
    /// Offset within the filtered id range.
    pub offset: u64,
    /// Maximum records in this page.
    pub limit: u64,
}

/// A failed page request, tagged with its window-relative offset.
///
/// Recorded and reported; never aborts sibling pages in the same window.
#[derive(Debug, Clone)]
pub struct FetchError {
    pub offset: u64,
    pub reason: String,
}

/// Key-indexed collection of canonical records accumulated over a harvest.
///
/// Merge rule is last-write-wins per key. Because the pagination cursor is
/// strictly increasing and ids are unique, later windows can never carry an
/// already-seen record, so an insert never replaces fresh data with stale.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Dataset {
    records: BTreeMap<String, CanonicalRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under its key, replacing any previous entry.
    pub fn insert(&mut self, record: CanonicalRecord) {
        self.records.insert(record.key.clone(), record);
    }

    pub fn get(&self, key: &str) -> Option<&CanonicalRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CanonicalRecord)> {
        self.records.iter()
    }

    /// Widest alternate-name list across all records.
    ///
    /// Drives how many searchable alternate-name slots the index schema
    /// declares; records with fewer entries are stored sparse.
    pub fn max_alternative_names(&self) -> usize {
        self.records
            .values()
            .map(|r| r.alternative_names.len())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, name: &str) -> CanonicalRecord {
        CanonicalRecord {
            key: key.to_string(),
            name: name.to_string(),
            alternative_names: Vec::new(),
            summary: String::new(),
            cover_image_url: String::new(),
            thumbnail_image_url: String::new(),
        }
    }

    #[test]
    fn test_insert_is_last_write_wins() {
        let mut dataset = Dataset::new();
        dataset.insert(record("zelda", "Zelda"));
        dataset.insert(record("zelda", "The Legend of Zelda"));

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.get("zelda").unwrap().name, "The Legend of Zelda");
    }

    #[test]
    fn test_max_alternative_names_empty_dataset() {
        assert_eq!(Dataset::new().max_alternative_names(), 0);
    }

    #[test]
    fn test_max_alternative_names() {
        let mut dataset = Dataset::new();
        let mut a = record("a", "A");
        a.alternative_names = vec!["one".to_string()];
        let mut b = record("b", "B");
        b.alternative_names = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        dataset.insert(a);
        dataset.insert(b);

        assert_eq!(dataset.max_alternative_names(), 3);
    }

    #[test]
    fn test_dataset_serializes_as_key_map() {
        let mut dataset = Dataset::new();
        dataset.insert(record("doom", "Doom"));

        let json = serde_json::to_value(&dataset).unwrap();
        assert!(json.is_object());
        assert_eq!(json["doom"]["name"], "Doom");
    }

    #[test]
    fn test_dataset_fixture_roundtrip() {
        let json = r#"{
            "halo": {
                "key": "halo",
                "name": "Halo",
                "alternative_names": ["Halo: Combat Evolved"],
                "summary": "",
                "cover_image_url": "//img/t_cover_big/h.jpg",
                "thumbnail_image_url": "//img/t_thumb/h.jpg"
            }
        }"#;

        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.len(), 1);
        let halo = dataset.get("halo").unwrap();
        assert_eq!(halo.name, "Halo");
        assert_eq!(halo.alternative_names, vec!["Halo: Combat Evolved"]);
    }

    #[test]
    fn test_raw_record_deserialization_partial() {
        let json = r#"{"id": 42, "name": "Quake"}"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, Some(42));
        assert_eq!(raw.name.as_deref(), Some("Quake"));
        assert!(raw.slug.is_none());
        assert!(raw.cover.is_none());
        assert!(raw.alternative_names.is_none());
    }

    #[test]
    fn test_raw_record_deserialization_full() {
        let json = r#"{
            "id": 7,
            "slug": "myst",
            "name": "Myst",
            "summary": "An island.",
            "cover": {"url": "//img/t_thumb/m.jpg"},
            "alternative_names": [{"name": "Myst: The Island"}]
        }"#;
        let raw: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.slug.as_deref(), Some("myst"));
        assert_eq!(raw.cover.unwrap().url.as_deref(), Some("//img/t_thumb/m.jpg"));
        assert_eq!(
            raw.alternative_names.unwrap()[0].name.as_deref(),
            Some("Myst: The Island")
        );
    }
}
