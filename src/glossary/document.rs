//! Persisted glossary document.
//!
//! The whole collection lives in one JSON file:
//!
//! ```json
//! { "terms": { "<id>": { "id": "<id>", "term": "...", "definition": "...",
//!                        "category": null, "relations": [] } } }
//! ```
//!
//! Entries are written in insertion order and read back in document order, so
//! a reload reproduces the in-memory ordering. Every key must equal the `id` of
//! its record. The file is replaced atomically (temp file, fsync, rename).

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use serde::{
    de::{self, MapAccess, Visitor},
    ser::{SerializeMap, SerializeStruct},
    Deserialize, Deserializer, Serialize, Serializer,
};
use validator::Validate;

use super::{entities::Term, service::GlossaryError, value_objects::TermId};

/// Ordered in-memory term collection keyed by identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TermCollection {
    terms: Vec<Term>,
    index: HashMap<TermId, usize>,
}

impl TermCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.index.get(id).map(|&position| &self.terms[position])
    }

    /// Iterates terms in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Term> {
        self.terms.iter()
    }

    /// Returns the insertion ordered window `[skip, skip + limit)`.
    #[must_use]
    pub fn window(&self, skip: usize, limit: usize) -> &[Term] {
        let start = skip.min(self.terms.len());
        let end = start.saturating_add(limit).min(self.terms.len());
        &self.terms[start..end]
    }

    /// Inserts `term`, replacing the record with the same id in place.
    ///
    /// Returns the replaced record, if any. A replaced record keeps its
    /// position in the ordering.
    pub fn upsert(&mut self, term: Term) -> Option<Term> {
        match self.index.get(&term.id) {
            Some(&position) => Some(std::mem::replace(&mut self.terms[position], term)),
            None => {
                self.index.insert(term.id.clone(), self.terms.len());
                self.terms.push(term);
                None
            }
        }
    }

    /// Distinct non-empty categories in lexicographic order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.terms
            .iter()
            .filter_map(Term::listed_category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Removes the record with identifier `id`.
    pub fn remove(&mut self, id: &str) -> Option<Term> {
        let position = self.index.remove(id)?;
        let removed = self.terms.remove(position);
        for (offset, term) in self.terms[position..].iter().enumerate() {
            self.index.insert(term.id.clone(), position + offset);
        }
        Some(removed)
    }
}

impl<'a> IntoIterator for &'a TermCollection {
    type Item = &'a Term;
    type IntoIter = std::slice::Iter<'a, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for TermCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut document = serializer.serialize_struct("TermCollection", 1)?;
        document.serialize_field("terms", &TermsMap(&self.terms))?;
        document.end()
    }
}

struct TermsMap<'a>(&'a [Term]);

impl Serialize for TermsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for term in self.0 {
            map.serialize_entry(term.id.as_str(), term)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TermCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct RawDocument {
            terms: OrderedTerms,
        }

        let raw = RawDocument::deserialize(deserializer)?;
        let mut collection = Self::new();
        for (key, term) in raw.terms.0 {
            if key != term.id.as_str() {
                return Err(de::Error::custom(format!(
                    "term stored under key `{key}` declares id `{}`",
                    term.id
                )));
            }
            if collection.contains(&key) {
                return Err(de::Error::custom(format!("duplicate term key `{key}`")));
            }
            term.validate().map_err(|err| {
                de::Error::custom(format!("invalid term `{key}`: {err}"))
            })?;
            collection.upsert(term);
        }
        Ok(collection)
    }
}

/// `terms` map entries in document order.
struct OrderedTerms(Vec<(String, Term)>);

impl<'de> Deserialize<'de> for OrderedTerms {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedTermsVisitor;

        impl<'de> Visitor<'de> for OrderedTermsVisitor {
            type Value = OrderedTerms;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of term id to term record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Term>()? {
                    entries.push(entry);
                }
                Ok(OrderedTerms(entries))
            }
        }

        deserializer.deserialize_map(OrderedTermsVisitor)
    }
}

/// Reads the document at `path`.
///
/// Returns `Ok(None)` when no document exists yet.
///
/// # Errors
///
/// Fails when the file cannot be read or does not hold a valid document.
pub fn read(path: &Path) -> Result<Option<TermCollection>, GlossaryError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(GlossaryError::io(path, source)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| GlossaryError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Replaces the document at `path` with `collection`.
///
/// # Errors
///
/// Fails when the document or its temporary sibling cannot be written.
pub fn write(path: &Path, collection: &TermCollection) -> Result<(), GlossaryError> {
    let content = encode(path, collection)?;
    replace(path, &content)
}

/// Renders `collection` as the pretty-printed document body.
///
/// # Errors
///
/// Fails when a term cannot be serialized.
pub fn encode(path: &Path, collection: &TermCollection) -> Result<Vec<u8>, GlossaryError> {
    let mut content = serde_json::to_vec_pretty(collection).map_err(|source| {
        GlossaryError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;
    content.push(b'\n');
    Ok(content)
}

/// Atomically replaces the file at `path` with `content`.
///
/// # Errors
///
/// Fails when the parent directory, the temporary sibling or the rename fails.
pub fn replace(path: &Path, content: &[u8]) -> Result<(), GlossaryError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| GlossaryError::io(parent, source))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    {
        let mut file = File::create(&tmp_path).map_err(|source| GlossaryError::io(&tmp_path, source))?;
        file.write_all(content)
            .and_then(|()| file.sync_all())
            .map_err(|source| GlossaryError::io(&tmp_path, source))?;
    }
    fs::rename(&tmp_path, path).map_err(|source| {
        let _ = fs::remove_file(&tmp_path);
        GlossaryError::io(path, source)
    })
}

#[cfg(test)]
mod tests {
    use super::{read, write, TermCollection};
    use crate::glossary::{
        entities::{Relation, RelationType, TermInput},
        service::GlossaryError,
        value_objects::TermId,
    };

    fn collection(names: &[&str]) -> TermCollection {
        let mut collection = TermCollection::new();
        for name in names {
            let input = TermInput::new(*name, format!("{name} definition"));
            collection.upsert(input.clone().into_term(input.derive_id()));
        }
        collection
    }

    fn ids(collection: &TermCollection) -> Vec<&str> {
        collection.iter().map(|term| term.id.as_str()).collect()
    }

    #[test]
    fn upsert_keeps_position_of_replaced_record() {
        let mut terms = collection(&["Zeta", "Alpha", "Mu"]);
        let replaced = terms.upsert(TermInput::new("Alpha", "v2").into_term(TermId::new("alpha")));
        assert_eq!(replaced.map(|term| term.definition), Some("Alpha definition".to_string()));
        assert_eq!(ids(&terms), vec!["zeta", "alpha", "mu"]);
        assert_eq!(terms.get("alpha").map(|term| term.definition.as_str()), Some("v2"));
    }

    #[test]
    fn remove_reindexes_following_records() {
        let mut terms = collection(&["A", "B", "C", "D"]);
        assert!(terms.remove("b").is_some());
        assert!(terms.remove("b").is_none());
        assert_eq!(ids(&terms), vec!["a", "c", "d"]);
        assert_eq!(terms.get("d").map(|term| term.term.as_str()), Some("D"));
        assert_eq!(terms.get("c").map(|term| term.term.as_str()), Some("C"));
    }

    #[test]
    fn window_clamps_out_of_range_bounds() {
        let terms = collection(&["A", "B", "C"]);
        assert_eq!(terms.window(1, 10).len(), 2);
        assert!(terms.window(3, 10).is_empty());
        assert!(terms.window(usize::MAX, usize::MAX).is_empty());
    }

    #[test]
    fn serializes_in_insertion_order() {
        let terms = collection(&["Zeta", "Alpha"]);
        let json = serde_json::to_string(&terms).expect("serialize");
        let zeta = json.find("\"zeta\":").expect("zeta key");
        let alpha = json.find("\"alpha\":").expect("alpha key");
        assert!(zeta < alpha);
    }

    #[test]
    fn reads_document_order_and_optional_fields() {
        let json = r#"{
            "terms": {
                "strategy": {
                    "id": "strategy",
                    "term": "Strategy",
                    "definition": "Interchangeable algorithms",
                    "category": "Behavioral",
                    "relations": [
                        {"target_term_id": "gof_patterns", "relation_type": "является частью", "description": null}
                    ]
                },
                "adapter": {"id": "adapter", "term": "Adapter", "definition": "Converts interfaces"}
            }
        }"#;
        let terms: TermCollection = serde_json::from_str(json).expect("document");
        assert_eq!(ids(&terms), vec!["strategy", "adapter"]);
        let strategy = terms.get("strategy").expect("strategy");
        assert_eq!(
            strategy.relations,
            vec![Relation::new("gof_patterns", RelationType::IsPartOf)]
        );
        let adapter = terms.get("adapter").expect("adapter");
        assert_eq!(adapter.category, None);
        assert!(adapter.relations.is_empty());
    }

    #[test]
    fn rejects_key_that_differs_from_id() {
        let json = r#"{"terms": {"a": {"id": "b", "term": "B", "definition": "d"}}}"#;
        let err = serde_json::from_str::<TermCollection>(json).expect_err("mismatch");
        assert!(err.to_string().contains("declares id `b`"));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let json = r#"{"terms": {
            "a": {"id": "a", "term": "A", "definition": "one"},
            "a": {"id": "a", "term": "A", "definition": "two"}
        }}"#;
        let err = serde_json::from_str::<TermCollection>(json).expect_err("duplicate");
        assert!(err.to_string().contains("duplicate term key `a`"));
    }

    #[test]
    fn rejects_records_failing_validation() {
        let json = r#"{"terms": {"a": {"id": "a", "term": "", "definition": "d"}}}"#;
        assert!(serde_json::from_str::<TermCollection>(json).is_err());
        let json = r#"{"terms": {"a": {"id": "a", "term": "A"}}}"#;
        assert!(serde_json::from_str::<TermCollection>(json).is_err());
        let json = r#"{"terms": {"a": {"id": "a", "term": "A", "definition": "d",
            "relations": [{"target_term_id": "b", "relation_type": "knows"}]}}}"#;
        assert!(serde_json::from_str::<TermCollection>(json).is_err());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("glossary.json");
        assert!(read(&path).expect("missing document").is_none());

        let mut terms = collection(&["Observer", "Singleton"]);
        terms.upsert(
            TermInput::new("Facade", "Simplified interface")
                .with_category("Structural")
                .with_relation(
                    Relation::new("subsystem", RelationType::Includes).with_description("wraps"),
                )
                .into_term(TermId::new("facade")),
        );
        write(&path, &terms).expect("write");

        let reloaded = read(&path).expect("read").expect("document exists");
        assert_eq!(reloaded, terms);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_file_is_reported_with_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("glossary.json");
        std::fs::write(&path, "{\"terms\": [").expect("write");
        let err = read(&path).expect_err("malformed");
        assert!(matches!(err, GlossaryError::Malformed { path: ref p, .. } if *p == path));
    }
}
