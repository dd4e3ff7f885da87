//! The generic bank: an insertion-ordered, name-keyed collection of records.
//!
//! A bank is built once from a JSON document whose top-level keys are script
//! names. The document as a whole must be an object, but individual entries
//! are decoded leniently: a malformed entry is logged and skipped rather than
//! failing the load.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use cwjson::{JsonReader, type_name};
use indexmap::IndexMap;
use serde_json::Value;

use crate::common::Identified;
use crate::error::BankError;
use crate::turn_order::ArmyId;

/// Position of a record within its bank.
///
/// Resolved cross references are stored as indices rather than pointers, so
/// the record graph never owns itself.
pub struct BankIndex<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BankIndex<T> {
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// The raw position.
    pub fn get(self) -> usize {
        self.index
    }
}

impl<T> Clone for BankIndex<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BankIndex<T> {}

impl<T> PartialEq for BankIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for BankIndex<T> {}

impl<T> Hash for BankIndex<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for BankIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BankIndex({})", self.index)
    }
}

/// State threaded through a single bank load.
///
/// A fresh context is created for every load, so counters never carry over
/// from a previous data set.
#[derive(Debug, Default)]
pub struct LoadContext {
    turn_order_counter: u32,
}

impl LoadContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out the next turn order ID in load order.
    pub fn next_turn_order(&mut self) -> ArmyId {
        let id = ArmyId(self.turn_order_counter);
        self.turn_order_counter = self.turn_order_counter.saturating_add(1);
        id
    }
}

/// A record type that can be stored in a [`Bank`].
pub trait BankRecord: Identified + Sized {
    /// Name of the bank, used in logs and errors.
    const BANK_NAME: &'static str;

    /// Decodes one entry. Never fails: faulty fields keep their defaults.
    fn from_json(script_name: &str, json: &JsonReader<'_>, ctx: &mut LoadContext) -> Self;
}

/// Insertion-ordered map from script name to an immutably shared record.
#[derive(Debug)]
pub struct Bank<T> {
    entries: IndexMap<String, Arc<T>>,
}

impl<T> Default for Bank<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Clone for Bank<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: BankRecord> Bank<T> {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bank from an already parsed document.
    pub fn from_value(root: &Value) -> Result<Self, BankError> {
        let Some(object) = root.as_object() else {
            return Err(BankError::NotAnObject {
                bank: T::BANK_NAME,
                found: type_name(root),
            });
        };

        let mut ctx = LoadContext::new();
        let mut entries = IndexMap::with_capacity(object.len());
        for (script_name, entry) in object {
            if !entry.is_object() {
                log::warn!(
                    "{}.{}: entry is of type {}, expected object; skipping it",
                    T::BANK_NAME,
                    script_name,
                    type_name(entry)
                );
                continue;
            }
            let context = format!("{}.{}", T::BANK_NAME, script_name);
            let record = T::from_json(script_name, &JsonReader::new(entry, &context), &mut ctx);
            entries.insert(script_name.clone(), Arc::new(record));
        }

        log::info!("Loaded {} {}", entries.len(), T::BANK_NAME);
        Ok(Self { entries })
    }

    /// Parses `text` and builds a bank from it.
    pub fn from_json_str(text: &str) -> Result<Self, BankError> {
        let root: Value = serde_json::from_str(text).map_err(|source| BankError::Json {
            origin: format!("inline {} document", T::BANK_NAME),
            source,
        })?;
        Self::from_value(&root)
    }

    /// Reads and parses the document at `path`.
    pub fn load(path: &Path) -> Result<Self, BankError> {
        let text = std::fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root: Value = serde_json::from_str(&text).map_err(|source| BankError::Json {
            origin: path.display().to_string(),
            source,
        })?;
        Self::from_value(&root)
    }

    /// Looks up an entry that is allowed to be missing.
    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.entries.get(name)
    }

    /// Looks up an entry that must exist.
    ///
    /// Once a data set is loaded it is considered closed, so a miss here is a
    /// caller bug: it is logged as an error and returned as
    /// [`BankError::NotFound`].
    pub fn require(&self, name: &str) -> Result<&Arc<T>, BankError> {
        self.entries.get(name).ok_or_else(|| {
            log::error!(
                "Attempted to access non-existent {} entry \"{}\"",
                T::BANK_NAME,
                name
            );
            BankError::NotFound {
                bank: T::BANK_NAME,
                name: name.to_owned(),
            }
        })
    }

    /// Index of the entry named `name`.
    pub fn index_of(&self, name: &str) -> Option<BankIndex<T>> {
        self.entries.get_index_of(name).map(BankIndex::new)
    }

    /// Entry at `index`.
    pub fn at(&self, index: BankIndex<T>) -> Option<&Arc<T>> {
        self.entries.get_index(index.get()).map(|(_, record)| record)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Script names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(script name, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// `(index, record)` pairs in insertion order.
    pub fn indexed(&self) -> impl Iterator<Item = (BankIndex<T>, &Arc<T>)> {
        self.entries
            .values()
            .enumerate()
            .map(|(i, record)| (BankIndex::new(i), record))
    }
}

impl<'a, T> IntoIterator for &'a Bank<T> {
    type Item = (&'a String, &'a Arc<T>);
    type IntoIter = indexmap::map::Iter<'a, String, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement_types::MovementType;
    use serde_json::json;

    #[test]
    fn test_insertion_order_is_kept() {
        let bank = Bank::<MovementType>::from_value(&json!({
            "Treads": {},
            "Infantry": {},
            "Air": { "longname": "air" },
        }))
        .unwrap();

        assert_eq!(bank.len(), 3);
        assert_eq!(
            bank.names().collect::<Vec<_>>(),
            vec!["Treads", "Infantry", "Air"]
        );
        assert_eq!(bank.index_of("Air").map(BankIndex::get), Some(2));
        let air = bank.at(BankIndex::new(2)).unwrap();
        assert_eq!(air.script_name(), "Air");
    }

    #[test]
    fn test_iteration_is_restartable() {
        let bank = Bank::<MovementType>::from_value(&json!({ "A": {}, "B": {} })).unwrap();
        let first: Vec<_> = bank.iter().map(|(name, _)| name).collect();
        let second: Vec<_> = (&bank).into_iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_root_must_be_an_object() {
        let err = Bank::<MovementType>::from_value(&json!(["Treads"])).unwrap_err();
        assert!(matches!(
            err,
            BankError::NotAnObject {
                bank: "movement types",
                found: "array"
            }
        ));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let bank =
            Bank::<MovementType>::from_value(&json!({ "A": {}, "B": 5, "C": {} })).unwrap();
        assert_eq!(bank.names().collect::<Vec<_>>(), vec!["A", "C"]);
    }

    #[test]
    fn test_require_reports_missing_entries() {
        let bank = Bank::<MovementType>::from_value(&json!({ "A": {} })).unwrap();
        assert!(bank.require("A").is_ok());
        assert!(bank.get("B").is_none());
        let err = bank.require("B").unwrap_err();
        assert_eq!(
            err.to_string(),
            "The movement types bank has no entry named \"B\""
        );
    }

    #[test]
    fn test_malformed_document() {
        let err = Bank::<MovementType>::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, BankError::Json { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movement.json");
        std::fs::write(&path, r#"{ "Foot": {}, "Wheels": {} }"#).unwrap();
        let bank = Bank::<MovementType>::load(&path).unwrap();
        assert!(bank.contains("Wheels"));

        let err = Bank::<MovementType>::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BankError::Io { .. }));
    }
}
