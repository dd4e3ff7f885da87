//! A defensive reader for object-rooted JSON game data.
//!
//! Game data is authored by hand, so a missing or mistyped field should never
//! stop a whole document from loading. [`JsonReader`] looks values up by key
//! sequence, converts them through [`FromJson`], and on failure leaves the
//! caller's default untouched and logs what went wrong.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

pub mod error;
pub mod value;

pub use error::FieldError;
pub use value::{FromJson, Rejection, type_name};

/// A sequence of object keys leading from a document root to a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Builds a path from a key sequence.
    pub fn new(keys: &[&str]) -> Self {
        KeyPath(keys.iter().map(|k| (*k).to_owned()).collect())
    }

    /// Returns a new path with `key` appended.
    pub fn join(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.to_owned());
        KeyPath(keys)
    }
}

impl fmt::Display for KeyPath {
    /// Renders as `{"root", "tile"}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "\"{}\"", key)?;
        }
        write!(f, "}}")
    }
}

/// Reads typed fields out of a JSON value, logging instead of failing.
///
/// `context` is prepended to every log message, e.g. `terrains.Plains`.
#[derive(Debug, Clone, Copy)]
pub struct JsonReader<'a> {
    value: &'a Value,
    context: &'a str,
}

impl<'a> JsonReader<'a> {
    pub fn new(value: &'a Value, context: &'a str) -> Self {
        Self { value, context }
    }

    /// The value this reader wraps.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// The log context this reader was created with.
    pub fn context(&self) -> &'a str {
        self.context
    }

    /// Follows `keys` through nested objects.
    pub fn lookup(&self, keys: &[&str]) -> Option<&'a Value> {
        if keys.is_empty() {
            return None;
        }
        let mut current = self.value;
        for key in keys {
            current = current.as_object()?.get(*key)?;
        }
        Some(current)
    }

    /// Converts the value at `keys`.
    pub fn read<T: FromJson>(&self, keys: &[&str]) -> Result<T, FieldError> {
        let Some(found) = self.lookup(keys) else {
            return Err(FieldError::Missing {
                path: KeyPath::new(keys),
            });
        };
        T::from_json(found).map_err(|rejection| match rejection {
            Rejection::WrongType => FieldError::TypeMismatch {
                path: KeyPath::new(keys),
                expected: T::EXPECTED,
                found: type_name(found),
            },
            Rejection::OutOfRange => FieldError::OutOfRange {
                path: KeyPath::new(keys),
                value: found.to_string(),
            },
        })
    }

    /// Reads a field that data authors must provide.
    ///
    /// On any failure `dest` keeps its current value and a warning is logged.
    /// Returns `true` if `dest` was overwritten.
    pub fn required<T: FromJson>(&self, dest: &mut T, keys: &[&str]) -> bool {
        match self.read(keys) {
            Ok(v) => {
                *dest = v;
                true
            }
            Err(e) => {
                log::warn!("{}: {}; keeping the default", self.context, e);
                false
            }
        }
    }

    /// Reads a field that may be left out.
    ///
    /// Absence is silent; a value of the wrong type is logged.
    pub fn optional<T: FromJson>(&self, dest: &mut T, keys: &[&str]) -> bool {
        match self.read(keys) {
            Ok(v) => {
                *dest = v;
                true
            }
            Err(e) if e.is_missing() => false,
            Err(e) => {
                log::warn!("{}: {}; keeping the default", self.context, e);
                false
            }
        }
    }

    /// Reads an optional field into an `Option`, `None` when absent or faulty.
    pub fn maybe<T: FromJson>(&self, keys: &[&str]) -> Option<T> {
        match self.read(keys) {
            Ok(v) => Some(v),
            Err(e) if e.is_missing() => None,
            Err(e) => {
                log::warn!("{}: {}; ignoring it", self.context, e);
                None
            }
        }
    }

    /// Reads an optional object whose values all share a type.
    ///
    /// Entries of the wrong type are logged and skipped, the rest are
    /// inserted into `dest`. Returns the number of entries inserted.
    pub fn map<T: FromJson>(&self, dest: &mut HashMap<String, T>, keys: &[&str]) -> usize {
        let Some(found) = self.lookup(keys) else {
            return 0;
        };
        let Some(object) = found.as_object() else {
            log::warn!(
                "{}: value at {} is of type {}, expected object; ignoring it",
                self.context,
                KeyPath::new(keys),
                type_name(found)
            );
            return 0;
        };
        let path = KeyPath::new(keys);
        let mut inserted = 0;
        for (key, entry) in object {
            match T::from_json(entry) {
                Ok(v) => {
                    dest.insert(key.clone(), v);
                    inserted += 1;
                }
                Err(_) => log::warn!(
                    "{}: value at {} is of type {}, expected {}; skipping it",
                    self.context,
                    path.join(key),
                    type_name(entry),
                    T::EXPECTED
                ),
            }
        }
        inserted
    }

    /// Reads an optional array whose elements all share a type.
    ///
    /// Elements of the wrong type are logged and skipped. Returns the number of
    /// elements appended to `dest`.
    pub fn list<T: FromJson>(&self, dest: &mut Vec<T>, keys: &[&str]) -> usize {
        let Some(found) = self.lookup(keys) else {
            return 0;
        };
        let Some(array) = found.as_array() else {
            log::warn!(
                "{}: value at {} is of type {}, expected array; ignoring it",
                self.context,
                KeyPath::new(keys),
                type_name(found)
            );
            return 0;
        };
        let before = dest.len();
        for (i, element) in array.iter().enumerate() {
            match T::from_json(element) {
                Ok(v) => dest.push(v),
                Err(_) => log::warn!(
                    "{}: element {} of {} is of type {}, expected {}; skipping it",
                    self.context,
                    i,
                    KeyPath::new(keys),
                    type_name(element),
                    T::EXPECTED
                ),
            }
        }
        dest.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_path_display() {
        assert_eq!(KeyPath::new(&["root", "tile"]).to_string(), r#"{"root", "tile"}"#);
        assert_eq!(KeyPath::default().to_string(), "{}");
    }

    #[test]
    fn test_lookup_nested() {
        let doc = json!({ "root": { "tile": "HQ" } });
        let reader = JsonReader::new(&doc, "structures.HQ");
        assert_eq!(reader.lookup(&["root", "tile"]), Some(&json!("HQ")));
        assert!(reader.lookup(&["root", "deleted"]).is_none());
        assert!(reader.lookup(&[]).is_none());
    }

    #[test]
    fn test_required_keeps_default() {
        let doc = json!({ "hp": "lots" });
        let reader = JsonReader::new(&doc, "terrains.Plains");
        let mut hp = 7u32;
        assert!(!reader.required(&mut hp, &["hp"]));
        assert_eq!(hp, 7);
        assert!(!reader.required(&mut hp, &["defence"]));
        assert_eq!(hp, 7);
    }

    #[test]
    fn test_maybe() {
        let doc = json!({ "primarytiletype": "Plains", "bad": 3 });
        let reader = JsonReader::new(&doc, "terrains.Plains");
        assert_eq!(
            reader.maybe::<String>(&["primarytiletype"]),
            Some("Plains".to_string())
        );
        assert_eq!(reader.maybe::<String>(&["bad"]), None);
        assert_eq!(reader.maybe::<String>(&["absent"]), None);
    }
}
