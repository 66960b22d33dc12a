//! Ordered key/value container shared by the parser and the renderers.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;
use serde_json::Value;

use crate::error::RecordError;

/// An ordered set of uniquely keyed values describing one renderable entity.
///
/// Insertion order is the rendering order in every output mode; nothing in this
/// crate sorts or reorders a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, Value>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DuplicateKey`] if a key appears more than once.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = Self::new();
        for (key, value) in pairs {
            record.append(key, value)?;
        }
        Ok(record)
    }

    /// Append a pair to the end of the record.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DuplicateKey`] if the key is already present; the
    /// record is left unchanged.
    pub fn append(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), RecordError> {
        match self.fields.entry(key.into()) {
            Entry::Occupied(entry) => Err(RecordError::DuplicateKey {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(value.into());
                Ok(())
            }
        }
    }

    /// Look up a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Iterate over pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_preserves_insertion_order() -> Result<(), RecordError> {
        let mut record = Record::new();
        record.append("zeta", "last letter")?;
        record.append("alpha", 1)?;
        record.append("mid", true)?;

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
        assert_eq!(record.len(), 3);
        Ok(())
    }

    #[test]
    fn append_rejects_duplicates_without_mutating() -> Result<(), RecordError> {
        let mut record = Record::from_pairs([("name", "first")])?;
        let err = record.append("name", "second").unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateKey {
                key: "name".to_string()
            }
        );
        assert_eq!(record.get("name"), Some(&json!("first")));
        assert_eq!(record.len(), 1);
        Ok(())
    }

    #[test]
    fn from_pairs_rejects_duplicates() {
        let result = Record::from_pairs([("a", 1), ("b", 2), ("a", 3)]);
        assert!(matches!(result, Err(RecordError::DuplicateKey { key }) if key == "a"));
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let record = Record::new();
        assert!(record.get("missing").is_none());
        assert!(record.is_empty());
    }

    #[test]
    fn serializes_in_insertion_order() -> Result<(), Box<dyn std::error::Error>> {
        let record = Record::from_pairs([("z", json!(1)), ("a", json!("two")), ("m", json!(null))])?;
        let text = serde_json::to_string(&record)?;
        assert_eq!(text, r#"{"z":1,"a":"two","m":null}"#);
        Ok(())
    }
}
