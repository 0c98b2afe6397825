//! Schema-less key/value documents.
//!
//! House rules, position metadata and resource snapshots are free-form JSON
//! objects written by other subsystems. Heuristics only ever look up a handful
//! of optional keys, so the document exposes typed accessors that return
//! `None` for a missing key or a value of the wrong shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Integer value; floats with no fractional part are accepted too.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key)?.as_bool()
    }

    /// True only when the key holds the boolean `true`.
    pub fn flag(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or(false)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key)?.as_str()
    }

    /// Nested object as a document.
    pub fn get_document(&self, key: &str) -> Option<Document> {
        match self.0.get(key)? {
            Value::Object(map) => Some(Document(map.clone())),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_accessors_ignore_wrong_shapes() {
        let doc = Document::try_from(json!({
            "priority": 2,
            "spell_level": 3.0,
            "used_cover": true,
            "note": "flank",
            "ratio": 0.5,
        }))
        .unwrap();

        assert_eq!(doc.get_i64("priority"), Some(2));
        assert_eq!(doc.get_i64("spell_level"), Some(3));
        assert_eq!(doc.get_i64("ratio"), None);
        assert_eq!(doc.get_i64("note"), None);
        assert_eq!(doc.get_i64("missing"), None);
        assert!(doc.flag("used_cover"));
        assert!(!doc.flag("note"));
        assert_eq!(doc.get_str("note"), Some("flank"));
    }

    #[test]
    fn nested_documents() {
        let doc = Document::new().with("spell_slots_remaining", json!({"3": 1, "1": 0}));
        let slots = doc.get_document("spell_slots_remaining").unwrap();
        assert_eq!(slots.get_i64("3"), Some(1));
        assert!(doc.get_document("missing").is_none());
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(Document::try_from(json!([1, 2])).is_err());
    }

    #[test]
    fn serializes_as_plain_object() {
        let doc = Document::new().with("priority", 1);
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({"priority": 1}));
    }
}
