use serde::ser::{Serialize, SerializeMap, Serializer};

/// Scalar diagnostic value attached to a detail key.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum DetailValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl From<&str> for DetailValue {
    fn from(v: &str) -> Self {
        DetailValue::Str(v.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(v: String) -> Self {
        DetailValue::Str(v)
    }
}

impl From<i64> for DetailValue {
    fn from(v: i64) -> Self {
        DetailValue::Int(v)
    }
}

impl From<bool> for DetailValue {
    fn from(v: bool) -> Self {
        DetailValue::Bool(v)
    }
}

impl<T: Into<DetailValue>> From<Option<T>> for DetailValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(DetailValue::Null)
    }
}

/// Insertion-ordered map with unique keys.
///
/// Re-inserting a key replaces its value but keeps the original position, so
/// the serialized order only depends on the first time each key was written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Details {
    entries: Vec<(String, DetailValue)>,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DetailValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DetailValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_insertion_position_on_overwrite() {
        let mut d = Details::new();
        d.insert("b", 1i64);
        d.insert("a", "x");
        d.insert("b", true);
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(d.get("b"), Some(&DetailValue::Bool(true)));
        assert_eq!(serde_json::to_string(&d).unwrap(), r#"{"b":true,"a":"x"}"#);
    }

    #[test]
    fn absent_values_serialize_as_null() {
        let mut d = Details::new();
        d.insert("cache_hit", None::<bool>);
        d.insert("provenance_commit", Some("abc"));
        assert_eq!(
            serde_json::to_string(&d).unwrap(),
            r#"{"cache_hit":null,"provenance_commit":"abc"}"#
        );
    }
}
