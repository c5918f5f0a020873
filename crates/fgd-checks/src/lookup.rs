use std::fmt;

use regex::Regex;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use tracing::debug;

/// Tolerant single-field extraction from a small JSON record.
///
/// The record is parsed with serde_json and the target key is looked up in
/// the root object, then depth-first through nested values in document order.
/// If the record is not strict JSON (trailing comma, comment, a broken
/// unrelated field) the key is located by scanning for its literal
/// `"key": <token>` pair instead. On both paths the first occurrence of a key
/// wins and a value of the wrong type reads as absent.
pub struct FieldLookup {
    text: String,
    doc: Option<Value>,
}

impl FieldLookup {
    pub fn parse(text: &str) -> Self {
        let doc = match serde_json::from_str::<FirstWins>(text) {
            Ok(FirstWins(doc)) => Some(doc),
            Err(e) => {
                debug!(error = %e, "record is not strict JSON, scanning for keys");
                None
            }
        };
        Self {
            text: text.to_string(),
            doc,
        }
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        match &self.doc {
            Some(doc) => find_key(doc, key).and_then(Value::as_bool),
            None => scan(&self.text, key, r"(?i:true|false)\b").map(|t| t.eq_ignore_ascii_case("true")),
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match &self.doc {
            Some(doc) => find_key(doc, key).and_then(Value::as_str),
            None => scan(&self.text, key, r#""([^"]*)""#),
        }
    }
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|child| find_key(child, key))),
        Value::Array(items) => items.iter().find_map(|child| find_key(child, key)),
        _ => None,
    }
}

/// First `"key": <value>` in `text`. With a capture group in `value` the
/// group is returned, otherwise the whole value match.
fn scan<'t>(text: &'t str, key: &str, value: &str) -> Option<&'t str> {
    let re = Regex::new(&format!(r#""{}"\s*:\s*({})"#, regex::escape(key), value)).ok()?;
    let caps = re.captures(text)?;
    caps.get(2).or_else(|| caps.get(1)).map(|m| m.as_str())
}

/// JSON value whose objects keep the first of any duplicated keys.
struct FirstWins(Value);

impl<'de> Deserialize<'de> for FirstWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FirstWinsVisitor).map(FirstWins)
    }
}

struct FirstWinsVisitor;

impl<'de> Visitor<'de> for FirstWinsVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(serde_json::Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(FirstWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut out = serde_json::Map::new();
        while let Some((key, FirstWins(value))) = map.next_entry::<String, FirstWins>()? {
            out.entry(key).or_insert(value);
        }
        Ok(Value::Object(out))
    }
}
