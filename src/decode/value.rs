use hashbrown::HashMap;
use serde_json::{Map as JsMap, Number, Value as JsValue};

use crate::error::{Error, ErrorKind, Result};

/// A decoded enum occurrence: the schema enum's name and the value string the
/// response carried. Membership in the declared value set is not re-checked
/// at decode time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub enum_type: String,
    pub value: String,
}

/// An ordered association of property names to decoded values with O(1)
/// lookup by name. Duplicate names are rejected at construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordValue {
    entries: Vec<(String, DecodedValue)>,
    index: HashMap<String, usize>,
}

impl RecordValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a property, failing when the name was already inserted.
    pub fn insert(&mut self, name: &str, value: DecodedValue) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(Error::new(
                ErrorKind::MalformedResponse,
                format!("record carries duplicate property \"{name}\""),
            ));
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), value));
        Ok(())
    }

    /// Looks up a property value by name.
    pub fn get(&self, name: &str) -> Option<&DecodedValue> {
        self.index
            .get(name)
            .map(|position| &self.entries[*position].1)
    }

    /// The properties in response order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DecodedValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A runtime value tree shaped by the schema.
///
/// Required positions carry their value directly; nullable positions are
/// always wrapped in `Optional`, so a consumer can distinguish "present" from
/// "absent" without consulting the schema again. Trees are owned, produced
/// fresh per response, and never interned.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Boolean(bool),
    Int(i32),
    Float(f64),
    String(String),
    Enum(EnumValue),
    Record(RecordValue),
    List(Vec<DecodedValue>),
    Optional(Option<Box<DecodedValue>>),
}

impl DecodedValue {
    /// The absent value of a nullable position.
    pub fn absent() -> Self {
        DecodedValue::Optional(None)
    }

    /// A present value of a nullable position.
    pub fn present(value: DecodedValue) -> Self {
        DecodedValue::Optional(Some(Box::new(value)))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Optional(None))
    }

    pub fn as_record(&self) -> Option<&RecordValue> {
        match self {
            DecodedValue::Record(record) => Some(record),
            DecodedValue::Optional(Some(inner)) => inner.as_record(),
            _ => None,
        }
    }

    /// Re-encodes the value tree to JSON. Absent values become `Null`, so a
    /// decoded nullable field round-trips back to the JSON it came from.
    pub fn to_json(&self) -> JsValue {
        match self {
            DecodedValue::Boolean(value) => JsValue::Bool(*value),
            DecodedValue::Int(value) => JsValue::Number((*value).into()),
            DecodedValue::Float(value) => Number::from_f64(*value)
                .map(JsValue::Number)
                .unwrap_or(JsValue::Null),
            DecodedValue::String(value) => JsValue::String(value.clone()),
            DecodedValue::Enum(value) => JsValue::String(value.value.clone()),
            DecodedValue::Record(record) => {
                let mut map = JsMap::new();
                for (name, value) in record.iter() {
                    map.insert(name.to_string(), value.to_json());
                }
                JsValue::Object(map)
            }
            DecodedValue::List(elements) => {
                JsValue::Array(elements.iter().map(DecodedValue::to_json).collect())
            }
            DecodedValue::Optional(None) => JsValue::Null,
            DecodedValue::Optional(Some(inner)) => inner.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_lookup_and_order() {
        let mut record = RecordValue::new();
        record.insert("name", DecodedValue::String("Rex".into())).unwrap();
        record.insert("breed", DecodedValue::String("Lab".into())).unwrap();

        assert_eq!(record.get("name"), Some(&DecodedValue::String("Rex".into())));
        let names: Vec<_> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "breed"]);

        let error = record.insert("name", DecodedValue::absent()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn to_json_round_trip() {
        let mut record = RecordValue::new();
        record.insert("lives", DecodedValue::Int(9)).unwrap();
        record.insert("nickname", DecodedValue::absent()).unwrap();
        record
            .insert(
                "appearsIn",
                DecodedValue::List(vec![DecodedValue::Enum(EnumValue {
                    enum_type: "Episode".into(),
                    value: "EMPIRE".into(),
                })]),
            )
            .unwrap();

        assert_eq!(
            DecodedValue::Record(record).to_json(),
            json!({ "lives": 9, "nickname": null, "appearsIn": ["EMPIRE"] })
        );
    }
}
