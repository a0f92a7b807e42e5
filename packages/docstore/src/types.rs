//! Value objects shared by every document store backend.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};

/// A schemaless document: an ordered map of field name to JSON value.
pub type Document = serde_json::Map<String, Value>;

/// Encode an entity into a document.
///
/// The entity must serialize to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Encode(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Address of a stored document. The id is assigned by the store on create.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    pub collection: String,
    pub id: String,
}

impl DocumentRef {
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            id: id.into(),
        }
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A document as read from the store, together with its reference.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub reference: DocumentRef,
    pub data: Document,
}

impl DocumentSnapshot {
    pub fn new(reference: DocumentRef, data: Document) -> Self {
        Self { reference, data }
    }

    /// Decode the document body into an entity.
    pub fn data_to<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.data.clone()))?)
    }

    /// Read a (possibly dotted) field from the document body.
    pub fn field(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.data, path)
    }
}

/// Comparison applied by a single filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operator {
    /// Field equals the value.
    Equal,
    /// Field is an array containing the value.
    ArrayContains,
    /// Field is an array sharing at least one element with the value array.
    ArrayContainsAny,
}

/// One `(field, operator, value)` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field path; nested fields are separated by dots (`supplierRecord.id`).
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    /// Check the condition against a document body.
    pub fn matches(&self, data: &Document) -> bool {
        let Some(actual) = lookup_path(data, &self.field) else {
            return false;
        };

        match self.operator {
            Operator::Equal => actual == &self.value,
            Operator::ArrayContains => actual
                .as_array()
                .is_some_and(|items| items.contains(&self.value)),
            Operator::ArrayContainsAny => {
                let Some(items) = actual.as_array() else {
                    return false;
                };
                match &self.value {
                    Value::Array(wanted) => wanted.iter().any(|w| items.contains(w)),
                    single => items.contains(single),
                }
            }
        }
    }
}

/// A conjunction of conditions. An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    /// Create a new empty filter (matches all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on `field == value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and_eq(field, value)
    }

    /// Filter on `value` being an element of the array at `field`.
    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().and(field, Operator::ArrayContains, value)
    }

    /// Filter on the array at `field` sharing an element with `values`.
    pub fn array_contains_any<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self::new().and(field, Operator::ArrayContainsAny, Value::Array(values))
    }

    /// Add a condition.
    pub fn and(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        self.conditions.push(Condition {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    /// Add an equality condition.
    pub fn and_eq(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(field, Operator::Equal, value)
    }

    /// True when every condition holds.
    pub fn matches(&self, data: &Document) -> bool {
        self.conditions.iter().all(|c| c.matches(data))
    }
}

/// Resolve a dotted field path inside a document body.
pub fn lookup_path<'a>(data: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = data.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
