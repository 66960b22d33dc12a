//! Turns JSON:API resource documents into renderable records.

use serde_json::{Map, Value};
use terrapin_output::Record;

use crate::error::ParseError;

/// Leading record key holding the resource identifier.
pub const ID_KEY: &str = "ID";
/// Leading record key holding the resource type.
pub const TYPE_KEY: &str = "Type";

/// Whether `data` held one resource or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// `data` was a single resource object.
    Single,
    /// `data` was an array of resource objects.
    Collection,
}

/// Records parsed from a JSON:API `data` member, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourcePayload {
    shape: PayloadShape,
    records: Vec<Record>,
}

impl ResourcePayload {
    /// Shape of the `data` member.
    #[must_use]
    pub const fn shape(&self) -> PayloadShape {
        self.shape
    }

    /// Parsed records.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take ownership of the parsed records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Parse a response body into records.
///
/// # Errors
///
/// Returns a [`ParseError`] when the body is not a JSON:API resource document.
pub fn parse_api_response(body: &[u8]) -> Result<ResourcePayload, ParseError> {
    let document: Value =
        serde_json::from_slice(body).map_err(|source| ParseError::InvalidJson { source })?;
    parse_document(&document)
}

/// Parse an already-decoded JSON document into records.
///
/// Each record starts with `ID` and `Type`, followed by the resource's
/// attributes in wire order and wire spelling.
///
/// # Errors
///
/// Returns a [`ParseError`] when the document is not a JSON:API resource document.
pub fn parse_document(document: &Value) -> Result<ResourcePayload, ParseError> {
    let object = document.as_object().ok_or(ParseError::NotAnObject)?;
    let data = object.get("data").ok_or(ParseError::MissingData)?;

    match data {
        Value::Object(resource) => Ok(ResourcePayload {
            shape: PayloadShape::Single,
            records: vec![resource_record(0, resource)?],
        }),
        Value::Array(resources) => {
            let records = resources
                .iter()
                .enumerate()
                .map(|(index, resource)| {
                    resource
                        .as_object()
                        .ok_or(ParseError::ResourceNotObject { index })
                        .and_then(|resource| resource_record(index, resource))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResourcePayload {
                shape: PayloadShape::Collection,
                records,
            })
        }
        other => Err(ParseError::UnexpectedData {
            found: json_kind(other),
        }),
    }
}

fn resource_record(index: usize, resource: &Map<String, Value>) -> Result<Record, ParseError> {
    let id = required_member(index, resource, "id")?;
    let kind = required_member(index, resource, "type")?;

    let mut record = Record::new();
    let conflict = |source| ParseError::ConflictingField { index, source };
    record.append(ID_KEY, id.clone()).map_err(conflict)?;
    record.append(TYPE_KEY, kind.clone()).map_err(conflict)?;

    match resource.get("attributes") {
        None | Some(Value::Null) => {}
        Some(Value::Object(attributes)) => {
            for (key, value) in attributes {
                record.append(key.as_str(), value.clone()).map_err(conflict)?;
            }
        }
        Some(_) => return Err(ParseError::AttributesNotObject { index }),
    }
    Ok(record)
}

fn required_member<'a>(
    index: usize,
    resource: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, ParseError> {
    match resource.get(field) {
        None | Some(Value::Null) => Err(ParseError::MissingField { index, field }),
        Some(value) => Ok(value),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
