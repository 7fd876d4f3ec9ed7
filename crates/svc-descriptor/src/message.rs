//! # Message Descriptors
//!
//! A [`MessageDescriptor`] lists the fields of a plain data record in
//! declaration order. Each field is either a primitive or a nested message,
//! optionally repeated as an ordered array.
//!
//! ## Parsing Rules
//!
//! - Keys not declared by the descriptor are dropped.
//! - A declared key whose value has the wrong type is left absent.
//! - `null` is the same as absent.
//! - An array field whose wire value is not an array parses as an empty array.
//!   Ill-typed elements inside an array are dropped; the order of the rest is kept.
//!
//! Serialization walks the descriptor in declaration order and emits only the
//! fields that carry a value, so `parse(serialize(v)) == v` for any value built
//! through its declared fields.

use crate::errors::DescriptorError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

// =============================================================================
// FIELD TYPES
// =============================================================================

/// Wire/runtime representation of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// JSON string.
    String,
    /// Any JSON number.
    Number,
    /// JSON number without a fractional part that fits in an `i64`.
    Integer,
    /// JSON `true` / `false`.
    Boolean,
}

impl PrimitiveType {
    /// Returns true if `value` is a well-typed instance of this primitive.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Number => value.is_number(),
            PrimitiveType::Integer => value.is_i64(),
            PrimitiveType::Boolean => value.is_boolean(),
        }
    }
}

/// The type carried by a single field: a primitive or a nested message.
#[derive(Debug, Clone, Copy)]
pub enum FieldType {
    Primitive(PrimitiveType),
    Message(&'static MessageDescriptor),
}

/// One field of a message.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Wire name, unique within the message.
    pub name: &'static str,
    /// Element type.
    pub field_type: FieldType,
    /// Whether the field is an ordered sequence of `field_type`.
    pub is_array: bool,
}

impl FieldSpec {
    /// A single primitive field.
    pub const fn primitive(name: &'static str, primitive: PrimitiveType) -> Self {
        Self {
            name,
            field_type: FieldType::Primitive(primitive),
            is_array: false,
        }
    }

    /// A single nested message field.
    pub const fn message(name: &'static str, descriptor: &'static MessageDescriptor) -> Self {
        Self {
            name,
            field_type: FieldType::Message(descriptor),
            is_array: false,
        }
    }

    /// Marks the field as an array of its element type.
    pub const fn array(self) -> Self {
        Self {
            is_array: true,
            ..self
        }
    }
}

// =============================================================================
// MESSAGE DESCRIPTOR
// =============================================================================

/// Reflective schema of a message: its name and ordered fields.
///
/// Descriptors are declared as `static` values and live for the whole process.
#[derive(Debug)]
pub struct MessageDescriptor {
    /// Globally unique message name, used in diagnostics.
    pub name: &'static str,
    /// Fields in declaration order.
    pub fields: &'static [FieldSpec],
}

impl MessageDescriptor {
    /// Looks up a declared field by wire name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns the first field name declared more than once, if any.
    pub fn duplicate_field(&self) -> Option<&'static str> {
        self.fields.iter().enumerate().find_map(|(index, field)| {
            self.fields[..index]
                .iter()
                .any(|earlier| earlier.name == field.name)
                .then_some(field.name)
        })
    }
}

/// A Rust type paired with its descriptor.
///
/// `Default` is the factory for an empty instance: every field absent.
/// Implementors are expected to use `Option` for every field and
/// `#[serde(rename_all = "camelCase")]` (or explicit renames) so that serde's
/// field names match the descriptor's wire names.
pub trait Message: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// The descriptor for this message type.
    fn descriptor() -> &'static MessageDescriptor;
}

// =============================================================================
// UNTYPED PARSE / SERIALIZE
// =============================================================================

/// Parses a loosely-typed value through `descriptor`.
///
/// Never fails: anything that does not match the descriptor is dropped. A
/// non-object input yields an empty message.
pub fn parse_value(descriptor: &MessageDescriptor, raw: &Value) -> Map<String, Value> {
    match raw.as_object() {
        Some(object) => project(descriptor, object),
        None => Map::new(),
    }
}

/// Serializes a message value through `descriptor`, emitting only present
/// fields in declaration order.
pub fn serialize_value(descriptor: &MessageDescriptor, value: &Value) -> Value {
    Value::Object(parse_value(descriptor, value))
}

fn project(descriptor: &MessageDescriptor, object: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(descriptor.fields.len());
    for field in descriptor.fields {
        let value = match object.get(field.name) {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };

        if field.is_array {
            let items = value
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| project_element(&field.field_type, item))
                        .collect()
                })
                .unwrap_or_default();
            out.insert(field.name.to_string(), Value::Array(items));
        } else if let Some(parsed) = project_element(&field.field_type, value) {
            out.insert(field.name.to_string(), parsed);
        }
    }
    out
}

fn project_element(field_type: &FieldType, value: &Value) -> Option<Value> {
    match field_type {
        FieldType::Primitive(primitive) => primitive.accepts(value).then(|| value.clone()),
        FieldType::Message(nested) => value
            .as_object()
            .map(|object| Value::Object(project(nested, object))),
    }
}

// =============================================================================
// TYPED PARSE / SERIALIZE
// =============================================================================

/// Parses a raw value into `T` through `T`'s descriptor.
pub fn parse_message<T: Message>(raw: &Value) -> Result<T, DescriptorError> {
    let descriptor = T::descriptor();
    serde_json::from_value(Value::Object(parse_value(descriptor, raw))).map_err(|source| {
        DescriptorError::Shape {
            message: descriptor.name,
            source,
        }
    })
}

/// Serializes `message` through its descriptor.
pub fn serialize_message<T: Message>(message: &T) -> Result<Value, DescriptorError> {
    let descriptor = T::descriptor();
    let raw = serde_json::to_value(message).map_err(|source| DescriptorError::Serialize {
        message: descriptor.name,
        source,
    })?;
    Ok(serialize_value(descriptor, &raw))
}
