//! Model schemas: field specs, validation, and the registration entry point.

use serde::{Deserialize, Serialize};

use crate::codec::TextEncoding;
use crate::error::SchemaError;

/// The codec kind of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldKind {
    String { encoding: TextEncoding },
    Blob,
    Boolean,
    Integer,
    Float,
    Array { inner: Box<FieldSpec> },
}

impl FieldKind {
    /// Name of the kind, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "string",
            FieldKind::Blob => "blob",
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Array { .. } => "array",
        }
    }
}

/// One field's codec description and key marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    kind: FieldKind,
    is_key: bool,
}

impl FieldSpec {
    /// A UTF-8 string field.
    pub fn string() -> Self {
        Self::string_in(TextEncoding::Utf8)
    }

    /// A string field with an explicit text encoding.
    pub fn string_in(encoding: TextEncoding) -> Self {
        Self::with_kind(FieldKind::String { encoding })
    }

    /// A raw byte-sequence field.
    pub fn blob() -> Self {
        Self::with_kind(FieldKind::Blob)
    }

    pub fn boolean() -> Self {
        Self::with_kind(FieldKind::Boolean)
    }

    pub fn integer() -> Self {
        Self::with_kind(FieldKind::Integer)
    }

    pub fn float() -> Self {
        Self::with_kind(FieldKind::Float)
    }

    /// An array field; elements are encoded with `inner`, recursively.
    pub fn array(inner: FieldSpec) -> Self {
        Self::with_kind(FieldKind::Array {
            inner: Box::new(inner),
        })
    }

    fn with_kind(kind: FieldKind) -> Self {
        Self {
            kind,
            is_key: false,
        }
    }

    /// Mark this field as the model's key.
    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }

    fn key_eligible(&self) -> bool {
        matches!(self.kind, FieldKind::String { .. } | FieldKind::Blob)
    }
}

/// A named field in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub spec: FieldSpec,
}

/// Shorthand for building a [`Field`].
pub fn field(name: &str, spec: FieldSpec) -> Field {
    Field {
        name: name.to_string(),
        spec,
    }
}

/// The validated, ordered description of a record type.
///
/// Field order is the wire layout: reordering fields of an existing model
/// breaks compatibility with previously stored data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    name: String,
    prefix: String,
    fields: Vec<Field>,
    key_index: usize,
}

impl ModelSchema {
    /// Validate a model definition. Runs once per model type; the returned
    /// schema is immutable and shared read-only by every record and
    /// operation.
    pub fn define(name: &str, prefix: &str, fields: Vec<Field>) -> Result<Self, SchemaError> {
        let mut key_index: Option<usize> = None;
        for (i, f) in fields.iter().enumerate() {
            if fields[..i].iter().any(|prev| prev.name == f.name) {
                return Err(SchemaError::DuplicateField {
                    model: name.to_string(),
                    field: f.name.clone(),
                });
            }
            if let FieldKind::Array { inner } = f.spec.kind() {
                check_array_inner(name, &f.name, inner)?;
            }
            if f.spec.is_key() {
                if let Some(first) = key_index {
                    return Err(SchemaError::MultipleKeys {
                        model: name.to_string(),
                        first: fields[first].name.clone(),
                        second: f.name.clone(),
                    });
                }
                if !f.spec.key_eligible() {
                    return Err(SchemaError::InvalidKeyKind {
                        model: name.to_string(),
                        field: f.name.clone(),
                        kind: f.spec.kind().name(),
                    });
                }
                key_index = Some(i);
            }
        }
        let key_index = key_index.ok_or_else(|| SchemaError::NoKey {
            model: name.to_string(),
        })?;
        if prefix.is_empty() {
            return Err(SchemaError::MissingPrefix {
                model: name.to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            fields,
            key_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fields in declaration order, key field included.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position of the key field within [`fields`](Self::fields).
    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn key_field(&self) -> &Field {
        &self.fields[self.key_index]
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

fn check_array_inner(model: &str, field: &str, inner: &FieldSpec) -> Result<(), SchemaError> {
    if inner.is_key() {
        return Err(SchemaError::KeyInsideArray {
            model: model.to_string(),
            field: field.to_string(),
        });
    }
    if let FieldKind::Array { inner } = inner.kind() {
        check_array_inner(model, field, inner)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_valid() {
        let schema = ModelSchema::define(
            "Animal",
            "animal",
            vec![
                field("name", FieldSpec::string().key()),
                field("sound", FieldSpec::string()),
                field("shouts", FieldSpec::boolean()),
            ],
        )
        .unwrap();
        assert_eq!(schema.key_index(), 0);
        assert_eq!(schema.key_field().name, "name");
        assert_eq!(schema.fields().len(), 3);
        assert_eq!(schema.field_index("shouts"), Some(2));
        assert_eq!(schema.field_index("missing"), None);
    }

    #[test]
    fn test_blob_key_allowed() {
        let schema = ModelSchema::define(
            "RawData",
            "raw",
            vec![
                field("key", FieldSpec::blob().key()),
                field("data", FieldSpec::blob()),
            ],
        )
        .unwrap();
        assert_eq!(schema.key_field().name, "key");
    }

    #[test]
    fn test_no_key() {
        let err = ModelSchema::define(
            "NoKey",
            "nokey",
            vec![field("not_a_key", FieldSpec::string())],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::NoKey { .. }));
    }

    #[test]
    fn test_multiple_keys() {
        let err = ModelSchema::define(
            "MultiKey",
            "multikey",
            vec![
                field("key1", FieldSpec::string().key()),
                field("key2", FieldSpec::blob().key()),
            ],
        )
        .unwrap_err();
        match err {
            SchemaError::MultipleKeys { first, second, .. } => {
                assert_eq!(first, "key1");
                assert_eq!(second, "key2");
            }
            other => panic!("expected MultipleKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_non_string_key() {
        for spec in [
            FieldSpec::integer().key(),
            FieldSpec::boolean().key(),
            FieldSpec::float().key(),
            FieldSpec::array(FieldSpec::string()).key(),
        ] {
            let err = ModelSchema::define("IntKey", "intkey", vec![field("key", spec)])
                .unwrap_err();
            assert!(matches!(err, SchemaError::InvalidKeyKind { .. }));
        }
    }

    #[test]
    fn test_missing_prefix() {
        let err = ModelSchema::define("NoPrefix", "", vec![field("key", FieldSpec::string().key())])
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingPrefix { .. }));
    }

    #[test]
    fn test_key_inside_array() {
        let err = ModelSchema::define(
            "Weird",
            "weird",
            vec![
                field("key", FieldSpec::string().key()),
                field("items", FieldSpec::array(FieldSpec::string().key())),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::KeyInsideArray { .. }));

        // Nested one level deeper.
        let err = ModelSchema::define(
            "Weird",
            "weird",
            vec![
                field("key", FieldSpec::string().key()),
                field(
                    "items",
                    FieldSpec::array(FieldSpec::array(FieldSpec::integer().key())),
                ),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::KeyInsideArray { .. }));
    }

    #[test]
    fn test_duplicate_field() {
        let err = ModelSchema::define(
            "Dup",
            "dup",
            vec![
                field("name", FieldSpec::string().key()),
                field("name", FieldSpec::string()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }
}
