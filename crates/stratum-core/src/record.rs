//! Whole-record serialization: field order, alignment padding, construction.

use std::fmt;
use std::sync::Arc;

use crate::codec::{self, Cursor};
use crate::error::{Result, ValueError};
use crate::schema::ModelSchema;
use crate::value::FieldValue;

/// Zero bytes needed after `offset` to reach the next 4-byte boundary.
pub(crate) fn padding_after(offset: usize) -> usize {
    (4 - offset % 4) % 4
}

/// A concrete instance of a model: one value per schema field, in
/// declaration order.
///
/// Records compare field by field; two records are equal when they were
/// built for the same model and hold equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<ModelSchema>,
    values: Vec<FieldValue>,
}

impl Record {
    /// Build a record from values in schema declaration order, key field
    /// included.
    pub fn new(schema: &Arc<ModelSchema>, values: Vec<FieldValue>) -> Result<Self> {
        if values.len() != schema.fields().len() {
            return Err(ValueError::WrongFieldCount {
                model: schema.name().to_string(),
                expected: schema.fields().len(),
                given: values.len(),
            }
            .into());
        }
        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    /// Build a record from named values, in any order. Every schema field
    /// must be assigned exactly once.
    pub fn from_named(schema: &Arc<ModelSchema>, pairs: Vec<(&str, FieldValue)>) -> Result<Self> {
        let mut slots: Vec<Option<FieldValue>> = vec![None; schema.fields().len()];
        for (name, value) in pairs {
            let i = schema
                .field_index(name)
                .ok_or_else(|| ValueError::UnknownField {
                    model: schema.name().to_string(),
                    field: name.to_string(),
                })?;
            if slots[i].is_some() {
                return Err(ValueError::DuplicateValue {
                    model: schema.name().to_string(),
                    field: name.to_string(),
                }
                .into());
            }
            slots[i] = Some(value);
        }
        let mut values = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(v) => values.push(v),
                None => {
                    return Err(ValueError::MissingField {
                        model: schema.name().to_string(),
                        field: schema.fields()[i].name.clone(),
                    }
                    .into());
                }
            }
        }
        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// Value of the named field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }

    /// The key field's value.
    pub fn key(&self) -> &FieldValue {
        &self.values[self.schema.key_index()]
    }

    /// All values in declaration order.
    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// Raw store key bytes for this record.
    pub fn key_bytes(&self) -> Result<Vec<u8>> {
        let bytes = codec::serialize_key(&self.schema.key_field().spec, self.key())?;
        Ok(bytes)
    }

    /// Serialize the non-key fields in declaration order, each followed by
    /// zero padding up to the next 4-byte boundary. The trailing padding
    /// after the final field is part of the format: the result's length is
    /// always a multiple of 4.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for (i, f) in self.schema.fields().iter().enumerate() {
            if i == self.schema.key_index() {
                continue;
            }
            codec::serialize_field(&f.spec, &self.values[i], &mut out)?;
            let pad = padding_after(out.len());
            out.resize(out.len() + pad, 0);
        }
        Ok(out)
    }

    /// Reconstruct a record from its key value and stored value bytes.
    /// Padding is recomputed from the cursor offset, mirroring
    /// [`to_bytes`](Self::to_bytes).
    pub fn parse(schema: &Arc<ModelSchema>, key: FieldValue, data: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(data);
        let mut values = Vec::with_capacity(schema.fields().len());
        for (i, f) in schema.fields().iter().enumerate() {
            if i == schema.key_index() {
                values.push(key.clone());
                continue;
            }
            values.push(codec::deserialize_field(&f.spec, &mut cur)?);
            cur.skip(padding_after(cur.position()))?;
        }
        Ok(Self {
            schema: Arc::clone(schema),
            values,
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, field) in self.schema.fields().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", field.name, self.values[i])?;
        }
        write!(f, ")")
    }
}
