//! Error types for all Stratum operations.

use std::io;
use thiserror::Error;

/// Top-level error type for Stratum operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Corrupt(#[from] CorruptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A model definition is self-inconsistent.
///
/// Raised only by [`ModelSchema::define`](crate::schema::ModelSchema::define),
/// never by instance operations.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("model '{model}' has no key field")]
    NoKey { model: String },

    #[error("model '{model}' has multiple key fields: '{first}' and '{second}'")]
    MultipleKeys {
        model: String,
        first: String,
        second: String,
    },

    #[error("key field '{field}' of model '{model}' is {kind}; keys must be string or blob")]
    InvalidKeyKind {
        model: String,
        field: String,
        kind: &'static str,
    },

    #[error("array element spec of field '{field}' in model '{model}' is marked as a key")]
    KeyInsideArray { model: String, field: String },

    #[error("model '{model}' declares field '{field}' twice")]
    DuplicateField { model: String, field: String },

    #[error("model '{model}' has no prefix")]
    MissingPrefix { model: String },
}

/// A caller-supplied value does not fit its field's codec.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("integer {0} is outside the 32-bit signed range")]
    IntOutOfRange(i64),

    #[error("length {0} exceeds the 32-bit length prefix")]
    LengthOverflow(usize),

    #[error("model '{model}' has {expected} fields but {given} values were given")]
    WrongFieldCount {
        model: String,
        expected: usize,
        given: usize,
    },

    #[error("model '{model}' has no field named '{field}'")]
    UnknownField { model: String, field: String },

    #[error("model '{model}' was given field '{field}' twice")]
    DuplicateValue { model: String, field: String },

    #[error("model '{model}' was given no value for field '{field}'")]
    MissingField { model: String, field: String },

    #[error("record was built for model '{actual}', not '{expected}'")]
    SchemaMismatch { expected: String, actual: String },
}

/// Stored bytes do not parse according to the schema.
#[derive(Debug, Error)]
pub enum CorruptError {
    #[error("record truncated: needed {needed} more bytes, {remaining} left")]
    Truncated { needed: usize, remaining: usize },

    #[error("invalid boolean byte {0:#04x}")]
    InvalidBool(u8),

    #[error("stored text is not valid {encoding}")]
    InvalidText { encoding: &'static str },
}

/// Store-layer failure, passed through unchanged. This layer adds no retry
/// or recovery logic around it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
