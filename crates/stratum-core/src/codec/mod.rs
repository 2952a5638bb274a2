//! Field codecs: the wire format for each field kind.
//!
//! - Boolean: 1 byte, 0 or 1.
//! - Integer: 4-byte signed big-endian.
//! - Float: 8-byte IEEE 754 binary64, big-endian.
//! - String: 4-byte unsigned big-endian length prefix + text bytes in the
//!   field's [`TextEncoding`].
//! - Blob: 4-byte unsigned big-endian length prefix + raw bytes.
//! - Array: 4-byte unsigned big-endian element count + each element encoded
//!   with the inner spec, back-to-back, no per-element padding.
//!
//! Serialization failures ([`ValueError`]) mean the caller supplied a bad
//! value; deserialization failures ([`CorruptError`]) mean the stored bytes
//! are unreadable. Alignment padding between record fields is the record
//! layer's concern, not the codecs'.

pub mod cursor;
pub mod scalar;
pub mod text;

pub use cursor::Cursor;
pub use text::TextEncoding;

use crate::error::{CorruptError, ValueError};
use crate::schema::{FieldKind, FieldSpec};
use crate::value::FieldValue;

/// Largest length or element count representable by the 4-byte prefix.
const MAX_LEN: usize = u32::MAX as usize;

fn encode_len(len: usize, out: &mut Vec<u8>) -> Result<(), ValueError> {
    if len > MAX_LEN {
        return Err(ValueError::LengthOverflow(len));
    }
    out.extend_from_slice(&(len as u32).to_be_bytes());
    Ok(())
}

/// Serialize one value according to `spec`, appending to `out`.
pub fn serialize_field(
    spec: &FieldSpec,
    value: &FieldValue,
    out: &mut Vec<u8>,
) -> Result<(), ValueError> {
    match (spec.kind(), value) {
        (FieldKind::Boolean, FieldValue::Bool(v)) => {
            scalar::encode_bool(*v, out);
            Ok(())
        }
        (FieldKind::Integer, FieldValue::Int(v)) => scalar::encode_int(*v, out),
        (FieldKind::Float, FieldValue::Float(v)) => {
            scalar::encode_float(*v, out);
            Ok(())
        }
        (FieldKind::String { encoding }, FieldValue::Text(s)) => {
            let bytes = encoding.encode(s);
            encode_len(bytes.len(), out)?;
            out.extend_from_slice(&bytes);
            Ok(())
        }
        (FieldKind::Blob, FieldValue::Bytes(b)) => {
            encode_len(b.len(), out)?;
            out.extend_from_slice(b);
            Ok(())
        }
        (FieldKind::Array { inner }, FieldValue::List(items)) => {
            encode_len(items.len(), out)?;
            for item in items {
                serialize_field(inner, item, out)?;
            }
            Ok(())
        }
        (kind, value) => Err(ValueError::TypeMismatch {
            expected: kind.name(),
            actual: value.kind_name(),
        }),
    }
}

/// Deserialize one value according to `spec`, advancing the cursor by
/// exactly the bytes consumed.
pub fn deserialize_field(
    spec: &FieldSpec,
    cur: &mut Cursor<'_>,
) -> Result<FieldValue, CorruptError> {
    match spec.kind() {
        FieldKind::Boolean => Ok(FieldValue::Bool(scalar::decode_bool(cur)?)),
        FieldKind::Integer => Ok(FieldValue::Int(scalar::decode_int(cur)?)),
        FieldKind::Float => Ok(FieldValue::Float(scalar::decode_float(cur)?)),
        FieldKind::String { encoding } => {
            let len = cur.read_u32()? as usize;
            let bytes = cur.take(len)?;
            Ok(FieldValue::Text(encoding.decode(bytes)?))
        }
        FieldKind::Blob => {
            let len = cur.read_u32()? as usize;
            Ok(FieldValue::Bytes(cur.take(len)?.to_vec()))
        }
        FieldKind::Array { inner } => {
            let count = cur.read_u32()? as usize;
            let items = (0..count)
                .map(|_| deserialize_field(inner, cur))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FieldValue::List(items))
        }
    }
}

/// Encode a key field's value as raw store key bytes: the text encoding for
/// String keys, the identity transform for Blob keys. No length framing; the
/// key's extent is delimited by the store itself.
pub fn serialize_key(spec: &FieldSpec, value: &FieldValue) -> Result<Vec<u8>, ValueError> {
    match (spec.kind(), value) {
        (FieldKind::String { encoding }, FieldValue::Text(s)) => Ok(encoding.encode(s)),
        (FieldKind::Blob, FieldValue::Bytes(b)) => Ok(b.clone()),
        (kind, value) => Err(ValueError::TypeMismatch {
            expected: kind.name(),
            actual: value.kind_name(),
        }),
    }
}

/// Decode raw store key bytes back into the key field's value.
pub fn deserialize_key(spec: &FieldSpec, bytes: &[u8]) -> Result<FieldValue, CorruptError> {
    match spec.kind() {
        FieldKind::String { encoding } => Ok(FieldValue::Text(encoding.decode(bytes)?)),
        // Blob keys are the identity transform; validation rules out every
        // other kind in key position.
        _ => Ok(FieldValue::Bytes(bytes.to_vec())),
    }
}
