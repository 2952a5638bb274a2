//! Scalar wire codecs: Boolean, Integer, Float.

use super::cursor::Cursor;
use crate::error::{CorruptError, ValueError};

/// Append a boolean as a single 0/1 byte.
pub fn encode_bool(v: bool, out: &mut Vec<u8>) {
    out.push(v as u8);
}

pub fn decode_bool(cur: &mut Cursor<'_>) -> Result<bool, CorruptError> {
    match cur.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        b => Err(CorruptError::InvalidBool(b)),
    }
}

/// Append an integer as 4 big-endian bytes, rejecting values outside the
/// 32-bit signed range.
pub fn encode_int(v: i64, out: &mut Vec<u8>) -> Result<(), ValueError> {
    let narrow = i32::try_from(v).map_err(|_| ValueError::IntOutOfRange(v))?;
    out.extend_from_slice(&narrow.to_be_bytes());
    Ok(())
}

pub fn decode_int(cur: &mut Cursor<'_>) -> Result<i64, CorruptError> {
    Ok(i64::from(cur.read_i32()?))
}

/// Append a float as 8 big-endian IEEE 754 binary64 bytes. Binary64 covers
/// every `f64` input, so this never fails.
pub fn encode_float(v: f64, out: &mut Vec<u8>) {
    out.extend_from_slice(&v.to_be_bytes());
}

pub fn decode_float(cur: &mut Cursor<'_>) -> Result<f64, CorruptError> {
    cur.read_f64()
}
