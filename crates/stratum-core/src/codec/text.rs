use serde::{Deserialize, Serialize};

use crate::error::CorruptError;

/// Text encoding used by string fields, for both value bytes and raw key
/// bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        }
    }

    /// Encode text into bytes. Never fails: every supported encoding covers
    /// all of Unicode.
    pub fn encode(self, s: &str) -> Vec<u8> {
        match self {
            TextEncoding::Utf8 => s.as_bytes().to_vec(),
            TextEncoding::Utf16Le => s.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            TextEncoding::Utf16Be => s.encode_utf16().flat_map(u16::to_be_bytes).collect(),
        }
    }

    /// Decode bytes into text.
    pub fn decode(self, bytes: &[u8]) -> Result<String, CorruptError> {
        let invalid = CorruptError::InvalidText {
            encoding: self.name(),
        };
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|_| invalid),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(invalid);
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|c| {
                        let pair = [c[0], c[1]];
                        match self {
                            TextEncoding::Utf16Le => u16::from_le_bytes(pair),
                            _ => u16::from_be_bytes(pair),
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|_| invalid)
            }
        }
    }
}
