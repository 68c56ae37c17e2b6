//! Reading documents as text with an encoding fallback
//!
//! Documents are decoded as UTF-8 when they are valid UTF-8 and as Latin-1
//! otherwise. Latin-1 maps every byte to a character, so decoding itself
//! never fails; only reading the file can.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// The encoding a document was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    Latin1,
}

impl TextEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin1",
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded document text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
}

/// Decode raw bytes, UTF-8 first
pub fn decode_bytes(bytes: Vec<u8>) -> DecodedText {
    match String::from_utf8(bytes) {
        Ok(text) => DecodedText {
            text,
            encoding: TextEncoding::Utf8,
        },
        Err(err) => DecodedText {
            text: err.into_bytes().into_iter().map(char::from).collect(),
            encoding: TextEncoding::Latin1,
        },
    }
}

/// Read and decode a document from disk
pub fn read_document(path: &Path) -> Result<DecodedText> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let decoded = decode_bytes(bytes);
    debug!(path = %path.display(), encoding = %decoded.encoding, "decoded document");
    Ok(decoded)
}
