//! Text fields.
//!
//! A [`StringFormat`] pairs a [`TextCodec`] with two independent sets of
//! constraints: the field's byte length (enforced by the shared format
//! wrapper) and its character count (checked here).  A character-count
//! violation is logged, not rejected.

use tracing::warn;

use crate::errors::*;
use crate::format::{type_error, Context, Format};
use crate::length_constraints::LengthConstraints;
use crate::read_write::{read_blob, Cursor};
use crate::value::KlvValue;

/// Wire encoding of a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCodec {
    Ascii,
    Utf8,
    Utf16Be,
}

impl TextCodec {
    pub fn name(&self) -> &'static str {
        match self {
            TextCodec::Ascii => "ASCII",
            TextCodec::Utf8 => "UTF-8",
            TextCodec::Utf16Be => "UTF-16BE",
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String, KlvError> {
        match self {
            TextCodec::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(KlvError::new(
                        ERR_FORMAT,
                        format!("byte 0x{:02X} at index {pos} is not ASCII", bytes[pos]),
                    ));
                }
                Ok(bytes.iter().map(|&b| char::from(b)).collect())
            }
            TextCodec::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| KlvError::new(ERR_FORMAT, format!("string is not valid UTF-8: {e}"))),
            TextCodec::Utf16Be => {
                if bytes.len() % 2 != 0 {
                    return Err(KlvError::new(
                        ERR_FORMAT,
                        format!("UTF-16 string has odd byte count {}", bytes.len()),
                    ));
                }
                let units = bytes.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
                char::decode_utf16(units)
                    .collect::<Result<String, _>>()
                    .map_err(|e| KlvError::new(ERR_FORMAT, format!("string is not valid UTF-16: {e}")))
            }
        }
    }

    pub fn encode(&self, text: &str, out: &mut Vec<u8>) -> Result<(), KlvError> {
        match self {
            TextCodec::Ascii => {
                if !text.is_ascii() {
                    return Err(KlvError::new(
                        ERR_FORMAT,
                        format!("{text:?} cannot be encoded as ASCII"),
                    ));
                }
                out.extend_from_slice(text.as_bytes());
            }
            TextCodec::Utf8 => out.extend_from_slice(text.as_bytes()),
            TextCodec::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
        }
        Ok(())
    }

    pub fn encoded_length(&self, text: &str) -> usize {
        match self {
            TextCodec::Ascii | TextCodec::Utf8 => text.len(),
            TextCodec::Utf16Be => text.encode_utf16().count() * 2,
        }
    }
}

// A lone NUL byte stands for the empty string, so that an empty value can
// still be told apart from an absent one.
const EMPTY_STRING: [u8; 1] = [0x00];

/// Text field with a codec and character-count constraints.
#[derive(Debug, Clone)]
pub struct StringFormat {
    codec: TextCodec,
    char_constraints: LengthConstraints,
    byte_constraints: LengthConstraints,
}

impl StringFormat {
    pub fn new(
        codec: TextCodec,
        char_constraints: LengthConstraints,
        byte_constraints: LengthConstraints,
    ) -> Self {
        Self {
            codec,
            char_constraints,
            byte_constraints,
        }
    }

    /// Unconstrained ASCII.
    pub fn ascii() -> Self {
        Self::new(TextCodec::Ascii, LengthConstraints::free(), LengthConstraints::free())
    }

    /// Unconstrained UTF-8.
    pub fn utf8() -> Self {
        Self::new(TextCodec::Utf8, LengthConstraints::free(), LengthConstraints::free())
    }

    pub fn utf16() -> Self {
        Self::new(TextCodec::Utf16Be, LengthConstraints::free(), LengthConstraints::free())
    }

    pub fn codec(&self) -> TextCodec {
        self.codec
    }

    pub fn char_constraints(&self) -> &LengthConstraints {
        &self.char_constraints
    }

    fn check_char_count(&self, text: &str, action: &str) {
        let count = text.chars().count();
        if !self.char_constraints.do_allow(count) {
            warn!(
                "{}: {count} characters violate {} when {action}",
                self.description(),
                self.char_constraints
            );
        }
    }
}

impl Format for StringFormat {
    fn description(&self) -> String {
        let mut result = format!("{} string of {}", self.codec.name(), self.byte_constraints);
        if !self.char_constraints.is_free() {
            result.push_str(&format!(" (characters: {})", self.char_constraints));
        }
        result
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.byte_constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let offset = cur.position();
        let bytes = read_blob(cur, length)?;
        if bytes == EMPTY_STRING {
            return Ok(KlvValue::String(String::new()));
        }
        let text = self.codec.decode(&bytes).map_err(|e| e.at(offset))?;
        self.check_char_count(&text, "reading");
        Ok(KlvValue::String(text))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let text = value.as_str().ok_or_else(|| type_error("string", value))?;
        self.check_char_count(text, "writing");
        if text.is_empty() {
            out.extend_from_slice(&EMPTY_STRING);
            return Ok(());
        }
        self.codec.encode(text, out)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let text = value.as_str().ok_or_else(|| type_error("string", value))?;
        if text.is_empty() {
            return Ok(EMPTY_STRING.len());
        }
        Ok(self.codec.encoded_length(text))
    }
}
