//! KLV error codes and error type.
//!
//! Every fallible operation in the crate returns `Result<_, KlvError>`.  The
//! `code` field is one of the `ERR_*` constants below and is what callers
//! (and tests) match on; `message` carries human-readable context, and
//! `offset` the byte position where decoding went wrong, when known.
//!
//! Two conditions are not errors: unknown tags resolve to the
//! registry's sentinel entry, and checksum mismatches are reported through
//! [`crate::packet::ChecksumStatus`] on an otherwise successful decode.

// ── Error codes ──────────────────────────────────────────────

/// Buffer exhausted, or a declared length disagrees with the bytes present.
pub const ERR_LENGTH: &str = "ERR_LENGTH";
/// Bytes do not follow the expected encoding.
pub const ERR_FORMAT: &str = "ERR_FORMAT";
/// A length violates a field's length constraints.
pub const ERR_CONSTRAINT: &str = "ERR_CONSTRAINT";
/// Checksum trailer missing or malformed.
pub const ERR_CHECKSUM: &str = "ERR_CHECKSUM";
/// A value does not have the type its format expects.
pub const ERR_TYPE: &str = "ERR_TYPE";
/// A value cannot be represented in the requested number of bytes or domain.
pub const ERR_OVERFLOW: &str = "ERR_OVERFLOW";
/// Nesting exceeded `MAX_DEPTH`.
pub const ERR_LIMIT_DEPTH: &str = "ERR_LIMIT_DEPTH";
/// A tag-traits table is inconsistent.
pub const ERR_REGISTRY: &str = "ERR_REGISTRY";

/// KLV processing error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}{}", describe_offset(.offset))]
pub struct KlvError {
    pub code: &'static str,
    pub message: String,
    pub offset: Option<usize>,
}

fn describe_offset(offset: &Option<usize>) -> String {
    match offset {
        Some(offset) => format!(" (at byte {offset})"),
        None => String::new(),
    }
}

impl KlvError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            offset: None,
        }
    }

    /// Attach the byte offset where the problem was found.  An offset that
    /// is already set (by a deeper reader) is kept.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset.get_or_insert(offset);
        self
    }

    /// Prefix the message with where the error happened, e.g. a tag name.
    pub fn context(mut self, context: impl std::fmt::Display) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }
}
