//! Tag tables for each registered standard.
//!
//! Every module exposes one `*traits()` builder per set it defines.  The
//! builders are only called by [`crate::registry::Registry::new`].

pub mod st0102;
pub mod st0104;
pub mod st0601;
pub mod st0806;
pub mod st0903;
pub mod st1002;
pub mod st1010;
pub mod st1108;
pub mod st1202;
pub mod st1204;
pub mod st1206;
pub mod st1303;
pub mod st1601;
pub mod st1602;

use crate::errors::*;
use crate::format::{BlobFormat, SintFormat, UintFormat};
use crate::length_constraints::LengthConstraints;
use crate::string::{StringFormat, TextCodec};

// Shorthands for the formats the tables use over and over.

pub(crate) fn uint(length: usize) -> Result<UintFormat, KlvError> {
    Ok(UintFormat::new(LengthConstraints::fixed(length)?))
}

pub(crate) fn uint_free() -> UintFormat {
    UintFormat::new(LengthConstraints::free())
}

pub(crate) fn sint_free() -> SintFormat {
    SintFormat::new(LengthConstraints::free())
}

pub(crate) fn blob() -> BlobFormat {
    BlobFormat::new()
}

pub(crate) fn blob_of(length: usize) -> Result<BlobFormat, KlvError> {
    Ok(BlobFormat::with_constraints(LengthConstraints::fixed(length)?))
}

pub(crate) fn text() -> StringFormat {
    StringFormat::utf8()
}

/// UTF-8 string of exactly `length` bytes.
pub(crate) fn text_of(length: usize) -> Result<StringFormat, KlvError> {
    Ok(StringFormat::new(
        TextCodec::Utf8,
        LengthConstraints::free(),
        LengthConstraints::fixed(length)?,
    ))
}
