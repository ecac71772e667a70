//! # klv: KLV metadata codec for MISB motion imagery standards
//!
//! Decode and encode the Key-Length-Value packets that carry UAS telemetry,
//! security markings, moving-target reports and image-quality metrics
//! alongside full-motion video.
//!
//! ```no_run
//! use klv::{decode, encode, Standard, lookup_tag};
//!
//! # fn main() -> Result<(), klv::KlvError> {
//! # let bytes: Vec<u8> = Vec::new();
//! let packet = decode(&bytes)?;
//! assert_eq!(encode(&packet)?, bytes);
//!
//! let traits = lookup_tag(Standard::St0601, 2)?;
//! assert_eq!(traits.name(), "Precision Timestamp");
//! # Ok(())
//! # }
//! ```
//!
//! Tag tables live in a [`Registry`].  The free functions here use the
//! process-wide one from [`registry::global`]; the `*_with` variants take an
//! explicit registry.

pub mod checksum;
pub mod constants;
pub mod errors;
pub mod format;
pub mod imap;
pub mod json_adapter;
pub mod key;
pub mod length_constraints;
pub mod misp_time;
pub mod packet;
pub mod read_write;
pub mod registry;
pub mod series;
pub mod set;
pub mod standards;
pub mod string;
pub mod tag_traits;
pub mod value;

pub use errors::{
    KlvError, ERR_CHECKSUM, ERR_CONSTRAINT, ERR_FORMAT, ERR_LENGTH, ERR_LIMIT_DEPTH,
    ERR_OVERFLOW, ERR_REGISTRY, ERR_TYPE,
};
pub use format::{Context, Format};
pub use key::{LdsKey, UdsKey};
pub use length_constraints::LengthConstraints;
pub use packet::{ChecksumStatus, Packet};
pub use read_write::Cursor;
pub use registry::{Registry, Standard};
pub use tag_traits::{TagCount, TagTraits, TagTraitsLookup};
pub use value::{KlvSet, KlvValue, LocalSet, UniversalSet};

use packet::{read_packet, write_packet};

// ── Core API ─────────────────────────────────────────────────

/// Decode the first packet in `bytes`.
pub fn decode(bytes: &[u8]) -> Result<Packet, KlvError> {
    decode_with(bytes, registry::global()?)
}

pub fn decode_with(bytes: &[u8], registry: &Registry) -> Result<Packet, KlvError> {
    read_packet(&mut Cursor::new(bytes), registry)
}

/// Encode `packet`, checksum trailer included.
pub fn encode(packet: &Packet) -> Result<Vec<u8>, KlvError> {
    encode_with(packet, registry::global()?)
}

pub fn encode_with(packet: &Packet, registry: &Registry) -> Result<Vec<u8>, KlvError> {
    let mut out = Vec::new();
    write_packet(packet, &mut out, registry)?;
    Ok(out)
}

/// Traits of local tag `tag` in `standard`; the unknown sentinel if the
/// table has no such tag.
pub fn lookup_tag(standard: Standard, tag: u64) -> Result<&'static TagTraits, KlvError> {
    Ok(registry::global()?.traits(standard).by_tag(tag))
}

/// Traits of universal key `key` in `standard`.
pub fn lookup_uds(standard: Standard, key: &UdsKey) -> Result<&'static TagTraits, KlvError> {
    Ok(registry::global()?.traits(standard).by_uds_key(key))
}
