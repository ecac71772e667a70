//! Wire constants and codec limits.
//!
//! References: SMPTE ST 336 (KLV framing), MISB ST 0107 (BER/BER-OID),
//! MISB ST 0603 (MISP time).

/// The four bytes every SMPTE universal label starts with.
pub const UDS_PREFIX: [u8; 4] = [0x06, 0x0E, 0x2B, 0x34];

/// Universal (UDS) keys are always 16 bytes.
pub const UDS_KEY_LENGTH: usize = 16;

/// Index of the version byte inside a UDS key.  Ignored by key equality.
pub const UDS_VERSION_BYTE: usize = 7;

/// Local-set keys are BER-OID encoded in at most 8 bytes.
pub const MAX_LDS_KEY_LENGTH: usize = 8;

/// Integers are at most 64 bits wide on the wire.
pub const MAX_INT_LENGTH: usize = 8;

/// Largest number of length bytes a long-form BER length may declare.
pub const MAX_BER_LENGTH_BYTES: usize = 8;

// ── Safety limits ────────────────────────────────────────────
// Nested sets (ST1607 amend/segment, VTarget packs inside series inside
// sets) can recurse.  Adversarial input must not blow the stack.

/// Maximum nesting of sets, series, and packs.
pub const MAX_DEPTH: u32 = 32;

/// Largest element count an ST1303 array may declare.  A run-length
/// encoded array expands to this many elements from a handful of bytes.
pub const MAX_MDAP_ELEMENTS: usize = 1 << 24;

// ── Checksums ────────────────────────────────────────────────

/// Length byte declared by every 2-byte checksum trailer.
pub const CHECKSUM_16_LENGTH: u8 = 2;
pub const CHECKSUM_32_LENGTH: u8 = 4;

/// Initial value used by the ST1108 CRC-16-CCITT trailer.
pub const CRC_16_CCITT_INITIAL: u16 = 0xFFFF;

/// Initial value conventionally used for CRC-32/MPEG-2.
pub const CRC_32_MPEG_INITIAL: u32 = 0xFFFF_FFFF;

// ── MISP time (ST 0603) ──────────────────────────────────────

/// Length of the tag that introduces a MISP time packet.
pub const MISP_TAG_LENGTH: usize = 16;

/// Length of the stuffed timestamp field: 8 bytes plus 3 `0xFF` guards.
pub const MISP_TIMESTAMP_LENGTH: usize = 11;

/// Full MISP time packet: tag, status byte, stuffed timestamp.
pub const MISP_PACKET_LENGTH: usize = MISP_TAG_LENGTH + 1 + MISP_TIMESTAMP_LENGTH;

/// Status byte written when the caller has no better information.
pub const MISP_DEFAULT_STATUS: u8 = 0x9F;
