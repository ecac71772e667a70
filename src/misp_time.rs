//! MISP precision timestamps (MISB ST 0603/0604).
//!
//! A MISP time packet is a 16-byte tag, a status byte, and an 8-byte
//! big-endian timestamp with `0xFF` stuffed after every second byte so the
//! timestamp can never look like a start code.  Microsecond packets are
//! held internally as nanoseconds.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::*;
use crate::errors::*;
use crate::read_write::Cursor;

/// Tag of a microsecond packet in its string form.
pub const MISP_TAG_STRING: &[u8; MISP_TAG_LENGTH] = b"MISPmicrosectime";

/// Tag of a microsecond packet in its UUID form.
pub const MISP_TAG_UUID: &[u8; MISP_TAG_LENGTH] = &[
    0xCF, 0x84, 0x82, 0x78, 0xEE, 0x23, 0x30, 0x6F, 0x8C, 0x4A, 0x33, 0x1B, 0x52, 0x2F, 0xB4, 0x3D,
];

/// Tag of a nanosecond packet.
pub const MISP_TAG_UUID_NANO: &[u8; MISP_TAG_LENGTH] = &[
    0xA8, 0x68, 0x7D, 0xD4, 0xD7, 0x59, 0x37, 0x58, 0xA5, 0xCE, 0xF0, 0x33, 0x8B, 0x65, 0x45, 0xF1,
];

const STUFFING_BYTE: u8 = 0xFF;

// Leap seconds between UTC and TAI, plus the constant 10 s offset.
const TAI_OFFSET_NS: i128 = (27 + 10) * 1_000_000_000;
// MISP time is TAI since the Unix epoch minus 8.000082 s.
const MISP_OFFSET_NS: i128 = -8_000_082_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MispTimestampTagType {
    String,
    Uuid,
}

/// MISP timestamp with its status byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MispTimestamp {
    nanoseconds: u64,
    pub status: u8,
}

impl Default for MispTimestamp {
    fn default() -> Self {
        Self {
            nanoseconds: 0,
            status: MISP_DEFAULT_STATUS,
        }
    }
}

impl MispTimestamp {
    pub fn from_microseconds(microseconds: u64, status: u8) -> Self {
        Self {
            nanoseconds: microseconds.saturating_mul(1000),
            status,
        }
    }

    pub fn from_nanoseconds(nanoseconds: u64, status: u8) -> Self {
        Self { nanoseconds, status }
    }

    /// Rounded to the nearest microsecond.
    pub fn microseconds(&self) -> u64 {
        self.nanoseconds.saturating_add(500) / 1000
    }

    pub fn nanoseconds(&self) -> u64 {
        self.nanoseconds
    }
}

/// Bytes in every MISP time packet.
pub fn misp_timestamp_length() -> usize {
    MISP_PACKET_LENGTH
}

fn is_nano(tag: &[u8]) -> bool {
    tag == MISP_TAG_UUID_NANO
}

/// Offset of the first complete MISP time packet in `data` whose tag is of
/// `tag_type`.
pub fn find_misp_timestamp(data: &[u8], tag_type: MispTimestampTagType) -> Option<usize> {
    let tags: &[&[u8; MISP_TAG_LENGTH]] = match tag_type {
        MispTimestampTagType::String => &[MISP_TAG_STRING],
        MispTimestampTagType::Uuid => &[MISP_TAG_UUID, MISP_TAG_UUID_NANO],
    };
    tags.iter()
        .find_map(|tag| data.windows(MISP_TAG_LENGTH).position(|w| w == *tag))
        .filter(|&offset| data.len() - offset >= MISP_PACKET_LENGTH)
}

/// Decode the MISP time packet at the cursor.  The tag is not checked
/// beyond telling nanosecond packets apart.
pub fn read_misp_timestamp(cur: &mut Cursor<'_>) -> Result<MispTimestamp, KlvError> {
    let mut body = cur.clone();
    let tag = body.take(MISP_TAG_LENGTH)?;
    let status = body.read_u8()?;
    let stuffed = body.take(MISP_TIMESTAMP_LENGTH)?;
    let timestamp = stuffed
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 2)
        .fold(0u64, |acc, (_, &b)| (acc << 8) | u64::from(b));
    *cur = body;

    Ok(if is_nano(tag) {
        MispTimestamp::from_nanoseconds(timestamp, status)
    } else {
        MispTimestamp::from_microseconds(timestamp, status)
    })
}

/// Encode `value`.  `tag_type` picks the tag; with `nano` set the UUID
/// form becomes the nanosecond UUID tag, while the string form keeps the
/// string tag.  Readers take a string-tagged count as microseconds, so
/// nanosecond packets only round-trip through the UUID form.
pub fn write_misp_timestamp(
    value: &MispTimestamp,
    out: &mut Vec<u8>,
    tag_type: MispTimestampTagType,
    nano: bool,
) {
    let tag: &[u8] = match (tag_type, nano) {
        (MispTimestampTagType::Uuid, true) => MISP_TAG_UUID_NANO,
        (MispTimestampTagType::Uuid, false) => MISP_TAG_UUID,
        (MispTimestampTagType::String, _) => MISP_TAG_STRING,
    };
    out.extend_from_slice(tag);
    out.push(value.status);

    let timestamp = if nano {
        value.nanoseconds()
    } else {
        value.microseconds()
    };
    for (i, byte) in timestamp.to_be_bytes().chunks(2).enumerate() {
        if i > 0 {
            out.push(STUFFING_BYTE);
        }
        out.extend_from_slice(byte);
    }
}

/// Current MISP time in nanoseconds, estimated from the system clock with a
/// fixed leap-second count.
pub fn misp_now_nanoseconds() -> u64 {
    let utc = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as i128);
    u64::try_from(utc + TAI_OFFSET_NS + MISP_OFFSET_NS).unwrap_or(0)
}

pub fn misp_now_microseconds() -> u64 {
    misp_now_nanoseconds().saturating_add(500) / 1000
}
