//! Set keys.
//!
//! Local-set keys are small integers written in BER-OID form.  Universal keys
//! are 16-byte SMPTE universal labels; they compare equal regardless of the
//! label's version byte.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::constants::*;
use crate::errors::*;
use crate::read_write::{ber_oid_length, read_ber_oid, write_ber_oid, Cursor};

// ── Local-set keys ───────────────────────────────────────────

/// Tag of a field inside a local set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LdsKey(pub u64);

impl fmt::Display for LdsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LdsKey {
    fn from(tag: u64) -> Self {
        LdsKey(tag)
    }
}

pub fn read_lds_key(cur: &mut Cursor<'_>) -> Result<LdsKey, KlvError> {
    read_ber_oid(cur).map(LdsKey)
}

pub fn write_lds_key(key: LdsKey, out: &mut Vec<u8>) -> Result<(), KlvError> {
    write_ber_oid(key.0, out)
}

/// Bytes `write_lds_key` produces; at least 1.
pub fn lds_key_length(key: LdsKey) -> usize {
    ber_oid_length(key.0)
}

// ── Universal keys ───────────────────────────────────────────

/// Registry category stored in byte 4 of a universal label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UdsCategory {
    Dictionary,
    Group,
    Wrapper,
    Label,
    Private,
    Invalid,
}

/// 16-byte SMPTE universal label.
#[derive(Clone, Copy)]
pub struct UdsKey([u8; UDS_KEY_LENGTH]);

impl UdsKey {
    pub const fn new(bytes: [u8; UDS_KEY_LENGTH]) -> Self {
        UdsKey(bytes)
    }

    /// Build a key from its two big-endian halves, the way the labels are
    /// usually printed in the standards.
    pub const fn from_words(high: u64, low: u64) -> Self {
        let h = high.to_be_bytes();
        let l = low.to_be_bytes();
        UdsKey([
            h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], l[0], l[1], l[2], l[3], l[4], l[5],
            l[6], l[7],
        ])
    }

    pub fn bytes(&self) -> &[u8; UDS_KEY_LENGTH] {
        &self.0
    }

    pub fn category(&self) -> UdsCategory {
        match self.0[4] {
            1 => UdsCategory::Dictionary,
            2 => UdsCategory::Group,
            3 => UdsCategory::Wrapper,
            4 => UdsCategory::Label,
            5 => UdsCategory::Private,
            _ => UdsCategory::Invalid,
        }
    }

    pub fn has_prefix(&self) -> bool {
        self.0[..UDS_PREFIX.len()] == UDS_PREFIX
    }

    /// Prefix present, bytes 4 to 7 have their MSB clear, and the category
    /// is a known one.
    pub fn is_valid(&self) -> bool {
        self.has_prefix()
            && self.0[4..8].iter().all(|b| b & 0x80 == 0)
            && self.category() != UdsCategory::Invalid
    }

    // Bytes that take part in comparisons.
    fn significant(&self) -> impl Iterator<Item = &u8> {
        self.0
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != UDS_VERSION_BYTE)
            .map(|(_, b)| b)
    }
}

impl PartialEq for UdsKey {
    fn eq(&self, other: &Self) -> bool {
        self.significant().eq(other.significant())
    }
}

impl Eq for UdsKey {}

impl Hash for UdsKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.significant() {
            b.hash(state);
        }
    }
}

impl PartialOrd for UdsKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UdsKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant().cmp(other.significant())
    }
}

impl fmt::Display for UdsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.0.chunks(4).enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for b in chunk {
                write!(f, "{b:02X}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for UdsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UdsKey({self})")
    }
}

impl FromStr for UdsKey {
    type Err = KlvError;

    /// Accepts 32 hex digits, optionally grouped with `.` or spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: Vec<u8> = s
            .bytes()
            .filter(|b| !matches!(b, b'.' | b' '))
            .collect();
        if digits.len() != UDS_KEY_LENGTH * 2 {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!("universal key {s:?} does not have 32 hex digits"),
            ));
        }
        let mut bytes = [0u8; UDS_KEY_LENGTH];
        for (byte, pair) in bytes.iter_mut().zip(digits.chunks(2)) {
            let text = std::str::from_utf8(pair)
                .map_err(|_| KlvError::new(ERR_FORMAT, "non-ASCII universal key"))?;
            *byte = u8::from_str_radix(text, 16).map_err(|_| {
                KlvError::new(ERR_FORMAT, format!("invalid hex {text:?} in universal key"))
            })?;
        }
        Ok(UdsKey(bytes))
    }
}

pub fn read_uds_key(cur: &mut Cursor<'_>) -> Result<UdsKey, KlvError> {
    let bytes = cur.take(UDS_KEY_LENGTH)?;
    let mut key = [0u8; UDS_KEY_LENGTH];
    key.copy_from_slice(bytes);
    Ok(UdsKey(key))
}

pub fn write_uds_key(key: &UdsKey, out: &mut Vec<u8>) {
    out.extend_from_slice(&key.0);
}

pub fn uds_key_length(_key: &UdsKey) -> usize {
    UDS_KEY_LENGTH
}
