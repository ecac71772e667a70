//! Primitive codecs: integers, BER lengths, BER-OID values, IEEE floats,
//! booleans, and raw blobs.
//!
//! Reads go through a [`Cursor`], which tracks an absolute byte offset so
//! that errors raised deep inside a nested set still point at the right
//! place in the original buffer.  A successful read advances the cursor by
//! exactly the bytes consumed.  A failed read restores the cursor to where
//! it stood before the call; it does not advance over the bytes it
//! examined, so the caller decides whether to skip them.
//!
//! Writes append to a `Vec<u8>` and fail only when the value does not fit
//! in the requested width.

use crate::constants::*;
use crate::errors::*;

/// Read position inside a byte buffer.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            base: 0,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes consumed since this cursor was created.
    pub fn consumed(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Consume and return the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], KlvError> {
        if n > self.remaining() {
            return Err(KlvError::new(
                ERR_LENGTH,
                format!("need {n} bytes, {} remain", self.remaining()),
            )
            .at(self.position()));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, KlvError> {
        Ok(self.take(1)?[0])
    }

    pub fn skip(&mut self, n: usize) -> Result<(), KlvError> {
        self.take(n).map(|_| ())
    }

    /// Split off a cursor over the next `n` bytes and advance past them.
    /// The child keeps reporting absolute offsets.
    pub fn sub(&mut self, n: usize) -> Result<Cursor<'a>, KlvError> {
        let base = self.position();
        let data = self.take(n)?;
        Ok(Cursor { data, pos: 0, base })
    }
}

// ── Integers ─────────────────────────────────────────────────

/// Minimum number of bytes needed to hold `value` (at least 1).
pub fn int_length(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

/// Minimum number of bytes needed to hold `value` in two's complement.
pub fn sint_length(value: i64) -> usize {
    let significant = if value < 0 {
        64 - (!value).leading_zeros() as usize
    } else {
        64 - value.leading_zeros() as usize
    };
    // One extra bit for the sign.
    (significant + 1).div_ceil(8).max(1)
}

fn check_int_width(length: usize, offset: usize) -> Result<(), KlvError> {
    if length == 0 || length > MAX_INT_LENGTH {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("integer width of {length} bytes is outside 1..=8"),
        )
        .at(offset));
    }
    Ok(())
}

/// Read a big-endian unsigned integer of `length` bytes.
pub fn read_int(cur: &mut Cursor<'_>, length: usize) -> Result<u64, KlvError> {
    check_int_width(length, cur.position())?;
    let bytes = cur.take(length)?;
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Read a big-endian two's complement integer of `length` bytes.
pub fn read_sint(cur: &mut Cursor<'_>, length: usize) -> Result<i64, KlvError> {
    let raw = read_int(cur, length)?;
    let shift = 64 - 8 * length as u32;
    // Shift the sign bit to the top, then arithmetic-shift back down.
    Ok(((raw << shift) as i64) >> shift)
}

/// Write `value` as a big-endian unsigned integer of exactly `length` bytes.
pub fn write_int(value: u64, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
    check_int_width(length, out.len())?;
    if int_length(value) > length {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("{value} does not fit in {length} bytes"),
        ));
    }
    out.extend_from_slice(&value.to_be_bytes()[8 - length..]);
    Ok(())
}

/// Write `value` as a big-endian two's complement integer of `length` bytes.
pub fn write_sint(value: i64, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
    check_int_width(length, out.len())?;
    if sint_length(value) > length {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("{value} does not fit in {length} signed bytes"),
        ));
    }
    out.extend_from_slice(&value.to_be_bytes()[8 - length..]);
    Ok(())
}

// ── BER lengths ──────────────────────────────────────────────
// Short form: one byte, value <= 127.
// Long form:  0x80 | N, then N big-endian bytes.

/// Read a BER-encoded length.  On failure the cursor is restored, even
/// when the lead byte of a long form was already consumed.
pub fn read_ber(cur: &mut Cursor<'_>) -> Result<u64, KlvError> {
    let start = cur.clone();
    let lead = cur.read_u8()?;
    if lead & 0x80 == 0 {
        return Ok(u64::from(lead));
    }
    let count = usize::from(lead & 0x7F);
    if count == 0 || count > MAX_BER_LENGTH_BYTES {
        *cur = start;
        return Err(KlvError::new(
            ERR_FORMAT,
            format!("unsupported BER long form with {count} length bytes"),
        )
        .at(cur.position()));
    }
    match read_int(cur, count) {
        Ok(value) => Ok(value),
        Err(err) => {
            *cur = start;
            Err(err)
        }
    }
}

/// Write `value` as a BER length, choosing the short form when possible.
pub fn write_ber(value: u64, out: &mut Vec<u8>) {
    if value <= 0x7F {
        out.push(value as u8);
        return;
    }
    let count = int_length(value);
    out.push(0x80 | count as u8);
    out.extend_from_slice(&value.to_be_bytes()[8 - count..]);
}

/// Number of bytes `write_ber` produces for `value`.
pub fn ber_length(value: u64) -> usize {
    if value <= 0x7F {
        1
    } else {
        int_length(value) + 1
    }
}

// ── BER-OID ──────────────────────────────────────────────────
// Seven value bits per byte, most significant group first.  The high bit of
// each byte is set on every byte except the last.

/// Read a BER-OID value of at most `MAX_LDS_KEY_LENGTH` bytes.
pub fn read_ber_oid(cur: &mut Cursor<'_>) -> Result<u64, KlvError> {
    let start = cur.position();
    let rest = cur.rest();
    let mut value = 0u64;
    for (i, &byte) in rest.iter().enumerate() {
        if i >= MAX_LDS_KEY_LENGTH {
            break;
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        if byte & 0x80 == 0 {
            cur.skip(i + 1)?;
            return Ok(value);
        }
    }
    let code = if rest.len() < MAX_LDS_KEY_LENGTH {
        ERR_LENGTH
    } else {
        ERR_FORMAT
    };
    Err(KlvError::new(code, "unterminated BER-OID value").at(start))
}

/// Number of bytes `write_ber_oid` produces for `value`.
pub fn ber_oid_length(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Write `value` in BER-OID form.
pub fn write_ber_oid(value: u64, out: &mut Vec<u8>) -> Result<(), KlvError> {
    let length = ber_oid_length(value);
    if length > MAX_LDS_KEY_LENGTH {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("{value} needs {length} BER-OID bytes; at most 8 allowed"),
        ));
    }
    for i in (0..length).rev() {
        let group = ((value >> (7 * i)) & 0x7F) as u8;
        out.push(if i == 0 { group } else { group | 0x80 });
    }
    Ok(())
}

// ── Floating point ───────────────────────────────────────────

/// Read an IEEE-754 float of 4 or 8 bytes.
pub fn read_float(cur: &mut Cursor<'_>, length: usize) -> Result<f64, KlvError> {
    let offset = cur.position();
    match length {
        4 => {
            let raw = read_int(cur, 4)? as u32;
            Ok(f64::from(f32::from_bits(raw)))
        }
        8 => Ok(f64::from_bits(read_int(cur, 8)?)),
        _ => Err(KlvError::new(
            ERR_FORMAT,
            format!("float of {length} bytes; must be 4 or 8"),
        )
        .at(offset)),
    }
}

/// Write an IEEE-754 float of 4 or 8 bytes.
pub fn write_float(value: f64, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
    match length {
        4 => {
            let narrowed = value as f32;
            if value.is_finite() && !narrowed.is_finite() {
                return Err(KlvError::new(
                    ERR_OVERFLOW,
                    format!("{value} overflows a 4-byte float"),
                ));
            }
            out.extend_from_slice(&narrowed.to_be_bytes());
            Ok(())
        }
        8 => {
            out.extend_from_slice(&value.to_be_bytes());
            Ok(())
        }
        _ => Err(KlvError::new(
            ERR_FORMAT,
            format!("float of {length} bytes; must be 4 or 8"),
        )),
    }
}

// ── Booleans and blobs ───────────────────────────────────────

pub fn read_bool(cur: &mut Cursor<'_>) -> Result<bool, KlvError> {
    Ok(cur.read_u8()? != 0)
}

pub fn write_bool(value: bool, out: &mut Vec<u8>) {
    out.push(u8::from(value));
}

/// Copy `length` raw bytes.
pub fn read_blob(cur: &mut Cursor<'_>, length: usize) -> Result<Vec<u8>, KlvError> {
    Ok(cur.take(length)?.to_vec())
}

pub fn write_blob(bytes: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(bytes);
}
