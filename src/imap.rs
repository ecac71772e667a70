//! Scaled real-number encodings.
//!
//! IMAP (MISB ST 1201) maps a real domain `[min, max]` onto an unsigned
//! integer of 1 to 8 bytes using power-of-two scale factors, and reserves
//! bit patterns with the MSB set for infinities, NaNs, and out-of-range
//! markers.  FLINT is the older ST 0601 scheme, a plain linear map onto the
//! full integer range (signed variants are symmetric around zero).

use std::fmt;

use tracing::debug;

use crate::errors::*;
use crate::read_write::{read_int, read_sint, write_int, write_sint, Cursor};

struct ImapTerms {
    forward_scale: f64,
    backward_scale: f64,
    zero_offset: f64,
}

fn check_domain(min: f64, max: f64, length: usize) -> Result<(), KlvError> {
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Err(KlvError::new(
            ERR_FORMAT,
            format!("invalid scaled domain ({min}, {max})"),
        ));
    }
    if length == 0 || length > 8 {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("scaled value width of {length} bytes is outside 1..=8"),
        ));
    }
    Ok(())
}

// ST 1201 section 8.1.2
fn imap_terms(min: f64, max: f64, length: usize) -> ImapTerms {
    let float_exponent = (max - min).log2().ceil();
    let int_exponent = 8.0 * length as f64 - 1.0;
    let forward_scale = (int_exponent - float_exponent).exp2();
    let backward_scale = (float_exponent - int_exponent).exp2();
    let zero_offset = if min < 0.0 && max > 0.0 {
        forward_scale * min - (forward_scale * min).floor()
    } else {
        0.0
    };
    ImapTerms {
        forward_scale,
        backward_scale,
        zero_offset,
    }
}

/// Smallest difference representable by an IMAP value of `length` bytes.
pub fn imap_precision(min: f64, max: f64, length: usize) -> Result<f64, KlvError> {
    check_domain(min, max, length)?;
    Ok(((max - min).log2() - 8.0 * length as f64 + 1.0).exp2())
}

/// Number of bytes needed to reach `precision` over `[min, max]`.
pub fn imap_length(min: f64, max: f64, precision: f64) -> Result<usize, KlvError> {
    check_domain(min, max, 1)?;
    if !(precision.is_finite() && precision > 0.0) {
        return Err(KlvError::new(
            ERR_FORMAT,
            format!("invalid IMAP precision {precision}"),
        ));
    }
    let bits = (max - min).log2().ceil() - precision.log2().floor() + 1.0;
    Ok((bits / 8.0).ceil().max(1.0) as usize)
}

// ── IMAP values ──────────────────────────────────────────────

/// An IMAP field: a real number or one of the reserved bit patterns.
///
/// The special kinds keep everything the wire carried, so a decoded value
/// writes back to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imap {
    /// In-domain value, or an infinity.
    Normal(f64),
    Nan {
        signaling: bool,
        negative: bool,
        payload: u64,
    },
    BelowMinimum,
    AboveMaximum,
    UserDefined(u64),
}

impl Imap {
    pub fn quiet_nan(negative: bool, payload: u64) -> Self {
        Imap::Nan {
            signaling: false,
            negative,
            payload,
        }
    }

    pub fn signaling_nan(negative: bool, payload: u64) -> Self {
        Imap::Nan {
            signaling: true,
            negative,
            payload,
        }
    }

    /// Nearest `f64`.  Out-of-range markers become infinities and every
    /// NaN kind a NaN of the same sign.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Imap::Normal(v) => v,
            Imap::Nan { negative: true, .. } => -f64::NAN,
            Imap::Nan { .. } | Imap::UserDefined(_) => f64::NAN,
            Imap::BelowMinimum => f64::NEG_INFINITY,
            Imap::AboveMaximum => f64::INFINITY,
        }
    }

    /// Bits carried below the five header bits.
    pub fn payload(&self) -> u64 {
        match *self {
            Imap::Nan { payload, .. } | Imap::UserDefined(payload) => payload,
            _ => 0,
        }
    }

    /// Bytes needed to hold the header and payload.
    pub fn min_length(&self) -> usize {
        let payload_bits = (u64::BITS - self.payload().leading_zeros()) as usize;
        (payload_bits + 5).div_ceil(8)
    }
}

impl From<f64> for Imap {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Imap::quiet_nan(value.is_sign_negative(), 0)
        } else {
            Imap::Normal(value)
        }
    }
}

impl fmt::Display for Imap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imap::Normal(v) => write!(f, "{v}"),
            Imap::Nan {
                signaling,
                negative,
                payload,
            } => {
                let sign = if *negative { "-" } else { "" };
                let kind = if *signaling { "snan" } else { "qnan" };
                write!(f, "<{sign}{kind}({payload})>")
            }
            Imap::BelowMinimum => f.write_str("<below-minimum>"),
            Imap::AboveMaximum => f.write_str("<above-maximum>"),
            Imap::UserDefined(payload) => write!(f, "<user-defined({payload})>"),
        }
    }
}

fn nonzero_bits(kind: &str, offset: usize) -> KlvError {
    KlvError::new(ERR_FORMAT, format!("invalid {kind} IMAP value: other bits not zero")).at(offset)
}

/// Decode an IMAP value of `length` bytes over `[min, max]`.
pub fn read_imap(cur: &mut Cursor<'_>, min: f64, max: f64, length: usize) -> Result<Imap, KlvError> {
    let offset = cur.position();
    check_domain(min, max, length).map_err(|e| e.at(offset))?;
    let raw = read_int(cur, length)?;

    // ST 1201 section 8.2.2: MSB plus any other bit marks a special value.
    let msb = 1u64 << (length * 8 - 1);
    if raw & msb != 0 && raw != msb {
        let other_bits_count = length * 8 - 5;
        let other_bits = raw & ((1u64 << other_bits_count) - 1);
        let identifier = (raw >> other_bits_count) & 0b1111;
        return match identifier {
            0b1001 if other_bits != 0 => Err(nonzero_bits("+inf", offset)),
            0b1001 => Ok(Imap::Normal(f64::INFINITY)),
            0b1101 if other_bits != 0 => Err(nonzero_bits("-inf", offset)),
            0b1101 => Ok(Imap::Normal(f64::NEG_INFINITY)),
            0b1010 => Ok(Imap::quiet_nan(false, other_bits)),
            0b1110 => Ok(Imap::quiet_nan(true, other_bits)),
            0b1011 => Ok(Imap::signaling_nan(false, other_bits)),
            0b1111 => Ok(Imap::signaling_nan(true, other_bits)),
            0b1000 => Ok(Imap::UserDefined(other_bits)),
            0b1100 => {
                let rest_count = other_bits_count - 3;
                let rest = other_bits & ((1u64 << rest_count) - 1);
                match (other_bits >> rest_count) & 0b111 {
                    0b000 if rest != 0 => Err(nonzero_bits("below-minimum", offset)),
                    0b000 => Ok(Imap::BelowMinimum),
                    0b001 if rest != 0 => Err(nonzero_bits("above-maximum", offset)),
                    0b001 => Ok(Imap::AboveMaximum),
                    _ => Err(KlvError::new(ERR_FORMAT, "reserved IMAP value").at(offset)),
                }
            }
            _ => Err(KlvError::new(ERR_FORMAT, "reserved IMAP value").at(offset)),
        };
    }

    let terms = imap_terms(min, max, length);
    let mut value = terms.backward_scale * (raw as f64 - terms.zero_offset) + min;

    // Exact zero matters more than the last rounding error.
    let precision = imap_precision(min, max, length)?;
    if value.abs() < precision / 2.0 {
        value = 0.0;
    }
    // The zero offset can push the domain endpoints just past the bounds.
    let step = terms.backward_scale;
    if value < min && value > min - step {
        value = min;
    } else if value > max && value < max + step {
        value = max;
    }
    if value < min || value > max {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("IMAP value {value} outside ({min}, {max})"),
        )
        .at(offset));
    }
    Ok(Imap::Normal(value))
}

/// Encode `value` as an IMAP value of `length` bytes over `[min, max]`.
/// Finite values outside the domain are written as the out-of-range
/// markers.
pub fn write_imap(
    value: impl Into<Imap>,
    min: f64,
    max: f64,
    out: &mut Vec<u8>,
    length: usize,
) -> Result<(), KlvError> {
    check_domain(min, max, length)?;
    let value = value.into();
    if value.min_length() > length {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("IMAP payload of {value} does not fit in {length} bytes"),
        ));
    }
    let shift = (length - 1) * 8;
    let raw = match value {
        Imap::Normal(v) if v.is_infinite() => (if v < 0.0 { 0xE8u64 } else { 0xC8 }) << shift,
        Imap::Normal(v) if v < min => {
            debug!("truncating IMAP({min}, {max}) value {v} to below-minimum");
            0xE0u64 << shift
        }
        Imap::Normal(v) if v > max => {
            debug!("truncating IMAP({min}, {max}) value {v} to above-maximum");
            0xE1u64 << shift
        }
        Imap::Normal(v) if v.is_nan() => 0xD0u64 << shift,
        Imap::Normal(v) => {
            let terms = imap_terms(min, max, length);
            (terms.forward_scale * (v - min) + terms.zero_offset) as u64
        }
        Imap::Nan {
            signaling,
            negative,
            payload,
        } => {
            let header: u64 = match (signaling, negative) {
                (false, false) => 0xD0,
                (false, true) => 0xF0,
                (true, false) => 0xD8,
                (true, true) => 0xF8,
            };
            (header << shift) | payload
        }
        Imap::BelowMinimum => 0xE0u64 << shift,
        Imap::AboveMaximum => 0xE1u64 << shift,
        Imap::UserDefined(payload) => (0xC0u64 << shift) | payload,
    };
    write_int(raw, out, length)
}

// ── FLINT (ST 0601) ──────────────────────────────────────────

fn flint_unsigned_range(length: usize) -> f64 {
    (2.0f64).powi(8 * length as i32) - 1.0
}

fn flint_signed_range(length: usize) -> f64 {
    (2.0f64).powi(8 * length as i32) - 2.0
}

/// Decode an unsigned FLINT of `length` bytes over `[min, max]`.
pub fn read_uflint(cur: &mut Cursor<'_>, min: f64, max: f64, length: usize) -> Result<f64, KlvError> {
    let offset = cur.position();
    check_domain(min, max, length).map_err(|e| e.at(offset))?;
    let raw = read_int(cur, length)?;
    Ok(min + raw as f64 * (max - min) / flint_unsigned_range(length))
}

/// Encode an unsigned FLINT, rounding to the nearest step.
pub fn write_uflint(value: f64, min: f64, max: f64, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
    check_domain(min, max, length)?;
    if !(min..=max).contains(&value) {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("{value} outside FLINT domain ({min}, {max})"),
        ));
    }
    let raw = ((value - min) * flint_unsigned_range(length) / (max - min)).round();
    write_int(raw as u64, out, length)
}

/// Decode a signed FLINT.  The most negative integer is the ST 0601
/// "out of range" marker and decodes as NaN.
pub fn read_sflint(cur: &mut Cursor<'_>, min: f64, max: f64, length: usize) -> Result<f64, KlvError> {
    let offset = cur.position();
    check_domain(min, max, length).map_err(|e| e.at(offset))?;
    let raw = read_sint(cur, length)?;
    let marker = -(1i64 << (length as u32 * 8 - 1));
    if length < 8 && raw == marker {
        return Ok(f64::NAN);
    }
    Ok(raw as f64 * (max - min) / flint_signed_range(length))
}

/// Encode a signed FLINT.  NaN is written as the out-of-range marker.
pub fn write_sflint(value: f64, min: f64, max: f64, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
    check_domain(min, max, length)?;
    if value.is_nan() {
        let marker = (length < 8)
            .then(|| -(1i64 << (length as u32 * 8 - 1)))
            .unwrap_or(i64::MIN);
        return write_sint(marker, out, length);
    }
    if !(min..=max).contains(&value) {
        return Err(KlvError::new(
            ERR_OVERFLOW,
            format!("{value} outside FLINT domain ({min}, {max})"),
        ));
    }
    let raw = (value * flint_signed_range(length) / (max - min)).round();
    write_sint(raw as i64, out, length)
}
