//! Data formats.
//!
//! A [`Format`] knows how to turn the bytes of one field into a [`KlvValue`]
//! and back.  Concrete formats implement the `*_typed` methods; the provided
//! `read`/`write`/`length_of`/`print` wrappers add the behavior shared by
//! every field:
//!
//! - a zero-length field reads as `Empty`, and `Empty` writes nothing;
//! - a field is parsed from a cursor over exactly its declared bytes;
//! - a declared length the format does not allow, a typed parse failure,
//!   or a parse that leaves bytes unread yields a `Blob` of the field's
//!   bytes so the rest of the set stays readable;
//! - a `Blob` value always writes back its raw bytes;
//! - a value decoded from a non-minimal width is written back at that
//!   width when the format can tell it still fits (`length_of_hinted`).

use tracing::{error, warn};

use crate::checksum::ChecksumFormat;
use crate::constants::*;
use crate::errors::*;
use crate::imap::*;
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::registry::{Registry, Standard};
use crate::value::KlvValue;

// ── Context ──────────────────────────────────────────────────

/// Registry and nesting depth threaded through a decode or encode call.
#[derive(Debug, Clone, Copy)]
pub struct Context<'r> {
    registry: &'r Registry,
    depth: u32,
}

impl<'r> Context<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry, depth: 0 }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Context for one level of nesting deeper.
    pub fn descend(&self) -> Result<Context<'r>, KlvError> {
        if self.depth >= MAX_DEPTH {
            return Err(KlvError::new(
                ERR_LIMIT_DEPTH,
                format!("nesting exceeds {MAX_DEPTH} levels"),
            ));
        }
        Ok(Context {
            registry: self.registry,
            depth: self.depth + 1,
        })
    }
}

pub(crate) fn type_error(expected: &str, value: &KlvValue) -> KlvError {
    KlvError::new(
        ERR_TYPE,
        format!("expected {expected}, got {}", value.type_name()),
    )
}

// ── Format trait ─────────────────────────────────────────────

pub trait Format: Send + Sync {
    /// Human description, e.g. "unsigned integer of length must be 2".
    fn description(&self) -> String;

    fn length_constraints(&self) -> &LengthConstraints;

    fn read_typed(
        &self,
        cur: &mut Cursor<'_>,
        length: usize,
        ctx: &Context<'_>,
    ) -> Result<KlvValue, KlvError>;

    fn write_typed(
        &self,
        value: &KlvValue,
        out: &mut Vec<u8>,
        length: usize,
        ctx: &Context<'_>,
    ) -> Result<(), KlvError>;

    /// Natural length of `value` when the constraints do not pin one.
    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError>;

    fn print_typed(&self, value: &KlvValue, _ctx: &Context<'_>) -> String {
        value.to_string()
    }

    /// Checksum trailer carried by packets of this format.
    fn checksum(&self) -> Option<&ChecksumFormat> {
        None
    }

    /// Registry set this format recurses into, if any.
    fn subset(&self) -> Option<Standard> {
        None
    }

    /// Copy of this format bound to the tags written before it in the
    /// enclosing set.  Only formats that describe their neighbors have one.
    fn with_preceding(&self, _tags: &[u64]) -> Option<Box<dyn Format>> {
        None
    }

    /// Tags whose entries must be written immediately before `value`.
    fn preceding_tags(&self, _value: &KlvValue) -> Option<Vec<u64>> {
        None
    }

    fn read(
        &self,
        cur: &mut Cursor<'_>,
        length: usize,
        ctx: &Context<'_>,
    ) -> Result<KlvValue, KlvError> {
        if length == 0 {
            return Ok(KlvValue::Empty);
        }
        let field = cur.sub(length)?;
        let bytes = field.rest();

        let constraints = self.length_constraints();
        if !constraints.do_allow(length) {
            warn!(
                "{}: declared length {length} violates {constraints}; keeping raw bytes",
                self.description()
            );
            return Ok(KlvValue::Blob(bytes.to_vec()));
        }

        let mut typed = field.clone();
        match self.read_typed(&mut typed, length, ctx) {
            Ok(value) if typed.consumed() == length => Ok(value),
            Ok(_) => {
                error!(
                    "{}: parsed {} of {length} bytes; keeping raw bytes",
                    self.description(),
                    typed.consumed()
                );
                Ok(KlvValue::Blob(bytes.to_vec()))
            }
            Err(err) if err.code == ERR_LIMIT_DEPTH => Err(err),
            Err(err) => {
                error!("{}: {err}; keeping raw bytes", self.description());
                Ok(KlvValue::Blob(bytes.to_vec()))
            }
        }
    }

    fn write(
        &self,
        value: &KlvValue,
        out: &mut Vec<u8>,
        length: usize,
        ctx: &Context<'_>,
    ) -> Result<(), KlvError> {
        let start = out.len();
        match value {
            KlvValue::Empty => {}
            KlvValue::Blob(bytes) => write_blob(bytes, out),
            _ => {
                if let Err(err) = self.write_typed(value, out, length, ctx) {
                    out.truncate(start);
                    return Err(err);
                }
            }
        }
        let written = out.len() - start;
        if written != length {
            out.truncate(start);
            return Err(KlvError::new(
                ERR_LENGTH,
                format!("{}: wrote {written} bytes, expected {length}", self.description()),
            ));
        }
        Ok(())
    }

    fn length_of(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        match value {
            KlvValue::Empty => Ok(0),
            KlvValue::Blob(bytes) => Ok(bytes.len()),
            _ => match self.length_constraints().fixed_length() {
                Some(fixed) => Ok(fixed),
                None => self.length_of_typed(value, ctx),
            },
        }
    }

    /// Whether `value` can be written in `length` bytes and read back
    /// unchanged.  Formats without a width choice answer `false`.
    fn fits_length(&self, _value: &KlvValue, _length: usize) -> bool {
        false
    }

    /// Length to write `value` with.  `hint` is the width the value was
    /// decoded from; it wins over the natural length when the constraints
    /// allow it and the value still fits.
    fn length_of_hinted(
        &self,
        value: &KlvValue,
        hint: Option<usize>,
        ctx: &Context<'_>,
    ) -> Result<usize, KlvError> {
        let constraints = self.length_constraints();
        match hint {
            Some(length)
                if value.is_valid()
                    && constraints.fixed_length().is_none()
                    && constraints.do_allow(length)
                    && self.fits_length(value, length) =>
            {
                Ok(length)
            }
            _ => self.length_of(value, ctx),
        }
    }

    fn print(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        match value {
            KlvValue::Empty | KlvValue::Blob(_) => value.to_string(),
            _ => self.print_typed(value, ctx),
        }
    }
}

// ── Blob ─────────────────────────────────────────────────────

/// Opaque bytes.  Also the format of every unknown tag.
#[derive(Debug, Clone, Default)]
pub struct BlobFormat {
    constraints: LengthConstraints,
}

impl BlobFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraints(constraints: LengthConstraints) -> Self {
        Self { constraints }
    }
}

impl Format for BlobFormat {
    fn description(&self) -> String {
        format!("raw bytes of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::Blob(read_blob(cur, length)?))
    }

    fn write_typed(&self, value: &KlvValue, _: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        Err(type_error("blob", value))
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Err(type_error("blob", value))
    }
}

// ── Integers ─────────────────────────────────────────────────

/// Big-endian unsigned integer.
#[derive(Debug, Clone)]
pub struct UintFormat {
    constraints: LengthConstraints,
}

impl UintFormat {
    pub fn new(constraints: LengthConstraints) -> Self {
        Self { constraints }
    }
}

impl Format for UintFormat {
    fn description(&self) -> String {
        format!("unsigned integer of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::UInt(read_int(cur, length)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        write_int(v, out, length)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        Ok(self.constraints.fit(int_length(v)))
    }

    fn fits_length(&self, value: &KlvValue, length: usize) -> bool {
        uint_fits(value, length)
    }
}

fn uint_fits(value: &KlvValue, length: usize) -> bool {
    value
        .as_uint()
        .is_some_and(|v| (int_length(v)..=MAX_INT_LENGTH).contains(&length))
}

/// Big-endian two's complement integer.
#[derive(Debug, Clone)]
pub struct SintFormat {
    constraints: LengthConstraints,
}

impl SintFormat {
    pub fn new(constraints: LengthConstraints) -> Self {
        Self { constraints }
    }
}

impl Format for SintFormat {
    fn description(&self) -> String {
        format!("signed integer of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::SInt(read_sint(cur, length)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_sint().ok_or_else(|| type_error("sint", value))?;
        write_sint(v, out, length)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let v = value.as_sint().ok_or_else(|| type_error("sint", value))?;
        Ok(self.constraints.fit(sint_length(v)))
    }

    fn fits_length(&self, value: &KlvValue, length: usize) -> bool {
        value
            .as_sint()
            .is_some_and(|v| (sint_length(v)..=MAX_INT_LENGTH).contains(&length))
    }
}

/// Unsigned integer in BER-OID form.
#[derive(Debug, Clone, Default)]
pub struct BerOidFormat {
    constraints: LengthConstraints,
}

impl BerOidFormat {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Format for BerOidFormat {
    fn description(&self) -> String {
        format!("BER-OID integer of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::UInt(read_ber_oid(cur)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        write_ber_oid(v, out)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        Ok(ber_oid_length(v))
    }
}

/// Unsigned integer whose values have names.
#[derive(Debug, Clone)]
pub struct EnumFormat {
    name: &'static str,
    constraints: LengthConstraints,
    names: &'static [(u64, &'static str)],
}

impl EnumFormat {
    pub fn new(
        name: &'static str,
        constraints: LengthConstraints,
        names: &'static [(u64, &'static str)],
    ) -> Self {
        Self {
            name,
            constraints,
            names,
        }
    }

    pub fn name_of(&self, value: u64) -> Option<&'static str> {
        self.names
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, name)| *name)
    }

    pub fn value_of(&self, name: &str) -> Option<u64> {
        self.names.iter().find(|(_, n)| *n == name).map(|(v, _)| *v)
    }
}

impl Format for EnumFormat {
    fn description(&self) -> String {
        format!("{} enumeration of {}", self.name, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::UInt(read_int(cur, length)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        write_int(v, out, length)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let v = value.as_uint().ok_or_else(|| type_error("uint", value))?;
        Ok(self.constraints.fit(int_length(v)))
    }

    fn fits_length(&self, value: &KlvValue, length: usize) -> bool {
        uint_fits(value, length)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match value.as_uint() {
            Some(v) => match self.name_of(v) {
                Some(name) => name.to_string(),
                None => format!("Unknown {} ({v})", self.name),
            },
            None => value.to_string(),
        }
    }
}

/// Single-byte boolean.
#[derive(Debug, Clone)]
pub struct BoolFormat {
    constraints: LengthConstraints,
}

impl BoolFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::fixed(1)?,
        })
    }
}

impl Format for BoolFormat {
    fn description(&self) -> String {
        format!("boolean of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::Bool(read_bool(cur)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        match value {
            KlvValue::Bool(b) => {
                write_bool(*b, out);
                Ok(())
            }
            _ => Err(type_error("bool", value)),
        }
    }

    fn length_of_typed(&self, _: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(1)
    }
}

// ── Real numbers ─────────────────────────────────────────────

/// IEEE-754 float of 4 or 8 bytes.
#[derive(Debug, Clone)]
pub struct FloatFormat {
    constraints: LengthConstraints,
}

impl FloatFormat {
    /// 4 or 8 bytes, preferring 8.
    pub fn new() -> Result<Self, KlvError> {
        Self::with_constraints(LengthConstraints::set(&[4, 8])?.with_suggested(8)?)
    }

    pub fn fixed(length: usize) -> Result<Self, KlvError> {
        Self::with_constraints(LengthConstraints::fixed(length)?)
    }

    fn with_constraints(constraints: LengthConstraints) -> Result<Self, KlvError> {
        if ![4, 8].iter().any(|&n| constraints.do_allow(n)) {
            return Err(KlvError::new(
                ERR_REGISTRY,
                format!("float format with {constraints} admits neither 4 nor 8 bytes"),
            ));
        }
        Ok(Self { constraints })
    }
}

impl Format for FloatFormat {
    fn description(&self) -> String {
        format!("IEEE-754 float of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(KlvValue::Float(read_float(cur, length)?))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_float().ok_or_else(|| type_error("float", value))?;
        write_float(v, out, length)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        value.as_float().ok_or_else(|| type_error("float", value))?;
        Ok(self.constraints.suggested_or(8))
    }

    fn fits_length(&self, value: &KlvValue, length: usize) -> bool {
        match (value.as_float(), length) {
            (Some(_), 8) => true,
            (Some(v), 4) => v.is_nan() || f64::from(v as f32) == v,
            _ => false,
        }
    }
}

/// IMAP-mapped real number over `[min, max]`.
#[derive(Debug, Clone)]
pub struct ImapFormat {
    min: f64,
    max: f64,
    constraints: LengthConstraints,
}

impl ImapFormat {
    /// Always `length` bytes.
    pub fn fixed(min: f64, max: f64, length: usize) -> Result<Self, KlvError> {
        Self::checked(min, max, LengthConstraints::fixed(length)?)
    }

    /// Any length from 1 to 8, written with `suggested` bytes.
    pub fn variable(min: f64, max: f64, suggested: usize) -> Result<Self, KlvError> {
        Self::checked(
            min,
            max,
            LengthConstraints::range(1, MAX_INT_LENGTH)?.with_suggested(suggested)?,
        )
    }

    fn checked(min: f64, max: f64, constraints: LengthConstraints) -> Result<Self, KlvError> {
        // Validates the domain.
        imap_precision(min, max, 1).map_err(|e| e.context("IMAP format"))?;
        Ok(Self {
            min,
            max,
            constraints,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Format for ImapFormat {
    fn description(&self) -> String {
        format!(
            "IMAP real number in range ({}, {}) of {}",
            self.min, self.max, self.constraints
        )
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(match read_imap(cur, self.min, self.max, length)? {
            Imap::Normal(v) => KlvValue::Float(v),
            special => KlvValue::Imap(special),
        })
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_imap().ok_or_else(|| type_error("float", value))?;
        write_imap(v, self.min, self.max, out, length)
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let v = value.as_imap().ok_or_else(|| type_error("float", value))?;
        Ok(self.constraints.suggested_or(MAX_INT_LENGTH).max(v.min_length()))
    }

    fn fits_length(&self, value: &KlvValue, length: usize) -> bool {
        value
            .as_imap()
            .is_some_and(|v| (v.min_length()..=MAX_INT_LENGTH).contains(&length))
    }
}

/// ST 0601 linearly mapped real number.
#[derive(Debug, Clone)]
pub struct FlintFormat {
    signed: bool,
    min: f64,
    max: f64,
    constraints: LengthConstraints,
}

impl FlintFormat {
    /// Unsigned mapping of `[min, max]` onto `length` bytes.
    pub fn unsigned(min: f64, max: f64, length: usize) -> Result<Self, KlvError> {
        Self::checked(false, min, max, length)
    }

    /// Signed mapping of `[-bound, bound]` onto `length` bytes.
    pub fn signed(bound: f64, length: usize) -> Result<Self, KlvError> {
        Self::checked(true, -bound, bound, length)
    }

    fn checked(signed: bool, min: f64, max: f64, length: usize) -> Result<Self, KlvError> {
        if !(min < max) || length > MAX_INT_LENGTH {
            return Err(KlvError::new(
                ERR_REGISTRY,
                format!("invalid FLINT ({min}, {max}) of {length} bytes"),
            ));
        }
        Ok(Self {
            signed,
            min,
            max,
            constraints: LengthConstraints::fixed(length)?,
        })
    }
}

impl Format for FlintFormat {
    fn description(&self) -> String {
        let kind = if self.signed { "signed" } else { "unsigned" };
        format!(
            "{kind} mapped real number in range ({}, {}) of {}",
            self.min, self.max, self.constraints
        )
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let v = if self.signed {
            read_sflint(cur, self.min, self.max, length)?
        } else {
            read_uflint(cur, self.min, self.max, length)?
        };
        Ok(KlvValue::Float(v))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let v = value.as_float().ok_or_else(|| type_error("float", value))?;
        if self.signed {
            write_sflint(v, self.min, self.max, out, length)
        } else {
            write_uflint(v, self.min, self.max, out, length)
        }
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        value.as_float().ok_or_else(|| type_error("float", value))?;
        Ok(self.constraints.fixed_or(MAX_INT_LENGTH))
    }
}

// ── Records ──────────────────────────────────────────────────
// Helpers for pack formats whose value is a `KlvValue::Record`.

/// Look up a required field of a record value.
pub fn record_field<'v>(value: &'v KlvValue, name: &str) -> Result<&'v KlvValue, KlvError> {
    match value {
        KlvValue::Record(_) => value
            .field(name)
            .ok_or_else(|| KlvError::new(ERR_TYPE, format!("record is missing field {name:?}"))),
        _ => Err(type_error("record", value)),
    }
}

pub fn record_uint(value: &KlvValue, name: &str) -> Result<u64, KlvError> {
    let field = record_field(value, name)?;
    field
        .as_uint()
        .ok_or_else(|| type_error("uint", field).context(name))
}

pub fn record_float(value: &KlvValue, name: &str) -> Result<f64, KlvError> {
    let field = record_field(value, name)?;
    field
        .as_float()
        .ok_or_else(|| type_error("float", field).context(name))
}

pub fn record_bool(value: &KlvValue, name: &str) -> Result<bool, KlvError> {
    let field = record_field(value, name)?;
    field
        .as_bool()
        .ok_or_else(|| type_error("bool", field).context(name))
}

pub fn record_str<'v>(value: &'v KlvValue, name: &str) -> Result<&'v str, KlvError> {
    let field = record_field(value, name)?;
    field
        .as_str()
        .ok_or_else(|| type_error("string", field).context(name))
}

pub fn record_series<'v>(value: &'v KlvValue, name: &str) -> Result<&'v [KlvValue], KlvError> {
    let field = record_field(value, name)?;
    field
        .as_series()
        .ok_or_else(|| type_error("series", field).context(name))
}

/// Optional field: absent and `Empty` both read as `None`.
pub fn record_optional<'v>(value: &'v KlvValue, name: &str) -> Result<Option<&'v KlvValue>, KlvError> {
    match value {
        KlvValue::Record(_) => Ok(value.field(name).filter(|v| !matches!(v, KlvValue::Empty))),
        _ => Err(type_error("record", value)),
    }
}
