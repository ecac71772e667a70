//! ST1303 multi-dimensional array pack (MDAP).
//!
//! An MDAP starts with a BER-OID header: dimension count, the size of each
//! dimension and the element size.  A one-byte array processing algorithm
//! (APA) follows, then its parameters, then the elements in row-major
//! order.  The decoded value is a record; [`Mdap`] converts to and from it.

use std::cmp::Ordering;
use std::fmt;

use crate::constants::MAX_MDAP_ELEMENTS;
use crate::errors::*;
use crate::format::{record_field, record_uint, type_error, Context, Format};
use crate::imap::{read_imap, write_imap, Imap};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::value::KlvValue;

// ── Array processing algorithms ──────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apa {
    /// Elements in their own encoding, `element_size` bytes each.
    Natural = 1,
    /// Floats mapped onto integers over bounds carried in the parameters.
    Imap = 2,
    /// One bit per element.
    Boolean = 3,
    /// BER-OID offsets from a BER-OID bias.
    Uint = 4,
    /// A default element plus rectangular runs of other values.
    Rle = 5,
}

impl Apa {
    pub fn from_byte(byte: u8) -> Option<Apa> {
        match byte {
            1 => Some(Apa::Natural),
            2 => Some(Apa::Imap),
            3 => Some(Apa::Boolean),
            4 => Some(Apa::Uint),
            5 => Some(Apa::Rle),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Apa::Natural => "Natural",
            Apa::Imap => "IMAP",
            Apa::Boolean => "Boolean",
            Apa::Uint => "Unsigned Integer",
            Apa::Rle => "Run-Length Encoding",
        }
    }
}

impl fmt::Display for Apa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Element types ────────────────────────────────────────────

/// What the elements of an array are.  Decides which APAs apply and how
/// `Natural` and `Rle` elements are encoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MdapElement {
    UInt,
    SInt,
    Float,
    Bool,
    /// Floats over a fixed domain; `Natural` elements are IMAP encoded.
    Imap { min: f64, max: f64 },
}

impl MdapElement {
    fn name(self) -> &'static str {
        match self {
            MdapElement::UInt => "uint",
            MdapElement::SInt => "sint",
            MdapElement::Float => "float",
            MdapElement::Bool => "bool",
            MdapElement::Imap { .. } => "IMAP",
        }
    }

    fn allows(self, apa: Apa) -> bool {
        match apa {
            Apa::Natural | Apa::Rle => true,
            Apa::Imap => matches!(self, MdapElement::Float | MdapElement::Imap { .. }),
            Apa::Boolean => self == MdapElement::Bool,
            Apa::Uint => self == MdapElement::UInt,
        }
    }

    fn read(self, cur: &mut Cursor<'_>, length: usize) -> Result<KlvValue, KlvError> {
        Ok(match self {
            MdapElement::UInt => KlvValue::UInt(read_int(cur, length)?),
            MdapElement::SInt => KlvValue::SInt(read_sint(cur, length)?),
            MdapElement::Float => KlvValue::Float(read_float(cur, length)?),
            MdapElement::Imap { min, max } => imap_value(read_imap(cur, min, max, length)?),
            MdapElement::Bool if length == 1 => KlvValue::Bool(read_bool(cur)?),
            MdapElement::Bool => {
                return Err(KlvError::new(
                    ERR_FORMAT,
                    format!("boolean element of {length} bytes"),
                )
                .at(cur.position()))
            }
        })
    }

    fn write(self, value: &KlvValue, out: &mut Vec<u8>, length: usize) -> Result<(), KlvError> {
        match (self, value) {
            (MdapElement::UInt, KlvValue::UInt(v)) => write_int(*v, out, length),
            (MdapElement::SInt, KlvValue::SInt(v)) => write_sint(*v, out, length),
            (MdapElement::Float, KlvValue::Float(v)) => write_float(*v, out, length),
            (MdapElement::Imap { min, max }, _) => match value.as_imap() {
                Some(v) => write_imap(v, min, max, out, length),
                None => Err(type_error("float", value)),
            },
            (MdapElement::Bool, KlvValue::Bool(v)) if length == 1 => {
                write_bool(*v, out);
                Ok(())
            }
            (MdapElement::Bool, KlvValue::Bool(_)) => Err(KlvError::new(
                ERR_FORMAT,
                format!("boolean element of {length} bytes"),
            )),
            _ => Err(type_error(self.name(), value)),
        }
    }
}

pub(crate) fn imap_value(value: Imap) -> KlvValue {
    match value {
        Imap::Normal(v) => KlvValue::Float(v),
        special => KlvValue::Imap(special),
    }
}

// ── Values ───────────────────────────────────────────────────

/// A decoded multi-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Mdap {
    pub sizes: Vec<usize>,
    /// Row-major; the last dimension varies fastest.
    pub elements: Vec<KlvValue>,
    pub element_size: usize,
    pub apa: Apa,
    pub apa_params_length: usize,
    /// Domain of `Imap` arrays.
    pub imap_bounds: Option<(f64, f64)>,
}

impl Mdap {
    pub fn natural(sizes: Vec<usize>, elements: Vec<KlvValue>, element_size: usize) -> Self {
        Self {
            sizes,
            elements,
            element_size,
            apa: Apa::Natural,
            apa_params_length: 0,
            imap_bounds: None,
        }
    }

    /// IMAP array with its bounds written as 4-byte floats.
    pub fn imap(sizes: Vec<usize>, elements: Vec<KlvValue>, element_size: usize, min: f64, max: f64) -> Self {
        Self {
            sizes,
            elements,
            element_size,
            apa: Apa::Imap,
            apa_params_length: 8,
            imap_bounds: Some((min, max)),
        }
    }

    pub fn boolean(sizes: Vec<usize>, elements: Vec<KlvValue>) -> Self {
        Self {
            sizes,
            elements,
            element_size: 1,
            apa: Apa::Boolean,
            apa_params_length: 0,
            imap_bounds: None,
        }
    }

    /// Unsigned array biased by its smallest element.
    pub fn uint(sizes: Vec<usize>, elements: Vec<KlvValue>) -> Self {
        let bias = elements.iter().filter_map(KlvValue::as_uint).min().unwrap_or(0);
        Self {
            sizes,
            elements,
            element_size: 1,
            apa: Apa::Uint,
            apa_params_length: ber_oid_length(bias),
            imap_bounds: None,
        }
    }

    pub fn rle(sizes: Vec<usize>, elements: Vec<KlvValue>, element_size: usize) -> Self {
        Self {
            sizes,
            elements,
            element_size,
            apa: Apa::Rle,
            apa_params_length: element_size,
            imap_bounds: None,
        }
    }

    /// Number of elements the sizes call for.
    pub fn count(&self) -> Option<usize> {
        self.sizes.iter().try_fold(1usize, |total, &size| total.checked_mul(size))
    }

    pub fn to_value(&self) -> KlvValue {
        let uint = |n: usize| KlvValue::UInt(n as u64);
        let mut fields = vec![
            (
                "sizes".to_string(),
                KlvValue::Series(self.sizes.iter().map(|&n| uint(n)).collect()),
            ),
            ("element_size".to_string(), uint(self.element_size)),
            ("apa".to_string(), KlvValue::UInt(self.apa as u64)),
            ("apa_params_length".to_string(), uint(self.apa_params_length)),
        ];
        if let Some((min, max)) = self.imap_bounds {
            fields.push(("imap_minimum".to_string(), KlvValue::Float(min)));
            fields.push(("imap_maximum".to_string(), KlvValue::Float(max)));
        }
        fields.push(("elements".to_string(), KlvValue::Series(self.elements.clone())));
        KlvValue::Record(fields)
    }

    pub fn from_value(value: &KlvValue) -> Result<Self, KlvError> {
        let size = |name: &str| -> Result<usize, KlvError> {
            let n = record_uint(value, name)?;
            usize::try_from(n).map_err(|_| KlvError::new(ERR_OVERFLOW, format!("{name} {n} too large")))
        };
        let sizes_field = record_field(value, "sizes")?;
        let sizes = sizes_field
            .as_series()
            .ok_or_else(|| type_error("series", sizes_field).context("sizes"))?
            .iter()
            .map(|n| {
                n.as_uint()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| type_error("uint", n).context("sizes"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let elements_field = record_field(value, "elements")?;
        let elements = elements_field
            .as_series()
            .ok_or_else(|| type_error("series", elements_field).context("elements"))?
            .to_vec();
        let apa_byte = record_uint(value, "apa")?;
        let apa = u8::try_from(apa_byte)
            .ok()
            .and_then(Apa::from_byte)
            .ok_or_else(|| KlvError::new(ERR_FORMAT, format!("unknown MDAP APA {apa_byte}")))?;
        let imap_bounds = match (value.field("imap_minimum"), value.field("imap_maximum")) {
            (Some(min), Some(max)) => Some((
                min.as_float().ok_or_else(|| type_error("float", min).context("imap_minimum"))?,
                max.as_float().ok_or_else(|| type_error("float", max).context("imap_maximum"))?,
            )),
            _ => None,
        };
        Ok(Self {
            sizes,
            elements,
            element_size: size("element_size")?,
            apa,
            apa_params_length: size("apa_params_length")?,
            imap_bounds,
        })
    }
}

impl From<Mdap> for KlvValue {
    fn from(mdap: Mdap) -> Self {
        mdap.to_value()
    }
}

// Distance in elements between neighbors along each dimension.
fn deltas(sizes: &[usize]) -> Vec<usize> {
    let mut deltas = vec![1usize; sizes.len()];
    for i in (0..sizes.len().saturating_sub(1)).rev() {
        deltas[i] = deltas[i + 1] * sizes[i + 1];
    }
    deltas
}

fn read_size(cur: &mut Cursor<'_>, what: &str) -> Result<usize, KlvError> {
    let offset = cur.position();
    let n = read_ber_oid(cur)?;
    usize::try_from(n).map_err(|_| KlvError::new(ERR_OVERFLOW, format!("MDAP {what} {n} too large")).at(offset))
}

// ── Run-length encoding ──────────────────────────────────────
// Rectangular runs are grown one row at a time.  A run that starts right
// below an unfinished run of the same value is its child; once the child
// spans the parent's full width it is absorbed as the parent's next row.

struct RleRun {
    value: KlvValue,
    coordinates: Vec<usize>,
    run_lengths: Vec<usize>,
    parent: Option<usize>,
    // Dimension, counted from the last, this run is looking to grow along.
    rank: usize,
}

impl RleRun {
    fn new(value: KlvValue, coordinates: &[usize], parent: Option<usize>) -> Self {
        Self {
            value,
            coordinates: coordinates.to_vec(),
            run_lengths: vec![1; coordinates.len()],
            parent,
            rank: 0,
        }
    }

    fn update_rank(&mut self, coords: &[usize]) {
        let n = coords.len();
        for i in 0..n.saturating_sub(self.rank + 1) {
            let end = self.coordinates[i] + self.run_lengths[i];
            if coords[i] >= end {
                self.rank = n - i - 1;
                break;
            }
            if coords[i] < end - 1 {
                break;
            }
        }
    }

    fn done(&self) -> bool {
        self.rank == self.coordinates.len()
    }

    fn grow_index(&self) -> usize {
        self.run_lengths.len() - self.rank - 1
    }

    // Could the element at `coords` start a new row of this run?
    fn starts_child(&mut self, coords: &[usize]) -> bool {
        self.update_rank(coords);
        if self.done() || self.rank == 0 {
            return false;
        }
        let grow = self.grow_index();
        coords.iter().enumerate().all(|(i, &c)| {
            let extra = if i == grow { self.run_lengths[i] } else { 0 };
            c == self.coordinates[i] + extra
        })
    }

    // Could the element at `coords` finish a new row of this run?
    fn ends_child(&mut self, coords: &[usize]) -> bool {
        self.update_rank(coords);
        if self.done() {
            return false;
        }
        let grow = self.grow_index();
        coords.iter().enumerate().all(|(i, &c)| {
            let back = if i == grow { 0 } else { 1 };
            c + back == self.coordinates[i] + self.run_lengths[i]
        })
    }
}

// Most common element; ties go to the smallest.
fn default_element(elements: &[KlvValue]) -> Option<&KlvValue> {
    let mut counts: Vec<(&KlvValue, usize)> = Vec::new();
    for element in elements {
        match counts.iter_mut().find(|(e, _)| *e == element) {
            Some((_, n)) => *n += 1,
            None => counts.push((element, 1)),
        }
    }
    counts
        .into_iter()
        .min_by(|(a, m), (b, n)| n.cmp(m).then_with(|| element_order(a, b)))
        .map(|(e, _)| e)
}

fn element_order(a: &KlvValue, b: &KlvValue) -> Ordering {
    match (a, b) {
        (KlvValue::UInt(x), KlvValue::UInt(y)) => x.cmp(y),
        (KlvValue::SInt(x), KlvValue::SInt(y)) => x.cmp(y),
        (KlvValue::Float(x), KlvValue::Float(y)) => x.total_cmp(y),
        (KlvValue::Bool(x), KlvValue::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn rle_encode(sizes: &[usize], elements: &[KlvValue], default: &KlvValue) -> Vec<RleRun> {
    let deltas = deltas(sizes);
    let last_column = sizes.last().map_or(0, |n| n.saturating_sub(1));
    let mut coords = vec![0usize; sizes.len()];

    let mut finished: Vec<RleRun> = Vec::new();
    // Unfinished runs in creation order; `None` marks absorbed slots.
    let mut open: Vec<Option<RleRun>> = Vec::new();
    let mut current: Option<usize> = None;

    // Absorb the current run into its ancestors as far as it completes them.
    fn complete(open: &mut [Option<RleRun>], current: &mut Option<usize>, coords: &[usize]) {
        let Some(mut child) = current.take() else {
            return;
        };
        while let Some(parent) = open[child].as_ref().and_then(|run| run.parent) {
            let Some(run) = open[parent].as_mut() else {
                break;
            };
            if !run.ends_child(coords) {
                break;
            }
            let grow = run.grow_index();
            run.run_lengths[grow] += 1;
            open[child] = None;
            child = parent;
        }
    }

    fn interrupt(open: &mut [Option<RleRun>], current: &mut Option<usize>) {
        if let Some(i) = current.take() {
            if let Some(run) = open[i].as_mut() {
                run.parent = None;
            }
        }
    }

    for (i, element) in elements.iter().enumerate() {
        if element == default {
            interrupt(&mut open, &mut current);
            continue;
        }

        let mut rest = i;
        for (c, delta) in coords.iter_mut().zip(&deltas) {
            *c = rest / delta;
            rest %= delta;
        }

        let continuing = match current {
            Some(c) => open[c].as_mut().filter(|run| run.value == *element),
            None => None,
        };
        if let Some(run) = continuing {
            if let Some(last) = run.run_lengths.last_mut() {
                *last += 1;
            }
        } else {
            interrupt(&mut open, &mut current);
            let mut parent = None;
            for (index, slot) in open.iter_mut().enumerate() {
                let Some(run) = slot else { continue };
                if run.starts_child(&coords) {
                    if run.value == *element {
                        parent = Some(index);
                        break;
                    }
                } else if run.done() {
                    finished.extend(slot.take());
                }
            }
            open.push(Some(RleRun::new(element.clone(), &coords, parent)));
            current = Some(open.len() - 1);
        }

        // A run that reached its parent's width, or the end of a row, is
        // complete.
        let parent = current.and_then(|c| open[c].as_ref().and_then(|run| run.parent));
        let at_end = match parent {
            Some(p) => open[p].as_mut().is_some_and(|run| run.ends_child(&coords)),
            None => coords.last() == Some(&last_column),
        };
        if at_end {
            complete(&mut open, &mut current, &coords);
        }
    }
    complete(&mut open, &mut current, &coords);
    finished.extend(open.into_iter().flatten());
    finished
}

// ── MDAP format ──────────────────────────────────────────────

/// Multi-dimensional array of `element` values.
#[derive(Debug, Clone)]
pub struct MdapFormat {
    element: MdapElement,
    constraints: LengthConstraints,
}

impl MdapFormat {
    pub fn new(element: MdapElement) -> Self {
        Self {
            element,
            constraints: LengthConstraints::free(),
        }
    }

    pub fn read_mdap(&self, cur: &mut Cursor<'_>, length: usize) -> Result<Mdap, KlvError> {
        let start = cur.position();
        let used = |cur: &Cursor<'_>| cur.position() - start;

        let ndims = read_size(cur, "dimension count")?;
        if ndims == 0 {
            return Err(KlvError::new(ERR_FORMAT, "MDAP has no dimensions").at(start));
        }
        let mut sizes = Vec::new();
        for _ in 0..ndims {
            let offset = cur.position();
            let size = read_size(cur, "dimension size")?;
            if size == 0 {
                return Err(KlvError::new(ERR_FORMAT, "MDAP dimension of size zero").at(offset));
            }
            sizes.push(size);
        }
        let count = sizes
            .iter()
            .try_fold(1usize, |total, &size| total.checked_mul(size))
            .filter(|&n| n <= MAX_MDAP_ELEMENTS)
            .ok_or_else(|| KlvError::new(ERR_FORMAT, "MDAP has too many elements").at(start))?;
        let element_size = read_size(cur, "element size")?;
        let offset = cur.position();
        let byte = cur.read_u8()?;
        let apa = Apa::from_byte(byte)
            .ok_or_else(|| KlvError::new(ERR_FORMAT, format!("unknown MDAP APA {byte}")).at(offset))?;
        if !self.element.allows(apa) {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!("APA {apa} does not apply to {} elements", self.element.name()),
            )
            .at(offset));
        }

        let remaining = length
            .checked_sub(used(cur))
            .ok_or_else(|| KlvError::new(ERR_LENGTH, "MDAP header overruns field").at(start))?;
        let mut mdap = Mdap {
            sizes,
            elements: Vec::new(),
            element_size,
            apa,
            apa_params_length: 0,
            imap_bounds: None,
        };
        let elements = &mut mdap.elements;
        match apa {
            Apa::Natural => {
                check_fits(count, element_size, remaining, offset)?;
                for _ in 0..count {
                    elements.push(self.element.read(cur, element_size)?);
                }
            }
            Apa::Imap => {
                let data = check_fits(count, element_size, remaining, offset)?;
                let params = remaining - data;
                mdap.apa_params_length = params;
                let min = read_float(cur, params / 2)?;
                let max = read_float(cur, params / 2)?;
                mdap.imap_bounds = Some((min, max));
                for _ in 0..count {
                    elements.push(imap_value(read_imap(cur, min, max, element_size)?));
                }
            }
            Apa::Uint => {
                mdap.element_size = 1;
                let bias = read_ber_oid(cur)?;
                mdap.apa_params_length = ber_oid_length(bias);
                for _ in 0..count {
                    let offset = cur.position();
                    let v = read_ber_oid(cur)?
                        .checked_add(bias)
                        .ok_or_else(|| KlvError::new(ERR_OVERFLOW, "MDAP element overflows").at(offset))?;
                    elements.push(KlvValue::UInt(v));
                }
            }
            Apa::Boolean => {
                let bytes = cur.take(count.div_ceil(8))?;
                elements.extend((0..count).map(|i| KlvValue::Bool(bytes[i / 8] & (0x80 >> (i % 8)) != 0)));
            }
            Apa::Rle => {
                mdap.apa_params_length = element_size;
                let default = self.element.read(cur, element_size)?;
                *elements = vec![default; count];
                let deltas = deltas(&mdap.sizes);
                while used(cur) < length {
                    let offset = cur.position();
                    let value = self.element.read(cur, element_size)?;
                    let mut coordinates = Vec::with_capacity(ndims);
                    for _ in 0..ndims {
                        coordinates.push(read_size(cur, "coordinate")?);
                    }
                    let mut run_lengths = Vec::with_capacity(ndims);
                    for _ in 0..ndims {
                        run_lengths.push(read_size(cur, "run length")?);
                    }
                    let inside = (0..ndims).all(|k| {
                        run_lengths[k] > 0
                            && coordinates[k]
                                .checked_add(run_lengths[k])
                                .is_some_and(|end| end <= mdap.sizes[k])
                    });
                    if !inside {
                        return Err(KlvError::new(ERR_FORMAT, "MDAP run leaves the array").at(offset));
                    }
                    fill_run(elements, &deltas, &coordinates, &run_lengths, &value);
                }
            }
        }
        Ok(mdap)
    }

    fn encode(&self, mdap: &Mdap) -> Result<Vec<u8>, KlvError> {
        if !self.element.allows(mdap.apa) {
            return Err(KlvError::new(
                ERR_TYPE,
                format!("APA {} does not apply to {} elements", mdap.apa, self.element.name()),
            ));
        }
        if mdap.sizes.is_empty() || mdap.sizes.contains(&0) {
            return Err(KlvError::new(ERR_FORMAT, "MDAP needs at least one non-empty dimension"));
        }
        if mdap.count() != Some(mdap.elements.len()) {
            return Err(KlvError::new(
                ERR_LENGTH,
                format!("MDAP of sizes {:?} holds {} elements", mdap.sizes, mdap.elements.len()),
            ));
        }

        let element_size = if mdap.apa == Apa::Uint { 1 } else { mdap.element_size };
        let mut out = Vec::new();
        write_ber_oid(mdap.sizes.len() as u64, &mut out)?;
        for &size in &mdap.sizes {
            write_ber_oid(size as u64, &mut out)?;
        }
        write_ber_oid(element_size as u64, &mut out)?;
        out.push(mdap.apa as u8);

        match mdap.apa {
            Apa::Natural => {
                for element in &mdap.elements {
                    self.element.write(element, &mut out, element_size)?;
                }
            }
            Apa::Imap => {
                let (min, max) = mdap
                    .imap_bounds
                    .ok_or_else(|| KlvError::new(ERR_TYPE, "IMAP MDAP is missing its bounds"))?;
                let params = mdap.apa_params_length;
                write_float(min, &mut out, params / 2)?;
                write_float(max, &mut out, params / 2)?;
                for element in &mdap.elements {
                    let v = element.as_imap().ok_or_else(|| type_error("float", element))?;
                    write_imap(v, min, max, &mut out, element_size)?;
                }
            }
            Apa::Uint => {
                let values = mdap
                    .elements
                    .iter()
                    .map(|e| e.as_uint().ok_or_else(|| type_error("uint", e)))
                    .collect::<Result<Vec<_>, _>>()?;
                let bias = values.iter().copied().min().unwrap_or(0);
                write_ber_oid(bias, &mut out)?;
                for v in values {
                    write_ber_oid(v - bias, &mut out)?;
                }
            }
            Apa::Boolean => {
                for chunk in mdap.elements.chunks(8) {
                    let mut byte = 0u8;
                    for (i, element) in chunk.iter().enumerate() {
                        match element {
                            KlvValue::Bool(true) => byte |= 0x80 >> i,
                            KlvValue::Bool(false) => {}
                            _ => return Err(type_error("bool", element)),
                        }
                    }
                    out.push(byte);
                }
            }
            Apa::Rle => {
                let default = default_element(&mdap.elements)
                    .ok_or_else(|| KlvError::new(ERR_FORMAT, "RLE MDAP has no elements"))?;
                self.element.write(default, &mut out, element_size)?;
                for run in rle_encode(&mdap.sizes, &mdap.elements, default) {
                    self.element.write(&run.value, &mut out, element_size)?;
                    for &c in &run.coordinates {
                        write_ber_oid(c as u64, &mut out)?;
                    }
                    for &n in &run.run_lengths {
                        write_ber_oid(n as u64, &mut out)?;
                    }
                }
            }
        }
        Ok(out)
    }
}

fn check_fits(count: usize, element_size: usize, remaining: usize, offset: usize) -> Result<usize, KlvError> {
    count
        .checked_mul(element_size)
        .filter(|&n| n <= remaining)
        .ok_or_else(|| KlvError::new(ERR_LENGTH, "MDAP elements overrun field").at(offset))
}

fn fill_run(elements: &mut [KlvValue], deltas: &[usize], start: &[usize], run_lengths: &[usize], value: &KlvValue) {
    let mut offsets = vec![0usize; run_lengths.len()];
    loop {
        let index: usize = (0..deltas.len()).map(|k| (start[k] + offsets[k]) * deltas[k]).sum();
        elements[index] = value.clone();
        // Odometer over the run, last dimension fastest.
        let mut k = run_lengths.len();
        loop {
            if k == 0 {
                return;
            }
            k -= 1;
            offsets[k] += 1;
            if offsets[k] < run_lengths[k] {
                break;
            }
            offsets[k] = 0;
        }
    }
}

impl Format for MdapFormat {
    fn description(&self) -> String {
        format!("ST1303 MDAP of {} of {}", self.element.name(), self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        Ok(self.read_mdap(cur, length)?.to_value())
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        out.extend(self.encode(&Mdap::from_value(value)?)?);
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(self.encode(&Mdap::from_value(value)?)?.len())
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match Mdap::from_value(value) {
            Ok(mdap) => print_mdap(&mdap),
            Err(_) => value.to_string(),
        }
    }
}

pub(crate) fn print_mdap(mdap: &Mdap) -> String {
    let sizes: Vec<String> = mdap.sizes.iter().map(ToString::to_string).collect();
    let elements: Vec<String> = mdap.elements.iter().map(ToString::to_string).collect();
    format!(
        "{{ sizes: ({}), apa: {}, elements: ({}) }}",
        sizes.join(", "),
        mdap.apa,
        elements.join(", ")
    )
}
