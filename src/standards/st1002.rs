//! ST1002 range motion imagery local set.
//!
//! Range images are carried in section data packs: a grid position, an
//! ST1303 array of range measurements, an optional array of their
//! uncertainties, and up to three plane-fit coefficients.  Each part is
//! preceded by its BER length.  Trailing coefficients that are absent are
//! left off entirely; an absent field ahead of a present one is written as
//! an empty value.

use super::st1303::{MdapElement, MdapFormat};
use super::uint;
use crate::errors::*;
use crate::format::{record_field, record_optional, record_uint, type_error, BerOidFormat, Context, Format, FloatFormat};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::registry::Standard;
use crate::set::LocalSetFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};
use crate::value::KlvValue;

pub const COMPRESSION_METHODS: &[(u64, &str)] = &[(0, "None"), (1, "Planar Fit")];

pub const DATA_TYPES: &[(u64, &str)] = &[(0, "Perspective Range Image"), (1, "Depth Range Image")];

pub const SOURCES: &[(u64, &str)] = &[(0, "Computationally Extracted"), (1, "Range Sensor")];

fn name_in(names: &'static [(u64, &'static str)], value: u64) -> &'static str {
    names
        .iter()
        .find(|(v, _)| *v == value)
        .map_or("Unknown", |(_, name)| *name)
}

// ── Range image enumerations ─────────────────────────────────

/// Compression method, data type and source packed into one BER-OID byte.
#[derive(Debug, Clone)]
pub struct EnumerationsFormat {
    constraints: LengthConstraints,
}

impl EnumerationsFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::fixed(1)?,
        })
    }
}

impl Format for EnumerationsFormat {
    fn description(&self) -> String {
        format!("range image enumerations of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let bits = read_ber_oid(cur)?;
        Ok(KlvValue::Record(vec![
            ("compression_method".to_string(), KlvValue::UInt(bits & 0x7)),
            ("data_type".to_string(), KlvValue::UInt((bits >> 3) & 0x7)),
            ("source".to_string(), KlvValue::UInt((bits >> 6) & 0x1)),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let compression = record_uint(value, "compression_method")?;
        let data_type = record_uint(value, "data_type")?;
        let source = record_uint(value, "source")?;
        if compression > 0x7 || data_type > 0x7 || source > 0x1 {
            return Err(KlvError::new(
                ERR_OVERFLOW,
                format!("range image enumerations ({compression}, {data_type}, {source}) do not fit one byte"),
            ));
        }
        write_ber_oid((source << 6) | (data_type << 3) | compression, out)
    }

    fn length_of_typed(&self, _: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(1)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match (
            record_uint(value, "compression_method"),
            record_uint(value, "data_type"),
            record_uint(value, "source"),
        ) {
            (Ok(compression), Ok(data_type), Ok(source)) => format!(
                "{{ compression method: {}, data type: {}, source: {} }}",
                name_in(COMPRESSION_METHODS, compression),
                name_in(DATA_TYPES, data_type),
                name_in(SOURCES, source),
            ),
            _ => value.to_string(),
        }
    }
}

// ── Section data pack ────────────────────────────────────────

const PLANE_FIELDS: [&str; 3] = ["plane_x_scale", "plane_y_scale", "plane_constant"];

/// One section of a range image.
pub struct SectionDataPackFormat {
    index: BerOidFormat,
    mdap: MdapFormat,
    plane: FloatFormat,
    constraints: LengthConstraints,
}

impl SectionDataPackFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            index: BerOidFormat::new(),
            mdap: MdapFormat::new(MdapElement::Float),
            plane: FloatFormat::new()?,
            constraints: LengthConstraints::free(),
        })
    }

    // Read one length-prefixed field; the whole value must be consumed.
    fn read_lv(&self, cur: &mut Cursor<'_>, format: &dyn Format, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let offset = cur.position();
        let length = read_ber(cur)?;
        let length = usize::try_from(length)
            .ok()
            .filter(|&n| n <= cur.remaining())
            .ok_or_else(|| KlvError::new(ERR_LENGTH, format!("field of {length} bytes overruns pack")).at(offset))?;
        if length == 0 {
            return Ok(KlvValue::Empty);
        }
        let mut field = cur.sub(length)?;
        let value = format.read_typed(&mut field, length, ctx)?;
        if !field.is_empty() {
            return Err(KlvError::new(
                ERR_LENGTH,
                format!("{} left {} bytes unread", format.description(), field.remaining()),
            )
            .at(offset));
        }
        Ok(value)
    }

    fn write_lv(&self, value: &KlvValue, format: &dyn Format, out: &mut Vec<u8>, ctx: &Context<'_>) -> Result<(), KlvError> {
        let length = format.length_of(value, ctx)?;
        write_ber(length as u64, out);
        format.write(value, out, length, ctx)
    }

    fn length_of_lv(&self, value: &KlvValue, format: &dyn Format, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let length = format.length_of(value, ctx)?;
        Ok(ber_length(length as u64) + length)
    }

    // Plane coefficients up to and including the last present one.
    fn planes<'v>(&self, value: &'v KlvValue) -> Result<Vec<&'v KlvValue>, KlvError> {
        let mut planes = Vec::new();
        for name in PLANE_FIELDS {
            let field = match record_optional(value, name)? {
                Some(field @ KlvValue::Float(_)) => field,
                Some(other) => return Err(type_error("float", other).context(name)),
                None => &KlvValue::Empty,
            };
            planes.push(field);
        }
        while planes.last().is_some_and(|field| matches!(field, KlvValue::Empty)) {
            planes.pop();
        }
        Ok(planes)
    }

    fn uncertainty<'v>(&self, value: &'v KlvValue) -> Result<&'v KlvValue, KlvError> {
        Ok(record_optional(value, "uncertainty")?.unwrap_or(&KlvValue::Empty))
    }
}

impl Format for SectionDataPackFormat {
    fn description(&self) -> String {
        format!("section data pack of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let section_x = self.read_lv(cur, &self.index, ctx)?;
        let section_y = self.read_lv(cur, &self.index, ctx)?;
        let measurements = self.read_lv(cur, &self.mdap, ctx)?;
        let uncertainty = if cur.is_empty() { KlvValue::Empty } else { self.read_lv(cur, &self.mdap, ctx)? };
        let mut fields = vec![
            ("section_x".to_string(), section_x),
            ("section_y".to_string(), section_y),
            ("measurements".to_string(), measurements),
            ("uncertainty".to_string(), uncertainty),
        ];
        for name in PLANE_FIELDS {
            let plane = if cur.is_empty() { KlvValue::Empty } else { self.read_lv(cur, &self.plane, ctx)? };
            fields.push((name.to_string(), plane));
        }
        Ok(KlvValue::Record(fields))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        self.write_lv(&KlvValue::UInt(record_uint(value, "section_x")?), &self.index, out, ctx)?;
        self.write_lv(&KlvValue::UInt(record_uint(value, "section_y")?), &self.index, out, ctx)?;
        self.write_lv(record_field(value, "measurements")?, &self.mdap, out, ctx)?;
        let planes = self.planes(value)?;
        let uncertainty = self.uncertainty(value)?;
        if !planes.is_empty() || !matches!(uncertainty, KlvValue::Empty) {
            self.write_lv(uncertainty, &self.mdap, out, ctx)?;
        }
        for plane in planes {
            self.write_lv(plane, &self.plane, out, ctx)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let mut length = self.length_of_lv(&KlvValue::UInt(record_uint(value, "section_x")?), &self.index, ctx)?
            + self.length_of_lv(&KlvValue::UInt(record_uint(value, "section_y")?), &self.index, ctx)?
            + self.length_of_lv(record_field(value, "measurements")?, &self.mdap, ctx)?;
        let planes = self.planes(value)?;
        let uncertainty = self.uncertainty(value)?;
        if !planes.is_empty() || !matches!(uncertainty, KlvValue::Empty) {
            length += self.length_of_lv(uncertainty, &self.mdap, ctx)?;
        }
        for plane in planes {
            length += self.length_of_lv(plane, &self.plane, ctx)?;
        }
        Ok(length)
    }

    fn print_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        let KlvValue::Record(fields) = value else {
            return value.to_string();
        };
        let parts: Vec<_> = fields
            .iter()
            .map(|(name, field)| match name.as_str() {
                "measurements" | "uncertainty" => format!("{name}: {}", self.mdap.print(field, ctx)),
                _ => format!("{name}: {field}"),
            })
            .collect();
        format!("{{ {} }}", parts.join(", "))
    }
}

// ── Tables ───────────────────────────────────────────────────

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1002",
        vec![
            TagTraits::unknown("KLV_1002_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1002_PRECISION_TIMESTAMP",
                uint(8)?,
                "Precision Timestamp",
                "MISP Precision Timestamp, in microseconds since January 1, 1970, for this metadata.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                11,
                "KLV_1002_DOCUMENT_VERSION",
                BerOidFormat::new(),
                "Document Version",
                "Version number of the MISB ST1002 document used to encode this metadata.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                12,
                "KLV_1002_RANGE_IMAGE_ENUMERATIONS",
                EnumerationsFormat::new()?,
                "Range Image Enumerations",
                "Essential characteristics of the range imagery expressed as enumerations.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                13,
                "KLV_1002_SPRM",
                FloatFormat::new()?,
                "Range Measurement",
                "Distance from the principal point to a point in the scene. Measured in meters.",
            ),
            TagTraits::new(
                14,
                "KLV_1002_SPRM_UNCERTAINTY",
                FloatFormat::new()?,
                "Range Measurement Uncertainty",
                "Uncertainty of the range measurement. Measured in meters.",
            ),
            TagTraits::new(
                15,
                "KLV_1002_SPRM_ROW",
                FloatFormat::new()?,
                "Range Measurement Row Coordinate",
                "Row coordinate in the image where the measurement was taken.",
            ),
            TagTraits::new(
                16,
                "KLV_1002_SPRM_COLUMN",
                FloatFormat::new()?,
                "Range Measurement Column Coordinate",
                "Column coordinate in the image where the measurement was taken.",
            ),
            TagTraits::new(
                17,
                "KLV_1002_NUMBER_SECTIONS_X",
                BerOidFormat::new(),
                "Number of Sections in X",
                "Number of sections of the image differentiable along the x axis.",
            ),
            TagTraits::new(
                18,
                "KLV_1002_NUMBER_SECTIONS_Y",
                BerOidFormat::new(),
                "Number of Sections in Y",
                "Number of sections of the image differentiable along the y axis.",
            ),
            TagTraits::new(
                19,
                "KLV_1002_GENERALIZED_TRANSFORMATION_LOCAL_SET",
                LocalSetFormat::new(Standard::St1202),
                "Generalized Transformation Local Set",
                "Transformation mapping the child range image to the parent collaborative sensor image.",
            ),
            TagTraits::new(
                20,
                "KLV_1002_SECTION_DATA_PACK",
                SectionDataPackFormat::new()?,
                "Section Data Pack",
                "Information describing a section of the image.",
            ),
            TagTraits::new(
                21,
                "KLV_1002_CHECKSUM",
                uint(2)?,
                "Checksum",
                "Checksum used to detect errors within a ST1002 packet.",
            )
            .count(TagCount::Exact(0)),
        ],
    )
}
