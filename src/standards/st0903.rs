//! ST0903 video moving target indicator local set and its nested sets.
//!
//! Targets travel as a series of VTarget packs.  A pack is a BER-OID target
//! id followed by a VTarget local set filling the rest of the pack; its
//! value is a record with `id` and `set` fields.

use super::st1204::MiisIdFormat;
use super::st1303::imap_value;
use super::{blob, blob_of, text, uint, uint_free};
use crate::errors::*;
use crate::format::{record_field, record_optional, record_uint, type_error, Context, EnumFormat, Format, ImapFormat, UintFormat};
use crate::imap::{read_imap, write_imap};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::registry::Standard;
use crate::series::SeriesFormat;
use crate::set::LocalSetFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};
use crate::value::KlvValue;
use tracing::warn;

// Latitude and longitude offsets from the frame center, in degrees.
const OFFSET_BOUND: f64 = 19.2;

// ── Id packs ─────────────────────────────────────────────────

/// BER-OID id plus a local set describing the identified item.  Used for
/// VTarget packs and VTrackItem packs.
#[derive(Debug, Clone)]
pub struct IdPackFormat {
    name: &'static str,
    set: LocalSetFormat,
    constraints: LengthConstraints,
}

impl IdPackFormat {
    pub fn vtarget() -> Self {
        Self::new("vtarget", Standard::St0903VTarget)
    }

    pub fn vtrack_item() -> Self {
        Self::new("vtrack item", Standard::St0903VTrackItem)
    }

    fn new(name: &'static str, standard: Standard) -> Self {
        Self {
            name,
            set: LocalSetFormat::new(standard),
            constraints: LengthConstraints::free(),
        }
    }
}

impl Format for IdPackFormat {
    fn description(&self) -> String {
        format!("{} pack of {}", self.name, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, ctx: &Context<'_>) -> Result<KlvValue, KlvError> {
        let ctx = ctx.descend()?;
        let id = read_ber_oid(cur)?;
        let rest = cur.remaining();
        let set = self.set.read(cur, rest, &ctx)?;
        Ok(KlvValue::Record(vec![
            ("id".to_string(), KlvValue::UInt(id)),
            ("set".to_string(), set),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        let ctx = ctx.descend()?;
        write_ber_oid(record_uint(value, "id")?, out)?;
        let set = record_field(value, "set")?;
        let length = self.set.length_of(set, &ctx)?;
        self.set.write(set, out, length, &ctx)
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        let ctx = ctx.descend()?;
        let id = record_uint(value, "id")?;
        Ok(ber_oid_length(id) + self.set.length_of(record_field(value, "set")?, &ctx)?)
    }

    fn print_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> String {
        let (Ok(id), Ok(set)) = (record_uint(value, "id"), record_field(value, "set")) else {
            return value.to_string();
        };
        format!("{{ id: {id}, set: {} }}", self.set.print(set, ctx))
    }

    fn subset(&self) -> Option<Standard> {
        Some(self.set.standard())
    }
}

// ── Location and velocity packs ──────────────────────────────

// Three two-byte IMAP values sharing one domain.
struct Triple {
    names: [&'static str; 3],
    min: f64,
    max: f64,
}

const TRIPLE_LENGTH: usize = 6;

const SIGMA: Triple = Triple {
    names: ["east", "north", "up"],
    min: 0.0,
    max: 650.0,
};

const RHO: Triple = Triple {
    names: ["east_north", "east_up", "north_up"],
    min: -1.0,
    max: 1.0,
};

impl Triple {
    fn read(&self, cur: &mut Cursor<'_>) -> Result<KlvValue, KlvError> {
        let mut fields = Vec::with_capacity(3);
        for name in self.names {
            let value = imap_value(read_imap(cur, self.min, self.max, 2)?);
            fields.push((name.to_string(), value));
        }
        Ok(KlvValue::Record(fields))
    }

    fn write(&self, value: &KlvValue, out: &mut Vec<u8>) -> Result<(), KlvError> {
        for name in self.names {
            let field = record_field(value, name)?;
            let v = field.as_imap().ok_or_else(|| type_error("float", field).context(name))?;
            write_imap(v, self.min, self.max, out, 2)?;
        }
        Ok(())
    }

    fn check(&self, value: &KlvValue) -> Result<(), KlvError> {
        for name in self.names {
            let field = record_field(value, name)?;
            field.as_imap().ok_or_else(|| type_error("float", field).context(name))?;
        }
        Ok(())
    }

    fn print(&self, value: &KlvValue) -> String {
        let fields: Vec<_> = self
            .names
            .iter()
            .map(|name| match record_field(value, name) {
                Ok(v) => format!("{name}: {v}"),
                Err(_) => format!("{name}: ?"),
            })
            .collect();
        format!("{{ {} }}", fields.join(", "))
    }
}

/// A fixed head of IMAP values followed by optional sigma and rho triples.
/// Rho is only written after sigma.
#[derive(Debug, Clone)]
pub struct UncertainPackFormat {
    name: &'static str,
    head: &'static [(&'static str, f64, f64, usize)],
    constraints: LengthConstraints,
}

const LOCATION_HEAD: &[(&str, f64, f64, usize)] = &[
    ("latitude", -90.0, 90.0, 4),
    ("longitude", -180.0, 180.0, 4),
    ("altitude", -900.0, 19000.0, 2),
];

const VELOCITY_HEAD: &[(&str, f64, f64, usize)] = &[
    ("east", -900.0, 900.0, 2),
    ("north", -900.0, 900.0, 2),
    ("up", -900.0, 900.0, 2),
];

impl UncertainPackFormat {
    /// Geodetic position with its standard deviations and correlations.
    pub fn location() -> Self {
        Self::new("location", LOCATION_HEAD)
    }

    /// East, north and up rates.  Used for both velocity and acceleration.
    pub fn velocity() -> Self {
        Self::new("velocity", VELOCITY_HEAD)
    }

    fn new(name: &'static str, head: &'static [(&'static str, f64, f64, usize)]) -> Self {
        Self {
            name,
            head,
            constraints: LengthConstraints::free(),
        }
    }

    fn head_length(&self) -> usize {
        self.head.iter().map(|&(_, _, _, width)| width).sum()
    }

    fn optional<'v>(&self, value: &'v KlvValue) -> Result<(Option<&'v KlvValue>, Option<&'v KlvValue>), KlvError> {
        let sigma = record_optional(value, "sigma")?;
        let rho = record_optional(value, "rho")?;
        if rho.is_some() && sigma.is_none() {
            warn!("{} pack rho dropped: no sigma to follow", self.name);
            return Ok((None, None));
        }
        Ok((sigma, rho))
    }
}

impl Format for UncertainPackFormat {
    fn description(&self) -> String {
        format!("{} pack of {}", self.name, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let mut fields = Vec::new();
        for &(name, min, max, width) in self.head {
            fields.push((name.to_string(), imap_value(read_imap(cur, min, max, width)?)));
        }
        let sigma = if cur.remaining() >= TRIPLE_LENGTH { SIGMA.read(cur)? } else { KlvValue::Empty };
        let rho = if cur.remaining() >= TRIPLE_LENGTH { RHO.read(cur)? } else { KlvValue::Empty };
        fields.push(("sigma".to_string(), sigma));
        fields.push(("rho".to_string(), rho));
        Ok(KlvValue::Record(fields))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        for &(name, min, max, width) in self.head {
            let field = record_field(value, name)?;
            let v = field.as_imap().ok_or_else(|| type_error("float", field).context(name))?;
            write_imap(v, min, max, out, width)?;
        }
        let (sigma, rho) = self.optional(value)?;
        if let Some(sigma) = sigma {
            SIGMA.write(sigma, out)?;
        }
        if let Some(rho) = rho {
            RHO.write(rho, out)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        for &(name, ..) in self.head {
            let field = record_field(value, name)?;
            field.as_imap().ok_or_else(|| type_error("float", field).context(name))?;
        }
        let (sigma, rho) = self.optional(value)?;
        if let Some(sigma) = sigma {
            SIGMA.check(sigma)?;
        }
        if let Some(rho) = rho {
            RHO.check(rho)?;
        }
        let extra = [sigma, rho].iter().filter(|v| v.is_some()).count();
        Ok(self.head_length() + extra * TRIPLE_LENGTH)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        let KlvValue::Record(fields) = value else {
            return value.to_string();
        };
        let parts: Vec<_> = fields
            .iter()
            .filter(|(_, v)| !matches!(v, KlvValue::Empty))
            .map(|(name, v)| match name.as_str() {
                "sigma" => format!("sigma: {}", SIGMA.print(v)),
                "rho" => format!("rho: {}", RHO.print(v)),
                _ => format!("{name}: {v}"),
            })
            .collect();
        format!("{{ {} }}", parts.join(", "))
    }
}

/// Series of location packs, as used for boundaries and track histories.
pub fn location_series() -> SeriesFormat {
    SeriesFormat::new(UncertainPackFormat::location())
}

// ── FPA index pack ───────────────────────────────────────────

/// Focal plane array a target was detected in, as one-byte row and column.
#[derive(Debug, Clone)]
pub struct FpaIndexFormat {
    constraints: LengthConstraints,
}

impl FpaIndexFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::fixed(2)?,
        })
    }
}

impl Format for FpaIndexFormat {
    fn description(&self) -> String {
        format!("FPA index pack of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let row = cur.read_u8()?;
        let column = cur.read_u8()?;
        Ok(KlvValue::Record(vec![
            ("row".to_string(), KlvValue::UInt(row.into())),
            ("column".to_string(), KlvValue::UInt(column.into())),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        write_int(record_uint(value, "row")?, out, 1)?;
        write_int(record_uint(value, "column")?, out, 1)
    }

    fn length_of_typed(&self, _: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(2)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match (record_uint(value, "row"), record_uint(value, "column")) {
            (Ok(row), Ok(column)) => format!("{{ row: {row}, column: {column} }}"),
            _ => value.to_string(),
        }
    }
}

// ── Tables ───────────────────────────────────────────────────

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903",
        vec![
            TagTraits::unknown("KLV_0903_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_CHECKSUM",
                uint(2)?,
                "Checksum",
                "Checksum used to detect errors within a ST 0903 packet.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                2,
                "KLV_0903_PRECISION_TIMESTAMP",
                uint_free(),
                "Precision Timestamp",
                "Microseconds since January 1st, 1970.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_VMTI_SYSTEM_NAME",
                text(),
                "VMTI System Name",
                "Name or description of the VMTI system producing the targets.",
            ),
            TagTraits::new(
                4,
                "KLV_0903_VERSION",
                uint_free(),
                "VMTI LS Version",
                "Version of MISB ST 0903 used as the source standard when encoding this set.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                5,
                "KLV_0903_NUM_TARGETS_DETECTED",
                uint_free(),
                "Total Number of Targets Detected",
                "Total number of targets detected in a frame.",
            ),
            TagTraits::new(
                6,
                "KLV_0903_NUM_TARGETS_REPORTED",
                uint_free(),
                "Number of Targets Reported",
                "Number of targets reported following a culling process.",
            ),
            TagTraits::new(
                7,
                "KLV_0903_FRAME_NUMBER",
                uint_free(),
                "Frame Number",
                "Frame number identifying detected targets.",
            ),
            TagTraits::new(
                8,
                "KLV_0903_FRAME_WIDTH",
                uint_free(),
                "Frame Width",
                "Width of the Motion Imagery frame in pixels.",
            ),
            TagTraits::new(
                9,
                "KLV_0903_FRAME_HEIGHT",
                uint_free(),
                "Frame Height",
                "Height of the Motion Imagery frame in pixels.",
            ),
            TagTraits::new(
                10,
                "KLV_0903_SOURCE_SENSOR",
                text(),
                "VMTI Source Sensor",
                "Name of VMTI source sensor. Examples: 'EO Nose', 'EO Zoom (DLTV)'.",
            ),
            TagTraits::new(
                11,
                "KLV_0903_HORIZONTAL_FOV",
                ImapFormat::variable(0.0, 180.0, 2)?,
                "VMTI Horizontal FOV",
                "Horizonal field of view of sensor input to the VMTI process.",
            ),
            TagTraits::new(
                12,
                "KLV_0903_VERTICAL_FOV",
                ImapFormat::variable(0.0, 180.0, 2)?,
                "VMTI Vertical FOV",
                "Vertical field of view of sensor input to the VMTI process.",
            ),
            TagTraits::new(
                13,
                "KLV_0903_MIIS_ID",
                MiisIdFormat::new()?,
                "MIIS ID",
                "A Motion Imagery Identification System Core Identifier conformant with MISB ST 1204.",
            ),
            TagTraits::new(
                101,
                "KLV_0903_VTARGET_SERIES",
                SeriesFormat::new(IdPackFormat::vtarget()),
                "VTarget Series",
                "A series of VTarget packs.",
            ),
            TagTraits::new(
                102,
                "KLV_0903_ALGORITHM_SERIES",
                SeriesFormat::new(LocalSetFormat::new(Standard::St0903Algorithm)),
                "Algorithm Series",
                "A series of algorithm local sets.",
            ),
            TagTraits::new(
                103,
                "KLV_0903_ONTOLOGY_SERIES",
                SeriesFormat::new(LocalSetFormat::new(Standard::St0903Ontology)),
                "Ontology Series",
                "A series of ontology local sets.",
            ),
        ],
    )
}

fn offset() -> Result<ImapFormat, KlvError> {
    ImapFormat::variable(-OFFSET_BOUND, OFFSET_BOUND, 3)
}

pub fn vtarget_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 VTarget",
        vec![
            TagTraits::unknown("KLV_0903_VTARGET_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_VTARGET_CENTROID",
                uint_free(),
                "Target Centroid",
                "Index of the centroid pixel, computed as (row - 1) * width + column with 1-indexed row and column.",
            ),
            TagTraits::new(
                2,
                "KLV_0903_VTARGET_BOUNDARY_TOP_LEFT",
                uint_free(),
                "Boundary Top Left",
                "Index of the top-left corner pixel of the target bounding box.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_VTARGET_BOUNDARY_BOTTOM_RIGHT",
                uint_free(),
                "Boundary Bottom Right",
                "Index of the bottom-right corner pixel of the target bounding box.",
            ),
            TagTraits::new(
                4,
                "KLV_0903_VTARGET_PRIORITY",
                uint(1)?,
                "Target Priority",
                "Provides downstream systems a means to cull targets. Lower numbers are higher priority.",
            ),
            TagTraits::new(
                5,
                "KLV_0903_VTARGET_CONFIDENCE_LEVEL",
                uint(1)?,
                "Target Confidence Level",
                "Confidence level, as a percentage, of the target detection.",
            ),
            TagTraits::new(
                6,
                "KLV_0903_VTARGET_HISTORY",
                uint_free(),
                "Target History",
                "Number of times a target has previously been detected.",
            ),
            TagTraits::new(
                7,
                "KLV_0903_VTARGET_PERCENTAGE_OF_TARGET_PIXELS",
                uint(1)?,
                "Percentage of Target Pixels",
                "Integer percentage of the pixels in the image classified as target pixels.",
            ),
            TagTraits::new(
                8,
                "KLV_0903_VTARGET_COLOR",
                uint(3)?,
                "Target Color",
                "Dominant color of the target, expressed as three RGB bytes.",
            ),
            TagTraits::new(
                9,
                "KLV_0903_VTARGET_INTENSITY",
                uint_free(),
                "Target Intensity",
                "Dominant intensity of the target, expressed as a single integer using up to 24 bits.",
            ),
            TagTraits::new(
                10,
                "KLV_0903_VTARGET_LOCATION_OFFSET_LATITUDE",
                offset()?,
                "Target Location Offset Latitude",
                "Latitude offset for target from Frame Center Latitude, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                11,
                "KLV_0903_VTARGET_LOCATION_OFFSET_LONGITUDE",
                offset()?,
                "Target Location Offset Longitude",
                "Longitude offset for target from Frame Center Longitude, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                12,
                "KLV_0903_VTARGET_HEIGHT_ABOVE_ELLIPSOID",
                ImapFormat::variable(-900.0, 19000.0, 2)?,
                "Target Height Above Ellipsoid",
                "Height of the target in meters above the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                13,
                "KLV_0903_VTARGET_BOUNDARY_TOP_LEFT_LATITUDE_OFFSET",
                offset()?,
                "Boundary Top Left Latitude Offset",
                "Latitude offset for the top left corner of the bounding box from Frame Center Latitude.",
            ),
            TagTraits::new(
                14,
                "KLV_0903_VTARGET_BOUNDARY_TOP_LEFT_LONGITUDE_OFFSET",
                offset()?,
                "Boundary Top Left Longitude Offset",
                "Longitude offset for the top left corner of the bounding box from Frame Center Longitude.",
            ),
            TagTraits::new(
                15,
                "KLV_0903_VTARGET_BOUNDARY_BOTTOM_RIGHT_LATITUDE_OFFSET",
                offset()?,
                "Boundary Bottom Right Latitude Offset",
                "Latitude offset for the bottom right corner of the bounding box from Frame Center Latitude.",
            ),
            TagTraits::new(
                16,
                "KLV_0903_VTARGET_BOUNDARY_BOTTOM_RIGHT_LONGITUDE_OFFSET",
                offset()?,
                "Boundary Bottom Right Longitude Offset",
                "Longitude offset for the bottom right corner of the bounding box from Frame Center Longitude.",
            ),
            TagTraits::new(
                17,
                "KLV_0903_VTARGET_LOCATION",
                UncertainPackFormat::location(),
                "Target Location",
                "Geographical position of target, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                18,
                "KLV_0903_VTARGET_BOUNDARY_SERIES",
                location_series(),
                "Target Boundary Series",
                "An arbitrary number of geospatial vertices defining the boundary around an area or volume of interest.",
            ),
            TagTraits::new(
                19,
                "KLV_0903_VTARGET_CENTROID_ROW",
                uint_free(),
                "Centroid Pixel Row",
                "Row of the target centroid pixel, with 1 being the topmost row.",
            ),
            TagTraits::new(
                20,
                "KLV_0903_VTARGET_CENTROID_COLUMN",
                uint_free(),
                "Centroid Pixel Column",
                "Column of the target centroid pixel, with 1 being the leftmost column.",
            ),
            TagTraits::new(
                21,
                "KLV_0903_VTARGET_FPA_INDEX",
                FpaIndexFormat::new()?,
                "FPA Index Pack",
                "Index of Focal Plane Array in which detection of the target occurs.",
            ),
            TagTraits::new(
                22,
                "KLV_0903_VTARGET_ALGORITHM_ID",
                uint_free(),
                "Algorithm ID",
                "Id number of algorithm used to detect the target.",
            ),
            TagTraits::new(
                101,
                "KLV_0903_VTARGET_VMASK",
                blob(),
                "Target Mask",
                "Outline of the detected target, in the form of a bitmask or a polygon.",
            ),
            TagTraits::new(
                102,
                "KLV_0903_VTARGET_VOBJECT",
                blob(),
                "Target Object",
                "Class or type of the target to an arbitrary level of detail.",
            ),
            TagTraits::new(
                103,
                "KLV_0903_VTARGET_VFEATURE",
                blob(),
                "Target Features",
                "Data which describes the target or features of the target, in varying forms.",
            ),
            TagTraits::new(
                104,
                "KLV_0903_VTARGET_VTRACKER",
                LocalSetFormat::new(Standard::St0903VTracker),
                "Target Tracker",
                "Contains ancillary spatial and temporal information to assist in tracking the target.",
            ),
            TagTraits::new(
                105,
                "KLV_0903_VTARGET_VCHIP",
                blob(),
                "Target Chip",
                "Embedded image chip of the target, or URI linking to it.",
            ),
            TagTraits::new(
                106,
                "KLV_0903_VTARGET_VCHIP_SERIES",
                blob(),
                "Chip Series",
                "A series of target chips.",
            ),
            TagTraits::new(
                107,
                "KLV_0903_VTARGET_VOBJECT_SERIES",
                blob(),
                "Object Series",
                "A series of target objects.",
            ),
        ],
    )
}

pub fn algorithm_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 Algorithm",
        vec![
            TagTraits::unknown("KLV_0903_ALGORITHM_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_ALGORITHM_ID",
                uint_free(),
                "ID",
                "Identifier for the algorithm, unique within this packet.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_0903_ALGORITHM_NAME",
                text(),
                "Name",
                "Name of the algorithm.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_ALGORITHM_VERSION",
                text(),
                "Version",
                "Version of the algorithm.",
            ),
            TagTraits::new(
                4,
                "KLV_0903_ALGORITHM_CLASS",
                text(),
                "Class",
                "Type of the algorithm, e.g. 'detector' or 'classifier'.",
            ),
            TagTraits::new(
                5,
                "KLV_0903_ALGORITHM_NUM_FRAMES",
                uint_free(),
                "Number of Frames",
                "Number of frames the algorithm operates over.",
            ),
        ],
    )
}

pub fn ontology_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 Ontology",
        vec![
            TagTraits::unknown("KLV_0903_ONTOLOGY_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_ONTOLOGY_ID",
                uint_free(),
                "ID",
                "Identifier for the ontology entry, unique within this packet.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_0903_ONTOLOGY_PARENT_ID",
                uint_free(),
                "Parent ID",
                "Identifier of the entry this one refines.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_ONTOLOGY_ONTOLOGY",
                text(),
                "Ontology",
                "URI of the ontology in use.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                4,
                "KLV_0903_ONTOLOGY_CLASS",
                text(),
                "Class",
                "Target class within the ontology.",
            ),
        ],
    )
}

const DETECTION_STATUS: &[(u64, &str)] = &[
    (0, "Inactive"),
    (1, "Active - Moving"),
    (2, "Dropped"),
    (3, "Active - Stopped"),
    (4, "Active - Coasting"),
];

fn detection_status() -> Result<EnumFormat, KlvError> {
    Ok(EnumFormat::new(
        "detection status",
        LengthConstraints::fixed(1)?,
        DETECTION_STATUS,
    ))
}

pub fn vtracker_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 VTracker",
        vec![
            TagTraits::unknown("KLV_0903_VTRACKER_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_VTRACKER_TRACK_ID",
                blob_of(16)?,
                "Track ID",
                "A Version 4 UUID assigned to the track.",
            ),
            TagTraits::new(
                2,
                "KLV_0903_VTRACKER_DETECTION_STATUS",
                detection_status()?,
                "Detection Status",
                "Current status of the target track.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_VTRACKER_START_TIME",
                uint(8)?,
                "First Observation Time",
                "Time of the first observation of the entity, in microseconds since the epoch.",
            ),
            TagTraits::new(
                4,
                "KLV_0903_VTRACKER_END_TIME",
                uint(8)?,
                "Latest Observation Time",
                "Time of the latest observation of the entity, in microseconds since the epoch.",
            ),
            TagTraits::new(
                5,
                "KLV_0903_VTRACKER_BOUNDARY_SERIES",
                location_series(),
                "Track Boundary Series",
                "Vertices of a polygon bounding the track.",
            ),
            TagTraits::new(
                6,
                "KLV_0903_VTRACKER_ALGORITHM",
                text(),
                "Algorithm",
                "Name of the algorithm used to form the track.",
            ),
            TagTraits::new(
                7,
                "KLV_0903_VTRACKER_CONFIDENCE",
                uint(1)?,
                "Confidence Level",
                "Confidence in the track, as a percentage.",
            ),
            TagTraits::new(
                8,
                "KLV_0903_VTRACKER_NUM_TRACK_POINTS",
                UintFormat::new(LengthConstraints::range(1, 2)?),
                "Number of Track Points",
                "Number of points in the track history.",
            ),
            TagTraits::new(
                9,
                "KLV_0903_VTRACKER_TRACK_HISTORY",
                location_series(),
                "Track History Series",
                "Previous locations of the entity.",
            ),
            TagTraits::new(
                10,
                "KLV_0903_VTRACKER_VELOCITY",
                UncertainPackFormat::velocity(),
                "Velocity",
                "Velocity of the entity in meters per second.",
            ),
            TagTraits::new(
                11,
                "KLV_0903_VTRACKER_ACCELERATION",
                UncertainPackFormat::velocity(),
                "Acceleration",
                "Acceleration of the entity in meters per second squared.",
            ),
            TagTraits::new(
                12,
                "KLV_0903_VTRACKER_ALGORITHM_ID",
                UintFormat::new(LengthConstraints::range(1, 3)?),
                "Algorithm ID",
                "Identifier of an algorithm set describing the tracker.",
            ),
        ],
    )
}

pub fn vtrack_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 VTrack",
        vec![
            TagTraits::unknown("KLV_0903_VTRACK_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_VTRACK_CHECKSUM",
                uint(2)?,
                "Checksum",
                "Checksum used to detect errors within a VTrack packet.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                2,
                "KLV_0903_VTRACK_PRECISION_TIMESTAMP",
                uint(8)?,
                "Precision Timestamp",
                "Microseconds since January 1st, 1970.",
            ),
            TagTraits::new(
                3,
                "KLV_0903_VTRACK_TRACK_ID",
                blob_of(16)?,
                "Track ID",
                "A Version 4 UUID assigned to the track.",
            ),
            TagTraits::new(
                4,
                "KLV_0903_VTRACK_DETECTION_STATUS",
                detection_status()?,
                "Detection Status",
                "Current status of the target track.",
            ),
            TagTraits::new(
                5,
                "KLV_0903_VTRACK_START_TIME",
                uint(8)?,
                "Start Time",
                "Time of the first observation of the entity.",
            ),
            TagTraits::new(
                6,
                "KLV_0903_VTRACK_END_TIME",
                uint(8)?,
                "End Time",
                "Time of the latest observation of the entity.",
            ),
            TagTraits::new(
                7,
                "KLV_0903_VTRACK_BOUNDARY_SERIES",
                location_series(),
                "Boundary Series",
                "Vertices of a polygon bounding the track.",
            ),
            TagTraits::new(
                8,
                "KLV_0903_VTRACK_ALGORITHM",
                text(),
                "Algorithm",
                "Name of the algorithm used to form the track.",
            ),
            TagTraits::new(
                9,
                "KLV_0903_VTRACK_CONFIDENCE",
                uint(1)?,
                "Confidence Level",
                "Confidence in the track, as a percentage.",
            ),
            TagTraits::new(
                10,
                "KLV_0903_VTRACK_SYSTEM_NAME",
                text(),
                "VMTI System Name",
                "Name or description of the system producing the track.",
            ),
            TagTraits::new(
                11,
                "KLV_0903_VTRACK_VERSION",
                uint_free(),
                "VMTI LS Version",
                "Version of MISB ST 0903 used to encode this set.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                12,
                "KLV_0903_VTRACK_SOURCE_SENSOR",
                text(),
                "VMTI Source Sensor",
                "Name of the sensor feeding the tracker.",
            ),
            TagTraits::new(
                13,
                "KLV_0903_VTRACK_NUM_TRACK_POINTS",
                uint_free(),
                "Number of Track Points",
                "Number of points in the track item series.",
            ),
            TagTraits::new(
                101,
                "KLV_0903_VTRACK_VTRACKITEM_SERIES",
                SeriesFormat::new(IdPackFormat::vtrack_item()),
                "VTrackItem Series",
                "A series of VTrackItem packs.",
            ),
            TagTraits::new(
                102,
                "KLV_0903_VTRACK_ONTOLOGY_SERIES",
                SeriesFormat::new(LocalSetFormat::new(Standard::St0903Ontology)),
                "Ontology Series",
                "A series of ontology local sets.",
            ),
        ],
    )
}

pub fn vtrack_item_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0903 VTrackItem",
        vec![
            TagTraits::unknown("KLV_0903_VTRACKITEM_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0903_VTRACKITEM_TIMESTAMP",
                uint(8)?,
                "Precision Timestamp",
                "Time of this track point, in microseconds since the epoch.",
            ),
            TagTraits::new(2, "KLV_0903_VTRACKITEM_CENTROID", uint_free(), "Target Centroid", "Index of the centroid pixel."),
            TagTraits::new(3, "KLV_0903_VTRACKITEM_CENTROID_ROW", uint_free(), "Centroid Pixel Row", "Row of the centroid pixel."),
            TagTraits::new(
                4,
                "KLV_0903_VTRACKITEM_CENTROID_COLUMN",
                uint_free(),
                "Centroid Pixel Column",
                "Column of the centroid pixel.",
            ),
            TagTraits::new(
                5,
                "KLV_0903_VTRACKITEM_BOUNDARY_TOP_LEFT",
                uint_free(),
                "Boundary Top Left",
                "Index of the top-left corner pixel of the bounding box.",
            ),
            TagTraits::new(
                6,
                "KLV_0903_VTRACKITEM_BOUNDARY_BOTTOM_RIGHT",
                uint_free(),
                "Boundary Bottom Right",
                "Index of the bottom-right corner pixel of the bounding box.",
            ),
            TagTraits::new(7, "KLV_0903_VTRACKITEM_PRIORITY", uint(1)?, "Target Priority", "Lower numbers are higher priority."),
            TagTraits::new(
                8,
                "KLV_0903_VTRACKITEM_CONFIDENCE_LEVEL",
                uint(1)?,
                "Target Confidence Level",
                "Confidence level, as a percentage, of the detection.",
            ),
            TagTraits::new(
                9,
                "KLV_0903_VTRACKITEM_HISTORY",
                uint_free(),
                "Target History",
                "Number of times the target has previously been detected.",
            ),
            TagTraits::new(
                10,
                "KLV_0903_VTRACKITEM_PERCENTAGE_OF_TARGET_PIXELS",
                uint(1)?,
                "Percentage of Target Pixels",
                "Percentage of the pixels in the image classified as target pixels.",
            ),
            TagTraits::new(11, "KLV_0903_VTRACKITEM_COLOR", uint(3)?, "Target Color", "Dominant color as three RGB bytes."),
            TagTraits::new(12, "KLV_0903_VTRACKITEM_INTENSITY", uint_free(), "Target Intensity", "Dominant intensity of the target."),
            TagTraits::new(
                13,
                "KLV_0903_VTRACKITEM_LOCATION",
                UncertainPackFormat::location(),
                "Target Location",
                "Geographical position of the target, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                14,
                "KLV_0903_VTRACKITEM_BOUNDARY_SERIES",
                location_series(),
                "Target Boundary Series",
                "Geospatial vertices bounding the target.",
            ),
            TagTraits::new(
                15,
                "KLV_0903_VTRACKITEM_VELOCITY",
                UncertainPackFormat::velocity(),
                "Velocity",
                "Velocity of the target in meters per second.",
            ),
            TagTraits::new(
                16,
                "KLV_0903_VTRACKITEM_ACCELERATION",
                UncertainPackFormat::velocity(),
                "Acceleration",
                "Acceleration of the target in meters per second squared.",
            ),
            TagTraits::new(
                17,
                "KLV_0903_VTRACKITEM_FPA_INDEX",
                FpaIndexFormat::new()?,
                "FPA Index Pack",
                "Focal plane array in which the target was detected.",
            ),
            TagTraits::new(18, "KLV_0903_VTRACKITEM_FRAME_NUMBER", uint_free(), "Frame Number", "Frame this track point was detected in."),
            TagTraits::new(
                19,
                "KLV_0903_VTRACKITEM_MIIS_ID",
                MiisIdFormat::new()?,
                "MIIS ID",
                "Motion Imagery Identification System core identifier of the source.",
            ),
            TagTraits::new(20, "KLV_0903_VTRACKITEM_FRAME_WIDTH", uint_free(), "Frame Width", "Width of the frame in pixels."),
            TagTraits::new(21, "KLV_0903_VTRACKITEM_FRAME_HEIGHT", uint_free(), "Frame Height", "Height of the frame in pixels."),
            TagTraits::new(
                22,
                "KLV_0903_VTRACKITEM_HORIZONTAL_FOV",
                ImapFormat::variable(0.0, 180.0, 2)?,
                "Horizontal FOV",
                "Horizontal field of view of the source sensor.",
            ),
            TagTraits::new(
                23,
                "KLV_0903_VTRACKITEM_VERTICAL_FOV",
                ImapFormat::variable(0.0, 180.0, 2)?,
                "Vertical FOV",
                "Vertical field of view of the source sensor.",
            ),
            TagTraits::new(24, "KLV_0903_VTRACKITEM_MI_URL", text(), "MI URL", "URL of the Motion Imagery source."),
            TagTraits::new(101, "KLV_0903_VTRACKITEM_VMASK", blob(), "Target Mask", "Outline of the target."),
            TagTraits::new(102, "KLV_0903_VTRACKITEM_VOBJECT", blob(), "Target Object", "Class or type of the target."),
            TagTraits::new(103, "KLV_0903_VTRACKITEM_VFEATURE", blob(), "Target Features", "Features of the target."),
            TagTraits::new(104, "KLV_0903_VTRACKITEM_VCHIP", blob(), "Target Chip", "Image chip of the target."),
            TagTraits::new(105, "KLV_0903_VTRACKITEM_VCHIP_SERIES", blob(), "Chip Series", "A series of target chips."),
            TagTraits::new(106, "KLV_0903_VTRACKITEM_VOBJECT_SERIES", blob(), "Object Series", "A series of target objects."),
        ],
    )
}
