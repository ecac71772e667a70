//! ST1108 interpretability and quality local set, with its metric set.
//!
//! Three fields are small packs with their own wire layout; their values
//! are records:
//!
//! - metric period pack: `timestamp` (8 bytes) and `offset` (4 bytes);
//! - window corners pack: four BER-OID pixel coordinates;
//! - metric implementer: `organization` and `subgroup`, joined on the wire
//!   by a 0x1E separator.

use tracing::warn;

use super::{text, uint};
use crate::errors::*;
use crate::format::{record_str, record_uint, type_error, Context, EnumFormat, Format, FloatFormat};
use crate::key::UdsKey;
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::registry::Standard;
use crate::set::LocalSetFormat;
use crate::standards::st0104::USER_DEFINED_TIMESTAMP_KEY;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};
use crate::value::KlvValue;

pub const ASSESSMENT_POINTS: &[(u64, &str)] = &[
    (0, "Unknown Assessment Point"),
    (1, "Sensor"),
    (2, "Sensor Encoder"),
    (3, "GCS (Received)"),
    (4, "GCS (Transmitted)"),
    (5, "Library / Archive"),
];

pub const COMPRESSION_TYPES: &[(u64, &str)] = &[
    (0, "Uncompressed"),
    (1, "H.262"),
    (2, "H.264"),
    (3, "H.265"),
    (4, "JPEG2000"),
];

pub const COMPRESSION_PROFILES: &[(u64, &str)] = &[
    (0, "Uncompressed"),
    (1, "Main (H.264)"),
    (2, "Main 10 (H.265)"),
    (3, "Constrained Baseline (H.264)"),
    (4, "High (H.264)"),
    (5, "Main 4:2:2 12 (H.265)"),
    (6, "Main 4:4:4 12 (H.265)"),
    (7, "High 4:2:2 (H.264)"),
    (8, "High 4:4:4 Predictive (H.264)"),
];

/// Byte between organization and subgroup in a metric implementer.
pub const METRIC_IMPLEMENTER_SEPARATOR: char = '\u{1E}';

// ── Metric period pack ───────────────────────────────────────

const PERIOD_TIMESTAMP_LENGTH: usize = 8;
const PERIOD_OFFSET_LENGTH: usize = 4;

/// Start of a metric period in microseconds, plus its duration.
#[derive(Debug, Clone)]
pub struct MetricPeriodPackFormat {
    constraints: LengthConstraints,
}

impl MetricPeriodPackFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::fixed(PERIOD_TIMESTAMP_LENGTH + PERIOD_OFFSET_LENGTH)?,
        })
    }
}

impl Format for MetricPeriodPackFormat {
    fn description(&self) -> String {
        format!("metric period pack of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let timestamp = read_int(cur, PERIOD_TIMESTAMP_LENGTH)?;
        let offset = read_int(cur, PERIOD_OFFSET_LENGTH)?;
        Ok(KlvValue::Record(vec![
            ("timestamp".to_string(), KlvValue::UInt(timestamp)),
            ("offset".to_string(), KlvValue::UInt(offset)),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        write_int(record_uint(value, "timestamp")?, out, PERIOD_TIMESTAMP_LENGTH)?;
        write_int(record_uint(value, "offset")?, out, PERIOD_OFFSET_LENGTH)
    }

    fn length_of_typed(&self, _: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(PERIOD_TIMESTAMP_LENGTH + PERIOD_OFFSET_LENGTH)
    }
}

// ── Window corners pack ──────────────────────────────────────

// Wire order of the four coordinates.
const CORNER_FIELDS: [&str; 4] = [
    "upper_left_row",
    "upper_left_column",
    "lower_right_row",
    "lower_right_column",
];

// Coordinates are 16-bit, so at most three BER-OID bytes each.
const MAX_CORNER_LENGTH: usize = 3;

/// Image sub-region a metric was evaluated on.
#[derive(Debug, Clone)]
pub struct WindowCornersPackFormat {
    constraints: LengthConstraints,
}

impl WindowCornersPackFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::range(4, 4 * MAX_CORNER_LENGTH)?,
        })
    }
}

impl Format for WindowCornersPackFormat {
    fn description(&self) -> String {
        format!("window corners pack of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let mut fields = Vec::with_capacity(CORNER_FIELDS.len());
        for name in CORNER_FIELDS {
            let offset = cur.position();
            let v = read_ber_oid(cur)?;
            if v > u64::from(u16::MAX) {
                return Err(KlvError::new(ERR_OVERFLOW, format!("{name} {v} exceeds 16 bits")).at(offset));
            }
            fields.push((name.to_string(), KlvValue::UInt(v)));
        }
        Ok(KlvValue::Record(fields))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        for name in CORNER_FIELDS {
            write_ber_oid(record_uint(value, name)?, out)?;
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        CORNER_FIELDS
            .iter()
            .try_fold(0, |total, name| Ok(total + ber_oid_length(record_uint(value, name)?)))
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        let coordinate = |name| record_uint(value, name).map_or("?".to_string(), |v| v.to_string());
        format!(
            "{{ Upper Left: ( {}, {} ), Lower Right: ( {}, {} ) }}",
            coordinate("upper_left_column"),
            coordinate("upper_left_row"),
            coordinate("lower_right_column"),
            coordinate("lower_right_row"),
        )
    }
}

// ── Metric implementer ───────────────────────────────────────

/// Organization responsible for a metric's calculation.
#[derive(Debug, Clone)]
pub struct MetricImplementerFormat {
    constraints: LengthConstraints,
}

impl MetricImplementerFormat {
    pub fn new() -> Self {
        Self {
            constraints: LengthConstraints::free(),
        }
    }
}

impl Format for MetricImplementerFormat {
    fn description(&self) -> String {
        format!("metric implementer of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let offset = cur.position();
        let bytes = read_blob(cur, length)?;
        let text = String::from_utf8(bytes)
            .map_err(|e| KlvError::new(ERR_FORMAT, format!("metric implementer is not UTF-8: {e}")).at(offset))?;
        let (organization, subgroup) = match text.split_once(METRIC_IMPLEMENTER_SEPARATOR) {
            Some((organization, subgroup)) => {
                (organization.to_string(), KlvValue::String(subgroup.to_string()))
            }
            None => {
                warn!("separator character 0x1E not found in metric implementer string");
                (text, KlvValue::Empty)
            }
        };
        Ok(KlvValue::Record(vec![
            ("organization".to_string(), KlvValue::String(organization)),
            ("subgroup".to_string(), subgroup),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        out.extend_from_slice(record_str(value, "organization")?.as_bytes());
        if let Some(subgroup) = subgroup_of(value)? {
            out.push(METRIC_IMPLEMENTER_SEPARATOR as u8);
            out.extend_from_slice(subgroup.as_bytes());
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let subgroup = subgroup_of(value)?.map_or(0, |s| 1 + s.len());
        Ok(record_str(value, "organization")?.len() + subgroup)
    }
}

/// The subgroup, or `None` when the separator is left out: an `Empty` or
/// missing field, or an empty string.
fn subgroup_of(value: &KlvValue) -> Result<Option<&str>, KlvError> {
    match value.field("subgroup") {
        None | Some(KlvValue::Empty) => Ok(None),
        Some(KlvValue::String(s)) if s.is_empty() => Ok(None),
        Some(KlvValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(type_error("string", other).context("subgroup")),
    }
}

// ── Tables ───────────────────────────────────────────────────

fn one_byte_enum(name: &'static str, names: &'static [(u64, &'static str)]) -> Result<EnumFormat, KlvError> {
    Ok(EnumFormat::new(name, LengthConstraints::fixed(1)?, names))
}

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1108",
        vec![
            TagTraits::unknown("KLV_1108_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1108_ASSESSMENT_POINT",
                one_byte_enum("assessment point", ASSESSMENT_POINTS)?,
                "Assessment Point",
                "Location in workflow where the metric was evaluated.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050100000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_1108_METRIC_PERIOD_PACK",
                MetricPeriodPackFormat::new()?,
                "Metric Period Pack",
                "Period for which the metric was evaluated.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3402050101, 0x0E01050200000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_1108_WINDOW_CORNERS_PACK",
                WindowCornersPackFormat::new()?,
                "Window Corners Pack",
                "Image sub-region for which the metric was evaluated.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3402050101, 0x0E01030201010000)),
            TagTraits::new(
                4,
                "KLV_1108_METRIC_LOCAL_SET",
                LocalSetFormat::new(Standard::St1108Metric),
                "Metric Local Set",
                "Specification of metrics and their values.",
            )
            .count(TagCount::Between(1, None)),
            TagTraits::new(
                5,
                "KLV_1108_COMPRESSION_TYPE",
                one_byte_enum("compression type", COMPRESSION_TYPES)?,
                "Compression Type",
                "Type of video compression.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050200000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                6,
                "KLV_1108_COMPRESSION_PROFILE",
                one_byte_enum("compression profile", COMPRESSION_PROFILES)?,
                "Compression Profile",
                "Video compression profile.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050300000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                7,
                "KLV_1108_COMPRESSION_LEVEL",
                text(),
                "Compression Level",
                "Level of video compression.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050400000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                8,
                "KLV_1108_COMPRESSION_RATIO",
                FloatFormat::new()?,
                "Compression Ratio",
                "Source-to-compressed size ratio.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050500000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                9,
                "KLV_1108_STREAM_BITRATE",
                uint(2)?,
                "Stream Bitrate",
                "Expressed in kilobits / second.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050600000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                10,
                "KLV_1108_DOCUMENT_VERSION",
                uint(1)?,
                "Document Version",
                "Version number of MISB ST1108.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01020505000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                11,
                "KLV_1108_CHECKSUM",
                uint(2)?,
                "Checksum",
                "CRC-16-CCITT checksum.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E0102035E000000))
            .count(TagCount::Exact(0)),
        ],
    )
}

pub fn metric_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1108 Metric",
        vec![
            TagTraits::unknown("KLV_1108_METRIC_SET_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1108_METRIC_SET_NAME",
                text(),
                "Metric Name",
                "Examples: 'VNIIRS', 'RER', 'GSD'.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050700000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_1108_METRIC_SET_VERSION",
                text(),
                "Metric Version",
                "Alphanumeric denoting calculated values. 'Human' for observed.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050800000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_1108_METRIC_SET_IMPLEMENTER",
                MetricImplementerFormat::new(),
                "Metric Implementer",
                "Identifies organization responsible for how metric is calculated.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050900000000))
            .count(TagCount::Exact(1)),
            TagTraits::new(
                4,
                "KLV_1108_METRIC_SET_PARAMETERS",
                text(),
                "Metric Parameters",
                "Additional information needed to replicate the calculation.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050A00000000)),
            TagTraits::new(
                5,
                "KLV_1108_METRIC_SET_TIME",
                uint(8)?,
                "Metric Time",
                "Time of metric assessment. MISP Precision Timestamp.",
            )
            .uds_key(USER_DEFINED_TIMESTAMP_KEY)
            .count(TagCount::Exact(1)),
            TagTraits::new(
                6,
                "KLV_1108_METRIC_SET_VALUE",
                FloatFormat::new()?,
                "Metric Value",
                "Numeric value of calculation.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0E01050B00000000))
            .count(TagCount::Exact(1)),
        ],
    )
}
