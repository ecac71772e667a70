//! ST0806 remote video terminal local set and its user-defined set.
//!
//! Point and area of interest sets are kept as raw bytes.

use super::{blob, text, uint};
use crate::errors::*;
use crate::format::{record_uint, Context, Format};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::registry::Standard;
use crate::set::LocalSetFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};
use crate::value::KlvValue;

/// How the bytes of a user-defined data item are to be read.
pub const USER_DATA_TYPES: &[(u64, &str)] = &[
    (0, "String"),
    (1, "Signed Integer"),
    (2, "Unsigned Integer"),
    (3, "Experimental"),
];

const MAX_USER_DATA_ID: u64 = 0x3F;

// ── User-defined data type and id ────────────────────────────

/// Two-bit data type and six-bit numeric id sharing one byte.  The value is
/// a record with `data_type` and `id` fields.
#[derive(Debug, Clone)]
pub struct UserDataTypeIdFormat {
    constraints: LengthConstraints,
}

impl UserDataTypeIdFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::fixed(1)?,
        })
    }
}

impl Format for UserDataTypeIdFormat {
    fn description(&self) -> String {
        format!("user defined data type / id of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let byte = cur.read_u8()?;
        Ok(KlvValue::Record(vec![
            ("data_type".to_string(), KlvValue::UInt(u64::from((byte & 0xC0) >> 6))),
            ("id".to_string(), KlvValue::UInt(u64::from(byte & 0x3F))),
        ]))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let data_type = record_uint(value, "data_type")?;
        let id = record_uint(value, "id")?;
        if data_type > 3 || id > MAX_USER_DATA_ID {
            return Err(KlvError::new(
                ERR_OVERFLOW,
                format!("user data type {data_type} / id {id} do not fit one byte"),
            ));
        }
        write_int((data_type << 6) | id, out, 1)
    }

    fn length_of_typed(&self, _: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(1)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match (record_uint(value, "data_type"), record_uint(value, "id")) {
            (Ok(data_type), Ok(id)) => {
                let name = USER_DATA_TYPES
                    .iter()
                    .find(|(v, _)| *v == data_type)
                    .map_or("Unknown Data Type", |(_, name)| *name);
                format!("{{ type: {name}, value: {id} }}")
            }
            _ => value.to_string(),
        }
    }
}

// ── Tables ───────────────────────────────────────────────────

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0806",
        vec![
            TagTraits::unknown("KLV_0806_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0806_CHECKSUM",
                uint(4)?,
                "Checksum",
                "Checksum used to detect errors within a ST 0806 packet.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                2,
                "KLV_0806_TIMESTAMP",
                uint(8)?,
                "Timestamp",
                "Precision timestamp expressed in microseconds since the UNIX Epoch.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_0806_PLATFORM_TRUE_AIRSPEED",
                uint(2)?,
                "Platform True Airspeed",
                "Indicated airspeed adjusted for temperature and altitude. Measured in meters per second.",
            ),
            TagTraits::new(
                4,
                "KLV_0806_PLATFORM_INDICATED_AIRSPEED",
                uint(2)?,
                "Platform Indicated Airspeed",
                "Airspeed derived from Pitot tube and static pressure sensors. Measured in meters per second.",
            ),
            TagTraits::new(
                5,
                "KLV_0806_TELEMETRY_ACCURACY_INDICATOR",
                blob(),
                "Telemetry Accuracy Indicator",
                "Reserved for future use.",
            ),
            TagTraits::new(
                6,
                "KLV_0806_FRAG_CIRCLE_RADIUS",
                uint(2)?,
                "Frag Circle Radius",
                "Size of fragmentation circle selected by the aircrew. Measured in meters.",
            ),
            TagTraits::new(7, "KLV_0806_FRAME_CODE", uint(4)?, "Frame Code", "Counter runs at 60Hz."),
            TagTraits::new(
                8,
                "KLV_0806_VERSION_NUMBER",
                uint(1)?,
                "UAS LS Version Number",
                "Version of MISB ST 0806 used as the source standard when encoding this local set.",
            ),
            TagTraits::new(
                9,
                "KLV_0806_VIDEO_DATA_RATE",
                uint(4)?,
                "Video Data Rate",
                "Video data rate if digital, or analog FM. Measured in bits per second or Hertz.",
            ),
            TagTraits::new(
                10,
                "KLV_0806_DIGITAL_VIDEO_FILE_FORMAT",
                text(),
                "Digital Video File Format",
                "Video compression being used. Examples: MPEG2, MPEG4, H.264, Analog FM.",
            ),
            TagTraits::new(
                11,
                "KLV_0806_USER_DEFINED_LOCAL_SET",
                LocalSetFormat::new(Standard::St0806UserDefined),
                "User Defined Local Set",
                "Local set of user-defined data items.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                12,
                "KLV_0806_POI_LOCAL_SET",
                blob(),
                "Point of Interest Local Set",
                "Local set with point-of-interest information.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                13,
                "KLV_0806_AOI_LOCAL_SET",
                blob(),
                "Area of Interest Local Set",
                "Local set with area-of-interest information.",
            )
            .count(TagCount::ANY),
            TagTraits::new(14, "KLV_0806_MGRS_ZONE", uint(1)?, "MGRS Zone", "UTM Zone 01 through 60."),
            TagTraits::new(
                15,
                "KLV_0806_MGRS_LATITUDE_BAND_GRID_SQUARE",
                text(),
                "MGRS Latitude Band and Grid Square",
                "Alpha codes for the latitude band and the WGS84 grid square designator.",
            ),
            TagTraits::new(16, "KLV_0806_MGRS_EASTING", uint(3)?, "MGRS Easting", "Five-digit easting value in meters."),
            TagTraits::new(17, "KLV_0806_MGRS_NORTHING", uint(3)?, "MGRS Northing", "Five-digit northing value in meters."),
            TagTraits::new(
                18,
                "KLV_0806_FRAME_CENTER_MGRS_ZONE",
                uint(1)?,
                "Frame Center MGRS Zone",
                "UTM Zone 01 through 60.",
            ),
            TagTraits::new(
                19,
                "KLV_0806_FRAME_CENTER_MGRS_LATITUDE_BAND_GRID_SQUARE",
                text(),
                "Frame Center MGRS Latitude Band and Grid Square",
                "Alpha codes for the latitude band and the WGS84 grid square designator.",
            ),
            TagTraits::new(
                20,
                "KLV_0806_FRAME_CENTER_MGRS_EASTING",
                uint(3)?,
                "Frame Center MGRS Easting",
                "Five-digit easting value in meters.",
            ),
            TagTraits::new(
                21,
                "KLV_0806_FRAME_CENTER_MGRS_NORTHING",
                uint(3)?,
                "Frame Center MGRS Northing",
                "Five-digit northing value in meters.",
            ),
        ],
    )
}

pub fn user_defined_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0806 User Defined",
        vec![
            TagTraits::unknown("KLV_0806_USER_DEFINED_SET_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0806_USER_DEFINED_SET_DATA_TYPE_ID",
                UserDataTypeIdFormat::new()?,
                "Numeric ID and Data Type",
                "Data type and numeric ID for the user defined data.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_0806_USER_DEFINED_SET_DATA",
                blob(),
                "User Data",
                "User-defined data. Data type defined in tag 1.",
            )
            .count(TagCount::Exact(1)),
        ],
    )
}
