//! ST0104 Predator UAV basic universal set.
//!
//! Superseded by ST0601; every entry is keyed by its 16-byte universal key
//! only.  Local tags are assigned in table order so entries can still be
//! looked up by number.

use super::{blob, text, uint};
use crate::errors::*;
use crate::format::FloatFormat;
use crate::key::UdsKey;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

/// Microseconds since the epoch; also used as the ST1108 metric time key.
pub const USER_DEFINED_TIMESTAMP_KEY: UdsKey =
    UdsKey::from_words(0x060E2B3401010101, 0x0702010101050000);

/// Embedded ST0102 set, kept as raw bytes.
pub const SECURITY_LOCAL_SET_KEY: UdsKey =
    UdsKey::from_words(0x060E2B3402030101, 0x0E01030302000000);

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0104",
        vec![
            TagTraits::unknown("KLV_0104_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0104_USER_DEFINED_TIMESTAMP",
                uint(8)?,
                "User Defined Timestamp",
                "Coordinating Universal Time (UTC) represented in the number of microseconds elapsed since midnight, January 1, 1970. Derived from the POSIX IEEE 1003.1 standard.",
            )
            .uds_key(USER_DEFINED_TIMESTAMP_KEY)
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_0104_EPISODE_NUMBER",
                FloatFormat::new()?,
                "Episode Number",
                "Number to distinguish different missions started on a given day.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0105050000000000)),
            TagTraits::new(
                3,
                "KLV_0104_PLATFORM_HEADING_ANGLE",
                FloatFormat::fixed(4)?,
                "Platform Heading Angle",
                "Angle between longitudinal axis and true north measured in the horizontal plane. Angles increase in a clockwise direction when looking from above the platform. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010107, 0x0701100106000000)),
            TagTraits::new(
                4,
                "KLV_0104_PLATFORM_PITCH_ANGLE",
                FloatFormat::fixed(4)?,
                "Platform Pitch Angle",
                "Angle between longitudinal axis and horizonal plane. Positive angles above horizonal plane. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010107, 0x0701100105000000)),
            TagTraits::new(
                5,
                "KLV_0104_PLATFORM_ROLL_ANGLE",
                FloatFormat::fixed(4)?,
                "Platform Roll Angle",
                "Angle between transverse axis and transverse-longitudinal plane. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010107, 0x0701100104000000)),
            TagTraits::new(
                6,
                "KLV_0104_DEVICE_DESIGNATION",
                text(),
                "Device Designation",
                "Model name for the platform. Examples: 'Predator', 'Reaper'.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0101200100000000)),
            TagTraits::new(
                7,
                "KLV_0104_IMAGE_SOURCE_DEVICE",
                text(),
                "Image Source Device",
                "Name of the currently active sensor. Examples: 'EO Nose', 'IR Mitsubishi PtSi Model 500'.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0420010201010000)),
            TagTraits::new(
                8,
                "KLV_0104_IMAGE_COORDINATE_SYSTEM",
                text(),
                "Image Coordinate System",
                "Name of the image coordinate system used.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701010100000000)),
            TagTraits::new(
                9,
                "KLV_0104_DEVICE_LATITUDE",
                FloatFormat::fixed(8)?,
                "Device Latitude",
                "Latitude of the currently active sensor, based on WGS84 ellipsoid.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x0701020102040200)),
            TagTraits::new(
                10,
                "KLV_0104_DEVICE_LONGITUDE",
                FloatFormat::fixed(8)?,
                "Device Longitude",
                "Longitude of the currently active sensor, based on WGS84 ellipsoid.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x0701020102060200)),
            TagTraits::new(
                11,
                "KLV_0104_DEVICE_ALTITUDE",
                FloatFormat::new()?,
                "Device Altitude",
                "Altitude of the currently active sensor, relative to Mean Sea Level. Measured in meters.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701020102020000)),
            TagTraits::new(
                12,
                "KLV_0104_HORIZONTAL_FOV",
                FloatFormat::fixed(4)?,
                "Horizontal Field of View",
                "Horizonal field of view of the currently active sensor. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010102, 0x0420020101080000)),
            TagTraits::new(
                13,
                "KLV_0104_VERTICAL_FOV",
                FloatFormat::fixed(4)?,
                "Vertical Field of View",
                "Vertical field of view of the currently active sensor. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010107, 0x04200201010A0100)),
            TagTraits::new(
                14,
                "KLV_0104_SLANT_RANGE",
                FloatFormat::new()?,
                "Slant Range",
                "Distance between currently active sensor and the image center. Measured in meters.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701080101000000)),
            TagTraits::new(
                15,
                "KLV_0104_TARGET_WIDTH",
                FloatFormat::new()?,
                "Target Width",
                "Target width within sensor field of view. Measured in meters.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701090201000000)),
            TagTraits::new(
                16,
                "KLV_0104_FRAME_CENTER_LATITUDE",
                FloatFormat::fixed(8)?,
                "Frame Center Latitude",
                "Latitude of image center, based on WGS84 ellipsoid.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701020103020000)),
            TagTraits::new(
                17,
                "KLV_0104_FRAME_CENTER_LONGITUDE",
                FloatFormat::fixed(8)?,
                "Frame Center Longitude",
                "Latitude of image center, based on WGS84 ellipsoid.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701020103040000)),
            TagTraits::new(
                18,
                "KLV_0104_FRAME_CENTER_ELEVATION",
                FloatFormat::new()?,
                "Frame Center Elevation",
                "Elevation of image center, relative to Mean Sea Level.",
            )
            .uds_key(UdsKey::from_words(0x060E2B340101010A, 0x0701020103160000)),
            TagTraits::new(
                19,
                "KLV_0104_CORNER_LATITUDE_POINT_1",
                FloatFormat::fixed(8)?,
                "Corner Latitude Point 1",
                "Latitude for the upper left corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x0701020103070100)),
            TagTraits::new(
                20,
                "KLV_0104_CORNER_LATITUDE_POINT_2",
                FloatFormat::fixed(8)?,
                "Corner Latitude Point 2",
                "Latitude for the upper right corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x0701020103080100)),
            TagTraits::new(
                21,
                "KLV_0104_CORNER_LATITUDE_POINT_3",
                FloatFormat::fixed(8)?,
                "Corner Latitude Point 3",
                "Latitude for the lower right corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x0701020103090100)),
            TagTraits::new(
                22,
                "KLV_0104_CORNER_LATITUDE_POINT_4",
                FloatFormat::fixed(8)?,
                "Corner Latitude Point 4",
                "Latitude for the lower left corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x07010201030A0100)),
            TagTraits::new(
                23,
                "KLV_0104_CORNER_LONGITUDE_POINT_1",
                FloatFormat::fixed(8)?,
                "Corner Longitude Point 1",
                "Longitude for the upper left corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x07010201030B0100)),
            TagTraits::new(
                24,
                "KLV_0104_CORNER_LONGITUDE_POINT_2",
                FloatFormat::fixed(8)?,
                "Corner Longitude Point 2",
                "Longitude for the upper right corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x07010201030C0100)),
            TagTraits::new(
                25,
                "KLV_0104_CORNER_LONGITUDE_POINT_3",
                FloatFormat::fixed(8)?,
                "Corner Longitude Point 3",
                "Longitude for the lower right corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x07010201030D0100)),
            TagTraits::new(
                26,
                "KLV_0104_CORNER_LONGITUDE_POINT_4",
                FloatFormat::fixed(8)?,
                "Corner Longitude Point 4",
                "Longitude for the lower left corner of the image.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010103, 0x07010201030E0100)),
            TagTraits::new(
                27,
                "KLV_0104_SECURITY_LOCAL_SET",
                blob(),
                "Security Local Set",
                "MISB ST 0102 local set for security metadata.",
            )
            .uds_key(SECURITY_LOCAL_SET_KEY),
            TagTraits::new(
                28,
                "KLV_0104_START_DATETIME",
                text(),
                "Start Datetime",
                "Start time of Motion Imagery Collection. Format: YYYYMMDDDThhmmss. UTC.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0702010201010000)),
            TagTraits::new(
                29,
                "KLV_0104_EVENT_START_DATETIME",
                text(),
                "Event Start Datetime",
                "Start time of scene, project, event, mission, editing event, license, publication, etc. Format: YYYYMMDDDThhmmss. UTC.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0702010207010000)),
            TagTraits::new(
                30,
                "KLV_0104_SENSOR_ROLL_ANGLE",
                FloatFormat::fixed(4)?,
                "Sensor Roll Angle",
                "Angle between sensor pointing direction and transverse-longitudinal plane. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701100101000000)),
            TagTraits::new(
                31,
                "KLV_0104_ANGLE_TO_NORTH",
                FloatFormat::fixed(4)?,
                "Angle to North",
                "Angle between sensor pointing direction and true north measured in the horizontal plane. Angles increase in a clockwise direction when looking from above the platform. Measured in degrees.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701100102000000)),
            TagTraits::new(
                32,
                "KLV_0104_OBLIQUITY_ANGLE",
                FloatFormat::fixed(4)?,
                "Obliquity Angle",
                "Inverse of sensor elevation angle. Measured in degrees. Examples: 0 degrees is backward, 180 degrees is forward, 270 degrees is down.",
            )
            .uds_key(UdsKey::from_words(0x060E2B3401010101, 0x0701100103000000)),
        ],
    )
}
