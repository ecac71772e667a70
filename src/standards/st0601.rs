//! ST0601 UAS datalink local set.
//!
//! The largest table in the registry.  Most numeric tags are FLINTs with a
//! fixed width; the newer "extended" tags use variable-length IMAP.  Tags
//! 100 and 101 nest further ST0601 sets for segments and amendments.

use super::st1010::SdccFlpFormat;
use super::st1204::MiisIdFormat;
use super::{blob, sint_free, text, uint, uint_free};
use crate::errors::*;
use crate::format::{EnumFormat, FlintFormat, ImapFormat};
use crate::length_constraints::LengthConstraints;
use crate::registry::Standard;
use crate::set::LocalSetFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

pub const ICING_DETECTED: &[(u64, &str)] = &[
    (0, "Detector Off"),
    (1, "No Icing Detected"),
    (2, "Icing Detected"),
];

pub const SENSOR_FOV_NAMES: &[(u64, &str)] = &[
    (0, "Ultranarrow"),
    (1, "Narrow"),
    (2, "Medium"),
    (3, "Wide"),
    (4, "Ultrawide"),
    (5, "Narrow Medium"),
    (6, "2x Ultranarrow"),
    (7, "4x Ultranarrow"),
    (8, "Continuous Zoom"),
];

pub const OPERATIONAL_MODES: &[(u64, &str)] = &[
    (0, "Other"),
    (1, "Operational"),
    (2, "Training"),
    (3, "Exercise"),
    (4, "Maintenance"),
    (5, "Test"),
];

pub const PLATFORM_STATUSES: &[(u64, &str)] = &[
    (0, "Active"),
    (1, "Preflight"),
    (2, "Preflight - Taxiing"),
    (3, "Run-up"),
    (4, "Take-off"),
    (5, "Ingress"),
    (6, "Manual Operation"),
    (7, "Automated Orbit"),
    (8, "Transitioning"),
    (9, "Egress"),
    (10, "Landing"),
    (11, "Landing - Taxiing"),
    (12, "Landed - Parked"),
];

pub const SENSOR_CONTROL_MODES: &[(u64, &str)] = &[
    (0, "Off"),
    (1, "Home Position"),
    (2, "Uncontrolled"),
    (3, "Manual Control"),
    (4, "Calibrating"),
    (5, "Auto - Holding Position"),
    (6, "Auto - Tracking"),
];

fn one_byte_enum(name: &'static str, names: &'static [(u64, &'static str)]) -> Result<EnumFormat, KlvError> {
    Ok(EnumFormat::new(name, LengthConstraints::fixed(1)?, names))
}

fn icing_detected() -> Result<EnumFormat, KlvError> {
    one_byte_enum("icing detected", ICING_DETECTED)
}

fn sensor_fov_name() -> Result<EnumFormat, KlvError> {
    one_byte_enum("sensor FOV name", SENSOR_FOV_NAMES)
}

fn operational_mode() -> Result<EnumFormat, KlvError> {
    one_byte_enum("operational mode", OPERATIONAL_MODES)
}

fn platform_status() -> Result<EnumFormat, KlvError> {
    one_byte_enum("platform status", PLATFORM_STATUSES)
}

fn sensor_control_mode() -> Result<EnumFormat, KlvError> {
    one_byte_enum("sensor control mode", SENSOR_CONTROL_MODES)
}

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0601",
        vec![
            TagTraits::unknown("KLV_0601_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0601_CHECKSUM",
                uint(2)?,
                "Checksum",
                "Checksum used to detect errors within a ST 0601 packet.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                2,
                "KLV_0601_PRECISION_TIMESTAMP",
                uint(8)?,
                "Precision Timestamp",
                "Timestamp for all metadata in a ST 0601 local set. Used to coordinate with Motion Imagery.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_0601_MISSION_ID",
                text(),
                "Mission ID",
                "Descriptive mission identifier to distinguish an event or sortie.",
            ),
            TagTraits::new(
                4,
                "KLV_0601_PLATFORM_TAIL_NUMBER",
                text(),
                "Platform Tail Number",
                "Identifier of platform as posted.",
            ),
            TagTraits::new(
                5,
                "KLV_0601_PLATFORM_HEADING_ANGLE",
                FlintFormat::unsigned(0.0, 360.0, 2)?,
                "Platform Heading Angle",
                "Angle between longitudinal axis and true north measured in the horizontal plane. Angles increase in a clockwise direction when looking from above the platform. Measured in degrees.",
            ),
            TagTraits::new(
                6,
                "KLV_0601_PLATFORM_PITCH_ANGLE",
                FlintFormat::signed(20.0, 2)?,
                "Platform Pitch Angle",
                "Angle between longitudinal axis and horizonal plane. Positive angles above horizonal plane. Measured in degrees.",
            ),
            TagTraits::new(
                7,
                "KLV_0601_PLATFORM_ROLL_ANGLE",
                FlintFormat::signed(50.0, 2)?,
                "Platform Roll Angle",
                "Angle between transverse axis and transverse-longitudinal plane. Measured in degrees.",
            ),
            TagTraits::new(
                8,
                "KLV_0601_PLATFORM_TRUE_AIRSPEED",
                FlintFormat::unsigned(0.0, 255.0, 1)?,
                "Platform True Airspeed",
                "True airspeed of the platform: indicated airspeed adjusted for temperature and altitude. Measured in meters per second.",
            ),
            TagTraits::new(
                9,
                "KLV_0601_PLATFORM_INDICATED_AIRSPEED",
                FlintFormat::unsigned(0.0, 255.0, 1)?,
                "Platform Indicated Airspeed",
                "Indicated airspeed of the platform. Derived from Pitot tube and static pressure sensors. Measured in meters per second.",
            ),
            TagTraits::new(
                10,
                "KLV_0601_PLATFORM_DESIGNATION",
                text(),
                "Platform Designation",
                "Model name for the platform. Examples: 'Predator', 'Reaper'.",
            ),
            TagTraits::new(
                11,
                "KLV_0601_IMAGE_SOURCE_SENSOR",
                text(),
                "Image Source Sensor",
                "Name of the currently active sensor. Examples: 'EO Nose', 'TESAR Imagery'.",
            ),
            TagTraits::new(
                12,
                "KLV_0601_IMAGE_COORDINATE_SYSTEM",
                text(),
                "Image Coordinate System",
                "Name of the image coordinate system used.",
            ),
            TagTraits::new(
                13,
                "KLV_0601_SENSOR_LATITUDE",
                FlintFormat::signed(90.0, 4)?,
                "Sensor Latitude",
                "Latitude of the currently active sensor, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                14,
                "KLV_0601_SENSOR_LONGITUDE",
                FlintFormat::signed(180.0, 4)?,
                "Sensor Longitude",
                "Longitude of the currently active sensor, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                15,
                "KLV_0601_SENSOR_TRUE_ALTITUDE",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Sensor True Altitude",
                "Altitude of the currently active sensor, relative to Mean Sea Level. Measured in meters.",
            ),
            TagTraits::new(
                16,
                "KLV_0601_SENSOR_HORIZONTAL_FOV",
                FlintFormat::unsigned(0.0, 180.0, 2)?,
                "Sensor Horizontal Field of View",
                "Horizonal field of view of the currently active sensor. Measured in degrees.",
            ),
            TagTraits::new(
                17,
                "KLV_0601_SENSOR_VERTICAL_FOV",
                FlintFormat::unsigned(0.0, 180.0, 2)?,
                "Sensor Vertical Field of View",
                "Vertical field of view of the currently active sensor. Measured in degrees.",
            ),
            TagTraits::new(
                18,
                "KLV_0601_SENSOR_RELATIVE_AZIMUTH_ANGLE",
                FlintFormat::unsigned(0.0, 360.0, 4)?,
                "Sensor Relative Azimuth Angle",
                "Relative rotation angle of the currently active sensor to the platform longitudinal axis. Measured in degrees.",
            ),
            TagTraits::new(
                19,
                "KLV_0601_SENSOR_RELATIVE_ELEVATION_ANGLE",
                FlintFormat::signed(180.0, 4)?,
                "Sensor Relative Elevation Angle",
                "Relative elevation angle of the currently active sensor to the platform longitudinal-transverse plane. Measured in degrees.",
            ),
            TagTraits::new(
                20,
                "KLV_0601_SENSOR_RELATIVE_ROLL_ANGLE",
                FlintFormat::unsigned(0.0, 360.0, 4)?,
                "Sensor Relative Roll Angle",
                "Relative roll angle of the currently active sensor to the platform. Measured in degrees.",
            ),
            TagTraits::new(
                21,
                "KLV_0601_SLANT_RANGE",
                FlintFormat::unsigned(0.0, 5.0e6, 4)?,
                "Slant Range",
                "Distance between currently active sensor and the image center. Measured in meters.",
            ),
            TagTraits::new(
                22,
                "KLV_0601_TARGET_WIDTH",
                FlintFormat::unsigned(0.0, 1.0e4, 2)?,
                "Target Width",
                "Target width within sensor field of view. Measured in meters.",
            ),
            TagTraits::new(
                23,
                "KLV_0601_FRAME_CENTER_LATITUDE",
                FlintFormat::signed(90.0, 4)?,
                "Frame Center Latitude",
                "Latitude of image center, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                24,
                "KLV_0601_FRAME_CENTER_LONGITUDE",
                FlintFormat::signed(180.0, 4)?,
                "Frame Center Longitude",
                "Longitude of image center, based on WGS84 ellipsoid.",
            ),
            TagTraits::new(
                25,
                "KLV_0601_FRAME_CENTER_ELEVATION",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Frame Center Elevation",
                "Altitude of image center, relative to Mean Sea Level.",
            ),
            TagTraits::new(
                26,
                "KLV_0601_OFFSET_CORNER_LATITUDE_POINT_1",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Latitude Point 1",
                "Latitude offset for the upper left corner of the image.",
            ),
            TagTraits::new(
                27,
                "KLV_0601_OFFSET_CORNER_LONGITUDE_POINT_1",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Longitude Point 1",
                "Longitude offset for the upper left corner of the image.",
            ),
            TagTraits::new(
                28,
                "KLV_0601_OFFSET_CORNER_LATITUDE_POINT_2",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Latitude Point 2",
                "Latitude offset for the upper right corner of the image.",
            ),
            TagTraits::new(
                29,
                "KLV_0601_OFFSET_CORNER_LONGITUDE_POINT_2",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Longitude Point 2",
                "Longitude offset for the upper right corner of the image.",
            ),
            TagTraits::new(
                30,
                "KLV_0601_OFFSET_CORNER_LATITUDE_POINT_3",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Latitude Point 3",
                "Latitude offset for the lower right corner of the image.",
            ),
            TagTraits::new(
                31,
                "KLV_0601_OFFSET_CORNER_LONGITUDE_POINT_3",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Longitude Point 3",
                "Longitude offset for the lower right corner of the image.",
            ),
            TagTraits::new(
                32,
                "KLV_0601_OFFSET_CORNER_LATITUDE_POINT_4",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Latitude Point 4",
                "Latitude offset for the lower left corner of the image.",
            ),
            TagTraits::new(
                33,
                "KLV_0601_OFFSET_CORNER_LONGITUDE_POINT_4",
                FlintFormat::signed(0.075, 2)?,
                "Offset Corner Longitude Point 4",
                "Longitude offset for the lower left corner of the image.",
            ),
            TagTraits::new(
                34,
                "KLV_0601_ICING_DETECTED",
                icing_detected()?,
                "Icing Detected",
                "Flag for whether icing is detected on the aircraft.",
            ),
            TagTraits::new(
                35,
                "KLV_0601_WIND_DIRECTION",
                FlintFormat::unsigned(0.0, 360.0, 2)?,
                "Wind Direction",
                "Wind direction at the aircraft's location relative to true north. Angle increases in a clockwise direction when looking from above the platform. Measured in degrees.",
            ),
            TagTraits::new(
                36,
                "KLV_0601_WIND_SPEED",
                FlintFormat::unsigned(0.0, 100.0, 1)?,
                "Wind Speed",
                "Wind speed at the aircraft's location. Measured in meters per second.",
            ),
            TagTraits::new(
                37,
                "KLV_0601_STATIC_PRESSURE",
                FlintFormat::unsigned(0.0, 5000.0, 2)?,
                "Static Pressure",
                "Static pressure at the aircraft's location. Measured in millibar.",
            ),
            TagTraits::new(
                38,
                "KLV_0601_DENSITY_ALTITUDE",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Density Altitude",
                "Density altitude at the aircraft's location. Measured in meters.",
            ),
            TagTraits::new(
                39,
                "KLV_0601_OUTSIDE_AIR_TEMPERATURE",
                FlintFormat::signed(127.0, 1)?,
                "Outside Air Temperature",
                "Temperature outside of the aircraft. Measured in degrees Celsius.",
            ),
            TagTraits::new(
                40,
                "KLV_0601_TARGET_LOCATION_LATITUDE",
                FlintFormat::signed(90.0, 4)?,
                "Target Location Latitude",
                "Calculated target latitude, based on WGS84 ellipsoid. Tracks crosshair, not image center.",
            ),
            TagTraits::new(
                41,
                "KLV_0601_TARGET_LOCATION_LONGITUDE",
                FlintFormat::signed(180.0, 4)?,
                "Target Location Longitude",
                "Calculated target longitude, based on WGS84 ellipsoid. Tracks crosshair, not image center.",
            ),
            TagTraits::new(
                42,
                "KLV_0601_TARGET_LOCATION_ELEVATION",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Target Location Elevation",
                "Calculated target altitude, relative to Mean Sea Level. Tracks crosshair, not image center. Measured in meters.",
            ),
            TagTraits::new(
                43,
                "KLV_0601_TARGET_TRACK_GATE_WIDTH",
                FlintFormat::unsigned(0.0, 510.0, 1)?,
                "Target Track Gate Width",
                "Width of box around tracked target. Measured in pixels.",
            ),
            TagTraits::new(
                44,
                "KLV_0601_TARGET_TRACK_GATE_HEIGHT",
                FlintFormat::unsigned(0.0, 510.0, 1)?,
                "Target Track Gate Height",
                "Height of box around tracked target. Measured in pixels.",
            ),
            TagTraits::new(
                45,
                "KLV_0601_TARGET_ERROR_ESTIMATE_CE90",
                FlintFormat::unsigned(0.0, 4095.0, 2)?,
                "Target Error Estimate - CE90",
                "Radius of 90% confidence for the target location in the horizonal direction. Measured in meters.",
            ),
            TagTraits::new(
                46,
                "KLV_0601_TARGET_ERROR_ESTIMATE_LE90",
                FlintFormat::unsigned(0.0, 4095.0, 2)?,
                "Target Error Estimate - LE90",
                "Radius of 90% confidence for the target location in the vertical direction. Measured in meters.",
            ),
            TagTraits::new(
                47,
                "KLV_0601_GENERIC_FLAG_DATA",
                uint(1)?,
                "Generic Flag Data",
                "Bits representing miscellaneous boolean values.",
            ),
            TagTraits::new(
                48,
                "KLV_0601_SECURITY_LOCAL_SET",
                LocalSetFormat::new(Standard::St0102),
                "Security Local Set",
                "MISB ST 0102 local set for security metadata.",
            ),
            TagTraits::new(
                49,
                "KLV_0601_DIFFERENTIAL_PRESSURE",
                FlintFormat::unsigned(0.0, 5000.0, 2)?,
                "Differential Pressure",
                "Differential pressure at the aircraft's location. Equal to total pressure minus static pressure. Measured in millibar.",
            ),
            TagTraits::new(
                50,
                "KLV_0601_PLATFORM_ANGLE_OF_ATTACK",
                FlintFormat::signed(20.0, 2)?,
                "Platform Angle of Attack",
                "Vertical angle between the platform longitudinal axis and the relative wind. Measured in degrees.",
            ),
            TagTraits::new(
                51,
                "KLV_0601_PLATFORM_VERTICAL_SPEED",
                FlintFormat::signed(180.0, 2)?,
                "Platform Vertical Speed",
                "Vertical speed of aircraft in the zenith direction. Measured in meters per second.",
            ),
            TagTraits::new(
                52,
                "KLV_0601_PLATFORM_SIDESLIP_ANGLE",
                FlintFormat::signed(20.0, 2)?,
                "Platform Sideslip Angle",
                "Horizontal angle between the platform longitudinal axis and the relative wind. Angle increases in a clockwise direction when looking from above the platform. Measured in degrees.",
            ),
            TagTraits::new(
                53,
                "KLV_0601_AIRFIELD_BAROMETRIC_PRESSURE",
                FlintFormat::unsigned(0.0, 5000.0, 2)?,
                "Airfield Barometric Pressure",
                "Local pressure at the airfield. Measured in millibar.",
            ),
            TagTraits::new(
                54,
                "KLV_0601_AIRFIELD_ELEVATION",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Airfield Elevation",
                "Altitude of the airfield, relative to Mean Sea Level. Measured in meters.",
            ),
            TagTraits::new(
                55,
                "KLV_0601_RELATIVE_HUMIDITY",
                FlintFormat::unsigned(0.0, 100.0, 1)?,
                "Relative Humidity",
                "Relative humidity at the aircraft location. Ratio between the current water vapor density and the saturation point of water vapor density. Measured in percent.",
            ),
            TagTraits::new(
                56,
                "KLV_0601_PLATFORM_GROUND_SPEED",
                FlintFormat::unsigned(0.0, 255.0, 1)?,
                "Platform Ground Speed",
                "Speed of the aircraft when projected onto the ground plane.",
            ),
            TagTraits::new(
                57,
                "KLV_0601_GROUND_RANGE",
                FlintFormat::unsigned(0.0, 5.0e6, 4)?,
                "Ground Range",
                "Horizontal distance between the aircraft and the target of interest.",
            ),
            TagTraits::new(
                58,
                "KLV_0601_PLATFORM_FUEL_REMAINING",
                FlintFormat::unsigned(0.0, 1.0e4, 2)?,
                "Platform Fuel Remaining",
                "Current weight of fuel present on the aircraft. Measured in kilograms.",
            ),
            TagTraits::new(
                59,
                "KLV_0601_PLATFORM_CALL_SIGN",
                text(),
                "Platform Call Sign",
                "Call sign of the platform or operating unit.",
            ),
            TagTraits::new(
                60,
                "KLV_0601_WEAPON_LOAD",
                uint(2)?,
                "Weapon Load",
                "Current weapons stored on aircraft. Deprecated by Item 140 (Weapon Stores).",
            ),
            TagTraits::new(
                61,
                "KLV_0601_WEAPON_FIRED",
                uint(1)?,
                "Weapon Fired",
                "Signal when a particular weapon is released.",
            ),
            TagTraits::new(
                62,
                "KLV_0601_LASER_PRF_CODE",
                uint(2)?,
                "Laser PRF Code",
                "A laser's pulse repetition frequency used to mark a target. Three or four digit number with digits 1-8.",
            ),
            TagTraits::new(
                63,
                "KLV_0601_SENSOR_FOV_NAME",
                sensor_fov_name()?,
                "Sensor Field of View Name",
                "Current lens type.",
            ),
            TagTraits::new(
                64,
                "KLV_0601_PLATFORM_MAGNETIC_HEADING",
                FlintFormat::unsigned(0.0, 360.0, 2)?,
                "Platform Magnetic Heading",
                "Angle between longitudingal axis and Magnetic North measured in the horizontal plane. Measured in degrees.",
            ),
            TagTraits::new(
                65,
                "KLV_0601_VERSION_NUMBER",
                uint(1)?,
                "UAS Datalink LS Version Number",
                "Major version of MISB ST 0601 used as the source standard when encoding this local set.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                66,
                "KLV_0601_DEPRECATED",
                blob(),
                "Deprecated Tag",
                "This item is deprecated.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                67,
                "KLV_0601_ALTERNATE_PLATFORM_LATITUDE",
                FlintFormat::signed(90.0, 4)?,
                "Alternate Platform Latitude",
                "Latitude of the platform connected to the UAS via direct datalink.",
            ),
            TagTraits::new(
                68,
                "KLV_0601_ALTERNATE_PLATFORM_LONGITUDE",
                FlintFormat::signed(180.0, 4)?,
                "Alternate Platform Longitude",
                "Longitude of the platform connected to the UAS via direct datalink.",
            ),
            TagTraits::new(
                69,
                "KLV_0601_ALTERNATE_PLATFORM_ALTITUDE",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Alternate Platform Altitude",
                "Altitude of the platform connected to the UAS via direct datalink.",
            ),
            TagTraits::new(
                70,
                "KLV_0601_ALTERNATE_PLATFORM_NAME",
                text(),
                "Alternate Platform Name",
                "Name of the platform connected to the UAS via direct datalink. Examples: 'Apache', 'Rover'.",
            ),
            TagTraits::new(
                71,
                "KLV_0601_ALTERNATE_PLATFORM_HEADING",
                FlintFormat::unsigned(0.0, 360.0, 2)?,
                "Alternate Platform Heading",
                "Heading angle of the platform connected to the UAS via direct datalink.",
            ),
            TagTraits::new(
                72,
                "KLV_0601_EVENT_START_TIME",
                uint(8)?,
                "Event Start Time",
                "Start time of scene, project, event, mission, editing event, license, publication, etc, represented in the number of UTC microseconds elapsed since midnight, January 1, 1970.",
            ),
            TagTraits::new(
                73,
                "KLV_0601_RVT_LOCAL_SET",
                LocalSetFormat::new(Standard::St0806),
                "RVT Local Set",
                "MISB ST 0806 local set for remote video terminals.",
            ),
            TagTraits::new(
                74,
                "KLV_0601_VMTI_LOCAL_SET",
                LocalSetFormat::new(Standard::St0903),
                "VMTI Local Set",
                "MISB ST 0903 local set for the video moving target indicator.",
            ),
            TagTraits::new(
                75,
                "KLV_0601_SENSOR_ELLIPSOID_HEIGHT",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Sensor Ellipsoid Height",
                "Altitude of the currently active sensor, relative to the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                76,
                "KLV_0601_ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Alternate Platform Ellipsoid Height",
                "Altitude of the platform connected to the UAS via direct datalink, relative to the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                77,
                "KLV_0601_OPERATIONAL_MODE",
                operational_mode()?,
                "Operational Mode",
                "Mode of operation of the event portrayed in the Motion Imagery.",
            ),
            TagTraits::new(
                78,
                "KLV_0601_FRAME_CENTER_ELLIPSOID_HEIGHT",
                FlintFormat::unsigned(-900.0, 19000.0, 2)?,
                "Frame Center Height Above Ellipsoid",
                "Altitude of frame center, relative to the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                79,
                "KLV_0601_SENSOR_NORTH_VELOCITY",
                FlintFormat::signed(327.0, 2)?,
                "Sensor North Velocity",
                "Northing velocity of the sensor or platform.",
            ),
            TagTraits::new(
                80,
                "KLV_0601_SENSOR_EAST_VELOCITY",
                FlintFormat::signed(327.0, 2)?,
                "Sensor East Velocity",
                "Easting velocity of the sensor or platform.",
            ),
            TagTraits::new(
                81,
                "KLV_0601_IMAGE_HORIZON_PIXEL_PACK",
                blob(),
                "Image Horizon Pixel Pack",
                "Location of earth-sky horizon in the image.",
            ),
            TagTraits::new(
                82,
                "KLV_0601_FULL_CORNER_LATITUDE_POINT_1",
                FlintFormat::signed(90.0, 4)?,
                "Corner Latitude Point 1 (Full)",
                "Latitude for the upper left corner of the image.",
            ),
            TagTraits::new(
                83,
                "KLV_0601_FULL_CORNER_LONGITUDE_POINT_1",
                FlintFormat::signed(180.0, 4)?,
                "Corner Longitude Point 1 (Full)",
                "Longitude for the upper left corner of the image.",
            ),
            TagTraits::new(
                84,
                "KLV_0601_FULL_CORNER_LATITUDE_POINT_2",
                FlintFormat::signed(90.0, 4)?,
                "Corner Latitude Point 2 (Full)",
                "Latitude for the upper right corner of the image.",
            ),
            TagTraits::new(
                85,
                "KLV_0601_FULL_CORNER_LONGITUDE_POINT_2",
                FlintFormat::signed(180.0, 4)?,
                "Corner Longitude Point 2 (Full)",
                "Longitude for the upper right corner of the image.",
            ),
            TagTraits::new(
                86,
                "KLV_0601_FULL_CORNER_LATITUDE_POINT_3",
                FlintFormat::signed(90.0, 4)?,
                "Corner Latitude Point 3 (Full)",
                "Latitude for the lower right corner of the image.",
            ),
            TagTraits::new(
                87,
                "KLV_0601_FULL_CORNER_LONGITUDE_POINT_3",
                FlintFormat::signed(180.0, 4)?,
                "Corner Longitude Point 3 (Full)",
                "Longitude for the lower right corner of the image.",
            ),
            TagTraits::new(
                88,
                "KLV_0601_FULL_CORNER_LATITUDE_POINT_4",
                FlintFormat::signed(90.0, 4)?,
                "Corner Latitude Point 4 (Full)",
                "Latitude for the lower left corner of the image.",
            ),
            TagTraits::new(
                89,
                "KLV_0601_FULL_CORNER_LONGITUDE_POINT_4",
                FlintFormat::signed(180.0, 4)?,
                "Corner Longitude Point 4 (Full)",
                "Longitude for the lower left corner of the image.",
            ),
            TagTraits::new(
                90,
                "KLV_0601_FULL_PLATFORM_PITCH_ANGLE",
                FlintFormat::signed(90.0, 4)?,
                "Platform Pitch Angle (Full)",
                "Angle between longitudinal axis and horizonal plane. Positive angles above horizonal plane. Measured in degrees.",
            ),
            TagTraits::new(
                91,
                "KLV_0601_FULL_PLATFORM_ROLL_ANGLE",
                FlintFormat::signed(90.0, 4)?,
                "Platform Roll Angle (Full)",
                "Angle between transverse axis and transverse-longitudinal plane. Measured in degrees.",
            ),
            TagTraits::new(
                92,
                "KLV_0601_FULL_PLATFORM_ANGLE_OF_ATTACK",
                FlintFormat::signed(90.0, 4)?,
                "Platform Angle of Attack (Full)",
                "Vertical angle between the platform longitudinal axis and the relative wind. Measured in degrees.",
            ),
            TagTraits::new(
                93,
                "KLV_0601_FULL_PLATFORM_SIDESLIP_ANGLE",
                FlintFormat::signed(180.0, 4)?,
                "Platform Sideslip Angle (Full)",
                "Horizontal angle between the platform longitudinal axis and the relative wind. Angle increases in a clockwise direction when looking from above the platform. Measured in degrees.",
            ),
            TagTraits::new(
                94,
                "KLV_0601_MIIS_CORE_IDENTIFIER",
                MiisIdFormat::new()?,
                "MIIS Core Identifier",
                "Binary value of MISB ST 1201 core identifier.",
            ),
            TagTraits::new(
                95,
                "KLV_0601_SAR_MOTION_IMAGERY_LOCAL_SET",
                LocalSetFormat::new(Standard::St1206),
                "SAR Motion Imagery Local Set",
                "MISB ST 1206 local set for synthetic aperture radar Motion Imagery.",
            ),
            TagTraits::new(
                96,
                "KLV_0601_TARGET_WIDTH_EXTENDED",
                ImapFormat::variable(0.0, 1.5e6, 3)?,
                "Target Width Extended",
                "Target width within sensor field of view. Measured in meters.",
            ),
            TagTraits::new(
                97,
                "KLV_0601_RANGE_IMAGE_LOCAL_SET",
                LocalSetFormat::new(Standard::St1002),
                "Range Image Local Set",
                "MISB ST 1002 local set for range images.",
            ),
            TagTraits::new(
                98,
                "KLV_0601_GEOREGISTRATION_LOCAL_SET",
                LocalSetFormat::new(Standard::St1601),
                "Geo-Registration Local Set",
                "MISB ST 1601 local set for geo-registration.",
            ),
            TagTraits::new(
                99,
                "KLV_0601_COMPOSITE_IMAGING_LOCAL_SET",
                LocalSetFormat::new(Standard::St1602),
                "Composite Imaging Local Set",
                "MISB ST 1602 local set for composite imaging.",
            ),
            TagTraits::new(
                100,
                "KLV_0601_SEGMENT_LOCAL_SET",
                LocalSetFormat::new(Standard::St0601),
                "Segment Local Set",
                "MISB ST 1607 Segment local set for metadata sharing across parent and child sets.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                101,
                "KLV_0601_AMEND_LOCAL_SET",
                LocalSetFormat::new(Standard::St0601),
                "Amend Local Set",
                "MISB ST 1607 Amend local set for metadata corrections.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                102,
                "KLV_0601_SDCC_FLP",
                SdccFlpFormat::new(),
                "SDCC-FLP",
                "MISB ST 1010 floating length pack for standard deviation and cross-correlation metadata.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                103,
                "KLV_0601_DENSITY_ALTITUDE_EXTENDED",
                ImapFormat::variable(-900.0, 40000.0, 3)?,
                "Density Altitude Extended",
                "Density altitude at the aircraft's location. Measured in meters.",
            ),
            TagTraits::new(
                104,
                "KLV_0601_SENSOR_ELLIPSOID_HEIGHT_EXTENDED",
                ImapFormat::variable(-900.0, 40000.0, 3)?,
                "Sensor Ellipsoid Height Extended",
                "Altitude of the currently active sensor, relative to the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                105,
                "KLV_0601_ALTERNATE_PLATFORM_ELLIPSOID_HEIGHT_EXTENDED",
                ImapFormat::variable(-900.0, 40000.0, 3)?,
                "Alternate Platform Ellipsoid Height Extended",
                "Altitude of the platform connected to the UAS via direct datalink, relative to the WGS84 ellipsoid.",
            ),
            TagTraits::new(
                106,
                "KLV_0601_STREAM_DESIGNATOR",
                text(),
                "Stream Designator",
                "Shorthand descriptor for a particular Motion Imagery data stream, typically delivered over IP.",
            ),
            TagTraits::new(
                107,
                "KLV_0601_OPERATIONAL_BASE",
                text(),
                "Operational Base",
                "Indicates the location for the launch recovery equipment.",
            ),
            TagTraits::new(
                108,
                "KLV_0601_BROADCAST_SOURCE",
                text(),
                "Broadcast Source",
                "Location where the Motion Imagery is first broadcast. Examples: 'Creech', 'Cannon'.",
            ),
            TagTraits::new(
                109,
                "KLV_0601_RANGE_TO_RECOVERY_LOCATION",
                ImapFormat::variable(0.0, 21000.0, 3)?,
                "Range to Recovery Location",
                "Distance from current position to airframe recovery position. Measured in kilometers.",
            ),
            TagTraits::new(
                110,
                "KLV_0601_TIME_AIRBORNE",
                uint_free(),
                "Time Airborne",
                "Number of seconds the aircraft has been airborne.",
            ),
            TagTraits::new(
                111,
                "KLV_0601_PROPULSION_UNIT_SPEED",
                uint_free(),
                "Propulsion Unit Speed",
                "Speed at which the engine or motor is rotating.",
            ),
            TagTraits::new(
                112,
                "KLV_0601_PLATFORM_COURSE_ANGLE",
                ImapFormat::variable(0.0, 360.0, 2)?,
                "Platform Course Angle",
                "Angle between aircraft velocity vector and true north measured in the horizontal plane. Angles increase in a clockwise direction when looking from above the platform. Measured in degrees.",
            ),
            TagTraits::new(
                113,
                "KLV_0601_ALTITUDE_ABOVE_GROUND_LEVEL",
                ImapFormat::variable(-900.0, 40000.0, 3)?,
                "Altitude Above Ground Level",
                "Vertical distance between the aircraft and the ground or water. Measured in meters.",
            ),
            TagTraits::new(
                114,
                "KLV_0601_RADAR_ALTIMETER",
                ImapFormat::variable(-900.0, 40000.0, 3)?,
                "Radar Altimeter",
                "Vertical distance between the aircraft and the ground or water, as measured by a radar altimeter.",
            ),
            TagTraits::new(
                115,
                "KLV_0601_CONTROL_COMMAND",
                blob(),
                "Control Command",
                "Record of command from ground control station to aircraft.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                116,
                "KLV_0601_CONTROL_COMMAND_VERIFICATION_LIST",
                blob(),
                "Control Command Verification List",
                "Acknowledgement from the platform that one or more control commands were received.",
            ),
            TagTraits::new(
                117,
                "KLV_0601_SENSOR_AZIMUTH_RATE",
                ImapFormat::variable(-1000.0, 1000.0, 3)?,
                "Sensor Azimuth Rate",
                "Rate at which the sensor is rotating clockwise, when looking down from above the aircraft. Measured in degrees per second.",
            ),
            TagTraits::new(
                118,
                "KLV_0601_SENSOR_ELEVATION_RATE",
                ImapFormat::variable(-1000.0, 1000.0, 3)?,
                "Sensor Elevation Rate",
                "Rate at which the sensor is rotating clockwise, when looking at the aircraft from the side such that the aircraft is pointing left. Measured in degrees per second.",
            ),
            TagTraits::new(
                119,
                "KLV_0601_SENSOR_ROLL_RATE",
                ImapFormat::variable(-1000.0, 1000.0, 3)?,
                "Sensor Roll Rate",
                "Rate at which the sensor is rotating clockwise, when looking from behind the sensor. Measured in degrees per second.",
            ),
            TagTraits::new(
                120,
                "KLV_0601_ONBOARD_MI_STORAGE_PERCENT_FULL",
                ImapFormat::variable(0.0, 100.0, 2)?,
                "On-board MI Storage Percent Full",
                "Amount of on-board Motion Imagery storage used as a percentage of total storage.",
            ),
            TagTraits::new(
                121,
                "KLV_0601_ACTIVE_WAVELENGTH_LIST",
                blob(),
                "Active Wavelength List",
                "List of wavelengths used by the sensor to generate the Motion Imagery.",
            ),
            TagTraits::new(
                122,
                "KLV_0601_COUNTRY_CODES",
                blob(),
                "Country Codes",
                "Countries which are associated with the platform and its operation.",
            ),
            TagTraits::new(
                123,
                "KLV_0601_NUMBER_OF_NAVSATS_IN_VIEW",
                uint(1)?,
                "Number of NAVSATs in View",
                "Number of satellites used to determine position.",
            ),
            TagTraits::new(
                124,
                "KLV_0601_POSITIONING_METHOD_SOURCE",
                uint(1)?,
                "Positioning Method Source",
                "Source of the navigation positioning information.",
            ),
            TagTraits::new(
                125,
                "KLV_0601_PLATFORM_STATUS",
                platform_status()?,
                "Platform Status",
                "Operational mode of the platform.",
            ),
            TagTraits::new(
                126,
                "KLV_0601_SENSOR_CONTROL_MODE",
                sensor_control_mode()?,
                "Sensor Control Mode",
                "Sensor control operational status.",
            ),
            TagTraits::new(
                127,
                "KLV_0601_SENSOR_FRAME_RATE_PACK",
                blob(),
                "Sensor Frame Rate Pack",
                "Frame rate of the Motion Imagery at the sensor.",
            ),
            TagTraits::new(
                128,
                "KLV_0601_WAVELENGTHS_LIST",
                blob(),
                "Wavelengths List",
                "List of wavelength bands provided by all available sensors.",
            ),
            TagTraits::new(
                129,
                "KLV_0601_TARGET_ID",
                text(),
                "Target ID",
                "Alpha-numeric identification of the target.",
            ),
            TagTraits::new(
                130,
                "KLV_0601_AIRBASE_LOCATIONS",
                blob(),
                "Airbase Locations",
                "Geographic location of take-off and recovery site.",
            ),
            TagTraits::new(
                131,
                "KLV_0601_TAKEOFF_TIME",
                uint_free(),
                "Take-off Time",
                "Time when aircraft became airborne.",
            ),
            TagTraits::new(
                132,
                "KLV_0601_TRANSMISSION_FREQUENCY",
                ImapFormat::variable(1.0, 99999.0, 3)?,
                "Transmission Frequency",
                "Radio frequency used to transmit the Motion Imagery. Measured in megahertz.",
            ),
            TagTraits::new(
                133,
                "KLV_0601_ONBOARD_MI_STORAGE_CAPACITY",
                uint_free(),
                "On-board MI Storage Capacity",
                "Total capacity of on-board Motion Imagery storage. Measured in gigabytes.",
            ),
            TagTraits::new(
                134,
                "KLV_0601_ZOOM_PERCENTAGE",
                ImapFormat::variable(0.0, 100.0, 2)?,
                "Zoom Percentage",
                "For a variable zoom system, the current percentage of zoom.",
            ),
            TagTraits::new(
                135,
                "KLV_0601_COMMUNICATIONS_METHOD",
                text(),
                "Communications Method",
                "Type of communications used with platform",
            ),
            TagTraits::new(
                136,
                "KLV_0601_LEAP_SECONDS",
                sint_free(),
                "Leap Seconds",
                "Number of leap seconds to adjust Precision Timestamp (Item 2) to UTC.",
            ),
            TagTraits::new(
                137,
                "KLV_0601_CORRECTION_OFFSET",
                sint_free(),
                "Correction Offset",
                "Post-flight time adjustment for Precision Timestamp (Item 2) as needed.",
            ),
            TagTraits::new(
                138,
                "KLV_0601_PAYLOAD_LIST",
                blob(),
                "Payload List",
                "List of payloads available on platform.",
            ),
            TagTraits::new(
                139,
                "KLV_0601_ACTIVE_PAYLOADS",
                blob(),
                "Active Payloads",
                "List of currently active payloads from the payload list (Item 138).",
            ),
            TagTraits::new(
                140,
                "KLV_0601_WEAPONS_STORES",
                blob(),
                "Weapons Stores",
                "List of weapon stores and statuses.",
            ),
            TagTraits::new(
                141,
                "KLV_0601_WAYPOINT_LIST",
                blob(),
                "Waypoint List",
                "List of navigational waypoints and their statuses.",
            ),
            TagTraits::new(
                142,
                "KLV_0601_VIEW_DOMAIN",
                blob(),
                "View Domain",
                "Specifies range of possible sensor relative azimuth, elevation, and roll values.",
            ),
        ],
    )
}
