//! ST1206 synthetic aperture radar motion imagery local set.

use super::st1303::{MdapElement, MdapFormat};
use super::uint;
use crate::errors::*;
use crate::format::{EnumFormat, ImapFormat};
use crate::length_constraints::LengthConstraints;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

const LOOK_DIRECTIONS: &[(u64, &str)] = &[(0, "Left"), (1, "Right")];

const IMAGE_PLANES: &[(u64, &str)] = &[(0, "Slant"), (1, "Ground"), (2, "Other")];

fn imap(min: f64, max: f64, length: usize) -> Result<ImapFormat, KlvError> {
    ImapFormat::variable(min, max, length)
}

fn angle() -> Result<ImapFormat, KlvError> {
    imap(0.0, 360.0, 2)
}

fn grazing() -> Result<ImapFormat, KlvError> {
    imap(0.0, 90.0, 2)
}

fn squint() -> Result<ImapFormat, KlvError> {
    imap(-90.0, 90.0, 2)
}

fn size() -> Result<ImapFormat, KlvError> {
    imap(0.0, 1.0e6, 4)
}

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1206",
        vec![
            TagTraits::unknown("KLV_1206_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1206_GRAZING_ANGLE",
                grazing()?,
                "Grazing Angle",
                "Angle between the line of sight from the scene reference point to the sensor and the ground plane. Measured in degrees.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_1206_GROUND_PLANE_SQUINT_ANGLE",
                squint()?,
                "Ground Plane Squint Angle",
                "Angle between the ground track vector and the radar line of sight, projected onto the ground plane. Measured in degrees.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_1206_LOOK_DIRECTION",
                EnumFormat::new("look direction", LengthConstraints::fixed(1)?, LOOK_DIRECTIONS),
                "Look Direction",
                "Side of the imaging platform from which the imagery is collected, relative to the velocity vector.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                4,
                "KLV_1206_IMAGE_PLANE",
                EnumFormat::new("image plane", LengthConstraints::fixed(1)?, IMAGE_PLANES),
                "Image Plane",
                "Plane in which the SAR images were taken.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                5,
                "KLV_1206_RANGE_RESOLUTION",
                size()?,
                "Range Resolution",
                "Minimum distance at which two objects may be resolved in range. Measured in meters.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                6,
                "KLV_1206_CROSS_RANGE_RESOLUTION",
                size()?,
                "Cross-Range Resolution",
                "Minimum distance at which two objects may be resolved in cross range. Measured in meters.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                7,
                "KLV_1206_RANGE_IMAGE_PLANE_PIXEL_SIZE",
                size()?,
                "Range Image Plane Pixel Size",
                "Pixel size in the range direction. Measured in meters.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                8,
                "KLV_1206_CROSS_RANGE_IMAGE_PLANE_PIXEL_SIZE",
                size()?,
                "Cross-Range Image Plane Pixel Size",
                "Pixel size in the cross-range direction. Measured in meters.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(9, "KLV_1206_IMAGE_ROWS", uint(2)?, "Image Rows", "Height of the image in pixels.")
                .count(TagCount::Exact(1)),
            TagTraits::new(10, "KLV_1206_IMAGE_COLUMNS", uint(2)?, "Image Columns", "Width of the image in pixels.")
                .count(TagCount::Exact(1)),
            TagTraits::new(
                11,
                "KLV_1206_RANGE_DIRECTION_ANGLE",
                angle()?,
                "Range Direction Angle",
                "Direction of the range vector relative to true north. Measured clockwise in degrees.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                12,
                "KLV_1206_TRUE_NORTH",
                angle()?,
                "True North",
                "Direction of true north relative to the top edge of the image. Measured clockwise in degrees.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                13,
                "KLV_1206_RANGE_LAYOVER_ANGLE",
                angle()?,
                "Range Layover Angle",
                "Direction perpendicular to the sensor ground track at the aperture center, relative to true north.",
            ),
            TagTraits::new(
                14,
                "KLV_1206_GROUND_APERTURE_ANGULAR_EXTENT",
                grazing()?,
                "Ground Aperture Angular Extent",
                "Angle swept in cross range as the sensor traverses the synthetic aperture. Measured in degrees.",
            ),
            TagTraits::new(
                15,
                "KLV_1206_APERTURE_DURATION",
                uint(4)?,
                "Aperture Duration",
                "Length of the coherent processing period. Measured in microseconds.",
            ),
            TagTraits::new(
                16,
                "KLV_1206_GROUND_TRACK_ANGLE",
                angle()?,
                "Ground Track Angle",
                "Heading of the scene reference point over the ground relative to true north. Measured clockwise in degrees.",
            ),
            TagTraits::new(
                17,
                "KLV_1206_MINIMUM_DETECTABLE_VELOCITY",
                imap(0.0, 100.0, 2)?,
                "Minimum Detectable Velocity",
                "Radial velocity at which a target on the beam center line leaves the clutter. Measured in meters per second.",
            ),
            TagTraits::new(
                18,
                "KLV_1206_TRUE_PULSE_REPETITION_FREQUENCY",
                size()?,
                "True Pulse Repetition Frequency",
                "Time interval between successively transmitted pulses. Measured in microseconds.",
            ),
            TagTraits::new(
                19,
                "KLV_1206_PULSE_REPETITION_FREQUENCY_SCALE_FACTOR",
                imap(0.0, 1.0, 2)?,
                "Pulse Repetition Frequency Scale Factor",
                "Scale factor giving the effective pulse repetition frequency from the true one.",
            ),
            TagTraits::new(
                20,
                "KLV_1206_TRANSMIT_RF_CENTER_FREQUENCY",
                imap(0.0, 1.0e12, 4)?,
                "Transmit RF Center Frequency",
                "Center frequency of the RF band when linear FM waveforms are employed. Measured in Hertz.",
            ),
            TagTraits::new(
                21,
                "KLV_1206_TRANSMIT_RF_BANDWIDTH",
                imap(0.0, 1.0e11, 4)?,
                "Transmit RF Bandwidth",
                "Difference between minimum and maximum transmit frequencies. Measured in Hertz.",
            ),
            TagTraits::new(
                22,
                "KLV_1206_RADAR_CROSS_SECTION_SCALE_FACTOR_POLYNOMIAL",
                MdapFormat::new(MdapElement::Imap { min: 0.0, max: 1.0e6 }),
                "Radar Cross Section Scale Factor Polynomial",
                "Two-dimensional array of polynomial coefficients giving the radar cross section of a pixel.",
            ),
            TagTraits::new(
                23,
                "KLV_1206_REFERENCE_FRAME_PRECISION_TIMESTAMP",
                uint(8)?,
                "Reference Frame Precision Timestamp",
                "For the reference frame: MISP precision timestamp, in microseconds since January 1, 1970.",
            ),
            TagTraits::new(
                24,
                "KLV_1206_REFERENCE_FRAME_GRAZING_ANGLE",
                grazing()?,
                "Reference Frame Grazing Angle",
                "For the reference frame: grazing angle, in degrees.",
            ),
            TagTraits::new(
                25,
                "KLV_1206_REFERENCE_FRAME_GROUND_PLANE_SQUINT_ANGLE",
                squint()?,
                "Reference Frame Ground Plane Squint Angle",
                "For the reference frame: ground plane squint angle, in degrees.",
            ),
            TagTraits::new(
                26,
                "KLV_1206_REFERENCE_FRAME_RANGE_DIRECTION_ANGLE",
                angle()?,
                "Reference Frame Range Direction Angle",
                "For the reference frame: range direction angle, measured clockwise in degrees.",
            ),
            TagTraits::new(
                27,
                "KLV_1206_REFERENCE_FRAME_RANGE_LAYOVER_ANGLE",
                angle()?,
                "Reference Frame Range Layover Angle",
                "For the reference frame: range layover angle, measured clockwise in degrees.",
            ),
            TagTraits::new(
                28,
                "KLV_1206_DOCUMENT_VERSION",
                uint(1)?,
                "Document Version",
                "Version of MISB ST1206 used to encode the SAR metadata.",
            )
            .count(TagCount::Exact(1)),
        ],
    )
}
