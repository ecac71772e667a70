//! ST1202 generalized transformation local set.
//!
//! Eight coefficients of a two-dimensional projective transform, optionally
//! followed by SDCC-FLP packs describing their uncertainty.

use super::st1010::SdccFlpFormat;
use super::uint;
use crate::errors::*;
use crate::format::{EnumFormat, FloatFormat};
use crate::length_constraints::LengthConstraints;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

const TRANSFORMATION_TYPES: &[(u64, &str)] = &[
    (0, "Not Defined"),
    (1, "Chipping"),
    (2, "Child-Parent"),
    (3, "Pixel to Image Space"),
    (4, "Optical"),
];

const COEFFICIENTS: [(&str, &str, &str); 8] = [
    ("KLV_1202_X_NUMERATOR_X_FACTOR", "X Equation Numeration - X Factor", "Value A in Equation 1 of ST1202."),
    ("KLV_1202_X_NUMERATOR_Y_FACTOR", "X Equation Numeration - Y Factor", "Value B in Equation 1 of ST1202."),
    ("KLV_1202_X_NUMERATOR_CONSTANT", "X Equation Numeration - Constant", "Value C in Equation 1 of ST1202."),
    ("KLV_1202_Y_NUMERATOR_X_FACTOR", "Y Equation Numeration - X Factor", "Value D in Equation 2 of ST1202."),
    ("KLV_1202_Y_NUMERATOR_Y_FACTOR", "Y Equation Numeration - Y Factor", "Value E in Equation 2 of ST1202."),
    ("KLV_1202_Y_NUMERATOR_CONSTANT", "Y Equation Numeration - Constant", "Value F in Equation 2 of ST1202."),
    ("KLV_1202_DENOMINATOR_X_FACTOR", "Denominator - X Factor", "Value G in Equations 1 and 2 of ST1202."),
    ("KLV_1202_DENOMINATOR_Y_FACTOR", "Denominator - Y Factor", "Value H in Equations 1 and 2 of ST1202."),
];

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    let mut entries = vec![TagTraits::unknown("KLV_1202_UNKNOWN")];
    for (tag, (enum_name, name, description)) in (1..).zip(COEFFICIENTS) {
        entries.push(TagTraits::new(tag, enum_name, FloatFormat::fixed(4)?, name, description));
    }
    entries.extend([
        TagTraits::new(
            9,
            "KLV_1202_SDCC_FLP",
            SdccFlpFormat::new(),
            "SDCC-FLP",
            "Standard Deviation and Correlation Coefficient Pack.",
        )
        .count(TagCount::ANY),
        TagTraits::new(
            10,
            "KLV_1202_VERSION",
            uint(1)?,
            "Document Version",
            "Version number of MISB ST1202 document used to encode this metadata.",
        )
        .count(TagCount::Exact(1)),
        TagTraits::new(
            11,
            "KLV_1202_TRANSFORMATION_TYPE",
            EnumFormat::new("transformation type", LengthConstraints::fixed(1)?, TRANSFORMATION_TYPES),
            "Transformation Type",
            "Type of transformation encoded.",
        ),
    ]);
    TagTraitsLookup::new("ST1202", entries)
}
