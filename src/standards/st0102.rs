//! ST0102 security metadata local set.

use crate::errors::*;
use crate::format::EnumFormat;
use crate::length_constraints::LengthConstraints;
use super::{blob_of, text, text_of, uint};
use crate::string::StringFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

pub const SECURITY_CLASSIFICATIONS: &[(u64, &str)] = &[
    (0x00, "Unknown Security Classification"),
    (0x01, "Unclassified"),
    (0x02, "Restricted"),
    (0x03, "Confidential"),
    (0x04, "Secret"),
    (0x05, "Top Secret"),
];

pub const COUNTRY_CODING_METHODS: &[(u64, &str)] = &[
    (0x00, "Unknown Country Coding Method"),
    (0x01, "ISO-3166 Two Letter"),
    (0x02, "ISO-3166 Three Letter"),
    (0x03, "FIPS 10-4 Two Letter"),
    (0x04, "FIPS 10-4 Four Letter"),
    (0x05, "ISO-3166 Numeric"),
    (0x06, "1059 Two Letter"),
    (0x07, "1059 Three Letter"),
    (0x0A, "FIPS 10-4 Mixed"),
    (0x0B, "ISO-3166 Mixed"),
    (0x0C, "STANAG-1059 Mixed"),
    (0x0D, "GENC Two Letter"),
    (0x0E, "GENC Three Letter"),
    (0x0F, "GENC Numeric"),
    (0x10, "GENC Mixed"),
    (0x40, "GENC AdminSub"),
];

fn classification() -> Result<EnumFormat, KlvError> {
    Ok(EnumFormat::new(
        "security classification",
        LengthConstraints::fixed(1)?,
        SECURITY_CLASSIFICATIONS,
    ))
}

fn coding_method() -> Result<EnumFormat, KlvError> {
    Ok(EnumFormat::new(
        "country coding method",
        LengthConstraints::fixed(1)?,
        COUNTRY_CODING_METHODS,
    ))
}

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST0102",
        vec![
            TagTraits::unknown("KLV_0102_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_0102_SECURITY_CLASSIFICATION",
                classification()?,
                "Security Classification",
                "Overall security classification of the Motion Imagery in accordance with U.S. and NATO classification guidance.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_0102_COUNTRY_CODING_METHOD",
                coding_method()?,
                "Country Coding Method for 'Classifying Country' and 'Releasing Instructions'",
                "Method by which the classifying country and releasing instructions identify countries in text form.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_0102_CLASSIFYING_COUNTRY",
                text(),
                "Classifying Country",
                "Country providing the security classification, preceded by '//'.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                4,
                "KLV_0102_SCI_SHI_INFORMATION",
                text(),
                "SCI / SHI Information",
                "Sensitive compartmented information or special handling instructions. Always ends in '//'.",
            ),
            TagTraits::new(
                5,
                "KLV_0102_CAVEATS",
                text(),
                "Caveats",
                "Pertinent caveats or code words from each category of the appropriate security entity register.",
            ),
            TagTraits::new(
                6,
                "KLV_0102_RELEASING_INSTRUCTIONS",
                text(),
                "Releasing Instructions",
                "Country codes, separated by blank spaces, to which the Motion Imagery is releasable.",
            ),
            TagTraits::new(
                7,
                "KLV_0102_CLASSIFIED_BY",
                text(),
                "Classified By",
                "Name and type of authority used to classify the Motion Imagery.",
            ),
            TagTraits::new(
                8,
                "KLV_0102_DERIVED_FROM",
                text(),
                "Derived From",
                "Original source of data from which classification was derived.",
            ),
            TagTraits::new(
                9,
                "KLV_0102_CLASSIFICATION_REASON",
                text(),
                "Classification Reason",
                "Reason for classification of the Motion Imagery, or citation from a document.",
            ),
            TagTraits::new(
                10,
                "KLV_0102_DECLASSIFICATION_DATE",
                text_of(8)?,
                "Declassification Date",
                "Date when the classified material may be automatically declassified. Format: YYYYMMDD.",
            ),
            TagTraits::new(
                11,
                "KLV_0102_CLASSIFICATION_AND_MARKING_SYSTEM",
                text(),
                "Classification and Marking System",
                "Classification or marking system used in this set.",
            ),
            TagTraits::new(
                12,
                "KLV_0102_OBJECT_COUNTRY_CODING_METHOD",
                coding_method()?,
                "Country Coding Method for 'Object Country Codes'",
                "Method by which the country which is the object of the Motion Imagery is identified.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                13,
                "KLV_0102_OBJECT_COUNTRY_CODES",
                StringFormat::utf16(),
                "Object Country Codes",
                "Countries which are the object of the Motion Imagery, separated by ';'.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                14,
                "KLV_0102_CLASSIFICATION_COMMENTS",
                text(),
                "Classification Comments",
                "Security related comments and future format changes.",
            ),
            TagTraits::new(
                15,
                "KLV_0102_UMID_VIDEO",
                blob_of(32)?,
                "UMID Video",
                "Deprecated. SMPTE RP210 32-byte identifier for the video stream.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                16,
                "KLV_0102_UMID_AUDIO",
                blob_of(32)?,
                "UMID Audio",
                "Deprecated. SMPTE RP210 32-byte identifier for the audio stream.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                17,
                "KLV_0102_UMID_DATA",
                blob_of(32)?,
                "UMID Data",
                "Deprecated. SMPTE RP210 32-byte identifier for the data stream.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                18,
                "KLV_0102_UMID_SYSTEM",
                blob_of(32)?,
                "UMID System",
                "Deprecated. SMPTE RP210 32-byte identifier for the MI system.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                19,
                "KLV_0102_STREAM_ID",
                uint(1)?,
                "Stream ID",
                "Deprecated. Elementary stream identifier.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                20,
                "KLV_0102_TRANSPORT_STREAM_ID",
                uint(2)?,
                "Transport Stream ID",
                "Deprecated. Originator-defined transport stream identifier.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                21,
                "KLV_0102_ITEM_DESIGNATOR_ID",
                blob_of(16)?,
                "Item Designator ID",
                "Deprecated. Universal label of the element, set, or pack this set is linked to.",
            )
            .count(TagCount::Exact(0)),
            TagTraits::new(
                22,
                "KLV_0102_VERSION",
                uint(2)?,
                "Version",
                "Version number of MISB ST 0102 used to encode this set.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                23,
                "KLV_0102_COUNTRY_CODING_METHOD_VERSION_DATE",
                text_of(10)?,
                "Country Coding Method for 'Classifying Country' and 'Releasing Instructions' Version Date",
                "Effective date of the standard defining the classifying country coding method.",
            ),
            TagTraits::new(
                24,
                "KLV_0102_OBJECT_COUNTRY_CODING_METHOD_VERSION_DATE",
                text_of(10)?,
                "Country Coding Method for 'Object Country Codes' Version Date",
                "Effective date of the standard defining the object country coding method.",
            ),
        ],
    )
}
