//! ST1602 composite imaging local set.

use super::{sint_free, uint, uint_free};
use crate::errors::*;
use crate::format::BerOidFormat;
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1602",
        vec![
            TagTraits::unknown("KLV_1602_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1602_TIMESTAMP",
                uint(8)?,
                "Precision Timestamp",
                "MISP precision timestamp in microseconds since January 1, 1970.",
            ),
            TagTraits::new(
                2,
                "KLV_1602_VERSION",
                BerOidFormat::new(),
                "Document Version",
                "Version number of the ST1602 document used to encode this metadata.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_1602_SOURCE_IMAGE_ROWS",
                uint_free(),
                "Source Image Rows",
                "Height of the source image in pixels.",
            ),
            TagTraits::new(
                4,
                "KLV_1602_SOURCE_IMAGE_COLUMNS",
                uint_free(),
                "Source Image Columns",
                "Width of the source image in pixels.",
            ),
            TagTraits::new(
                5,
                "KLV_1602_SOURCE_IMAGE_AOI_ROWS",
                uint_free(),
                "Source Image AOI Rows",
                "Height of the area of interest in pixels.",
            ),
            TagTraits::new(
                6,
                "KLV_1602_SOURCE_IMAGE_AOI_COLUMNS",
                uint_free(),
                "Source Image AOI Columns",
                "Width of the area of interest in pixels.",
            ),
            TagTraits::new(
                7,
                "KLV_1602_SOURCE_IMAGE_AOI_POSITION_X",
                sint_free(),
                "Source Image AOI Position X",
                "X position of the area of interest in pixels. The origin is the top left corner.",
            ),
            TagTraits::new(
                8,
                "KLV_1602_SOURCE_IMAGE_AOI_POSITION_Y",
                sint_free(),
                "Source Image AOI Position Y",
                "Y position of the area of interest in pixels. The origin is the top left corner.",
            ),
            TagTraits::new(
                9,
                "KLV_1602_SUB_IMAGE_ROWS",
                uint_free(),
                "Sub-Image Rows",
                "Height of the sub-image in pixels.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                10,
                "KLV_1602_SUB_IMAGE_COLUMNS",
                uint_free(),
                "Sub-Image Columns",
                "Width of the sub-image in pixels.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                11,
                "KLV_1602_SUB_IMAGE_POSITION_X",
                sint_free(),
                "Sub-Image Position X",
                "X position of the sub-image in pixels. The origin is the top left corner.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                12,
                "KLV_1602_SUB_IMAGE_POSITION_Y",
                sint_free(),
                "Sub-Image Position Y",
                "Y position of the sub-image in pixels. The origin is the top left corner.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                13,
                "KLV_1602_ACTIVE_SUB_IMAGE_ROWS",
                uint_free(),
                "Active Sub-Image Rows",
                "Height of the active sub-image in pixels.",
            ),
            TagTraits::new(
                14,
                "KLV_1602_ACTIVE_SUB_IMAGE_COLUMNS",
                uint_free(),
                "Active Sub-Image Columns",
                "Width of the active sub-image in pixels.",
            ),
            TagTraits::new(
                15,
                "KLV_1602_ACTIVE_SUB_IMAGE_OFFSET_X",
                sint_free(),
                "Active Sub-Image Offset X",
                "X offset of the active sub-image in pixels from the top left corner of the sub-image.",
            ),
            TagTraits::new(
                16,
                "KLV_1602_ACTIVE_SUB_IMAGE_OFFSET_Y",
                sint_free(),
                "Active Sub-Image Offset Y",
                "Y offset of the active sub-image in pixels from the top left corner of the sub-image.",
            ),
            TagTraits::new(
                17,
                "KLV_1602_TRANSPARENCY",
                uint(1)?,
                "Transparency",
                "Integer value denoting level of image transparency. A value of 0 denotes full opacity, while a value of 255 denotes full transparency.",
            ),
            TagTraits::new(
                18,
                "KLV_1602_Z_ORDER",
                uint(1)?,
                "Z-Order",
                "Unique integer defining the image's position along the Z-axis. A value of 0 denotes the bottom-most image.",
            )
            .count(TagCount::Exact(1)),
        ],
    )
}
