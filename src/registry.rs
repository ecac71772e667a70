//! Tag-table registry.
//!
//! A [`Registry`] owns one [`TagTraitsLookup`] per registered set plus the
//! packet table that maps top-level universal keys to set formats.  It is
//! immutable once built.  [`global`] returns a process-wide instance built
//! on first use; callers that prefer an explicit registry build their own
//! with [`Registry::new`] and pass it to the `*_with` functions.

use std::fmt;
use std::sync::LazyLock;

use crate::checksum::ChecksumFormat;
use crate::errors::*;
use crate::format::BlobFormat;
use crate::key::UdsKey;
use crate::set::{LocalSetFormat, UniversalSetFormat};
use crate::standards::{st0102, st0104, st0601, st0806, st0903, st1002, st1108, st1202, st1206, st1601, st1602};
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};

/// Every set the registry has a table for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Standard {
    /// Security metadata local set.
    St0102,
    /// Predator UAV basic universal set.
    St0104,
    /// UAS datalink local set.
    St0601,
    /// Remote video terminal local set.
    St0806,
    St0806UserDefined,
    /// Video moving target indicator local set.
    St0903,
    St0903VTarget,
    St0903Algorithm,
    St0903Ontology,
    St0903VTracker,
    /// Video track local set.
    St0903VTrack,
    St0903VTrackItem,
    /// Range motion imagery local set.
    St1002,
    /// Interpretability and quality local set.
    St1108,
    St1108Metric,
    /// Generalized transformation local set.
    St1202,
    /// SAR motion imagery local set.
    St1206,
    /// Geo-registration local set.
    St1601,
    /// Composite imaging local set.
    St1602,
}

impl Standard {
    pub const ALL: [Standard; 19] = [
        Standard::St0102,
        Standard::St0104,
        Standard::St0601,
        Standard::St0806,
        Standard::St0806UserDefined,
        Standard::St0903,
        Standard::St0903VTarget,
        Standard::St0903Algorithm,
        Standard::St0903Ontology,
        Standard::St0903VTracker,
        Standard::St0903VTrack,
        Standard::St0903VTrackItem,
        Standard::St1002,
        Standard::St1108,
        Standard::St1108Metric,
        Standard::St1202,
        Standard::St1206,
        Standard::St1601,
        Standard::St1602,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Standard::St0102 => "ST0102",
            Standard::St0104 => "ST0104",
            Standard::St0601 => "ST0601",
            Standard::St0806 => "ST0806",
            Standard::St0806UserDefined => "ST0806 User Defined",
            Standard::St0903 => "ST0903",
            Standard::St0903VTarget => "ST0903 VTarget",
            Standard::St0903Algorithm => "ST0903 Algorithm",
            Standard::St0903Ontology => "ST0903 Ontology",
            Standard::St0903VTracker => "ST0903 VTracker",
            Standard::St0903VTrack => "ST0903 VTrack",
            Standard::St0903VTrackItem => "ST0903 VTrackItem",
            Standard::St1002 => "ST1002",
            Standard::St1108 => "ST1108",
            Standard::St1108Metric => "ST1108 Metric",
            Standard::St1202 => "ST1202",
            Standard::St1206 => "ST1206",
            Standard::St1601 => "ST1601",
            Standard::St1602 => "ST1602",
        }
    }

    pub fn from_name(name: &str) -> Option<Standard> {
        Standard::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Standard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Packet keys ──────────────────────────────────────────────

pub const ST0102_KEY: UdsKey = UdsKey::from_words(0x060E2B3402030101, 0x0E01030302000000);
pub const ST0104_KEY: UdsKey = UdsKey::from_words(0x060E2B3402010101, 0x0E01010201010000);
pub const ST0601_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030101000000);
pub const ST0806_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030102000000);
pub const ST0903_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030306000000);
pub const ST0903_VTRACK_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E0103031E000000);
pub const ST1002_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E0103030C000000);
pub const ST1108_KEY: UdsKey = UdsKey::from_words(0x060E2B3402030101, 0x0E0103031C000000);
pub const ST1202_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030505000000);
pub const ST1206_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E0103030D000000);
pub const ST1601_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030301000000);
pub const ST1602_KEY: UdsKey = UdsKey::from_words(0x060E2B34020B0101, 0x0E01030302000000);

/// Local tag of the ST0601, ST0903 and VTrack checksum.
pub const RUNNING_SUM_CHECKSUM_TAG: u8 = 1;
/// Local tag of the ST0806 CRC-32.
pub const ST0806_CHECKSUM_TAG: u8 = 1;
/// Local tag of the ST1002 checksum.
pub const ST1002_CHECKSUM_TAG: u8 = 21;
/// Local tag of the ST1108 checksum.
pub const ST1108_CHECKSUM_TAG: u8 = 11;

fn packet_traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "Packet",
        vec![
            TagTraits::new(
                0,
                "KLV_PACKET_UNKNOWN",
                BlobFormat::new(),
                "Unknown Packet",
                "Packet of unknown type.",
            )
            .count(TagCount::ANY),
            TagTraits::new(
                1,
                "KLV_PACKET_MISB_0102_LOCAL_SET",
                LocalSetFormat::new(Standard::St0102),
                "MISB ST 0102 Local Set",
                "Security Local Set. Marks Motion Imagery with security classification information.",
            )
            .uds_key(ST0102_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                2,
                "KLV_PACKET_MISB_0104_UNIVERSAL_SET",
                UniversalSetFormat::new(Standard::St0104),
                "MISB ST 0104 Universal Set",
                "Predator UAV Basic Universal Set. Predecessor to MISB ST 0601.",
            )
            .uds_key(ST0104_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                3,
                "KLV_PACKET_MISB_0601_LOCAL_SET",
                LocalSetFormat::with_checksum(
                    Standard::St0601,
                    ChecksumFormat::running_sum_16(RUNNING_SUM_CHECKSUM_TAG),
                ),
                "MISB ST 0601 Local Set",
                "UAS Datalink Local Set. Metadata describing an unmanned aerial system producing FMV footage.",
            )
            .uds_key(ST0601_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                4,
                "KLV_PACKET_MISB_0903_LOCAL_SET",
                LocalSetFormat::with_checksum(
                    Standard::St0903,
                    ChecksumFormat::running_sum_16(RUNNING_SUM_CHECKSUM_TAG),
                ),
                "MISB ST 0903 Local Set",
                "Video Moving Target Indicator Local Set. Detected and tracked targets in Motion Imagery.",
            )
            .uds_key(ST0903_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                5,
                "KLV_PACKET_MISB_1108_LOCAL_SET",
                LocalSetFormat::with_checksum(
                    Standard::St1108,
                    ChecksumFormat::crc_16_ccitt(ST1108_CHECKSUM_TAG),
                ),
                "MISB ST 1108 Local Set",
                "Interpretability and Quality Local Set. Image quality metrics and compression characteristics.",
            )
            .uds_key(ST1108_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                6,
                "KLV_PACKET_MISB_1602_LOCAL_SET",
                LocalSetFormat::new(Standard::St1602),
                "MISB ST 1602 Local Set",
                "Composite Imaging Local Set. Describes how several images are composed into one frame.",
            )
            .uds_key(ST1602_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                7,
                "KLV_PACKET_MISB_0806_LOCAL_SET",
                LocalSetFormat::with_checksum(Standard::St0806, ChecksumFormat::crc_32_mpeg(ST0806_CHECKSUM_TAG)),
                "MISB ST 0806 Local Set",
                "Remote Video Terminal Local Set. Metadata for remote video terminals receiving FMV.",
            )
            .uds_key(ST0806_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                8,
                "KLV_PACKET_MISB_0903_VTRACK_LOCAL_SET",
                LocalSetFormat::with_checksum(
                    Standard::St0903VTrack,
                    ChecksumFormat::running_sum_16(RUNNING_SUM_CHECKSUM_TAG),
                ),
                "MISB ST 0903 VTrack Local Set",
                "Video Track Local Set. The history of one tracked target.",
            )
            .uds_key(ST0903_VTRACK_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                9,
                "KLV_PACKET_MISB_1002_LOCAL_SET",
                LocalSetFormat::with_checksum(Standard::St1002, ChecksumFormat::crc_16_ccitt(ST1002_CHECKSUM_TAG)),
                "MISB ST 1002 Local Set",
                "Range Motion Imagery Local Set. Range images aligned with collaborative sensor imagery.",
            )
            .uds_key(ST1002_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                10,
                "KLV_PACKET_MISB_1202_LOCAL_SET",
                LocalSetFormat::new(Standard::St1202),
                "MISB ST 1202 Local Set",
                "Generalized Transformation Local Set. Projective mapping between two image spaces.",
            )
            .uds_key(ST1202_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                11,
                "KLV_PACKET_MISB_1206_LOCAL_SET",
                LocalSetFormat::new(Standard::St1206),
                "MISB ST 1206 Local Set",
                "SAR Motion Imagery Local Set. Synthetic aperture radar collection parameters.",
            )
            .uds_key(ST1206_KEY)
            .count(TagCount::ANY),
            TagTraits::new(
                12,
                "KLV_PACKET_MISB_1601_LOCAL_SET",
                LocalSetFormat::new(Standard::St1601),
                "MISB ST 1601 Local Set",
                "Geo-Registration Local Set. Tie points between the image and the ground.",
            )
            .uds_key(ST1601_KEY)
            .count(TagCount::ANY),
        ],
    )
}

// ── Registry ─────────────────────────────────────────────────

/// Every tag table the codec knows.
#[derive(Debug)]
pub struct Registry {
    packets: TagTraitsLookup,
    st0102: TagTraitsLookup,
    st0104: TagTraitsLookup,
    st0601: TagTraitsLookup,
    st0806: TagTraitsLookup,
    st0806_user_defined: TagTraitsLookup,
    st0903: TagTraitsLookup,
    st0903_vtarget: TagTraitsLookup,
    st0903_algorithm: TagTraitsLookup,
    st0903_ontology: TagTraitsLookup,
    st0903_vtracker: TagTraitsLookup,
    st0903_vtrack: TagTraitsLookup,
    st0903_vtrack_item: TagTraitsLookup,
    st1002: TagTraitsLookup,
    st1108: TagTraitsLookup,
    st1108_metric: TagTraitsLookup,
    st1202: TagTraitsLookup,
    st1206: TagTraitsLookup,
    st1601: TagTraitsLookup,
    st1602: TagTraitsLookup,
}

impl Registry {
    /// Build every table.  Fails with `ERR_REGISTRY` if a table is
    /// inconsistent.
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            packets: packet_traits()?,
            st0102: st0102::traits()?,
            st0104: st0104::traits()?,
            st0601: st0601::traits()?,
            st0806: st0806::traits()?,
            st0806_user_defined: st0806::user_defined_traits()?,
            st0903: st0903::traits()?,
            st0903_vtarget: st0903::vtarget_traits()?,
            st0903_algorithm: st0903::algorithm_traits()?,
            st0903_ontology: st0903::ontology_traits()?,
            st0903_vtracker: st0903::vtracker_traits()?,
            st0903_vtrack: st0903::vtrack_traits()?,
            st0903_vtrack_item: st0903::vtrack_item_traits()?,
            st1002: st1002::traits()?,
            st1108: st1108::traits()?,
            st1108_metric: st1108::metric_traits()?,
            st1202: st1202::traits()?,
            st1206: st1206::traits()?,
            st1601: st1601::traits()?,
            st1602: st1602::traits()?,
        })
    }

    pub fn traits(&self, standard: Standard) -> &TagTraitsLookup {
        match standard {
            Standard::St0102 => &self.st0102,
            Standard::St0104 => &self.st0104,
            Standard::St0601 => &self.st0601,
            Standard::St0806 => &self.st0806,
            Standard::St0806UserDefined => &self.st0806_user_defined,
            Standard::St0903 => &self.st0903,
            Standard::St0903VTarget => &self.st0903_vtarget,
            Standard::St0903Algorithm => &self.st0903_algorithm,
            Standard::St0903Ontology => &self.st0903_ontology,
            Standard::St0903VTracker => &self.st0903_vtracker,
            Standard::St0903VTrack => &self.st0903_vtrack,
            Standard::St0903VTrackItem => &self.st0903_vtrack_item,
            Standard::St1002 => &self.st1002,
            Standard::St1108 => &self.st1108,
            Standard::St1108Metric => &self.st1108_metric,
            Standard::St1202 => &self.st1202,
            Standard::St1206 => &self.st1206,
            Standard::St1601 => &self.st1601,
            Standard::St1602 => &self.st1602,
        }
    }

    /// Top-level packet table, keyed by universal key.
    pub fn packets(&self) -> &TagTraitsLookup {
        &self.packets
    }
}

static GLOBAL: LazyLock<Result<Registry, KlvError>> = LazyLock::new(Registry::new);

/// Process-wide registry, built once on first use.
pub fn global() -> Result<&'static Registry, KlvError> {
    GLOBAL.as_ref().map_err(Clone::clone)
}
