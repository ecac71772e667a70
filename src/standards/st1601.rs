//! ST1601 geo-registration local set.
//!
//! Tie points and their uncertainties travel as ST1303 arrays.  The SDCC
//! arrays are unsigned on the wire; each row is an IMAP value over its own
//! fixed domain, so they decode to floats.

use super::st1303::{imap_value, print_mdap, Mdap, MdapElement, MdapFormat};
use super::{blob_of, text, uint_free};
use crate::errors::*;
use crate::format::{type_error, Context, Format};
use crate::imap::{read_imap, write_imap};
use crate::length_constraints::LengthConstraints;
use crate::read_write::{read_int, write_int, Cursor};
use crate::tag_traits::{TagCount, TagTraits, TagTraitsLookup};
use crate::value::KlvValue;

// IMAP domain of each row: standard deviations then correlation
// coefficients.
const PIXEL_SDCC_ROWS: [(f64, f64); 6] = [
    (0.0, 100.0),
    (0.0, 100.0),
    (-1.0, 1.0),
    (0.0, 100.0),
    (0.0, 100.0),
    (-1.0, 1.0),
];

const GEOGRAPHIC_SDCC_ROWS: [(f64, f64); 6] = [
    (0.0, 650.0),
    (0.0, 650.0),
    (-1.0, 1.0),
    (0.0, 1000.0),
    (-1.0, 1.0),
    (-1.0, 1.0),
];

// ── SDCC arrays ──────────────────────────────────────────────

/// Two-dimensional SDCC array whose rows map unsigned integers onto IMAP
/// domains.
#[derive(Debug, Clone)]
pub struct SdccFormat {
    name: &'static str,
    rows: &'static [(f64, f64)],
    row_counts: &'static [usize],
    inner: MdapFormat,
    constraints: LengthConstraints,
}

impl SdccFormat {
    /// Six rows: row and column deviations and their correlations.
    pub fn pixel() -> Self {
        Self::new("pixel", &PIXEL_SDCC_ROWS, &[6])
    }

    /// Three rows for latitude and longitude, six with elevation.
    pub fn geographic() -> Self {
        Self::new("geographic", &GEOGRAPHIC_SDCC_ROWS, &[3, 6])
    }

    fn new(name: &'static str, rows: &'static [(f64, f64)], row_counts: &'static [usize]) -> Self {
        Self {
            name,
            rows,
            row_counts,
            inner: MdapFormat::new(MdapElement::UInt),
            constraints: LengthConstraints::free(),
        }
    }

    fn check_shape(&self, mdap: &Mdap) -> Result<(), KlvError> {
        match mdap.sizes.as_slice() {
            [rows, columns] if self.row_counts.contains(rows) && *columns > 0 => {
                if mdap.count() == Some(mdap.elements.len()) {
                    Ok(())
                } else {
                    Err(KlvError::new(
                        ERR_LENGTH,
                        format!("{} SDCC array holds {} elements", self.name, mdap.elements.len()),
                    ))
                }
            }
            sizes => Err(KlvError::new(
                ERR_FORMAT,
                format!("{} SDCC array of sizes {sizes:?}", self.name),
            )),
        }
    }

    // Apply `convert` to every element with the IMAP domain of its row.
    fn map_rows(
        &self,
        mdap: &Mdap,
        convert: impl Fn(&KlvValue, (f64, f64), usize) -> Result<KlvValue, KlvError>,
    ) -> Result<Mdap, KlvError> {
        self.check_shape(mdap)?;
        let columns = mdap.sizes[1];
        let elements = mdap
            .elements
            .iter()
            .enumerate()
            .map(|(i, element)| convert(element, self.rows[i / columns], mdap.element_size))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Mdap {
            elements,
            ..mdap.clone()
        })
    }

    fn to_ints(&self, value: &KlvValue) -> Result<Mdap, KlvError> {
        self.map_rows(&Mdap::from_value(value)?, |element, (min, max), width| {
            let v = element.as_imap().ok_or_else(|| type_error("float", element))?;
            let mut bytes = Vec::new();
            write_imap(v, min, max, &mut bytes, width)?;
            Ok(KlvValue::UInt(read_int(&mut Cursor::new(&bytes), width)?))
        })
    }
}

impl Format for SdccFormat {
    fn description(&self) -> String {
        format!("ST1601 {} SDCC MDAP of {}", self.name, self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, length: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let ints = self.inner.read_mdap(cur, length)?;
        let floats = self.map_rows(&ints, |element, (min, max), width| {
            let raw = element.as_uint().ok_or_else(|| type_error("uint", element))?;
            let mut bytes = Vec::new();
            write_int(raw, &mut bytes, width)?;
            Ok(imap_value(read_imap(&mut Cursor::new(&bytes), min, max, width)?))
        })?;
        Ok(floats.to_value())
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, length: usize, ctx: &Context<'_>) -> Result<(), KlvError> {
        self.inner.write_typed(&self.to_ints(value)?.to_value(), out, length, ctx)
    }

    fn length_of_typed(&self, value: &KlvValue, ctx: &Context<'_>) -> Result<usize, KlvError> {
        self.inner.length_of_typed(&self.to_ints(value)?.to_value(), ctx)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        match Mdap::from_value(value) {
            Ok(mdap) => print_mdap(&mdap),
            Err(_) => value.to_string(),
        }
    }
}

// ── Tables ───────────────────────────────────────────────────

pub fn traits() -> Result<TagTraitsLookup, KlvError> {
    TagTraitsLookup::new(
        "ST1601",
        vec![
            TagTraits::unknown("KLV_1601_UNKNOWN"),
            TagTraits::new(
                1,
                "KLV_1601_VERSION",
                uint_free(),
                "Document Version",
                "Version number of the ST1601 document used to encode this metadata.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                2,
                "KLV_1601_ALGORITHM_NAME",
                text(),
                "Algorithm Name",
                "Unique identifier for the algorithm used to geo-register the imagery.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                3,
                "KLV_1601_ALGORITHM_VERSION",
                text(),
                "Algorithm Version",
                "Unique identifier for the specific version of the algorithm used.",
            )
            .count(TagCount::Exact(1)),
            TagTraits::new(
                4,
                "KLV_1601_PIXEL_POINTS",
                MdapFormat::new(MdapElement::UInt),
                "Correspondence Points - Row / Column",
                "List of tie points represented in pixel space.",
            ),
            TagTraits::new(
                5,
                "KLV_1601_GEOGRAPHIC_POINTS",
                MdapFormat::new(MdapElement::Float),
                "Correspondence Points - Latitude / Longitude",
                "List of tie points represented in geographic space.",
            ),
            TagTraits::new(
                6,
                "KLV_1601_SECOND_IMAGE_NAME",
                text(),
                "Second Image Name",
                "Unique identifier for the second image used in the geo-registration process.",
            ),
            TagTraits::new(
                7,
                "KLV_1601_ALGORITHM_CONFIG_ID",
                blob_of(16)?,
                "Algorithm Configuration Identifier",
                "Vendor-defined unique identifier for the parameters used with the geo-registration algorithm.",
            ),
            TagTraits::new(
                8,
                "KLV_1601_ELEVATION",
                MdapFormat::new(MdapElement::Float),
                "Correspondence Points - Elevation",
                "List of elevation values for the geographic tie points.",
            ),
            TagTraits::new(
                9,
                "KLV_1601_PIXEL_SDCC",
                SdccFormat::pixel(),
                "Correspondence Points SDCC - Row / Column",
                "Standard deviation and correlation coefficient values for the pixel-space tie points.",
            ),
            TagTraits::new(
                10,
                "KLV_1601_GEOGRAPHIC_SDCC",
                SdccFormat::geographic(),
                "Correspondence Points SDCC - Latitude / Longitude / Elevation",
                "Standard deviation and correlation coefficient values for the geographic-space tie points.",
            ),
        ],
    )
}
