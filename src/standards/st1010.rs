//! ST1010 standard deviation and correlation coefficient floating length
//! pack (SDCC-FLP).
//!
//! The pack holds the uncertainty of the `n` entries written immediately
//! before it in the same set: `n` standard deviations and the `n(n-1)/2`
//! correlation coefficients of the upper triangle, row by row.  Which
//! entries those are is not on the wire, so the set codec binds the format
//! to the preceding tags with [`Format::with_preceding`].
//!
//! The value is a record:
//!
//! - `members`: series of the described tags;
//! - `sigma`, `rho`: series of floats, empty when their length is zero;
//! - `sigma_length`, `rho_length`: bytes per value;
//! - `sparse`: zero coefficients are left out, a bit vector marks the rest;
//! - `long_parse_control`: the two-byte parse control form was used;
//! - `sigma_uses_imap`, `rho_uses_imap`: IMAP rather than IEEE floats.

use super::st1303::imap_value;
use crate::errors::*;
use crate::format::{record_bool, record_series, record_uint, type_error, Context, Format};
use crate::imap::{read_imap, write_imap};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::value::KlvValue;

// Correlation coefficients are IMAP encoded over this domain.
const RHO_MIN: f64 = -1.0;
const RHO_MAX: f64 = 1.0;

const SHORT_LENGTH_LIMIT: usize = 0x7;
const LONG_LENGTH_LIMIT: usize = 0xF;

#[derive(Debug, Clone, PartialEq)]
struct Sdcc {
    members: Vec<u64>,
    sigma: Vec<KlvValue>,
    rho: Vec<KlvValue>,
    sigma_length: usize,
    rho_length: usize,
    sparse: bool,
    long_parse_control: bool,
    sigma_uses_imap: bool,
    rho_uses_imap: bool,
}

impl Sdcc {
    fn rho_count(&self) -> usize {
        let n = self.members.len();
        n * n.saturating_sub(1) / 2
    }

    fn to_value(&self) -> KlvValue {
        let uint = |n: usize| KlvValue::UInt(n as u64);
        KlvValue::Record(vec![
            (
                "members".to_string(),
                KlvValue::Series(self.members.iter().map(|&m| KlvValue::UInt(m)).collect()),
            ),
            ("sigma".to_string(), KlvValue::Series(self.sigma.clone())),
            ("rho".to_string(), KlvValue::Series(self.rho.clone())),
            ("sigma_length".to_string(), uint(self.sigma_length)),
            ("rho_length".to_string(), uint(self.rho_length)),
            ("sparse".to_string(), KlvValue::Bool(self.sparse)),
            ("long_parse_control".to_string(), KlvValue::Bool(self.long_parse_control)),
            ("sigma_uses_imap".to_string(), KlvValue::Bool(self.sigma_uses_imap)),
            ("rho_uses_imap".to_string(), KlvValue::Bool(self.rho_uses_imap)),
        ])
    }

    fn from_value(value: &KlvValue) -> Result<Self, KlvError> {
        let members = members_of(value)?;
        let length = |name: &str| -> Result<usize, KlvError> {
            let n = record_uint(value, name)?;
            usize::try_from(n).map_err(|_| KlvError::new(ERR_OVERFLOW, format!("{name} {n} too large")))
        };
        Ok(Self {
            members,
            sigma: record_series(value, "sigma")?.to_vec(),
            rho: record_series(value, "rho")?.to_vec(),
            sigma_length: length("sigma_length")?,
            rho_length: length("rho_length")?,
            sparse: record_bool(value, "sparse")?,
            long_parse_control: record_bool(value, "long_parse_control")?,
            sigma_uses_imap: record_bool(value, "sigma_uses_imap")?,
            rho_uses_imap: record_bool(value, "rho_uses_imap")?,
        })
    }
}

fn members_of(value: &KlvValue) -> Result<Vec<u64>, KlvError> {
    record_series(value, "members")?
        .iter()
        .map(|m| m.as_uint().ok_or_else(|| type_error("uint", m).context("members")))
        .collect()
}

fn is_zero(value: &KlvValue) -> bool {
    value.as_float() == Some(0.0)
}

/// SDCC-FLP pack.  Unbound, it cannot decode anything: reads fail for lack
/// of preceding entries.
#[derive(Debug, Clone)]
pub struct SdccFlpFormat {
    preceding: Vec<u64>,
    constraints: LengthConstraints,
}

impl SdccFlpFormat {
    pub fn new() -> Self {
        Self {
            preceding: Vec::new(),
            constraints: LengthConstraints::free(),
        }
    }

    fn encode(&self, sdcc: &Sdcc) -> Result<Vec<u8>, KlvError> {
        let n = sdcc.members.len();
        if n == 0 {
            return Err(KlvError::new(ERR_FORMAT, "SDCC-FLP describes no entries"));
        }
        if sdcc.sigma_length > 0 && sdcc.sigma_uses_imap {
            return Err(KlvError::new(ERR_FORMAT, "IMAP standard deviations are not supported"));
        }
        let limit = if sdcc.long_parse_control {
            LONG_LENGTH_LIMIT
        } else {
            SHORT_LENGTH_LIMIT
        };
        if sdcc.sigma_length > limit || sdcc.rho_length > limit {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!(
                    "SDCC-FLP value lengths {} and {} exceed {limit}",
                    sdcc.sigma_length, sdcc.rho_length
                ),
            ));
        }
        let rho_count = sdcc.rho_count();
        if sdcc.sigma_length > 0 && sdcc.sigma.len() != n {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!("SDCC-FLP of {n} entries holds {} deviations", sdcc.sigma.len()),
            ));
        }
        if sdcc.rho_length > 0 && sdcc.rho.len() != rho_count {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!("SDCC-FLP of {n} entries holds {} coefficients", sdcc.rho.len()),
            ));
        }

        let mut out = Vec::new();
        write_ber_oid(n as u64, &mut out)?;
        if sdcc.long_parse_control {
            let parse_control = (u64::from(sdcc.sparse) << 12)
                | (u64::from(sdcc.rho_uses_imap) << 11)
                | ((sdcc.rho_length as u64) << 7)
                | (u64::from(sdcc.sigma_uses_imap) << 4)
                | sdcc.sigma_length as u64;
            // The long form is always two bytes, padded if need be.
            if ber_oid_length(parse_control) == 1 {
                out.push(0x80);
            }
            write_ber_oid(parse_control, &mut out)?;
        } else {
            let parse_control =
                ((sdcc.sigma_length as u64) << 4) | (u64::from(sdcc.sparse) << 3) | sdcc.rho_length as u64;
            write_ber_oid(parse_control, &mut out)?;
        }

        if sdcc.sparse {
            let mut bits = vec![0u8; rho_count.div_ceil(8)];
            for (i, rho) in sdcc.rho.iter().enumerate() {
                if !is_zero(rho) {
                    bits[i / 8] |= 0x80 >> (i % 8);
                }
            }
            out.extend(bits);
        }

        if sdcc.sigma_length > 0 {
            for sigma in &sdcc.sigma {
                let v = sigma.as_float().ok_or_else(|| type_error("float", sigma))?;
                write_float(v, &mut out, sdcc.sigma_length)?;
            }
        }

        if sdcc.rho_length > 0 {
            for rho in sdcc.rho.iter().filter(|rho| !(sdcc.sparse && is_zero(rho))) {
                if sdcc.rho_uses_imap {
                    let v = rho.as_imap().ok_or_else(|| type_error("float", rho))?;
                    write_imap(v, RHO_MIN, RHO_MAX, &mut out, sdcc.rho_length)?;
                } else {
                    let v = rho.as_float().ok_or_else(|| type_error("float", rho))?;
                    write_float(v, &mut out, sdcc.rho_length)?;
                }
            }
        }
        Ok(out)
    }
}

impl Default for SdccFlpFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl Format for SdccFlpFormat {
    fn description(&self) -> String {
        format!("SDCC-FLP of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let offset = cur.position();
        let n = usize::try_from(read_ber_oid(cur)?)
            .ok()
            .filter(|&n| n <= self.preceding.len())
            .ok_or_else(|| {
                KlvError::new(
                    ERR_FORMAT,
                    format!("SDCC-FLP describes more than the {} preceding entries", self.preceding.len()),
                )
                .at(offset)
            })?;
        let members = self.preceding[self.preceding.len() - n..].to_vec();

        let offset = cur.position();
        let parse_control = read_ber_oid(cur)?;
        let long_parse_control = match cur.position() - offset {
            1 => false,
            2 => true,
            width => {
                return Err(KlvError::new(ERR_FORMAT, format!("parse control of {width} bytes")).at(offset));
            }
        };
        let field = |shift: u32, mask: u64| ((parse_control >> shift) & mask) as usize;
        let mut sdcc = Sdcc {
            members,
            sigma: Vec::new(),
            rho: Vec::new(),
            sigma_length: 0,
            rho_length: 0,
            sparse: false,
            long_parse_control,
            sigma_uses_imap: false,
            rho_uses_imap: true,
        };
        if long_parse_control {
            sdcc.sigma_length = field(0, 0xF);
            sdcc.sigma_uses_imap = field(4, 1) != 0;
            sdcc.rho_length = field(7, 0xF);
            sdcc.rho_uses_imap = field(11, 1) != 0;
            sdcc.sparse = field(12, 1) != 0;
        } else {
            sdcc.rho_length = field(0, 0x7);
            sdcc.sparse = field(3, 1) != 0;
            sdcc.sigma_length = field(4, 0x7);
        }
        if sdcc.sigma_length > 0 && sdcc.sigma_uses_imap {
            return Err(KlvError::new(ERR_FORMAT, "IMAP standard deviations are not supported").at(offset));
        }

        let rho_count = sdcc.rho_count();
        let bits = if sdcc.sparse {
            read_blob(cur, rho_count.div_ceil(8))?
        } else {
            Vec::new()
        };

        if sdcc.sigma_length > 0 {
            for _ in 0..n {
                sdcc.sigma.push(KlvValue::Float(read_float(cur, sdcc.sigma_length)?));
            }
        }

        if sdcc.rho_length > 0 {
            for i in 0..rho_count {
                let rho = if sdcc.sparse && bits[i / 8] & (0x80 >> (i % 8)) == 0 {
                    KlvValue::Float(0.0)
                } else if sdcc.rho_uses_imap {
                    imap_value(read_imap(cur, RHO_MIN, RHO_MAX, sdcc.rho_length)?)
                } else {
                    KlvValue::Float(read_float(cur, sdcc.rho_length)?)
                };
                sdcc.rho.push(rho);
            }
        }
        Ok(sdcc.to_value())
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        out.extend(self.encode(&Sdcc::from_value(value)?)?);
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        Ok(self.encode(&Sdcc::from_value(value)?)?.len())
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        let Ok(sdcc) = Sdcc::from_value(value) else {
            return value.to_string();
        };
        let join = |items: &[KlvValue]| items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let members: Vec<String> = sdcc.members.iter().map(ToString::to_string).collect();
        format!(
            "{{ members: ({}), sigma: ({}), rho: ({}) }}",
            members.join(", "),
            join(&sdcc.sigma),
            join(&sdcc.rho)
        )
    }

    fn with_preceding(&self, tags: &[u64]) -> Option<Box<dyn Format>> {
        Some(Box::new(Self {
            preceding: tags.to_vec(),
            constraints: self.constraints.clone(),
        }))
    }

    fn preceding_tags(&self, value: &KlvValue) -> Option<Vec<u64>> {
        members_of(value).ok()
    }
}

/// SDCC-FLP record for `members` with IEEE deviations and IMAP
/// coefficients, in the short parse control form.
pub fn sdcc_value(members: &[u64], sigma: &[f64], rho: &[f64], sigma_length: usize, rho_length: usize) -> KlvValue {
    Sdcc {
        members: members.to_vec(),
        sigma: sigma.iter().map(|&v| KlvValue::Float(v)).collect(),
        rho: rho.iter().map(|&v| KlvValue::Float(v)).collect(),
        sigma_length,
        rho_length,
        sparse: false,
        long_parse_control: false,
        sigma_uses_imap: false,
        rho_uses_imap: true,
    }
    .to_value()
}
