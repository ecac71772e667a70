//! ST1204 Motion Imagery Identification System (MIIS) core identifier.
//!
//! A version byte and a usage byte, then one 16-byte UUID for each
//! identifier the usage byte declares present.  The value is a record with
//! `version`, `sensor_id_type`, `platform_id_type` and the four ids
//! `sensor_id`, `platform_id`, `window_id` and `minor_id`, each a 16-byte
//! blob or `Empty` when absent.

use crate::errors::*;
use crate::format::{record_field, record_optional, record_uint, type_error, Context, Format};
use crate::length_constraints::LengthConstraints;
use crate::read_write::*;
use crate::value::KlvValue;

pub const UUID_LENGTH: usize = 16;

/// How a sensor or platform identifier was assigned.
pub const DEVICE_ID_TYPES: &[(u64, &str)] = &[(0, "None"), (1, "Managed"), (2, "Virtual"), (3, "Physical")];

const ID_FIELDS: [&str; 4] = ["sensor_id", "platform_id", "window_id", "minor_id"];

fn device_id_type_name(value: u64) -> &'static str {
    DEVICE_ID_TYPES
        .iter()
        .find(|(v, _)| *v == value)
        .map_or("Unknown Device ID Type", |(_, name)| *name)
}

fn read_uuid(cur: &mut Cursor<'_>) -> Result<KlvValue, KlvError> {
    Ok(KlvValue::Blob(read_blob(cur, UUID_LENGTH)?))
}

/// MIIS core identifier.
#[derive(Debug, Clone)]
pub struct MiisIdFormat {
    constraints: LengthConstraints,
}

impl MiisIdFormat {
    pub fn new() -> Result<Self, KlvError> {
        Ok(Self {
            constraints: LengthConstraints::range(2, 2 + ID_FIELDS.len() * UUID_LENGTH)?,
        })
    }

    fn ids<'v>(&self, value: &'v KlvValue) -> Result<[Option<&'v [u8]>; 4], KlvError> {
        let mut ids = [None; 4];
        for (slot, name) in ids.iter_mut().zip(ID_FIELDS) {
            *slot = match record_optional(value, name)? {
                None => None,
                Some(KlvValue::Blob(bytes)) if bytes.len() == UUID_LENGTH => Some(bytes.as_slice()),
                Some(KlvValue::Blob(bytes)) => {
                    return Err(KlvError::new(ERR_FORMAT, format!("{name} of {} bytes", bytes.len())));
                }
                Some(other) => return Err(type_error("blob", other).context(name)),
            };
        }
        Ok(ids)
    }
}

impl Format for MiisIdFormat {
    fn description(&self) -> String {
        format!("MIIS ID of {}", self.constraints)
    }

    fn length_constraints(&self) -> &LengthConstraints {
        &self.constraints
    }

    fn read_typed(&self, cur: &mut Cursor<'_>, _: usize, _: &Context<'_>) -> Result<KlvValue, KlvError> {
        let version = cur.read_u8()?;
        let usage = cur.read_u8()?;
        let sensor_id_type = (usage & 0x60) >> 5;
        let platform_id_type = (usage & 0x18) >> 3;
        let present = [sensor_id_type != 0, platform_id_type != 0, usage & 0x04 != 0, usage & 0x02 != 0];

        let mut fields = vec![
            ("version".to_string(), KlvValue::UInt(version.into())),
            ("sensor_id_type".to_string(), KlvValue::UInt(sensor_id_type.into())),
            ("platform_id_type".to_string(), KlvValue::UInt(platform_id_type.into())),
        ];
        for (name, present) in ID_FIELDS.into_iter().zip(present) {
            let id = if present { read_uuid(cur)? } else { KlvValue::Empty };
            fields.push((name.to_string(), id));
        }
        Ok(KlvValue::Record(fields))
    }

    fn write_typed(&self, value: &KlvValue, out: &mut Vec<u8>, _: usize, _: &Context<'_>) -> Result<(), KlvError> {
        let sensor_id_type = record_uint(value, "sensor_id_type")?;
        let platform_id_type = record_uint(value, "platform_id_type")?;
        if sensor_id_type > 3 || platform_id_type > 3 {
            return Err(KlvError::new(
                ERR_FORMAT,
                format!("device id types {sensor_id_type} and {platform_id_type} do not fit two bits"),
            ));
        }
        let [sensor_id, platform_id, window_id, minor_id] = self.ids(value)?;
        if (sensor_id_type != 0) != sensor_id.is_some() || (platform_id_type != 0) != platform_id.is_some() {
            return Err(KlvError::new(
                ERR_FORMAT,
                "device id type and device id disagree on presence",
            ));
        }
        write_int(record_uint(value, "version")?, out, 1)?;
        let usage = (sensor_id_type << 5)
            | (platform_id_type << 3)
            | (u64::from(window_id.is_some()) << 2)
            | (u64::from(minor_id.is_some()) << 1);
        write_int(usage, out, 1)?;
        for id in [sensor_id, platform_id, window_id, minor_id].into_iter().flatten() {
            write_blob(id, out);
        }
        Ok(())
    }

    fn length_of_typed(&self, value: &KlvValue, _: &Context<'_>) -> Result<usize, KlvError> {
        let present = self.ids(value)?.iter().filter(|id| id.is_some()).count();
        Ok(2 + present * UUID_LENGTH)
    }

    fn print_typed(&self, value: &KlvValue, _: &Context<'_>) -> String {
        let (Ok(version), Ok(sensor), Ok(platform)) = (
            record_uint(value, "version"),
            record_uint(value, "sensor_id_type"),
            record_uint(value, "platform_id_type"),
        ) else {
            return value.to_string();
        };
        let id = |name| record_field(value, name).map_or("?".to_string(), ToString::to_string);
        format!(
            "{{ version: {version}, sensor id type: {}, sensor id: {}, platform id type: {}, \
             platform id: {}, window id: {}, minor id: {} }}",
            device_id_type_name(sensor),
            id("sensor_id"),
            device_id_type_name(platform),
            id("platform_id"),
            id("window_id"),
            id("minor_id"),
        )
    }
}

/// MIIS ID with only a physical sensor id, as most platforms send it.
pub fn sensor_miis_id(version: u8, sensor_id: [u8; UUID_LENGTH]) -> KlvValue {
    KlvValue::Record(vec![
        ("version".to_string(), KlvValue::UInt(version.into())),
        ("sensor_id_type".to_string(), KlvValue::UInt(3)),
        ("platform_id_type".to_string(), KlvValue::UInt(0)),
        ("sensor_id".to_string(), KlvValue::Blob(sensor_id.to_vec())),
        ("platform_id".to_string(), KlvValue::Empty),
        ("window_id".to_string(), KlvValue::Empty),
        ("minor_id".to_string(), KlvValue::Empty),
    ])
}
