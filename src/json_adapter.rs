//! JSON bridge for decoded packets.
//!
//! Values serialize with an explicit type tag so they round-trip without a
//! registry:
//!
//! ```text
//! {"type": "uint", "value": 5}
//! {"type": "local_set", "value": [{"tag": 2, "value": {"type": "uint", "value": 1}}]}
//! {"type": "universal_set", "value": [{"key": "060E2B34.01010101.07020101.01050000", "value": ...}]}
//! ```
//!
//! Blobs are base64, universal keys dotted hex, and non-finite floats the
//! strings `"nan"`, `"inf"` and `"-inf"`.  IMAP special values carry a
//! `kind` (`{"type": "imap", "value": {"kind": "below_minimum"}}`).  Set
//! entries and record fields are arrays, so their order survives.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::*;
use crate::imap::Imap;
use crate::key::{LdsKey, UdsKey};
use crate::packet::Packet;
use crate::value::{KlvSet, KlvValue};

// ── Mirror types ─────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
enum JsonValue {
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "blob")]
    Blob(String),
    #[serde(rename = "uint")]
    UInt(u64),
    #[serde(rename = "sint")]
    SInt(i64),
    #[serde(rename = "float")]
    Float(#[serde(with = "float_repr")] f64),
    #[serde(rename = "imap")]
    Imap(JsonImap),
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "bool")]
    Bool(bool),
    #[serde(rename = "local_set")]
    LocalSet(Vec<LocalEntry>),
    #[serde(rename = "universal_set")]
    UniversalSet(Vec<UniversalEntry>),
    #[serde(rename = "series")]
    Series(Vec<JsonValue>),
    #[serde(rename = "record")]
    Record(Vec<RecordField>),
}

/// IMAP kinds with no plain float form.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonImap {
    Normal {
        #[serde(with = "float_repr")]
        value: f64,
    },
    Nan {
        signaling: bool,
        negative: bool,
        payload: u64,
    },
    BelowMinimum,
    AboveMaximum,
    UserDefined {
        payload: u64,
    },
}

impl From<Imap> for JsonImap {
    fn from(value: Imap) -> Self {
        match value {
            Imap::Normal(value) => JsonImap::Normal { value },
            Imap::Nan {
                signaling,
                negative,
                payload,
            } => JsonImap::Nan {
                signaling,
                negative,
                payload,
            },
            Imap::BelowMinimum => JsonImap::BelowMinimum,
            Imap::AboveMaximum => JsonImap::AboveMaximum,
            Imap::UserDefined(payload) => JsonImap::UserDefined { payload },
        }
    }
}

impl From<JsonImap> for Imap {
    fn from(value: JsonImap) -> Self {
        match value {
            JsonImap::Normal { value } => Imap::Normal(value),
            JsonImap::Nan {
                signaling,
                negative,
                payload,
            } => Imap::Nan {
                signaling,
                negative,
                payload,
            },
            JsonImap::BelowMinimum => Imap::BelowMinimum,
            JsonImap::AboveMaximum => Imap::AboveMaximum,
            JsonImap::UserDefined { payload } => Imap::UserDefined(payload),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LocalEntry {
    tag: u64,
    value: JsonValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct UniversalEntry {
    key: String,
    value: JsonValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordField {
    name: String,
    value: JsonValue,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonPacket {
    key: String,
    value: JsonValue,
}

mod float_repr {
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = if value.is_nan() {
            Repr::Text("nan".to_string())
        } else if value.is_infinite() {
            Repr::Text(if *value > 0.0 { "inf" } else { "-inf" }.to_string())
        } else {
            Repr::Number(*value)
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => match text.as_str() {
                "nan" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(de::Error::custom(format!("invalid float {other:?}"))),
            },
        }
    }
}

// ── Conversion ───────────────────────────────────────────────

fn check_depth(depth: u32) -> Result<(), KlvError> {
    if depth > MAX_DEPTH {
        return Err(KlvError::new(
            ERR_LIMIT_DEPTH,
            format!("nesting exceeds {MAX_DEPTH} levels"),
        ));
    }
    Ok(())
}

fn to_json(value: &KlvValue, depth: u32) -> Result<JsonValue, KlvError> {
    check_depth(depth)?;
    Ok(match value {
        KlvValue::Empty => JsonValue::Empty,
        KlvValue::Blob(bytes) => JsonValue::Blob(BASE64.encode(bytes)),
        KlvValue::UInt(v) => JsonValue::UInt(*v),
        KlvValue::SInt(v) => JsonValue::SInt(*v),
        KlvValue::Float(v) => JsonValue::Float(*v),
        KlvValue::Imap(v) => JsonValue::Imap((*v).into()),
        KlvValue::String(s) => JsonValue::String(s.clone()),
        KlvValue::Bool(b) => JsonValue::Bool(*b),
        KlvValue::LocalSet(set) => JsonValue::LocalSet(
            set.iter()
                .map(|(key, v)| {
                    Ok(LocalEntry {
                        tag: key.0,
                        value: to_json(v, depth + 1)?,
                    })
                })
                .collect::<Result<_, KlvError>>()?,
        ),
        KlvValue::UniversalSet(set) => JsonValue::UniversalSet(
            set.iter()
                .map(|(key, v)| {
                    Ok(UniversalEntry {
                        key: key.to_string(),
                        value: to_json(v, depth + 1)?,
                    })
                })
                .collect::<Result<_, KlvError>>()?,
        ),
        KlvValue::Series(items) => JsonValue::Series(
            items
                .iter()
                .map(|v| to_json(v, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        KlvValue::Record(fields) => JsonValue::Record(
            fields
                .iter()
                .map(|(name, v)| {
                    Ok(RecordField {
                        name: name.clone(),
                        value: to_json(v, depth + 1)?,
                    })
                })
                .collect::<Result<_, KlvError>>()?,
        ),
    })
}

fn from_json(json: JsonValue, depth: u32) -> Result<KlvValue, KlvError> {
    check_depth(depth)?;
    Ok(match json {
        JsonValue::Empty => KlvValue::Empty,
        JsonValue::Blob(text) => KlvValue::Blob(
            BASE64
                .decode(text.as_bytes())
                .map_err(|e| KlvError::new(ERR_FORMAT, format!("invalid base64 blob: {e}")))?,
        ),
        JsonValue::UInt(v) => KlvValue::UInt(v),
        JsonValue::SInt(v) => KlvValue::SInt(v),
        JsonValue::Float(v) => KlvValue::Float(v),
        JsonValue::Imap(v) => KlvValue::Imap(v.into()),
        JsonValue::String(s) => KlvValue::String(s),
        JsonValue::Bool(b) => KlvValue::Bool(b),
        JsonValue::LocalSet(entries) => {
            let mut set = KlvSet::new();
            for entry in entries {
                set.add(LdsKey(entry.tag), from_json(entry.value, depth + 1)?);
            }
            KlvValue::LocalSet(set)
        }
        JsonValue::UniversalSet(entries) => {
            let mut set = KlvSet::new();
            for entry in entries {
                let key: UdsKey = entry.key.parse()?;
                set.add(key, from_json(entry.value, depth + 1)?);
            }
            KlvValue::UniversalSet(set)
        }
        JsonValue::Series(items) => KlvValue::Series(
            items
                .into_iter()
                .map(|v| from_json(v, depth + 1))
                .collect::<Result<_, _>>()?,
        ),
        JsonValue::Record(fields) => KlvValue::Record(
            fields
                .into_iter()
                .map(|f| Ok((f.name, from_json(f.value, depth + 1)?)))
                .collect::<Result<_, KlvError>>()?,
        ),
    })
}

fn json_error(err: serde_json::Error) -> KlvError {
    KlvError::new(ERR_FORMAT, format!("JSON: {err}"))
}

// ── Public API ───────────────────────────────────────────────

pub fn value_to_json(value: &KlvValue) -> Result<serde_json::Value, KlvError> {
    serde_json::to_value(to_json(value, 0)?).map_err(json_error)
}

pub fn value_from_json(json: &serde_json::Value) -> Result<KlvValue, KlvError> {
    let mirror = JsonValue::deserialize(json).map_err(json_error)?;
    from_json(mirror, 0)
}

fn packet_to_mirror(packet: &Packet) -> Result<JsonPacket, KlvError> {
    Ok(JsonPacket {
        key: packet.key.to_string(),
        value: to_json(&packet.value, 0)?,
    })
}

fn packet_from_mirror(mirror: JsonPacket) -> Result<Packet, KlvError> {
    Ok(Packet::new(mirror.key.parse()?, from_json(mirror.value, 0)?))
}

/// Pretty-printed JSON for one packet.
pub fn packet_to_json(packet: &Packet) -> Result<String, KlvError> {
    serde_json::to_string_pretty(&packet_to_mirror(packet)?).map_err(json_error)
}

pub fn packet_from_json(text: &str) -> Result<Packet, KlvError> {
    packet_from_mirror(serde_json::from_str(text).map_err(json_error)?)
}

/// Packets as a JSON array, in order.
pub fn packets_to_json(packets: &[Packet]) -> Result<String, KlvError> {
    let mirrors = packets
        .iter()
        .map(packet_to_mirror)
        .collect::<Result<Vec<_>, _>>()?;
    serde_json::to_string_pretty(&mirrors).map_err(json_error)
}

pub fn packets_from_json(text: &str) -> Result<Vec<Packet>, KlvError> {
    let mirrors: Vec<JsonPacket> = serde_json::from_str(text).map_err(json_error)?;
    mirrors.into_iter().map(packet_from_mirror).collect()
}
