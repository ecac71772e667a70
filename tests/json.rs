use klv::json_adapter::*;
use klv::registry::{ST0104_KEY, ST0601_KEY};
use klv::standards::st0104::USER_DEFINED_TIMESTAMP_KEY;
use klv::*;
use serde_json::json;

// ── Values ───────────────────────────────────────────────────

#[test]
fn scalar_values_are_type_tagged() {
    assert_eq!(value_to_json(&KlvValue::UInt(5)).unwrap(), json!({"type": "uint", "value": 5}));
    assert_eq!(value_to_json(&KlvValue::SInt(-5)).unwrap(), json!({"type": "sint", "value": -5}));
    assert_eq!(value_to_json(&KlvValue::Bool(true)).unwrap(), json!({"type": "bool", "value": true}));
    assert_eq!(value_to_json(&KlvValue::Empty).unwrap(), json!({"type": "empty"}));
}

#[test]
fn non_finite_floats_are_strings() {
    assert_eq!(
        value_to_json(&KlvValue::Float(f64::NAN)).unwrap(),
        json!({"type": "float", "value": "nan"})
    );
    assert_eq!(
        value_to_json(&KlvValue::Float(f64::INFINITY)).unwrap(),
        json!({"type": "float", "value": "inf"})
    );
    let back = value_from_json(&json!({"type": "float", "value": "-inf"})).unwrap();
    assert_eq!(back, KlvValue::Float(f64::NEG_INFINITY));
    let back = value_from_json(&json!({"type": "float", "value": "nan"})).unwrap();
    assert!(back.as_float().unwrap().is_nan());
}

#[test]
fn imap_kinds_carry_their_payload() {
    let value = KlvValue::Imap(klv::imap::Imap::signaling_nan(true, 9));
    let json = value_to_json(&value).unwrap();
    assert_eq!(
        json,
        json!({"type": "imap", "value": {"kind": "nan", "signaling": true, "negative": true, "payload": 9}})
    );
    assert_eq!(value_from_json(&json).unwrap(), value);

    let below = value_from_json(&json!({"type": "imap", "value": {"kind": "below_minimum"}})).unwrap();
    assert_eq!(below, KlvValue::Imap(klv::imap::Imap::BelowMinimum));
}

#[test]
fn blob_is_base64() {
    let json = value_to_json(&KlvValue::Blob(vec![0xAB, 0xCD])).unwrap();
    assert_eq!(json, json!({"type": "blob", "value": "q80="}));
    assert_eq!(value_from_json(&json).unwrap(), KlvValue::Blob(vec![0xAB, 0xCD]));
}

#[test]
fn local_set_keeps_entry_order() {
    let mut set = LocalSet::new();
    set.add(LdsKey(65), KlvValue::UInt(17))
        .add(LdsKey(3), KlvValue::String("M".into()));
    let json = value_to_json(&KlvValue::LocalSet(set.clone())).unwrap();
    assert_eq!(
        json,
        json!({"type": "local_set", "value": [
            {"tag": 65, "value": {"type": "uint", "value": 17}},
            {"tag": 3, "value": {"type": "string", "value": "M"}}
        ]})
    );
    assert_eq!(value_from_json(&json).unwrap(), KlvValue::LocalSet(set));
}

#[test]
fn universal_set_keys_are_dotted_hex() {
    let mut set = UniversalSet::new();
    set.add(USER_DEFINED_TIMESTAMP_KEY, KlvValue::UInt(1));
    let json = value_to_json(&KlvValue::UniversalSet(set.clone())).unwrap();
    assert_eq!(json["value"][0]["key"], json!(USER_DEFINED_TIMESTAMP_KEY.to_string()));
    assert_eq!(value_from_json(&json).unwrap(), KlvValue::UniversalSet(set));
}

#[test]
fn record_and_series_round_trip() {
    let value = KlvValue::Series(vec![KlvValue::Record(vec![
        ("row".into(), KlvValue::UInt(2)),
        ("column".into(), KlvValue::UInt(3)),
    ])]);
    let json = value_to_json(&value).unwrap();
    assert_eq!(json["value"][0]["value"][1]["name"], json!("column"));
    assert_eq!(value_from_json(&json).unwrap(), value);
}

// ── Errors ───────────────────────────────────────────────────

#[test]
fn invalid_base64_is_format_error() {
    let err = value_from_json(&json!({"type": "blob", "value": "!!"})).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn malformed_json_is_format_error() {
    assert_eq!(packet_from_json("{").unwrap_err().code, ERR_FORMAT);
    assert_eq!(
        value_from_json(&json!({"type": "quaternion", "value": 1})).unwrap_err().code,
        ERR_FORMAT
    );
}

#[test]
fn bad_universal_key_is_format_error() {
    let text = r#"{"key": "not a key", "value": {"type": "empty"}}"#;
    assert_eq!(packet_from_json(text).unwrap_err().code, ERR_FORMAT);
}

#[test]
fn deep_nesting_is_depth_error() {
    let mut value = KlvValue::UInt(1);
    for _ in 0..40 {
        value = KlvValue::Series(vec![value]);
    }
    assert_eq!(value_to_json(&value).unwrap_err().code, ERR_LIMIT_DEPTH);

    let mut json = json!({"type": "uint", "value": 1});
    for _ in 0..40 {
        json = json!({"type": "series", "value": [json]});
    }
    assert_eq!(value_from_json(&json).unwrap_err().code, ERR_LIMIT_DEPTH);
}

// ── Packets ──────────────────────────────────────────────────

#[test]
fn packet_json_names_key() {
    let packet = Packet::new(ST0601_KEY, KlvValue::LocalSet(LocalSet::new()));
    let text = packet_to_json(&packet).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["key"], json!("060E2B34.020B0101.0E010301.01000000"));
    assert_eq!(packet_from_json(&text).unwrap(), packet);
}

#[test]
fn packet_list_round_trip() {
    let mut local = LocalSet::new();
    local.add(LdsKey(2), KlvValue::UInt(99));
    let mut universal = UniversalSet::new();
    universal.add(USER_DEFINED_TIMESTAMP_KEY, KlvValue::UInt(99));
    let packets = vec![
        Packet::new(ST0601_KEY, KlvValue::LocalSet(local)),
        Packet::new(ST0104_KEY, KlvValue::UniversalSet(universal)),
    ];
    let text = packets_to_json(&packets).unwrap();
    assert_eq!(packets_from_json(&text).unwrap(), packets);
}

#[test]
fn decoded_packet_survives_json() {
    let mut set = LocalSet::new();
    set.add(LdsKey(3), KlvValue::String("MISSION01".into()))
        .add(LdsKey(65), KlvValue::UInt(17));
    let bytes = encode(&Packet::new(ST0601_KEY, KlvValue::LocalSet(set))).unwrap();
    let packet = decode(&bytes).unwrap();
    let restored = packet_from_json(&packet_to_json(&packet).unwrap()).unwrap();
    assert_eq!(encode(&restored).unwrap(), bytes);
}
