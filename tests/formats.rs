//! Shared format wrapper behavior, exercised through the scalar formats.

use klv::format::*;
use klv::*;

fn ctx() -> Context<'static> {
    Context::new(registry::global().unwrap())
}

fn encode_value(format: &dyn Format, value: &KlvValue) -> Vec<u8> {
    let length = format.length_of(value, &ctx()).unwrap();
    let mut out = Vec::new();
    format.write(value, &mut out, length, &ctx()).unwrap();
    out
}

fn decode_value(format: &dyn Format, bytes: &[u8]) -> KlvValue {
    let mut cur = Cursor::new(bytes);
    let value = format.read(&mut cur, bytes.len(), &ctx()).unwrap();
    assert!(cur.is_empty());
    value
}

// ── Read wrapper ─────────────────────────────────────────────

#[test]
fn zero_length_reads_empty() {
    let format = UintFormat::new(LengthConstraints::fixed(2).unwrap());
    assert_eq!(format.read(&mut Cursor::new(&[1, 2]), 0, &ctx()).unwrap(), KlvValue::Empty);
}

#[test]
fn length_past_buffer_is_error() {
    let format = BlobFormat::new();
    let err = format.read(&mut Cursor::new(&[1, 2]), 3, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_LENGTH);
}

#[test]
fn constraint_violation_keeps_blob() {
    let format = UintFormat::new(LengthConstraints::fixed(2).unwrap());
    assert_eq!(decode_value(&format, &[1, 2, 3]), KlvValue::Blob(vec![1, 2, 3]));
}

#[test]
fn parse_failure_keeps_blob() {
    // 0x7FFF scales past the 180 maximum.
    let format = ImapFormat::variable(0.0, 180.0, 2).unwrap();
    assert_eq!(decode_value(&format, &[0x7F, 0xFF]), KlvValue::Blob(vec![0x7F, 0xFF]));
}

#[test]
fn partial_read_keeps_blob() {
    // A BER-OID value that ends before the field does.
    let format = BerOidFormat::new();
    assert_eq!(decode_value(&format, &[0x05, 0x06]), KlvValue::Blob(vec![0x05, 0x06]));
}

// ── Write wrapper ────────────────────────────────────────────

#[test]
fn empty_writes_nothing() {
    let format = UintFormat::new(LengthConstraints::free());
    assert!(encode_value(&format, &KlvValue::Empty).is_empty());
}

#[test]
fn blob_writes_raw_bytes() {
    let format = UintFormat::new(LengthConstraints::fixed(2).unwrap());
    assert_eq!(encode_value(&format, &KlvValue::Blob(vec![9, 9, 9])), [9, 9, 9]);
}

#[test]
fn wrong_length_is_error_and_writes_nothing() {
    let format = BlobFormat::new();
    let mut out = vec![0xAA];
    let err = format
        .write(&KlvValue::Blob(vec![1, 2]), &mut out, 3, &ctx())
        .unwrap_err();
    assert_eq!(err.code, ERR_LENGTH);
    assert_eq!(out, [0xAA]);
}

#[test]
fn wrong_type_is_type_error() {
    let format = UintFormat::new(LengthConstraints::free());
    let err = format
        .write(&KlvValue::String("x".into()), &mut Vec::new(), 1, &ctx())
        .unwrap_err();
    assert_eq!(err.code, ERR_TYPE);
}

// ── Scalar formats ───────────────────────────────────────────

#[test]
fn uint_uses_minimal_or_fixed_length() {
    let free = UintFormat::new(LengthConstraints::free());
    assert_eq!(encode_value(&free, &KlvValue::UInt(0x0102)), [0x01, 0x02]);
    let fixed = UintFormat::new(LengthConstraints::fixed(4).unwrap());
    assert_eq!(encode_value(&fixed, &KlvValue::UInt(0x0102)), [0, 0, 0x01, 0x02]);
    assert_eq!(decode_value(&fixed, &[0, 0, 0x01, 0x02]), KlvValue::UInt(0x0102));
}

#[test]
fn sint_round_trip() {
    let format = SintFormat::new(LengthConstraints::free());
    let bytes = encode_value(&format, &KlvValue::SInt(-300));
    assert_eq!(bytes, [0xFE, 0xD4]);
    assert_eq!(decode_value(&format, &bytes), KlvValue::SInt(-300));
}

#[test]
fn ber_oid_format_round_trip() {
    let format = BerOidFormat::new();
    let bytes = encode_value(&format, &KlvValue::UInt(300));
    assert_eq!(bytes, [0x82, 0x2C]);
    assert_eq!(decode_value(&format, &bytes), KlvValue::UInt(300));
}

#[test]
fn bool_format() {
    let format = BoolFormat::new().unwrap();
    assert_eq!(encode_value(&format, &KlvValue::Bool(true)), [0x01]);
    assert_eq!(decode_value(&format, &[0x00]), KlvValue::Bool(false));
}

#[test]
fn float_format_defaults_to_eight_bytes() {
    let format = FloatFormat::new().unwrap();
    assert_eq!(encode_value(&format, &KlvValue::Float(0.5)).len(), 8);
    let fixed = FloatFormat::fixed(4).unwrap();
    assert_eq!(encode_value(&fixed, &KlvValue::Float(0.5)), [0x3F, 0x00, 0x00, 0x00]);
}

#[test]
fn imap_format_uses_suggested_length() {
    let format = ImapFormat::variable(0.0, 180.0, 2).unwrap();
    assert_eq!(encode_value(&format, &KlvValue::Float(90.0)), [0x2D, 0x00]);
    assert_eq!(decode_value(&format, &[0x2D, 0x00]), KlvValue::Float(90.0));
}

#[test]
fn imap_format_keeps_special_kinds() {
    let format = ImapFormat::variable(0.0, 100.0, 2).unwrap();
    let below = decode_value(&format, &[0xE0, 0x00]);
    assert_eq!(below, KlvValue::Imap(klv::imap::Imap::BelowMinimum));
    assert_eq!(encode_value(&format, &below), [0xE0, 0x00]);

    let user = decode_value(&format, &[0xC0, 0x00, 0x00, 0x2A]);
    assert_eq!(user, KlvValue::Imap(klv::imap::Imap::UserDefined(42)));
    assert_eq!(format.length_of(&user, &ctx()).unwrap(), 2);

    // A -inf marker with stray bits stays raw.
    assert_eq!(decode_value(&format, &[0xE8, 0x01]), KlvValue::Blob(vec![0xE8, 0x01]));
}

#[test]
fn imap_format_rejects_bad_domain() {
    assert_eq!(ImapFormat::fixed(1.0, 1.0, 2).unwrap_err().code, ERR_FORMAT);
}

#[test]
fn flint_format_nan_marker() {
    let format = FlintFormat::signed(90.0, 4).unwrap();
    assert_eq!(encode_value(&format, &KlvValue::Float(f64::NAN)), [0x80, 0, 0, 0]);
}

#[test]
fn flint_format_rejects_bad_domain() {
    assert_eq!(FlintFormat::unsigned(5.0, 1.0, 2).unwrap_err().code, ERR_REGISTRY);
}

#[test]
fn enum_format_prints_names() {
    let format = EnumFormat::new(
        "Switch",
        LengthConstraints::fixed(1).unwrap(),
        &[(0, "Off"), (1, "On")],
    );
    assert_eq!(format.name_of(1), Some("On"));
    assert_eq!(format.value_of("Off"), Some(0));
    assert_eq!(format.print(&KlvValue::UInt(1), &ctx()), "On");
    assert_eq!(format.print(&KlvValue::UInt(5), &ctx()), "Unknown Switch (5)");
}

// ── Records ──────────────────────────────────────────────────

#[test]
fn record_helpers() {
    let record = KlvValue::Record(vec![("id".into(), KlvValue::UInt(7))]);
    assert_eq!(record_uint(&record, "id").unwrap(), 7);
    assert_eq!(record_field(&record, "missing").unwrap_err().code, ERR_TYPE);
    assert_eq!(record_uint(&KlvValue::UInt(7), "id").unwrap_err().code, ERR_TYPE);
}
