use klv::string::*;
use klv::*;

fn ctx() -> Context<'static> {
    Context::new(registry::global().unwrap())
}

fn write_text(format: &StringFormat, text: &str) -> Vec<u8> {
    let value = KlvValue::String(text.to_string());
    let length = format.length_of(&value, &ctx()).unwrap();
    let mut out = Vec::new();
    format.write(&value, &mut out, length, &ctx()).unwrap();
    out
}

fn read_text(format: &StringFormat, bytes: &[u8]) -> KlvValue {
    format.read(&mut Cursor::new(bytes), bytes.len(), &ctx()).unwrap()
}

// ── Codecs ───────────────────────────────────────────────────

#[test]
fn utf8_round_trip() {
    let format = StringFormat::utf8();
    let bytes = write_text(&format, "Grüße");
    assert_eq!(bytes, "Grüße".as_bytes());
    assert_eq!(read_text(&format, &bytes), KlvValue::String("Grüße".into()));
}

#[test]
fn utf16_is_big_endian() {
    let format = StringFormat::utf16();
    let bytes = write_text(&format, "US");
    assert_eq!(bytes, [0x00, 0x55, 0x00, 0x53]);
    assert_eq!(read_text(&format, &bytes), KlvValue::String("US".into()));
}

#[test]
fn ascii_rejects_non_ascii_on_write() {
    let format = StringFormat::ascii();
    let value = KlvValue::String("é".into());
    let err = format.write(&value, &mut Vec::new(), 2, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn invalid_bytes_fall_back_to_blob() {
    let format = StringFormat::ascii();
    assert_eq!(read_text(&format, &[0x41, 0xC3]), KlvValue::Blob(vec![0x41, 0xC3]));

    let format = StringFormat::utf16();
    assert_eq!(read_text(&format, &[0x00, 0x41, 0x00]), KlvValue::Blob(vec![0x00, 0x41, 0x00]));
}

#[test]
fn codec_names() {
    assert_eq!(TextCodec::Ascii.name(), "ASCII");
    assert_eq!(TextCodec::Utf16Be.name(), "UTF-16BE");
    assert_eq!(TextCodec::Utf16Be.encoded_length("abc"), 6);
}

// ── Empty strings ────────────────────────────────────────────

#[test]
fn empty_string_is_single_nul() {
    let format = StringFormat::utf8();
    assert_eq!(write_text(&format, ""), [0x00]);
    assert_eq!(read_text(&format, &[0x00]), KlvValue::String(String::new()));
}

#[test]
fn zero_length_field_is_empty_value() {
    let format = StringFormat::utf8();
    assert_eq!(format.read(&mut Cursor::new(&[]), 0, &ctx()).unwrap(), KlvValue::Empty);
}

// ── Constraints ──────────────────────────────────────────────

#[test]
fn char_count_violation_still_decodes() {
    let format = StringFormat::new(
        TextCodec::Utf8,
        LengthConstraints::range(1, 3).unwrap(),
        LengthConstraints::free(),
    );
    assert_eq!(read_text(&format, b"TOO LONG"), KlvValue::String("TOO LONG".into()));
    assert_eq!(write_text(&format, "TOO LONG"), b"TOO LONG");
}

#[test]
fn byte_length_violation_keeps_raw_bytes() {
    let format = StringFormat::new(
        TextCodec::Ascii,
        LengthConstraints::free(),
        LengthConstraints::fixed(4).unwrap(),
    );
    assert_eq!(read_text(&format, b"AB"), KlvValue::Blob(b"AB".to_vec()));
}

#[test]
fn description_mentions_codec_and_constraints() {
    let format = StringFormat::new(
        TextCodec::Utf8,
        LengthConstraints::fixed(2).unwrap(),
        LengthConstraints::free(),
    );
    assert_eq!(
        format.description(),
        "UTF-8 string of length unconstrained (characters: length must be 2)"
    );
}

#[test]
fn non_string_value_is_type_error() {
    let format = StringFormat::utf8();
    let err = format.length_of(&KlvValue::UInt(1), &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_TYPE);
}
