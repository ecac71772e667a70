//! ST1303 multi-dimensional arrays and the ST1601 set built on them.

use klv::standards::st1303::{Mdap, MdapElement, MdapFormat};
use klv::standards::st1601::SdccFormat;
use klv::*;

fn ctx() -> Context<'static> {
    Context::new(registry::global().unwrap())
}

fn hex(s: &str) -> Vec<u8> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn encode_value(format: &dyn Format, value: &KlvValue) -> Vec<u8> {
    let length = format.length_of(value, &ctx()).unwrap();
    let mut out = Vec::new();
    format.write(value, &mut out, length, &ctx()).unwrap();
    assert_eq!(out.len(), length);
    out
}

fn decode_mdap(format: &MdapFormat, bytes: &[u8]) -> Mdap {
    format.read_mdap(&mut Cursor::new(bytes), bytes.len()).unwrap()
}

fn floats(values: &[f64]) -> Vec<KlvValue> {
    values.iter().map(|&v| KlvValue::Float(v)).collect()
}

fn uints(values: &[u64]) -> Vec<KlvValue> {
    values.iter().map(|&v| KlvValue::UInt(v)).collect()
}

fn sints(values: &[i64]) -> Vec<KlvValue> {
    values.iter().map(|&v| KlvValue::SInt(v)).collect()
}

fn bools(values: &[u8]) -> Vec<KlvValue> {
    values.iter().map(|&v| KlvValue::Bool(v != 0)).collect()
}

// ── Array processing algorithms ──────────────────────────────

#[test]
fn imap_array() {
    let format = MdapFormat::new(MdapElement::Float);
    let bytes = hex("02 04 02 02 02 3F800000 41000000 0000 1000 2000 3000 4000 5000 6000 7000");
    let expected = Mdap::imap(
        vec![4, 2],
        floats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
        2,
        1.0,
        8.0,
    );
    assert_eq!(decode_mdap(&format, &bytes), expected);
    assert_eq!(encode_value(&format, &expected.to_value()), bytes);
}

#[test]
fn natural_float_array() {
    let format = MdapFormat::new(MdapElement::Float);
    let bytes = hex(
        "02 04 02 04 01
         3F800000 40000000 40400000 40800000
         40A00000 40C00000 40E00000 41000000",
    );
    let expected = Mdap::natural(vec![4, 2], floats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]), 4);
    assert_eq!(decode_mdap(&format, &bytes), expected);
    assert_eq!(encode_value(&format, &expected.to_value()), bytes);
}

#[test]
fn boolean_array_packs_bits() {
    let format = MdapFormat::new(MdapElement::Bool);
    let bytes = hex("02 05 04 01 03 48 A8 F0");
    let expected = Mdap::boolean(
        vec![5, 4],
        bools(&[0, 1, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 1, 0, 0, 0, 1, 1, 1, 1]),
    );
    assert_eq!(decode_mdap(&format, &bytes), expected);
    assert_eq!(encode_value(&format, &expected.to_value()), bytes);
}

#[test]
fn uint_array_without_bias() {
    let format = MdapFormat::new(MdapElement::UInt);
    let bytes = hex("02 03 03 01 04 00 0C 36 825E 02 9000 00 7F 8100 01");
    let expected = Mdap::uint(vec![3, 3], uints(&[12, 54, 350, 2, 2048, 0, 127, 128, 1]));
    assert_eq!(decode_mdap(&format, &bytes), expected);
    assert_eq!(encode_value(&format, &expected.to_value()), bytes);
}

#[test]
fn uint_array_with_bias() {
    let format = MdapFormat::new(MdapElement::UInt);
    let bytes = hex("01 05 01 04 8102 00 28 19 0D 3C");
    let mdap = decode_mdap(&format, &bytes);
    assert_eq!(mdap.elements, uints(&[130, 170, 155, 143, 190]));
    assert_eq!(mdap.apa_params_length, 2);
    assert_eq!(mdap, Mdap::uint(vec![5], uints(&[130, 170, 155, 143, 190])));
    assert_eq!(encode_value(&format, &mdap.to_value()), bytes);
}

#[test]
fn rle_array_in_two_dimensions() {
    let format = MdapFormat::new(MdapElement::SInt);
    let bytes = hex(
        "02 0A 0A 02 05 FA70
         0678 00 00 04 03
         0000 00 05 04 05
         FC09 04 00 06 03
         03D2 04 05 03 05
         04EC 07 05 03 05",
    );
    let mut expected = Vec::new();
    for row in 0..10 {
        let (left, right) = match row {
            0..=3 => (1656, 0),
            4..=6 => (-1015, 978),
            _ => (-1015, 1260),
        };
        expected.extend([left; 3]);
        expected.extend([-1424; 2]);
        expected.extend([right; 5]);
    }
    let mdap = decode_mdap(&format, &bytes);
    assert_eq!(mdap, Mdap::rle(vec![10, 10], sints(&expected), 2));

    let encoded = encode_value(&format, &mdap.to_value());
    // The most common element, smallest on a tie, becomes the default.
    assert_eq!(encoded[..7], bytes[..7]);
    assert_eq!(decode_mdap(&format, &encoded), mdap);
}

#[test]
fn rle_array_in_three_dimensions() {
    let format = MdapFormat::new(MdapElement::UInt);
    let bytes = hex(
        "03 02 03 04 01 05 03
         01 000000 010102
         02 000002 020102
         04 000103 010101
         04 000202 020102
         00 010000 010101
         01 010001 010101",
    );
    let expected = uints(&[
        1, 1, 2, 2, 3, 3, 3, 4, 3, 3, 4, 4, //
        0, 1, 2, 2, 3, 3, 3, 3, 3, 3, 4, 4,
    ]);
    let mdap = decode_mdap(&format, &bytes);
    assert_eq!(mdap, Mdap::rle(vec![2, 3, 4], expected, 1));
    assert_eq!(decode_mdap(&format, &encode_value(&format, &mdap.to_value())), mdap);
}

#[test]
fn rle_run_outside_array_is_rejected() {
    let format = MdapFormat::new(MdapElement::UInt);
    let bytes = hex("01 04 01 05 00 07 03 02");
    let err = format.read_mdap(&mut Cursor::new(&bytes), bytes.len()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn boolean_apa_needs_boolean_elements() {
    let format = MdapFormat::new(MdapElement::UInt);
    let bytes = hex("01 08 01 03 FF");
    let err = format.read_mdap(&mut Cursor::new(&bytes), bytes.len()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
    // The generic read keeps the bytes instead.
    let value = format.read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    assert_eq!(value, KlvValue::Blob(bytes));
}

#[test]
fn element_count_must_match_sizes() {
    let format = MdapFormat::new(MdapElement::UInt);
    let mdap = Mdap::natural(vec![2, 2], uints(&[1, 2, 3]), 1);
    let err = format.length_of(&mdap.to_value(), &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_LENGTH);
}

#[test]
fn mdap_prints_sizes_and_elements() {
    let format = MdapFormat::new(MdapElement::UInt);
    let mdap = Mdap::natural(vec![3], uints(&[4, 5, 6]), 1);
    assert_eq!(
        format.print(&mdap.to_value(), &ctx()),
        "{ sizes: (3), apa: Natural, elements: (4, 5, 6) }"
    );
}

// ── ST1601 ───────────────────────────────────────────────────

const ST1601_SET: &str = "
    01 01 01
    02 04 414C474F
    03 03 312E30
    04 15 02 04 04 01 01 85806145 1F5B7A81 5952341B 7DB0CCD2
    05 25 02 02 04 04 01
       4203EFC8 4203EFCA 4203EFCD 4203EFD0
       424055E5 424055E7 424055EA 424055ED
    06 08 746573742E696D67
    07 10 AABBCCDDEEFF00112233445566778899
    08 18 01 04 03 02 C4610000 46947000 096000 096100 096000 095F00
    09 35 02 06 04 02 01
       0150 0250 0350 0450
       0160 0260 0360 0460
       0500 0600 0700 0800
       0A70 0B70 0C70 0D70
       0A80 0B80 0C80 0D80
       1500 1600 1700 1800
    0A 1D 02 06 04 01 01
       00 04 10 14
       10 14 00 04
       20 24 50 54
       30 34 40 44
       40 44 30 34
       50 54 20 24";

fn st1601_field(set: &LocalSet, tag: u64) -> Mdap {
    Mdap::from_value(set.find(&LdsKey(tag)).unwrap()).unwrap()
}

#[test]
fn st1601_set_round_trips() {
    let format = set::LocalSetFormat::new(Standard::St1601);
    let bytes = hex(ST1601_SET);
    let value = format.read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    let KlvValue::LocalSet(set) = &value else {
        panic!("expected a local set, got {value:?}");
    };

    assert_eq!(set.find(&LdsKey(1)), Some(&KlvValue::UInt(1)));
    assert_eq!(set.find(&LdsKey(2)), Some(&KlvValue::String("ALGO".into())));
    assert_eq!(set.find(&LdsKey(6)), Some(&KlvValue::String("test.img".into())));

    let pixels = st1601_field(set, 4);
    assert_eq!(pixels.sizes, [4, 4]);
    assert_eq!(pixels.elements[..4], uints(&[133, 128, 97, 69])[..]);

    let elevation = st1601_field(set, 8);
    assert_eq!(elevation.imap_bounds, Some((-900.0, 19000.0)));
    assert_eq!(elevation.elements, floats(&[1500.0, 1501.0, 1500.0, 1499.0]));

    let pixel_sdcc = st1601_field(set, 9);
    assert_eq!(pixel_sdcc.elements[..4], floats(&[1.3125, 2.3125, 3.3125, 4.3125])[..]);
    assert_eq!(pixel_sdcc.elements[8..12], floats(&[-0.921875, -0.90625, -0.890625, -0.875])[..]);

    let geographic_sdcc = st1601_field(set, 10);
    assert_eq!(geographic_sdcc.elements[..4], floats(&[0.0, 32.0, 128.0, 160.0])[..]);
    assert_eq!(geographic_sdcc.elements[8..12], floats(&[-0.5, -0.4375, 0.25, 0.3125])[..]);
    assert_eq!(geographic_sdcc.elements[12..16], floats(&[384.0, 416.0, 512.0, 544.0])[..]);

    assert_eq!(encode_value(&format, &value), bytes);
}

#[test]
fn geographic_sdcc_without_elevation() {
    let format = SdccFormat::geographic();
    let mdap = Mdap::natural(
        vec![3, 2],
        floats(&[0.0, 32.0, 128.0, 160.0, -0.5, 0.25]),
        1,
    );
    let bytes = encode_value(&format, &mdap.to_value());
    assert_eq!(bytes, hex("02 03 02 01 01 00 04 10 14 20 50"));
    let value = format.read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    assert_eq!(value, mdap.to_value());
}

#[test]
fn pixel_sdcc_needs_six_rows() {
    let format = SdccFormat::pixel();
    let mdap = Mdap::natural(vec![3, 1], floats(&[1.0, 1.0, 0.5]), 2);
    let err = format.length_of(&mdap.to_value(), &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn st1601_travels_inside_st0601() {
    let mut inner = LocalSet::new();
    inner
        .add(LdsKey(1), KlvValue::UInt(1))
        .add(LdsKey(2), KlvValue::String("ALGO".into()));
    let mut set = LocalSet::new();
    set.add(LdsKey(98), KlvValue::LocalSet(inner.clone()));

    let format = set::LocalSetFormat::new(Standard::St0601);
    let bytes = encode_value(&format, &KlvValue::LocalSet(set.clone()));
    assert_eq!(bytes, hex("62 09 01 01 01 02 04 414C474F"));
    let value = format.read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    assert_eq!(value, KlvValue::LocalSet(set));
}
