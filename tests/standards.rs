//! Packs and nested sets defined by individual standards.

use klv::set::LocalSetFormat;
use klv::standards::st0806::UserDataTypeIdFormat;
use klv::standards::st0903::{FpaIndexFormat, IdPackFormat, UncertainPackFormat};
use klv::standards::st1002::{EnumerationsFormat, SectionDataPackFormat};
use klv::standards::st1010::sdcc_value;
use klv::standards::st1108::{MetricImplementerFormat, MetricPeriodPackFormat, WindowCornersPackFormat};
use klv::standards::st1204::{sensor_miis_id, MiisIdFormat};
use klv::standards::st1303::Mdap;
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
    format.read(&mut Cursor::new(bytes), bytes.len(), &ctx()).unwrap()
}

fn hex(s: &str) -> Vec<u8> {
    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
        .collect()
}

fn float_of(value: &KlvValue, name: &str) -> f64 {
    value.field(name).and_then(KlvValue::as_float).unwrap()
}

fn record(fields: &[(&str, KlvValue)]) -> KlvValue {
    KlvValue::Record(
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    )
}

// ── ST0903 ───────────────────────────────────────────────────

#[test]
fn vtarget_pack_is_id_then_set() {
    let mut set = LocalSet::new();
    set.add(LdsKey(4), KlvValue::UInt(10))
        .add(LdsKey(5), KlvValue::UInt(80));
    let pack = record(&[("id", KlvValue::UInt(1)), ("set", KlvValue::LocalSet(set))]);

    let bytes = encode_value(&IdPackFormat::vtarget(), &pack);
    assert_eq!(bytes, [0x01, 0x04, 0x01, 0x0A, 0x05, 0x01, 0x50]);
    assert_eq!(decode_value(&IdPackFormat::vtarget(), &bytes), pack);
}

#[test]
fn vtarget_pack_with_large_id() {
    let pack = record(&[("id", KlvValue::UInt(300)), ("set", KlvValue::LocalSet(LocalSet::new()))]);
    let bytes = encode_value(&IdPackFormat::vtarget(), &pack);
    assert_eq!(bytes, [0x82, 0x2C]);
}

#[test]
fn vtarget_pack_missing_field_is_type_error() {
    let pack = record(&[("id", KlvValue::UInt(1))]);
    let err = IdPackFormat::vtarget().length_of(&pack, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_TYPE);
}

#[test]
fn vtarget_location_offsets_use_imap() {
    let traits = registry::global().unwrap().traits(Standard::St0903VTarget);
    let format = traits.by_tag(10).format();
    let bytes = encode_value(format, &KlvValue::Float(0.0));
    assert_eq!(bytes.len(), 3);
    assert_eq!(decode_value(format, &bytes), KlvValue::Float(0.0));
}

#[test]
fn fpa_index_pack() {
    let format = FpaIndexFormat::new().unwrap();
    let value = record(&[("row", KlvValue::UInt(2)), ("column", KlvValue::UInt(3))]);
    assert_eq!(encode_value(&format, &value), [0x02, 0x03]);
    assert_eq!(decode_value(&format, &[0x02, 0x03]), value);
    assert_eq!(format.print(&value, &ctx()), "{ row: 2, column: 3 }");
}

#[test]
fn algorithm_set_in_series() {
    let traits = registry::global().unwrap().traits(Standard::St0903);
    let format = traits.by_tag(102).format();
    let mut algorithm = LocalSet::new();
    algorithm
        .add(LdsKey(1), KlvValue::UInt(1))
        .add(LdsKey(2), KlvValue::String("knn".into()));
    let value = KlvValue::Series(vec![KlvValue::LocalSet(algorithm)]);
    let bytes = encode_value(format, &value);
    assert_eq!(bytes, [0x08, 0x01, 0x01, 0x01, 0x02, 0x03, b'k', b'n', b'n']);
    assert_eq!(decode_value(format, &bytes), value);
}

#[test]
fn ontology_set_keeps_unknown_tag() {
    let format = klv::set::LocalSetFormat::new(Standard::St0903Ontology);
    let bytes = [0x01, 0x01, 0x05, 0x03, 0x03, b'a', b'b', b'c', 0x63, 0x02, 0xAB, 0xCD];
    let value = decode_value(&format, &bytes);
    let set = value.as_local_set().unwrap();
    assert_eq!(set.find(&LdsKey(1)), Some(&KlvValue::UInt(5)));
    assert_eq!(set.find(&LdsKey(3)), Some(&KlvValue::String("abc".into())));
    assert_eq!(set.find(&LdsKey(99)), Some(&KlvValue::Blob(vec![0xAB, 0xCD])));
    assert_eq!(encode_value(&format, &value), bytes);
}

// ── ST1108 ───────────────────────────────────────────────────

#[test]
fn metric_period_pack() {
    let format = MetricPeriodPackFormat::new().unwrap();
    let value = record(&[("timestamp", KlvValue::UInt(0x0102)), ("offset", KlvValue::UInt(5))]);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0x01, 0x02, 0, 0, 0, 0x05]);
    assert_eq!(decode_value(&format, &bytes), value);
}

#[test]
fn window_corners_pack_uses_ber_oid() {
    let format = WindowCornersPackFormat::new().unwrap();
    let value = record(&[
        ("upper_left_row", KlvValue::UInt(1)),
        ("upper_left_column", KlvValue::UInt(2)),
        ("lower_right_row", KlvValue::UInt(200)),
        ("lower_right_column", KlvValue::UInt(3)),
    ]);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes, [0x01, 0x02, 0x81, 0x48, 0x03]);
    assert_eq!(decode_value(&format, &bytes), value);
    assert_eq!(
        format.print(&value, &ctx()),
        "{ Upper Left: ( 2, 1 ), Lower Right: ( 3, 200 ) }"
    );
}

#[test]
fn metric_implementer_splits_on_separator() {
    let format = MetricImplementerFormat::new();
    let value = record(&[
        ("organization", KlvValue::String("ORG".into())),
        ("subgroup", KlvValue::String("LAB".into())),
    ]);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes, b"ORG\x1eLAB");
    assert_eq!(decode_value(&format, &bytes), value);
}

#[test]
fn metric_implementer_without_separator() {
    let format = MetricImplementerFormat::new();
    let value = decode_value(&format, b"ORG");
    assert_eq!(value.field("organization"), Some(&KlvValue::String("ORG".into())));
    assert_eq!(value.field("subgroup"), Some(&KlvValue::Empty));
    assert_eq!(encode_value(&format, &value), b"ORG");

    let bare = record(&[
        ("organization", KlvValue::String("ORG".into())),
        ("subgroup", KlvValue::String(String::new())),
    ]);
    assert_eq!(encode_value(&format, &bare), b"ORG");
}

// ── ST0903 locations and tracks ──────────────────────────────

const LOCATION_PACK: &str = "01020304 10203040 0A0B 0102 0304 0506 1020 3040 5060";

#[test]
fn location_pack_with_sigma_and_rho() {
    let format = UncertainPackFormat::location();
    let bytes = hex(LOCATION_PACK);
    let value = decode_value(&format, &bytes);

    assert!((float_of(&value, "latitude") - -87.984282970428467).abs() < 1e-9);
    assert!((float_of(&value, "longitude") - -115.49705505371094).abs() < 1e-9);
    assert_eq!(float_of(&value, "altitude"), 1671.0);
    assert_eq!(
        value.field("sigma"),
        Some(&record(&[
            ("east", KlvValue::Float(8.0625)),
            ("north", KlvValue::Float(24.125)),
            ("up", KlvValue::Float(40.1875)),
        ]))
    );
    assert_eq!(
        value.field("rho"),
        Some(&record(&[
            ("east_north", KlvValue::Float(-0.748046875)),
            ("east_up", KlvValue::Float(-0.24609375)),
            ("north_up", KlvValue::Float(0.255859375)),
        ]))
    );
    assert_eq!(encode_value(&format, &value), bytes);
}

#[test]
fn location_pack_without_uncertainty() {
    let format = UncertainPackFormat::location();
    let bytes = hex("01020304 10203040 0A0B");
    let value = decode_value(&format, &bytes);
    assert_eq!(value.field("sigma"), Some(&KlvValue::Empty));
    assert_eq!(value.field("rho"), Some(&KlvValue::Empty));
    assert_eq!(encode_value(&format, &value), bytes);
}

#[test]
fn location_pack_drops_rho_without_sigma() {
    let format = UncertainPackFormat::location();
    let value = record(&[
        ("latitude", KlvValue::Float(0.0)),
        ("longitude", KlvValue::Float(0.0)),
        ("altitude", KlvValue::Float(0.0)),
        (
            "rho",
            record(&[
                ("east_north", KlvValue::Float(0.0)),
                ("east_up", KlvValue::Float(0.0)),
                ("north_up", KlvValue::Float(0.0)),
            ]),
        ),
    ]);
    assert_eq!(encode_value(&format, &value).len(), 10);
}

#[test]
fn velocity_pack_prints_present_fields() {
    let format = UncertainPackFormat::velocity();
    let value = decode_value(&format, &hex("1234 2334 4545"));
    assert_eq!(float_of(&value, "east"), -608.75);
    assert_eq!(float_of(&value, "north"), -336.75);
    assert_eq!(float_of(&value, "up"), 208.3125);
    assert_eq!(
        format.print(&value, &ctx()),
        "{ east: -608.75, north: -336.75, up: 208.3125 }"
    );
}

const VTRACKER_SET: &str = "
    01 10 F81D4FAE7DEC11D0A76500A0C91E6BF6
    02 01 02
    03 08 0003824430F6CE40
    04 08 0003824430F6CE40
    06 04 74657374
    07 01 32
    08 01 1B
    0A 06 1234 2334 4545
    0B 06 4234 4334 4545
    0C 01 03";

#[test]
fn vtracker_set_round_trips() {
    let format = LocalSetFormat::new(Standard::St0903VTracker);
    let bytes = hex(VTRACKER_SET);
    let value = decode_value(&format, &bytes);
    let set = value.as_local_set().unwrap();

    assert_eq!(set.find(&LdsKey(2)), Some(&KlvValue::UInt(2)));
    assert_eq!(set.find(&LdsKey(3)), Some(&KlvValue::UInt(987_654_321_000_000)));
    assert_eq!(set.find(&LdsKey(6)), Some(&KlvValue::String("test".into())));
    assert_eq!(set.find(&LdsKey(8)), Some(&KlvValue::UInt(27)));
    let acceleration = set.find(&LdsKey(11)).unwrap();
    assert_eq!(float_of(acceleration, "east"), 159.25);
    assert_eq!(float_of(acceleration, "north"), 175.25);
    assert_eq!(encode_value(&format, &value), bytes);
}

#[test]
fn vtrack_item_pack_holds_item_set() {
    let mut item = LocalSet::new();
    item.add(LdsKey(3), KlvValue::UInt(500));
    let pack = record(&[("id", KlvValue::UInt(7)), ("set", KlvValue::LocalSet(item))]);
    let format = IdPackFormat::vtrack_item();
    let bytes = encode_value(&format, &pack);
    assert_eq!(bytes[0], 0x07);
    assert_eq!(decode_value(&format, &bytes), pack);
}

// ── ST0806 ───────────────────────────────────────────────────

#[test]
fn user_data_type_and_id_share_a_byte() {
    let format = UserDataTypeIdFormat::new().unwrap();
    let value = decode_value(&format, &[0x41]);
    assert_eq!(value, record(&[("data_type", KlvValue::UInt(1)), ("id", KlvValue::UInt(1))]));
    assert_eq!(format.print(&value, &ctx()), "{ type: Signed Integer, value: 1 }");
    assert_eq!(encode_value(&format, &value), [0x41]);

    let too_large = record(&[("data_type", KlvValue::UInt(0)), ("id", KlvValue::UInt(64))]);
    let err = format.write(&too_large, &mut Vec::new(), 1, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_OVERFLOW);
}

#[test]
fn st0806_set_inside_st0601() {
    let mut user_data = LocalSet::new();
    user_data
        .add(LdsKey(1), record(&[("data_type", KlvValue::UInt(0)), ("id", KlvValue::UInt(2))]))
        .add(LdsKey(2), KlvValue::Blob(b"ABC".to_vec()));
    let mut rvt = LocalSet::new();
    rvt.add(LdsKey(14), KlvValue::UInt(5))
        .add(LdsKey(11), KlvValue::LocalSet(user_data));
    let mut set = LocalSet::new();
    set.add(LdsKey(73), KlvValue::LocalSet(rvt));

    let format = LocalSetFormat::new(Standard::St0601);
    let value = KlvValue::LocalSet(set);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes, hex("49 0D 0E0105 0B08 010102 0203414243"));
    assert_eq!(decode_value(&format, &bytes), value);
}

// ── ST1204 ───────────────────────────────────────────────────

const SENSOR_UUID: [u8; 16] = [
    0xF8, 0x1D, 0x4F, 0xAE, 0x7D, 0xEC, 0x11, 0xD0, 0xA7, 0x65, 0x00, 0xA0, 0xC9, 0x1E, 0x6B, 0xF6,
];

#[test]
fn miis_id_with_sensor_only() {
    let format = MiisIdFormat::new().unwrap();
    let value = sensor_miis_id(1, SENSOR_UUID);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes[..2], [0x01, 0x60]);
    assert_eq!(bytes[2..], SENSOR_UUID);
    assert_eq!(decode_value(&format, &bytes), value);
}

#[test]
fn miis_id_with_window_and_minor() {
    let format = MiisIdFormat::new().unwrap();
    let mut bytes = vec![0x01, 0x0E];
    for fill in [0x11, 0x22, 0x33] {
        bytes.extend([fill; 16]);
    }
    let value = decode_value(&format, &bytes);
    assert_eq!(value.field("sensor_id_type"), Some(&KlvValue::UInt(0)));
    assert_eq!(value.field("platform_id_type"), Some(&KlvValue::UInt(1)));
    assert_eq!(value.field("sensor_id"), Some(&KlvValue::Empty));
    assert_eq!(value.field("platform_id"), Some(&KlvValue::Blob(vec![0x11; 16])));
    assert_eq!(value.field("minor_id"), Some(&KlvValue::Blob(vec![0x33; 16])));
    assert_eq!(encode_value(&format, &value), bytes);
}

#[test]
fn miis_id_type_without_id_is_rejected() {
    let format = MiisIdFormat::new().unwrap();
    let value = record(&[
        ("version", KlvValue::UInt(1)),
        ("sensor_id_type", KlvValue::UInt(2)),
        ("platform_id_type", KlvValue::UInt(0)),
    ]);
    let err = format.write(&value, &mut Vec::new(), 2, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

// ── ST1002 ───────────────────────────────────────────────────

#[test]
fn range_image_enumerations() {
    let format = EnumerationsFormat::new().unwrap();
    let value = record(&[
        ("compression_method", KlvValue::UInt(1)),
        ("data_type", KlvValue::UInt(0)),
        ("source", KlvValue::UInt(1)),
    ]);
    assert_eq!(encode_value(&format, &value), [0x41]);
    assert_eq!(decode_value(&format, &[0x41]), value);
    assert_eq!(
        format.print(&value, &ctx()),
        "{ compression method: Planar Fit, data type: Perspective Range Image, source: Range Sensor }"
    );

    let bad = record(&[
        ("compression_method", KlvValue::UInt(0)),
        ("data_type", KlvValue::UInt(0)),
        ("source", KlvValue::UInt(2)),
    ]);
    let err = format.write(&bad, &mut Vec::new(), 1, &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_OVERFLOW);
}

fn measurements() -> KlvValue {
    let elements = vec![KlvValue::Float(1.0), KlvValue::Float(2.0)];
    Mdap::natural(vec![2], elements, 4).to_value()
}

#[test]
fn section_pack_with_empty_uncertainty_and_one_plane() {
    let format = SectionDataPackFormat::new().unwrap();
    let value = record(&[
        ("section_x", KlvValue::UInt(1)),
        ("section_y", KlvValue::UInt(2)),
        ("measurements", measurements()),
        ("uncertainty", KlvValue::Empty),
        ("plane_x_scale", KlvValue::Float(1.5)),
        ("plane_y_scale", KlvValue::Empty),
        ("plane_constant", KlvValue::Empty),
    ]);
    let bytes = encode_value(&format, &value);
    assert_eq!(
        bytes,
        hex("0101 0102 0C 01020401 3F800000 40000000 00 08 3FF8000000000000")
    );
    assert_eq!(decode_value(&format, &bytes), value);
}

#[test]
fn section_pack_stops_after_measurements() {
    let format = SectionDataPackFormat::new().unwrap();
    let value = record(&[
        ("section_x", KlvValue::UInt(3)),
        ("section_y", KlvValue::UInt(4)),
        ("measurements", measurements()),
    ]);
    let bytes = encode_value(&format, &value);
    assert_eq!(bytes.len(), 17);
    let decoded = decode_value(&format, &bytes);
    assert_eq!(decoded.field("uncertainty"), Some(&KlvValue::Empty));
    assert_eq!(decoded.field("plane_constant"), Some(&KlvValue::Empty));
    assert_eq!(encode_value(&format, &decoded), bytes);
}

// ── ST1202 ───────────────────────────────────────────────────

const ST1202_SET: &str = "01 04 3F800000 02 04 40000000 09 0C 02 42 3F000000 3E800000 6000";

fn st1202() -> LocalSetFormat {
    LocalSetFormat::new(Standard::St1202)
}

#[test]
fn sdcc_binds_to_preceding_entries() {
    let bytes = hex(ST1202_SET);
    let value = decode_value(&st1202(), &bytes);
    let set = value.as_local_set().unwrap();
    assert_eq!(
        set.find(&LdsKey(9)),
        Some(&sdcc_value(&[1, 2], &[0.5, 0.25], &[0.5], 4, 2))
    );
    assert_eq!(encode_value(&st1202(), &value), bytes);
}

#[test]
fn sdcc_members_are_written_first() {
    let mut set = LocalSet::new();
    set.add(LdsKey(9), sdcc_value(&[1, 2], &[0.5, 0.25], &[0.5], 4, 2))
        .add(LdsKey(2), KlvValue::Float(2.0))
        .add(LdsKey(1), KlvValue::Float(1.0));
    let bytes = encode_value(&st1202(), &KlvValue::LocalSet(set));
    assert_eq!(bytes, hex(ST1202_SET));
}

#[test]
fn sdcc_describing_missing_entry_is_rejected() {
    let mut set = LocalSet::new();
    set.add(LdsKey(1), KlvValue::Float(1.0))
        .add(LdsKey(9), sdcc_value(&[1, 3], &[0.5, 0.25], &[0.5], 4, 2));
    let err = st1202().length_of(&KlvValue::LocalSet(set), &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn entry_described_twice_is_rejected() {
    let mut set = LocalSet::new();
    set.add(LdsKey(1), KlvValue::Float(1.0))
        .add(LdsKey(9), sdcc_value(&[1], &[0.5], &[], 4, 0))
        .add(LdsKey(9), sdcc_value(&[1], &[0.25], &[], 4, 0));
    let err = st1202().length_of(&KlvValue::LocalSet(set), &ctx()).unwrap_err();
    assert_eq!(err.code, ERR_FORMAT);
}

#[test]
fn unbound_sdcc_keeps_bytes() {
    let bytes = hex("09 06 01 40 3F000000");
    let value = decode_value(&st1202(), &bytes);
    let set = value.as_local_set().unwrap();
    assert_eq!(set.find(&LdsKey(9)), Some(&KlvValue::Blob(hex("01 40 3F000000"))));
}

// ── ST1206 ───────────────────────────────────────────────────

const ST1206_SET: &str = "
    01 02 4000
    03 01 01
    04 01 00
    09 02 02D0
    0A 02 0438
    0F 04 00001000
    16 1D 02 04 02 02 02 00000000 49742400 0100 0200 0300 0400 0500 0600 0700 0800
    17 08 1234567800000000
    1C 01 01";

#[test]
fn st1206_set_round_trips() {
    let format = LocalSetFormat::new(Standard::St1206);
    let bytes = hex(ST1206_SET);
    let value = decode_value(&format, &bytes);
    let set = value.as_local_set().unwrap();

    assert_eq!(set.find(&LdsKey(1)), Some(&KlvValue::Float(64.0)));
    assert_eq!(set.find(&LdsKey(3)), Some(&KlvValue::UInt(1)));
    assert_eq!(set.find(&LdsKey(9)), Some(&KlvValue::UInt(720)));
    assert_eq!(set.find(&LdsKey(15)), Some(&KlvValue::UInt(4096)));
    let resolution: Vec<_> = (1..=8).map(|i| KlvValue::Float(8192.0 * f64::from(i))).collect();
    assert_eq!(
        Mdap::from_value(set.find(&LdsKey(22)).unwrap()).unwrap(),
        Mdap::imap(vec![4, 2], resolution, 2, 0.0, 1.0e6)
    );
    assert_eq!(encode_value(&format, &value), bytes);
}
