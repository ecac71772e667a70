use klv::packet::*;
use klv::registry::{ST0104_KEY, ST0601_KEY, ST0806_KEY, ST1108_KEY};
use klv::standards::st0104::USER_DEFINED_TIMESTAMP_KEY;
use klv::*;

const ST0601_PACKET: &str = "060e2b34020b01010e010301010000001c0208000459f4a6aa4aa803094d495353494f4e303141011101022f08";

fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).unwrap())
        .collect()
}

fn reg() -> &'static Registry {
    registry::global().unwrap()
}

fn st0601_packet() -> Packet {
    let mut set = LocalSet::new();
    set.add(LdsKey(2), KlvValue::UInt(0x0004_59F4_A6AA_4AA8))
        .add(LdsKey(3), KlvValue::String("MISSION01".into()))
        .add(LdsKey(65), KlvValue::UInt(17));
    Packet::new(ST0601_KEY, KlvValue::LocalSet(set))
}

// ── Encoding ─────────────────────────────────────────────────

#[test]
fn encode_st0601_appends_running_sum() {
    let bytes = encode(&st0601_packet()).unwrap();
    assert_eq!(bytes, hex(ST0601_PACKET));
    assert_eq!(&bytes[bytes.len() - 4..], [0x01, 0x02, 0x2F, 0x08]);
}

#[test]
fn packet_length_counts_trailer() {
    let packet = st0601_packet();
    assert_eq!(packet_length(&packet, reg()).unwrap(), 45);
    assert_eq!(packet_length(&packet, reg()).unwrap(), encode(&packet).unwrap().len());
}

#[test]
fn encode_failure_leaves_output_untouched() {
    let packet = Packet::new(ST0601_KEY, KlvValue::UInt(1));
    let mut out = vec![0xAA];
    let err = write_packet(&packet, &mut out, reg()).unwrap_err();
    assert_eq!(err.code, ERR_TYPE);
    assert_eq!(out, [0xAA]);
}

// ── Decoding ─────────────────────────────────────────────────

#[test]
fn decode_st0601_with_valid_checksum() {
    let packet = decode(&hex(ST0601_PACKET)).unwrap();
    assert_eq!(packet.checksum, ChecksumStatus::Valid);
    assert_eq!(packet, st0601_packet());
    assert!(!packet.value.as_local_set().unwrap().has(&LdsKey(1)));
}

#[test]
fn decode_corrupted_packet_reports_mismatch() {
    let mut bytes = hex(ST0601_PACKET);
    // Tag 65 value sits at an even offset, the high byte of its word.
    bytes[40] = 0x12;
    let packet = decode(&bytes).unwrap();
    assert_eq!(
        packet.checksum,
        ChecksumStatus::Mismatch {
            stored: 0x2F08,
            computed: 0x3008
        }
    );
    let set = packet.value.as_local_set().unwrap();
    assert_eq!(set.find(&LdsKey(65)), Some(&KlvValue::UInt(18)));
}

#[test]
fn decode_skips_leading_bytes() {
    let mut bytes = vec![0x00, 0x47, 0x06];
    bytes.extend(hex(ST0601_PACKET));
    let mut cur = Cursor::new(&bytes);
    let packet = read_packet(&mut cur, reg()).unwrap();
    assert_eq!(packet, st0601_packet());
    assert!(cur.is_empty());
}

#[test]
fn decode_truncated_packet_keeps_cursor() {
    let bytes = hex(ST0601_PACKET);
    let mut cur = Cursor::new(&bytes[..30]);
    assert_eq!(read_packet(&mut cur, reg()).unwrap_err().code, ERR_LENGTH);
    assert_eq!(cur.position(), 0);
}

#[test]
fn decode_many_with_trailing_garbage() {
    let mut bytes = hex(ST0601_PACKET);
    bytes.extend(hex(ST0601_PACKET));
    bytes.extend_from_slice(&[0x00, 0x01]);
    let packets = read_packets(&bytes, reg()).unwrap();
    assert_eq!(packets.len(), 2);
    assert!(packets.iter().all(|p| p.checksum == ChecksumStatus::Valid));
}

#[test]
fn st1108_round_trip_with_crc() {
    let mut set = LocalSet::new();
    set.add(
        LdsKey(2),
        KlvValue::Record(vec![
            ("timestamp".into(), KlvValue::UInt(1_000_000)),
            ("offset".into(), KlvValue::UInt(33_000)),
        ]),
    );
    let packet = Packet::new(ST1108_KEY, KlvValue::LocalSet(set));
    let bytes = encode(&packet).unwrap();
    assert_eq!(&bytes[bytes.len() - 4..bytes.len() - 2], [0x0B, 0x02]);

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.checksum, ChecksumStatus::Valid);
    assert_eq!(decoded, packet);
    assert_eq!(packet_timestamp(&decoded), Some(1_000_000));
}

fn st0806_packet() -> Packet {
    let mut user_data = LocalSet::new();
    user_data
        .add(
            LdsKey(1),
            KlvValue::Record(vec![
                ("data_type".into(), KlvValue::UInt(1)),
                ("id".into(), KlvValue::UInt(1)),
            ]),
        )
        .add(LdsKey(2), KlvValue::Blob(b"TEST".to_vec()));
    let mut set = LocalSet::new();
    set.add(LdsKey(2), KlvValue::UInt(0x100))
        .add(LdsKey(3), KlvValue::UInt(500))
        .add(LdsKey(11), KlvValue::LocalSet(user_data));
    Packet::new(ST0806_KEY, KlvValue::LocalSet(set))
}

#[test]
fn st0806_round_trip_with_crc_32() {
    let packet = st0806_packet();
    let bytes = encode(&packet).unwrap();
    let body = hex("02080000000000000100030201F40B090101410204544553540104");
    assert_eq!(&bytes[..16], ST0806_KEY.bytes());
    assert_eq!(bytes[16], 0x1F);
    assert_eq!(&bytes[17..bytes.len() - 4], body.as_slice());

    let decoded = decode(&bytes).unwrap();
    assert_eq!(decoded.checksum, ChecksumStatus::Valid);
    assert_eq!(decoded, packet);
    assert_eq!(packet_timestamp(&decoded), Some(0x100));
}

#[test]
fn st0806_corrupted_timestamp_fails_crc() {
    let mut bytes = encode(&st0806_packet()).unwrap();
    bytes[26] ^= 0x01;
    let packet = decode(&bytes).unwrap();
    assert!(matches!(packet.checksum, ChecksumStatus::Mismatch { .. }));
    assert_eq!(packet_timestamp(&packet), Some(0x101));
}

// Non-minimal widths and an IMAP marker, with no checksum trailer.
const WIDE_FIELDS: [u8; 20] = [
    0x41, 0x01, 0x11, // version 17
    0x6E, 0x04, 0x00, 0x00, 0x00, 0x05, // time airborne, 4-byte uint
    0x60, 0x05, 0x00, 0x12, 0x34, 0x56, 0x78, // target width, 5-byte IMAP
    0x67, 0x02, 0xE0, 0x00, // density altitude, below minimum
];

#[test]
fn reencode_keeps_decoded_widths_and_imap_markers() {
    let mut input = ST0601_KEY.bytes().to_vec();
    input.push(WIDE_FIELDS.len() as u8);
    input.extend_from_slice(&WIDE_FIELDS);
    let packet = decode(&input).unwrap();
    assert_eq!(packet.checksum, ChecksumStatus::Absent);
    let set = packet.value.as_local_set().unwrap();
    assert_eq!(set.find(&LdsKey(110)), Some(&KlvValue::UInt(5)));
    assert_eq!(set.find(&LdsKey(103)), Some(&KlvValue::Imap(klv::imap::Imap::BelowMinimum)));

    let encoded = encode(&packet).unwrap();
    let mut expected = ST0601_KEY.bytes().to_vec();
    expected.push(WIDE_FIELDS.len() as u8 + 4);
    expected.extend_from_slice(&WIDE_FIELDS);
    expected.extend_from_slice(&[0x01, 0x02]);
    assert_eq!(&encoded[..encoded.len() - 2], expected.as_slice());
    assert_eq!(packet_length(&packet, reg()).unwrap(), encoded.len());

    let again = decode(&encoded).unwrap();
    assert_eq!(again.checksum, ChecksumStatus::Valid);
    assert_eq!(encode(&again).unwrap(), encoded);
}

#[test]
fn edited_field_falls_back_to_natural_width() {
    let mut input = ST0601_KEY.bytes().to_vec();
    input.push(WIDE_FIELDS.len() as u8);
    input.extend_from_slice(&WIDE_FIELDS);
    let mut packet = decode(&input).unwrap();
    let KlvValue::LocalSet(set) = &mut packet.value else {
        panic!("not a local set");
    };
    *set.find_mut(&LdsKey(110)).unwrap() = KlvValue::UInt(6);

    let encoded = encode(&packet).unwrap();
    let body = &encoded[17..];
    assert_eq!(&body[3..6], [0x6E, 0x01, 0x06]);
}

// ── Timestamps ───────────────────────────────────────────────

#[test]
fn st0601_timestamp_is_tag_2() {
    assert_eq!(packet_timestamp(&st0601_packet()), Some(0x0004_59F4_A6AA_4AA8));
    let empty = Packet::new(ST0601_KEY, KlvValue::LocalSet(LocalSet::new()));
    assert_eq!(packet_timestamp(&empty), None);
}

#[test]
fn st0104_timestamp_is_user_defined_timestamp() {
    let mut set = UniversalSet::new();
    set.add(USER_DEFINED_TIMESTAMP_KEY, KlvValue::UInt(42));
    let packet = Packet::new(ST0104_KEY, KlvValue::UniversalSet(set));
    assert_eq!(packet_timestamp(&packet), Some(42));
}

#[test]
fn unknown_packet_has_no_timestamp() {
    let key = UdsKey::from_words(0x060E2B34_02010101, 0x0F000000_00000000);
    assert_eq!(packet_timestamp(&Packet::new(key, KlvValue::Blob(vec![1]))), None);
}

#[test]
fn timestamp_order_puts_unknown_last() {
    use std::cmp::Ordering;
    let unknown = Timestamp::default();
    assert_eq!(Timestamp::new(1, 9).order(&Timestamp::new(2, 0)), Ordering::Less);
    assert_eq!(Timestamp::new(1, 2).order(&Timestamp::new(1, 1)), Ordering::Greater);
    assert_eq!(Timestamp::new(5, 5).order(&unknown), Ordering::Less);
    assert_eq!(unknown.order(&unknown), Ordering::Equal);
}

// ── Streams ──────────────────────────────────────────────────

fn mission(id: &str) -> Packet {
    let mut set = LocalSet::new();
    set.add(LdsKey(3), KlvValue::String(id.into()));
    Packet::new(ST0601_KEY, KlvValue::LocalSet(set))
}

#[test]
fn sync_stream_delivers_due_packets_in_time_order() {
    let mut stream = KlvStream::new(StreamSettings {
        kind: StreamKind::Sync,
        index: 3,
    });
    stream.push(mission("A"), Timestamp::new(200, 1));
    stream.push(mission("B"), Timestamp::new(100, 1));
    stream.push(mission("C"), Timestamp::new(300, 5));
    stream.push(mission("D"), Timestamp::default());

    let due = stream.deliver(1);
    let ids: Vec<_> = due
        .iter()
        .map(|p| p.packet.value.as_local_set().unwrap().find(&LdsKey(3)).unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["B", "A", "D"]);
    assert!(due.iter().all(|p| p.stream_index == 3));
    assert_eq!(stream.pending().len(), 1);
    assert_eq!(stream.deliver(5).len(), 1);
    assert!(stream.pending().is_empty());
}

#[test]
fn async_stream_delivers_everything_in_arrival_order() {
    let mut stream = KlvStream::new(StreamSettings {
        kind: StreamKind::Async,
        index: 0,
    });
    stream.push(mission("late"), Timestamp::new(900, 9));
    stream.push(mission("early"), Timestamp::new(100, 1));
    let due = stream.deliver(0);
    assert_eq!(due.len(), 2);
    assert_eq!(due[0].packet, mission("late"));
    assert!(stream.pending().is_empty());
}

#[test]
fn stream_push_bytes_decodes_packets() {
    let mut stream = KlvStream::default();
    let mut bytes = hex(ST0601_PACKET);
    bytes.extend(hex(ST0601_PACKET));
    assert_eq!(stream.push_bytes(&bytes, Timestamp::new(0, 0), reg()).unwrap(), 2);
    assert_eq!(stream.pending().len(), 2);
    assert_eq!(stream.settings().kind, StreamKind::Sync);
}

// ── Printing ─────────────────────────────────────────────────

#[test]
fn packet_prints_with_names() {
    assert_eq!(
        mission("M1").print(reg()),
        "{ MISB ST 0601 Local Set: { Mission ID: \"M1\" } }"
    );
}
