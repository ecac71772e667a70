//! Primitive codec tests: cursors, integers, BER lengths, BER-OID values,
//! floats and blobs.

use klv::read_write::*;
use klv::*;

// ── Cursor ───────────────────────────────────────────────────

#[test]
fn cursor_take_advances_exactly() {
    let data = [1, 2, 3, 4];
    let mut cur = Cursor::new(&data);
    assert_eq!(cur.take(3).unwrap(), &[1, 2, 3]);
    assert_eq!(cur.position(), 3);
    assert_eq!(cur.remaining(), 1);
}

#[test]
fn cursor_take_past_end_leaves_cursor() {
    let data = [1, 2];
    let mut cur = Cursor::new(&data);
    let err = cur.take(3).unwrap_err();
    assert_eq!(err.code, ERR_LENGTH);
    assert_eq!(cur.position(), 0);
}

#[test]
fn sub_cursor_reports_absolute_offsets() {
    let data = [0, 0, 0, 0xAA, 0xBB];
    let mut cur = Cursor::new(&data);
    cur.skip(3).unwrap();
    let mut sub = cur.sub(2).unwrap();
    assert_eq!(sub.position(), 3);
    sub.read_u8().unwrap();
    assert_eq!(sub.position(), 4);
    assert_eq!(sub.consumed(), 1);
    assert!(cur.is_empty());
}

// ── Integers ─────────────────────────────────────────────────

#[test]
fn int_round_trip_widths() {
    let mut out = Vec::new();
    write_int(0x1234, &mut out, 4).unwrap();
    assert_eq!(out, [0x00, 0x00, 0x12, 0x34]);
    assert_eq!(read_int(&mut Cursor::new(&out), 4).unwrap(), 0x1234);
}

#[test]
fn int_too_wide_for_length_overflows() {
    let mut out = Vec::new();
    assert_eq!(write_int(0x1_0000, &mut out, 2).unwrap_err().code, ERR_OVERFLOW);
    assert!(out.is_empty());
}

#[test]
fn int_width_outside_one_to_eight_overflows() {
    let data = [0u8; 9];
    assert_eq!(read_int(&mut Cursor::new(&data), 9).unwrap_err().code, ERR_OVERFLOW);
    assert_eq!(read_int(&mut Cursor::new(&data), 0).unwrap_err().code, ERR_OVERFLOW);
}

#[test]
fn int_length_minimum_one() {
    assert_eq!(int_length(0), 1);
    assert_eq!(int_length(0xFF), 1);
    assert_eq!(int_length(0x100), 2);
    assert_eq!(int_length(u64::MAX), 8);
}

#[test]
fn sint_sign_extends() {
    let data = [0xFF, 0xFE];
    assert_eq!(read_sint(&mut Cursor::new(&data), 2).unwrap(), -2);
    let data = [0x7F, 0xFF];
    assert_eq!(read_sint(&mut Cursor::new(&data), 2).unwrap(), 0x7FFF);
}

#[test]
fn sint_length_includes_sign_bit() {
    assert_eq!(sint_length(127), 1);
    assert_eq!(sint_length(128), 2);
    assert_eq!(sint_length(-128), 1);
    assert_eq!(sint_length(-129), 2);
}

#[test]
fn sint_write_negative() {
    let mut out = Vec::new();
    write_sint(-1, &mut out, 3).unwrap();
    assert_eq!(out, [0xFF, 0xFF, 0xFF]);
    assert_eq!(write_sint(200, &mut Vec::new(), 1).unwrap_err().code, ERR_OVERFLOW);
}

// ── BER lengths ──────────────────────────────────────────────

#[test]
fn ber_short_form() {
    let mut out = Vec::new();
    write_ber(0x7F, &mut out);
    assert_eq!(out, [0x7F]);
    assert_eq!(ber_length(0x7F), 1);
}

#[test]
fn ber_long_form() {
    let mut out = Vec::new();
    write_ber(0x80, &mut out);
    assert_eq!(out, [0x81, 0x80]);
    out.clear();
    write_ber(0x1234, &mut out);
    assert_eq!(out, [0x82, 0x12, 0x34]);
    assert_eq!(ber_length(0x1234), 3);
    assert_eq!(read_ber(&mut Cursor::new(&out)).unwrap(), 0x1234);
}

#[test]
fn ber_zero_count_is_format_error() {
    let data = [0x80];
    let mut cur = Cursor::new(&data);
    assert_eq!(read_ber(&mut cur).unwrap_err().code, ERR_FORMAT);
    assert_eq!(cur.position(), 0);
}

#[test]
fn ber_count_above_eight_is_format_error() {
    let data = [0x89, 0, 0, 0, 0, 0, 0, 0, 0, 1];
    assert_eq!(read_ber(&mut Cursor::new(&data)).unwrap_err().code, ERR_FORMAT);
}

#[test]
fn ber_truncated_long_form_restores_cursor() {
    let data = [0x82, 0x01];
    let mut cur = Cursor::new(&data);
    assert_eq!(read_ber(&mut cur).unwrap_err().code, ERR_LENGTH);
    assert_eq!(cur.position(), 0);
}

// ── BER-OID ──────────────────────────────────────────────────

#[test]
fn ber_oid_single_and_multi_byte() {
    let mut out = Vec::new();
    write_ber_oid(0x7F, &mut out).unwrap();
    assert_eq!(out, [0x7F]);
    out.clear();
    write_ber_oid(0x80, &mut out).unwrap();
    assert_eq!(out, [0x81, 0x00]);
    assert_eq!(ber_oid_length(0x80), 2);
    assert_eq!(read_ber_oid(&mut Cursor::new(&out)).unwrap(), 0x80);
}

#[test]
fn ber_oid_unterminated_short_buffer_is_length_error() {
    let data = [0x81, 0x82];
    assert_eq!(read_ber_oid(&mut Cursor::new(&data)).unwrap_err().code, ERR_LENGTH);
}

#[test]
fn ber_oid_unterminated_after_eight_bytes_is_format_error() {
    let data = [0xFF; 9];
    assert_eq!(read_ber_oid(&mut Cursor::new(&data)).unwrap_err().code, ERR_FORMAT);
}

#[test]
fn ber_oid_too_large_overflows() {
    assert_eq!(write_ber_oid(u64::MAX, &mut Vec::new()).unwrap_err().code, ERR_OVERFLOW);
}

// ── Floats and booleans ──────────────────────────────────────

#[test]
fn float_four_and_eight_bytes() {
    let mut out = Vec::new();
    write_float(1.5, &mut out, 4).unwrap();
    assert_eq!(out, [0x3F, 0xC0, 0x00, 0x00]);
    assert_eq!(read_float(&mut Cursor::new(&out), 4).unwrap(), 1.5);

    out.clear();
    write_float(-2.25, &mut out, 8).unwrap();
    assert_eq!(read_float(&mut Cursor::new(&out), 8).unwrap(), -2.25);
}

#[test]
fn float_other_width_is_format_error() {
    assert_eq!(write_float(1.0, &mut Vec::new(), 2).unwrap_err().code, ERR_FORMAT);
    let data = [0u8; 3];
    assert_eq!(read_float(&mut Cursor::new(&data), 3).unwrap_err().code, ERR_FORMAT);
}

#[test]
fn float_narrowing_overflow() {
    assert_eq!(write_float(1e300, &mut Vec::new(), 4).unwrap_err().code, ERR_OVERFLOW);
}

#[test]
fn bool_any_nonzero_is_true() {
    let data = [0x00, 0x02];
    let mut cur = Cursor::new(&data);
    assert!(!read_bool(&mut cur).unwrap());
    assert!(read_bool(&mut cur).unwrap());
}

// ── Blobs ────────────────────────────────────────────────────

#[test]
fn blob_round_trips_and_advances_exactly() {
    let cases: [&[u8]; 4] = [&[], &[0x00], &[0xFF, 0xFF], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]];
    for bytes in cases {
        let mut out = Vec::new();
        write_blob(bytes, &mut out);
        out.push(0xEE);
        let mut cur = Cursor::new(&out);
        assert_eq!(read_blob(&mut cur, bytes.len()).unwrap(), bytes);
        assert_eq!(cur.position(), bytes.len());
        assert_eq!(cur.rest(), &[0xEE]);
    }
}
