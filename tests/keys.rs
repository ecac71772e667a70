use std::collections::HashSet;

use klv::key::*;
use klv::*;

const KEY: &str = "060E2B34.020B0101.0E010301.01000000";

// ── Local keys ───────────────────────────────────────────────

#[test]
fn lds_key_uses_ber_oid() {
    let mut out = Vec::new();
    write_lds_key(LdsKey(200), &mut out).unwrap();
    assert_eq!(out, [0x81, 0x48]);
    assert_eq!(lds_key_length(LdsKey(200)), 2);
    assert_eq!(read_lds_key(&mut Cursor::new(&out)).unwrap(), LdsKey(200));
}

#[test]
fn lds_key_widths_up_to_eight_bytes() {
    for width in 1..=8u32 {
        let largest = (1u64 << (7 * width)) - 1;
        let mut out = Vec::new();
        write_lds_key(LdsKey(largest), &mut out).unwrap();
        assert_eq!(out.len(), width as usize);
        assert_eq!(lds_key_length(LdsKey(largest)), width as usize);
        assert_eq!(read_lds_key(&mut Cursor::new(&out)).unwrap(), LdsKey(largest));
        if width < 8 {
            assert_eq!(lds_key_length(LdsKey(largest + 1)), width as usize + 1);
        }
    }
}

#[test]
fn lds_key_of_two_to_the_56_overflows() {
    let mut out = Vec::new();
    assert_eq!(write_lds_key(LdsKey(1 << 56), &mut out).unwrap_err().code, ERR_OVERFLOW);
    assert!(out.is_empty());
    write_lds_key(LdsKey((1 << 56) - 1), &mut out).unwrap();
    assert_eq!(out, [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F]);
}

// ── Universal keys ───────────────────────────────────────────

#[test]
fn uds_key_prints_dotted_hex() {
    let key: UdsKey = KEY.parse().unwrap();
    assert_eq!(key.to_string(), KEY);
    assert_eq!(key, registry::ST0601_KEY);
}

#[test]
fn uds_key_parses_ungrouped_hex() {
    let key: UdsKey = "060e2b34020b01010e01030101000000".parse().unwrap();
    assert_eq!(key.to_string(), KEY);
}

#[test]
fn uds_key_parse_rejects_bad_input() {
    assert_eq!("060E2B34".parse::<UdsKey>().unwrap_err().code, ERR_FORMAT);
    assert_eq!(
        "ZZ0E2B34.020B0101.0E010301.01000000".parse::<UdsKey>().unwrap_err().code,
        ERR_FORMAT
    );
}

#[test]
fn uds_key_ignores_version_byte() {
    let a: UdsKey = "060E2B34.020B0101.0E010301.01000000".parse().unwrap();
    let b: UdsKey = "060E2B34.020B0107.0E010301.01000000".parse().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(set.contains(&b));
}

#[test]
fn uds_key_orders_by_significant_bytes() {
    let a: UdsKey = "060E2B34.020B0101.0E010301.01000000".parse().unwrap();
    let b: UdsKey = "060E2B34.020B0101.0E010302.01000000".parse().unwrap();
    assert!(a < b);
}

#[test]
fn uds_key_validity() {
    assert!(registry::ST0601_KEY.is_valid());
    assert_eq!(registry::ST0601_KEY.category(), UdsCategory::Group);

    let no_prefix: UdsKey = "070E2B34.020B0101.0E010301.01000000".parse().unwrap();
    assert!(!no_prefix.has_prefix());
    assert!(!no_prefix.is_valid());

    let high_bit: UdsKey = "060E2B34.820B0101.0E010301.01000000".parse().unwrap();
    assert!(!high_bit.is_valid());

    let bad_category: UdsKey = "060E2B34.090B0101.0E010301.01000000".parse().unwrap();
    assert_eq!(bad_category.category(), UdsCategory::Invalid);
    assert!(!bad_category.is_valid());
}

#[test]
fn uds_key_read_write() {
    let mut out = Vec::new();
    write_uds_key(&registry::ST0903_KEY, &mut out);
    assert_eq!(out.len(), 16);
    assert_eq!(uds_key_length(&registry::ST0903_KEY), 16);
    assert_eq!(read_uds_key(&mut Cursor::new(&out)).unwrap(), registry::ST0903_KEY);
}

#[test]
fn uds_key_short_buffer() {
    let data = [0x06, 0x0E, 0x2B, 0x34];
    assert_eq!(read_uds_key(&mut Cursor::new(&data)).unwrap_err().code, ERR_LENGTH);
}
