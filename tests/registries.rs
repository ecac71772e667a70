use klv::format::BlobFormat;
use klv::checksum::ChecksumAlgorithm;
use klv::registry::{ST0601_KEY, ST0806_KEY, ST0903_KEY, ST0903_VTRACK_KEY, ST1002_KEY, ST1601_KEY};
use klv::*;

// ── Standards ────────────────────────────────────────────────

#[test]
fn standard_names_round_trip() {
    for standard in Standard::ALL {
        assert_eq!(Standard::from_name(standard.name()), Some(standard));
    }
    assert_eq!(Standard::St0903VTarget.to_string(), "ST0903 VTarget");
    assert_eq!(Standard::from_name("ST9999"), None);
}

#[test]
fn every_standard_has_a_table() {
    let registry = Registry::new().unwrap();
    for standard in Standard::ALL {
        let table = registry.traits(standard);
        assert!(!table.is_empty(), "{standard} table is empty");
        assert!(table.iter().all(|t| t.tag() != 0));
    }
}

// ── Lookups ──────────────────────────────────────────────────

#[test]
fn lookup_known_tag() {
    let traits = lookup_tag(Standard::St0601, 2).unwrap();
    assert_eq!(traits.name(), "Precision Timestamp");
    assert_eq!(traits.enum_name(), "KLV_0601_PRECISION_TIMESTAMP");
    assert_eq!(traits.tag_count(), TagCount::Exact(1));
}

#[test]
fn lookup_unknown_tag_returns_sentinel() {
    let traits = lookup_tag(Standard::St0601, 9999).unwrap();
    assert_eq!(traits.name(), "Unknown Tag");
    assert_eq!(traits.enum_name(), "KLV_0601_UNKNOWN");
    assert_eq!(traits.tag_count(), TagCount::ANY);
}

#[test]
fn lookup_by_name_and_enum_name() {
    let table = registry::global().unwrap().traits(Standard::St0601);
    assert_eq!(table.by_name("Mission ID").tag(), 3);
    assert_eq!(table.by_enum_name("KLV_0601_MISSION_ID").tag(), 3);
    assert_eq!(table.by_name("No Such Tag").enum_name(), "KLV_0601_UNKNOWN");
    assert_eq!(table.name(), "ST0601");
}

#[test]
fn lookup_universal_key() {
    let key = klv::standards::st0104::USER_DEFINED_TIMESTAMP_KEY;
    let traits = lookup_uds(Standard::St0104, &key).unwrap();
    assert_eq!(traits.name(), "User Defined Timestamp");
    assert_eq!(traits.key(), Some(&key));
}

#[test]
fn packet_table_maps_keys_to_sets() {
    let packets = registry::global().unwrap().packets();
    assert_eq!(packets.by_uds_key(&ST0601_KEY).subset(), Some(Standard::St0601));
    assert_eq!(packets.by_uds_key(&ST0903_KEY).subset(), Some(Standard::St0903));
    assert!(packets.by_uds_key(&ST0601_KEY).format().checksum().is_some());

    let unknown = UdsKey::from_words(0x060E2B34_02010101, 0x0F000000_00000000);
    assert_eq!(packets.by_uds_key(&unknown).name(), "Unknown Packet");
}

#[test]
fn packet_table_checksums() {
    let packets = registry::global().unwrap().packets();
    let algorithm = |key| {
        packets
            .by_uds_key(key)
            .format()
            .checksum()
            .map(|c| (c.algorithm(), c.header().to_vec()))
    };
    assert_eq!(algorithm(&ST0806_KEY), Some((ChecksumAlgorithm::Crc32Mpeg, vec![0x01, 0x04])));
    assert_eq!(algorithm(&ST1002_KEY), Some((ChecksumAlgorithm::Crc16Ccitt, vec![0x15, 0x02])));
    assert_eq!(
        algorithm(&ST0903_VTRACK_KEY),
        Some((ChecksumAlgorithm::RunningSum16, vec![0x01, 0x02]))
    );
    assert_eq!(algorithm(&ST1601_KEY), None);
    assert_eq!(packets.by_uds_key(&ST1601_KEY).subset(), Some(Standard::St1601));
}

// ── Table construction ───────────────────────────────────────

fn entry(tag: u64, enum_name: &'static str, name: &'static str) -> TagTraits {
    TagTraits::new(tag, enum_name, BlobFormat::new(), name, "")
}

#[test]
fn duplicate_tag_is_registry_error() {
    let err = TagTraitsLookup::new(
        "Test",
        vec![
            TagTraits::unknown("TEST_UNKNOWN"),
            entry(1, "TEST_A", "A"),
            entry(1, "TEST_B", "B"),
        ],
    )
    .unwrap_err();
    assert_eq!(err.code, ERR_REGISTRY);
}

#[test]
fn duplicate_name_is_registry_error() {
    let err = TagTraitsLookup::new(
        "Test",
        vec![
            TagTraits::unknown("TEST_UNKNOWN"),
            entry(1, "TEST_A", "Same"),
            entry(2, "TEST_B", "Same"),
        ],
    )
    .unwrap_err();
    assert_eq!(err.code, ERR_REGISTRY);
}

#[test]
fn empty_table_is_registry_error() {
    assert_eq!(TagTraitsLookup::new("Test", Vec::new()).unwrap_err().code, ERR_REGISTRY);
}

#[test]
fn small_table_lookups() {
    let table = TagTraitsLookup::new(
        "Test",
        vec![TagTraits::unknown("TEST_UNKNOWN"), entry(7, "TEST_SEVEN", "Seven")],
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.by_tag(7).name(), "Seven");
    assert_eq!(table.by_tag(8).enum_name(), "TEST_UNKNOWN");
    assert_eq!(table.unknown().enum_name(), "TEST_UNKNOWN");
}

// ── Tag counts ───────────────────────────────────────────────

#[test]
fn tag_count_allows() {
    assert!(TagCount::Exact(1).allows(1));
    assert!(!TagCount::Exact(1).allows(0));
    assert!(TagCount::OPTIONAL.allows(0));
    assert!(!TagCount::OPTIONAL.allows(2));
    assert!(TagCount::Between(1, None).allows(50));
    assert!(!TagCount::Between(1, None).allows(0));
}

#[test]
fn tag_count_display() {
    assert_eq!(TagCount::Exact(1).to_string(), "exactly 1");
    assert_eq!(TagCount::Between(0, Some(1)).to_string(), "0 to 1");
    assert_eq!(TagCount::ANY.to_string(), "at least 0");
}
