use klv::format::UintFormat;
use klv::series::SeriesFormat;
use klv::set::LocalSetFormat;
use klv::*;

fn ctx() -> Context<'static> {
    Context::new(registry::global().unwrap())
}

fn uints() -> SeriesFormat {
    SeriesFormat::new(UintFormat::new(LengthConstraints::free()))
}

// ── Series ───────────────────────────────────────────────────

#[test]
fn series_elements_carry_their_own_lengths() {
    let value = KlvValue::Series(vec![KlvValue::UInt(1), KlvValue::UInt(0x0203)]);
    let format = uints();
    let length = format.length_of(&value, &ctx()).unwrap();
    let mut out = Vec::new();
    format.write(&value, &mut out, length, &ctx()).unwrap();
    assert_eq!(out, [0x01, 0x01, 0x02, 0x02, 0x03]);
    assert_eq!(format.read(&mut Cursor::new(&out), out.len(), &ctx()).unwrap(), value);
}

#[test]
fn empty_series_writes_nothing() {
    let value = KlvValue::Series(Vec::new());
    assert_eq!(uints().length_of(&value, &ctx()).unwrap(), 0);
}

#[test]
fn element_overrun_keeps_blob() {
    let bytes = [0x01, 0x01, 0x05, 0x02];
    let value = uints().read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    assert_eq!(value, KlvValue::Blob(bytes.to_vec()));
}

#[test]
fn zero_length_element_is_empty() {
    let bytes = [0x00, 0x01, 0x07];
    let value = uints().read(&mut Cursor::new(&bytes), bytes.len(), &ctx()).unwrap();
    assert_eq!(value, KlvValue::Series(vec![KlvValue::Empty, KlvValue::UInt(7)]));
}

#[test]
fn series_of_sets_reports_subset() {
    let format = SeriesFormat::new(LocalSetFormat::new(Standard::St0903Algorithm));
    assert_eq!(format.subset(), Some(Standard::St0903Algorithm));
    assert_eq!(uints().subset(), None);
}

#[test]
fn series_prints_each_element() {
    let format = SeriesFormat::new(LocalSetFormat::new(Standard::St0903Algorithm));
    let mut set = LocalSet::new();
    set.add(LdsKey(1), KlvValue::UInt(4))
        .add(LdsKey(2), KlvValue::String("tracker".into()));
    let printed = format.print(&KlvValue::Series(vec![KlvValue::LocalSet(set)]), &ctx());
    assert_eq!(printed, "[ { ID: 4, Name: \"tracker\" } ]");
}

#[test]
fn non_series_value_is_type_error() {
    assert_eq!(uints().length_of(&KlvValue::UInt(1), &ctx()).unwrap_err().code, ERR_TYPE);
}
