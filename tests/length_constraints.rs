use klv::*;

// ── Construction ─────────────────────────────────────────────

#[test]
fn fixed_zero_is_rejected() {
    assert_eq!(LengthConstraints::fixed(0).unwrap_err().code, ERR_CONSTRAINT);
}

#[test]
fn range_needs_min_below_max() {
    assert_eq!(LengthConstraints::range(4, 4).unwrap_err().code, ERR_CONSTRAINT);
    assert_eq!(LengthConstraints::range(0, 4).unwrap_err().code, ERR_CONSTRAINT);
}

#[test]
fn set_needs_members() {
    assert_eq!(LengthConstraints::set(&[]).unwrap_err().code, ERR_CONSTRAINT);
    assert_eq!(LengthConstraints::set(&[0, 2]).unwrap_err().code, ERR_CONSTRAINT);
}

#[test]
fn suggested_must_be_allowed() {
    let range = LengthConstraints::range(1, 8).unwrap();
    assert_eq!(range.clone().with_suggested(9).unwrap_err().code, ERR_CONSTRAINT);
    assert_eq!(range.with_suggested(3).unwrap().suggested(), Some(3));
}

// ── Queries ──────────────────────────────────────────────────

#[test]
fn do_allow_per_shape() {
    assert!(LengthConstraints::free().do_allow(1000));
    assert!(LengthConstraints::fixed(4).unwrap().do_allow(4));
    assert!(!LengthConstraints::fixed(4).unwrap().do_allow(3));
    let range = LengthConstraints::range(1, 8).unwrap();
    assert!(range.do_allow(1) && range.do_allow(8) && !range.do_allow(9));
    let set = LengthConstraints::set(&[8, 2, 4]).unwrap();
    assert!(set.do_allow(4) && !set.do_allow(3));
}

#[test]
fn suggested_defaults() {
    assert_eq!(LengthConstraints::free().suggested(), None);
    assert_eq!(LengthConstraints::free().suggested_or(8), 8);
    assert_eq!(LengthConstraints::fixed(4).unwrap().suggested(), Some(4));
    assert_eq!(LengthConstraints::range(2, 8).unwrap().suggested(), Some(2));
    assert_eq!(LengthConstraints::set(&[8, 4]).unwrap().suggested(), Some(4));
}

#[test]
fn fixed_length_only_for_fixed() {
    assert_eq!(LengthConstraints::fixed(2).unwrap().fixed_length(), Some(2));
    assert_eq!(LengthConstraints::range(1, 2).unwrap().fixed_length(), None);
    assert_eq!(LengthConstraints::free().fixed_or(7), 7);
}

fn every_shape() -> Vec<LengthConstraints> {
    vec![
        LengthConstraints::free(),
        LengthConstraints::fixed(4).unwrap(),
        LengthConstraints::range(2, 8).unwrap(),
        LengthConstraints::set(&[8, 4]).unwrap(),
        LengthConstraints::set(&[4, 8]).unwrap().with_suggested(8).unwrap(),
        LengthConstraints::range(1, 3).unwrap().with_suggested(3).unwrap(),
    ]
}

#[test]
fn fixed_or_is_allowed_whenever_fixed() {
    for constraints in every_shape() {
        if constraints.fixed_length().is_some() {
            assert!(constraints.do_allow(constraints.fixed_or(99)), "{constraints}");
        } else {
            assert_eq!(constraints.fixed_or(99), 99, "{constraints}");
        }
    }
}

#[test]
fn suggested_is_always_allowed() {
    for constraints in every_shape() {
        let suggested = constraints.suggested_or(5);
        assert!(constraints.do_allow(suggested), "{constraints} suggests {suggested}");
    }
}

#[test]
fn fit_picks_smallest_legal_length() {
    assert_eq!(LengthConstraints::free().fit(3), 3);
    assert_eq!(LengthConstraints::fixed(4).unwrap().fit(1), 4);
    assert_eq!(LengthConstraints::range(2, 8).unwrap().fit(1), 2);
    let set = LengthConstraints::set(&[2, 4, 8]).unwrap();
    assert_eq!(set.fit(3), 4);
    assert_eq!(set.fit(9), 9);
}

#[test]
fn descriptions() {
    assert_eq!(LengthConstraints::fixed(4).unwrap().description(), "length must be 4");
    assert_eq!(LengthConstraints::range(1, 8).unwrap().description(), "length in [1,8]");
    assert_eq!(
        LengthConstraints::set(&[4, 2, 8]).unwrap().to_string(),
        "length in {2,4,8}"
    );
    assert_eq!(LengthConstraints::free().to_string(), "length unconstrained");
}
