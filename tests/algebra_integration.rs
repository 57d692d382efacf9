//! End-to-end tests for projections over whole dictionaries.

use spelling_algebra::prelude::*;

fn spelling(text: &str, kind: SpellingType, credibility: f64, tips: &str) -> Spelling {
    Spelling::with_properties(text, SpellingProperties::new(kind, credibility).with_tips(tips))
}

fn single(key: &str, entries: &[Spelling]) -> Script {
    let mut script = Script::new();
    script.merge(key, &SpellingProperties::default(), entries);
    script
}

fn texts(script: &Script, key: &str) -> Vec<String> {
    script
        .get(key)
        .unwrap_or_else(|| panic!("missing key {}", key))
        .iter()
        .map(|s| s.text.clone())
        .collect()
}

/// Sequential projection plus parallel projections at several worker counts.
fn projections(formulas: &[&str]) -> Vec<Projection> {
    let mut all = vec![Projection::sequential()];
    for workers in [1, 2, 8] {
        all.push(Projection::new(EngineConfig::parallel(workers)).unwrap());
    }
    for projection in &mut all {
        projection.load(formulas).unwrap();
    }
    all
}

#[test]
fn test_derived_key_holds_original_entries() {
    for projection in projections(&["derive/i$/i3/"]) {
        let mut script = single("ni", &[spelling("ni", SpellingType::Normal, 1.0, "")]);
        assert!(projection.apply_script(&mut script).unwrap());

        let expected = {
            let mut s = single("ni", &[spelling("ni", SpellingType::Normal, 1.0, "")]);
            s.merge(
                "ni3",
                &SpellingProperties::default(),
                &[spelling("ni", SpellingType::Normal, 1.0, "")],
            );
            s
        };
        assert!(script.same_as(&expected), "{:?}", script);
    }
}

#[test]
fn test_compile_failure_references_first_formula() {
    let mut projection = Projection::sequential();
    let err = projection.load(&["(bad(regex", "valid->rule"]).unwrap_err();
    match &err {
        ProjectionError::InvalidFormula { index, formula, .. } => {
            assert_eq!(*index, 1);
            assert_eq!(formula, "(bad(regex");
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("formula #1 is unparsable"));
    assert!(projection.is_empty());
}

#[test]
fn test_deletion_without_addition_drops_key() {
    for projection in projections(&["erase/^hm$/"]) {
        let mut script = Script::from_syllables(["hm", "ma"]);
        assert!(projection.apply_script(&mut script).unwrap());
        assert!(!script.contains_key("hm"));
        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["ma"]);
    }
}

#[test]
fn test_addition_with_deletion_replaces_key() {
    for projection in projections(&["xform/^([nl])ue$/$1ve/"]) {
        let mut script = Script::from_syllables(["lue", "nue", "xue"]);
        assert!(projection.apply_script(&mut script).unwrap());
        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["lve", "nve", "xue"]);
        assert_eq!(texts(&script, "lve"), vec!["lue"]);
    }
}

#[test]
fn test_addition_without_deletion_forks_key() {
    for projection in projections(&["abbrev/^([a-z]).+$/$1/"]) {
        let mut script = Script::from_syllables(["zhong", "zhi"]);
        assert!(projection.apply_script(&mut script).unwrap());

        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["z", "zhi", "zhong"]);
        assert_eq!(texts(&script, "z"), vec!["zhi", "zhong"]);
        for s in script.get("z").unwrap() {
            assert_eq!(s.properties.kind, SpellingType::Abbreviation);
            assert_eq!(s.properties.credibility, spelling_algebra::calculus::ABBREVIATION_PENALTY);
        }
        assert_eq!(script.get("zhi").unwrap()[0].properties.kind, SpellingType::Normal);
    }
}

#[test]
fn test_derived_key_collides_with_existing_key() {
    for projection in projections(&["derive/^zh/z/"]) {
        let mut script = Script::from_syllables(["zhi", "zi"]);
        assert!(projection.apply_script(&mut script).unwrap());
        assert_eq!(texts(&script, "zi"), vec!["zhi", "zi"]);
        assert_eq!(texts(&script, "zhi"), vec!["zhi"]);
    }
}

#[test]
fn test_tips_cleared_when_sources_collide() {
    for projection in projections(&["xform/^[ab]$/c/"]) {
        let mut script = single("a", &[spelling("x", SpellingType::Ambiguous, 1.0, "from a")]);
        script.merge(
            "b",
            &SpellingProperties::default(),
            &[spelling("x", SpellingType::Normal, 0.5, "")],
        );

        assert!(projection.apply_script(&mut script).unwrap());
        let c = script.get("c").unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].properties.kind, SpellingType::Normal);
        assert_eq!(c[0].properties.credibility, 1.0);
        assert!(c[0].properties.tips.is_empty());
    }
}

#[test]
fn test_later_rounds_see_derived_keys() {
    // Round 2 must transform keys that only exist because of round 1.
    for projection in projections(&["derive/^zh/z/", "abbrev/^z.+$/z/"]) {
        let mut script = Script::from_syllables(["zhi"]);
        assert!(projection.apply_script(&mut script).unwrap());
        assert_eq!(script.keys().collect::<Vec<_>>(), vec!["z", "zhi", "zi"]);
        assert_eq!(texts(&script, "z"), vec!["zhi"]);
    }
}

#[test]
fn test_unmatched_rules_report_unmodified() {
    for projection in projections(&["xform/q/k/", "erase/^x$/"]) {
        let mut script = Script::from_syllables(["ma", "ba"]);
        let before = script.clone();
        assert!(!projection.apply_script(&mut script).unwrap());
        assert!(script.same_as(&before));
    }
}

#[test]
fn test_empty_inputs() {
    let mut script = Script::new();
    assert!(!projections(&["derive/a/b/"])[1].apply_script(&mut script).unwrap());

    let mut script = Script::from_syllables(["a"]);
    assert!(!Projection::sequential().apply_script(&mut script).unwrap());
}

#[test]
fn test_runaway_rule_aborts_without_mutation() {
    let long = format!("xform/a/{}/", "a".repeat(80));
    for projection in projections(&["derive/^b/a/", long.as_str()]) {
        let mut script = Script::from_syllables(["ba", "bo", "ca"]);
        let before = script.clone();
        match projection.apply_script(&mut script) {
            Err(ProjectionError::Calculation { round, source, .. }) => {
                assert_eq!(round, 2);
                assert!(matches!(source, CalculationError::ExpansionLimit { .. }));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(script.same_as(&before));
    }
}

#[test]
fn test_project_string() {
    let mut projection = Projection::sequential();
    projection
        .load(&["xform/^([jqxy])u$/$1v/", "xlit/v/ü/", "abbrev/^(.).+$/$1/"])
        .unwrap();

    let mut value = String::from("xu");
    assert!(projection.apply_str(&mut value).unwrap());
    assert_eq!(value, "x");
}
