use std::path::PathBuf;

use icd_recode_loader::icd_recode_types::{CodeRule, IcdCode};
use icd_recode_loader::{ParseConfig, RecodeError, Recoder};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("recodes_excerpt.txt")
}

fn recoder() -> Recoder {
    Recoder::from_path(fixture(), ParseConfig::nchs()).unwrap()
}

#[test]
fn loads_fixture_table() {
    let recoder = recoder();
    let stats = recoder.stats();
    assert_eq!(stats.groups, 19);
    assert_eq!(stats.leaves, 13);
    assert_eq!(stats.rules, 16);
    assert_eq!(stats.empty_groups, 0);
    assert!(stats.anomalies.is_empty());
}

#[test]
fn parkinson_example_in_document_order() {
    assert_eq!(recoder().get_codes("G20").unwrap(), vec!["18500", "18800"]);
}

#[test]
fn header_line_is_rejected_without_nchs_config() {
    let err = Recoder::from_path(fixture(), ParseConfig::default()).unwrap_err();
    assert_eq!(err.line_number(), Some(1));
    assert!(!err.is_file_access());
}

#[test]
fn missing_file_is_file_access_error() {
    let err = Recoder::from_path(fixture().with_file_name("absent.txt"), ParseConfig::nchs())
        .unwrap_err();
    assert!(matches!(err, RecodeError::FileNotFound { .. }));
}

#[test]
fn codes_outside_table_return_empty() {
    let recoder = recoder();
    for code in ["A00", "A04", "B25", "C35", "G19", "G22", "G32", "U04", "Z99.9"] {
        assert!(
            recoder.get_codes(code).unwrap().is_empty(),
            "{} should not match",
            code
        );
    }
}

#[test]
fn exact_literals_match_their_leaf() {
    let recoder = recoder();
    for (_, group) in recoder.tree().leaves() {
        for rule in &group.rules {
            let literal = match rule {
                CodeRule::Exact { code } => code.to_string(),
                CodeRule::Range { lower, .. } => lower.to_string(),
                CodeRule::Wildcard { prefix } => format!("{}.0", prefix),
            };
            let recode = group.recode.as_deref().unwrap();
            assert!(
                recoder.get_codes(&literal).unwrap().contains(&recode),
                "{} should map to {}",
                literal,
                recode
            );
        }
    }
}

#[test]
fn range_bounds_and_neighbours() {
    let recoder = recoder();
    let code = |s: &str| -> IcdCode { s.parse().unwrap() };

    // C16.0-C16.9 = 08500
    assert_eq!(recoder.get_codes("C16.0").unwrap(), vec!["08500"]);
    assert_eq!(recoder.get_codes("C16.5").unwrap(), vec!["08500"]);
    assert_eq!(recoder.get_codes("C16.9").unwrap(), vec!["08500"]);
    assert_eq!(recoder.get_codes("C15.9").unwrap(), vec!["08400"]);
    assert!(recoder.get_codes("C17").unwrap().is_empty());
    assert!(code("C16.0") < code("C16.5") && code("C16.5") < code("C16.9"));

    // A17-A19 = 00600
    assert_eq!(recoder.get_codes("A17").unwrap(), vec!["00600"]);
    assert_eq!(recoder.get_codes("A19.9").unwrap(), vec!["00600"]);
    assert_eq!(recoder.get_codes("A16.9").unwrap(), vec!["00500"]);
    assert!(recoder.get_codes("A20").unwrap().is_empty());
}

#[test]
fn wildcard_and_asterisk_codes() {
    let recoder = recoder();
    assert_eq!(recoder.get_codes("G31.0").unwrap(), vec!["18800"]);
    assert_eq!(recoder.get_codes("G31").unwrap(), vec!["18800"]);
    assert_eq!(recoder.get_codes("*U02").unwrap(), vec!["43800"]);
    assert_eq!(recoder.get_codes("u03.1").unwrap(), vec!["43800"]);
}

#[test]
fn category_query_matches_subcategory_range() {
    assert_eq!(recoder().get_codes("C16").unwrap(), vec!["08500"]);
}

#[test]
fn whole_groups_of_codes() {
    let recoder = recoder();
    assert_eq!(recoder.get_codes_for_group("A01-A02").unwrap(), vec!["00100"]);
    assert_eq!(recoder.get_codes_for_group("A01.1").unwrap(), vec!["00100"]);
    assert_eq!(recoder.get_codes_for_group("C10-C11, C14.0").unwrap(), vec!["07200"]);
    assert_eq!(recoder.get_codes_for_group("A03, A06.9").unwrap(), vec!["00200"]);
    assert_eq!(recoder.get_codes_for_group("*U02").unwrap(), vec!["43800"]);
}

#[test]
fn partly_covered_group_returns_empty() {
    let recoder = recoder();
    assert!(recoder.get_codes_for_group("A01-A03").unwrap().is_empty());
    assert!(recoder.get_codes_for_group("C14, C15").unwrap().is_empty());
    assert!(recoder.get_codes_for_group("A03-A06").unwrap().is_empty());
}

#[test]
fn reparsing_is_deterministic() {
    let first = recoder();
    let second = recoder();
    for code in ["G20", "G21.3", "C16", "A02.1", "B24", "U01", "X00"] {
        assert_eq!(first.get_codes(code).unwrap(), second.get_codes(code).unwrap());
    }
}

#[test]
fn describe_round_trips_leaf_recodes() {
    let recoder = recoder();
    let reparsed: Recoder = recoder.describe().parse().unwrap();
    assert_eq!(recoder.leaf_recodes(), reparsed.leaf_recodes());
    assert_eq!(
        recoder.get_codes("G20").unwrap(),
        reparsed.get_codes("G20").unwrap()
    );
}

#[test]
fn describe_shows_labels_indented_by_depth() {
    let described = recoder().describe();
    let lines: Vec<&str> = described.lines().collect();
    assert_eq!(lines[0], "Certain infectious and parasitic diseases:");
    assert_eq!(lines[1], "    00100 = Salmonella infections (A01-A02)");
    assert!(lines.contains(&"        08500 = Of stomach (C16.0-C16.9)"));
    assert!(lines.contains(&"43800 = Codes for special purposes (U01-U03)"));
}
