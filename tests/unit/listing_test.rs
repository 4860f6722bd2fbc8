//! Tests for the colon-delimited listing parser

use autosign::listing::{self, Record, RecordTag, VALUE_FIELD};

/// Listing of one secret key with an encryption subkey, as produced by
/// `gpg --batch --with-colons --with-keygrip --list-secret-keys`.
const SAMPLE_LISTING: &str = "\
sec:-:4096:1:27304EDD6079B81C:1637342753:::-:::scESC:::+:::23::0:
fpr:::::::::88966A5B8C01BD04F3DA440427304EDD6079B81C:
grp:::::::::449972AC9FF11BCABEED8A7AE834C4349CC4DBFF:
uid:-::::1637342753::B3B0B2247600E80BAB9D4802D5CF0AFC477DE016::A committer <committer@example.com>::::::::::0:
ssb:-:4096:1:5B6BDD35BEDFBF6F:1637342753::::::e:::+:::23:
fpr:::::::::B1D4A2483D1D2A02416BE0775B6BDD35BEDFBF6F:
grp:::::::::97D36F5B8F5BECDA8A1923FC00D11C7C438584F9:
";

#[test]
fn test_parse_yields_one_record_per_nonempty_line() {
    let records: Vec<Record> = listing::parse(SAMPLE_LISTING).collect();
    let nonempty = SAMPLE_LISTING.lines().filter(|l| !l.is_empty()).count();
    assert_eq!(records.len(), nonempty);
    assert_eq!(records.len(), 7);
}

#[test]
fn test_parse_tags_in_order() {
    let tags: Vec<RecordTag> = listing::parse(SAMPLE_LISTING).map(|r| r.tag).collect();
    assert_eq!(
        tags,
        vec![
            RecordTag::SecretKey,
            RecordTag::Fingerprint,
            RecordTag::Keygrip,
            RecordTag::UserId,
            RecordTag::Subkey,
            RecordTag::Fingerprint,
            RecordTag::Keygrip,
        ]
    );
}

#[test]
fn test_parse_skips_blank_lines_only() {
    let text = "fpr:::::::::88966A5B8C01BD04F3DA440427304EDD6079B81C:\n\n\ngrp:::::::::449972AC9FF11BCABEED8A7AE834C4349CC4DBFF:\n";
    let records: Vec<Record> = listing::parse(text).collect();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_record_preserves_empty_fields() {
    let record = Record::from_line("fpr:::::::::88966A5B8C01BD04F3DA440427304EDD6079B81C:");
    assert_eq!(record.fields[0], "fpr");
    // Positions 1..=8 are present but empty
    for i in 1..=8 {
        assert_eq!(record.fields[i], "");
    }
    assert_eq!(record.fields[VALUE_FIELD], "88966A5B8C01BD04F3DA440427304EDD6079B81C");
}

#[test]
fn test_record_value_for_tagged_records() {
    let fpr = Record::from_line("fpr:::::::::88966A5B8C01BD04F3DA440427304EDD6079B81C:");
    assert_eq!(fpr.value(), Some("88966A5B8C01BD04F3DA440427304EDD6079B81C"));

    let grp = Record::from_line("grp:::::::::449972AC9FF11BCABEED8A7AE834C4349CC4DBFF:");
    assert_eq!(grp.value(), Some("449972AC9FF11BCABEED8A7AE834C4349CC4DBFF"));

    let uid = Record::from_line(
        "uid:-::::1637342753::B3B0B2247600E80BAB9D4802D5CF0AFC477DE016::A committer <committer@example.com>::::::::::0:",
    );
    assert_eq!(uid.value(), Some("A committer <committer@example.com>"));
}

#[test]
fn test_record_value_absent_for_headers() {
    let sec = Record::from_line("sec:-:4096:1:27304EDD6079B81C:1637342753:::-:::scESC:::+:::23::0:");
    assert_eq!(sec.tag, RecordTag::SecretKey);
    assert_eq!(sec.value(), None);

    let ssb = Record::from_line("ssb:-:4096:1:5B6BDD35BEDFBF6F:1637342753::::::e:::+:::23:");
    assert_eq!(ssb.tag, RecordTag::Subkey);
    assert_eq!(ssb.value(), None);
}

#[test]
fn test_unknown_tag_is_unrecognized_not_dropped() {
    let record = Record::from_line("tru::1:1637342753:0:3:1:5");
    assert_eq!(record.tag, RecordTag::Unrecognized);
    assert_eq!(record.fields[0], "tru");
}

#[test]
fn test_truncated_fpr_is_unrecognized() {
    // A fpr line with fewer than 10 fields cannot carry its value
    let record = Record::from_line("fpr:::");
    assert_eq!(record.tag, RecordTag::Unrecognized);
    assert_eq!(record.value(), None);
}

#[test]
fn test_truncated_grp_and_uid_are_unrecognized() {
    assert_eq!(Record::from_line("grp:abc").tag, RecordTag::Unrecognized);
    assert_eq!(Record::from_line("uid").tag, RecordTag::Unrecognized);
}

#[test]
fn test_empty_value_field_is_distinct_from_missing() {
    // Exactly 10 fields, value empty: recognized, value is ""
    let record = Record::from_line("grp::::::::::");
    assert_eq!(record.tag, RecordTag::Keygrip);
    assert_eq!(record.value(), Some(""));
}
