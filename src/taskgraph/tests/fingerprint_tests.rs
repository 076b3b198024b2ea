//! Unit tests for transcript fingerprinting.

use crate::taskgraph::domain::{TaskGraphDomainError, TranscriptFingerprint};
use rstest::rstest;

/// SHA-256 of the literal string `hello`.
const HELLO_DIGEST: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

#[rstest]
fn fingerprint_matches_known_digest_after_normalization() {
    assert_eq!(TranscriptFingerprint::of("  Hello \n").as_str(), HELLO_DIGEST);
}

#[rstest]
fn fingerprint_is_deterministic() {
    let transcript = "Alice: ship the beta on Friday.";
    assert_eq!(
        TranscriptFingerprint::of(transcript),
        TranscriptFingerprint::of(transcript)
    );
}

#[rstest]
#[case("Plan the launch", "plan the launch")]
#[case("plan the launch", "  plan the launch  ")]
#[case("PLAN THE LAUNCH", "\tPlan The Launch\n")]
fn case_and_whitespace_variants_hash_identically(#[case] left: &str, #[case] right: &str) {
    assert_eq!(
        TranscriptFingerprint::of(left),
        TranscriptFingerprint::of(right)
    );
}

#[rstest]
fn distinct_transcripts_hash_differently() {
    assert_ne!(
        TranscriptFingerprint::of("plan the launch"),
        TranscriptFingerprint::of("plan the rollback")
    );
}

#[rstest]
fn fingerprint_renders_sixty_four_lowercase_hex_digits() {
    let fingerprint = TranscriptFingerprint::of("any transcript");
    assert_eq!(fingerprint.as_str().len(), 64);
    assert!(
        fingerprint
            .as_str()
            .chars()
            .all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    );
}

#[rstest]
fn from_hex_round_trips_a_computed_fingerprint() {
    let fingerprint = TranscriptFingerprint::of("round trip");
    let rebuilt =
        TranscriptFingerprint::from_hex(fingerprint.as_str()).expect("valid fingerprint");
    assert_eq!(rebuilt, fingerprint);
}

#[rstest]
#[case("abc123")]
#[case("")]
#[case("2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824")]
#[case("zz")]
fn from_hex_rejects_malformed_values(#[case] value: &str) {
    assert_eq!(
        TranscriptFingerprint::from_hex(value),
        Err(TaskGraphDomainError::InvalidFingerprint(value.to_owned()))
    );
}
