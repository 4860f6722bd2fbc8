//! Tests for output formatting

use autosign::orchestrator::{SigningOutcome, VerificationStatus};
use autosign::output::SignResult;

fn verified_outcome() -> SigningOutcome {
    SigningOutcome {
        commit_id: "03aaa45f46b313ed6079cd2e8788173bd0a3af52".to_string(),
        short_key_id: "27304EDD6079B81C".to_string(),
        verification: VerificationStatus::Verified("gpg: Good signature".to_string()),
    }
}

#[test]
fn test_sign_result_from_verified_outcome() {
    let result = SignResult::from_outcome(&verified_outcome());
    assert!(result.success);
    assert!(result.verified);
    assert_eq!(result.commit_id, "03aaa45f46b313ed6079cd2e8788173bd0a3af52");
    assert_eq!(result.short_key_id, "27304EDD6079B81C");
    assert!(result.warning.is_none());
}

#[test]
fn test_sign_result_from_warning_outcome() {
    let outcome = SigningOutcome {
        verification: VerificationStatus::Warning("git log failed".to_string()),
        ..verified_outcome()
    };
    let result = SignResult::from_outcome(&outcome);
    assert!(result.success);
    assert!(!result.verified);
    assert_eq!(result.warning.as_deref(), Some("git log failed"));
}

#[test]
fn test_sign_result_json_shape() {
    let result = SignResult::from_outcome(&verified_outcome());
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["verified"], true);
    assert_eq!(value["commit_id"], "03aaa45f46b313ed6079cd2e8788173bd0a3af52");
    // No warning field when verification succeeded
    assert!(value.get("warning").is_none());
}

#[test]
fn test_sign_result_json_includes_warning() {
    let outcome = SigningOutcome {
        verification: VerificationStatus::Warning("unreadable".to_string()),
        ..verified_outcome()
    };
    let value = serde_json::to_value(SignResult::from_outcome(&outcome)).unwrap();
    assert_eq!(value["warning"], "unreadable");
}
