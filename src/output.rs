//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON. Result structs only ever
//! carry values that already appear in the public commit object - never
//! fingerprints, keygrips or key material.

use serde::Serialize;

use crate::orchestrator::{SigningOutcome, VerificationStatus};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a sign operation
#[derive(Debug, Serialize)]
pub struct SignResult {
    /// Whether the signed commit was created
    pub success: bool,
    /// Id of the created commit
    pub commit_id: String,
    /// Short key id the commit was signed with
    pub short_key_id: String,
    /// Whether the post-commit verification succeeded
    pub verified: bool,
    /// Verification warning, when the commit exists but its signature
    /// status could not be read back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl SignResult {
    /// Build the result from a finished orchestrator run.
    #[must_use]
    pub fn from_outcome(outcome: &SigningOutcome) -> Self {
        let (verified, warning) = match &outcome.verification {
            VerificationStatus::Verified(_) => (true, None),
            VerificationStatus::Warning(w) => (false, Some(w.clone())),
        };
        Self {
            success: true,
            commit_id: outcome.commit_id.clone(),
            short_key_id: outcome.short_key_id.clone(),
            verified,
            warning,
        }
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => self.render_json(),
        }
    }

    fn render_human(&self) {
        println!("Created signed commit {}", self.commit_id);
        println!("Signing key: {}", self.short_key_id);
        if self.verified {
            println!("Signature verified.");
        } else if let Some(warning) = &self.warning {
            println!("Warning: signature not verified: {warning}");
        }
    }

    fn render_json(&self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap_or_default());
    }
}
