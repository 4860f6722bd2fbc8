//! Signing orchestration
//!
//! Sequences one signing run as a linear state machine:
//!
//! ```text
//! Init -> KeyImported -> DescriptorResolved -> PassphrasePreset
//!      -> Committed -> Verified
//! ```
//!
//! Each stage fully completes before the next begins and has its own
//! failure domain (key material, listing format, agent protocol, git
//! state). Any stage failure aborts the rest of the run with a typed
//! [`SignError`] naming the failed transition; nothing is retried, because
//! every failure mode here needs caller intervention rather than a
//! mechanical rerun. The one exception is the final verification step,
//! which is observability only: the commit already exists, so a failure
//! there is reported as a warning on the outcome, not an error.
//!
//! The agent's passphrase cache is process-wide. Concurrent runs against
//! the same keygrip must be serialized by the caller; this layer is
//! single-threaded and synchronous by design.

use thiserror::Error;

use crate::agent::{self, AgentError, AgentTransport};
use crate::git::{CommitError, CommitSigner, SigningRequest};
use crate::keyring::descriptor::{self, DescriptorError};
use crate::keyring::import::{KeyImporter, KeyStoreError, ListingSource};
use crate::listing;

/// States of one signing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing done yet.
    Init,
    /// Key material accepted by the store, fingerprints known.
    KeyImported,
    /// Descriptor extracted from a fresh listing.
    DescriptorResolved,
    /// Agent holds the passphrase for the signing keygrip.
    PassphrasePreset,
    /// Signed commit created.
    Committed,
    /// Signature status read back.
    Verified,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::KeyImported => "key-imported",
            Self::DescriptorResolved => "descriptor-resolved",
            Self::PassphrasePreset => "passphrase-preset",
            Self::Committed => "committed",
            Self::Verified => "verified",
        };
        f.write_str(name)
    }
}

/// A failed stage transition. Each variant corresponds to exactly one
/// transition of the state machine.
#[derive(Debug, Error)]
pub enum SignError {
    /// The key store rejected the material, or import yielded nothing.
    #[error("key import failed: {0}")]
    Import(#[from] KeyStoreError),

    /// The listing query itself failed (gpg missing, keyring unreadable).
    #[error("key listing query failed: {0}")]
    Listing(KeyStoreError),

    /// The listing did not yield a usable descriptor.
    #[error("descriptor resolution failed: {0}")]
    Descriptor(#[from] DescriptorError),

    /// The agent refused the passphrase preset or was unreachable.
    #[error("passphrase preset failed: {0}")]
    Agent(#[from] AgentError),

    /// The commit collaborator failed.
    #[error("signed commit failed: {0}")]
    Commit(#[from] CommitError),
}

impl SignError {
    /// The stage whose transition failed (the state the run never reached).
    #[must_use]
    pub const fn stage(&self) -> Stage {
        match self {
            Self::Import(_) => Stage::KeyImported,
            Self::Listing(_) | Self::Descriptor(_) => Stage::DescriptorResolved,
            Self::Agent(_) => Stage::PassphrasePreset,
            Self::Commit(_) => Stage::Committed,
        }
    }
}

/// Signature status of the finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    /// git reported the signature; carries its rendered output.
    Verified(String),
    /// Verification failed after the commit was created. Non-fatal.
    Warning(String),
}

/// Result of a successful run: the commit exists and is signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningOutcome {
    /// Id of the created commit.
    pub commit_id: String,
    /// Short key id the commit was signed with (public, appears in the
    /// commit object).
    pub short_key_id: String,
    /// Post-commit verification result.
    pub verification: VerificationStatus,
}

/// Drives one signing run across the four collaborators.
pub struct Orchestrator<'a> {
    importer: &'a dyn KeyImporter,
    listing: &'a dyn ListingSource,
    agent: &'a dyn AgentTransport,
    committer: &'a dyn CommitSigner,
}

impl std::fmt::Debug for Orchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl<'a> Orchestrator<'a> {
    /// Wire up the collaborators for a run.
    #[must_use]
    pub const fn new(
        importer: &'a dyn KeyImporter,
        listing: &'a dyn ListingSource,
        agent: &'a dyn AgentTransport,
        committer: &'a dyn CommitSigner,
    ) -> Self {
        Self {
            importer,
            listing,
            agent,
            committer,
        }
    }

    /// Run the full workflow: import the key material, resolve its
    /// descriptor, preset the passphrase, create the signed commit, and
    /// read back the signature status.
    ///
    /// The passphrase is borrowed for the import and preset calls only and
    /// never copied into the outcome, errors, or logs.
    pub fn run(
        &self,
        key_material: &str,
        passphrase: &[u8],
        message: &str,
    ) -> Result<SigningOutcome, SignError> {
        // Init -> KeyImported
        let fingerprints = self.importer.import(key_material, passphrase)?;
        let target = fingerprints
            .first()
            .ok_or(SignError::Import(KeyStoreError::NoFingerprints))?;
        log::debug!("stage reached: {}", Stage::KeyImported);

        // KeyImported -> DescriptorResolved
        let text = self
            .listing
            .secret_key_listing(target)
            .map_err(SignError::Listing)?;
        let desc = descriptor::extract(listing::parse(&text), target)?;
        log::debug!("stage reached: {}", Stage::DescriptorResolved);

        // DescriptorResolved -> PassphrasePreset
        let session = agent::preset_passphrase(self.agent, &desc.keygrip, passphrase)?;
        log::debug!("stage reached: {}", Stage::PassphrasePreset);

        // PassphrasePreset -> Committed
        let request = SigningRequest {
            signing_key: desc.short_key_id.clone(),
            message: message.to_string(),
            author_name: desc.identity_name.clone(),
            author_email: desc.identity_email.clone(),
        };
        let commit_id = self.committer.create_signed_commit(&session, &request)?;
        log::debug!("stage reached: {}", Stage::Committed);

        // Committed -> Verified (non-fatal)
        let verification = match self.committer.verify_signature(&commit_id) {
            Ok(rendered) => {
                log::debug!("stage reached: {}", Stage::Verified);
                VerificationStatus::Verified(rendered)
            },
            Err(e) => {
                log::warn!("signature verification failed after commit: {e}");
                VerificationStatus::Warning(e.to_string())
            },
        };

        Ok(SigningOutcome {
            commit_id,
            short_key_id: desc.short_key_id,
            verification,
        })
    }
}
