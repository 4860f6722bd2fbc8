//! GnuPG key-store collaborators
//!
//! Thin process wrappers around the `gpg` binary: importing private key
//! material into the local keyring and querying the colon-delimited
//! secret-key listing. All parsing of the listing happens elsewhere; these
//! functions only move bytes in and out of the process.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

use crate::listing::{self, RecordTag};

/// Errors from the gpg key-store collaborators.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// The gpg process could not be spawned or written to.
    #[error("failed to run gpg: {0}")]
    Io(#[from] std::io::Error),

    /// gpg refused the key material (malformed key, unsupported algorithm).
    #[error("gpg rejected key material: {0}")]
    BadKeyMaterial(String),

    /// The import succeeded but introduced no fingerprints.
    #[error("key import produced no fingerprints")]
    NoFingerprints,

    /// The listing query exited with an error.
    #[error("gpg listing query failed: {0}")]
    ListingFailed(String),
}

/// Submits private key material to the key store.
pub trait KeyImporter {
    /// Import `key_material`, returning the fingerprints it introduced.
    ///
    /// The passphrase is part of the interface contract; whether the store
    /// needs it at import time is implementation-defined (GnuPG defers
    /// unlocking to the agent).
    fn import(&self, key_material: &str, passphrase: &[u8]) -> Result<Vec<String>, KeyStoreError>;
}

/// Produces the colon-delimited secret-key listing for one fingerprint.
pub trait ListingSource {
    /// Raw listing text, scoped to `fingerprint`.
    fn secret_key_listing(&self, fingerprint: &str) -> Result<String, KeyStoreError>;
}

/// Key store backed by the `gpg` binary, optionally in a dedicated homedir.
#[derive(Debug, Clone, Default)]
pub struct GpgKeyStore {
    homedir: Option<PathBuf>,
}

impl GpgKeyStore {
    /// Key store using the default GnuPG home (`$GNUPGHOME` or `~/.gnupg`).
    #[must_use]
    pub const fn new() -> Self {
        Self { homedir: None }
    }

    /// Key store rooted at an explicit GnuPG home directory.
    #[must_use]
    pub fn with_homedir(homedir: impl Into<PathBuf>) -> Self {
        Self {
            homedir: Some(homedir.into()),
        }
    }

    fn gpg(&self) -> Command {
        let mut cmd = Command::new("gpg");
        cmd.arg("--batch");
        if let Some(dir) = &self.homedir {
            cmd.arg("--homedir").arg(dir);
        }
        cmd
    }
}

impl KeyImporter for GpgKeyStore {
    fn import(&self, key_material: &str, _passphrase: &[u8]) -> Result<Vec<String>, KeyStoreError> {
        // import-show echoes a colon listing of what was imported, which is
        // the only reliable way to learn the new fingerprints in batch mode.
        let mut child = self
            .gpg()
            .args(["--import-options", "import-show", "--with-colons", "--import"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(key_material.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(KeyStoreError::BadKeyMaterial(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let fingerprints: Vec<String> = listing::parse(&stdout)
            .filter(|r| r.tag == RecordTag::Fingerprint)
            .filter_map(|r| r.value().map(str::to_string))
            .collect();

        if fingerprints.is_empty() {
            return Err(KeyStoreError::NoFingerprints);
        }

        log::debug!("imported {} fingerprint(s)", fingerprints.len());
        Ok(fingerprints)
    }
}

impl ListingSource for GpgKeyStore {
    fn secret_key_listing(&self, fingerprint: &str) -> Result<String, KeyStoreError> {
        let output = self
            .gpg()
            .args(["--with-colons", "--with-keygrip", "--list-secret-keys", fingerprint])
            .output()?;

        if !output.status.success() {
            return Err(KeyStoreError::ListingFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
