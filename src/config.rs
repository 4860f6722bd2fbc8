//! Run configuration
//!
//! autosign is built for non-interactive environments (CI jobs, bots), so
//! secrets arrive through the environment: the armored private key in
//! `GPG_PRIVATE_KEY`, its passphrase in `PASSPHRASE`. Container runners
//! often mangle multi-line env values into literal `\n` sequences; key
//! material is normalized back before use. Nothing in here is ever written
//! to disk.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use zeroize::Zeroizing;

/// Environment variable holding the armored private key.
pub const KEY_ENV: &str = "GPG_PRIVATE_KEY";

/// Environment variable holding the key passphrase.
pub const PASSPHRASE_ENV: &str = "PASSPHRASE";

/// Environment variable holding the target repository directory.
pub const REPO_DIR_ENV: &str = "REPO_DIR";

/// Errors assembling a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is absent.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    /// A key file was named but could not be read.
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        /// The file that was named.
        path: PathBuf,
        /// Underlying io error.
        source: std::io::Error,
    },
}

/// Everything one signing run needs from the outside.
///
/// The key material and passphrase buffers are wiped on drop.
pub struct Config {
    /// Armored private key material.
    pub key_material: Zeroizing<String>,
    /// Passphrase protecting the key.
    pub passphrase: Zeroizing<String>,
    /// Directory of (or inside) the target repository.
    pub repo_dir: PathBuf,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("repo_dir", &self.repo_dir)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Assemble a configuration from the environment, with optional
    /// overrides from the command line. A key file override wins over the
    /// key environment variable; a repo override wins over `REPO_DIR`,
    /// which itself defaults to the current directory.
    pub fn from_env(
        key_file: Option<PathBuf>,
        repo_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let key_material = match key_file {
            Some(path) => Zeroizing::new(
                fs::read_to_string(&path).map_err(|source| ConfigError::KeyFile { path, source })?,
            ),
            None => std::env::var(KEY_ENV)
                .map(|raw| Zeroizing::new(normalize_key_material(&raw)))
                .map_err(|_| ConfigError::MissingEnv(KEY_ENV))?,
        };

        let passphrase = std::env::var(PASSPHRASE_ENV)
            .map(Zeroizing::new)
            .map_err(|_| ConfigError::MissingEnv(PASSPHRASE_ENV))?;

        let repo_dir = repo_dir
            .or_else(|| std::env::var(REPO_DIR_ENV).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            key_material,
            passphrase,
            repo_dir,
        })
    }
}

/// Turn literal `\n` sequences back into newlines.
///
/// Docker-style env files cannot carry real line breaks, so armored keys
/// arrive with the escape sequence spelled out.
#[must_use]
pub fn normalize_key_material(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
