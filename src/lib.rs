//! autosign - verifiable GPG-signed git commits from automation
//!
//! This library inspects a GnuPG key store, extracts the identifiers needed
//! to sign (fingerprint, keygrip, short key id, identity), presets the key
//! passphrase in gpg-agent, and orchestrates the creation of a signed
//! commit - all without interactive prompts.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod agent;
pub mod config;
pub mod git;
pub mod keyring;
pub mod listing;
pub mod orchestrator;
pub mod output;
