//! Key-store introspection and import
//!
//! - [`descriptor`] - derive a signing descriptor from a key listing
//! - [`import`] - collaborators wrapping the `gpg` binary

pub mod descriptor;
pub mod import;

pub use descriptor::{DescriptorError, KeyDescriptor};
pub use import::{GpgKeyStore, KeyImporter, KeyStoreError, ListingSource};
