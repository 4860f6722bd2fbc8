//! Key descriptor extraction
//!
//! Consumes the record stream from [`crate::listing`] and derives the
//! identifiers needed to sign: fingerprint, keygrip, short key id and the
//! committer identity. Records are first grouped under the nearest preceding
//! fingerprint record, then the group matching the caller's target
//! fingerprint is interpreted. Grouping makes the format's ordering contract
//! (a `fpr` line precedes the `grp`/`uid` lines that belong to it) explicit:
//! a `grp` or `uid` with no preceding `fpr` belongs to no group and can
//! never be misattributed to the target key.

use thiserror::Error;

use crate::listing::{Record, RecordTag};

/// Length of a rendered fingerprint or keygrip, in hex digits.
const HEX_ID_LEN: usize = 40;

/// Number of trailing fingerprint digits forming the short key id.
const SHORT_ID_LEN: usize = 16;

/// Errors from descriptor extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    /// No fingerprint record in the listing matched the target.
    #[error("no secret key with fingerprint {0} in listing")]
    NotFound(String),

    /// The target key was listed but carried no usable keygrip. A keygrip
    /// is mandatory: without it the signing agent cannot be addressed.
    #[error("key {0} has no keygrip in listing")]
    Incomplete(String),
}

/// The identifiers of one secret key, derived from a listing.
///
/// Immutable once built, held for the duration of one signing session.
/// It indirectly reveals which secret key an automation identity uses, so
/// it is never serialized and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    /// Primary key fingerprint, 40 hex digits.
    pub fingerprint: String,
    /// Last 16 hex digits of the fingerprint, used as the git signing-key
    /// reference.
    pub short_key_id: String,
    /// Keygrip of the primary key, 40 hex digits; the agent-side handle.
    pub keygrip: String,
    /// Keygrip of an encryption subkey, when one appears in the same group.
    pub subkey_keygrip: Option<String>,
    /// Committer name from the first `uid` record.
    pub identity_name: String,
    /// Committer email from the first `uid` record.
    pub identity_email: String,
}

impl std::fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDescriptor").finish_non_exhaustive()
    }
}

impl KeyDescriptor {
    /// Whether this descriptor satisfies its validity invariant: both
    /// fingerprint and keygrip present and exactly 40 hex digits.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_hex_id(&self.fingerprint) && is_hex_id(&self.keygrip)
    }
}

/// Compute the short key id: the last 16 characters of a fingerprint.
///
/// Counts characters, not bytes, so arbitrary input cannot split a char
/// boundary; for the 40-hex fingerprints this crate produces the two are
/// the same.
#[must_use]
pub fn short_key_id(fingerprint: &str) -> String {
    let start = fingerprint
        .char_indices()
        .rev()
        .nth(SHORT_ID_LEN - 1)
        .map_or(0, |(i, _)| i);
    fingerprint[start..].to_string()
}

fn is_hex_id(s: &str) -> bool {
    s.len() == HEX_ID_LEN && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Records belonging to one fingerprint.
#[derive(Debug, Default, Clone)]
struct KeyGroup {
    fingerprint: String,
    keygrips: Vec<String>,
    uids: Vec<String>,
}

/// Bucket records under the nearest preceding fingerprint.
///
/// A single fold over the stream; `grp`/`uid` records arriving before any
/// `fpr` have no group to join and are dropped here (they cannot belong to
/// any key the caller could name).
fn group_records<I>(records: I) -> Vec<KeyGroup>
where
    I: IntoIterator<Item = Record>,
{
    records.into_iter().fold(Vec::new(), |mut groups, record| {
        match record.tag {
            RecordTag::Fingerprint => {
                if let Some(fpr) = record.value() {
                    groups.push(KeyGroup {
                        fingerprint: fpr.to_string(),
                        ..KeyGroup::default()
                    });
                }
            },
            RecordTag::Keygrip => {
                if let (Some(group), Some(grip)) = (groups.last_mut(), record.value()) {
                    group.keygrips.push(grip.to_string());
                }
            },
            RecordTag::UserId => {
                if let (Some(group), Some(uid)) = (groups.last_mut(), record.value()) {
                    group.uids.push(uid.to_string());
                }
            },
            _ => {},
        }
        groups
    })
}

/// Split a uid value of shape `Name <email>` into name and email.
///
/// Splits on the first `" <"` and the following `">"`; anything after the
/// closing bracket is ignored, matching how gpg renders identities.
fn split_identity(uid: &str) -> (String, String) {
    match uid.split_once(" <") {
        Some((name, rest)) => {
            let email = rest.split_once('>').map_or(rest, |(email, _)| email);
            (name.to_string(), email.to_string())
        },
        None => (uid.to_string(), String::new()),
    }
}

/// Extract the descriptor for `target_fingerprint` from a record stream.
///
/// The first keygrip in the target's group becomes the primary signing
/// keygrip, a second one (if present) the subkey keygrip. Of multiple `uid`
/// records only the first is used.
///
/// Only 40-hex fingerprints and keygrips are accepted, so a returned
/// descriptor always satisfies [`KeyDescriptor::is_valid`]; a target that
/// is not a full fingerprint resolves as [`DescriptorError::NotFound`].
pub fn extract<I>(records: I, target_fingerprint: &str) -> Result<KeyDescriptor, DescriptorError>
where
    I: IntoIterator<Item = Record>,
{
    let groups = group_records(records);

    let group = groups
        .into_iter()
        .find(|g| g.fingerprint == target_fingerprint)
        .filter(|g| is_hex_id(&g.fingerprint))
        .ok_or_else(|| DescriptorError::NotFound(target_fingerprint.to_string()))?;

    let mut keygrips = group.keygrips.into_iter().filter(|g| is_hex_id(g));
    let keygrip = keygrips
        .next()
        .ok_or_else(|| DescriptorError::Incomplete(target_fingerprint.to_string()))?;
    let subkey_keygrip = keygrips.next();

    let (identity_name, identity_email) = group
        .uids
        .first()
        .map(|uid| split_identity(uid))
        .unwrap_or_default();

    Ok(KeyDescriptor {
        short_key_id: short_key_id(&group.fingerprint),
        fingerprint: group.fingerprint,
        keygrip,
        subkey_keygrip,
        identity_name,
        identity_email,
    })
}
