//! Parser for the GnuPG colon-delimited key-listing format
//!
//! `gpg --with-colons` emits one record per line, fields separated by `:`.
//! A typical secret-key listing looks like:
//!
//! ```text
//! sec:-:4096:1:27304EDD6079B81C:1637342753:::-:::scESC:::+:::23::0:
//! fpr:::::::::88966A5B8C01BD04F3DA440427304EDD6079B81C:
//! grp:::::::::449972AC9FF11BCABEED8A7AE834C4349CC4DBFF:
//! uid:-::::1637342753::B3B0B2247600E80BAB9D4802D5CF0AFC477DE016::A committer <committer@example.com>::::::::::0:
//! ssb:-:4096:1:5B6BDD35BEDFBF6F:1637342753::::::e:::+:::23:
//! fpr:::::::::B1D4A2483D1D2A02416BE0775B6BDD35BEDFBF6F:
//! grp:::::::::97D36F5B8F5BECDA8A1923FC00D11C7C438584F9:
//! ```
//!
//! Parsing is purely lexical: each non-empty line becomes exactly one
//! [`Record`]. Interpreting records across lines (which keygrip belongs to
//! which fingerprint) is the job of [`crate::keyring::descriptor`].
//!
//! Format reference: <https://github.com/gpg/gnupg/blob/master/doc/DETAILS>

/// Field index carrying the identifying value of `fpr`, `grp` and `uid`
/// records in the colon format.
pub const VALUE_FIELD: usize = 9;

/// The kind of a listing record, selected by its first field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordTag {
    /// `sec` - secret primary key header
    SecretKey,
    /// `ssb` - secret subkey header
    Subkey,
    /// `fpr` - fingerprint of the preceding key header
    Fingerprint,
    /// `grp` - keygrip of the preceding key header
    Keygrip,
    /// `uid` - user identity attached to the current key
    UserId,
    /// Any other first field, or a known tag with too few fields to carry
    /// its value. Never dropped: callers must be able to notice output from
    /// a gpg version this parser does not know about.
    Unrecognized,
}

/// A single parsed listing line: its tag plus the raw positional fields.
///
/// Empty fields are preserved; position is meaningful in this format, so a
/// zero-length field is not the same as a missing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record kind, from the first field.
    pub tag: RecordTag,
    /// All fields of the line, in order, including empty ones.
    pub fields: Vec<String>,
}

impl Record {
    /// Parse one listing line.
    #[must_use]
    pub fn from_line(line: &str) -> Self {
        let fields: Vec<String> = line.split(':').map(str::to_string).collect();

        let tag = match fields.first().map(String::as_str) {
            Some("sec") => RecordTag::SecretKey,
            Some("ssb") => RecordTag::Subkey,
            Some("fpr") => RecordTag::Fingerprint,
            Some("grp") => RecordTag::Keygrip,
            Some("uid") => RecordTag::UserId,
            _ => RecordTag::Unrecognized,
        };

        // Value-bearing tags need the value field to actually exist.
        // A truncated line is surfaced as Unrecognized, never indexed.
        let tag = match tag {
            RecordTag::Fingerprint | RecordTag::Keygrip | RecordTag::UserId
                if fields.len() <= VALUE_FIELD =>
            {
                RecordTag::Unrecognized
            },
            other => other,
        };

        Self { tag, fields }
    }

    /// The identifying value of this record (fingerprint, keygrip or uid
    /// string), if the tag carries one.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self.tag {
            RecordTag::Fingerprint | RecordTag::Keygrip | RecordTag::UserId => {
                self.fields.get(VALUE_FIELD).map(String::as_str)
            },
            _ => None,
        }
    }
}

/// Parse a full key listing into a lazy sequence of records.
///
/// Every non-empty input line yields exactly one record; unknown or
/// truncated lines yield [`RecordTag::Unrecognized`] rather than being
/// skipped.
pub fn parse(listing: &str) -> impl Iterator<Item = Record> + '_ {
    listing.lines().filter(|line| !line.is_empty()).map(Record::from_line)
}
