//! gpg-agent protocol client
//!
//! The signing agent is a long-lived local process holding unlocked key
//! material; it speaks a line-based request/reply protocol. This module
//! builds the `PRESET_PASSPHRASE` command that seeds the agent's passphrase
//! cache so a later `git commit -S` never prompts, sends it through
//! `gpg-connect-agent`, and classifies the reply.
//!
//! One command, one round trip: the channel is not held open across
//! commands. A rejected preset is not retried - an identical retry cannot
//! succeed, and hammering a real agent risks lockout policies.

use std::process::Command;

use thiserror::Error;
use zeroize::Zeroizing;

/// Protocol verb for seeding the agent's passphrase cache.
const PRESET_VERB: &str = "PRESET_PASSPHRASE";

/// Cache lifetime sentinel: `-1` means "until the agent restarts".
const CACHE_FOREVER: &str = "-1";

/// Errors talking to the signing agent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// The agent process could not be reached at all.
    #[error("signing agent unreachable: {0}")]
    Unreachable(String),

    /// The agent answered with something other than `OK`. Carries the raw
    /// reply line. Fatal for the current signing attempt.
    #[error("signing agent rejected command: {0}")]
    Rejected(String),
}

/// A single `PRESET_PASSPHRASE` command line.
///
/// The passphrase travels as uppercase hex of its raw bytes - the agent
/// protocol never accepts passphrases in plain text on the command channel,
/// where they could collide with protocol delimiters. The built line is
/// wiped from memory on drop; construct it immediately before sending and
/// let it go out of scope right after.
pub struct PresetCommand {
    line: Zeroizing<String>,
}

impl std::fmt::Debug for PresetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetCommand").finish_non_exhaustive()
    }
}

impl PresetCommand {
    /// Build the command for a keygrip and raw passphrase bytes.
    #[must_use]
    pub fn new(keygrip: &str, passphrase: &[u8]) -> Self {
        let encoded = Zeroizing::new(hex::encode_upper(passphrase));
        Self {
            line: Zeroizing::new(format!(
                "{PRESET_VERB} {keygrip} {CACHE_FOREVER} {}",
                encoded.as_str()
            )),
        }
    }

    /// The full command line, ready for the agent channel.
    #[must_use]
    pub fn as_line(&self) -> &str {
        &self.line
    }
}

/// Proof that a passphrase was preset for one keygrip.
///
/// The agent's passphrase cache is process-wide state; handing this token
/// to the commit collaborator makes that dependency explicit in the type
/// signature instead of implicit in the environment. Obtainable only via
/// [`preset_passphrase`].
#[derive(Clone)]
pub struct AgentSession {
    keygrip: String,
}

impl std::fmt::Debug for AgentSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSession").finish_non_exhaustive()
    }
}

impl AgentSession {
    /// The keygrip whose passphrase the agent now holds.
    #[must_use]
    pub fn keygrip(&self) -> &str {
        &self.keygrip
    }
}

/// Transport carrying one command line to the agent and returning its
/// first reply line.
pub trait AgentTransport {
    /// Send `command` and return the agent's reply line.
    fn round_trip(&self, command: &str) -> Result<String, AgentError>;
}

/// Real transport: `gpg-connect-agent '<command>' /bye`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpgConnectAgent;

impl GpgConnectAgent {
    /// Create the transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AgentTransport for GpgConnectAgent {
    fn round_trip(&self, command: &str) -> Result<String, AgentError> {
        let output = Command::new("gpg-connect-agent")
            .arg(command)
            .arg("/bye")
            .output()
            .map_err(|e| AgentError::Unreachable(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                AgentError::Unreachable(String::from_utf8_lossy(&output.stderr).to_string())
            })
    }
}

/// Preset the passphrase for `keygrip` in the agent's cache.
///
/// Builds the command, performs one round trip, and interprets the reply:
/// a leading `OK` token is success, anything else is [`AgentError::Rejected`]
/// carrying the raw reply. Returns the session token proving the preset
/// happened.
pub fn preset_passphrase(
    transport: &dyn AgentTransport,
    keygrip: &str,
    passphrase: &[u8],
) -> Result<AgentSession, AgentError> {
    let command = PresetCommand::new(keygrip, passphrase);
    let reply = transport.round_trip(command.as_line())?;

    if reply.split_whitespace().next() == Some("OK") {
        log::debug!("agent accepted passphrase preset");
        Ok(AgentSession {
            keygrip: keygrip.to_string(),
        })
    } else {
        Err(AgentError::Rejected(reply))
    }
}
