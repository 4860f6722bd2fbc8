//! Tests for the gpg-agent protocol client

use std::cell::RefCell;

use autosign::agent::{self, AgentError, AgentTransport, PresetCommand};

/// Transport double: records the command and plays back a scripted reply.
struct ScriptedTransport {
    reply: Result<String, AgentError>,
    sent: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            sent: RefCell::new(Vec::new()),
        }
    }

    fn failing(err: AgentError) -> Self {
        Self {
            reply: Err(err),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl AgentTransport for ScriptedTransport {
    fn round_trip(&self, command: &str) -> Result<String, AgentError> {
        self.sent.borrow_mut().push(command.to_string());
        self.reply.clone()
    }
}

#[test]
fn test_preset_command_literal_shape() {
    let command = PresetCommand::new("X", b"ab");
    assert_eq!(command.as_line(), "PRESET_PASSPHRASE X -1 6162");
}

#[test]
fn test_preset_command_hex_is_uppercase() {
    let command = PresetCommand::new("449972AC9FF11BCABEED8A7AE834C4349CC4DBFF", &[0xDE, 0xAD]);
    assert_eq!(
        command.as_line(),
        "PRESET_PASSPHRASE 449972AC9FF11BCABEED8A7AE834C4349CC4DBFF -1 DEAD"
    );
}

#[test]
fn test_preset_command_handles_non_utf8_passphrase() {
    let command = PresetCommand::new("X", &[0x00, 0xFF, 0x10]);
    assert_eq!(command.as_line(), "PRESET_PASSPHRASE X -1 00FF10");
}

#[test]
fn test_preset_command_debug_hides_passphrase() {
    let command = PresetCommand::new("X", b"hunter2");
    let rendered = format!("{command:?}");
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains(&hex::encode_upper(b"hunter2")));
}

#[test]
fn test_preset_ok_reply_yields_session() {
    let transport = ScriptedTransport::replying("OK");
    let session = agent::preset_passphrase(&transport, "GRIPGRIP", b"secret").unwrap();
    assert_eq!(session.keygrip(), "GRIPGRIP");

    let sent = transport.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0], format!("PRESET_PASSPHRASE GRIPGRIP -1 {}", hex::encode_upper(b"secret")));
}

#[test]
fn test_preset_accepts_ok_with_trailing_text() {
    let transport = ScriptedTransport::replying("OK closing connection");
    assert!(agent::preset_passphrase(&transport, "G", b"p").is_ok());
}

#[test]
fn test_non_ok_reply_is_rejected_with_raw_reply() {
    let raw = "ERR 67108922 No such option <GPG Agent>";
    let transport = ScriptedTransport::replying(raw);
    let err = agent::preset_passphrase(&transport, "G", b"p").unwrap_err();
    assert_eq!(err, AgentError::Rejected(raw.to_string()));
}

#[test]
fn test_transport_failure_propagates_unreachable() {
    let transport = ScriptedTransport::failing(AgentError::Unreachable("no agent".to_string()));
    let err = agent::preset_passphrase(&transport, "G", b"p").unwrap_err();
    assert_eq!(err, AgentError::Unreachable("no agent".to_string()));
}
