//! Forwarding clicks to the operating system as real keystrokes.

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tracing::{info, warn};

use key_layout::KeyAction;

use crate::error::{Error, Result};

// ════════════════════════════════════════════════════════════════════════════
// KeySink — abstraction over enigo / null / recording (for testing)
// ════════════════════════════════════════════════════════════════════════════

pub trait KeySink {
    fn send(&mut self, action: &KeyAction) -> Result<()>;
}

/// The OS key to press for an action, or `None` for buffer-only actions.
///
/// Letters are typed lowercase, as a plain (unshifted) key press would.
pub fn os_key(action: &KeyAction) -> Option<Key> {
    match *action {
        KeyAction::Char(c)   => Some(Key::Unicode(c.to_lowercase().next().unwrap_or(c))),
        KeyAction::Space     => Some(Key::Space),
        KeyAction::Backspace => Some(Key::Backspace),
        KeyAction::Clear     => None,
    }
}

// ── enigo backend ─────────────────────────────────────────────────────────

pub struct EnigoSink {
    enigo: Enigo,
}

impl EnigoSink {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| Error::Keystroke(e.to_string()))?;
        Ok(EnigoSink { enigo })
    }
}

impl KeySink for EnigoSink {
    fn send(&mut self, action: &KeyAction) -> Result<()> {
        let Some(key) = os_key(action) else { return Ok(()) };
        self.enigo.key(key, Direction::Press)
            .and_then(|_| self.enigo.key(key, Direction::Release))
            .map_err(|e| Error::Keystroke(e.to_string()))
    }
}

// ── null backend (injection disabled or unavailable) ──────────────────────

pub struct NullSink;

impl KeySink for NullSink {
    fn send(&mut self, _action: &KeyAction) -> Result<()> { Ok(()) }
}

// ── recording backend ─────────────────────────────────────────────────────

/// Keeps every forwarded action; handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub sent: Vec<KeyAction>,
}

impl KeySink for RecordingSink {
    fn send(&mut self, action: &KeyAction) -> Result<()> {
        self.sent.push(*action);
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_key_sink — pick a backend
// ════════════════════════════════════════════════════════════════════════════

/// Open the OS keyboard backend when `inject` is set.
/// Falls back to `NullSink` with a warning if it cannot be opened.
pub fn open_key_sink(inject: bool) -> Box<dyn KeySink> {
    if !inject {
        info!("keystroke injection disabled; typing only into the on-screen buffer");
        return Box::new(NullSink);
    }
    match EnigoSink::new() {
        Ok(sink) => {
            info!("keystroke injection enabled");
            Box::new(sink)
        }
        Err(e) => {
            warn!(error = %e, "cannot open OS keyboard backend; using null output");
            Box::new(NullSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_are_lowercased() {
        assert_eq!(os_key(&KeyAction::Char('Q')), Some(Key::Unicode('q')));
        assert_eq!(os_key(&KeyAction::Char(';')), Some(Key::Unicode(';')));
    }

    #[test]
    fn command_keys_map_to_os_keys() {
        assert_eq!(os_key(&KeyAction::Space),     Some(Key::Space));
        assert_eq!(os_key(&KeyAction::Backspace), Some(Key::Backspace));
        assert_eq!(os_key(&KeyAction::Clear),     None);
    }

    #[test]
    fn disabled_injection_uses_null_sink() {
        let mut sink = open_key_sink(false);
        assert!(sink.send(&KeyAction::Char('A')).is_ok());
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.send(&KeyAction::Char('A')).unwrap();
        sink.send(&KeyAction::Space).unwrap();
        assert_eq!(sink.sent, vec![KeyAction::Char('A'), KeyAction::Space]);
    }
}
