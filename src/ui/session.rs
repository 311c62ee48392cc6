//! Query session: turns key events into filter query edits.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys that drive a [`QuerySession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKeys {
    /// Starts composing a query while idle.
    pub trigger: KeyCode,
    /// Clears the query and stops composing.
    pub cancel: KeyCode,
}

impl Default for FilterKeys {
    fn default() -> Self {
        Self {
            trigger: KeyCode::Char('/'),
            cancel: KeyCode::Esc,
        }
    }
}

/// Session state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not filtering; keys go to the list.
    #[default]
    Idle,
    /// Typing a query.
    Composing(String),
}

/// What a key did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Not consumed; hand it to the list control.
    Ignored(KeyEvent),
    /// Composing started with an empty query.
    Started,
    /// The query changed (or was cleared); the filter must be recomputed.
    QueryChanged,
}

/// Idle/Composing state machine.
#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    keys: FilterKeys,
    state: SessionState,
}

impl QuerySession {
    /// Create an idle session.
    pub fn new(keys: FilterKeys) -> Self {
        Self {
            keys,
            state: SessionState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Current query ("" while idle).
    pub fn query(&self) -> &str {
        match &self.state {
            SessionState::Idle => "",
            SessionState::Composing(q) => q,
        }
    }

    /// True while composing.
    pub fn is_composing(&self) -> bool {
        matches!(self.state, SessionState::Composing(_))
    }

    /// Feed one key event.
    pub fn on_key(&mut self, key: KeyEvent) -> SessionOutcome {
        if key.kind == KeyEventKind::Release {
            return SessionOutcome::Ignored(key);
        }

        match &mut self.state {
            SessionState::Idle => {
                if key.code == self.keys.trigger && is_plain(&key) {
                    self.state = SessionState::Composing(String::new());
                    SessionOutcome::Started
                } else {
                    SessionOutcome::Ignored(key)
                }
            }
            SessionState::Composing(_) if key.code == self.keys.cancel => {
                self.state = SessionState::Idle;
                SessionOutcome::QueryChanged
            }
            SessionState::Composing(query) => {
                match key.code {
                    KeyCode::Char(c) if is_plain(&key) => {
                        query.push(c);
                        SessionOutcome::QueryChanged
                    }
                    KeyCode::Backspace => {
                        query.pop();
                        SessionOutcome::QueryChanged
                    }
                    _ => SessionOutcome::Ignored(key),
                }
            }
        }
    }
}

/// No modifiers other than Shift (which is already folded into the char).
pub(super) fn is_plain(key: &KeyEvent) -> bool {
    !key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}
