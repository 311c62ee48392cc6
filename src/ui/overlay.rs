//! Modal overlays: secret prompt, busy indicator, message box.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use futures::future::AbortHandle;

use super::session::is_plain;
use crate::core::SecretSender;

/// Whether an overlay stays open after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayStatus {
    /// Keep the overlay on the stack.
    Open,
    /// Pop the overlay.
    Close,
}

/// Masked single-line secret entry.
#[derive(Debug)]
pub struct PromptOverlay {
    prompt: String,
    input: String,
    answer: Option<SecretSender>,
}

impl PromptOverlay {
    /// Create a prompt that answers through `answer`.
    pub fn new(prompt: impl Into<String>, answer: SecretSender) -> Self {
        Self {
            prompt: prompt.into(),
            input: String::new(),
            answer: Some(answer),
        }
    }

    /// Prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Input with every character replaced by `*`.
    pub fn masked_input(&self) -> String {
        "*".repeat(self.input.chars().count())
    }

    fn handle_key(&mut self, key: KeyEvent) -> OverlayStatus {
        match key.code {
            KeyCode::Enter => {
                if let Some(answer) = self.answer.take() {
                    answer.reveal(std::mem::take(&mut self.input));
                }
                OverlayStatus::Close
            }
            KeyCode::Esc => {
                if let Some(answer) = self.answer.take() {
                    answer.cancel();
                }
                OverlayStatus::Close
            }
            KeyCode::Backspace => {
                self.input.pop();
                OverlayStatus::Open
            }
            KeyCode::Char(c) if is_plain(&key) => {
                self.input.push(c);
                OverlayStatus::Open
            }
            _ => OverlayStatus::Open,
        }
    }
}

/// "Working..." box with a cancel button.
#[derive(Debug)]
pub struct BusyOverlay {
    caption: String,
    abort: AbortHandle,
}

impl BusyOverlay {
    /// Create a busy box that aborts `abort` when cancelled.
    pub fn new(caption: impl Into<String>, abort: AbortHandle) -> Self {
        Self {
            caption: caption.into(),
            abort,
        }
    }

    /// Caption text.
    pub fn caption(&self) -> &str {
        &self.caption
    }

    fn handle_key(&mut self, key: KeyEvent) -> OverlayStatus {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.abort.abort();
                OverlayStatus::Close
            }
            _ => OverlayStatus::Open,
        }
    }
}

/// Text box dismissed with Enter or Esc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOverlay {
    text: String,
}

impl MessageOverlay {
    /// Create a message box.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn handle_key(&mut self, key: KeyEvent) -> OverlayStatus {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => OverlayStatus::Close,
            _ => OverlayStatus::Open,
        }
    }
}

/// Any overlay the context can show.
#[derive(Debug)]
pub enum Overlay {
    /// Secret prompt.
    Prompt(PromptOverlay),
    /// Busy indicator.
    Busy(BusyOverlay),
    /// Message box.
    Message(MessageOverlay),
}

impl Overlay {
    /// Feed a key press to the overlay.
    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayStatus {
        if key.kind == KeyEventKind::Release {
            return OverlayStatus::Open;
        }
        match self {
            Overlay::Prompt(prompt) => prompt.handle_key(key),
            Overlay::Busy(busy) => busy.handle_key(key),
            Overlay::Message(message) => message.handle_key(key),
        }
    }
}
