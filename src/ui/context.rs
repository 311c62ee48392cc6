//! Shared UI context owning the overlay stack.

use std::cell::RefCell;
use std::rc::Rc;

use crossterm::event::KeyEvent;
use futures::future::AbortHandle;

use super::overlay::{BusyOverlay, MessageOverlay, Overlay, OverlayStatus, PromptOverlay};
use crate::core::{PendingSecret, SecretPrompt};

/// Identifies an overlay pushed onto a [`UiContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

#[derive(Debug, Default)]
struct OverlayStack {
    entries: Vec<(OverlayId, Overlay)>,
    next_id: u64,
}

/// Handle to the UI state shared by the browser and in-flight operations.
///
/// Cheap to clone; all clones see the same overlay stack. Single-threaded.
#[derive(Debug, Clone, Default)]
pub struct UiContext {
    overlays: Rc<RefCell<OverlayStack>>,
}

impl UiContext {
    /// Create a context with no overlays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an overlay on top of the stack.
    pub fn push(&self, overlay: Overlay) -> OverlayId {
        let mut stack = self.overlays.borrow_mut();
        let id = OverlayId(stack.next_id);
        stack.next_id += 1;
        stack.entries.push((id, overlay));
        id
    }

    /// Remove an overlay wherever it sits. Returns false if it was already gone.
    pub fn close(&self, id: OverlayId) -> bool {
        let removed = {
            let mut stack = self.overlays.borrow_mut();
            stack
                .entries
                .iter()
                .position(|(entry, _)| *entry == id)
                .map(|pos| stack.entries.remove(pos))
        };
        // dropped outside the borrow in case the overlay wakes a task
        removed.is_some()
    }

    /// Number of open overlays.
    pub fn depth(&self) -> usize {
        self.overlays.borrow().entries.len()
    }

    /// True if no overlay is open.
    pub fn is_clear(&self) -> bool {
        self.depth() == 0
    }

    /// Id of the top overlay.
    pub fn top_id(&self) -> Option<OverlayId> {
        self.overlays.borrow().entries.last().map(|(id, _)| *id)
    }

    /// Inspect the top overlay.
    pub fn with_top<R>(&self, f: impl FnOnce(&Overlay) -> R) -> Option<R> {
        self.overlays.borrow().entries.last().map(|(_, o)| f(o))
    }

    /// Route a key to the top overlay.
    ///
    /// Overlays are modal: while one is open every key is consumed.
    /// Returns the key untouched when the stack is empty.
    pub fn handle_key(&self, key: KeyEvent) -> Option<KeyEvent> {
        let closed = {
            let mut stack = self.overlays.borrow_mut();
            let status = match stack.entries.last_mut() {
                Some((_, overlay)) => overlay.handle_key(key),
                None => return Some(key),
            };
            match status {
                OverlayStatus::Open => None,
                OverlayStatus::Close => stack.entries.pop(),
            }
        };
        drop(closed);
        None
    }

    /// Show a busy box; cancelling it aborts `abort`.
    pub fn show_busy(&self, caption: impl Into<String>, abort: AbortHandle) -> OverlayId {
        self.push(Overlay::Busy(BusyOverlay::new(caption, abort)))
    }

    /// Show a message box.
    pub fn show_message(&self, text: impl Into<String>) -> OverlayId {
        self.push(Overlay::Message(MessageOverlay::new(text)))
    }
}

impl SecretPrompt for UiContext {
    fn reveal(&self, prompt: &str) -> PendingSecret {
        let (answer, pending) = PendingSecret::channel();
        self.push(Overlay::Prompt(PromptOverlay::new(prompt, answer)));
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Cancelled;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::executor::block_on;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn empty_stack_forwards() {
        let ctx = UiContext::new();
        let key = press(KeyCode::Down);
        assert_eq!(ctx.handle_key(key), Some(key));
    }

    #[test]
    fn top_overlay_gets_keys() {
        let ctx = UiContext::new();
        ctx.show_message("first");
        ctx.show_message("second");
        assert_eq!(ctx.depth(), 2);

        assert!(ctx.handle_key(press(KeyCode::Down)).is_none());
        assert_eq!(ctx.depth(), 2);

        ctx.handle_key(press(KeyCode::Enter));
        assert_eq!(ctx.depth(), 1);
        let text = ctx.with_top(|o| match o {
            Overlay::Message(m) => m.text().to_string(),
            _ => String::new(),
        });
        assert_eq!(text.as_deref(), Some("first"));
    }

    #[test]
    fn close_by_id_from_middle() {
        let ctx = UiContext::new();
        let a = ctx.show_message("a");
        let b = ctx.show_message("b");
        assert!(ctx.close(a));
        assert!(!ctx.close(a));
        assert_eq!(ctx.depth(), 1);
        assert!(ctx.close(b));
        assert!(ctx.is_clear());
    }

    #[test]
    fn clones_share_the_stack() {
        let ctx = UiContext::new();
        let other = ctx.clone();
        other.show_message("hi");
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn reveal_goes_through_prompt_overlay() {
        let ctx = UiContext::new();
        let pending = ctx.reveal("Password:");
        assert!(ctx
            .with_top(|o| matches!(o, Overlay::Prompt(p) if p.prompt() == "Password:"))
            .unwrap_or(false));

        ctx.handle_key(press(KeyCode::Char('x')));
        ctx.handle_key(press(KeyCode::Enter));
        assert!(ctx.is_clear());
        assert_eq!(block_on(pending), Ok("x".to_string()));
    }

    #[test]
    fn closing_unanswered_prompt_cancels() {
        let ctx = UiContext::new();
        let pending = ctx.reveal("Password:");
        let id = ctx.top_id().unwrap();
        assert!(ctx.close(id));
        assert_eq!(block_on(pending), Err(Cancelled));
    }
}
