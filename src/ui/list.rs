//! Keystroke-filterable list of candidates.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::session::{FilterKeys, QuerySession, SessionOutcome, SessionState};
use crate::core::{reconcile, CandidateStore, CharCounts, Edits, Row};
use crate::metrics::Timer;

/// Default rows moved by PageUp/PageDown.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A candidate list narrowed live by a typed query.
///
/// The visible list always equals the store's rows matching the current
/// query, in label order. It is updated in place, so row handles (and the
/// marks and focus tied to them) survive as long as the row stays visible.
#[derive(Debug)]
pub struct FilterableList<P> {
    store: CandidateStore<P>,
    session: QuerySession,
    visible: Vec<Row<P>>,
    focus: Option<Row<P>>,
    focus_idx: usize,
    page_size: usize,
}

impl<P> FilterableList<P> {
    /// Create a list over `universe`, showing everything.
    pub fn new<I, S>(universe: I, keys: FilterKeys) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        let mut list = Self {
            store: CandidateStore::new(),
            session: QuerySession::new(keys),
            visible: Vec::new(),
            focus: None,
            focus_idx: 0,
            page_size: DEFAULT_PAGE_SIZE,
        };
        list.attach(universe);
        list
    }

    /// Set the PageUp/PageDown step.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replace the whole universe. The query is kept.
    pub fn attach<I, S>(&mut self, universe: I)
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        self.store = CandidateStore::from_pairs(universe);
        self.visible.clear();
        self.focus = None;
        self.focus_idx = 0;
        self.recompute();
    }

    /// Merge new candidates in; colliding labels are overwritten.
    pub fn add_candidates<I, S>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        let before = self.store.len();
        let replaced = self.store.extend(candidates);

        if !replaced.is_empty() {
            // Overwritten rows are new rows under an old label; drop the
            // stale handles so the reconcile sees a plain refinement.
            let stale: HashSet<Row<P>> = replaced.iter().cloned().collect();
            self.visible.retain(|row| !stale.contains(row));
            let refocus = self
                .focus
                .as_ref()
                .filter(|focus| stale.contains(*focus))
                .map(|focus| focus.label().to_string());
            if let Some(label) = refocus {
                self.focus = self.store.get(&label).cloned();
            }
        }

        tracing::info!(
            added = self.store.len() - before,
            replaced = replaced.len(),
            total = self.store.len(),
            "candidates added"
        );
        self.recompute();
    }

    /// Handle a key. Returns it if neither the query nor the list used it.
    pub fn on_key(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        match self.session.on_key(key) {
            SessionOutcome::Ignored(key) => self.list_key(key),
            SessionOutcome::Started => None,
            SessionOutcome::QueryChanged => {
                self.recompute();
                None
            }
        }
    }

    /// List-control keys: movement and marking.
    fn list_key(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if key.kind == KeyEventKind::Release || !key.modifiers.is_empty() {
            return Some(key);
        }
        let last = match self.visible.len() {
            0 => return Some(key),
            n => n - 1,
        };

        let target = match key.code {
            KeyCode::Up => self.focus_idx.saturating_sub(1),
            KeyCode::Down => self.focus_idx.saturating_add(1).min(last),
            KeyCode::PageUp => self.focus_idx.saturating_sub(self.page_size),
            KeyCode::PageDown => self.focus_idx.saturating_add(self.page_size).min(last),
            KeyCode::Home => 0,
            KeyCode::End => last,
            KeyCode::Char(' ') => {
                self.toggle_mark();
                return None;
            }
            _ => return Some(key),
        };
        self.set_focus_index(target);
        None
    }

    /// Rows currently shown, in label order.
    pub fn visible(&self) -> &[Row<P>] {
        &self.visible
    }

    /// Current query ("" when not filtering).
    pub fn query(&self) -> &str {
        self.session.query()
    }

    /// True while the user is composing a query.
    pub fn is_filtering(&self) -> bool {
        self.session.is_composing()
    }

    /// Session state.
    pub fn session_state(&self) -> &SessionState {
        self.session.state()
    }

    /// The full candidate universe.
    pub fn store(&self) -> &CandidateStore<P> {
        &self.store
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Returns true if no rows are visible.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// The focused row, if any row is visible.
    pub fn focused(&self) -> Option<&Row<P>> {
        self.focus.as_ref()
    }

    /// Position of the focused row in [`visible`](Self::visible).
    pub fn focused_index(&self) -> Option<usize> {
        self.focus.as_ref().map(|_| self.focus_idx)
    }

    /// Focus the row at `idx` (clamped).
    pub fn set_focus_index(&mut self, idx: usize) {
        if self.visible.is_empty() {
            self.focus = None;
            self.focus_idx = 0;
            return;
        }
        self.focus_idx = idx.min(self.visible.len() - 1);
        self.focus = Some(self.visible[self.focus_idx].clone());
    }

    /// Flip the mark on the focused row. Returns the new state.
    pub fn toggle_mark(&mut self) -> Option<bool> {
        let row = self.focus.as_ref()?;
        let marked = !row.is_marked();
        row.set_marked(marked);
        Some(marked)
    }

    /// Labels of all marked rows, visible or not, in label order.
    pub fn marked_labels(&self) -> Vec<String> {
        self.store
            .rows()
            .filter(|row| row.is_marked())
            .map(|row| row.label().to_string())
            .collect()
    }

    /// Mark the rows named in `labels`. Unknown labels are skipped.
    ///
    /// Returns how many rows were marked.
    pub fn restore_marks<S: AsRef<str>>(&mut self, labels: &[S]) -> usize {
        let mut restored = 0;
        for label in labels {
            if let Some(row) = self.store.get(label.as_ref()) {
                row.set_marked(true);
                restored += 1;
            }
        }
        restored
    }

    /// Recompute the matching rows and reconcile the visible list.
    fn recompute(&mut self) -> Edits {
        let _timer = Timer::start("filter_recompute");

        let counts = CharCounts::new(self.session.query());
        let matching: Vec<Row<P>> = self
            .store
            .rows()
            .filter(|row| counts.fits_in(row.label()))
            .cloned()
            .collect();

        let edits = reconcile(&matching, &mut self.visible);
        self.refocus();

        tracing::debug!(
            query = self.session.query(),
            visible = self.visible.len(),
            inserted = edits.inserted,
            removed = edits.removed,
            "filter recomputed"
        );
        edits
    }

    /// Keep focus on the same row if it survived, else on its old position.
    fn refocus(&mut self) {
        let survivor = self
            .focus
            .as_ref()
            .and_then(|focus| self.visible.iter().position(|row| row == focus));
        match survivor {
            Some(idx) => self.focus_idx = idx,
            None => self.set_focus_index(self.focus_idx),
        }
    }
}
