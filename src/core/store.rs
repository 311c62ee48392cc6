//! Candidate universe and shared row handles.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;

/// One filterable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<P> {
    /// Unique key, also the sort key.
    pub label: String,
    /// Opaque data passed through to the host.
    pub payload: P,
}

/// Candidate plus the transient UI state attached to its row.
#[derive(Debug)]
struct RowData<P> {
    candidate: Candidate<P>,
    marked: Cell<bool>,
}

/// Shared handle to a row.
///
/// Equality and hashing go by handle identity, not content: two rows built
/// from equal candidates are different rows. Anything the host attaches
/// to a row survives filtering for as long as this handle stays visible.
pub struct Row<P>(Rc<RowData<P>>);

impl<P> Row<P> {
    /// Wrap a candidate in a fresh row.
    pub fn new(label: impl Into<String>, payload: P) -> Self {
        Self(Rc::new(RowData {
            candidate: Candidate {
                label: label.into(),
                payload,
            },
            marked: Cell::new(false),
        }))
    }

    /// The row's label.
    pub fn label(&self) -> &str {
        &self.0.candidate.label
    }

    /// The row's payload.
    pub fn payload(&self) -> &P {
        &self.0.candidate.payload
    }

    /// Whether the row is marked.
    pub fn is_marked(&self) -> bool {
        self.0.marked.get()
    }

    /// Set the mark flag.
    pub fn set_marked(&self, marked: bool) {
        self.0.marked.set(marked);
    }

    /// True if both handles point at the same row.
    pub fn same_row(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<P> Deref for Row<P> {
    type Target = Candidate<P>;

    fn deref(&self) -> &Self::Target {
        &self.0.candidate
    }
}

impl<P> Clone for Row<P> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P> PartialEq for Row<P> {
    fn eq(&self, other: &Self) -> bool {
        self.same_row(other)
    }
}

impl<P> Eq for Row<P> {}

impl<P> Hash for Row<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl<P: fmt::Debug> fmt::Debug for Row<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("label", &self.label())
            .field("marked", &self.is_marked())
            .finish()
    }
}

/// All candidates, keyed and ordered by label.
#[derive(Debug)]
pub struct CandidateStore<P> {
    rows: BTreeMap<String, Row<P>>,
}

impl<P> Default for CandidateStore<P> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<P> CandidateStore<P> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(label, payload)` pairs. Later duplicates win.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.extend(pairs);
        store
    }

    /// Insert or overwrite candidates.
    ///
    /// Returns the rows that were replaced by a colliding label.
    pub fn extend<I, S>(&mut self, pairs: I) -> Vec<Row<P>>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
    {
        let mut replaced = Vec::new();
        for (label, payload) in pairs {
            let row = Row::new(label, payload);
            if let Some(old) = self.rows.insert(row.label.clone(), row) {
                replaced.push(old);
            }
        }
        replaced
    }

    /// Look up a row by label.
    pub fn get(&self, label: &str) -> Option<&Row<P>> {
        self.rows.get(label)
    }

    /// True if a candidate with `label` exists.
    pub fn contains(&self, label: &str) -> bool {
        self.rows.contains_key(label)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending label order.
    pub fn rows(&self) -> impl Iterator<Item = &Row<P>> {
        self.rows.values()
    }
}
