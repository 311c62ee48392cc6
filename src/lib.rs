//! passlist - keystroke-filterable site and schema lists for a terminal
//! password manager front end.
//!
//! The list narrows as the user types: a query matches a label when every
//! character of the query occurs in the label at least as often, in any
//! order. The visible rows are updated in place, so focus and marks attached
//! to a row survive filtering.
//!
//! # Quick Start
//!
//! ```rust
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//! use passlist::prelude::*;
//!
//! let mut list = FilterableList::new(
//!     [("apple", ()), ("apply", ()), ("banana", ())],
//!     FilterKeys::default(),
//! );
//! for c in "/app".chars() {
//!     list.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
//! }
//! let labels: Vec<&str> = list.visible().iter().map(|r| r.label()).collect();
//! assert_eq!(labels, ["apple", "apply"]);
//! ```

#![deny(missing_docs)]

pub mod config;
pub mod core;
pub mod metrics;
pub mod prelude;
pub mod ui;
