//! Common re-exports for convenient importing.
//!
//! # Example
//!
//! ```rust,ignore
//! use passlist::prelude::*;
//! ```

pub use crate::config::Config;
pub use crate::core::{matches, reconcile, CandidateStore, HashMethod, Row, SchemaConfig, SiteConfig};
pub use crate::ui::{Browser, BrowserAction, FilterKeys, FilterableList, Heading, UiContext};
