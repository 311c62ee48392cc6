//! Core primitives for passlist (no key handling).

mod matcher;
mod reconcile;
mod site;
mod source;
mod store;

pub use matcher::*;
pub use reconcile::*;
pub use site::*;
pub use source::*;
pub use store::*;
