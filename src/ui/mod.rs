//! Key-driven list controls and overlays.

mod browser;
mod context;
mod list;
mod overlay;
mod session;

pub use browser::{load_hashed_sites, Browser, BrowserAction, Heading, LoadError, HASHED_SITES_PROMPT};
pub use context::{OverlayId, UiContext};
pub use list::{FilterableList, DEFAULT_PAGE_SIZE};
pub use overlay::{BusyOverlay, MessageOverlay, Overlay, OverlayStatus, PromptOverlay};
pub use session::{FilterKeys, QuerySession, SessionOutcome, SessionState};
