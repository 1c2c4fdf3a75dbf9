//! Focus containment and restoration.
//!
//! Two pieces cooperate here:
//!
//! - [`FocusTrap`] constrains Tab/Shift+Tab cycling to one container and
//!   restores focus on exit.
//! - [`FocusHistoryStack`] is the bounded record of recently focused
//!   elements that restoration (and any manual save/restore) draws from.
//!
//! The focus singleton (exactly one focused element per document) is the
//! one resource shared across all Operable subsystems. Composing code is
//! expected to keep at most one trap active per document at a time; the
//! trap does not arbitrate contention with other focus writers.

mod history;
mod trap;

pub use history::{DEFAULT_HISTORY_CAPACITY, FocusHistoryStack};
pub use trap::{EscapeCallback, FocusTrap, FocusTrapOptions};
