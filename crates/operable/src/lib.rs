//! Operable: runtime primitives for keyboard operability and assistive
//! technology.
//!
//! Interactive widgets need three things a renderer does not provide: Tab
//! cycling that stays inside a modal container, a single keyboard-reachable
//! member per composite widget, and state changes that screen readers
//! actually narrate. Operable implements those as framework-agnostic state
//! machines:
//!
//! - [`FocusTrap`]: constrains Tab/Shift+Tab to one container's focusable
//!   subtree, with controlled entry and focus restoration on exit.
//! - [`RovingNavigator`]: maintains exactly one active member
//!   (`tabindex="0"`) in an ordered collection and moves it on arrow keys.
//! - [`Announcer`] / [`AnnouncementQueue`]: serialize text into live-region
//!   lanes so assistive technology narrates reliably and in order.
//! - [`FocusHistoryStack`]: bounded, deduplicating record of recently
//!   focused elements backing restoration.
//!
//! The crate renders nothing and owns no elements. The composing layer
//! injects a [`FocusHost`] (the rendering layer's view of focusable
//! elements) and an [`AnnouncementPort`] (the output surface for lanes),
//! wires platform key events into [`KeyEvent`]s, and pumps the
//! [`UiContext`] scheduler from its event loop so deferred work such as
//! initial-focus settling and clear-then-set lane writes runs.
//!
//! # Example
//!
//! ```ignore
//! use operable::{FocusTrap, FocusTrapOptions, UiContext};
//!
//! let ctx = UiContext::new();
//! let trap = FocusTrap::new(ctx.clone(), host, dialog, FocusTrapOptions::default());
//! trap.activate()?;
//! // in the event loop: trap.handle_key(&event); ctx.scheduler().run_due();
//! trap.deactivate()?;
//! ```

pub mod announce;
pub mod error;
pub mod focus;
pub mod host;
pub mod keys;
pub mod navigation;

#[cfg(test)]
pub(crate) mod testing;

pub use announce::{
    AnnounceOptions, AnnouncementPort, AnnouncementQueue, Announcer, AnnouncerOptions, LaneRole,
    LaneSpec, Politeness, QueueOptions,
};
pub use error::{AnnounceError, FocusError, NavigationError};
pub use focus::{FocusHistoryStack, FocusTrap, FocusTrapOptions};
pub use host::{FocusHost, FocusId, TabIndex};
pub use keys::{Key, KeyEvent, KeyboardModifiers};
pub use navigation::{NavDirection, Orientation, RovingNavigator, RovingOptions};

pub use operable_core::{Clock, ContextError, ManualClock, MonotonicClock, Scheduler, UiContext};
