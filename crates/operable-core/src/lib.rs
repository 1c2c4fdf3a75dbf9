//! Core systems for Operable: UI context, injectable clock, cooperative
//! scheduler.
//!
//! This crate carries the runtime plumbing the accessibility primitives in
//! the `operable` crate are built on:
//!
//! - [`UiContext`]: the explicit per-application context that gates every
//!   UI-touching operation (thread affinity + liveness check) and owns the
//!   scheduler.
//! - [`Scheduler`]: deadline-ordered one-shot tasks over an injected
//!   [`Clock`], modeling all timer-chained behavior (focus settling,
//!   live-region writes, announcement pacing).
//! - [`ManualClock`]: a frozen clock for driving delay-dependent code
//!   deterministically in tests.

pub mod clock;
pub mod context;
pub mod error;
pub mod logging;
pub mod scheduler;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use context::{ThreadAffinity, UiContext};
pub use error::ContextError;
pub use scheduler::{Scheduler, TaskId};
