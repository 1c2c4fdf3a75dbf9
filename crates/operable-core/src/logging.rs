//! Logging facilities for Operable.
//!
//! Operable uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```
//!
//! Best-effort failures (a missing restore target, an empty announcement)
//! are emitted as diagnostics on the targets below rather than surfaced as
//! errors; filter on a target to watch one subsystem.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core scheduler target.
    pub const SCHEDULER: &str = "operable_core::scheduler";
    /// UI context target.
    pub const CONTEXT: &str = "operable_core::context";
    /// Focus trap and history target.
    pub const FOCUS: &str = "operable::focus";
    /// Roving tabindex navigation target.
    pub const NAVIGATION: &str = "operable::navigation";
    /// Announcement channel target.
    pub const ANNOUNCE: &str = "operable::announce";
}
