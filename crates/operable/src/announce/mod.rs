//! Announcement channel for assistive technology.
//!
//! Screen readers narrate a live region only when its text content
//! *mutates*; setting identical text twice without an intervening clear is
//! silently swallowed, and overlapping writes garble speech. The
//! [`Announcer`] therefore serializes every write as clear → (settle delay)
//! → set, and the [`AnnouncementQueue`](crate::announce::AnnouncementQueue)
//! paces successive messages so they never overlap.
//!
//! Output goes through a narrow [`AnnouncementPort`], injected by the
//! composing layer. A port may mutate DOM nodes, push AccessKit tree
//! updates (see [`accesskit_support`](crate::announce::accesskit_support)),
//! or just record writes in tests; the serialization logic is identical.
//!
//! Announcement is best-effort UX: an empty message or the "off" level
//! degrades to a diagnostic no-op, never an error.

mod queue;

pub use queue::{AnnouncementQueue, DEFAULT_QUEUE_INTERVAL, QueueOptions};

#[cfg(feature = "accesskit")]
pub mod accesskit_support;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use operable_core::scheduler::TaskId;
use operable_core::{UiContext, logging::targets};
use parking_lot::Mutex;

use crate::error::AnnounceError;

/// Politeness level of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Politeness {
    /// Queued behind current speech, non-interrupting.
    Polite,
    /// Interrupts current speech.
    Assertive,
    /// Suppressed entirely; a sink, not a lane.
    Off,
}

impl Politeness {
    /// The live-region attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
            Self::Off => "off",
        }
    }
}

/// Region role of an output lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneRole {
    /// Non-interrupting status region.
    Status,
    /// Interrupting alert region.
    Alert,
}

impl LaneRole {
    /// The role attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Alert => "alert",
        }
    }
}

/// The wire-level contract one lane presents to assistive technology.
///
/// Must be reproduced bit-exact by ports for AT compatibility: the role
/// ("status", or "alert" for the assertive case), the live-region politeness
/// matching the lane, and the atomicity flag set so AT reads the whole
/// region text on every mutation. Ports additionally keep lanes visually
/// hidden but AT-reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSpec {
    /// The lane this spec describes.
    pub politeness: Politeness,
    /// The region role.
    pub role: LaneRole,
    /// Whether AT reads the entire region on each mutation. Always `true`.
    pub atomic: bool,
}

impl LaneSpec {
    /// The spec for a politeness level's lane. `Off` has no lane.
    pub fn for_lane(politeness: Politeness) -> Option<Self> {
        let role = match politeness {
            Politeness::Polite => LaneRole::Status,
            Politeness::Assertive => LaneRole::Alert,
            Politeness::Off => return None,
        };
        Some(Self {
            politeness,
            role,
            atomic: true,
        })
    }
}

/// Output surface for announcement lanes.
///
/// Implementations own the actual regions (DOM nodes, AccessKit nodes, a
/// test log). All calls arrive on the UI thread; `create_lane` is
/// idempotent per lane.
pub trait AnnouncementPort: Send + Sync {
    /// Create the region for a lane if it does not exist yet.
    fn create_lane(&self, spec: &LaneSpec);

    /// Replace the lane's displayed text. An empty `text` clears the lane.
    fn publish(&self, lane: Politeness, text: &str);

    /// Tear the lane's region down.
    fn remove_lane(&self, lane: Politeness);
}

/// Settle delay between clearing a lane and setting its new text.
///
/// Carried over from observed AT behavior; no documented timing
/// justification exists, which is why it is configurable per announcer.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(10);

/// Default outer debounce before a write begins.
pub const DEFAULT_ANNOUNCE_DELAY: Duration = Duration::from_millis(150);

/// Configuration for an [`Announcer`].
#[derive(Debug, Clone, Copy)]
pub struct AnnouncerOptions {
    /// Delay between the clear and the set of a lane write.
    pub settle_delay: Duration,
    /// Outer debounce applied when a call does not pass an explicit delay.
    pub announce_delay: Duration,
}

impl Default for AnnouncerOptions {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            announce_delay: DEFAULT_ANNOUNCE_DELAY,
        }
    }
}

/// Per-call options for [`Announcer::announce`].
#[derive(Debug, Clone, Copy)]
pub struct AnnounceOptions {
    /// Target lane.
    pub politeness: Politeness,
    /// Overrides the announcer's outer debounce. `Some(Duration::ZERO)`
    /// bypasses the debounce entirely; the inner settle still applies.
    pub delay: Option<Duration>,
    /// Clear the lane before setting the new text so identical consecutive
    /// messages still mutate content. On by default.
    pub clear_previous: bool,
}

impl Default for AnnounceOptions {
    fn default() -> Self {
        Self {
            politeness: Politeness::Polite,
            delay: None,
            clear_previous: true,
        }
    }
}

impl AnnounceOptions {
    /// Options targeting the polite lane.
    pub fn polite() -> Self {
        Self::default()
    }

    /// Options targeting the assertive lane.
    pub fn assertive() -> Self {
        Self {
            politeness: Politeness::Assertive,
            ..Self::default()
        }
    }

    /// Override the outer debounce.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Bypass the outer debounce.
    pub fn immediate(self) -> Self {
        self.with_delay(Duration::ZERO)
    }
}

/// Per-lane bookkeeping.
#[derive(Debug, Default)]
struct LaneState {
    /// Pending outer-debounce task for this lane.
    pending_write: Option<TaskId>,
    /// Pending settle task (the set half of a clear→set write).
    pending_set: Option<TaskId>,
}

#[derive(Default)]
struct AnnouncerState {
    /// Lazily created lanes, keyed by politeness. `Off` never appears here.
    lanes: HashMap<Politeness, LaneState>,
}

struct AnnouncerInner {
    context: Arc<UiContext>,
    port: Arc<dyn AnnouncementPort>,
    options: AnnouncerOptions,
    state: Mutex<AnnouncerState>,
}

/// Delivers text to assistive technology reliably and in order.
///
/// Cheap to clone; clones share the same lanes and pending writes.
#[derive(Clone)]
pub struct Announcer {
    inner: Arc<AnnouncerInner>,
}

impl Announcer {
    /// Create an announcer over `port` with default options.
    pub fn new(context: Arc<UiContext>, port: Arc<dyn AnnouncementPort>) -> Self {
        Self::with_options(context, port, AnnouncerOptions::default())
    }

    /// Create an announcer with explicit delays.
    pub fn with_options(
        context: Arc<UiContext>,
        port: Arc<dyn AnnouncementPort>,
        options: AnnouncerOptions,
    ) -> Self {
        Self {
            inner: Arc::new(AnnouncerInner {
                context,
                port,
                options,
                state: Mutex::new(AnnouncerState::default()),
            }),
        }
    }

    /// Eagerly create the polite and assertive lanes.
    ///
    /// Lanes are otherwise created lazily on first use; calling `init`
    /// repeatedly is safe and does nothing the second time.
    pub fn init(&self) -> Result<(), AnnounceError> {
        self.inner.context.ensure_live("Announcer::init")?;
        let mut state = self.inner.state.lock();
        for lane in [Politeness::Polite, Politeness::Assertive] {
            Self::ensure_lane(&self.inner, &mut state, lane);
        }
        Ok(())
    }

    /// Announce `message` on the lane selected by `options`.
    ///
    /// The write is serialized as clear → settle delay → set; a newer write
    /// to the same lane supersedes a pending one. An empty or
    /// whitespace-only message, or the `Off` level, is a diagnostic no-op.
    pub fn announce(&self, message: &str, options: AnnounceOptions) -> Result<(), AnnounceError> {
        let inner = &self.inner;
        inner.context.ensure_live("Announcer::announce")?;

        let text = message.trim();
        if text.is_empty() {
            tracing::debug!(target: targets::ANNOUNCE, "empty announcement dropped");
            return Ok(());
        }
        let lane = options.politeness;
        if lane == Politeness::Off {
            tracing::debug!(target: targets::ANNOUNCE, message = text, "announcement to the off lane dropped");
            return Ok(());
        }

        let mut state = inner.state.lock();
        Self::ensure_lane(inner, &mut state, lane);
        Self::cancel_pending(inner, &mut state, lane);

        let outer_delay = options.delay.unwrap_or(inner.options.announce_delay);
        let text = text.to_string();
        if outer_delay.is_zero() {
            drop(state);
            Self::begin_write(inner, lane, &text, options.clear_previous);
        } else {
            let weak = Arc::downgrade(inner);
            let clear_previous = options.clear_previous;
            let task = inner.context.defer(outer_delay, move || {
                let Some(inner) = weak.upgrade() else { return };
                {
                    let mut state = inner.state.lock();
                    let Some(lane_state) = state.lanes.get_mut(&lane) else {
                        return;
                    };
                    lane_state.pending_write = None;
                }
                Self::begin_write(&inner, lane, &text, clear_previous);
            });
            if let Some(lane_state) = state.lanes.get_mut(&lane) {
                lane_state.pending_write = Some(task);
            }
        }

        Ok(())
    }

    /// Clear one lane's displayed text and drop its pending writes.
    ///
    /// Requesting the `Off` level is programmatic misuse: there is no lane
    /// to clear.
    pub fn clear(&self, lane: Politeness) -> Result<(), AnnounceError> {
        let inner = &self.inner;
        inner.context.ensure_live("Announcer::clear")?;
        if lane == Politeness::Off {
            return Err(AnnounceError::InvalidLane(lane));
        }

        let created = {
            let mut state = inner.state.lock();
            Self::cancel_pending(inner, &mut state, lane);
            state.lanes.contains_key(&lane)
        };
        if created {
            inner.port.publish(lane, "");
        } else {
            tracing::debug!(target: targets::ANNOUNCE, lane = lane.as_str(), "clear on a lane never used");
        }
        Ok(())
    }

    /// Clear every lane in use.
    pub fn clear_all(&self) -> Result<(), AnnounceError> {
        self.inner.context.ensure_live("Announcer::clear_all")?;
        for lane in [Politeness::Polite, Politeness::Assertive] {
            self.clear(lane)?;
        }
        Ok(())
    }

    /// Remove all lane regions and internal state.
    ///
    /// Idempotent and safe to call when the announcer was never initialized.
    pub fn destroy(&self) -> Result<(), AnnounceError> {
        let inner = &self.inner;
        inner.context.ensure_live("Announcer::destroy")?;

        let lanes: Vec<Politeness> = {
            let mut state = inner.state.lock();
            let lanes: Vec<Politeness> = state.lanes.keys().copied().collect();
            for lane in &lanes {
                Self::cancel_pending(inner, &mut state, *lane);
            }
            state.lanes.clear();
            lanes
        };
        for lane in lanes {
            inner.port.remove_lane(lane);
        }
        Ok(())
    }

    pub(crate) fn context(&self) -> &Arc<UiContext> {
        &self.inner.context
    }

    fn ensure_lane(inner: &AnnouncerInner, state: &mut AnnouncerState, lane: Politeness) {
        if state.lanes.contains_key(&lane) {
            return;
        }
        // for_lane is Some for every lane that reaches here; Off is filtered
        // at the call sites.
        if let Some(spec) = LaneSpec::for_lane(lane) {
            inner.port.create_lane(&spec);
            state.lanes.insert(lane, LaneState::default());
            tracing::debug!(target: targets::ANNOUNCE, lane = lane.as_str(), "lane created");
        }
    }

    fn cancel_pending(inner: &AnnouncerInner, state: &mut AnnouncerState, lane: Politeness) {
        if let Some(lane_state) = state.lanes.get_mut(&lane) {
            if let Some(task) = lane_state.pending_write.take() {
                inner.context.scheduler().cancel(task);
            }
            if let Some(task) = lane_state.pending_set.take() {
                inner.context.scheduler().cancel(task);
            }
        }
    }

    /// The two-phase lane write: clear now, set after the settle delay.
    fn begin_write(inner: &Arc<AnnouncerInner>, lane: Politeness, text: &str, clear_previous: bool) {
        if clear_previous {
            inner.port.publish(lane, "");
        }

        let weak = Arc::downgrade(inner);
        let text = text.to_string();
        let task = inner.context.defer(inner.options.settle_delay, move || {
            let Some(inner) = weak.upgrade() else { return };
            {
                let mut state = inner.state.lock();
                let Some(lane_state) = state.lanes.get_mut(&lane) else {
                    return;
                };
                lane_state.pending_set = None;
            }
            inner.port.publish(lane, &text);
            tracing::trace!(target: targets::ANNOUNCE, lane = lane.as_str(), "announcement set");
        });

        let mut state = inner.state.lock();
        if let Some(lane_state) = state.lanes.get_mut(&lane) {
            lane_state.pending_set = Some(task);
        }
    }
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Announcer")
            .field("lanes", &state.lanes.len())
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PortEvent, RecordingPort};
    use operable_core::ManualClock;

    struct Fixture {
        ctx: Arc<UiContext>,
        clock: Arc<ManualClock>,
        port: Arc<RecordingPort>,
        announcer: Announcer,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_options(AnnouncerOptions::default())
        }

        fn with_options(options: AnnouncerOptions) -> Self {
            let clock = Arc::new(ManualClock::new());
            let ctx = UiContext::with_clock(clock.clone());
            let port = RecordingPort::new();
            let announcer = Announcer::with_options(ctx.clone(), port.clone(), options);
            Self {
                ctx,
                clock,
                port,
                announcer,
            }
        }

        fn advance(&self, delay: Duration) {
            self.clock.advance(delay);
            self.ctx.scheduler().run_due();
        }
    }

    #[test]
    fn test_clear_then_set() {
        let fx = Fixture::new();
        fx.announcer
            .announce("Saved", AnnounceOptions::polite().immediate())
            .unwrap();

        // The clear lands synchronously; the set waits out the settle delay.
        assert_eq!(fx.port.published(Politeness::Polite), vec![""]);
        fx.advance(DEFAULT_SETTLE_DELAY);
        assert_eq!(fx.port.published(Politeness::Polite), vec!["", "Saved"]);
    }

    #[test]
    fn test_identical_messages() {
        let fx = Fixture::new();
        for _ in 0..2 {
            fx.announcer
                .announce("3 results", AnnounceOptions::polite().immediate())
                .unwrap();
            fx.advance(DEFAULT_SETTLE_DELAY);
        }

        assert_eq!(
            fx.port.published(Politeness::Polite),
            vec!["", "3 results", "", "3 results"]
        );
    }

    #[test]
    fn test_default_debounce() {
        let fx = Fixture::new();
        fx.announcer
            .announce("Loading", AnnounceOptions::polite())
            .unwrap();

        assert!(fx.port.published(Politeness::Polite).is_empty());
        fx.advance(DEFAULT_ANNOUNCE_DELAY);
        assert_eq!(fx.port.published(Politeness::Polite), vec![""]);
        fx.advance(DEFAULT_SETTLE_DELAY);
        assert_eq!(fx.port.current_text(Politeness::Polite).as_deref(), Some("Loading"));
    }

    #[test]
    fn test_explicit_delay() {
        let fx = Fixture::new();
        fx.announcer
            .announce(
                "Soon",
                AnnounceOptions::polite().with_delay(Duration::from_millis(50)),
            )
            .unwrap();

        fx.advance(Duration::from_millis(49));
        assert!(fx.port.published(Politeness::Polite).is_empty());
        fx.advance(Duration::from_millis(1));
        assert_eq!(fx.port.published(Politeness::Polite), vec![""]);
    }

    #[test]
    fn test_zero_delay() {
        let fx = Fixture::new();
        fx.announcer
            .announce("Session expired", AnnounceOptions::assertive().immediate())
            .unwrap();

        assert_eq!(fx.port.published(Politeness::Assertive), vec![""]);
        fx.advance(Duration::from_millis(9));
        assert_eq!(fx.port.published(Politeness::Assertive), vec![""]);
        fx.advance(Duration::from_millis(1));
        assert_eq!(
            fx.port.published(Politeness::Assertive),
            vec!["", "Session expired"]
        );
    }

    #[test]
    fn test_empty_and_off_noops() {
        let fx = Fixture::new();
        fx.announcer
            .announce("   ", AnnounceOptions::polite().immediate())
            .unwrap();
        fx.announcer
            .announce(
                "suppressed",
                AnnounceOptions {
                    politeness: Politeness::Off,
                    ..AnnounceOptions::default()
                },
            )
            .unwrap();

        fx.advance(Duration::from_secs(1));
        assert!(fx.port.events().is_empty());
    }

    #[test]
    fn test_init_idempotent() {
        let fx = Fixture::new();
        fx.announcer.init().unwrap();
        fx.announcer.init().unwrap();

        let created: Vec<_> = fx
            .port
            .events()
            .into_iter()
            .filter(|e| matches!(e, PortEvent::LaneCreated(_)))
            .collect();
        assert_eq!(
            created,
            vec![
                PortEvent::LaneCreated(Politeness::Polite),
                PortEvent::LaneCreated(Politeness::Assertive),
            ]
        );

        let specs = fx.port.specs();
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|spec| spec.atomic));
        assert_eq!(specs[0].role, LaneRole::Status);
        assert_eq!(specs[1].role, LaneRole::Alert);
    }

    #[test]
    fn test_lazy_lane_creation() {
        let fx = Fixture::new();
        fx.announcer
            .announce("Alert", AnnounceOptions::assertive().immediate())
            .unwrap();

        assert_eq!(
            fx.port.specs(),
            vec![LaneSpec::for_lane(Politeness::Assertive).unwrap()]
        );
    }

    #[test]
    fn test_supersede_pending_set() {
        let fx = Fixture::new();
        fx.announcer
            .announce("first", AnnounceOptions::polite().immediate())
            .unwrap();
        fx.announcer
            .announce("second", AnnounceOptions::polite().immediate())
            .unwrap();

        fx.advance(DEFAULT_SETTLE_DELAY);
        let published = fx.port.published(Politeness::Polite);
        assert!(!published.contains(&"first".to_string()));
        assert_eq!(published, vec!["", "", "second"]);
    }

    #[test]
    fn test_supersede_pending_debounce() {
        let fx = Fixture::new();
        fx.announcer
            .announce("first", AnnounceOptions::polite())
            .unwrap();
        fx.announcer
            .announce("second", AnnounceOptions::polite())
            .unwrap();

        fx.advance(DEFAULT_ANNOUNCE_DELAY);
        fx.advance(DEFAULT_SETTLE_DELAY);
        assert_eq!(fx.port.published(Politeness::Polite), vec!["", "second"]);
    }

    #[test]
    fn test_independent_lanes() {
        let fx = Fixture::new();
        fx.announcer
            .announce("status", AnnounceOptions::polite().immediate())
            .unwrap();
        fx.announcer
            .announce("alert", AnnounceOptions::assertive().immediate())
            .unwrap();

        fx.advance(DEFAULT_SETTLE_DELAY);
        assert_eq!(fx.port.current_text(Politeness::Polite).as_deref(), Some("status"));
        assert_eq!(fx.port.current_text(Politeness::Assertive).as_deref(), Some("alert"));
    }

    #[test]
    fn test_clear_off_lane() {
        let fx = Fixture::new();
        let err = fx.announcer.clear(Politeness::Off).unwrap_err();
        assert!(matches!(err, AnnounceError::InvalidLane(Politeness::Off)));
    }

    #[test]
    fn test_clear_cancels_pending() {
        let fx = Fixture::new();
        fx.announcer
            .announce("doomed", AnnounceOptions::polite().immediate())
            .unwrap();
        fx.announcer.clear(Politeness::Polite).unwrap();

        fx.advance(Duration::from_secs(1));
        assert_eq!(fx.port.published(Politeness::Polite), vec!["", ""]);
    }

    #[test]
    fn test_clear_unused_lane() {
        let fx = Fixture::new();
        fx.announcer.clear(Politeness::Polite).unwrap();
        assert!(fx.port.events().is_empty());
    }

    #[test]
    fn test_destroy_idempotent() {
        let fx = Fixture::new();
        fx.announcer.init().unwrap();
        fx.announcer.destroy().unwrap();

        let removed: Vec<_> = fx
            .port
            .events()
            .into_iter()
            .filter(|e| matches!(e, PortEvent::LaneRemoved(_)))
            .collect();
        assert_eq!(removed.len(), 2);

        fx.announcer.destroy().unwrap();
        let removed_after: Vec<_> = fx
            .port
            .events()
            .into_iter()
            .filter(|e| matches!(e, PortEvent::LaneRemoved(_)))
            .collect();
        assert_eq!(removed_after.len(), 2);
    }

    #[test]
    fn test_destroy_cancels_pending() {
        let fx = Fixture::new();
        fx.announcer
            .announce("never lands", AnnounceOptions::polite())
            .unwrap();
        fx.announcer.destroy().unwrap();

        fx.advance(Duration::from_secs(1));
        assert!(fx.port.published(Politeness::Polite).is_empty());
    }

    #[test]
    fn test_custom_settle_delay() {
        let fx = Fixture::with_options(AnnouncerOptions {
            settle_delay: Duration::from_millis(50),
            announce_delay: Duration::ZERO,
        });
        fx.announcer
            .announce("slow settle", AnnounceOptions::polite())
            .unwrap();

        fx.advance(Duration::from_millis(49));
        assert_eq!(fx.port.published(Politeness::Polite), vec![""]);
        fx.advance(Duration::from_millis(1));
        assert_eq!(
            fx.port.current_text(Politeness::Polite).as_deref(),
            Some("slow settle")
        );
    }

    #[test]
    fn test_announce_after_shutdown() {
        let fx = Fixture::new();
        fx.ctx.shutdown();
        assert!(fx
            .announcer
            .announce("too late", AnnounceOptions::polite())
            .is_err());
    }
}
