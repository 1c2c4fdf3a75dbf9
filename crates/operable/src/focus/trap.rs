//! Focus trapping for modal containers.
//!
//! A [`FocusTrap`] constrains Tab/Shift+Tab cycling to one container's
//! focusable subtree and supports controlled entry and exit. The trap does
//! not listen for events itself; the composing layer feeds it key events via
//! [`FocusTrap::handle_key`] and pumps the context scheduler so the deferred
//! initial-focus transfer runs.
//!
//! # Lifecycle
//!
//! ```ignore
//! let trap = FocusTrap::new(ctx, host, dialog, FocusTrapOptions::default());
//! trap.activate()?;            // captures previous focus, schedules entry
//! // ... feed key events while the dialog is open ...
//! trap.deactivate()?;          // restores focus to where it was
//! ```
//!
//! Escape is reported to the owner via the `on_escape` callback; the trap
//! never deactivates itself on Escape. Whether Escape closes the dialog is
//! the owner's decision.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use operable_core::scheduler::TaskId;
use operable_core::{UiContext, logging::targets};
use parking_lot::Mutex;

use crate::error::FocusError;
use crate::host::{FocusHost, FocusId};
use crate::keys::{Key, KeyEvent};

/// Callback invoked when Escape is pressed inside an active trap.
pub type EscapeCallback = Box<dyn Fn() + Send + Sync>;

/// Configuration for a [`FocusTrap`].
pub struct FocusTrapOptions {
    /// The member to focus on activation. Falls back to the first focusable
    /// member when unset or no longer part of the focusable set.
    pub initial_focus: Option<FocusId>,
    /// Overrides the captured previous focus as the restore target.
    pub return_focus: Option<FocusId>,
    /// Capture the previously focused element on activation and restore it
    /// on deactivation.
    pub restore_focus: bool,
    /// Invoked on Escape while the trap is active.
    pub on_escape: Option<EscapeCallback>,
}

impl Default for FocusTrapOptions {
    fn default() -> Self {
        Self {
            initial_focus: None,
            return_focus: None,
            restore_focus: true,
            on_escape: None,
        }
    }
}

impl fmt::Debug for FocusTrapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrapOptions")
            .field("initial_focus", &self.initial_focus)
            .field("return_focus", &self.return_focus)
            .field("restore_focus", &self.restore_focus)
            .field("on_escape", &self.on_escape.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
struct TrapState {
    active: bool,
    /// Focusable members in tab order. Non-empty whenever `active`.
    focusable: Vec<FocusId>,
    previously_focused: Option<FocusId>,
    /// The deferred initial-focus transfer, cancelled on deactivation.
    pending_initial: Option<TaskId>,
}

struct TrapInner {
    context: Arc<UiContext>,
    host: Arc<dyn FocusHost>,
    container: FocusId,
    options: FocusTrapOptions,
    state: Mutex<TrapState>,
}

/// Constrains Tab cycling to one container's focusable subtree.
///
/// At most one session per container is active at a time; calling
/// [`activate`](Self::activate) on an already-active trap is a diagnostic
/// no-op, and [`deactivate`](Self::deactivate) is idempotent.
#[derive(Clone)]
pub struct FocusTrap {
    inner: Arc<TrapInner>,
}

impl FocusTrap {
    /// Create an inactive trap for `container`.
    pub fn new(
        context: Arc<UiContext>,
        host: Arc<dyn FocusHost>,
        container: FocusId,
        options: FocusTrapOptions,
    ) -> Self {
        Self {
            inner: Arc::new(TrapInner {
                context,
                host,
                container,
                options,
                state: Mutex::new(TrapState::default()),
            }),
        }
    }

    /// Activate the trap.
    ///
    /// Captures the currently focused element as the restore target (unless
    /// restoration is disabled) strictly before any focus mutation, computes
    /// the focusable set, and transfers focus to the initial target after
    /// one scheduler yield so a just-rendered container has settled.
    ///
    /// A container with no focusable descendants is made focusable itself
    /// and becomes the sole member; if the host refuses, activation fails
    /// with [`FocusError::NoFocusableTargets`]. Re-activating an active trap
    /// is a no-op.
    pub fn activate(&self) -> Result<(), FocusError> {
        let inner = &self.inner;
        inner.context.ensure_live("FocusTrap::activate")?;

        let mut state = inner.state.lock();
        if state.active {
            tracing::debug!(
                target: targets::FOCUS,
                container = ?inner.container,
                "activate called on an already-active trap"
            );
            return Ok(());
        }

        // Capture before any focus mutation.
        if inner.options.restore_focus {
            state.previously_focused = inner.host.focused();
        }

        let focusable = Self::compute_focusable(inner)?;
        let target = Self::initial_target(inner, &focusable);

        state.focusable = focusable;
        state.active = true;

        // One yield before the transfer so layout has settled.
        let weak = Arc::downgrade(inner);
        let task = inner.context.defer(Duration::ZERO, move || {
            let Some(inner) = weak.upgrade() else { return };
            {
                let mut state = inner.state.lock();
                state.pending_initial = None;
                if !state.active {
                    return;
                }
            }
            if !inner.host.request_focus(target) {
                tracing::warn!(
                    target: targets::FOCUS,
                    ?target,
                    "initial focus target refused focus"
                );
            }
        });
        state.pending_initial = Some(task);

        tracing::debug!(
            target: targets::FOCUS,
            container = ?inner.container,
            members = state.focusable.len(),
            "focus trap activated"
        );
        Ok(())
    }

    /// Recompute the focusable set for dynamic content.
    ///
    /// Keeps the trap active and the captured previous-focus handle intact.
    /// On an inactive trap this is a diagnostic no-op.
    pub fn update(&self) -> Result<(), FocusError> {
        let inner = &self.inner;
        inner.context.ensure_live("FocusTrap::update")?;

        let mut state = inner.state.lock();
        if !state.active {
            tracing::debug!(target: targets::FOCUS, "update called on an inactive trap");
            return Ok(());
        }

        state.focusable = Self::compute_focusable(inner)?;
        tracing::trace!(
            target: targets::FOCUS,
            members = state.focusable.len(),
            "focusable set recomputed"
        );
        Ok(())
    }

    /// Deactivate the trap and restore focus.
    ///
    /// Cancels any in-flight initial-focus transfer, then (when restoration
    /// is enabled) resolves the restore target (the `return_focus` override
    /// or the captured previous focus) and transfers focus to it if it is
    /// still attached. A missing or detached target degrades to a
    /// diagnostic, never an error. Idempotent.
    pub fn deactivate(&self) -> Result<(), FocusError> {
        let inner = &self.inner;
        inner.context.ensure_live("FocusTrap::deactivate")?;

        let mut state = inner.state.lock();
        if !state.active {
            return Ok(());
        }

        if let Some(task) = state.pending_initial.take() {
            inner.context.scheduler().cancel(task);
        }
        state.active = false;
        state.focusable.clear();

        let restore = if inner.options.restore_focus {
            inner.options.return_focus.or(state.previously_focused)
        } else {
            None
        };
        state.previously_focused = None;
        drop(state);

        if inner.options.restore_focus {
            match restore {
                Some(target) if inner.host.is_attached(target) => {
                    if !inner.host.request_focus(target) {
                        tracing::warn!(
                            target: targets::FOCUS,
                            ?target,
                            "restore target refused focus"
                        );
                    }
                }
                Some(target) => {
                    tracing::warn!(
                        target: targets::FOCUS,
                        ?target,
                        "restore target no longer attached; leaving focus where it is"
                    );
                }
                None => {
                    tracing::debug!(target: targets::FOCUS, "no restore target captured");
                }
            }
        }

        tracing::debug!(
            target: targets::FOCUS,
            container = ?inner.container,
            "focus trap deactivated"
        );
        Ok(())
    }

    /// Intercept a key event.
    ///
    /// Returns `true` when the trap consumed the event: Tab from the last
    /// member (or with focus escaped forward) redirects to the first,
    /// Shift+Tab from the first member (or escaped backward) redirects to
    /// the last, and Escape fires the `on_escape` callback. All handling is
    /// synchronous with the event; everything else passes through.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        let inner = &self.inner;
        if let Err(err) = inner.context.ensure_live("FocusTrap::handle_key") {
            tracing::error!(target: targets::FOCUS, %err, "key event dropped");
            return false;
        }

        let state = inner.state.lock();
        if !state.active {
            return false;
        }

        match event.key {
            Key::Tab => {
                // Active traps always hold at least one member.
                let (Some(&first), Some(&last)) = (state.focusable.first(), state.focusable.last())
                else {
                    return false;
                };
                let focused = inner.host.focused();
                let inside = focused
                    .map(|f| inner.host.contains(inner.container, f) || f == inner.container)
                    .unwrap_or(false);
                drop(state);

                let redirect = if event.modifiers.shift {
                    // Backward from the first member, or escaped, wraps to the last.
                    (focused == Some(first) || !inside).then_some(last)
                } else {
                    (focused == Some(last) || !inside).then_some(first)
                };

                match redirect {
                    Some(target) => {
                        inner.host.request_focus(target);
                        true
                    }
                    None => false,
                }
            }
            Key::Escape => {
                // Release the lock first; the callback may call back into
                // the trap (for example to deactivate it).
                drop(state);
                match &inner.options.on_escape {
                    Some(callback) => {
                        callback();
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    /// Whether the trap is currently active.
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().active
    }

    /// The container this trap constrains.
    pub fn container(&self) -> FocusId {
        self.inner.container
    }

    /// The captured previous-focus handle, if the trap is active and
    /// captured one.
    pub fn previously_focused(&self) -> Option<FocusId> {
        self.inner.state.lock().previously_focused
    }

    fn compute_focusable(inner: &TrapInner) -> Result<Vec<FocusId>, FocusError> {
        let focusable = inner.host.focusable_descendants(inner.container);
        if !focusable.is_empty() {
            return Ok(focusable);
        }

        // An empty subtree is still trappable if the container itself can
        // take focus; otherwise the trap has zero reachable targets.
        if inner.host.make_container_focusable(inner.container) {
            tracing::debug!(
                target: targets::FOCUS,
                container = ?inner.container,
                "no focusable descendants; using the container as sole member"
            );
            Ok(vec![inner.container])
        } else {
            Err(FocusError::NoFocusableTargets {
                container: inner.container,
            })
        }
    }

    fn initial_target(inner: &TrapInner, focusable: &[FocusId]) -> FocusId {
        match inner.options.initial_focus {
            Some(id) if focusable.contains(&id) => id,
            Some(id) => {
                tracing::warn!(
                    target: targets::FOCUS,
                    requested = ?id,
                    "initial focus target is not focusable; falling back to the first member"
                );
                focusable[0]
            }
            None => focusable[0],
        }
    }
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("FocusTrap")
            .field("container", &self.inner.container)
            .field("active", &state.active)
            .field("members", &state.focusable.len())
            .finish_non_exhaustive()
    }
}
