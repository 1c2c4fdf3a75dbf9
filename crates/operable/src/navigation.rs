//! Roving tabindex navigation.
//!
//! A [`RovingNavigator`] maintains exactly one logically active member among
//! an ordered collection and moves that designation on directional input.
//! The active member carries [`TabIndex::Active`]; every other member is
//! [`TabIndex::Inert`]. That attribute pair is the protocol keyboard and AT
//! tooling read, so it holds at all times, independent of whether any trap
//! is constraining actual focus.
//!
//! # Key mapping
//!
//! ArrowRight/ArrowLeft drive forward/backward in horizontal (or both)
//! orientation; ArrowDown/ArrowUp in vertical (or both). Home and End always
//! jump to the first and last member regardless of orientation.

use std::fmt;
use std::sync::Arc;

use operable_core::{UiContext, logging::targets};
use parking_lot::Mutex;

use crate::error::NavigationError;
use crate::host::{FocusHost, FocusId, TabIndex};
use crate::keys::{Key, KeyEvent};

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    /// The next member in order.
    Forward,
    /// The previous member in order.
    Backward,
    /// The first member, unconditionally.
    First,
    /// The last member, unconditionally.
    Last,
}

/// Axis along which arrow keys drive navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// ArrowRight/ArrowLeft move the active member.
    #[default]
    Horizontal,
    /// ArrowDown/ArrowUp move the active member.
    Vertical,
    /// All four arrows move the active member.
    Both,
}

/// Callback invoked after the active member moves.
pub type NavigateCallback = Box<dyn Fn(FocusId, usize) + Send + Sync>;

/// Configuration for a [`RovingNavigator`].
pub struct RovingOptions {
    /// Axis for arrow-key mapping.
    pub orientation: Orientation,
    /// Wrap around at the collection boundaries. When `false`, forward past
    /// the last index and backward before the first clamp in place.
    pub loop_around: bool,
    /// Invoked with the newly active member and its index after every
    /// successful move.
    pub on_navigate: Option<NavigateCallback>,
}

impl Default for RovingOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            loop_around: true,
            on_navigate: None,
        }
    }
}

impl fmt::Debug for RovingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RovingOptions")
            .field("orientation", &self.orientation)
            .field("loop_around", &self.loop_around)
            .field("on_navigate", &self.on_navigate.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct NavState {
    /// Candidate members in order. Never empty.
    items: Vec<FocusId>,
    /// Index of the single active member. Always in range.
    current: usize,
}

/// Maintains the single-active-member invariant over an ordered collection.
pub struct RovingNavigator {
    context: Arc<UiContext>,
    host: Arc<dyn FocusHost>,
    options: RovingOptions,
    state: Mutex<NavState>,
}

impl RovingNavigator {
    /// Create a navigator over `items`, marking the first member active.
    ///
    /// An empty collection is rejected with
    /// [`NavigationError::EmptyCollection`]: there is no valid active member
    /// to establish.
    pub fn new(
        context: Arc<UiContext>,
        host: Arc<dyn FocusHost>,
        items: Vec<FocusId>,
        options: RovingOptions,
    ) -> Result<Self, NavigationError> {
        context.ensure_live("RovingNavigator::new")?;
        if items.is_empty() {
            return Err(NavigationError::EmptyCollection);
        }

        let navigator = Self {
            context,
            host,
            options,
            state: Mutex::new(NavState {
                items,
                current: 0,
            }),
        };
        navigator.mark_tab_indexes();
        Ok(navigator)
    }

    /// Move the active member in `direction`.
    ///
    /// Clamping at a boundary without `loop_around` is a no-op that leaves
    /// the index unchanged. Returns the resulting index.
    pub fn navigate(&self, direction: NavDirection) -> Result<usize, NavigationError> {
        self.context.ensure_live("RovingNavigator::navigate")?;

        let (current, len) = {
            let state = self.state.lock();
            (state.current, state.items.len())
        };
        let last = len - 1;

        let next = match direction {
            NavDirection::Forward => {
                if current < last {
                    current + 1
                } else if self.options.loop_around {
                    0
                } else {
                    current
                }
            }
            NavDirection::Backward => {
                if current > 0 {
                    current - 1
                } else if self.options.loop_around {
                    last
                } else {
                    current
                }
            }
            NavDirection::First => 0,
            NavDirection::Last => last,
        };

        if next != current {
            self.navigate_to(next)?;
        }
        Ok(next)
    }

    /// Make the member at `index` the active one.
    ///
    /// Re-marks tab-index state (exactly one active), transfers focus to the
    /// member, and fires `on_navigate`. Out-of-range indexes are rejected.
    pub fn navigate_to(&self, index: usize) -> Result<(), NavigationError> {
        self.context.ensure_live("RovingNavigator::navigate_to")?;

        let item = {
            let mut state = self.state.lock();
            if index >= state.items.len() {
                return Err(NavigationError::IndexOutOfRange {
                    index,
                    len: state.items.len(),
                });
            }
            state.current = index;
            state.items[index]
        };

        self.mark_tab_indexes();
        if !self.host.request_focus(item) {
            tracing::warn!(target: targets::NAVIGATION, ?item, "active member refused focus");
        }
        if let Some(callback) = &self.options.on_navigate {
            callback(item, index);
        }

        tracing::trace!(target: targets::NAVIGATION, index, "active member moved");
        Ok(())
    }

    /// Interpret a key event as a navigation request.
    ///
    /// Returns `true` when the event drove a move. Keys outside the
    /// orientation's mapping pass through.
    pub fn handle_key(&self, event: &KeyEvent) -> bool {
        let horizontal = matches!(
            self.options.orientation,
            Orientation::Horizontal | Orientation::Both
        );
        let vertical = matches!(
            self.options.orientation,
            Orientation::Vertical | Orientation::Both
        );

        let direction = match event.key {
            Key::ArrowRight if horizontal => NavDirection::Forward,
            Key::ArrowLeft if horizontal => NavDirection::Backward,
            Key::ArrowDown if vertical => NavDirection::Forward,
            Key::ArrowUp if vertical => NavDirection::Backward,
            Key::Home => NavDirection::First,
            Key::End => NavDirection::Last,
            _ => return false,
        };

        match self.navigate(direction) {
            Ok(_) => true,
            Err(err) => {
                tracing::error!(target: targets::NAVIGATION, %err, "navigation key dropped");
                false
            }
        }
    }

    /// Replace the candidate collection for dynamic insertion or removal.
    ///
    /// Keeps the current index unless it is now out of range, in which case
    /// it clamps to the last valid index. The single-active invariant is
    /// re-established over the new collection. An empty replacement is
    /// rejected like empty construction.
    pub fn update_elements(&self, items: Vec<FocusId>) -> Result<(), NavigationError> {
        self.context.ensure_live("RovingNavigator::update_elements")?;
        if items.is_empty() {
            return Err(NavigationError::EmptyCollection);
        }

        {
            let mut state = self.state.lock();
            state.current = state.current.min(items.len() - 1);
            state.items = items;
        }
        self.mark_tab_indexes();
        Ok(())
    }

    /// Index of the currently active member.
    pub fn current_index(&self) -> usize {
        self.state.lock().current
    }

    /// The currently active member.
    pub fn current_item(&self) -> FocusId {
        let state = self.state.lock();
        state.items[state.current]
    }

    /// Number of members under navigation.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Always `false`; an empty navigator cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Write `Active` on the current member and `Inert` on the rest.
    fn mark_tab_indexes(&self) {
        let (items, current) = {
            let state = self.state.lock();
            (state.items.clone(), state.current)
        };
        for (index, item) in items.iter().enumerate() {
            let tab_index = if index == current {
                TabIndex::Active
            } else {
                TabIndex::Inert
            };
            self.host.set_tab_index(*item, tab_index);
        }
    }
}

impl fmt::Debug for RovingNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RovingNavigator")
            .field("len", &state.items.len())
            .field("current", &state.current)
            .field("orientation", &self.options.orientation)
            .field("loop_around", &self.options.loop_around)
            .finish_non_exhaustive()
    }
}
