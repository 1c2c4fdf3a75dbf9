//! The focus host: the rendering layer's view of focusable elements.
//!
//! Operable never owns UI elements. It refers to them through opaque
//! [`FocusId`] handles and acts on them through an injected [`FocusHost`]
//! capability, supplied by the rendering-layer collaborator. This keeps the
//! state machines decoupled from any specific widget framework: a host may
//! be a widget tree, a DOM bridge, or a plain vector of fakes in tests.

use slotmap::{Key, KeyData, new_key_type};

new_key_type! {
    /// Opaque handle to a focusable UI element.
    ///
    /// Allocated by the host (typically from a `SlotMap` of its elements);
    /// Operable only stores and compares these.
    pub struct FocusId;
}

impl FocusId {
    /// Reconstruct a handle from its raw representation.
    ///
    /// Returns `None` for the null representation. The raw value must come
    /// from a prior [`as_raw`](Self::as_raw) call on the same host.
    pub fn from_raw(raw: u64) -> Option<Self> {
        let id = Self::from(KeyData::from_ffi(raw));
        if id.is_null() { None } else { Some(id) }
    }

    /// The raw representation of this handle, stable for the host's lifetime.
    pub fn as_raw(&self) -> u64 {
        self.data().as_ffi()
    }
}

/// Tab-index state of an element under roving navigation.
///
/// The `0`/`-1` attribute pair is the external protocol keyboard and AT
/// tooling read; exactly one member of a roving collection carries
/// [`Active`](Self::Active) at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabIndex {
    /// Keyboard-reachable (`tabindex="0"`).
    Active,
    /// Skipped by Tab, reachable only programmatically (`tabindex="-1"`).
    Inert,
}

impl TabIndex {
    /// The attribute value AT tooling reads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "0",
            Self::Inert => "-1",
        }
    }

    /// The numeric attribute value.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Active => 0,
            Self::Inert => -1,
        }
    }
}

/// Capability surface the rendering layer supplies to Operable.
///
/// All queries answer against the live element tree at call time; Operable
/// does not cache host answers beyond what each subsystem documents
/// (e.g. a trap's focusable set is recomputed only on `update`).
pub trait FocusHost: Send + Sync {
    /// The focusable descendants of `container`, in traversal (tab) order.
    ///
    /// The host decides focusability; Operable never inspects element kinds.
    fn focusable_descendants(&self, container: FocusId) -> Vec<FocusId>;

    /// Whether `id` is still attached to the live element tree.
    fn is_attached(&self, id: FocusId) -> bool;

    /// The element currently holding the focus singleton, if any.
    fn focused(&self) -> Option<FocusId>;

    /// Transfer focus to `id`. Returns `false` if the element refused focus
    /// (detached, disabled, hidden).
    fn request_focus(&self, id: FocusId) -> bool;

    /// Write the roving tab-index attribute on `id`.
    fn set_tab_index(&self, id: FocusId, tab_index: TabIndex);

    /// Make `container` itself focusable so a trap with no focusable
    /// descendants still has one reachable target.
    ///
    /// Returns `false` when the container carries a conflicting tab-index
    /// the host will not override.
    fn make_container_focusable(&self, container: FocusId) -> bool;

    /// Whether `id` lies inside `container`'s subtree.
    fn contains(&self, container: FocusId, id: FocusId) -> bool;
}
