//! Test doubles for the unit tests: an in-memory focus host and a
//! recording announcement port.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::announce::{AnnouncementPort, LaneSpec, Politeness};
use crate::host::{FocusHost, FocusId, TabIndex};

#[derive(Debug)]
struct FakeElement {
    parent: Option<FocusId>,
    focusable: bool,
    attached: bool,
    /// Set when the host refuses to make this container focusable
    /// (models a conflicting explicit tabindex).
    refuses_container_focus: bool,
    tab_index: Option<TabIndex>,
}

#[derive(Default)]
struct FakeHostInner {
    elements: SlotMap<FocusId, FakeElement>,
    /// Traversal order of all elements, as a host's tree walk would yield.
    order: Vec<FocusId>,
    focused: Option<FocusId>,
    /// Every focus transfer requested through the host, in order.
    focus_log: Vec<FocusId>,
}

/// An in-memory element tree standing in for the rendering layer.
pub(crate) struct FakeHost {
    inner: Mutex<FakeHostInner>,
}

impl FakeHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FakeHostInner::default()),
        })
    }

    pub(crate) fn add_container(&self) -> FocusId {
        self.insert(None, false, false)
    }

    /// A container whose explicit tabindex the host will not override.
    pub(crate) fn add_rigid_container(&self) -> FocusId {
        self.insert(None, false, true)
    }

    pub(crate) fn add_element(&self, parent: FocusId, focusable: bool) -> FocusId {
        self.insert(Some(parent), focusable, false)
    }

    fn insert(
        &self,
        parent: Option<FocusId>,
        focusable: bool,
        refuses_container_focus: bool,
    ) -> FocusId {
        let mut inner = self.inner.lock();
        let id = inner.elements.insert(FakeElement {
            parent,
            focusable,
            attached: true,
            refuses_container_focus,
            tab_index: None,
        });
        inner.order.push(id);
        id
    }

    pub(crate) fn detach(&self, id: FocusId) {
        let mut inner = self.inner.lock();
        if let Some(element) = inner.elements.get_mut(id) {
            element.attached = false;
        }
        if inner.focused == Some(id) {
            inner.focused = None;
        }
    }

    pub(crate) fn set_focus(&self, id: FocusId) {
        self.inner.lock().focused = Some(id);
    }

    pub(crate) fn current_focus(&self) -> Option<FocusId> {
        self.inner.lock().focused
    }

    pub(crate) fn tab_index_of(&self, id: FocusId) -> Option<TabIndex> {
        self.inner.lock().elements.get(id).and_then(|e| e.tab_index)
    }

    pub(crate) fn focus_log(&self) -> Vec<FocusId> {
        self.inner.lock().focus_log.clone()
    }

    fn is_inside(inner: &FakeHostInner, container: FocusId, id: FocusId) -> bool {
        let mut current = inner.elements.get(id).and_then(|e| e.parent);
        while let Some(parent) = current {
            if parent == container {
                return true;
            }
            current = inner.elements.get(parent).and_then(|e| e.parent);
        }
        false
    }
}

impl FocusHost for FakeHost {
    fn focusable_descendants(&self, container: FocusId) -> Vec<FocusId> {
        let inner = self.inner.lock();
        inner
            .order
            .iter()
            .copied()
            .filter(|&id| {
                Self::is_inside(&inner, container, id)
                    && inner
                        .elements
                        .get(id)
                        .is_some_and(|e| e.focusable && e.attached)
            })
            .collect()
    }

    fn is_attached(&self, id: FocusId) -> bool {
        self.inner.lock().elements.get(id).is_some_and(|e| e.attached)
    }

    fn focused(&self) -> Option<FocusId> {
        self.inner.lock().focused
    }

    fn request_focus(&self, id: FocusId) -> bool {
        let mut inner = self.inner.lock();
        let accepts = inner.elements.get(id).is_some_and(|e| e.attached);
        if accepts {
            inner.focused = Some(id);
            inner.focus_log.push(id);
        }
        accepts
    }

    fn set_tab_index(&self, id: FocusId, tab_index: TabIndex) {
        let mut inner = self.inner.lock();
        if let Some(element) = inner.elements.get_mut(id) {
            element.tab_index = Some(tab_index);
        }
    }

    fn make_container_focusable(&self, container: FocusId) -> bool {
        let mut inner = self.inner.lock();
        match inner.elements.get_mut(container) {
            Some(element) if !element.refuses_container_focus => {
                element.focusable = true;
                true
            }
            _ => false,
        }
    }

    fn contains(&self, container: FocusId, id: FocusId) -> bool {
        let inner = self.inner.lock();
        Self::is_inside(&inner, container, id)
    }
}

/// One observed port call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PortEvent {
    LaneCreated(Politeness),
    Published(Politeness, String),
    LaneRemoved(Politeness),
}

/// An announcement port that records every call.
#[derive(Default)]
pub(crate) struct RecordingPort {
    events: Mutex<Vec<PortEvent>>,
    specs: Mutex<Vec<LaneSpec>>,
}

impl RecordingPort {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn events(&self) -> Vec<PortEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn specs(&self) -> Vec<LaneSpec> {
        self.specs.lock().clone()
    }

    /// All texts published on `lane`, clears included.
    pub(crate) fn published(&self, lane: Politeness) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                PortEvent::Published(l, text) if *l == lane => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// The lane's currently displayed text.
    pub(crate) fn current_text(&self, lane: Politeness) -> Option<String> {
        self.published(lane).last().cloned()
    }
}

impl AnnouncementPort for RecordingPort {
    fn create_lane(&self, spec: &LaneSpec) {
        self.specs.lock().push(*spec);
        self.events.lock().push(PortEvent::LaneCreated(spec.politeness));
    }

    fn publish(&self, lane: Politeness, text: &str) {
        self.events
            .lock()
            .push(PortEvent::Published(lane, text.to_string()));
    }

    fn remove_lane(&self, lane: Politeness) {
        self.events.lock().push(PortEvent::LaneRemoved(lane));
    }
}
