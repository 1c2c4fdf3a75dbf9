//! Keyboard event model for operability handling.
//!
//! Operable only interprets the small set of keys that drive focus cycling
//! and roving navigation; everything else passes through the subsystems
//! untouched. The composing layer converts its platform events (winit,
//! terminal input, DOM events) into [`KeyEvent`]s before handing them to a
//! trap or navigator.

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held (Cmd on macOS).
    pub control: bool,
    /// The Alt key is held (Option on macOS).
    pub alt: bool,
    /// The Meta/Super key is held (Windows key, Cmd on macOS).
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// The keys Operable reacts to.
///
/// This follows the structure of web KeyboardEvent.code values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab: focus cycling.
    Tab,
    /// Escape: trap exit request.
    Escape,
    /// Arrow up: roving navigation (vertical).
    ArrowUp,
    /// Arrow down: roving navigation (vertical).
    ArrowDown,
    /// Arrow left: roving navigation (horizontal).
    ArrowLeft,
    /// Arrow right: roving navigation (horizontal).
    ArrowRight,
    /// Home: jump to the first member.
    Home,
    /// End: jump to the last member.
    End,
    /// Enter: activation, passed through for the owner to interpret.
    Enter,
    /// Space: activation, passed through for the owner to interpret.
    Space,
}

/// A key press as seen by the operability subsystems.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    /// Create a key event with the given modifiers.
    pub fn with_modifiers(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Shorthand for Shift+Tab.
    pub fn shift_tab() -> Self {
        Self::with_modifiers(Key::Tab, KeyboardModifiers::SHIFT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_consts() {
        assert!(!KeyboardModifiers::NONE.any());
        assert!(KeyboardModifiers::SHIFT.any());
        assert!(KeyboardModifiers::SHIFT.shift);
    }

    #[test]
    fn test_shift_tab() {
        let event = KeyEvent::shift_tab();
        assert_eq!(event.key, Key::Tab);
        assert!(event.modifiers.shift);
    }
}
