//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and keyboard events into plain values consumed
//! by the editor. Pointer coordinates are in screen pixels relative to the
//! canvas container; the editor converts them to world units.

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// A pointer event in container pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn primary(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn middle(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            button: PointerButton::Middle,
            ..Self::default()
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyEvent {
    /// `KeyboardEvent.key` value, e.g. `"z"`, `"Delete"`, `"["`.
    pub key: String,
    pub modifiers: Modifiers,
    /// Focus is inside a text input or textarea.
    pub in_text_input: bool,
}

impl KeyEvent {
    pub fn new(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_string(),
            modifiers,
            in_text_input: false,
        }
    }
}
