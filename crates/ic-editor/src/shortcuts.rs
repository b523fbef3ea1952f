//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to `Command`s. "Primary" is Ctrl on
//! Windows/Linux and Cmd on macOS; either one counts.

use crate::commands::Command;
use crate::input::KeyEvent;
use crate::tools::ToolKind;

/// Resolves key events into commands.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event. Returns `None` when the combo has no binding
    /// or focus is in a text input.
    pub fn resolve_event(event: &KeyEvent) -> Option<Command> {
        if event.in_text_input {
            return None;
        }
        let m = event.modifiers;
        Self::resolve(&event.key, m.ctrl, m.shift, m.alt, m.meta)
    }

    /// Resolve a key combo. `key` is the `KeyboardEvent.key` value.
    pub fn resolve(key: &str, ctrl: bool, shift: bool, _alt: bool, meta: bool) -> Option<Command> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(Command::Redo),
                "g" | "G" => Some(Command::Ungroup),
                // Shift turns brackets into braces on most layouts.
                "]" | "}" => Some(Command::BringToFront),
                "[" | "{" => Some(Command::SendToBack),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(Command::Undo),
                "y" | "Y" => Some(Command::Redo),
                "c" | "C" => Some(Command::Copy),
                "x" | "X" => Some(Command::Cut),
                "v" | "V" => Some(Command::Paste),
                "d" | "D" => Some(Command::Duplicate),
                "a" | "A" => Some(Command::SelectAll),
                "g" | "G" => Some(Command::Group),
                "]" => Some(Command::BringForward),
                "[" => Some(Command::SendBackward),
                "l" | "L" => Some(Command::ToggleLock),
                "0" => Some(Command::ZoomToFit),
                "1" => Some(Command::ZoomToActualSize),
                "2" => Some(Command::ZoomToSelection),
                "=" | "+" => Some(Command::ZoomIn),
                "-" => Some(Command::ZoomOut),
                "r" | "R" => Some(Command::ToggleRulers),
                _ => None,
            };
        }

        if shift {
            return match key {
                "?" => Some(Command::ToggleHelp),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(Command::Delete),
            "Escape" => Some(Command::Escape),
            "?" => Some(Command::ToggleHelp),
            "g" | "G" => Some(Command::ToggleGrid),
            "s" | "S" => Some(Command::ToggleSnap),
            "h" | "H" => Some(Command::SetTool(ToolKind::Hand)),
            "r" | "R" => Some(Command::SetTool(ToolKind::Rectangle)),
            "l" | "L" => Some(Command::SetTool(ToolKind::Line)),
            "f" | "F" => Some(Command::SetTool(ToolKind::Freehand)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;

    #[test]
    fn resolve_undo_redo() {
        // Cmd+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", false, false, false, true), Some(Command::Undo));
        // Ctrl+Z → Undo
        assert_eq!(ShortcutMap::resolve("z", true, false, false, false), Some(Command::Undo));
        // Ctrl+Shift+Z → Redo
        assert_eq!(ShortcutMap::resolve("Z", true, true, false, false), Some(Command::Redo));
    }

    #[test]
    fn resolve_clipboard() {
        assert_eq!(ShortcutMap::resolve("c", true, false, false, false), Some(Command::Copy));
        assert_eq!(ShortcutMap::resolve("x", true, false, false, false), Some(Command::Cut));
        assert_eq!(ShortcutMap::resolve("v", false, false, false, true), Some(Command::Paste));
        assert_eq!(ShortcutMap::resolve("d", true, false, false, false), Some(Command::Duplicate));
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(ShortcutMap::resolve("]", true, false, false, false), Some(Command::BringForward));
        assert_eq!(ShortcutMap::resolve("}", true, true, false, false), Some(Command::BringToFront));
        assert_eq!(ShortcutMap::resolve("[", true, false, false, false), Some(Command::SendBackward));
        assert_eq!(ShortcutMap::resolve("[", true, true, false, false), Some(Command::SendToBack));
    }

    #[test]
    fn resolve_group_and_lock() {
        assert_eq!(ShortcutMap::resolve("g", true, false, false, false), Some(Command::Group));
        assert_eq!(ShortcutMap::resolve("G", true, true, false, false), Some(Command::Ungroup));
        assert_eq!(ShortcutMap::resolve("l", true, false, false, false), Some(Command::ToggleLock));
    }

    #[test]
    fn resolve_zoom_presets() {
        assert_eq!(ShortcutMap::resolve("0", true, false, false, false), Some(Command::ZoomToFit));
        assert_eq!(ShortcutMap::resolve("1", true, false, false, false), Some(Command::ZoomToActualSize));
        assert_eq!(ShortcutMap::resolve("2", true, false, false, false), Some(Command::ZoomToSelection));
    }

    #[test]
    fn plain_letters_switch_tools_and_toggles() {
        assert_eq!(ShortcutMap::resolve("r", false, false, false, false), Some(Command::SetTool(ToolKind::Rectangle)));
        assert_eq!(ShortcutMap::resolve("h", false, false, false, false), Some(Command::SetTool(ToolKind::Hand)));
        assert_eq!(ShortcutMap::resolve("l", false, false, false, false), Some(Command::SetTool(ToolKind::Line)));
        assert_eq!(ShortcutMap::resolve("f", false, false, false, false), Some(Command::SetTool(ToolKind::Freehand)));
        assert_eq!(ShortcutMap::resolve("g", false, false, false, false), Some(Command::ToggleGrid));
        assert_eq!(ShortcutMap::resolve("s", false, false, false, false), Some(Command::ToggleSnap));
        // Primary+R is the ruler toggle, not the rectangle tool.
        assert_eq!(ShortcutMap::resolve("r", true, false, false, false), Some(Command::ToggleRulers));
    }

    #[test]
    fn resolve_help_and_escape() {
        assert_eq!(ShortcutMap::resolve("?", false, true, false, false), Some(Command::ToggleHelp));
        assert_eq!(ShortcutMap::resolve("Escape", false, false, false, false), Some(Command::Escape));
        assert_eq!(ShortcutMap::resolve("Backspace", false, false, false, false), Some(Command::Delete));
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("q", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("q", true, false, false, false), None);
    }

    #[test]
    fn text_input_suppresses_everything() {
        let mut event = KeyEvent::new("z", Modifiers::ctrl());
        assert_eq!(ShortcutMap::resolve_event(&event), Some(Command::Undo));
        event.in_text_input = true;
        assert_eq!(ShortcutMap::resolve_event(&event), None);
    }
}
