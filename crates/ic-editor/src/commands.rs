//! Editor commands.
//!
//! Everything a shortcut or a context-menu entry can trigger is a
//! `Command`. `Editor::execute` runs one and reports a `CommandOutcome`
//! instead of an error.

use crate::tools::ToolKind;
use crate::transform::{AlignKind, Orientation};
use ic_core::{Background, CanvasId, FilterKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── History ──
    Undo,
    Redo,

    // ── Clipboard ──
    Copy,
    Cut,
    Paste,
    Duplicate,

    // ── Selection ──
    Delete,
    SelectAll,
    /// Close the help overlay, cancel a drawing, or clear the selection,
    /// whichever applies first.
    Escape,

    // ── Structure ──
    Group,
    Ungroup,
    BringForward,
    BringToFront,
    SendBackward,
    SendToBack,

    // ── Element state ──
    ToggleLock,
    ToggleVisibility,
    ToggleFilter(FilterKind),
    Align(AlignKind),
    Distribute(Orientation),
    Flip(Orientation),
    /// Navigate into the primary folder's target canvas.
    OpenFolder,

    // ── Canvas ──
    SetBackground(Option<Background>),

    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomToFit,
    ZoomToActualSize,
    ZoomToSelection,
    ToggleRulers,
    ToggleGrid,
    ToggleSnap,
    ToggleHelp,
    SetTool(ToolKind),
}

impl Command {
    /// Short label used for history entries and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Undo => "undo",
            Command::Redo => "redo",
            Command::Copy => "copy",
            Command::Cut => "cut",
            Command::Paste => "paste",
            Command::Duplicate => "duplicate",
            Command::Delete => "delete",
            Command::SelectAll => "select all",
            Command::Escape => "escape",
            Command::Group => "group",
            Command::Ungroup => "ungroup",
            Command::BringForward => "bring forward",
            Command::BringToFront => "bring to front",
            Command::SendBackward => "send backward",
            Command::SendToBack => "send to back",
            Command::ToggleLock => "toggle lock",
            Command::ToggleVisibility => "toggle visibility",
            Command::ToggleFilter(_) => "toggle filter",
            Command::Align(_) => "align",
            Command::Distribute(_) => "distribute",
            Command::Flip(_) => "flip",
            Command::OpenFolder => "open folder",
            Command::SetBackground(_) => "set background",
            Command::ZoomIn => "zoom in",
            Command::ZoomOut => "zoom out",
            Command::ZoomToFit => "zoom to fit",
            Command::ZoomToActualSize => "zoom to 100%",
            Command::ZoomToSelection => "zoom to selection",
            Command::ToggleRulers => "toggle rulers",
            Command::ToggleGrid => "toggle grid",
            Command::ToggleSnap => "toggle snap",
            Command::ToggleHelp => "toggle help",
            Command::SetTool(_) => "set tool",
        }
    }
}

/// What running a command did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    /// The command applied to the current state.
    pub handled: bool,
    /// The scene changed (and an autosave was scheduled).
    pub changed: bool,
    /// The host should call `Editor::open_canvas` with this id.
    pub navigate: Option<CanvasId>,
    /// Why the command did nothing, for a notification.
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    pub fn changed() -> Self {
        Self {
            handled: true,
            changed: true,
            ..Self::default()
        }
    }

    pub fn navigate(to: CanvasId) -> Self {
        Self {
            handled: true,
            navigate: Some(to),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            handled: true,
            error: Some(message.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_constructors() {
        assert!(!CommandOutcome::ignored().handled);
        assert!(CommandOutcome::changed().changed);
        let nav = CommandOutcome::navigate(CanvasId::main());
        assert_eq!(nav.navigate, Some(CanvasId::main()));
        assert!(!nav.changed);
        assert_eq!(CommandOutcome::failed("nope").error.as_deref(), Some("nope"));
    }

    #[test]
    fn labels_are_lowercase() {
        for cmd in [Command::Undo, Command::BringToFront, Command::Flip(Orientation::Vertical)] {
            assert_eq!(cmd.label(), cmd.label().to_lowercase());
        }
    }
}
