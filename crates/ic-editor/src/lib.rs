pub mod arrange;
pub mod autosave;
pub mod clipboard;
pub mod commands;
pub mod editor;
pub mod error;
pub mod guides;
pub mod history;
pub mod input;
pub mod interaction;
mod pointer;
pub mod scene;
pub mod selection;
pub mod shortcuts;
pub mod snapping;
pub mod tools;
pub mod transform;
pub mod viewport;

pub use autosave::{Autosave, SaveStatus};
pub use commands::{Command, CommandOutcome};
pub use editor::Editor;
pub use error::EditorError;
pub use input::{KeyEvent, Modifiers, PointerButton, PointerEvent};
pub use interaction::Mode;
pub use scene::Scene;
pub use selection::{SelectMode, Selection};
pub use tools::ToolKind;
pub use transform::{AlignKind, Orientation};
pub use viewport::Viewport;
