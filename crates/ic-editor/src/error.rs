use ic_core::{ModelError, StoreError};
use thiserror::Error;

/// Why an editing operation did not apply.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("nothing is selected")]
    NothingSelected,

    #[error("needs at least {min} selected elements")]
    NeedsSelection { min: usize },

    #[error("the clipboard is empty")]
    EmptyClipboard,
}
