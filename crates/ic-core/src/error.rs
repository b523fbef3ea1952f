//! Error types shared by every layer of the canvas engine.

use thiserror::Error;

/// Input and invariant violations on the data model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("invalid canvas id {0:?}")]
    InvalidCanvasId(String),

    #[error("invalid filename {0:?}")]
    InvalidFilename(String),

    #[error("invalid color {0:?}")]
    InvalidColor(String),

    #[error("invalid point list: {0}")]
    InvalidPoints(String),

    #[error("duplicate element id {0}")]
    DuplicateId(String),

    #[error("element {id} has a non-finite {field}")]
    NonFinite { id: String, field: &'static str },

    #[error("element {id} has a negative size ({width} x {height})")]
    NegativeSize { id: String, width: f64, height: f64 },

    #[error("elements {a} and {b} share the same z-order rank")]
    DuplicateRank { a: String, b: String },

    #[error("unknown element {0}")]
    UnknownElement(String),

    #[error("group {group} references unknown child {child}")]
    DanglingGroupChild { group: String, child: String },

    #[error("unknown canvas {0}")]
    UnknownCanvas(String),

    #[error("the main canvas cannot be removed")]
    CannotRemoveMain,

    #[error("moving {id} under {parent} would create a cycle")]
    TreeCycle { id: String, parent: String },

    #[error("tree is inconsistent: {0}")]
    InconsistentTree(String),
}

/// Failures reported by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] ModelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
