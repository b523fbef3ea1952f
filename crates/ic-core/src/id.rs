use crate::error::ModelError;
use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide interner backing `ElementId`.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Identifier of an element within a canvas document.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Spur);

impl ElementId {
    /// The id for `s`, interning it on first use.
    pub fn intern(s: &str) -> Self {
        ElementId(INTERNER.get_or_intern(s))
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh ID with a type prefix (e.g. `rectangle_3f2a…`).
    ///
    /// The suffix is a random UUID so IDs stay unique across reloads of
    /// documents written by earlier sessions.
    pub fn generate(prefix: &str) -> Self {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        Self::intern(&format!("{prefix}_{}", &suffix[..12]))
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ElementId::intern(&s))
    }
}

// ─── Canvas IDs ──────────────────────────────────────────────────────────

/// Maximum length of a canvas ID.
pub const MAX_CANVAS_ID_LEN: usize = 64;

/// Identifier of a canvas document.
///
/// Either the reserved `"main"`, a UUID v4, or an alphanumeric / `_` / `-`
/// string of at most 64 characters. Validated on construction and on
/// deserialization, so a `CanvasId` is always safe to use as a file stem.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanvasId(String);

impl CanvasId {
    /// The reserved root canvas.
    pub const MAIN: &'static str = "main";

    pub fn parse(s: &str) -> Result<Self, ModelError> {
        let valid = !s.is_empty()
            && s.len() <= MAX_CANVAS_ID_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(ModelError::InvalidCanvasId(s.to_string()))
        }
    }

    pub fn main() -> Self {
        Self(Self::MAIN.to_string())
    }

    /// A fresh UUID v4 canvas id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn is_main(&self) -> bool {
        self.0 == Self::MAIN
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "canvas:{}", self.0)
    }
}

impl fmt::Display for CanvasId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CanvasId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CanvasId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = ElementId::intern("image_1");
        let b = ElementId::intern("image_1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "image_1");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = ElementId::generate("rectangle");
        let b = ElementId::generate("rectangle");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("rectangle_"));
    }

    #[test]
    fn canvas_id_accepts_main_uuid_and_slugs() {
        assert!(CanvasId::parse("main").unwrap().is_main());
        assert!(CanvasId::parse("9b2d3c4e-1f2a-4b5c-8d9e-0a1b2c3d4e5f").is_ok());
        assert!(CanvasId::parse("moodboard_2024-q1").is_ok());
        assert!(CanvasId::generate().as_str().len() == 36);
    }

    #[test]
    fn canvas_id_rejects_path_characters() {
        assert!(CanvasId::parse("").is_err());
        assert!(CanvasId::parse("../etc").is_err());
        assert!(CanvasId::parse("a/b").is_err());
        assert!(CanvasId::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn canvas_id_deserialize_validates() {
        let ok: Result<CanvasId, _> = serde_json::from_str("\"main\"");
        assert!(ok.is_ok());
        let bad: Result<CanvasId, _> = serde_json::from_str("\"a b\"");
        assert!(bad.is_err());
    }
}
