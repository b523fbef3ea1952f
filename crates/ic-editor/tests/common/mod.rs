//! Shared fixtures for editor integration tests.
#![allow(dead_code)]

use ic_core::{Bounds, Canvas, CanvasId, EditorConfig, Element, ElementId, ElementKind};
use ic_editor::Editor;
use ic_store::MemoryBackend;
use std::rc::Rc;

/// Container size matching the default view box, so screen pixels equal
/// world units until the view changes.
pub const WIDTH: f64 = 1920.0;
pub const HEIGHT: f64 = 1080.0;

pub fn rect(id: &str, x: f64, y: f64, w: f64, h: f64, z: f64) -> Element {
    let mut el = Element::new(
        ElementId::intern(id),
        ElementKind::Rectangle {
            fill: "#ffffff".into(),
            stroke: "#333333".into(),
            stroke_width: 1.0,
        },
        Bounds::new(x, y, w, h),
    );
    el.z_index = z;
    el
}

pub fn image(id: &str, x: f64, y: f64, w: f64, h: f64, z: f64) -> Element {
    let mut el = Element::new(
        ElementId::intern(id),
        ElementKind::Image {
            src: "/api/images/photo.png".into(),
        },
        Bounds::new(x, y, w, h),
    );
    el.z_index = z;
    el
}

pub fn canvas(id: &str, elements: Vec<Element>) -> Canvas {
    let mut canvas = Canvas::placeholder(CanvasId::parse(id).unwrap());
    canvas.elements = elements;
    canvas
}

/// Open the main canvas holding `elements`. Call from inside a `LocalSet`.
pub async fn open_with(
    elements: Vec<Element>,
    config: EditorConfig,
) -> (Rc<MemoryBackend>, Editor<MemoryBackend>) {
    let backend = Rc::new(MemoryBackend::new());
    backend.insert(canvas(CanvasId::MAIN, elements));
    let editor = Editor::open(backend.clone(), config, &CanvasId::main(), WIDTH, HEIGHT)
        .await
        .unwrap();
    (backend, editor)
}

pub fn id(s: &str) -> ElementId {
    ElementId::intern(s)
}
