//! Pointer gestures driven through the editor: drags, resizes, strokes,
//! marquee boxes, and pans.

mod common;

use common::*;
use ic_core::{Bounds, CanvasId, EditorConfig, Element, ElementKind};
use ic_editor::{Command, KeyEvent, Mode, Modifiers, PointerEvent, SelectMode, ToolKind};
use pretty_assertions::assert_eq;
use tokio::task::LocalSet;

fn bounds(ed: &ic_editor::Editor<ic_store::MemoryBackend>, s: &str) -> (f64, f64, f64, f64) {
    let el = ed.scene().element(id(s)).unwrap();
    (el.x, el.y, el.width, el.height)
}

// ─── Dragging ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn locked_elements_select_but_do_not_move() {
    LocalSet::new()
        .run_until(async {
            let mut locked = rect("g1_lk", 0.0, 0.0, 100.0, 100.0, 1.0);
            locked.locked = Some(true);
            let (_backend, mut ed) = open_with(vec![locked], EditorConfig::default()).await;

            assert_eq!(ed.pointer_down(PointerEvent::primary(50.0, 50.0)), Mode::Idle);
            assert_eq!(ed.selection().ids().to_vec(), vec![id("g1_lk")]);
            ed.pointer_move(PointerEvent::primary(150.0, 120.0));
            ed.pointer_up(PointerEvent::primary(150.0, 120.0));

            assert_eq!(bounds(&ed, "g1_lk"), (0.0, 0.0, 100.0, 100.0));
            assert!(!ed.can_undo());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn leaving_mid_drag_keeps_the_move() {
    LocalSet::new()
        .run_until(async {
            let (_backend, mut ed) =
                open_with(vec![rect("g2_a", 0.0, 0.0, 50.0, 50.0, 1.0)], EditorConfig::default()).await;

            assert_eq!(ed.pointer_down(PointerEvent::primary(25.0, 25.0)), Mode::Dragging);
            ed.pointer_move(PointerEvent::primary(125.0, 75.0));
            ed.pointer_leave();

            assert_eq!(ed.mode(), Mode::Idle);
            assert_eq!(bounds(&ed, "g2_a"), (100.0, 50.0, 50.0, 50.0));
            assert!(ed.can_undo());
            ed.execute(Command::Undo);
            assert_eq!(bounds(&ed, "g2_a"), (0.0, 0.0, 50.0, 50.0));
        })
        .await;
}

// ─── Drawing ─────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn a_stroke_commits_one_element_and_one_step() {
    LocalSet::new()
        .run_until(async {
            let (_backend, mut ed) = open_with(Vec::new(), EditorConfig::default()).await;
            ed.key_down(&KeyEvent::new("r", Modifiers::NONE));
            assert_eq!(ed.active_tool(), ToolKind::Rectangle);

            assert_eq!(ed.pointer_down(PointerEvent::primary(100.0, 100.0)), Mode::Drawing);
            ed.pointer_move(PointerEvent::primary(150.0, 130.0));
            assert!(ed.drawing_preview().is_some());
            ed.pointer_up(PointerEvent::primary(200.0, 180.0));

            let elements = ed.scene().elements();
            assert_eq!(elements.len(), 1);
            assert!(matches!(elements[0].kind, ElementKind::Rectangle { .. }));
            assert_eq!(elements[0].bounds(), Bounds::new(100.0, 100.0, 100.0, 80.0));
            assert_eq!(ed.render_tree().len(), 1);

            ed.execute(Command::Undo);
            assert!(ed.scene().elements().is_empty());
            assert!(!ed.can_undo());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn escape_discards_the_stroke_in_progress() {
    LocalSet::new()
        .run_until(async {
            let (_backend, mut ed) = open_with(Vec::new(), EditorConfig::default()).await;
            ed.execute(Command::SetTool(ToolKind::Freehand));

            ed.pointer_down(PointerEvent::primary(100.0, 100.0));
            ed.pointer_move(PointerEvent::primary(140.0, 120.0));
            ed.pointer_move(PointerEvent::primary(180.0, 160.0));
            assert!(ed.key_down(&KeyEvent::new("Escape", Modifiers::NONE)).handled);
            assert_eq!(ed.mode(), Mode::Idle);
            assert!(ed.drawing_preview().is_none());

            ed.pointer_up(PointerEvent::primary(200.0, 200.0));
            assert!(ed.scene().elements().is_empty());
            assert!(!ed.can_undo());
        })
        .await;
}

// ─── Resizing ────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn free_resize_holds_the_opposite_corner() {
    LocalSet::new()
        .run_until(async {
            let folder = Element::new(
                id("g5_folder"),
                ElementKind::Folder {
                    name: "Refs".into(),
                    target_canvas_id: CanvasId::parse("refs").unwrap(),
                },
                Bounds::new(500.0, 500.0, 200.0, 150.0),
            );
            let (_backend, mut ed) = open_with(
                vec![rect("g5_rect", 100.0, 100.0, 200.0, 100.0, 1.0), folder],
                EditorConfig::default(),
            )
            .await;

            // nw handle pushed past the se corner: clamps at the minimum size
            ed.select(id("g5_rect"), SelectMode::Replace);
            assert_eq!(ed.pointer_down(PointerEvent::primary(100.0, 100.0)), Mode::Resizing);
            ed.pointer_move(PointerEvent::primary(400.0, 400.0));
            ed.pointer_up(PointerEvent::primary(600.0, 600.0));
            assert_eq!(bounds(&ed, "g5_rect"), (280.0, 180.0, 20.0, 20.0));

            // se handle on a folder: each axis follows the pointer
            ed.select(id("g5_folder"), SelectMode::Replace);
            assert_eq!(ed.pointer_down(PointerEvent::primary(700.0, 650.0)), Mode::Resizing);
            ed.pointer_up(PointerEvent::primary(760.0, 670.0));
            assert_eq!(bounds(&ed, "g5_folder"), (500.0, 500.0, 260.0, 170.0));
        })
        .await;
}

// ─── Marquee & pan ───────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn marquee_selects_what_it_touches() {
    LocalSet::new()
        .run_until(async {
            let (_backend, mut ed) = open_with(
                vec![
                    rect("g6_a", 0.0, 0.0, 50.0, 50.0, 1.0),
                    rect("g6_b", 100.0, 0.0, 50.0, 50.0, 2.0),
                    rect("g6_c", 400.0, 400.0, 50.0, 50.0, 3.0),
                ],
                EditorConfig::default(),
            )
            .await;

            let ctrl = Modifiers::ctrl();
            let down = PointerEvent::primary(-10.0, -10.0).with_modifiers(ctrl);
            assert_eq!(ed.pointer_down(down), Mode::Marquee);
            ed.pointer_move(PointerEvent::primary(160.0, 60.0).with_modifiers(ctrl));
            ed.pointer_up(PointerEvent::primary(160.0, 60.0).with_modifiers(ctrl));
            assert_eq!(ed.selection().ids().to_vec(), vec![id("g6_a"), id("g6_b")]);

            // Shift adds to the existing selection.
            let add = Modifiers { shift: true, ..ctrl };
            ed.pointer_down(PointerEvent::primary(390.0, 390.0).with_modifiers(add));
            ed.pointer_up(PointerEvent::primary(460.0, 460.0).with_modifiers(add));
            assert_eq!(
                ed.selection().ids().to_vec(),
                vec![id("g6_a"), id("g6_b"), id("g6_c")]
            );
            assert!(!ed.can_undo());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn shift_pans_over_empty_canvas_with_a_tool_active() {
    LocalSet::new()
        .run_until(async {
            let (_backend, mut ed) =
                open_with(vec![rect("g7_a", 0.0, 0.0, 50.0, 50.0, 1.0)], EditorConfig::default()).await;
            ed.select(id("g7_a"), SelectMode::Replace);
            ed.execute(Command::SetTool(ToolKind::Rectangle));

            let shift = Modifiers::shift();
            let down = PointerEvent::primary(500.0, 500.0).with_modifiers(shift);
            assert_eq!(ed.pointer_down(down), Mode::Panning);
            ed.pointer_move(PointerEvent::primary(600.0, 550.0).with_modifiers(shift));
            ed.pointer_up(PointerEvent::primary(600.0, 550.0).with_modifiers(shift));

            let view = ed.viewport().view();
            assert_eq!((view.x, view.y), (-100.0, -50.0));
            assert_eq!(ed.scene().elements().len(), 1);
            assert_eq!(ed.selection().ids().to_vec(), vec![id("g7_a")]);
            assert_eq!(ed.active_tool(), ToolKind::Rectangle);
        })
        .await;
}
