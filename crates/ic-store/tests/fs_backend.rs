//! Filesystem store against a fresh temp directory.

use ic_core::*;
use ic_store::FsBackend;
use pretty_assertions::assert_eq;

fn store() -> (tempfile::TempDir, FsBackend) {
    let dir = tempfile::tempdir().unwrap();
    let store = FsBackend::new(dir.path().join("storage"));
    (dir, store)
}

#[tokio::test]
async fn init_creates_layout_and_main_canvas() {
    let (_dir, store) = store();
    store.init().await.unwrap();
    assert!(store.root().join("canvases").is_dir());
    assert!(store.root().join("images").is_dir());

    let main = store.get_canvas(&CanvasId::main()).await.unwrap();
    assert_eq!(main.name, "Main Canvas");
    assert_eq!(main.version, "1.0.0");
    assert_eq!(main.view_box, ViewBox::default());
    assert!(main.elements.is_empty());

    // a second init leaves the document alone
    let before = std::fs::read_to_string(store.root().join("canvases/main.json")).unwrap();
    store.init().await.unwrap();
    let after = std::fs::read_to_string(store.root().join("canvases/main.json")).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn missing_canvas_is_not_found() {
    let (_dir, store) = store();
    store.init().await.unwrap();
    let id = CanvasId::parse("nope").unwrap();
    assert!(store.get_canvas(&id).await.unwrap_err().is_not_found());
    assert!(store.delete_canvas(&id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn create_update_delete() {
    let (_dir, store) = store();
    let created = store.create_canvas(None, None).await.unwrap();
    assert_eq!(created.name, "New Canvas");
    assert!(uuid::Uuid::parse_str(created.id.as_str()).is_ok());
    assert_eq!(store.list_canvases().await.unwrap(), vec![created.id.clone()]);

    let mut doc = created.clone();
    doc.name = "Moodboard".into();
    doc.id = CanvasId::parse("someone_else").unwrap();
    doc.version = String::new();
    let saved = store.update_canvas(&created.id, &doc).await.unwrap();
    assert_eq!(saved.id, created.id);
    assert_eq!(saved.version, "1.0.0");
    assert!(saved.modified >= created.modified);

    let loaded = store.get_canvas(&created.id).await.unwrap();
    assert_eq!(loaded, saved);

    store.delete_canvas(&created.id).await.unwrap();
    assert!(store.get_canvas(&created.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn update_creates_a_missing_document() {
    let (_dir, store) = store();
    let id = CanvasId::parse("fresh").unwrap();
    store
        .update_canvas(&id, &Canvas::placeholder(id.clone()))
        .await
        .unwrap();
    assert_eq!(store.get_canvas(&id).await.unwrap().id, id);
}

#[tokio::test]
async fn invalid_documents_are_rejected() {
    let (_dir, store) = store();
    let id = CanvasId::main();
    let mut doc = Canvas::placeholder(id.clone());
    let el = Element::with_generated_id(
        ElementKind::Rectangle {
            fill: "none".into(),
            stroke: "#333333".into(),
            stroke_width: 2.0,
        },
        Bounds::new(0.0, 0.0, 10.0, 10.0),
    );
    doc.elements = vec![el.clone(), el];
    let err = store.update_canvas(&id, &doc).await.unwrap_err();
    assert!(matches!(err, StoreError::Invalid(ModelError::DuplicateId(_))));
}

#[tokio::test]
async fn legacy_documents_are_migrated_on_load() {
    let (_dir, store) = store();
    store.init().await.unwrap();
    let path = store.root().join("canvases/legacy.json");
    std::fs::write(
        &path,
        r#"{
            "id": "legacy",
            "name": "Old board",
            "version": "",
            "elements": [],
            "created": "2023-01-01T00:00:00Z",
            "modified": "2023-01-01T00:00:00Z"
        }"#,
    )
    .unwrap();

    let canvas = store
        .get_canvas(&CanvasId::parse("legacy").unwrap())
        .await
        .unwrap();
    assert_eq!(canvas.version, "1.0.0");
    assert!(canvas.modified > canvas.created);

    let rewritten: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(rewritten["version"], "1.0.0");
}

#[tokio::test]
async fn default_tree_is_written_on_first_read() {
    let (_dir, store) = store();
    let tree = store.get_tree().await.unwrap();
    assert_eq!(tree, TreeDocument::default());

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.root().join("tree.json")).unwrap())
            .unwrap();
    assert_eq!(raw["rootCanvases"], serde_json::json!(["main"]));
    assert_eq!(raw["canvases"]["main"]["name"], "Main Canvas");
    assert_eq!(raw["canvases"]["main"]["parent"], serde_json::Value::Null);
}

#[tokio::test]
async fn tree_add_and_remove() {
    let (_dir, store) = store();
    let child = store
        .create_canvas(Some("Folder"), Some(&CanvasId::main()))
        .await
        .unwrap();
    let tree = store
        .tree_add_canvas(&child.id, Some(&CanvasId::main()), "Folder")
        .await
        .unwrap();
    assert_eq!(tree.get(&CanvasId::main()).unwrap().children, vec![child.id.clone()]);
    assert_eq!(store.get_tree().await.unwrap(), tree);

    let tree = store.tree_remove_canvas(&child.id).await.unwrap();
    assert!(!tree.contains(&child.id));
    assert!(
        store
            .tree_remove_canvas(&child.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(matches!(
        store.tree_remove_canvas(&CanvasId::main()).await,
        Err(StoreError::Invalid(ModelError::CannotRemoveMain))
    ));
}

#[tokio::test]
async fn images_roundtrip_through_the_images_dir() {
    let (_dir, store) = store();
    let up = store.upload_image(&[1, 2, 3], "scan.jpeg").await.unwrap();
    assert!(up.filename.ends_with(".jpeg"));
    assert_eq!(up.size, 3);
    assert_eq!(up.path, format!("/api/images/{}", up.filename));

    let path = store.image_path(&up.filename).await.unwrap();
    assert!(path.is_absolute());
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);

    let unnamed = store.upload_image(&[0], "pasted").await.unwrap();
    assert!(unnamed.filename.ends_with(".png"));
}

#[tokio::test]
async fn image_names_are_validated() {
    let (_dir, store) = store();
    assert!(matches!(
        store.image_path("../tree.json").await,
        Err(StoreError::Invalid(ModelError::InvalidFilename(_)))
    ));
    assert!(store.image_path("missing.png").await.unwrap_err().is_not_found());
}
