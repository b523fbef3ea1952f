//! Editor configuration stored next to the canvases.

use ic_core::{EditorConfig, StoreError};
use std::io::ErrorKind;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";

/// Read `<root>/config.json`. A missing file yields the defaults; a
/// partial one is completed from them.
pub async fn load_config(root: &Path) -> Result<EditorConfig, StoreError> {
    let path = root.join(CONFIG_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => {
            let config = EditorConfig::from_json_str(&text)?;
            log::info!("store: loaded config from {}", path.display());
            Ok(config)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("store: no {CONFIG_FILE}, using defaults");
            Ok(EditorConfig::default())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()).await.unwrap(), EditorConfig::default());
    }

    #[tokio::test]
    async fn partial_file_is_completed() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "snap": { "gridSize": 10, "enabled": true }, "history": { "capacity": 5 } }"#,
        )
        .await
        .unwrap();
        let config = load_config(dir.path()).await.unwrap();
        assert_eq!(config.snap.grid_size, 10.0);
        assert!(config.snap.enabled);
        assert_eq!(config.snap.threshold, 8.0);
        // raised to the floor
        assert_eq!(config.history.capacity, 50);
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(CONFIG_FILE), "{ nope").await.unwrap();
        assert!(matches!(
            load_config(dir.path()).await,
            Err(StoreError::Serialization(_))
        ));
    }
}
