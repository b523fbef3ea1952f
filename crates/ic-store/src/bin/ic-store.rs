//! Maintenance CLI for an Infinite Canvas storage directory.
//!
//! ```text
//! ic-store init                 create the layout and the main canvas
//! ic-store tree                 print the canvas tree
//! ic-store show <id>            print one canvas summary
//! ic-store new <name> [parent]  create a canvas and link it into the tree
//! ic-store rm <id>              delete a canvas and unlink it
//! ```
//!
//! The storage root comes from `IC_STORAGE_DIR` (default `./storage`).
//! Logging is controlled by `RUST_LOG`.

use chrono::SecondsFormat;
use ic_core::{CanvasBackend, CanvasId, ModelError, StoreError};
use ic_store::{FsBackend, load_config};
use thiserror::Error;

const USAGE: &str = "usage: ic-store <init | tree | show <id> | new <name> [parent] | rm <id>>";

#[derive(Debug, Error)]
enum CliError {
    #[error("{USAGE}")]
    Usage,

    #[error(transparent)]
    Id(#[from] ModelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let root = std::env::var("IC_STORAGE_DIR").unwrap_or_else(|_| "./storage".to_string());
    let store = FsBackend::new(root);

    if let Err(e) = run(&store, &args).await {
        eprintln!("ic-store: {e}");
        std::process::exit(1);
    }
}

async fn run(store: &FsBackend, args: &[String]) -> Result<(), CliError> {
    let arg = |i: usize| args.get(i).map(String::as_str);
    match (arg(0), arg(1), arg(2)) {
        (Some("init"), None, None) => {
            store.init().await?;
            let config = load_config(store.root()).await?;
            log::debug!("config: {config:?}");
            println!("initialized {}", store.root().display());
        }
        (Some("tree"), None, None) => {
            let tree = store.get_tree().await?;
            for (depth, id) in tree.outline() {
                let name = tree.get(id).map_or("?", |n| n.name.as_str());
                println!("{:indent$}{name} ({id})", "", indent = depth * 2);
            }
            let listed = store.list_canvases().await?;
            let orphans: Vec<_> = listed.iter().filter(|id| !tree.contains(id)).collect();
            if !orphans.is_empty() {
                println!("not in tree:");
                for id in orphans {
                    println!("  {id}");
                }
            }
        }
        (Some("show"), Some(id), None) => {
            let canvas = store.get_canvas(&CanvasId::parse(id)?).await?;
            println!("{} ({})", canvas.name, canvas.id);
            println!("  version   {}", canvas.version);
            if let Some(parent) = &canvas.parent_id {
                println!("  parent    {parent}");
            }
            println!("  elements  {}", canvas.elements.len());
            println!("  guides    {}", canvas.guides.len());
            println!(
                "  created   {}",
                canvas.created.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
            println!(
                "  modified  {}",
                canvas.modified.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        (Some("new"), Some(name), parent) => {
            let parent = parent.map(CanvasId::parse).transpose()?;
            let canvas = store.create_canvas(Some(name), parent.as_ref()).await?;
            store
                .tree_add_canvas(&canvas.id, parent.as_ref(), &canvas.name)
                .await?;
            println!("{}", canvas.id);
        }
        (Some("rm"), Some(id), None) => {
            let id = CanvasId::parse(id)?;
            if id.is_main() {
                return Err(ModelError::CannotRemoveMain.into());
            }
            store.delete_canvas(&id).await?;
            match store.tree_remove_canvas(&id).await {
                Ok(_) => {}
                Err(e) if e.is_not_found() => log::warn!("{id} was not in the tree"),
                Err(e) => return Err(e.into()),
            }
            println!("removed {id}");
        }
        _ => return Err(CliError::Usage),
    }
    Ok(())
}
