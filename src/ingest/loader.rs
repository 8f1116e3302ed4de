/// Per-file image loading
///
/// Every file is decoded on its own blocking task, so one slow or broken
/// file never holds up the others.

use std::path::{Path, PathBuf};
use tokio::task;
use walkdir::WalkDir;

use super::thumbnail;
use crate::error::IngestError;
use crate::state::data::TierItem;

/// Extensions accepted by the pickers and the folder scan
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "ico", "tif", "tiff",
];

/// Check whether a path looks like an image we can decode
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Load one file into a board item
pub async fn load_item(path: PathBuf) -> Result<TierItem, IngestError> {
    // Spawn blocking because decoding and resizing are CPU-intensive
    task::spawn_blocking(move || load_item_blocking(&path))
        .await
        .map_err(|e| IngestError::Task(e.to_string()))?
}

/// Blocking implementation of [`load_item`]
fn load_item_blocking(path: &Path) -> Result<TierItem, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    let item = thumbnail::item_from_bytes(&bytes, name)?;
    log::info!("Loaded {} as {}", path.display(), item.id);
    Ok(item)
}

/// Collect every image below `folder`, sorted by path
pub fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    log::info!("Scanning folder: {}", folder.display());

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_image_path(path))
        .collect();

    paths.sort();
    log::info!("Found {} images in {}", paths.len(), folder.display());
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::thumbnail::png_bytes;

    #[test]
    fn test_extension_filter() {
        assert!(is_image_path(Path::new("a/b/cat.PNG")));
        assert!(is_image_path(Path::new("dog.jpeg")));
        assert!(!is_image_path(Path::new("notes.txt")));
        assert!(!is_image_path(Path::new("README")));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_item(PathBuf::from("/nonexistent/path.png")).await;
        assert!(matches!(result, Err(IngestError::Read { .. })));
    }

    #[tokio::test]
    async fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        std::fs::write(&path, png_bytes(16, 16)).unwrap();

        let item = load_item(path).await.unwrap();
        assert_eq!(item.name.as_deref(), Some("tile.png"));
        assert_eq!((item.width, item.height), (16, 16));
    }

    #[test]
    fn test_scan_folder_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(nested.join("a.jpg"), b"x").unwrap();

        let found = scan_folder(dir.path());
        assert_eq!(found, vec![dir.path().join("b.png"), nested.join("a.jpg")]);
    }
}
