//! Target catalog backed by the data directory.
//!
//! Layout under the data root:
//!
//! ```text
//! <data_root>/targets/<id>.md          practice texts
//! <data_root>/targets/assets/<file>    images and audio referenced by texts
//! ```
//!
//! Every call scans the filesystem again; there is no index to invalidate.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::file_safety::{content_type_for, validate_path_segment};
use crate::models::{TargetId, TARGET_EXTENSION};

/// Name of the directory holding target files.
pub const TARGETS_DIR: &str = "targets";

/// Name of the asset directory, nested inside [`TARGETS_DIR`].
pub const ASSETS_DIR: &str = "assets";

/// An asset read from disk.
#[derive(Debug, Clone)]
pub struct Asset {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Read-only view of the targets stored under a data root.
#[derive(Debug, Clone)]
pub struct TargetCatalog {
    targets_dir: PathBuf,
}

impl TargetCatalog {
    /// Create a catalog for the given data root.
    pub fn new(data_root: impl AsRef<Path>) -> Self {
        Self {
            targets_dir: data_root.as_ref().join(TARGETS_DIR),
        }
    }

    pub fn targets_dir(&self) -> &Path {
        &self.targets_dir
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.targets_dir.join(ASSETS_DIR)
    }

    /// List every target id currently on disk, in directory order.
    pub async fn list_targets(&self) -> Result<Vec<TargetId>> {
        let mut entries = fs::read_dir(&self.targets_dir).await?;
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TARGET_EXTENSION) {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                trace!(path = %path.display(), "catalog: skipping non UTF-8 name");
                continue;
            };
            match TargetId::new(stem) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    debug!(
                        subsystem = "catalog",
                        op = "list_targets",
                        stem,
                        error = %e,
                        "Skipping file with unusable target id"
                    );
                }
            }
        }

        debug!(
            subsystem = "catalog",
            op = "list_targets",
            result_count = ids.len(),
            "Scanned targets directory"
        );
        Ok(ids)
    }

    /// Read the text of one target.
    pub async fn read_target(&self, id: &str) -> Result<String> {
        let id = TargetId::new(id)?;
        let path = self.targets_dir.join(id.file_name());
        debug!(subsystem = "catalog", op = "read_target", path = %path.display());

        let bytes = fs::read(&path).await?;
        String::from_utf8(bytes).map_err(|e| {
            Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Read one asset and resolve its content type.
    pub async fn read_asset(&self, file: &str) -> Result<Asset> {
        validate_path_segment(file, "asset name")?;
        let path = self.assets_dir().join(file);
        debug!(subsystem = "catalog", op = "read_asset", path = %path.display());

        let data = fs::read(&path).await?;
        let content_type = content_type_for(file, &data);
        Ok(Asset { data, content_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    fn setup() -> (tempfile::TempDir, TargetCatalog) {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(root.path().join(TARGETS_DIR).join(ASSETS_DIR)).unwrap();
        let catalog = TargetCatalog::new(root.path());
        (root, catalog)
    }

    #[tokio::test]
    async fn test_list_targets_filters_by_extension() {
        let (_root, catalog) = setup();
        let dir = catalog.targets_dir().to_path_buf();
        touch(&dir, "t1.md", "one");
        touch(&dir, "t2.md", "two");
        touch(&dir, "notes.txt", "ignored");
        touch(&dir, "README", "ignored");
        touch(&dir, "upper.MD", "ignored");

        let mut ids = catalog.list_targets().await.unwrap();
        ids.sort();
        assert_eq!(ids, vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn test_list_targets_skips_directories_and_bad_ids() {
        let (_root, catalog) = setup();
        let dir = catalog.targets_dir().to_path_buf();
        std::fs::create_dir(dir.join("folder.md")).unwrap();
        touch(&dir, "a,b.md", "comma id");
        touch(&dir, "ok.md", "fine");

        let ids = catalog.list_targets().await.unwrap();
        assert_eq!(ids, vec!["ok"]);
    }

    #[tokio::test]
    async fn test_list_targets_empty_directory() {
        let (_root, catalog) = setup();
        assert!(catalog.list_targets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_targets_missing_directory_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let catalog = TargetCatalog::new(root.path());
        let err = catalog.list_targets().await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_list_targets_sees_new_files() {
        let (_root, catalog) = setup();
        assert!(catalog.list_targets().await.unwrap().is_empty());
        touch(catalog.targets_dir(), "fresh.md", "new");
        assert_eq!(catalog.list_targets().await.unwrap(), vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_read_target() {
        let (_root, catalog) = setup();
        touch(catalog.targets_dir(), "t1.md", "# Title\n\nBody");
        let text = catalog.read_target("t1").await.unwrap();
        assert_eq!(text, "# Title\n\nBody");
    }

    #[tokio::test]
    async fn test_read_target_missing_is_io_error() {
        let (_root, catalog) = setup();
        let err = catalog.read_target("nope").await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_read_target_rejects_traversal() {
        let (_root, catalog) = setup();
        let err = catalog.read_target("..").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_read_asset_with_content_type() {
        let (_root, catalog) = setup();
        std::fs::write(catalog.assets_dir().join("cover.png"), [1u8, 2, 3]).unwrap();
        let asset = catalog.read_asset("cover.png").await.unwrap();
        assert_eq!(asset.data, vec![1, 2, 3]);
        assert_eq!(asset.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_read_asset_rejects_traversal() {
        let (_root, catalog) = setup();
        let err = catalog.read_asset("../t1.md").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
