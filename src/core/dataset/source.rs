use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::SplitConfig;
use crate::core::operations::label_path_for_image;
use crate::error::{SplitError, SplitResult};

/// An image in the source directory and its label, if one sits next to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    pub image_path: PathBuf,
    pub label_path: Option<PathBuf>,
}

impl SourceItem {
    /// Build an item, resolving the label in `source_dir`
    pub fn resolve(image_path: PathBuf, source_dir: &Path, config: &SplitConfig) -> Self {
        let label_path = label_path_for_image(source_dir, &image_path, config)
            .filter(|label| label.is_file());
        Self {
            image_path,
            label_path,
        }
    }

    pub fn file_name(&self) -> String {
        self.image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the immediate image files of the source directory.
///
/// Results are sorted by path so the order fed to the shuffle does not
/// depend on how the filesystem enumerates entries.
///
/// # Returns
/// * `Err(SplitError::SourceMissing)` if the directory does not exist
/// * `Err(SplitError::NoImagesFound)` if nothing matched
pub fn discover_images(config: &SplitConfig) -> SplitResult<Vec<SourceItem>> {
    let source_dir = &config.source_dir;

    let entries = fs::read_dir(source_dir).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SplitError::SourceMissing(source_dir.clone()),
        _ => SplitError::io(format!("listing {:?}", source_dir), e),
    })?;

    let mut image_paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SplitError::io(format!("listing {:?}", source_dir), e))?;
        let path = entry.path();
        if !config.is_image_file(&path) {
            continue;
        }
        // A directory named like an image is not an image
        if !path.is_file() {
            debug!("Skipping non-file entry {:?}", path);
            continue;
        }
        image_paths.push(path);
    }

    if image_paths.is_empty() {
        return Err(SplitError::NoImagesFound(source_dir.clone()));
    }

    image_paths.sort();
    info!("Found {} total images.", image_paths.len());

    Ok(image_paths
        .into_iter()
        .map(|path| SourceItem::resolve(path, source_dir, config))
        .collect())
}
