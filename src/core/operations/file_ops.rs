use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::SplitConfig;
use crate::core::dataset::SourceItem;
use crate::core::split::DatasetSplit;
use crate::error::{SplitError, SplitResult};

/// The four destination directories of a YOLO dataset
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<split>/images`
    pub fn images_dir(&self, split: DatasetSplit) -> PathBuf {
        self.root.join(split.as_str()).join("images")
    }

    /// `<root>/<split>/labels`
    pub fn labels_dir(&self, split: DatasetSplit) -> PathBuf {
        self.root.join(split.as_str()).join("labels")
    }

    pub fn all_dirs(&self) -> Vec<PathBuf> {
        DatasetSplit::all()
            .into_iter()
            .flat_map(|split| [self.images_dir(split), self.labels_dir(split)])
            .collect()
    }
}

/// Outcome of copying one image/label pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    WithLabel,
    MissingLabel,
}

/// Counts for one subset after copying
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CopyStats {
    pub images: usize,
    pub labels: usize,
    /// Image filenames copied without a label
    pub missing_labels: Vec<String>,
}

/// Get the label path for an image: same stem, label extension, looked up
/// in the source directory rather than next to wherever the image is now.
///
/// # Returns
/// * `None` if the image path has no file stem
pub fn label_path_for_image(
    source_dir: &Path,
    image_path: &Path,
    config: &SplitConfig,
) -> Option<PathBuf> {
    config
        .label_file_name(image_path)
        .map(|name| source_dir.join(name))
}

/// Refuse to wipe an output directory that holds the source directory.
pub fn ensure_output_safe(config: &SplitConfig) -> SplitResult<()> {
    if !config.output_dir.exists() {
        return Ok(());
    }
    let output = fs::canonicalize(&config.output_dir)
        .map_err(|e| SplitError::io(format!("resolving {:?}", config.output_dir), e))?;
    let source = fs::canonicalize(&config.source_dir)
        .map_err(|e| SplitError::io(format!("resolving {:?}", config.source_dir), e))?;

    if source.starts_with(&output) {
        return Err(SplitError::OutputContainsSource {
            output,
            source_dir: source,
        });
    }
    Ok(())
}

/// Delete the output tree if present and recreate the four split directories.
///
/// A missing output directory is not an error. Any other removal or
/// creation failure aborts with `SplitError::Io`.
pub fn prepare_output(layout: &OutputLayout) -> SplitResult<()> {
    match fs::remove_dir_all(layout.root()) {
        Ok(()) => info!("Removed previous output at {:?}", layout.root()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(SplitError::io(
                format!("removing old output {:?}", layout.root()),
                e,
            ))
        }
    }

    for dir in layout.all_dirs() {
        fs::create_dir_all(&dir)
            .map_err(|e| SplitError::io(format!("creating {:?}", dir), e))?;
    }

    info!("Created YOLO directory structure.");
    Ok(())
}

/// Copy an image into `images_dir` and its label into `labels_dir`.
///
/// A missing label only produces a warning; the image is copied regardless.
pub fn copy_pair(
    item: &SourceItem,
    images_dir: &Path,
    labels_dir: &Path,
) -> SplitResult<PairOutcome> {
    let image_name = item.image_path.file_name().ok_or_else(|| {
        SplitError::io(
            format!("copying {:?}", item.image_path),
            std::io::Error::new(ErrorKind::InvalidInput, "image path has no file name"),
        )
    })?;
    let image_dest = images_dir.join(image_name);
    fs::copy(&item.image_path, &image_dest).map_err(|e| {
        SplitError::io(
            format!("copying {:?} to {:?}", item.image_path, image_dest),
            e,
        )
    })?;
    debug!("Copied image {:?}", image_dest);

    match &item.label_path {
        Some(label_path) if label_path.exists() => {
            let label_name = label_path.file_name().unwrap_or_default();
            let label_dest = labels_dir.join(label_name);
            fs::copy(label_path, &label_dest).map_err(|e| {
                SplitError::io(format!("copying {:?} to {:?}", label_path, label_dest), e)
            })?;
            debug!("Copied label {:?}", label_dest);
            Ok(PairOutcome::WithLabel)
        }
        _ => {
            warn!("Label file not found for image: {}", item.file_name());
            Ok(PairOutcome::MissingLabel)
        }
    }
}

/// Copy every item of one subset into its split directories.
pub fn copy_subset(
    items: &[SourceItem],
    layout: &OutputLayout,
    split: DatasetSplit,
) -> SplitResult<CopyStats> {
    let images_dir = layout.images_dir(split);
    let labels_dir = layout.labels_dir(split);
    let mut stats = CopyStats::default();

    for item in items {
        match copy_pair(item, &images_dir, &labels_dir)? {
            PairOutcome::WithLabel => stats.labels += 1,
            PairOutcome::MissingLabel => stats.missing_labels.push(item.file_name()),
        }
        stats.images += 1;
    }

    info!(
        "Copied {} images and {} labels into {}",
        stats.images,
        stats.labels,
        split.as_str()
    );
    Ok(stats)
}
