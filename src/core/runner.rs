//! The full split run: discover, shuffle and split, prepare output, copy.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

use crate::config::SplitConfig;
use crate::core::dataset::discover_images;
use crate::core::operations::{
    copy_subset, ensure_output_safe, prepare_output, CopyStats, OutputLayout,
};
use crate::core::split::{split_items, DatasetSplit};
use crate::error::SplitResult;

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub total: usize,
    pub train: CopyStats,
    pub val: CopyStats,
    pub output_dir: PathBuf,
}

impl SplitReport {
    pub fn missing_label_count(&self) -> usize {
        self.train.missing_labels.len() + self.val.missing_labels.len()
    }
}

/// Split the source directory into a fresh YOLO train/val tree.
///
/// Fatal conditions (bad config, missing source, no images, output holding
/// the source) are returned before the output directory is touched. I/O
/// failures after that point leave whatever was already copied in place.
#[instrument(skip_all, name = "run_split")]
pub fn run_split(config: &SplitConfig) -> SplitResult<SplitReport> {
    info!("--- Starting Dataset Split ---");
    config.validate()?;
    match serde_json::to_string(config) {
        Ok(json) => info!("Configuration: {}", json),
        Err(e) => warn!("Failed to serialize configuration: {}", e),
    }

    let items = discover_images(config)?;
    ensure_output_safe(config)?;

    let total = items.len();
    let split = split_items(items, config.val_ratio, config.seed);
    info!(
        "Splitting into {} training images and {} validation images.",
        split.train.len(),
        split.val.len()
    );

    let layout = OutputLayout::new(&config.output_dir);
    prepare_output(&layout)?;

    info!("Copying training files...");
    let train = copy_subset(
        split.subset(DatasetSplit::Train),
        &layout,
        DatasetSplit::Train,
    )?;
    info!("Copying validation files...");
    let val = copy_subset(split.subset(DatasetSplit::Val), &layout, DatasetSplit::Val)?;

    let report = SplitReport {
        total,
        train,
        val,
        output_dir: config.output_dir.clone(),
    };

    if report.missing_label_count() > 0 {
        warn!(
            "{} images were copied without a label file",
            report.missing_label_count()
        );
    }
    if let Ok(json) = serde_json::to_string(&report) {
        debug!("Split report: {}", json);
    }

    info!("--- Dataset Split Complete! ---");
    info!("Your YOLO-formatted dataset is now ready in: {:?}", config.output_dir);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitError;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;

    fn setup_source(dir: &Path, count: usize, with_labels: bool) {
        fs::create_dir_all(dir).unwrap();
        for i in 1..=count {
            fs::write(dir.join(format!("img{}.jpg", i)), format!("image {}", i)).unwrap();
            if with_labels {
                fs::write(dir.join(format!("img{}.txt", i)), "0 0.5 0.5 0.2 0.2").unwrap();
            }
        }
    }

    fn names_in(dir: &Path) -> BTreeSet<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn stems(names: &BTreeSet<String>) -> BTreeSet<String> {
        names
            .iter()
            .map(|n| Path::new(n).file_stem().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn config_for(root: &Path) -> SplitConfig {
        SplitConfig {
            source_dir: root.join("all"),
            output_dir: root.join("dataset"),
            ..SplitConfig::default()
        }
    }

    #[test]
    fn test_ten_images_split_eight_two() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        setup_source(&config.source_dir, 10, true);

        let report = run_split(&config).unwrap();
        assert_eq!(report.total, 10);
        assert_eq!(report.train.images, 8);
        assert_eq!(report.val.images, 2);
        assert_eq!(report.missing_label_count(), 0);

        let out = &config.output_dir;
        let val_images = names_in(&out.join("val/images"));
        let val_labels = names_in(&out.join("val/labels"));
        let train_images = names_in(&out.join("train/images"));
        let train_labels = names_in(&out.join("train/labels"));
        assert_eq!(val_images.len(), 2);
        assert_eq!(train_images.len(), 8);
        assert_eq!(stems(&val_images), stems(&val_labels));
        assert_eq!(stems(&train_images), stems(&train_labels));
        assert!(val_images.is_disjoint(&train_images));

        // Same seed, same validation filenames
        run_split(&config).unwrap();
        assert_eq!(names_in(&out.join("val/images")), val_images);
    }

    #[test]
    fn test_missing_label_still_copies_image() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        setup_source(&config.source_dir, 4, true);
        fs::write(config.source_dir.join("orphan.png"), "no label").unwrap();

        let report = run_split(&config).unwrap();
        assert_eq!(report.total, 5);
        assert_eq!(report.missing_label_count(), 1);

        let out = &config.output_dir;
        let in_train = out.join("train/images/orphan.png").exists();
        let in_val = out.join("val/images/orphan.png").exists();
        assert!(in_train ^ in_val);
        assert!(!out.join("train/labels/orphan.txt").exists());
        assert!(!out.join("val/labels/orphan.txt").exists());

        let missing: Vec<String> = report
            .train
            .missing_labels
            .iter()
            .chain(report.val.missing_labels.iter())
            .cloned()
            .collect();
        assert_eq!(missing, vec!["orphan.png".to_string()]);
    }

    #[test]
    fn test_rerun_removes_stale_files() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        setup_source(&config.source_dir, 6, true);
        fs::create_dir_all(config.output_dir.join("val/images")).unwrap();
        fs::write(config.output_dir.join("val/images/stale.jpg"), "old").unwrap();

        run_split(&config).unwrap();
        assert!(!config.output_dir.join("val/images/stale.jpg").exists());

        let total = names_in(&config.output_dir.join("train/images")).len()
            + names_in(&config.output_dir.join("val/images")).len();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_empty_source_leaves_output_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        fs::create_dir_all(&config.source_dir).unwrap();

        let err = run_split(&config).unwrap_err();
        assert!(matches!(err, SplitError::NoImagesFound(_)));
        assert!(!config.output_dir.exists());
    }

    #[test]
    fn test_missing_source_keeps_existing_output() {
        let temp = tempfile::tempdir().unwrap();
        let config = config_for(temp.path());
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.output_dir.join("keep.txt"), "keep").unwrap();

        let err = run_split(&config).unwrap_err();
        assert!(matches!(err, SplitError::SourceMissing(_)));
        assert!(err.is_fatal());
        assert!(config.output_dir.join("keep.txt").exists());
    }

    #[test]
    fn test_invalid_ratio_halts_before_discovery() {
        let temp = tempfile::tempdir().unwrap();
        let config = SplitConfig {
            val_ratio: 1.0,
            ..config_for(temp.path())
        };
        let err = run_split(&config).unwrap_err();
        assert!(matches!(err, SplitError::InvalidConfig(_)));
    }

    #[test]
    fn test_output_containing_source_is_refused() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("dataset/raw");
        setup_source(&source, 3, true);
        let config = SplitConfig {
            source_dir: source.clone(),
            output_dir: temp.path().join("dataset"),
            ..SplitConfig::default()
        };

        let err = run_split(&config).unwrap_err();
        assert!(matches!(err, SplitError::OutputContainsSource { .. }));
        assert_eq!(names_in(&source).len(), 6);
    }
}
