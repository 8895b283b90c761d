use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SplitError, SplitResult};

/// Split configuration containing all hardcoded values
///
/// The defaults are the program's constants. A run receives this struct
/// explicitly instead of reading globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Flat directory holding images and their same-named label files
    pub source_dir: PathBuf,
    /// Destination root; recreated from scratch on every run
    pub output_dir: PathBuf,
    /// Fraction of images reserved for validation, in (0, 1)
    pub val_ratio: f64,
    pub seed: u64,
    /// Lowercase extensions, without the dot
    pub image_extensions: Vec<String>,
    pub label_extension: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("data/all"),
            output_dir: PathBuf::from("data/dataset"),
            val_ratio: 0.2,
            seed: 42,
            image_extensions: vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()],
            label_extension: "txt".to_string(),
        }
    }
}

impl SplitConfig {
    /// Check the ratio and extensions before anything touches the filesystem
    pub fn validate(&self) -> SplitResult<()> {
        // Written so that NaN fails too
        if !(self.val_ratio > 0.0 && self.val_ratio < 1.0) {
            return Err(SplitError::InvalidConfig(format!(
                "validation ratio must be between 0 and 1 (exclusive), got {}",
                self.val_ratio
            )));
        }
        if self.label_extension.trim_start_matches('.').is_empty() {
            return Err(SplitError::InvalidConfig(
                "label extension must not be empty".to_string(),
            ));
        }
        if self.image_extensions.is_empty() {
            return Err(SplitError::InvalidConfig(
                "at least one image extension is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Case-insensitive match of the file extension against `image_extensions`
    pub fn is_image_file(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy().to_lowercase();
                self.image_extensions
                    .iter()
                    .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
            }
            None => false,
        }
    }

    /// Label filename for an image: same stem, label extension
    pub fn label_file_name(&self, image_path: &Path) -> Option<String> {
        image_path.file_stem().map(|stem| {
            format!(
                "{}.{}",
                stem.to_string_lossy(),
                self.label_extension.trim_start_matches('.')
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = SplitConfig::default();
        assert_eq!(config.val_ratio, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.label_extension, "txt");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_ratio() {
        for ratio in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            let config = SplitConfig {
                val_ratio: ratio,
                ..SplitConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(SplitError::InvalidConfig(_))),
                "ratio {} should be rejected",
                ratio
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_label_extension() {
        let config = SplitConfig {
            label_extension: ".".to_string(),
            ..SplitConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_image_file_case_insensitive() {
        let config = SplitConfig::default();
        assert!(config.is_image_file(Path::new("a/img1.JPG")));
        assert!(config.is_image_file(Path::new("img2.jpeg")));
        assert!(config.is_image_file(Path::new("img3.Png")));
        assert!(!config.is_image_file(Path::new("img1.txt")));
        assert!(!config.is_image_file(Path::new("README")));
        assert!(!config.is_image_file(Path::new("clip.gif")));
    }

    #[test]
    fn test_label_file_name_swaps_extension() {
        let config = SplitConfig::default();
        assert_eq!(
            config.label_file_name(Path::new("/src/frame.001.jpg")),
            Some("frame.001.txt".to_string())
        );
    }
}
