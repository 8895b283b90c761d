use std::path::PathBuf;
use thiserror::Error;

/// Result type for a split run
pub type SplitResult<T> = Result<T, SplitError>;

/// Error types for a split run
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Source data directory not found at '{}'", .0.display())]
    SourceMissing(PathBuf),

    #[error("No image files found in '{}'", .0.display())]
    NoImagesFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "Output directory '{}' contains the source directory '{}'",
        .output.display(),
        .source_dir.display()
    )]
    OutputContainsSource {
        output: PathBuf,
        source_dir: PathBuf,
    },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl SplitError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SplitError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for conditions detected before the output tree is touched.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SplitError::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_is_not_fatal_tier() {
        let err = SplitError::io(
            "copying",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_fatal());
        assert_eq!(err.to_string(), "I/O error while copying: denied");
    }

    #[test]
    fn test_fatal_messages() {
        let err = SplitError::NoImagesFound(PathBuf::from("data/all"));
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "No image files found in 'data/all'");
        assert!(SplitError::SourceMissing(PathBuf::from("x")).is_fatal());
    }
}
