mod file_ops;

pub use file_ops::{
    copy_subset, ensure_output_safe, label_path_for_image, prepare_output, CopyStats, OutputLayout,
};
