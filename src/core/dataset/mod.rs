mod source;

pub use source::{discover_images, SourceItem};
