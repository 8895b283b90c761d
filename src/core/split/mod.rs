mod splitter;

pub use splitter::{split_items, DatasetSplit};
