pub mod dedup;

pub use dedup::{annotate_duplicates, duplicate_groups, DuplicateGroup, DuplicateKind};
