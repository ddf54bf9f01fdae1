pub mod file_operations;

pub use file_operations::{
    copy_file_with_metadata, destination_for, ensure_parent_dirs, is_same_file, move_file,
    walk_matching_files,
};
