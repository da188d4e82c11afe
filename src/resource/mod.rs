//! Filesystem resources used by a checker run: original sources and scoped
//! temporary files.

pub mod read;
pub mod temp;

pub use read::{decode_utf8, FileError, SourceFile};
pub use temp::TempFiles;
