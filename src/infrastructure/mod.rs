//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where nestview keeps its configuration and trace files, and turns
//! user-typed paths into filesystem paths.

pub mod paths;

pub use paths::{config_dir, config_file, data_dir, expand_tilde};
