//! Command implementations.
//!
//! - **generate**: resolve a type and render a wrapper for it

pub mod generate;

pub use generate::{dump_model, file_header, generate, load_template, run};
