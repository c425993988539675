//! Method-set resolution and template-driven wrapper generation for Go types.
//!
//! A run loads package descriptions through a [`TypeLoader`], resolves one
//! type into a [`WrappedType`] (its merged, normalized, exported method set)
//! and renders that model with a [`Renderer`].

// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod observability;
pub mod render;
pub mod types;
pub mod wrap;

// Re-export commonly used types
pub use crate::config::{GenerateConfig, WrapgenConfig};
pub use crate::errors::{Error, Result};
pub use crate::render::{Renderer, TemplateHelper, TemplateRenderer};
pub use crate::types::{Package, PackageSet, TypeDecl, TypeLoader};
pub use crate::wrap::{resolve, Method, Param, WrappedType};
