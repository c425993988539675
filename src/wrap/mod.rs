//! Method-set resolution and normalization.
//!
//! Given a [`TypeLoader`](crate::types::TypeLoader) and a type name, this
//! module builds the [`WrappedType`] that templates render wrappers from:
//!
//! - [`naming`]: short, collision-free names for unnamed parameters
//! - [`params`]: parameter records with rendered, qualified types
//! - [`resolver`]: merged, deduplicated method sets with the context and
//!   error conventions tagged
//! - [`model`]: the resulting data model and its derived accessors

pub mod model;
pub mod naming;
pub mod params;
pub mod resolver;

pub use model::{Method, Param, WrappedType};
pub use naming::synthesize;
pub use params::normalize;
pub use resolver::{is_error_type, resolve};
