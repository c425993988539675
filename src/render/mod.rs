//! Rendering of a [`WrappedType`] into generated source text.
//!
//! [`Renderer`] is the seam between resolution and output. The bundled
//! [`TemplateRenderer`] understands a Go-template-like language; see
//! [`template`] for the syntax and [`helpers`] for the callable functions.

mod eval;
pub mod helpers;
mod template;

use crate::errors::Result;
use crate::wrap::WrappedType;
use template::Segment;

pub use helpers::TemplateHelper;

/// Turns a resolved type into source text
pub trait Renderer {
    fn render(&self, ty: &WrappedType) -> Result<String>;
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    segments: Vec<Segment>,
}

impl TemplateRenderer {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self {
            segments: template::parse(source)?,
        })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, ty: &WrappedType) -> Result<String> {
        eval::Evaluator::new(ty).run(&self.segments)
    }
}
