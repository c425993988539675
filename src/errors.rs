//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wrapgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// The requested type is not declared in any loaded package
    #[error("type {name} not found in any loaded package")]
    TypeNotFound { name: String },

    /// Package manifest could not be read or decoded
    #[error("failed to load packages from {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// A type expression inside a manifest is malformed
    #[error("invalid type expression `{expr}`: {message}")]
    TypeSyntax { expr: String, message: String },

    /// Template source could not be parsed
    #[error("template syntax error at line {line}: {message}")]
    TemplateSyntax { line: usize, message: String },

    /// Template evaluation failed
    #[error("render error: {0}")]
    Render(String),

    /// Configuration file errors
    #[error("configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Required input missing after merging flags and configuration
    #[error("{0}")]
    Usage(String),

    /// File system errors with the offending path
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a type-not-found error
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::TypeNotFound { name: name.into() }
    }

    /// Create a load error for a manifest path
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a type-expression syntax error
    pub fn type_syntax(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeSyntax {
            expr: expr.into(),
            message: message.into(),
        }
    }

    /// Create a template syntax error at a 1-based line
    pub fn template_syntax(line: usize, message: impl Into<String>) -> Self {
        Self::TemplateSyntax {
            line,
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for attaching a path to I/O results
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| Error::io(path, e))
    }
}
