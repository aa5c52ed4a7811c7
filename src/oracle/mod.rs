//! # Collaborator Interfaces
//!
//! The engine never touches template files or template languages itself. It
//! asks two external collaborators:
//!
//! - [`TemplateExistence`]: does a candidate template exist for the given
//!   formats, locales and handlers?
//! - [`TemplateRenderer`]: turn a template plus options and assigns into
//!   markup.
//!
//! Both are called synchronously on the rendering thread. Their errors are
//! carried through unchanged as [`CellError::Collaborator`](crate::CellError).
//!
//! [`InMemoryTemplates`] implements both over an in-process map.

pub mod memory;

use crate::options::CanonicalOptions;
use serde_json::{Map, Value};
use std::fmt;

pub use memory::{InMemoryTemplates, RenderCall};

/// Template-existence oracle consulted once per candidate during resolution
pub trait TemplateExistence: Send + Sync + fmt::Debug {
    fn exists(
        &self,
        candidate: &str,
        formats: &[String],
        locales: &[String],
        handlers: &[String],
    ) -> anyhow::Result<bool>;
}

/// What the renderer is asked to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Identifier confirmed by the existence oracle
    Resolved(String),
    /// Template source given directly by the caller
    Inline(String),
    /// Template file named directly by the caller
    File(String),
    /// Layout named by the caller with no view to wrap
    Layout(String),
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Resolved(id) => write!(f, "{id}"),
            TemplateSource::Inline(_) => write!(f, "(inline)"),
            TemplateSource::File(path) => write!(f, "file:{path}"),
            TemplateSource::Layout(name) => write!(f, "layout:{name}"),
        }
    }
}

/// Render oracle producing markup
pub trait TemplateRenderer: Send + Sync + fmt::Debug {
    fn render_to_markup(
        &self,
        source: &TemplateSource,
        options: &CanonicalOptions,
        assigns: &Map<String, Value>,
    ) -> anyhow::Result<String>;
}

/// Optional per-request log sink
pub trait RenderLogger: Send + Sync {
    fn log(&self, message: &str);
}
