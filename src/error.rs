//! Error types for the cells engine.
//!
//! Every failure a render cycle can produce is a [`CellError`]. Collaborator
//! failures (template existence checks, template rendering) are carried
//! through unchanged in [`CellError::Collaborator`].

use crate::config::ConfigurationError;
use crate::options::CanonicalOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CellError {
    /// Registry lookup failed for a symbolic component name
    #[error("Component not found: '{name}' (expected class {class_name})")]
    ComponentNotFound { name: String, class_name: String },

    /// No template exists at any level of the inheritance chain
    #[error("Missing template for {class_name}#{view}: tried {candidates:?}")]
    MissingTemplate {
        class_name: String,
        view: String,
        candidates: Vec<String>,
        options: Box<CanonicalOptions>,
    },

    /// The requested state is not declared on the class or its ancestors
    #[error("State '{state}' is not defined on {class_name} or its ancestors")]
    StateNotFound { class_name: String, state: String },

    /// A state produced no output under the reject policy
    #[error("{class_name}#{state} produced no output; call render explicitly")]
    ExplicitRenderRequired { class_name: String, state: String },

    /// A component class failed registration checks
    #[error("Invalid component definition {class_name}: {reason}")]
    InvalidComponent { class_name: String, reason: String },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Failure raised by an external collaborator, propagated unchanged
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl CellError {
    /// Candidate list for a missing template, if this is one
    pub fn candidates(&self) -> Option<&[String]> {
        match self {
            CellError::MissingTemplate { candidates, .. } => Some(candidates),
            _ => None,
        }
    }

    pub fn is_missing_template(&self) -> bool {
        matches!(self, CellError::MissingTemplate { .. })
    }
}

pub type CellResult<T> = std::result::Result<T, CellError>;
