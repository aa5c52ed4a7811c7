//! State handlers and their tagged outcomes.

use super::instance::ComponentInstance;
use crate::error::CellResult;
use crate::options::RenderOptions;
use std::sync::Arc;

/// Result of invoking a state handler
#[derive(Debug, Clone, PartialEq)]
pub enum StateOutcome {
    /// Final markup; no template resolution happens
    Markup(String),
    /// Render with these options; resolution runs with them
    Render(RenderOptions),
    /// Nothing returned. Uses the handler's own `render` output if there was
    /// one, otherwise falls back to the implicit-render policy.
    NoOutput,
}

impl StateOutcome {
    pub fn markup(markup: impl Into<String>) -> Self {
        StateOutcome::Markup(markup.into())
    }

    /// Render the current state's view with default options
    pub fn render() -> Self {
        StateOutcome::Render(RenderOptions::new())
    }
}

impl From<String> for StateOutcome {
    fn from(markup: String) -> Self {
        StateOutcome::Markup(markup)
    }
}

impl From<&str> for StateOutcome {
    fn from(markup: &str) -> Self {
        StateOutcome::Markup(markup.to_string())
    }
}

impl From<RenderOptions> for StateOutcome {
    fn from(options: RenderOptions) -> Self {
        StateOutcome::Render(options)
    }
}

/// A state's callable body
pub type StateHandler =
    Arc<dyn Fn(&mut ComponentInstance<'_>) -> CellResult<StateOutcome> + Send + Sync>;

/// Per-class override of the `"{view_prefix}/{view}"` naming convention.
/// Receives the class's view prefix and the view name.
pub type ViewNamer = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;
