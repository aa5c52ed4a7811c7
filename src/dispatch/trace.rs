//! Record of the branches a render cycle took.

use serde::Serialize;
use std::fmt;

/// How a state handler's outcome was turned into output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPath {
    /// Handler returned markup directly
    ExplicitMarkup,
    /// Handler returned render options
    ExplicitRender,
    /// Handler called `render` itself and returned nothing
    RenderInState,
    /// Handler returned nothing; the state's view was rendered for it
    ImplicitRender,
}

/// Where a single `render` call got its markup from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum RenderTarget {
    Nothing,
    Text,
    Inline,
    File(String),
    /// Layout rendered without a view
    Layout(String),
    /// Delegated to another state
    Delegated(String),
    /// Template found through path resolution
    Template(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub state: String,
    pub path: DispatchPath,
}

/// Ordered log of dispatch decisions and render targets for one instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderTrace {
    dispatches: Vec<DispatchRecord>,
    targets: Vec<RenderTarget>,
}

impl RenderTrace {
    pub(crate) fn push_dispatch(&mut self, state: &str, path: DispatchPath) {
        self.dispatches.push(DispatchRecord {
            state: state.to_string(),
            path,
        });
    }

    pub(crate) fn push_target(&mut self, target: RenderTarget) {
        self.targets.push(target);
    }

    /// Dispatch records in completion order (inner states first)
    pub fn dispatches(&self) -> &[DispatchRecord] {
        &self.dispatches
    }

    pub fn dispatch_paths(&self) -> Vec<DispatchPath> {
        self.dispatches.iter().map(|record| record.path).collect()
    }

    pub fn last_dispatch(&self) -> Option<&DispatchRecord> {
        self.dispatches.last()
    }

    pub fn targets(&self) -> &[RenderTarget] {
        &self.targets
    }

    pub fn fired(&self, path: DispatchPath) -> bool {
        self.dispatches.iter().any(|record| record.path == path)
    }

    /// Whether any render went through path resolution
    pub fn resolved_any(&self) -> bool {
        self.targets
            .iter()
            .any(|target| matches!(target, RenderTarget::Template(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.dispatches.is_empty() && self.targets.is_empty()
    }
}

/// Non-fatal condition observed during a render cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RenderWarning {
    /// A state returned nothing and never called `render`
    ImplicitRender { class_name: String, state: String },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderWarning::ImplicitRender { class_name, state } => write!(
                f,
                "{class_name}#{state} returned no output; rendering its view implicitly. \
                 Call render explicitly to silence this warning"
            ),
        }
    }
}
