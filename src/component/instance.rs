//! Per-request component instances.
//!
//! An instance lives for one render cycle. It borrows the caller's
//! [`RenderContext`], carries the options it was created with, and collects
//! assigns that are handed to the renderer as the instance-variable
//! snapshot.

use super::class::ComponentClass;
use super::context::RenderContext;
use crate::dispatch::{CellEngine, DispatchPath, RenderTarget, RenderTrace, RenderWarning};
use crate::error::CellResult;
use crate::options::RenderOptions;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Saved per-state fields, restored when a nested state finishes
pub(crate) struct StateFrame {
    state: Option<String>,
    rendered: Option<String>,
}

pub struct ComponentInstance<'ctx> {
    engine: CellEngine,
    class: Arc<ComponentClass>,
    context: &'ctx RenderContext,
    options: Map<String, Value>,
    assigns: Map<String, Value>,
    current_state: Option<String>,
    rendered: Option<String>,
    trace: RenderTrace,
    warnings: Vec<RenderWarning>,
}

impl<'ctx> ComponentInstance<'ctx> {
    pub(crate) fn new(
        engine: CellEngine,
        class: Arc<ComponentClass>,
        context: &'ctx RenderContext,
        options: Map<String, Value>,
    ) -> Self {
        Self {
            engine,
            class,
            context,
            options,
            assigns: Map::new(),
            current_state: None,
            rendered: None,
            trace: RenderTrace::default(),
            warnings: Vec::new(),
        }
    }

    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    pub fn context(&self) -> &'ctx RenderContext {
        self.context
    }

    /// Options bag given at construction
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Expose a value to templates
    pub fn assign(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.assigns.insert(key.into(), value.into());
    }

    pub fn assigns(&self) -> &Map<String, Value> {
        &self.assigns
    }

    pub fn current_state(&self) -> Option<&str> {
        self.current_state.as_deref()
    }

    pub fn trace(&self) -> &RenderTrace {
        &self.trace
    }

    pub fn warnings(&self) -> &[RenderWarning] {
        &self.warnings
    }

    /// Run `state` and return its final markup
    pub fn render_state(&mut self, state: &str) -> CellResult<String> {
        let engine = self.engine.clone();
        engine.pipeline().render_state(self, state)
    }

    /// In-state render call. The returned markup also becomes the state's
    /// output if the handler then returns [`StateOutcome::NoOutput`].
    ///
    /// [`StateOutcome::NoOutput`]: super::StateOutcome::NoOutput
    pub fn render(&mut self, options: RenderOptions) -> CellResult<String> {
        let engine = self.engine.clone();
        let markup = engine.pipeline().render(self, &options)?;
        self.rendered = Some(markup.clone());
        Ok(markup)
    }

    /// Render another component for the same request
    pub fn render_cell(
        &self,
        name: &str,
        state: &str,
        options: Map<String, Value>,
    ) -> CellResult<String> {
        self.engine.render_cell(name, state, self.context, options)
    }

    pub(crate) fn begin_state(&mut self, state: &str) -> StateFrame {
        StateFrame {
            state: self.current_state.replace(state.to_string()),
            rendered: self.rendered.take(),
        }
    }

    pub(crate) fn end_state(&mut self, frame: StateFrame) {
        self.current_state = frame.state;
        self.rendered = frame.rendered;
    }

    pub(crate) fn take_rendered(&mut self) -> Option<String> {
        self.rendered.take()
    }

    pub(crate) fn record_dispatch(&mut self, state: &str, path: DispatchPath) {
        self.trace.push_dispatch(state, path);
    }

    pub(crate) fn record_target(&mut self, target: RenderTarget) {
        self.trace.push_target(target);
    }

    pub(crate) fn push_warning(&mut self, warning: RenderWarning) {
        self.warnings.push(warning);
    }
}

impl fmt::Debug for ComponentInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("class", &self.class.name())
            .field("request_id", &self.context.request_id())
            .field("options", &self.options)
            .field("assigns", &self.assigns)
            .field("current_state", &self.current_state)
            .field("trace", &self.trace)
            .field("warnings", &self.warnings)
            .finish()
    }
}
