//! # Render Pipeline
//!
//! Turns a state handler's outcome into final markup.
//!
//! ```text
//! render_state(state)
//!   │
//!   ├─ Markup(s)        → s                        (no resolution)
//!   ├─ Render(opts)     → render(opts)
//!   └─ NoOutput
//!        ├─ render() was called in the handler → that output
//!        └─ otherwise → policy: Warn  → warn + render(default)
//!                               Reject → ExplicitRenderRequired
//!
//! render(opts)
//!   normalize → nothing | text | inline | file | state | resolve + render
//!                                                       | layout only
//! ```
//!
//! The final output of each top-level state has exactly one trailing line
//! break removed. Delegated states contribute their raw output, so a
//! delegation chain is stripped once.

use super::trace::{DispatchPath, RenderTarget, RenderWarning};
use crate::component::{ComponentClass, ComponentInstance, StateHandler, StateOutcome};
use crate::config::ImplicitRenderPolicy;
use crate::error::{CellError, CellResult};
use crate::oracle::{TemplateRenderer, TemplateSource};
use crate::options::{CanonicalOptions, OptionNormalizer, OutputMode, RenderOptions};
use crate::resolver::TemplatePathResolver;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};

/// Dispatch counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    /// States rendered to completion
    pub renders: u64,
    pub implicit_renders: u64,
    /// States that returned markup and skipped resolution
    pub explicit_short_circuits: u64,
}

#[derive(Debug, Default)]
struct PipelineCounters {
    renders: AtomicU64,
    implicit_renders: AtomicU64,
    explicit_short_circuits: AtomicU64,
}

#[derive(Debug)]
pub struct RenderPipeline {
    normalizer: OptionNormalizer,
    resolver: TemplatePathResolver,
    renderer: Arc<dyn TemplateRenderer>,
    policy: ImplicitRenderPolicy,
    counters: PipelineCounters,
}

impl RenderPipeline {
    pub fn new(
        normalizer: OptionNormalizer,
        resolver: TemplatePathResolver,
        renderer: Arc<dyn TemplateRenderer>,
        policy: ImplicitRenderPolicy,
    ) -> Self {
        Self {
            normalizer,
            resolver,
            renderer,
            policy,
            counters: PipelineCounters::default(),
        }
    }

    pub fn normalizer(&self) -> &OptionNormalizer {
        &self.normalizer
    }

    pub fn resolver(&self) -> &TemplatePathResolver {
        &self.resolver
    }

    pub fn policy(&self) -> ImplicitRenderPolicy {
        self.policy
    }

    /// Invoke `state` on `instance` and return its final markup
    #[instrument(skip(self, instance), fields(class = %instance.class().name()))]
    pub fn render_state(
        &self,
        instance: &mut ComponentInstance<'_>,
        state: &str,
    ) -> CellResult<String> {
        self.run_state(instance, state).map(strip_trailing_newline)
    }

    /// Invoke `state` and return its unstripped output
    fn run_state(&self, instance: &mut ComponentInstance<'_>, state: &str) -> CellResult<String> {
        let class = Arc::clone(instance.class());
        let handler = class
            .find_state(state)
            .cloned()
            .ok_or_else(|| CellError::StateNotFound {
                class_name: class.name().to_string(),
                state: state.to_string(),
            })?;

        let frame = instance.begin_state(state);
        let result = self.dispatch(instance, &class, state, &handler);
        instance.end_state(frame);

        let markup = result?;
        self.counters.renders.fetch_add(1, Ordering::Relaxed);
        Ok(markup)
    }

    fn dispatch(
        &self,
        instance: &mut ComponentInstance<'_>,
        class: &ComponentClass,
        state: &str,
        handler: &StateHandler,
    ) -> CellResult<String> {
        match handler(instance)? {
            StateOutcome::Markup(markup) => {
                self.counters
                    .explicit_short_circuits
                    .fetch_add(1, Ordering::Relaxed);
                trace!(class = %class.name(), state = %state, "State returned markup");
                instance.record_dispatch(state, DispatchPath::ExplicitMarkup);
                Ok(markup)
            }
            StateOutcome::Render(options) => {
                let markup = self.render(instance, &options)?;
                instance.record_dispatch(state, DispatchPath::ExplicitRender);
                Ok(markup)
            }
            StateOutcome::NoOutput => match instance.take_rendered() {
                Some(markup) => {
                    instance.record_dispatch(state, DispatchPath::RenderInState);
                    Ok(markup)
                }
                None => self.implicit_render(instance, class, state),
            },
        }
    }

    fn implicit_render(
        &self,
        instance: &mut ComponentInstance<'_>,
        class: &ComponentClass,
        state: &str,
    ) -> CellResult<String> {
        if self.policy == ImplicitRenderPolicy::Reject {
            return Err(CellError::ExplicitRenderRequired {
                class_name: class.name().to_string(),
                state: state.to_string(),
            });
        }

        let warning = RenderWarning::ImplicitRender {
            class_name: class.name().to_string(),
            state: state.to_string(),
        };
        warn!(class = %class.name(), state = %state, "{warning}");
        instance.context().log(&warning.to_string());
        instance.push_warning(warning);
        self.counters.implicit_renders.fetch_add(1, Ordering::Relaxed);

        let markup = self.render(instance, &RenderOptions::new())?;
        instance.record_dispatch(state, DispatchPath::ImplicitRender);
        Ok(markup)
    }

    /// Render with `options` in the instance's current state
    pub fn render(
        &self,
        instance: &mut ComponentInstance<'_>,
        options: &RenderOptions,
    ) -> CellResult<String> {
        let class = Arc::clone(instance.class());
        let state = instance.current_state().unwrap_or_default().to_string();
        let canonical = self
            .normalizer
            .normalize(options, &class.effective_defaults(), &state);

        match &canonical.output {
            Some(OutputMode::Nothing) => {
                instance.record_target(RenderTarget::Nothing);
                Ok(String::new())
            }
            Some(OutputMode::Text(markup)) => {
                instance.record_target(RenderTarget::Text);
                Ok(markup.clone())
            }
            Some(OutputMode::Inline(source)) => {
                let markup = self.render_source(
                    instance,
                    TemplateSource::Inline(source.clone()),
                    &canonical,
                )?;
                instance.record_target(RenderTarget::Inline);
                Ok(markup)
            }
            Some(OutputMode::File(path)) => {
                let markup =
                    self.render_source(instance, TemplateSource::File(path.clone()), &canonical)?;
                instance.record_target(RenderTarget::File(path.clone()));
                Ok(markup)
            }
            Some(OutputMode::State(other)) => {
                debug!(class = %class.name(), from = %state, to = %other, "Delegating to state");
                instance.record_target(RenderTarget::Delegated(other.clone()));
                self.run_state(instance, other)
            }
            None => {
                let view = canonical.view.clone().filter(|view| !view.is_empty());
                let view = match (view, &canonical.layout) {
                    (Some(view), _) => view,
                    (None, Some(layout)) => {
                        let markup = self.render_source(
                            instance,
                            TemplateSource::Layout(layout.clone()),
                            &canonical,
                        )?;
                        instance.record_target(RenderTarget::Layout(layout.clone()));
                        return Ok(markup);
                    }
                    (None, None) => {
                        return Err(CellError::StateNotFound {
                            class_name: class.name().to_string(),
                            state: state.clone(),
                        })
                    }
                };
                let identifier = self.resolver.resolve(&class, &view, &canonical)?;
                let markup = self.render_source(
                    instance,
                    TemplateSource::Resolved(identifier.clone()),
                    &canonical,
                )?;
                instance.record_target(RenderTarget::Template(identifier));
                Ok(markup)
            }
        }
    }

    fn render_source(
        &self,
        instance: &ComponentInstance<'_>,
        source: TemplateSource,
        canonical: &CanonicalOptions,
    ) -> CellResult<String> {
        trace!(source = %source, "Rendering template");
        Ok(self
            .renderer
            .render_to_markup(&source, canonical, instance.assigns())?)
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            renders: self.counters.renders.load(Ordering::Relaxed),
            implicit_renders: self.counters.implicit_renders.load(Ordering::Relaxed),
            explicit_short_circuits: self
                .counters
                .explicit_short_circuits
                .load(Ordering::Relaxed),
        }
    }
}

/// Drop one trailing `"\n"` or `"\r\n"`
pub(crate) fn strip_trailing_newline(mut markup: String) -> String {
    if markup.ends_with('\n') {
        markup.pop();
        if markup.ends_with('\r') {
            markup.pop();
        }
    }
    markup
}
