//! # Cell Engine
//!
//! Entry point for rendering components. Owns the configuration, registry,
//! resolver (with its cache) and render pipeline, all shared behind one
//! `Arc`, so clones are cheap and can be handed to every request thread.
//!
//! ```rust
//! use cells_core::component::{ComponentClass, RenderContext, StateOutcome};
//! use cells_core::config::EngineConfig;
//! use cells_core::dispatch::CellEngine;
//! use cells_core::oracle::InMemoryTemplates;
//! use cells_core::registry::ComponentRegistry;
//! use serde_json::Map;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), cells_core::CellError> {
//! let registry = Arc::new(ComponentRegistry::default());
//! registry.register(
//!     ComponentClass::builder("PostCell")
//!         .state("show", |_cell| Ok(StateOutcome::render()))
//!         .build()?,
//! )?;
//!
//! let templates = Arc::new(InMemoryTemplates::new().with_template("post/show", "<p>post</p>\n"));
//! let engine = CellEngine::in_memory(EngineConfig::default(), registry, templates)?;
//!
//! let context = RenderContext::new();
//! let markup = engine.render_cell("post", "show", &context, Map::new())?;
//! assert_eq!(markup, "<p>post</p>");
//! # Ok(())
//! # }
//! ```

use super::pipeline::{PipelineStats, RenderPipeline};
use crate::cache::{CacheStats, ResolutionCache};
use crate::component::{ComponentClass, ComponentInstance, RenderContext};
use crate::config::{ConfigurationError, EngineConfig};
use crate::error::CellResult;
use crate::logging::log_render_operation;
use crate::oracle::{InMemoryTemplates, TemplateExistence, TemplateRenderer};
use crate::options::{FallbackDefaults, OptionNormalizer};
use crate::registry::{ComponentRegistry, RegistryStats};
use crate::resolver::{ResolverStats, TemplatePathResolver};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Engine-wide statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStats {
    pub renders: u64,
    pub implicit_renders: u64,
    pub explicit_short_circuits: u64,
    /// Uncached path resolutions
    pub resolver_runs: u64,
    pub resolver: ResolverStats,
    pub cache: CacheStats,
    pub registry: RegistryStats,
}

#[derive(Debug)]
struct EngineInner {
    config: EngineConfig,
    registry: Arc<ComponentRegistry>,
    pipeline: RenderPipeline,
}

#[derive(Debug, Clone)]
pub struct CellEngine {
    inner: Arc<EngineInner>,
}

impl CellEngine {
    /// Build an engine; fails if `config` does not validate or the registry
    /// was built for a different class suffix. A caching engine seals the
    /// registry against replacement.
    pub fn new(
        config: EngineConfig,
        registry: Arc<ComponentRegistry>,
        existence: Arc<dyn TemplateExistence>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> CellResult<Self> {
        config.validate()?;
        if registry.suffix() != config.class_suffix {
            return Err(ConfigurationError::invalid_value(
                "class_suffix",
                registry.suffix(),
                format!(
                    "registry suffix does not match configured class suffix '{}'",
                    config.class_suffix
                ),
            )
            .into());
        }
        if config.cache_templates {
            registry.forbid_replacement();
        }

        let cache = Arc::new(ResolutionCache::from_config(&config));
        let resolver = TemplatePathResolver::new(existence, cache);
        let normalizer = OptionNormalizer::new(FallbackDefaults::from_config(&config));
        let pipeline = RenderPipeline::new(normalizer, resolver, renderer, config.implicit_render);

        info!(
            cache_templates = config.cache_templates,
            implicit_render = ?config.implicit_render,
            components = registry.len(),
            "Cell engine created"
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                config,
                registry,
                pipeline,
            }),
        })
    }

    /// Engine backed by one in-memory store for both collaborators
    pub fn in_memory(
        config: EngineConfig,
        registry: Arc<ComponentRegistry>,
        templates: Arc<InMemoryTemplates>,
    ) -> CellResult<Self> {
        let existence: Arc<dyn TemplateExistence> = Arc::clone(&templates) as _;
        Self::new(config, registry, existence, templates)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<ComponentRegistry> {
        &self.inner.registry
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        self.inner.pipeline.resolver().cache()
    }

    pub(crate) fn pipeline(&self) -> &RenderPipeline {
        &self.inner.pipeline
    }

    /// New instance of the component registered as `name`
    pub fn instantiate<'ctx>(
        &self,
        name: &str,
        context: &'ctx RenderContext,
        options: Map<String, Value>,
    ) -> CellResult<ComponentInstance<'ctx>> {
        let class = self.inner.registry.resolve_class(name)?;
        Ok(self.instantiate_class(class, context, options))
    }

    /// New instance of an unregistered (or already looked up) class
    pub fn instantiate_class<'ctx>(
        &self,
        class: Arc<ComponentClass>,
        context: &'ctx RenderContext,
        options: Map<String, Value>,
    ) -> ComponentInstance<'ctx> {
        ComponentInstance::new(self.clone(), class, context, options)
    }

    /// Instantiate `name` and render `state` in one step
    #[instrument(skip(self, context, options), fields(request_id = %context.request_id()))]
    pub fn render_cell(
        &self,
        name: &str,
        state: &str,
        context: &RenderContext,
        options: Map<String, Value>,
    ) -> CellResult<String> {
        let started = Instant::now();
        let request_id = context.request_id().to_string();

        let result = self
            .instantiate(name, context, options)
            .and_then(|mut instance| instance.render_state(state));

        let duration_ms = u64::try_from(started.elapsed().as_millis()).ok();
        match &result {
            Ok(_) => log_render_operation(name, state, &request_id, "rendered", duration_ms, None),
            Err(error) => log_render_operation(
                name,
                state,
                &request_id,
                "failed",
                duration_ms,
                Some(&error.to_string()),
            ),
        }

        result
    }

    pub fn stats(&self) -> EngineStats {
        let PipelineStats {
            renders,
            implicit_renders,
            explicit_short_circuits,
        } = self.inner.pipeline.stats();
        let resolver = self.inner.pipeline.resolver().stats();

        EngineStats {
            renders,
            implicit_renders,
            explicit_short_circuits,
            resolver_runs: resolver.resolutions,
            resolver,
            cache: self.cache().stats(),
            registry: self.inner.registry.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::StateOutcome;
    use crate::error::CellError;

    #[test]
    fn test_engine_is_send_sync_and_clone() {
        fn assert_traits<T: Send + Sync + Clone>() {}
        assert_traits::<CellEngine>();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            default_format: String::new(),
            ..EngineConfig::default()
        };
        let result = CellEngine::in_memory(
            config,
            Arc::new(ComponentRegistry::default()),
            Arc::new(InMemoryTemplates::new()),
        );
        assert!(matches!(
            result,
            Err(CellError::Configuration(ConfigurationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_registry_suffix_must_match_config() {
        let config = EngineConfig {
            class_suffix: "_widget".to_string(),
            ..EngineConfig::default()
        };
        let result = CellEngine::in_memory(
            config,
            Arc::new(ComponentRegistry::default()),
            Arc::new(InMemoryTemplates::new()),
        );
        match result {
            Err(CellError::Configuration(ConfigurationError::InvalidValue {
                field, value, ..
            })) => {
                assert_eq!(field, "class_suffix");
                assert_eq!(value, "_cell");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_caching_engine_seals_registry() {
        let badge = || {
            ComponentClass::builder("BadgeCell")
                .state("show", |_| Ok(StateOutcome::markup("<b>1</b>")))
                .build()
                .unwrap()
        };

        let registry = Arc::new(ComponentRegistry::default());
        registry.register(badge()).unwrap();
        let _engine = CellEngine::in_memory(
            EngineConfig::default(),
            Arc::clone(&registry),
            Arc::new(InMemoryTemplates::new()),
        )
        .unwrap();
        assert!(matches!(
            registry.register(badge()),
            Err(CellError::InvalidComponent { .. })
        ));

        let registry = Arc::new(ComponentRegistry::default());
        registry.register(badge()).unwrap();
        let _engine = CellEngine::in_memory(
            EngineConfig::default().with_cache_templates(false),
            Arc::clone(&registry),
            Arc::new(InMemoryTemplates::new()),
        )
        .unwrap();
        assert!(registry.allows_replacement());
        registry.register(badge()).unwrap();
    }

    #[test]
    fn test_instantiate_unknown_component() {
        let engine = CellEngine::in_memory(
            EngineConfig::default(),
            Arc::new(ComponentRegistry::default()),
            Arc::new(InMemoryTemplates::new()),
        )
        .unwrap();
        let context = RenderContext::new();
        assert!(matches!(
            engine.instantiate("ghost", &context, Map::new()),
            Err(CellError::ComponentNotFound { .. })
        ));
    }

    #[test]
    fn test_stats_track_short_circuits() {
        let registry = Arc::new(ComponentRegistry::default());
        registry
            .register(
                ComponentClass::builder("BadgeCell")
                    .state("show", |_| Ok(StateOutcome::markup("<b>1</b>\n")))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let templates = Arc::new(InMemoryTemplates::new());
        let engine =
            CellEngine::in_memory(EngineConfig::default(), registry, Arc::clone(&templates))
                .unwrap();

        let context = RenderContext::new();
        let markup = engine.render_cell("badge", "show", &context, Map::new()).unwrap();
        assert_eq!(markup, "<b>1</b>");

        let stats = engine.stats();
        assert_eq!(stats.renders, 1);
        assert_eq!(stats.explicit_short_circuits, 1);
        assert_eq!(stats.resolver_runs, 0);
        assert_eq!(stats.registry.total_components, 1);
        assert_eq!(templates.exists_calls(), 0);
    }
}
