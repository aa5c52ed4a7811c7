//! Component fixtures and collaborator doubles shared by integration tests.

use anyhow::anyhow;
use cells_core::{
    CellEngine, ComponentClass, ComponentRegistry, EngineConfig, InMemoryTemplates,
    RenderLogger, RenderOptions, StateOutcome, TemplateExistence, TemplateRenderer,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Three-level chain used across the suite:
///
/// ```text
/// BaseCell            show (render), header (markup), footer (no output)
///   └ ArticleCell     summary (render view "show"), footer (render in state)
///       └ FeaturedArticleCell   header (markup override)
/// ```
pub struct ArticleChain {
    pub base: Arc<ComponentClass>,
    pub article: Arc<ComponentClass>,
    pub featured: Arc<ComponentClass>,
}

impl ArticleChain {
    pub fn build() -> Self {
        let base = ComponentClass::builder("BaseCell")
            .state("show", |_| Ok(StateOutcome::render()))
            .state("header", |_| Ok(StateOutcome::markup("<h1>base</h1>\n")))
            .state("footer", |_| Ok(StateOutcome::NoOutput))
            .build()
            .expect("BaseCell");

        let article = ComponentClass::builder("ArticleCell")
            .parent(Arc::clone(&base))
            .state("summary", |_| Ok(RenderOptions::new().view("show").into()))
            .state("footer", |cell| {
                cell.render(RenderOptions::new().text("<footer>article</footer>"))?;
                Ok(StateOutcome::NoOutput)
            })
            .build()
            .expect("ArticleCell");

        let featured = ComponentClass::builder("FeaturedArticleCell")
            .parent(Arc::clone(&article))
            .state("header", |_| Ok(StateOutcome::markup("<h1>featured</h1>")))
            .build()
            .expect("FeaturedArticleCell");

        Self {
            base,
            article,
            featured,
        }
    }

    pub fn classes(&self) -> Vec<Arc<ComponentClass>> {
        vec![
            Arc::clone(&self.base),
            Arc::clone(&self.article),
            Arc::clone(&self.featured),
        ]
    }
}

pub fn registry_with(classes: Vec<Arc<ComponentClass>>) -> Arc<ComponentRegistry> {
    let registry = Arc::new(ComponentRegistry::default());
    registry.register_all(classes).expect("valid component classes");
    registry
}

/// Engine over `templates` with template caching on
pub fn cached_engine(
    registry: Arc<ComponentRegistry>,
    templates: &Arc<InMemoryTemplates>,
) -> CellEngine {
    CellEngine::in_memory(EngineConfig::default(), registry, Arc::clone(templates))
        .expect("valid engine")
}

/// Engine over `templates` with template caching off
pub fn uncached_engine(
    registry: Arc<ComponentRegistry>,
    templates: &Arc<InMemoryTemplates>,
) -> CellEngine {
    CellEngine::in_memory(
        EngineConfig::default().with_cache_templates(false),
        registry,
        Arc::clone(templates),
    )
    .expect("valid engine")
}

/// Engine for the article chain with the given config
pub fn article_engine(config: EngineConfig, templates: &Arc<InMemoryTemplates>) -> CellEngine {
    let chain = ArticleChain::build();
    CellEngine::in_memory(config, registry_with(chain.classes()), Arc::clone(templates))
        .expect("valid engine")
}

/// Request logger that keeps every line
#[derive(Debug, Default)]
pub struct CollectingLogger {
    lines: Mutex<Vec<String>>,
}

impl CollectingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl RenderLogger for CollectingLogger {
    fn log(&self, message: &str) {
        self.lines.lock().push(message.to_string());
    }
}

/// Existence oracle whose backing store is unavailable
#[derive(Debug, Default)]
pub struct OfflineStore;

impl TemplateExistence for OfflineStore {
    fn exists(
        &self,
        _candidate: &str,
        _formats: &[String],
        _locales: &[String],
        _handlers: &[String],
    ) -> anyhow::Result<bool> {
        Err(anyhow!("template store offline"))
    }
}

/// Engine whose existence oracle always fails
pub fn offline_engine(registry: Arc<ComponentRegistry>) -> CellEngine {
    let renderer: Arc<dyn TemplateRenderer> = Arc::new(InMemoryTemplates::new());
    CellEngine::new(
        EngineConfig::default(),
        registry,
        Arc::new(OfflineStore),
        renderer,
    )
    .expect("valid engine")
}
