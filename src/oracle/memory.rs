//! In-process template store implementing both collaborator traits.
//!
//! Templates are keyed by identifier, optionally with a format extension
//! (`"post/show.js"`). A bare identifier matches every format. Rendering
//! returns the stored source verbatim; the store is not a template engine.

use super::{TemplateExistence, TemplateRenderer, TemplateSource};
use crate::options::CanonicalOptions;
use anyhow::anyhow;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A recorded render-oracle invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCall {
    pub source: TemplateSource,
    pub options: CanonicalOptions,
    pub assigns: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct InMemoryTemplates {
    templates: RwLock<HashMap<String, String>>,
    exists_calls: AtomicUsize,
    render_calls: Mutex<Vec<RenderCall>>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template(self, key: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(key, source);
        self
    }

    pub fn insert(&self, key: impl Into<String>, source: impl Into<String>) {
        self.templates.write().insert(key.into(), source.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.templates.write().remove(key)
    }

    /// Number of existence checks answered so far
    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::Relaxed)
    }

    pub fn render_calls(&self) -> Vec<RenderCall> {
        self.render_calls.lock().clone()
    }

    fn lookup(&self, identifier: &str, formats: &[String]) -> Option<String> {
        let templates = self.templates.read();
        formats
            .iter()
            .find_map(|format| templates.get(&format!("{identifier}.{format}")))
            .or_else(|| templates.get(identifier))
            .cloned()
    }
}

impl TemplateExistence for InMemoryTemplates {
    fn exists(
        &self,
        candidate: &str,
        formats: &[String],
        _locales: &[String],
        _handlers: &[String],
    ) -> anyhow::Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.lookup(candidate, formats).is_some())
    }
}

impl TemplateRenderer for InMemoryTemplates {
    fn render_to_markup(
        &self,
        source: &TemplateSource,
        options: &CanonicalOptions,
        assigns: &Map<String, Value>,
    ) -> anyhow::Result<String> {
        self.render_calls.lock().push(RenderCall {
            source: source.clone(),
            options: options.clone(),
            assigns: assigns.clone(),
        });

        match source {
            TemplateSource::Inline(body) => Ok(body.clone()),
            TemplateSource::Resolved(identifier)
            | TemplateSource::File(identifier)
            | TemplateSource::Layout(identifier) => self
                .lookup(identifier, &options.formats)
                .ok_or_else(|| anyhow!("template '{identifier}' is not in the store")),
        }
    }
}
