use crate::cache::{CacheKey, ResolutionCache};
use crate::component::ComponentClass;
use crate::error::{CellError, CellResult};
use crate::oracle::TemplateExistence;
use crate::options::CanonicalOptions;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument, trace};

/// Resolver counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolverStats {
    /// Uncached resolutions, successful or not
    pub resolutions: u64,
    /// Existence-oracle calls made by those resolutions
    pub existence_checks: u64,
    pub missing: u64,
}

/// Inheritance-aware template lookup.
///
/// `Send + Sync`: holds only `Arc`s and atomics, so one resolver serves
/// every rendering thread.
#[derive(Debug)]
pub struct TemplatePathResolver {
    existence: Arc<dyn TemplateExistence>,
    cache: Arc<ResolutionCache>,
    resolutions: AtomicU64,
    existence_checks: AtomicU64,
    missing: AtomicU64,
}

impl TemplatePathResolver {
    pub fn new(existence: Arc<dyn TemplateExistence>, cache: Arc<ResolutionCache>) -> Self {
        Self {
            existence,
            cache,
            resolutions: AtomicU64::new(0),
            existence_checks: AtomicU64::new(0),
            missing: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// Candidate identifiers for `view`, most-derived class first.
    ///
    /// Always one entry per class in the chain.
    pub fn candidate_paths(&self, class: &ComponentClass, view: &str) -> Vec<String> {
        class
            .ancestors()
            .map(|ancestor| ancestor.view_for_state(view))
            .collect()
    }

    /// Resolve `view` for `class`, consulting the cache first when enabled
    #[instrument(skip(self, class, options), fields(class = %class.name()))]
    pub fn resolve(
        &self,
        class: &ComponentClass,
        view: &str,
        options: &CanonicalOptions,
    ) -> CellResult<String> {
        let key = CacheKey::new(class.name(), view, options.primary_format());
        self.cache
            .get_or_compute(key, || self.resolve_uncached(class, view, options))
    }

    /// Walk the chain without touching the cache
    pub fn resolve_uncached(
        &self,
        class: &ComponentClass,
        view: &str,
        options: &CanonicalOptions,
    ) -> CellResult<String> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        let candidates = self.candidate_paths(class, view);

        for candidate in &candidates {
            self.existence_checks.fetch_add(1, Ordering::Relaxed);
            let found = self.existence.exists(
                candidate,
                &options.formats,
                &options.locales,
                &options.handlers,
            )?;

            if found {
                debug!(
                    class = %class.name(),
                    view = %view,
                    template = %candidate,
                    "Resolved template"
                );
                return Ok(candidate.clone());
            }

            trace!(candidate = %candidate, "Template candidate not found");
        }

        self.missing.fetch_add(1, Ordering::Relaxed);
        debug!(
            class = %class.name(),
            view = %view,
            tried = ?candidates,
            "No template found in inheritance chain"
        );

        Err(CellError::MissingTemplate {
            class_name: class.name().to_string(),
            view: view.to_string(),
            candidates,
            options: Box::new(options.clone()),
        })
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            resolutions: self.resolutions.load(Ordering::Relaxed),
            existence_checks: self.existence_checks.load(Ordering::Relaxed),
            missing: self.missing.load(Ordering::Relaxed),
        }
    }
}
