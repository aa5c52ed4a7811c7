//! # Option Normalizer
//!
//! Merges a render call's explicit options with class defaults and the
//! engine-wide fallbacks into a [`CanonicalOptions`] record.
//!
//! ## Precedence
//!
//! ```text
//! format  = explicit template_format  > class default > fallback format
//! locale  = explicit locale           > class default > fallback locale
//! handlers=                             class default > fallback handlers
//! ```
//!
//! When the chosen format is not the fallback format, the fallback is
//! appended so a layout written only in the default format still applies.
//!
//! Normalization is pure: no I/O, no shared state, and equal inputs always
//! produce equal records.

use super::{CanonicalOptions, ClassDefaults, RenderOptions};
use crate::config::EngineConfig;

/// Engine-wide values used when neither the call nor the class sets one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackDefaults {
    pub format: String,
    pub locale: String,
    pub handlers: Vec<String>,
}

impl Default for FallbackDefaults {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl FallbackDefaults {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            format: config.default_format.clone(),
            locale: config.default_locale.clone(),
            handlers: config.default_handlers.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OptionNormalizer {
    fallback: FallbackDefaults,
}

impl OptionNormalizer {
    pub fn new(fallback: FallbackDefaults) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &FallbackDefaults {
        &self.fallback
    }

    /// Produce canonical options for rendering `state`
    pub fn normalize(
        &self,
        explicit: &RenderOptions,
        class_defaults: &ClassDefaults,
        state: &str,
    ) -> CanonicalOptions {
        let format = explicit
            .template_format
            .as_ref()
            .or(class_defaults.format.as_ref())
            .unwrap_or(&self.fallback.format)
            .clone();

        let mut formats = vec![format];
        if formats[0] != self.fallback.format {
            formats.push(self.fallback.format.clone());
        }

        let locale = explicit
            .locale
            .as_ref()
            .or(class_defaults.locale.as_ref())
            .unwrap_or(&self.fallback.locale)
            .clone();

        let handlers = class_defaults
            .handlers
            .clone()
            .unwrap_or_else(|| self.fallback.handlers.clone());

        // Output modes never reach path resolution, so they carry no view.
        // A bare layout names what to render, so the state is not assumed.
        let view = match (&explicit.view, &explicit.output, &explicit.layout) {
            (Some(view), None, _) => Some(view.clone()),
            (None, None, None) => Some(state.to_string()),
            _ => None,
        };

        CanonicalOptions {
            view,
            formats,
            locales: vec![locale],
            handlers,
            layout: explicit.layout.clone(),
            locals: explicit.locals.clone(),
            output: explicit.output.clone(),
            extra: explicit.extra.clone(),
        }
    }
}
