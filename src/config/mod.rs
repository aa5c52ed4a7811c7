//! # Engine Configuration
//!
//! Process-wide settings for the cells engine. A configuration is loaded once
//! at startup and handed to [`CellEngine`](crate::dispatch::CellEngine); it is
//! read-only afterwards.
//!
//! ## Sources
//!
//! [`ConfigManager`] layers, lowest precedence first:
//!
//! 1. Built-in defaults (see [`EngineConfig::for_environment`])
//! 2. `config/cells.{yaml,toml}`
//! 3. `config/cells-{environment}.{yaml,toml}`
//! 4. `CELLS_*` environment variables (`CELLS_CACHE_TEMPLATES=true`)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cells_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let config = manager.config();
//! println!("caching templates: {}", config.cache_templates);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use tracing::info;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// What to do when a state neither returns markup nor calls `render`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicitRenderPolicy {
    /// Log an implicit-render warning and render the state's own view
    #[default]
    Warn,
    /// Fail the render cycle with `ExplicitRenderRequired`
    Reject,
}

/// Root engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Memoize template resolution for the life of the process
    pub cache_templates: bool,

    /// Fallback format when neither the call nor the class names one
    pub default_format: String,

    /// Fallback locale when neither the call nor the class names one
    pub default_locale: String,

    /// Fallback template handler list
    pub default_handlers: Vec<String>,

    /// Behavior for states that produce no output
    pub implicit_render: ImplicitRenderPolicy,

    /// Suffix appended to a component name before camelizing it to a class name
    pub class_suffix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_templates: true,
            default_format: "html".to_string(),
            default_locale: "en".to_string(),
            default_handlers: vec!["erb".to_string()],
            implicit_render: ImplicitRenderPolicy::Warn,
            class_suffix: "_cell".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults for an environment: template caching is off while developing
    pub fn for_environment(environment: &str) -> Self {
        let cache_templates = !matches!(environment, "development" | "test");
        Self {
            cache_templates,
            ..Self::default()
        }
    }

    pub fn with_cache_templates(mut self, enabled: bool) -> Self {
        self.cache_templates = enabled;
        self
    }

    pub fn with_implicit_render(mut self, policy: ImplicitRenderPolicy) -> Self {
        self.implicit_render = policy;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_format.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "default_format",
                self.default_format.clone(),
                "default format must not be empty",
            ));
        }

        if self.default_locale.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "default_locale",
                self.default_locale.clone(),
                "default locale must not be empty",
            ));
        }

        if self.default_handlers.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigurationError::invalid_value(
                "default_handlers",
                self.default_handlers.join(","),
                "handler names must not be empty",
            ));
        }

        if self.class_suffix.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "class_suffix",
                String::new(),
                "class suffix must not be empty",
            ));
        }

        Ok(())
    }

    /// Log current configuration for debugging
    pub fn log_configuration(&self) {
        info!(
            cache_templates = self.cache_templates,
            default_format = %self.default_format,
            default_locale = %self.default_locale,
            default_handlers = ?self.default_handlers,
            implicit_render = ?self.implicit_render,
            class_suffix = %self.class_suffix,
            "Cells engine configuration"
        );
    }
}
