#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Cells Core
//!
//! Template resolution and render dispatch for hierarchical view components
//! ("cells").
//!
//! ## Overview
//!
//! A cell is a small view object: a component class declares named states,
//! each state decides what to render, and templates are looked up along the
//! class's inheritance chain so a subclass inherits every view it does not
//! override. Template storage and template languages stay outside the crate,
//! behind the [`oracle`] traits.
//!
//! ## Render Flow
//!
//! ```text
//! CellEngine::render_cell(name, state)
//!   → ComponentRegistry      name → class
//!   → RenderPipeline         state handler → outcome
//!   → OptionNormalizer       explicit > class default > fallback
//!   → TemplatePathResolver   leaf-first candidates, via ResolutionCache
//!   → TemplateRenderer       markup
//! ```
//!
//! ## Module Organization
//!
//! - [`component`] - Component classes, instances, request context
//! - [`options`] - Render options and normalization
//! - [`resolver`] - Inheritance-aware template lookup
//! - [`cache`] - Process-lifetime resolution cache
//! - [`dispatch`] - State dispatch, render pipeline, engine
//! - [`registry`] - Symbolic name to class lookup
//! - [`oracle`] - Collaborator traits and an in-memory store
//! - [`config`] - Layered configuration
//! - [`error`] - Error types
//! - [`logging`] - Tracing setup and structured log helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use cells_core::{CellEngine, ComponentClass, ComponentRegistry, EngineConfig, RenderContext};
//! use cells_core::{InMemoryTemplates, RenderOptions, StateOutcome};
//! use serde_json::Map;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), cells_core::CellError> {
//! let card = ComponentClass::builder("CardCell")
//!     .state("show", |cell| {
//!         cell.assign("title", "Hello");
//!         Ok(StateOutcome::render())
//!     })
//!     .build()?;
//! let promo = ComponentClass::builder("PromoCell")
//!     .parent(card)
//!     .state("teaser", |_| Ok(RenderOptions::new().view("show").into()))
//!     .build()?;
//!
//! let registry = Arc::new(ComponentRegistry::default());
//! registry.register(promo)?;
//!
//! let templates = Arc::new(InMemoryTemplates::new().with_template("card/show", "<div>card</div>"));
//! let engine = CellEngine::in_memory(EngineConfig::default(), registry, templates)?;
//!
//! let context = RenderContext::new();
//! // PromoCell has no "promo/show" template, so the parent's is used
//! assert_eq!(engine.render_cell("promo", "show", &context, Map::new())?, "<div>card</div>");
//! assert_eq!(engine.render_cell("promo", "teaser", &context, Map::new())?, "<div>card</div>");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod component;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod options;
pub mod registry;
pub mod resolver;

pub use cache::{CacheKey, CacheStats, ResolutionCache};
pub use component::{ComponentClass, ComponentInstance, RenderContext, StateOutcome};
pub use config::{ConfigManager, ConfigurationError, EngineConfig, ImplicitRenderPolicy};
pub use dispatch::{
    CellEngine, DispatchPath, EngineStats, RenderTarget, RenderTrace, RenderWarning,
};
pub use error::{CellError, CellResult};
pub use oracle::{
    InMemoryTemplates, RenderLogger, TemplateExistence, TemplateRenderer, TemplateSource,
};
pub use options::{CanonicalOptions, ClassDefaults, OptionNormalizer, OutputMode, RenderOptions};
pub use registry::{ComponentRegistry, RegistryStats};
pub use resolver::TemplatePathResolver;
