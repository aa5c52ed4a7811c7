//! # Template Path Resolver
//!
//! Finds the template identifier for a view by walking a component's
//! inheritance chain.
//!
//! ## Resolution Flow
//!
//! ```text
//! (class, view, canonical options)
//!            │
//!       ┌────▼────┐   hit
//!       │ Cache   ├──────────────────► identifier
//!       └────┬────┘
//!            │ miss / disabled
//!   ┌────────▼─────────┐
//!   │ Candidates,      │   LeafCell  -> "leaf/show"
//!   │ most-derived     │   MidCell   -> "mid/show"
//!   │ first            │   RootCell  -> "root/show"
//!   └────────┬─────────┘
//!            │ ask existence oracle per candidate
//!      ┌─────▼──────┐ first yes
//!      │ exists?    ├─────────────► identifier (stored in cache)
//!      └─────┬──────┘
//!            │ none
//!            ▼
//!    MissingTemplate { candidates, options }
//! ```
//!
//! Resolution never looks at output modes; the pipeline only calls the
//! resolver for renders that need a view.

pub mod path_resolver;

pub use path_resolver::{ResolverStats, TemplatePathResolver};
