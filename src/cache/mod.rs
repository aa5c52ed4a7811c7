//! # Resolution Cache
//!
//! Process-lifetime memoization of template resolution.
//!
//! ## Design
//!
//! - Keyed by `(component class, view, primary format)`
//! - Enabled or disabled once, at construction, from
//!   [`EngineConfig::cache_templates`](crate::config::EngineConfig)
//! - No invalidation: an entry, once stored, is never replaced
//! - Only successful resolutions are stored; a missing template is looked
//!   up again on the next render
//! - Concurrent misses on the same key may compute redundantly; the first
//!   stored value wins and every caller returns the stored value
//! - Keys name classes, so a caching engine seals its registry: a class
//!   name cannot be re-registered or unregistered once caching is on

pub mod resolution_cache;

pub use resolution_cache::{CacheKey, CacheStats, ResolutionCache};
