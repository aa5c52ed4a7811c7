//! # Components
//!
//! Component classes (definitions), per-request instances, the request
//! context they borrow, and the naming conventions tying them to template
//! identifiers.

pub mod class;
pub mod context;
pub mod inflector;
pub mod instance;
pub mod state;

pub use class::{Ancestors, ComponentClass, ComponentClassBuilder};
pub use context::RenderContext;
pub use instance::ComponentInstance;
pub use state::{StateHandler, StateOutcome, ViewNamer};
