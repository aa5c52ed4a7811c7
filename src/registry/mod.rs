//! # Registry
//!
//! Name-to-class lookup for components rendered by symbolic name.

pub mod component_registry;

pub use component_registry::{ComponentRegistry, RegistryStats};
