//! # Component Registry
//!
//! Maps symbolic component names to component classes.
//!
//! A name is turned into a class name by appending the configured suffix and
//! camelizing: `admin/user_profile` becomes `Admin::UserProfileCell`.
//! Registration happens at startup; lookups happen on every render, so the
//! map sits behind a read-mostly `RwLock`.
//!
//! A registry backing a caching engine is sealed against replacement: cached
//! resolutions are keyed by class name and never invalidated, so swapping
//! the class behind a name would serve the old class's answers.

use crate::component::inflector::camelize;
use crate::component::{ComponentClass, ComponentClassBuilder};
use crate::config::EngineConfig;
use crate::error::{CellError, CellResult};
use crate::logging::log_registry_operation;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Statistics about registered components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_components: usize,
    pub class_names: Vec<String>,
}

#[derive(Debug)]
pub struct ComponentRegistry {
    classes: RwLock<HashMap<String, Arc<ComponentClass>>>,
    suffix: String,
    replacement_allowed: AtomicBool,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new("_cell")
    }
}

impl ComponentRegistry {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            classes: RwLock::new(HashMap::new()),
            suffix: suffix.into(),
            replacement_allowed: AtomicBool::new(true),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.class_suffix.clone())
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Class builder preset with this registry's suffix
    pub fn class_builder(&self, class_name: impl Into<String>) -> ComponentClassBuilder {
        ComponentClass::builder(class_name).class_suffix(self.suffix.clone())
    }

    /// Refuse to replace or unregister classes from now on
    pub fn forbid_replacement(&self) {
        if self.replacement_allowed.swap(false, Ordering::AcqRel) {
            debug!("Component registry sealed against replacement");
        }
    }

    pub fn allows_replacement(&self) -> bool {
        self.replacement_allowed.load(Ordering::Acquire)
    }

    /// Class name a symbolic component name maps to
    pub fn class_name_for(&self, name: &str) -> String {
        camelize(&format!("{name}{}", self.suffix))
    }

    /// Register a class under its own name, replacing any earlier class
    /// with the same name unless replacement is forbidden
    pub fn register(&self, class: Arc<ComponentClass>) -> CellResult<()> {
        let class_suffix = camelize(&self.suffix);
        if !class.name().ends_with(&class_suffix) || class.name() == class_suffix {
            return Err(CellError::InvalidComponent {
                class_name: class.name().to_string(),
                reason: format!("class names must end with '{class_suffix}'"),
            });
        }
        if class.class_suffix() != self.suffix {
            return Err(CellError::InvalidComponent {
                class_name: class.name().to_string(),
                reason: format!(
                    "class was built for suffix '{}' but the registry uses '{}'",
                    class.class_suffix(),
                    self.suffix
                ),
            });
        }

        let class_name = class.name().to_string();
        let states = class.state_names();
        let replaced = {
            let mut classes = self.classes.write();
            if classes.contains_key(&class_name) && !self.allows_replacement() {
                return Err(CellError::InvalidComponent {
                    class_name,
                    reason: "already registered and template resolutions are cached".to_string(),
                });
            }
            classes.insert(class_name.clone(), class).is_some()
        };

        if replaced {
            warn!(class = %class_name, "Replaced previously registered component class");
        }
        debug!(class = %class_name, states = ?states, "Registered component class");
        log_registry_operation(
            "register",
            &class_name,
            if replaced { "replaced" } else { "registered" },
            Some(&states.join(",")),
        );
        Ok(())
    }

    /// Register several classes, stopping at the first invalid one
    pub fn register_all<I>(&self, classes: I) -> CellResult<()>
    where
        I: IntoIterator<Item = Arc<ComponentClass>>,
    {
        classes.into_iter().try_for_each(|class| self.register(class))
    }

    /// Remove a class; a sealed registry keeps its classes and returns `None`
    pub fn unregister(&self, class_name: &str) -> Option<Arc<ComponentClass>> {
        if !self.allows_replacement() {
            warn!(class = %class_name, "Refusing to unregister from a sealed registry");
            return None;
        }
        let removed = self.classes.write().remove(class_name);
        if removed.is_some() {
            log_registry_operation("unregister", class_name, "removed", None);
        }
        removed
    }

    /// Class for a symbolic component name
    pub fn resolve_class(&self, name: &str) -> CellResult<Arc<ComponentClass>> {
        let class_name = self.class_name_for(name);
        self.lookup_class(&class_name)
            .ok_or(CellError::ComponentNotFound {
                name: name.to_string(),
                class_name,
            })
    }

    /// Class by exact class name
    pub fn lookup_class(&self, class_name: &str) -> Option<Arc<ComponentClass>> {
        self.classes.read().get(class_name).cloned()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.read().contains_key(&self.class_name_for(name))
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Registered class names, sorted
    pub fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> RegistryStats {
        let class_names = self.class_names();
        RegistryStats {
            total_components: class_names.len(),
            class_names,
        }
    }
}
