//! # Component Classes
//!
//! A component class is an immutable definition: name, optional parent,
//! declared states, and class-level render defaults. Parents are held as
//! `Arc<ComponentClass>` and must be built before their children, so a chain
//! is always finite and acyclic.
//!
//! ```rust
//! use cells_core::component::{ComponentClass, StateOutcome};
//!
//! # fn main() -> Result<(), cells_core::CellError> {
//! let base = ComponentClass::builder("WidgetCell")
//!     .state("show", |_cell| Ok(StateOutcome::render()))
//!     .build()?;
//!
//! let chart = ComponentClass::builder("ChartCell")
//!     .parent(base)
//!     .default_format("svg")
//!     .build()?;
//!
//! assert!(chart.find_state("show").is_some());
//! assert_eq!(chart.view_for_state("show"), "chart/show");
//! # Ok(())
//! # }
//! ```

use super::inflector::underscore;
use super::instance::ComponentInstance;
use super::state::{StateHandler, StateOutcome, ViewNamer};
use crate::error::{CellError, CellResult};
use crate::options::ClassDefaults;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Class-name suffix stripped when deriving a view prefix
pub const DEFAULT_CLASS_SUFFIX: &str = "_cell";

pub struct ComponentClass {
    class_name: String,
    class_suffix: String,
    view_prefix: String,
    parent: Option<Arc<ComponentClass>>,
    states: HashMap<String, StateHandler>,
    defaults: ClassDefaults,
    view_namer: Option<ViewNamer>,
}

impl ComponentClass {
    pub fn builder(class_name: impl Into<String>) -> ComponentClassBuilder {
        ComponentClassBuilder::new(class_name)
    }

    pub fn name(&self) -> &str {
        &self.class_name
    }

    /// Naming suffix this class was built for (`_cell` unless overridden)
    pub fn class_suffix(&self) -> &str {
        &self.class_suffix
    }

    /// Directory-like prefix used in this class's template identifiers
    pub fn view_prefix(&self) -> &str {
        &self.view_prefix
    }

    pub fn parent(&self) -> Option<&Arc<ComponentClass>> {
        self.parent.as_ref()
    }

    /// This class followed by each ancestor up to the root
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of classes in the chain, this one included
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    pub fn is_a(&self, class_name: &str) -> bool {
        self.ancestors().any(|class| class.class_name == class_name)
    }

    /// Handler for `state`, looked up from this class towards the root
    pub fn find_state(&self, state: &str) -> Option<&StateHandler> {
        self.ancestors().find_map(|class| class.states.get(state))
    }

    /// Whether this class itself (not an ancestor) declares `state`
    pub fn declares_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// All states callable on this class, inherited ones included
    pub fn state_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self
            .ancestors()
            .flat_map(|class| class.states.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    /// Template identifier this class uses for `view`
    pub fn view_for_state(&self, view: &str) -> String {
        match &self.view_namer {
            Some(namer) => namer(&self.view_prefix, view),
            None => format!("{}/{}", self.view_prefix, view),
        }
    }

    pub fn own_defaults(&self) -> &ClassDefaults {
        &self.defaults
    }

    /// Defaults with unset fields filled from ancestors
    pub fn effective_defaults(&self) -> ClassDefaults {
        self.ancestors()
            .skip(1)
            .fold(self.defaults.clone(), |merged, ancestor| {
                merged.inherit_from(&ancestor.defaults)
            })
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<&String> = self.states.keys().collect();
        states.sort();
        f.debug_struct("ComponentClass")
            .field("class_name", &self.class_name)
            .field("class_suffix", &self.class_suffix)
            .field("view_prefix", &self.view_prefix)
            .field("parent", &self.parent.as_ref().map(|p| p.name().to_string()))
            .field("states", &states)
            .field("defaults", &self.defaults)
            .field("view_namer", &self.view_namer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Iterator over a class and its ancestors, most-derived first
pub struct Ancestors<'a> {
    next: Option<&'a ComponentClass>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ComponentClass;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

pub struct ComponentClassBuilder {
    class_name: String,
    class_suffix: String,
    view_prefix: Option<String>,
    parent: Option<Arc<ComponentClass>>,
    states: HashMap<String, StateHandler>,
    defaults: ClassDefaults,
    view_namer: Option<ViewNamer>,
}

impl ComponentClassBuilder {
    fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            class_suffix: DEFAULT_CLASS_SUFFIX.to_string(),
            view_prefix: None,
            parent: None,
            states: HashMap::new(),
            defaults: ClassDefaults::default(),
            view_namer: None,
        }
    }

    pub fn parent(mut self, parent: Arc<ComponentClass>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare a state; redeclaring replaces the earlier handler
    pub fn state<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ComponentInstance<'_>) -> CellResult<StateOutcome> + Send + Sync + 'static,
    {
        self.states.insert(name.into(), Arc::new(handler));
        self
    }

    /// Naming suffix stripped from the underscored class name when deriving
    /// the view prefix; must match the registry's suffix
    pub fn class_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.class_suffix = suffix.into();
        self
    }

    /// Override the prefix derived from the class name
    pub fn view_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.view_prefix = Some(prefix.into());
        self
    }

    pub fn default_format(mut self, format: impl Into<String>) -> Self {
        self.defaults.format = Some(format.into());
        self
    }

    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.defaults.locale = Some(locale.into());
        self
    }

    pub fn default_handlers<I, S>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults.handlers = Some(handlers.into_iter().map(Into::into).collect());
        self
    }

    pub fn view_namer<F>(mut self, namer: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        self.view_namer = Some(Arc::new(namer));
        self
    }

    pub fn build(self) -> CellResult<Arc<ComponentClass>> {
        let invalid = |reason: String| CellError::InvalidComponent {
            class_name: self.class_name.clone(),
            reason,
        };

        if self.class_name.trim().is_empty() {
            return Err(invalid("class name must not be empty".to_string()));
        }

        if let Some(state) = self.states.keys().find(|name| !is_valid_state_name(name)) {
            return Err(invalid(format!("invalid state name '{state}'")));
        }

        if let Some(parent) = &self.parent {
            if parent.is_a(&self.class_name) {
                return Err(invalid(format!(
                    "parent chain of {} already contains {}",
                    parent.name(),
                    self.class_name
                )));
            }
        }

        let view_prefix = self
            .view_prefix
            .clone()
            .unwrap_or_else(|| derive_view_prefix(&self.class_name, &self.class_suffix));
        if view_prefix.is_empty() {
            return Err(invalid("view prefix must not be empty".to_string()));
        }

        Ok(Arc::new(ComponentClass {
            class_name: self.class_name,
            class_suffix: self.class_suffix,
            view_prefix,
            parent: self.parent,
            states: self.states,
            defaults: self.defaults,
            view_namer: self.view_namer,
        }))
    }
}

fn derive_view_prefix(class_name: &str, class_suffix: &str) -> String {
    let underscored = underscore(class_name);
    match underscored.strip_suffix(class_suffix) {
        Some(prefix) if !prefix.is_empty() && !prefix.ends_with('/') => prefix.to_string(),
        _ => underscored,
    }
}

fn is_valid_state_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
