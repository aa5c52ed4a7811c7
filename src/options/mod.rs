//! # Render Options
//!
//! Caller-facing render options, class-level defaults, and the canonical
//! record the normalizer produces from them.
//!
//! ## Output Modes
//!
//! At most one output mode applies to a render call. When several are
//! requested the strongest wins:
//!
//! | Mode | Precedence | Effect |
//! |------|------------|--------|
//! | `nothing` | 3 | empty output, everything else ignored |
//! | `text` / `inline` / `file` | 2 | bypass path resolution |
//! | `state` | 1 | re-enter dispatch for another state |
//! | (none) | 0 | resolve the view through the inheritance chain |

pub mod normalizer;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub use normalizer::{FallbackDefaults, OptionNormalizer};

/// Explicit output mode requested by a render call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum OutputMode {
    /// Suppress output entirely
    Nothing,
    /// Literal markup, returned as is
    Text(String),
    /// Template source handed straight to the renderer
    Inline(String),
    /// Template file handed straight to the renderer
    File(String),
    /// Delegate to another state of the same component
    State(String),
}

impl OutputMode {
    pub fn precedence(&self) -> u8 {
        match self {
            OutputMode::Nothing => 3,
            OutputMode::Text(_) | OutputMode::Inline(_) | OutputMode::File(_) => 2,
            OutputMode::State(_) => 1,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputMode::Nothing => "nothing",
            OutputMode::Text(_) => "text",
            OutputMode::Inline(_) => "inline",
            OutputMode::File(_) => "file",
            OutputMode::State(_) => "state",
        }
    }
}

/// Options passed to a single `render` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    pub view: Option<String>,
    pub template_format: Option<String>,
    pub locale: Option<String>,
    pub layout: Option<String>,
    pub locals: Map<String, Value>,
    pub output: Option<OutputMode>,
    /// Unrecognized keys, forwarded untouched to the renderer
    pub extra: BTreeMap<String, Value>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a specific view instead of the current state's
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn template_format(mut self, format: impl Into<String>) -> Self {
        self.template_format = Some(format.into());
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn local(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(key.into(), value.into());
        self
    }

    pub fn text(self, markup: impl Into<String>) -> Self {
        self.with_output(OutputMode::Text(markup.into()))
    }

    pub fn inline(self, source: impl Into<String>) -> Self {
        self.with_output(OutputMode::Inline(source.into()))
    }

    pub fn file(self, path: impl Into<String>) -> Self {
        self.with_output(OutputMode::File(path.into()))
    }

    pub fn nothing(self) -> Self {
        self.with_output(OutputMode::Nothing)
    }

    pub fn state(self, state: impl Into<String>) -> Self {
        self.with_output(OutputMode::State(state.into()))
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Set an output mode unless a stronger one is already present
    pub fn with_output(mut self, mode: OutputMode) -> Self {
        let keep_current = self
            .output
            .as_ref()
            .is_some_and(|current| current.precedence() > mode.precedence());
        if !keep_current {
            self.output = Some(mode);
        }
        self
    }

    /// Build options from a loose key/value map.
    ///
    /// Recognized keys: `view`, `template_format`, `locale`, `layout`,
    /// `locals`, `text`, `inline`, `file`, `nothing`, `state`. Anything else
    /// lands in [`RenderOptions::extra`].
    pub fn from_map(map: Map<String, Value>) -> Self {
        let mut options = RenderOptions::new();

        for (key, value) in map {
            let unrecognized = match (key.as_str(), value) {
                ("view", Value::String(s)) => {
                    options.view = Some(s);
                    None
                }
                ("template_format", Value::String(s)) => {
                    options.template_format = Some(s);
                    None
                }
                ("locale", Value::String(s)) => {
                    options.locale = Some(s);
                    None
                }
                ("layout", Value::String(s)) => {
                    options.layout = Some(s);
                    None
                }
                ("locals", Value::Object(locals)) => {
                    options.locals.extend(locals);
                    None
                }
                ("text", Value::String(s)) => {
                    options = options.text(s);
                    None
                }
                ("inline", Value::String(s)) => {
                    options = options.inline(s);
                    None
                }
                ("file", Value::String(s)) => {
                    options = options.file(s);
                    None
                }
                ("state", Value::String(s)) => {
                    options = options.state(s);
                    None
                }
                ("nothing", flag) => {
                    if is_truthy(&flag) {
                        options = options.nothing();
                    }
                    None
                }
                (_, other) => Some(other),
            };

            if let Some(value) = unrecognized {
                options.extra.insert(key, value);
            }
        }

        options
    }
}

fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Class-level defaults; unset fields inherit from the parent class
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefaults {
    pub format: Option<String>,
    pub locale: Option<String>,
    pub handlers: Option<Vec<String>>,
}

impl ClassDefaults {
    /// Fill unset fields from `parent`
    pub fn inherit_from(&self, parent: &ClassDefaults) -> ClassDefaults {
        ClassDefaults {
            format: self.format.clone().or_else(|| parent.format.clone()),
            locale: self.locale.clone().or_else(|| parent.locale.clone()),
            handlers: self.handlers.clone().or_else(|| parent.handlers.clone()),
        }
    }
}

/// Fully merged options for one render-oracle invocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalOptions {
    /// View to resolve; `None` when an output mode bypasses resolution
    pub view: Option<String>,
    /// Requested format first, fallback format appended when different
    pub formats: Vec<String>,
    pub locales: Vec<String>,
    pub handlers: Vec<String>,
    pub layout: Option<String>,
    pub locals: Map<String, Value>,
    pub output: Option<OutputMode>,
    pub extra: BTreeMap<String, Value>,
}

impl CanonicalOptions {
    /// Format used as the resolution cache discriminator
    pub fn primary_format(&self) -> &str {
        self.formats.first().map(String::as_str).unwrap_or_default()
    }
}
