use cells_core::{ClassDefaults, RenderOptions};
use proptest::prelude::*;
use proptest::strategy::Just;

/// Strategy for template format names
pub fn format_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("html".to_string()),
        Just("js".to_string()),
        Just("xml".to_string()),
        "[a-z]{2,5}",
    ]
}

pub fn locale_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en".to_string()),
        Just("de".to_string()),
        "[a-z]{2}(-[A-Z]{2})?",
    ]
}

/// Strategy for state and view names
pub fn state_name_strategy() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,15}"
}

pub fn handlers_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{2,6}", 1..4)
}

/// Strategy for render options without an output mode
pub fn render_options_strategy() -> impl Strategy<Value = RenderOptions> {
    (
        prop::option::of(state_name_strategy()),
        prop::option::of(format_strategy()),
        prop::option::of(locale_strategy()),
        prop::option::of("[a-z]{3,8}"),
    )
        .prop_map(|(view, template_format, locale, layout)| RenderOptions {
            view,
            template_format,
            locale,
            layout,
            ..RenderOptions::default()
        })
}

pub fn class_defaults_strategy() -> impl Strategy<Value = ClassDefaults> {
    (
        prop::option::of(format_strategy()),
        prop::option::of(locale_strategy()),
        prop::option::of(handlers_strategy()),
    )
        .prop_map(|(format, locale, handlers)| ClassDefaults {
            format,
            locale,
            handlers,
        })
}
