//! State dispatch and render-option handling end to end.

mod common;

use cells_core::oracle::TemplateSource;
use cells_core::{
    CellError, ComponentClass, DispatchPath, EngineConfig, ImplicitRenderPolicy,
    InMemoryTemplates, RenderContext, RenderOptions, RenderTarget, RenderWarning, StateOutcome,
};
use common::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn engine_for(
    classes: Vec<Arc<ComponentClass>>,
    templates: &Arc<InMemoryTemplates>,
) -> cells_core::CellEngine {
    cached_engine(registry_with(classes), templates)
}

#[test]
fn test_explicit_markup_skips_resolution() {
    let templates = Arc::new(InMemoryTemplates::new());
    let engine = article_engine(EngineConfig::default(), &templates);
    let context = RenderContext::new();

    let mut instance = engine.instantiate("article", &context, Map::new()).unwrap();
    let markup = instance.render_state("header").unwrap();

    assert_eq!(markup, "<h1>base</h1>");
    assert_eq!(templates.exists_calls(), 0);
    assert!(templates.render_calls().is_empty());
    assert_eq!(instance.trace().dispatch_paths(), vec![DispatchPath::ExplicitMarkup]);
    assert!(!instance.trace().resolved_any());
    assert_eq!(engine.stats().resolver_runs, 0);
    assert_eq!(engine.stats().explicit_short_circuits, 1);
}

#[test]
fn test_render_outcome_resolves_and_renders() {
    let templates = Arc::new(InMemoryTemplates::new().with_template("base/show", "<p>x</p>"));
    let engine = article_engine(EngineConfig::default(), &templates);
    let context = RenderContext::new();

    let mut instance = engine.instantiate("article", &context, Map::new()).unwrap();
    assert_eq!(instance.render_state("show").unwrap(), "<p>x</p>");
    assert_eq!(instance.trace().dispatch_paths(), vec![DispatchPath::ExplicitRender]);
    assert_eq!(
        instance.trace().targets(),
        &[RenderTarget::Template("base/show".to_string())]
    );
    assert!(instance.current_state().is_none());
}

#[test]
fn test_render_inside_state_is_used_when_handler_returns_nothing() {
    let templates = Arc::new(InMemoryTemplates::new());
    let engine = article_engine(EngineConfig::default(), &templates);
    let context = RenderContext::new();

    let mut instance = engine.instantiate("featured_article", &context, Map::new()).unwrap();
    assert_eq!(instance.render_state("footer").unwrap(), "<footer>article</footer>");
    assert_eq!(instance.trace().dispatch_paths(), vec![DispatchPath::RenderInState]);
    assert!(instance.warnings().is_empty());
}

#[test]
fn test_implicit_render_warns_and_renders_state_view() {
    let templates = Arc::new(InMemoryTemplates::new().with_template("base/footer", "<footer/>\n"));
    let engine = article_engine(EngineConfig::default(), &templates);
    let logger = Arc::new(CollectingLogger::default());
    let context = RenderContext::new().with_logger(logger.clone());

    let mut instance = engine.instantiate("base", &context, Map::new()).unwrap();
    assert_eq!(instance.render_state("footer").unwrap(), "<footer/>");

    assert_eq!(
        instance.warnings(),
        &[RenderWarning::ImplicitRender {
            class_name: "BaseCell".to_string(),
            state: "footer".to_string(),
        }]
    );
    assert!(instance.trace().fired(DispatchPath::ImplicitRender));
    assert_eq!(logger.lines().len(), 1);
    assert!(logger.lines()[0].contains("BaseCell#footer"));
    assert_eq!(engine.stats().implicit_renders, 1);
}

#[test]
fn test_reject_policy_requires_explicit_render() {
    let templates = Arc::new(InMemoryTemplates::new().with_template("base/footer", "<footer/>"));
    let config = EngineConfig::default().with_implicit_render(ImplicitRenderPolicy::Reject);
    let engine = article_engine(config, &templates);
    let context = RenderContext::new();

    let err = engine.render_cell("base", "footer", &context, Map::new()).unwrap_err();
    match err {
        CellError::ExplicitRenderRequired { class_name, state } => {
            assert_eq!(class_name, "BaseCell");
            assert_eq!(state, "footer");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(templates.exists_calls(), 0);

    // rendering inside the state satisfies the policy
    assert_eq!(
        engine.render_cell("article", "footer", &context, Map::new()).unwrap(),
        "<footer>article</footer>"
    );
}

#[test]
fn test_unknown_state() {
    let templates = Arc::new(InMemoryTemplates::new());
    let engine = article_engine(EngineConfig::default(), &templates);
    let context = RenderContext::new();

    let err = engine.render_cell("base", "summary", &context, Map::new()).unwrap_err();
    assert!(matches!(
        err,
        CellError::StateNotFound { ref class_name, ref state }
            if class_name == "BaseCell" && state == "summary"
    ));
}

#[test]
fn test_output_modes() {
    let cell = ComponentClass::builder("ModesCell")
        .state("nothing", |_| {
            Ok(RenderOptions::new().nothing().text("ignored").into())
        })
        .state("text", |_| Ok(RenderOptions::new().text("<b>literal</b>").into()))
        .state("inline", |_| Ok(RenderOptions::new().inline("<i>inline</i>").into()))
        .state("file", |_| Ok(RenderOptions::new().file("shared/box").into()))
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new().with_template("shared/box", "<div>box</div>"));
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();
    let mut instance = engine.instantiate("modes", &context, Map::new()).unwrap();

    assert_eq!(instance.render_state("nothing").unwrap(), "");
    assert_eq!(instance.render_state("text").unwrap(), "<b>literal</b>");
    assert_eq!(instance.render_state("inline").unwrap(), "<i>inline</i>");
    assert_eq!(instance.render_state("file").unwrap(), "<div>box</div>");

    assert_eq!(
        instance.trace().targets(),
        &[
            RenderTarget::Nothing,
            RenderTarget::Text,
            RenderTarget::Inline,
            RenderTarget::File("shared/box".to_string()),
        ]
    );
    assert_eq!(templates.exists_calls(), 0);

    let sources: Vec<TemplateSource> = templates
        .render_calls()
        .into_iter()
        .map(|call| call.source)
        .collect();
    assert_eq!(
        sources,
        vec![
            TemplateSource::Inline("<i>inline</i>".to_string()),
            TemplateSource::File("shared/box".to_string()),
        ]
    );
}

#[test]
fn test_state_delegation_renders_other_state() {
    let cell = ComponentClass::builder("TabsCell")
        .state("show", |_| Ok(RenderOptions::new().state("tab").into()))
        .state("tab", |cell| {
            let label = cell.current_state().unwrap_or_default().to_string();
            Ok(StateOutcome::markup(format!("<li>{label}</li>\n")))
        })
        .state("both", |cell| {
            let first = cell.render_state("tab")?;
            let second = cell.render(RenderOptions::new().state("tab"))?;
            Ok(StateOutcome::markup(format!("{first}{second}")))
        })
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new());
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();
    let mut instance = engine.instantiate("tabs", &context, Map::new()).unwrap();

    assert_eq!(instance.render_state("show").unwrap(), "<li>tab</li>");
    assert_eq!(
        instance.trace().targets(),
        &[RenderTarget::Delegated("tab".to_string())]
    );
    assert_eq!(
        instance.trace().dispatch_paths(),
        vec![DispatchPath::ExplicitMarkup, DispatchPath::ExplicitRender]
    );

    assert_eq!(instance.render_state("both").unwrap(), "<li>tab</li><li>tab</li>");
    assert!(instance.current_state().is_none());
}

#[test]
fn test_delegation_chain_strips_one_newline() {
    let cell = ComponentClass::builder("ListCell")
        .state("show", |_| Ok(RenderOptions::new().state("item").into()))
        .state("item", |_| Ok(StateOutcome::markup("<li>x</li>\n\n")))
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new());
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();

    assert_eq!(
        engine.render_cell("list", "show", &context, Map::new()).unwrap(),
        "<li>x</li>\n"
    );
    assert_eq!(
        engine.render_cell("list", "item", &context, Map::new()).unwrap(),
        "<li>x</li>\n"
    );
}

#[test]
fn test_layout_without_view_renders_layout() {
    let cell = ComponentClass::builder("FrameCell")
        .state("show", |_| Ok(RenderOptions::new().layout("frame").into()))
        .build()
        .unwrap();

    // A template named after the state must not be picked up
    let templates = Arc::new(
        InMemoryTemplates::new()
            .with_template("frame/show", "<p>state view</p>")
            .with_template("frame", "<div class=\"frame\"></div>\n"),
    );
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();

    let mut instance = engine.instantiate("frame", &context, Map::new()).unwrap();
    assert_eq!(instance.render_state("show").unwrap(), "<div class=\"frame\"></div>");
    assert_eq!(
        instance.trace().targets(),
        &[RenderTarget::Layout("frame".to_string())]
    );
    assert_eq!(templates.exists_calls(), 0);

    let call = templates.render_calls().pop().unwrap();
    assert_eq!(call.source, TemplateSource::Layout("frame".to_string()));
    assert_eq!(call.options.view, None);
}

#[test]
fn test_single_trailing_newline_is_stripped() {
    let templates = Arc::new(
        InMemoryTemplates::new()
            .with_template("base/show", "<p>one</p>\n\n")
            .with_template("article/show", "<p>two</p>\r\n"),
    );
    let engine = article_engine(EngineConfig::default(), &templates);
    let context = RenderContext::new();

    assert_eq!(
        engine.render_cell("base", "show", &context, Map::new()).unwrap(),
        "<p>one</p>\n"
    );
    assert_eq!(
        engine.render_cell("article", "show", &context, Map::new()).unwrap(),
        "<p>two</p>"
    );
}

#[test]
fn test_assigns_locals_and_extra_options_reach_renderer() {
    let cell = ComponentClass::builder("ProfileCell")
        .state("show", |cell| {
            let name = cell.option("name").cloned().unwrap_or(Value::Null);
            cell.assign("name", name);
            cell.assign("page", cell.context().param("page").cloned().unwrap_or(Value::Null));
            Ok(RenderOptions::new()
                .view("show")
                .layout("card")
                .local("compact", true)
                .extra("cache_key", "profile-1")
                .into())
        })
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new().with_template("profile/show", "<p>p</p>"));
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new().with_param("page", 2);

    let mut options = Map::new();
    options.insert("name".to_string(), json!("Ada"));
    engine.render_cell("profile", "show", &context, options).unwrap();

    let call = templates.render_calls().pop().unwrap();
    assert_eq!(call.assigns.get("name"), Some(&json!("Ada")));
    assert_eq!(call.assigns.get("page"), Some(&json!(2)));
    assert_eq!(call.options.layout.as_deref(), Some("card"));
    assert_eq!(call.options.locals.get("compact"), Some(&json!(true)));
    assert_eq!(call.options.extra.get("cache_key"), Some(&json!("profile-1")));
}

#[test]
fn test_state_can_render_nested_component() {
    let badge = ComponentClass::builder("BadgeCell")
        .state("show", |_| Ok(StateOutcome::markup("<span>3</span>")))
        .build()
        .unwrap();
    let header = ComponentClass::builder("HeaderCell")
        .state("show", |cell| {
            let badge = cell.render_cell("badge", "show", Map::new())?;
            Ok(StateOutcome::markup(format!("<header>{badge}</header>")))
        })
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new());
    let engine = engine_for(vec![badge, header], &templates);
    let context = RenderContext::new();

    assert_eq!(
        engine.render_cell("header", "show", &context, Map::new()).unwrap(),
        "<header><span>3</span></header>"
    );
    assert_eq!(engine.stats().renders, 2);
}

#[test]
fn test_options_from_loose_map() {
    let cell = ComponentClass::builder("LooseCell")
        .state("show", |_| {
            let Value::Object(map) = json!({"view": "compact", "locale": "fr"}) else {
                unreachable!()
            };
            Ok(RenderOptions::from_map(map).into())
        })
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new().with_template("loose/compact", "<p>c</p>"));
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();

    assert_eq!(
        engine.render_cell("loose", "show", &context, Map::new()).unwrap(),
        "<p>c</p>"
    );
    let call = templates.render_calls().pop().unwrap();
    assert_eq!(call.options.locales, vec!["fr"]);
}

#[test]
fn test_renderer_failure_is_propagated() {
    let cell = ComponentClass::builder("BrokenCell")
        .state("show", |_| Ok(RenderOptions::new().file("missing/file").into()))
        .build()
        .unwrap();

    let templates = Arc::new(InMemoryTemplates::new());
    let engine = engine_for(vec![cell], &templates);
    let context = RenderContext::new();

    let err = engine.render_cell("broken", "show", &context, Map::new()).unwrap_err();
    assert!(matches!(err, CellError::Collaborator(_)));
    assert!(err.to_string().contains("missing/file"));
}
