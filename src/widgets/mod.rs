//! Interactive widgets embedded in chapter content.
//!
//! A widget turns a placeholder in the Markdown source into HTML. Each
//! widget is reachable two ways:
//!
//! | Form | Example |
//! |------|---------|
//! | Component tag | `<Mermaid chart={`graph TD; A-->B`} />` |
//! | Fenced block | ```` ```mermaid ```` … ```` ``` ```` |
//!
//! The [`WidgetRegistry`] maps tag names and fence languages to
//! implementations, so new widgets plug in without touching the content
//! resolver. A widget that fails to render produces an inline error box;
//! the rest of the page is unaffected.
//!
//! | Module | Role |
//! |--------|------|
//! | [`tags`] | Scanner for JSX-style component tags |
//! | [`mermaid`] | Diagram widget (`Mermaid`, ```` ```mermaid ````) |
//! | [`playground`] | Code editor widget (`CodePlayground`, ```` ```playground ````) |

pub mod mermaid;
pub mod playground;
pub mod tags;

use crate::config::SiteConfig;
use maud::{Markup, html};
use thiserror::Error;

pub use tags::{Props, TagError, TagMatch, find_tags};

#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("invalid diagram: {0}")]
    InvalidDiagram(String),
    #[error("missing required prop '{0}'")]
    MissingProp(&'static str),
    #[error("invalid value for '{prop}': {value}")]
    InvalidProp { prop: &'static str, value: String },
}

pub trait Widget: Send + Sync {
    /// Component tag name (`Mermaid`).
    fn name(&self) -> &'static str;

    /// Fence language rendered through this widget, if any.
    fn fence(&self) -> Option<&'static str> {
        None
    }

    /// Prop that receives a fenced block's text or a paired tag's children.
    fn body_prop(&self) -> &'static str;

    /// Text shown in place of the widget when rendering fails.
    fn failure_message(&self) -> &str {
        "Widget rendering failed."
    }

    fn render(&self, props: &Props) -> Result<Markup, WidgetError>;
}

/// Name → widget lookup, in registration order.
#[derive(Default)]
pub struct WidgetRegistry {
    widgets: Vec<Box<dyn Widget>>,
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the diagram and playground widgets, set up from
    /// the site's labels and playground defaults.
    pub fn with_builtins(config: &SiteConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(mermaid::Mermaid::new(
            config.labels.diagram_error.clone(),
        )));
        registry.register(Box::new(playground::CodePlayground::new(
            config.playground.clone(),
        )));
        registry
    }

    /// Add a widget; a later widget with the same name replaces the earlier one.
    pub fn register(&mut self, widget: Box<dyn Widget>) {
        self.widgets.retain(|w| w.name() != widget.name());
        self.widgets.push(widget);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|w| w.name() == name)
            .map(|w| &**w)
    }

    pub fn by_fence(&self, lang: &str) -> Option<&dyn Widget> {
        self.widgets
            .iter()
            .find(|w| w.fence() == Some(lang))
            .map(|w| &**w)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.widgets.iter().map(|w| w.name()).collect()
    }

    /// Render `widget`, replacing a failure with an inline error box.
    pub fn render(&self, widget: &dyn Widget, props: &Props) -> Markup {
        match widget.render(props) {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("{} widget failed: {}", widget.name(), e);
                error_box(widget, &e)
            }
        }
    }
}

fn error_box(widget: &dyn Widget, error: &WidgetError) -> Markup {
    html! {
        div.widget-error role="alert" data-widget=(widget.name()) {
            p { (widget.failure_message()) }
            small { (error.to_string()) }
        }
    }
}
