//! Diagram container markup.
//!
//! A diagram block becomes:
//!
//! ```html
//! <div class="mermaid-container">
//!   <div class="mermaid-controls">
//!     <button title="Zoom in" onclick="..."><i class="fas fa-search-plus"></i></button>
//!     <button title="Zoom out" onclick="..."><i class="fas fa-search-minus"></i></button>
//!     <div class="divider"></div>
//!     <button title="Reset zoom" onclick="..."><i class="fas fa-sync-alt"></i></button>
//!   </div>
//!   <div class="mermaid">graph TD ...</div>
//! </div>
//! ```
//!
//! The `onclick` handlers scale the rendered `<svg>` through its inline CSS
//! `transform`, so the controls work without any page script.

use vellum_dom::Element;

use crate::consts::{MIN_ZOOM, ZOOM_STEP};

/// Expression reading the current scale of the container's `<svg>`.
const CURRENT_SCALE_JS: &str = "(parseFloat(this.closest('.mermaid-container').querySelector('svg').style.transform.replace('scale(','').replace(')','')) || 1)";

/// Zoom control button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

impl ZoomAction {
    /// Button tooltip.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::In => "Zoom in",
            Self::Out => "Zoom out",
            Self::Reset => "Reset zoom",
        }
    }

    /// Font Awesome icon class.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::In => "fas fa-search-plus",
            Self::Out => "fas fa-search-minus",
            Self::Reset => "fas fa-sync-alt",
        }
    }

    /// Scale after pressing the button at `scale`.
    #[must_use]
    pub fn apply(self, scale: f64) -> f64 {
        match self {
            Self::In => scale + ZOOM_STEP,
            Self::Out => (scale - ZOOM_STEP).max(MIN_ZOOM),
            Self::Reset => 1.0,
        }
    }

    /// Inline `onclick` handler performing [`ZoomAction::apply`] in the browser.
    #[must_use]
    pub fn script(self) -> String {
        let target = "this.closest('.mermaid-container').querySelector('svg').style.transform";
        match self {
            Self::In => {
                format!("{target} = 'scale(' + ({CURRENT_SCALE_JS} + {ZOOM_STEP}) + ')'")
            }
            Self::Out => format!(
                "{target} = 'scale(' + Math.max({MIN_ZOOM}, {CURRENT_SCALE_JS} - {ZOOM_STEP}) + ')'"
            ),
            Self::Reset => format!("{target} = 'scale(1)'"),
        }
    }

    fn button(self) -> Element {
        Element::new("button")
            .with_attr("title", self.title())
            .with_attr("onclick", self.script())
            .with_child(Element::new("i").with_class(self.icon()))
    }
}

/// Container with the zoom control strip and a placeholder holding `source`.
#[must_use]
pub fn diagram_container(source: &str) -> Element {
    let controls = Element::new("div")
        .with_class("mermaid-controls")
        .with_child(ZoomAction::In.button())
        .with_child(ZoomAction::Out.button())
        .with_child(Element::new("div").with_class("divider"))
        .with_child(ZoomAction::Reset.button());

    let placeholder = Element::new("div").with_class("mermaid").with_text(source);

    Element::new("div")
        .with_class("mermaid-container")
        .with_child(controls)
        .with_child(placeholder)
}

/// Inline error shown in place of a diagram that failed to render.
#[must_use]
pub fn error_element(message: &str) -> Element {
    Element::new("pre")
        .with_attr("style", "color: red;")
        .with_text(format!("Mermaid Error: {message}"))
}

/// Whether `element` is a diagram placeholder awaiting rendering.
#[must_use]
pub fn is_placeholder(element: &Element) -> bool {
    element.has_class("mermaid")
}
