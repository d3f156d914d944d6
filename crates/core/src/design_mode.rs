//! Design-mode message protocol, constants, and validation.
//!
//! Design mode lets the builder UI visually inspect and edit the app
//! preview rendered inside an iframe. The host page and the injected
//! client script talk over `window.postMessage`; this module lives in
//! `core` (zero internal deps) so the API layer, the message handlers,
//! and any future tooling all reference the same message shapes.
//!
//! The module is a pure data contract: it owns no runtime state and
//! performs no messaging itself.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Channel constants
// ---------------------------------------------------------------------------

/// Stamped on every design-mode postMessage payload so both ends can
/// discard unrelated traffic sharing the same window channel.
pub const DESIGN_MODE_MESSAGE_PREFIX: &str = "sitecraft-design-mode";

/// Element tags skipped entirely during hover and selection.
pub const IGNORED_ELEMENT_TAGS: &[&str] = &[
    "html", "head", "base", "title", "meta", "link", "style", "script", "noscript", "template",
];

/// Element tags presumed to carry directly editable text content.
pub const TEXT_EDITABLE_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "a", "button", "li", "td", "th", "label",
    "blockquote", "figcaption", "strong", "em", "small",
];

/// Returns `true` if the tag is excluded from selection. Tag comparison
/// is ASCII case-insensitive, matching DOM tag-name behaviour.
pub fn is_ignored_element(tag: &str) -> bool {
    IGNORED_ELEMENT_TAGS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

/// Returns `true` if the tag is presumed to carry editable text.
pub fn is_text_editable(tag: &str) -> bool {
    TEXT_EDITABLE_TAGS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

// ---------------------------------------------------------------------------
// Computed-style extraction
// ---------------------------------------------------------------------------

/// The CSS properties captured from `getComputedStyle` for every hovered
/// or selected element, in extraction order.
///
/// Must stay in sync with the fields of [`ComputedStyles`]: the injected
/// script iterates this list and writes each value into the matching
/// camelCase key.
pub const COMPUTED_STYLE_PROPERTIES: &[&str] = &[
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "z-index",
    "width",
    "height",
    "min-width",
    "max-width",
    "min-height",
    "max-height",
    "margin-top",
    "margin-right",
    "margin-bottom",
    "margin-left",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border-width",
    "border-style",
    "border-color",
    "border-radius",
    "background-color",
    "background-image",
    "color",
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-decoration",
    "text-transform",
    "flex-direction",
    "justify-content",
    "align-items",
    "gap",
    "grid-template-columns",
    "opacity",
    "overflow",
    "box-shadow",
];

/// Resolved computed-style values for one element, one field per entry of
/// [`COMPUTED_STYLE_PROPERTIES`]. All values are strings exactly as the
/// browser reports them (`"16px"`, `"rgb(0, 0, 0)"`, `"auto"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStyles {
    pub display: String,
    pub position: String,
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
    pub z_index: String,
    pub width: String,
    pub height: String,
    pub min_width: String,
    pub max_width: String,
    pub min_height: String,
    pub max_height: String,
    pub margin_top: String,
    pub margin_right: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub padding_top: String,
    pub padding_right: String,
    pub padding_bottom: String,
    pub padding_left: String,
    pub border_width: String,
    pub border_style: String,
    pub border_color: String,
    pub border_radius: String,
    pub background_color: String,
    pub background_image: String,
    pub color: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub font_style: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub text_align: String,
    pub text_decoration: String,
    pub text_transform: String,
    pub flex_direction: String,
    pub justify_content: String,
    pub align_items: String,
    pub gap: String,
    pub grid_template_columns: String,
    pub opacity: String,
    pub overflow: String,
    pub box_shadow: String,
}

// ---------------------------------------------------------------------------
// Element snapshot
// ---------------------------------------------------------------------------

/// Coarse classification of an element, used by the builder UI to pick
/// the right editing panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Button,
    Link,
    Input,
    Media,
    Container,
    Other,
}

/// Classify an element by its tag name (ASCII case-insensitive).
pub fn classify_element(tag: &str) -> ElementKind {
    match tag.to_ascii_lowercase().as_str() {
        "img" | "svg" | "picture" => ElementKind::Image,
        "video" | "audio" | "canvas" | "iframe" => ElementKind::Media,
        "button" => ElementKind::Button,
        "a" => ElementKind::Link,
        "input" | "textarea" | "select" | "option" | "form" => ElementKind::Input,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "span" | "label" | "li" | "td" | "th"
        | "blockquote" | "figcaption" | "strong" | "em" | "small" => ElementKind::Text,
        "div" | "section" | "article" | "main" | "header" | "footer" | "nav" | "aside" | "ul"
        | "ol" | "table" => ElementKind::Container,
        _ => ElementKind::Other,
    }
}

/// An element's bounding rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Snapshot of one DOM element's presentation state.
///
/// Built fresh by the injected script on every hover/select event and
/// never mutated afterwards; nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    /// Stable CSS selector resolving to this element in the preview DOM.
    pub selector: String,
    /// Lowercase tag name.
    pub tag_name: String,
    /// Classes recognised as Tailwind utilities.
    pub tailwind_classes: Vec<String>,
    /// Remaining (non-utility) classes.
    pub custom_classes: Vec<String>,
    /// Inline `style` attribute, parsed into property/value pairs.
    pub inline_styles: HashMap<String, String>,
    pub computed_styles: ComputedStyles,
    pub bounding_rect: BoundingRect,
    pub is_text_editable: bool,
    /// Direct text content, when the element carries editable text.
    pub text_content: Option<String>,
    /// Source file the element was generated from, when known.
    pub source_file: Option<String>,
    pub parent_selector: Option<String>,
    pub child_count: u32,
    pub kind: ElementKind,
}

// ---------------------------------------------------------------------------
// Change intents
// ---------------------------------------------------------------------------

/// One proposed style mutation on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleChange {
    /// CSS property being changed.
    pub property: String,
    pub old_value: String,
    pub new_value: String,
    /// The Tailwind utility the change originated from, when it replaces
    /// an existing utility class rather than introducing a raw value.
    pub utility_class: Option<String>,
    /// Target the inline `style` attribute instead of a class.
    #[serde(default)]
    pub apply_inline: bool,
}

/// A group of style changes for one element, handed to the backend
/// code-mutation step. Not persisted by this module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRequest {
    pub selector: String,
    /// Source file to rewrite, when the element's origin is known.
    pub source_file: Option<String>,
    pub changes: Vec<StyleChange>,
}

/// Validate a change request before forwarding it to the code-mutation
/// step: the selector must be non-empty, and every change must name a
/// property.
pub fn validate_change_request(request: &ChangeRequest) -> Result<(), CoreError> {
    if request.selector.trim().is_empty() {
        return Err(CoreError::Validation(
            "Change request selector must not be empty".into(),
        ));
    }
    if request.changes.is_empty() {
        return Err(CoreError::Validation(
            "Change request must contain at least one change".into(),
        ));
    }
    for change in &request.changes {
        if change.property.trim().is_empty() {
            return Err(CoreError::Validation(
                "Style change property must not be empty".into(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Message unions
// ---------------------------------------------------------------------------

/// Messages sent from the host page into the iframe preview.
///
/// Serialized as JSON with an internally-tagged `"type"` discriminator;
/// the tag alone determines the shape of the remaining fields. Both ends
/// of the channel are versioned independently, so consumers must ignore
/// unrecognised `type` values rather than erroring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum HostMessage {
    /// Turn design mode on: the injected script starts tracking hover
    /// and selection.
    #[serde(rename = "enable")]
    Enable,

    /// Turn design mode off and clear any overlays.
    #[serde(rename = "disable")]
    Disable,

    /// Apply a style value to an element for live preview, without
    /// persisting anything.
    #[serde(rename = "preview-style")]
    PreviewStyle {
        selector: String,
        property: String,
        value: String,
    },

    /// Revert preview styles on one element, or on all elements when
    /// `selector` is `None`.
    #[serde(rename = "clear-preview")]
    ClearPreview { selector: Option<String> },

    /// Programmatically select an element (e.g. from the layers panel).
    #[serde(rename = "select-element")]
    SelectElement { selector: String },

    /// Replace an element's text content.
    #[serde(rename = "update-text")]
    UpdateText { selector: String, text: String },
}

/// Messages sent from the iframe preview back to the host page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EditorMessage {
    /// The injected script has attached its listeners and is ready to
    /// receive [`HostMessage`]s.
    #[serde(rename = "ready")]
    Ready,

    /// The pointer moved onto a selectable element.
    #[serde(rename = "element-hovered")]
    ElementHovered { element: ElementData },

    /// An element was clicked/selected.
    #[serde(rename = "element-selected")]
    ElementSelected { element: ElementData },

    /// The current selection was dismissed.
    #[serde(rename = "element-deselected")]
    ElementDeselected,

    /// A text edit was committed (focus left the element).
    #[serde(rename = "text-edited")]
    TextEdited {
        selector: String,
        old_text: String,
        new_text: String,
        source_file: Option<String>,
    },

    /// Live text while an inline edit is still in progress.
    #[serde(rename = "inline-text-edit")]
    InlineTextEdit { selector: String, text: String },

    /// The injected script hit an error it could not recover from.
    #[serde(rename = "error")]
    Error { message: String },
}

/// Parse a host→iframe message.
///
/// Returns `Err` for malformed JSON or unknown `type` values. Callers
/// should log unknown types and continue; the sender may simply be newer.
pub fn parse_host_message(text: &str) -> Result<HostMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// Parse an iframe→host message. Same tolerance contract as
/// [`parse_host_message`].
pub fn parse_editor_message(text: &str) -> Result<EditorMessage, serde_json::Error> {
    serde_json::from_str(text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
