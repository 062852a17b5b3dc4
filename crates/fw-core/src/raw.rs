//! Raw, tool-exported node records.
//!
//! These mirror the REST-style JSON export of the design tool (plus the
//! styled text runs the live host can report). Nothing here is trusted for
//! defaults: every field is optional or defaults to empty, and enum-like
//! values stay strings until the normalizer validates them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

fn one() -> f64 {
    1.0
}

// ─── Geometry ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// One SVG path of a node's fill or stroke outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPath {
    pub path: String,
    pub winding_rule: Option<String>,
}

// ─── Paint ────────────────────────────────────────────────────────────────

/// RGBA in `[0, 1]`. Host-side paints omit alpha, so it defaults to opaque.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "one")]
    pub a: f64,
}

impl Default for RawColor {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

/// Reference to a design variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVariableAlias {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBoundVariables {
    pub color: Option<RawVariableAlias>,
}

impl RawBoundVariables {
    /// The bound color variable id, if any.
    pub fn color_id(bound: &Option<Self>) -> Option<String> {
        bound
            .as_ref()
            .and_then(|b| b.color.as_ref())
            .map(|alias| alias.id.clone())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGradientStop {
    pub position: f64,
    pub color: RawColor,
    pub bound_variables: Option<RawBoundVariables>,
}

/// A fill or stroke paint (`SOLID`, `GRADIENT_*`, `IMAGE`, …).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
    pub blend_mode: Option<String>,
    pub bound_variables: Option<RawBoundVariables>,
    pub gradient_stops: Vec<RawGradientStop>,
    pub gradient_handle_positions: Vec<RawVector>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
}

/// A shadow or blur effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    pub radius: f64,
    pub spread: Option<f64>,
    pub color: Option<RawColor>,
    pub offset: Option<RawVector>,
    pub blend_mode: Option<String>,
    pub bound_variables: Option<RawBoundVariables>,
}

// ─── Layout ───────────────────────────────────────────────────────────────

/// Auto-layout fields, flattened into `RawNode`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLayout {
    pub layout_mode: Option<String>,
    pub layout_wrap: Option<String>,
    pub layout_sizing_horizontal: Option<String>,
    pub layout_sizing_vertical: Option<String>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub item_spacing: Option<f64>,
    pub counter_axis_spacing: Option<f64>,
    pub padding_left: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub layout_grow: Option<f64>,
    pub layout_positioning: Option<String>,
    pub layout_align: Option<String>,
    pub item_reverse_z_index: Option<bool>,
}

// ─── Text ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawHyperlink {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "url", alias = "nodeID")]
    pub value: String,
}

/// Aggregate (or override) type style of a text node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTypeStyle {
    pub font_family: Option<String>,
    pub font_post_script_name: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<f64>,
    pub font_size: Option<f64>,
    pub italic: Option<bool>,
    pub text_align_horizontal: Option<String>,
    pub text_align_vertical: Option<String>,
    pub letter_spacing: Option<f64>,
    pub line_height_px: Option<f64>,
    pub line_height_percent_font_size: Option<f64>,
    pub line_height_unit: Option<String>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
    pub text_auto_resize: Option<String>,
    pub fills: Option<Vec<RawPaint>>,
    pub hyperlink: Option<RawHyperlink>,
    pub opentype_flags: BTreeMap<String, u32>,
}

impl RawTypeStyle {
    /// Layer `over` on top of `self`: fields present in `over` win.
    #[must_use]
    pub fn merged(&self, over: &RawTypeStyle) -> RawTypeStyle {
        let mut opentype_flags = self.opentype_flags.clone();
        opentype_flags.extend(over.opentype_flags.iter().map(|(k, v)| (k.clone(), *v)));
        RawTypeStyle {
            font_family: over.font_family.clone().or_else(|| self.font_family.clone()),
            font_post_script_name: over
                .font_post_script_name
                .clone()
                .or_else(|| self.font_post_script_name.clone()),
            font_style: over.font_style.clone().or_else(|| self.font_style.clone()),
            font_weight: over.font_weight.or(self.font_weight),
            font_size: over.font_size.or(self.font_size),
            italic: over.italic.or(self.italic),
            text_align_horizontal: over
                .text_align_horizontal
                .clone()
                .or_else(|| self.text_align_horizontal.clone()),
            text_align_vertical: over
                .text_align_vertical
                .clone()
                .or_else(|| self.text_align_vertical.clone()),
            letter_spacing: over.letter_spacing.or(self.letter_spacing),
            line_height_px: over.line_height_px.or(self.line_height_px),
            line_height_percent_font_size: over
                .line_height_percent_font_size
                .or(self.line_height_percent_font_size),
            line_height_unit: over
                .line_height_unit
                .clone()
                .or_else(|| self.line_height_unit.clone()),
            text_case: over.text_case.clone().or_else(|| self.text_case.clone()),
            text_decoration: over
                .text_decoration
                .clone()
                .or_else(|| self.text_decoration.clone()),
            text_auto_resize: over
                .text_auto_resize
                .clone()
                .or_else(|| self.text_auto_resize.clone()),
            fills: over.fills.clone().or_else(|| self.fills.clone()),
            hyperlink: over.hyperlink.clone().or_else(|| self.hyperlink.clone()),
            opentype_flags,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFontName {
    pub family: String,
    pub style: String,
}

/// Letter spacing as reported per run: `PIXELS` or `PERCENT`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSpacing {
    pub value: f64,
    pub unit: String,
}

/// Line height as reported per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit")]
pub enum RawLineHeight {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "PIXELS")]
    Pixels { value: f64 },
    #[serde(rename = "PERCENT")]
    Percent { value: f64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawListOptions {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One styled glyph run of a text node, as the live host reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTextSegment {
    pub characters: String,
    pub start: usize,
    pub end: usize,
    pub font_name: Option<RawFontName>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub fills: Vec<RawPaint>,
    pub hyperlink: Option<RawHyperlink>,
    pub indentation: Option<f64>,
    pub letter_spacing: Option<RawSpacing>,
    pub line_height: Option<RawLineHeight>,
    pub list_options: Option<RawListOptions>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
    pub text_style_id: Option<String>,
    pub fill_style_id: Option<String>,
    pub open_type_features: BTreeMap<String, bool>,
}

// ─── Node ─────────────────────────────────────────────────────────────────

/// A node as exported by the design tool. Arbitrary, possibly partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub visible: Option<bool>,
    /// Radians.
    pub rotation: Option<f64>,

    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub absolute_bounding_box: Option<RawRect>,
    pub absolute_render_bounds: Option<RawRect>,

    pub fills: Vec<RawPaint>,
    pub strokes: Vec<RawPaint>,
    pub effects: Vec<RawEffect>,
    pub stroke_weight: Option<f64>,
    pub individual_stroke_weights: Option<RawStrokeWeights>,
    pub stroke_align: Option<String>,
    pub corner_radius: Option<f64>,
    pub rectangle_corner_radii: Option<[f64; 4]>,
    pub opacity: Option<f64>,
    pub blend_mode: Option<String>,
    pub clips_content: Option<bool>,

    #[serde(flatten)]
    pub layout: RawLayout,

    pub characters: Option<String>,
    pub style: Option<RawTypeStyle>,
    pub character_style_overrides: Vec<u32>,
    pub style_override_table: HashMap<String, RawTypeStyle>,

    pub fill_geometry: Vec<RawPath>,
    pub stroke_geometry: Vec<RawPath>,

    pub children: Vec<RawNode>,
}

impl RawNode {
    /// Parse one exported node document.
    ///
    /// # Errors
    /// Returns the `serde_json` error if the text is not a node object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The node id, treating an empty string as missing.
    pub fn id_str(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}
