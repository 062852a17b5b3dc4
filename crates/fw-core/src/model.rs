//! Canonical node model.
//!
//! A `CanonicalNode` is the fully-defaulted form of a raw export record.
//! Kind-specific data lives in the `NodeKind` variant; everything the
//! emission engine reads is present and validated here, so emission never
//! second-guesses the raw input. Parent links are ids, not pointers.

use crate::id::NodeId;
use crate::raw::{RawColor, RawEffect, RawPaint};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;

// ─── Colors & Paint ──────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f64 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Channels as 0–255 bytes (alpha excluded).
    pub fn rgb8(&self) -> [u8; 3] {
        let to_u8 = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Lowercase `#rrggbb`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgba(
            f64::from(channel(0)?) / 255.0,
            f64::from(channel(2)?) / 255.0,
            f64::from(channel(4)?) / 255.0,
            1.0,
        ))
    }
}

impl From<RawColor> for Color {
    fn from(raw: RawColor) -> Self {
        Self::rgba(raw.r, raw.g, raw.b, raw.a)
    }
}

/// Layer / paint blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    #[default]
    PassThrough,
    Normal,
    Darken,
    Multiply,
    LinearBurn,
    ColorBurn,
    Lighten,
    Screen,
    LinearDodge,
    ColorDodge,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// Unknown or missing values are treated as pass-through.
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or_default() {
            "NORMAL" => Self::Normal,
            "DARKEN" => Self::Darken,
            "MULTIPLY" => Self::Multiply,
            "LINEAR_BURN" => Self::LinearBurn,
            "COLOR_BURN" => Self::ColorBurn,
            "LIGHTEN" => Self::Lighten,
            "SCREEN" => Self::Screen,
            "LINEAR_DODGE" => Self::LinearDodge,
            "COLOR_DODGE" => Self::ColorDodge,
            "OVERLAY" => Self::Overlay,
            "SOFT_LIGHT" => Self::SoftLight,
            "HARD_LIGHT" => Self::HardLight,
            "DIFFERENCE" => Self::Difference,
            "EXCLUSION" => Self::Exclusion,
            "HUE" => Self::Hue,
            "SATURATION" => Self::Saturation,
            "COLOR" => Self::Color,
            "LUMINOSITY" => Self::Luminosity,
            _ => Self::PassThrough,
        }
    }

    /// `PASS_THROUGH` and `NORMAL` composite like plain source-over.
    pub fn is_normal(self) -> bool {
        matches!(self, Self::PassThrough | Self::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradientKind {
    Linear,
    Radial,
    Angular,
    Diamond,
}

/// A gradient stop, possibly bound to a color variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientStop {
    pub position: f64,
    pub color: Color,
    pub variable_id: Option<String>,
    pub variable_color_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PaintKind {
    Solid {
        color: Color,
        variable_id: Option<String>,
        variable_color_name: Option<String>,
    },
    Gradient {
        gradient: GradientKind,
        stops: Vec<GradientStop>,
        /// Start and end handle in normalized node space.
        handles: SmallVec<[(f64, f64); 3]>,
    },
    Image {
        image_ref: Option<String>,
        scale_mode: Option<String>,
    },
    /// Video, pattern and other paints the styling idiom cannot express.
    Other(String),
}

/// Fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    pub kind: PaintKind,
    pub visible: bool,
    pub opacity: f64,
    pub blend_mode: BlendMode,
}

impl Paint {
    pub fn from_raw(raw: &RawPaint) -> Self {
        let kind = match raw.kind.as_str() {
            "SOLID" => PaintKind::Solid {
                color: raw.color.map(Color::from).unwrap_or(Color::BLACK),
                variable_id: crate::raw::RawBoundVariables::color_id(&raw.bound_variables),
                variable_color_name: None,
            },
            "GRADIENT_LINEAR" | "GRADIENT_RADIAL" | "GRADIENT_ANGULAR" | "GRADIENT_DIAMOND" => {
                let gradient = match raw.kind.as_str() {
                    "GRADIENT_LINEAR" => GradientKind::Linear,
                    "GRADIENT_RADIAL" => GradientKind::Radial,
                    "GRADIENT_ANGULAR" => GradientKind::Angular,
                    _ => GradientKind::Diamond,
                };
                PaintKind::Gradient {
                    gradient,
                    stops: raw
                        .gradient_stops
                        .iter()
                        .map(|stop| GradientStop {
                            position: stop.position,
                            color: stop.color.into(),
                            variable_id: crate::raw::RawBoundVariables::color_id(
                                &stop.bound_variables,
                            ),
                            variable_color_name: None,
                        })
                        .collect(),
                    handles: raw
                        .gradient_handle_positions
                        .iter()
                        .map(|h| (h.x, h.y))
                        .collect(),
                }
            }
            "IMAGE" => PaintKind::Image {
                image_ref: raw.image_ref.clone(),
                scale_mode: raw.scale_mode.clone(),
            },
            other => PaintKind::Other(other.to_string()),
        };
        Self {
            kind,
            visible: raw.visible != Some(false),
            opacity: raw.opacity.unwrap_or(1.0),
            blend_mode: BlendMode::parse(raw.blend_mode.as_deref()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, PaintKind::Image { .. })
    }

    /// The resolved variable name of a solid paint.
    pub fn variable_color_name(&self) -> Option<&str> {
        match &self.kind {
            PaintKind::Solid {
                variable_color_name,
                ..
            } => variable_color_name.as_deref(),
            _ => None,
        }
    }
}

/// Small paint lists: nodes rarely carry more than two fills or strokes.
pub type Paints = SmallVec<[Paint; 2]>;

/// The topmost visible paint. Paint arrays are ordered bottom → top.
pub fn top_paint(paints: &[Paint]) -> Option<&Paint> {
    paints.iter().rev().find(|p| p.visible)
}

// ─── Effects ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Effect {
    pub kind: EffectKind,
    pub visible: bool,
    pub radius: f64,
    pub spread: f64,
    pub offset: (f64, f64),
    pub color: Color,
    pub variable_id: Option<String>,
    pub variable_color_name: Option<String>,
}

impl Effect {
    pub fn from_raw(raw: &RawEffect) -> Self {
        let kind = match raw.kind.as_str() {
            "DROP_SHADOW" => EffectKind::DropShadow,
            "INNER_SHADOW" => EffectKind::InnerShadow,
            "LAYER_BLUR" => EffectKind::LayerBlur,
            "BACKGROUND_BLUR" => EffectKind::BackgroundBlur,
            other => EffectKind::Other(other.to_string()),
        };
        Self {
            kind,
            visible: raw.visible != Some(false),
            radius: raw.radius,
            spread: raw.spread.unwrap_or(0.0),
            offset: raw.offset.map(|o| (o.x, o.y)).unwrap_or((0.0, 0.0)),
            color: raw.color.map(Color::from).unwrap_or(Color::BLACK),
            variable_id: crate::raw::RawBoundVariables::color_id(&raw.bound_variables),
            variable_color_name: None,
        }
    }

    pub fn is_shadow(&self) -> bool {
        matches!(self.kind, EffectKind::DropShadow | EffectKind::InnerShadow)
    }
}

// ─── Strokes & Corners ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    #[default]
    Inside,
    Center,
    Outside,
}

impl StrokeAlign {
    pub fn parse(value: Option<&str>) -> Self {
        match value.unwrap_or_default() {
            "CENTER" => Self::Center,
            "OUTSIDE" => Self::Outside,
            _ => Self::Inside,
        }
    }
}

/// Per-edge stroke weights. A uniform `strokeWeight` fills all four.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeWeights {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl StrokeWeights {
    pub fn all(weight: f64) -> Self {
        Self {
            top: weight,
            right: weight,
            bottom: weight,
            left: weight,
        }
    }

    /// The shared weight when all four edges match.
    pub fn uniform(&self) -> Option<f64> {
        (self.top == self.right && self.top == self.bottom && self.top == self.left)
            .then_some(self.top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CornerRadius {
    #[default]
    None,
    Uniform(f64),
    PerCorner {
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    },
}

impl CornerRadius {
    pub fn from_raw(uniform: Option<f64>, per_corner: Option<[f64; 4]>) -> Self {
        match (per_corner, uniform) {
            (Some([tl, tr, br, bl]), _) if !(tl == tr && tl == br && tl == bl) => {
                Self::PerCorner {
                    top_left: tl,
                    top_right: tr,
                    bottom_right: br,
                    bottom_left: bl,
                }
            }
            (Some([r, ..]), _) | (None, Some(r)) if r > 0.0 => Self::Uniform(r),
            _ => Self::None,
        }
    }
}

/// One outline path of a vector-like node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorPath {
    pub path: String,
    pub even_odd: bool,
}

// ─── Geometry ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Position, size and rotation of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, counter-clockwise as the design tool reports it.
    pub rotation: f64,
    /// Sum of the rotations of GROUP ancestors only.
    pub cumulative_rotation: f64,
    pub bounding_box: Option<Rect>,
    pub render_bounds: Option<Rect>,
}

// ─── Layout ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutWrap {
    #[default]
    NoWrap,
    Wrap,
}

/// Sizing behavior along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sizing {
    #[default]
    Fixed,
    Hug,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
    Baseline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Positioning {
    #[default]
    Auto,
    Absolute,
}

/// Padding of an auto-layout container. Always defined; missing edges are 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Auto-layout state of a node, fully defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub mode: LayoutMode,
    pub wrap: LayoutWrap,
    pub sizing_horizontal: Sizing,
    pub sizing_vertical: Sizing,
    pub primary_align: AxisAlign,
    pub counter_align: AxisAlign,
    pub item_spacing: f64,
    pub counter_axis_spacing: Option<f64>,
    pub padding: Padding,
    pub grow: f64,
    pub positioning: Positioning,
    pub stretch: bool,
    pub item_reverse_z_index: bool,
    /// Children are placed by offset inside this node.
    pub is_relative: bool,
}

impl Layout {
    pub fn is_auto(&self) -> bool {
        self.mode != LayoutMode::None
    }

    pub fn is_absolute(&self) -> bool {
        self.positioning == Positioning::Absolute
    }
}

// ─── Text ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextVAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    #[default]
    None,
    WidthAndHeight,
    Height,
    Truncate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpacingUnit {
    #[default]
    Pixels,
    Percent,
}

/// Letter spacing in pixels or as a percentage of the font size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LetterSpacing {
    pub value: f64,
    pub unit: SpacingUnit,
}

impl LetterSpacing {
    pub fn to_px(self, font_size: f64) -> f64 {
        match self.unit {
            SpacingUnit::Pixels => self.value,
            SpacingUnit::Percent => self.value / 100.0 * font_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineHeight {
    #[default]
    Auto,
    Pixels(f64),
    Percent(f64),
}

impl LineHeight {
    /// `None` for `AUTO`, which needs no token.
    pub fn to_px(self, font_size: f64) -> Option<f64> {
        match self {
            LineHeight::Auto => None,
            LineHeight::Pixels(px) => Some(px),
            LineHeight::Percent(pct) => Some(pct / 100.0 * font_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hyperlink {
    pub kind: String,
    pub value: String,
}

/// Aggregate text style of a text node.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub italic: bool,
    pub letter_spacing: Option<LetterSpacing>,
    pub line_height: LineHeight,
    pub align_horizontal: TextAlign,
    pub align_vertical: TextVAlign,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
}

/// One styled glyph run of a text node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledTextSegment {
    pub characters: String,
    pub start: usize,
    pub end: usize,
    pub font_name: Option<FontName>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub fills: Paints,
    pub hyperlink: Option<Hyperlink>,
    pub indentation: f64,
    pub letter_spacing: Option<LetterSpacing>,
    pub line_height: LineHeight,
    pub list_type: Option<String>,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
    pub text_style_id: Option<String>,
    pub fill_style_id: Option<String>,
    pub open_type_features: BTreeMap<String, bool>,
    /// `<clean name>_span` or `<clean name>_span_NN`.
    pub unique_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub characters: String,
    pub style: TextStyle,
    pub auto_resize: TextAutoResize,
    pub segments: Vec<StyledTextSegment>,
}

// ─── Nodes ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrameKind {
    Frame,
    Component,
    Instance,
    ComponentSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VectorKind {
    Vector,
    Star,
    Polygon,
    BooleanOperation,
    RegularPolygon,
}

/// The closed set of node kinds the emission engine dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Rectangle,
    Ellipse,
    Group,
    Frame { frame: FrameKind, clips_content: bool },
    Text(Box<TextProps>),
    Line,
    Section,
    Vector(VectorKind),
    /// Anything else the tool exports (stickies, connectors, widgets, …).
    Unsupported(String),
}

impl NodeKind {
    /// The design tool's type tag for this kind.
    pub fn type_name(&self) -> &str {
        match self {
            NodeKind::Rectangle => "RECTANGLE",
            NodeKind::Ellipse => "ELLIPSE",
            NodeKind::Group => "GROUP",
            NodeKind::Frame { frame, .. } => match frame {
                FrameKind::Frame => "FRAME",
                FrameKind::Component => "COMPONENT",
                FrameKind::Instance => "INSTANCE",
                FrameKind::ComponentSet => "COMPONENT_SET",
            },
            NodeKind::Text(_) => "TEXT",
            NodeKind::Line => "LINE",
            NodeKind::Section => "SECTION",
            NodeKind::Vector(vector) => match vector {
                VectorKind::Vector => "VECTOR",
                VectorKind::Star => "STAR",
                VectorKind::Polygon => "POLYGON",
                VectorKind::BooleanOperation => "BOOLEAN_OPERATION",
                VectorKind::RegularPolygon => "REGULAR_POLYGON",
            },
            NodeKind::Unsupported(tag) => tag,
        }
    }
}

/// Frame-like containers that become rectangles when they have no children.
pub fn is_frame_like(tag: &str) -> bool {
    matches!(tag, "FRAME" | "INSTANCE" | "COMPONENT" | "COMPONENT_SET")
}

/// Shape kinds that may be rendered as embedded vector markup.
pub fn is_flattenable(tag: &str) -> bool {
    matches!(
        tag,
        "VECTOR" | "STAR" | "POLYGON" | "BOOLEAN_OPERATION" | "REGULAR_POLYGON"
    )
}

/// A fully normalized node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalNode {
    pub id: NodeId,
    pub name: String,
    /// Disambiguated within one conversion call.
    pub unique_name: String,
    pub kind: NodeKind,
    pub geometry: Geometry,
    pub layout: Layout,

    pub fills: Paints,
    pub strokes: Paints,
    pub stroke_weights: StrokeWeights,
    pub stroke_align: StrokeAlign,
    pub effects: Vec<Effect>,
    pub corner_radius: CornerRadius,
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub fill_geometry: Vec<VectorPath>,
    pub stroke_geometry: Vec<VectorPath>,

    pub children: Vec<CanonicalNode>,
    /// Non-owning back-reference, for context lookups only.
    pub parent: Option<NodeId>,
    pub can_be_flattened: bool,
    pub variant_properties: Option<BTreeMap<String, String>>,
}

impl CanonicalNode {
    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Depth-first walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a CanonicalNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
impl CanonicalNode {
    /// A bare node for unit tests: fixed size at the origin, no paints.
    pub(crate) fn test_node(id: &str, kind: NodeKind, width: f64, height: f64) -> Self {
        Self {
            id: NodeId::intern(id),
            name: id.to_string(),
            unique_name: id.to_string(),
            kind,
            geometry: Geometry {
                width,
                height,
                ..Geometry::default()
            },
            layout: Layout::default(),
            fills: Paints::new(),
            strokes: Paints::new(),
            stroke_weights: StrokeWeights::default(),
            stroke_align: StrokeAlign::default(),
            effects: Vec::new(),
            corner_radius: CornerRadius::None,
            opacity: 1.0,
            blend_mode: BlendMode::PassThrough,
            fill_geometry: Vec::new(),
            stroke_geometry: Vec::new(),
            children: Vec::new(),
            parent: None,
            can_be_flattened: false,
            variant_properties: None,
        }
    }

    pub(crate) fn with_fill(mut self, hex: &str) -> Self {
        let color = Color::from_hex(hex).unwrap_or(Color::BLACK);
        self.fills.push(Paint {
            kind: PaintKind::Solid {
                color,
                variable_id: None,
                variable_color_name: None,
            },
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
        });
        self
    }
}
