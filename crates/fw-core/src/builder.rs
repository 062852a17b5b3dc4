//! Utility-class accumulator for one element.
//!
//! `StyleBuilder` is a value-returning chain: every style contributor takes
//! the builder by value and hands it back, so callers read as
//! `StyleBuilder::new(..).common_position_styles().common_shape_styles()`.
//! `build` renders the accumulated `data-*` attributes and the class
//! attribute as a leading-space attribute string.

use crate::color::{css_color, gradient_tokens, paint_value, variable_slug};
use crate::model::{
    CanonicalNode, CornerRadius, EffectKind, LayoutMode, NodeKind, Paint, PaintKind, Sizing,
    StrokeAlign, top_paint,
};
use crate::settings::Settings;
use crate::tables::{
    ROTATIONS, blur_suffix, border_radius_suffix, format_num, opacity, outline_width, spacing,
};

/// Radii at or above this many px collapse to `rounded-2xl`.
const LARGE_RADIUS: f64 = 14.0;

// ─── Tokens ───────────────────────────────────────────────────────────────

/// Ordered, de-duplicated utility tokens without the custom prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<String>);

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. Empty tokens and repeats are ignored.
    pub fn push(&mut self, token: impl Into<String>) {
        let token = token.into();
        let token = token.trim();
        if !token.is_empty() && !self.0.iter().any(|t| t == token) {
            self.0.push(token.to_string());
        }
    }

    /// Append every whitespace-separated token of `tokens`.
    pub fn push_all(&mut self, tokens: &str) {
        for token in tokens.split_whitespace() {
            self.push(token);
        }
    }

    pub fn extend(&mut self, other: &Tokens) {
        for token in &other.0 {
            self.push(token.as_str());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space-separated tokens with `prefix` applied to each.
    #[must_use]
    pub fn render(&self, prefix: &str) -> String {
        self.0
            .iter()
            .map(|token| prefixed(token, prefix))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Apply the custom prefix. Negative tokens keep their leading `-`:
/// `-rotate-45` with `tw-` becomes `-tw-rotate-45`.
pub fn prefixed(token: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        token.to_string()
    } else if let Some(rest) = token.strip_prefix('-') {
        format!("-{prefix}{rest}")
    } else {
        format!("{prefix}{token}")
    }
}

/// Escape a value for a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text content. Line breaks become `<br/>`.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br/>")
}

// ─── StyleBuilder ─────────────────────────────────────────────────────────

pub struct StyleBuilder<'a> {
    node: &'a CanonicalNode,
    parent: Option<&'a CanonicalNode>,
    settings: &'a Settings,
    tokens: Tokens,
    data: Vec<String>,
}

impl<'a> StyleBuilder<'a> {
    pub fn new(
        node: &'a CanonicalNode,
        parent: Option<&'a CanonicalNode>,
        settings: &'a Settings,
    ) -> Self {
        Self {
            node,
            parent,
            settings,
            tokens: Tokens::new(),
            data: Vec::new(),
        }
    }

    /// Size, padding, position, then rotation/opacity/blend.
    #[must_use]
    pub fn common_position_styles(self) -> Self {
        self.size().auto_layout_padding().position().blend()
    }

    /// Background, corner radius, shadows, border, then blur.
    #[must_use]
    pub fn common_shape_styles(self) -> Self {
        let node = self.node;
        self.custom_color(&node.fills, "bg")
            .radius()
            .shadow()
            .border()
            .blur()
    }

    #[must_use]
    pub fn size(self) -> Self {
        self.size_axes(true, true)
    }

    /// Width and/or height tokens from the node's sizing modes.
    #[must_use]
    pub fn size_axes(mut self, width: bool, height: bool) -> Self {
        let geometry = self.node.geometry;
        if width {
            let token = self.axis_size(LayoutMode::Horizontal, geometry.width, "w");
            self.tokens.push(token.unwrap_or_default());
        }
        if height {
            let token = self.axis_size(LayoutMode::Vertical, geometry.height, "h");
            self.tokens.push(token.unwrap_or_default());
        }
        self
    }

    fn axis_size(&self, axis: LayoutMode, px: f64, prefix: &str) -> Option<String> {
        let layout = &self.node.layout;
        let sizing = match axis {
            LayoutMode::Vertical => layout.sizing_vertical,
            _ => layout.sizing_horizontal,
        };
        let parent_mode = self
            .parent
            .map_or(LayoutMode::None, |parent| parent.layout.mode);
        let in_flow = parent_mode != LayoutMode::None && !layout.is_absolute();
        let fixed = || format!("{prefix}-{}", spacing(px));

        match sizing {
            Sizing::Hug => None,
            Sizing::Fill if in_flow && parent_mode == axis => Some("flex-1".to_string()),
            Sizing::Fill if in_flow => Some("self-stretch".to_string()),
            Sizing::Fixed if in_flow && layout.stretch && parent_mode != axis => {
                Some("self-stretch".to_string())
            }
            _ => Some(fixed()),
        }
    }

    /// `left-*`/`top-*`/`absolute` for absolutely placed nodes, `relative` for
    /// positioning contexts.
    #[must_use]
    pub fn position(mut self) -> Self {
        let node = self.node;
        if self.is_absolute() {
            let (mut x, mut y) = (node.geometry.x, node.geometry.y);
            if let Some(group) = self.parent.filter(|p| matches!(p.kind, NodeKind::Group)) {
                x -= group.geometry.x;
                y -= group.geometry.y;
            }
            self.tokens.push(offset("left", x));
            self.tokens.push(offset("top", y));
            self.tokens.push("absolute");
        } else if !node.children.is_empty()
            && (node.layout.is_relative || matches!(node.kind, NodeKind::Group))
        {
            self.tokens.push("relative");
        }
        self
    }

    fn is_absolute(&self) -> bool {
        self.node.layout.is_absolute()
            || self.parent.is_none_or(|parent| !parent.layout.is_auto())
    }

    /// Rotation relative to the ancestors, opacity and blend mode.
    #[must_use]
    pub fn blend(mut self) -> Self {
        let node = self.node;
        let rotation = -(node.geometry.rotation - node.geometry.cumulative_rotation);
        if let Some(token) = rotation_token(rotation) {
            self.tokens.push(token);
            self.tokens.push("origin-top-left");
        }
        if node.opacity < 1.0 {
            self.tokens.push(format!("opacity-{}", opacity(node.opacity)));
        }
        if let Some(mode) = blend_token(node) {
            self.tokens.push(format!("mix-blend-{mode}"));
        }
        self
    }

    /// Padding of an auto-layout container, skipping zero edges.
    #[must_use]
    pub fn auto_layout_padding(mut self) -> Self {
        if !self.node.layout.is_auto() {
            return self;
        }
        let p = self.node.layout.padding;
        let mut side = |prefix: &str, px: f64| {
            if px > 0.0 {
                self.tokens.push(format!("{prefix}-{}", spacing(px)));
            }
        };
        if p.top == p.right && p.top == p.bottom && p.top == p.left {
            side("p", p.top);
        } else {
            if p.left == p.right {
                side("px", p.left);
            } else {
                side("pl", p.left);
                side("pr", p.right);
            }
            if p.top == p.bottom {
                side("py", p.top);
            } else {
                side("pt", p.top);
                side("pb", p.bottom);
            }
        }
        self
    }

    #[must_use]
    pub fn radius(mut self) -> Self {
        if matches!(self.node.kind, NodeKind::Ellipse) {
            self.tokens.push("rounded-full");
            return self;
        }
        let settings = self.settings;
        match self.node.corner_radius {
            CornerRadius::None => {}
            CornerRadius::Uniform(r) if r >= LARGE_RADIUS => self.tokens.push("rounded-2xl"),
            CornerRadius::Uniform(r) => {
                self.tokens
                    .push(format!("rounded{}", border_radius_suffix(r, settings)));
            }
            CornerRadius::PerCorner { top_left, .. } if top_left >= LARGE_RADIUS => {
                self.tokens.push("rounded-2xl");
            }
            CornerRadius::PerCorner {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            } => {
                for (corner, r) in [
                    ("tl", top_left),
                    ("tr", top_right),
                    ("br", bottom_right),
                    ("bl", bottom_left),
                ] {
                    if r > 0.0 {
                        self.tokens
                            .push(format!("rounded-{corner}{}", border_radius_suffix(r, settings)));
                    }
                }
            }
        }
        self
    }

    /// `{prefix}-{color}` from the top visible paint. Gradients only apply to
    /// backgrounds.
    #[must_use]
    pub fn custom_color(mut self, paints: &[Paint], prefix: &str) -> Self {
        let Some(paint) = top_paint(paints) else {
            return self;
        };
        match &paint.kind {
            PaintKind::Solid { .. } => {
                if let Some(value) = paint_value(paint, self.settings) {
                    self.tokens.push(format!("{prefix}-{value}"));
                }
            }
            PaintKind::Gradient { .. } if prefix == "bg" => {
                for token in gradient_tokens(paint, self.settings) {
                    self.tokens.push(token);
                }
            }
            _ => {}
        }
        self
    }

    /// All visible drop/inner shadows as one arbitrary `shadow-[…]` token.
    #[must_use]
    pub fn shadow(mut self) -> Self {
        let settings = self.settings;
        let layers: Vec<String> = self
            .node
            .effects
            .iter()
            .filter(|effect| effect.visible && effect.is_shadow())
            .map(|effect| {
                let color = match &effect.variable_color_name {
                    Some(name) if settings.use_color_variables => {
                        format!("var(--{})", variable_slug(name))
                    }
                    _ => css_color(effect.color, effect.color.a),
                };
                let inset = if effect.kind == EffectKind::InnerShadow {
                    "inset_"
                } else {
                    ""
                };
                format!(
                    "{inset}{}px_{}px_{}px_{}px_{color}",
                    format_num(effect.offset.0),
                    format_num(effect.offset.1),
                    format_num(effect.radius),
                    format_num(effect.spread),
                )
            })
            .collect();
        if !layers.is_empty() {
            self.tokens.push(format!("shadow-[{}]", layers.join(",")));
        }
        self
    }

    /// Uniform strokes become an outline (so they never affect layout),
    /// per-side strokes become borders.
    #[must_use]
    pub fn border(mut self) -> Self {
        let node = self.node;
        let Some(stroke) = top_paint(&node.strokes) else {
            return self;
        };
        let color = paint_value(stroke, self.settings);
        let weights = node.stroke_weights;
        match weights.uniform() {
            Some(w) if w <= 0.0 => {}
            Some(w) => {
                self.tokens.push("outline");
                self.tokens.push(format!("outline-{}", outline_width(w)));
                let inset = match node.stroke_align {
                    StrokeAlign::Inside => -w,
                    StrokeAlign::Center => -w / 2.0,
                    StrokeAlign::Outside => 0.0,
                };
                if inset != 0.0 {
                    self.tokens
                        .push(format!("outline-offset-[{}px]", format_num(inset)));
                }
                if let Some(color) = color {
                    self.tokens.push(format!("outline-{color}"));
                }
            }
            None => {
                for (side, w) in [
                    ("t", weights.top),
                    ("r", weights.right),
                    ("b", weights.bottom),
                    ("l", weights.left),
                ] {
                    if w > 0.0 {
                        self.tokens.push(format!("border-{side}-[{}px]", format_num(w)));
                    }
                }
                if let Some(color) = color {
                    self.tokens.push(format!("border-{color}"));
                }
            }
        }
        self
    }

    #[must_use]
    pub fn blur(mut self) -> Self {
        for effect in self.node.effects.iter().filter(|effect| effect.visible) {
            match effect.kind {
                EffectKind::LayerBlur => {
                    self.tokens.push(format!("blur{}", blur_suffix(effect.radius)));
                }
                EffectKind::BackgroundBlur => {
                    self.tokens
                        .push(format!("backdrop-blur{}", blur_suffix(effect.radius)));
                }
                _ => {}
            }
        }
        self
    }

    /// Append whitespace-separated tokens computed elsewhere.
    #[must_use]
    pub fn add_attributes(mut self, tokens: &str) -> Self {
        self.tokens.push_all(tokens);
        self
    }

    #[must_use]
    pub fn add_tokens(mut self, tokens: &Tokens) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// Attach `data-{label}` or `data-{label}="{value}"`.
    #[must_use]
    pub fn add_data(mut self, label: &str, value: Option<&str>) -> Self {
        self.data.push(match value {
            Some(value) => format!("data-{label}=\"{}\"", escape_attr(value)),
            None => format!("data-{label}"),
        });
        self
    }

    /// Whether any utility token has been accumulated.
    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &Tokens {
        &self.tokens
    }

    /// Render ` data-…` attributes and ` class="…"` (or `className`), with
    /// `extra` tokens appended. Empty when nothing was accumulated.
    pub fn build(self, extra: &str) -> String {
        let settings = self.settings;
        let mut tokens = self.tokens;
        tokens.push_all(extra);

        let mut out = String::new();
        if settings.show_layer_names {
            out.push_str(&format!(" data-layer=\"{}\"", escape_attr(&self.node.name)));
        }
        for data in &self.data {
            out.push(' ');
            out.push_str(data);
        }
        if !tokens.is_empty() {
            out.push_str(&format!(
                " {}=\"{}\"",
                settings.generation_mode.class_attribute(),
                tokens.render(&settings.custom_prefix)
            ));
        }
        out
    }
}

fn offset(side: &str, px: f64) -> String {
    if px == 0.0 {
        format!("{side}-0")
    } else if px < 0.0 {
        format!("-{side}-[{}px]", format_num(-px))
    } else {
        format!("{side}-[{}px]", format_num(px))
    }
}

/// `rotate-45`, `-rotate-90`, `rotate-[15deg]`; `None` when there is no
/// visible rotation.
fn rotation_token(degrees: f64) -> Option<String> {
    let rounded: f64 = format_num(degrees).parse().unwrap_or(0.0);
    if rounded == 0.0 {
        return None;
    }
    let magnitude = rounded.abs();
    let sign = if rounded < 0.0 { "-" } else { "" };
    if ROTATIONS.iter().any(|step| (magnitude - step).abs() < f64::EPSILON) {
        Some(format!("{sign}rotate-{}", format_num(magnitude)))
    } else {
        Some(format!("rotate-[{}deg]", format_num(rounded)))
    }
}

fn blend_token(node: &CanonicalNode) -> Option<&'static str> {
    use crate::model::BlendMode::*;
    Some(match node.blend_mode {
        PassThrough | Normal => return None,
        Darken => "darken",
        Multiply => "multiply",
        LinearBurn | ColorBurn => "color-burn",
        Lighten => "lighten",
        Screen => "screen",
        LinearDodge | ColorDodge => "color-dodge",
        Overlay => "overlay",
        SoftLight => "soft-light",
        HardLight => "hard-light",
        Difference => "difference",
        Exclusion => "exclusion",
        Hue => "hue",
        Saturation => "saturation",
        Color => "color",
        Luminosity => "luminosity",
    })
}
