//! Text-specific styling.
//!
//! `TextBuilder` wraps a `StyleBuilder` and overrides the size rules for
//! auto-resizing text boxes. Typography tokens are computed per run by
//! [`run_tokens`], from a [`RunStyle`] that merges a styled run with the
//! node's aggregate style.

use crate::builder::{StyleBuilder, Tokens};
use crate::color::paint_value;
use crate::model::{
    CanonicalNode, LetterSpacing, LineHeight, Paint, PaintKind, StyledTextSegment, TextAlign,
    TextAutoResize, TextCase, TextDecoration, TextProps, TextVAlign, top_paint,
};
use crate::settings::Settings;
use crate::tables::{font_size, font_weight, letter_spacing, line_height_percent, line_height_px};

pub struct TextBuilder<'a> {
    style: StyleBuilder<'a>,
    text: Option<&'a TextProps>,
}

impl<'a> TextBuilder<'a> {
    pub fn new(
        node: &'a CanonicalNode,
        parent: Option<&'a CanonicalNode>,
        settings: &'a Settings,
    ) -> Self {
        Self {
            style: StyleBuilder::new(node, parent, settings),
            text: node.text(),
        }
    }

    /// Position, blend, and only the sizes the text box does not derive from
    /// its content.
    #[must_use]
    pub fn common_position_styles(mut self) -> Self {
        let auto_resize = self.text.map(|text| text.auto_resize).unwrap_or_default();
        let (width, height) = match auto_resize {
            TextAutoResize::WidthAndHeight => (false, false),
            TextAutoResize::Height => (true, false),
            TextAutoResize::None | TextAutoResize::Truncate => (true, true),
        };
        self.style = self.style.size_axes(width, height).position().blend();
        if auto_resize == TextAutoResize::Truncate {
            self.style = self.style.add_attributes("truncate");
        }
        self
    }

    #[must_use]
    pub fn text_align_horizontal(mut self) -> Self {
        let token = match self.text.map(|text| text.style.align_horizontal) {
            Some(TextAlign::Center) => "text-center",
            Some(TextAlign::Right) => "text-right",
            Some(TextAlign::Justified) => "text-justify",
            _ => return self,
        };
        self.style = self.style.add_attributes(token);
        self
    }

    #[must_use]
    pub fn text_align_vertical(mut self) -> Self {
        let token = match self.text.map(|text| text.style.align_vertical) {
            Some(TextVAlign::Center) => "align-middle",
            Some(TextVAlign::Bottom) => "align-bottom",
            _ => return self,
        };
        self.style = self.style.add_attributes(token);
        self
    }

    #[must_use]
    pub fn add_tokens(mut self, tokens: &Tokens) -> Self {
        self.style = self.style.add_tokens(tokens);
        self
    }

    pub fn build(self, extra: &str) -> String {
        self.style.build(extra)
    }
}

// ─── Runs ─────────────────────────────────────────────────────────────────

/// Effective typography of one run of text.
#[derive(Debug, Clone)]
pub struct RunStyle<'s> {
    pub fills: &'s [Paint],
    pub font_family: Option<&'s str>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub italic: bool,
    pub letter_spacing: Option<LetterSpacing>,
    pub line_height: LineHeight,
    pub text_case: TextCase,
    pub text_decoration: TextDecoration,
}

impl<'s> RunStyle<'s> {
    /// The node-wide style, used when there are no styled runs.
    pub fn aggregate(text: &'s TextProps, fills: &'s [Paint]) -> Self {
        let style = &text.style;
        Self {
            fills,
            font_family: style.font_family.as_deref(),
            font_size: style.font_size,
            font_weight: style.font_weight,
            italic: style.italic,
            letter_spacing: style.letter_spacing,
            line_height: style.line_height,
            text_case: style.text_case,
            text_decoration: style.text_decoration,
        }
    }

    /// A styled run; anything the run leaves unset comes from the node.
    pub fn of_segment(segment: &'s StyledTextSegment, text: &'s TextProps, fills: &'s [Paint]) -> Self {
        let base = Self::aggregate(text, fills);
        let font_name = segment.font_name.as_ref();
        Self {
            fills: if segment.fills.is_empty() {
                base.fills
            } else {
                &segment.fills[..]
            },
            font_family: font_name
                .map(|name| name.family.as_str())
                .filter(|family| !family.is_empty())
                .or(base.font_family),
            font_size: segment.font_size.or(base.font_size),
            font_weight: segment.font_weight.or(base.font_weight),
            italic: font_name.map_or(base.italic, |name| {
                name.style.to_ascii_lowercase().contains("italic")
            }),
            letter_spacing: segment.letter_spacing.or(base.letter_spacing),
            line_height: match segment.line_height {
                LineHeight::Auto => base.line_height,
                other => other,
            },
            text_case: segment.text_case,
            text_decoration: segment.text_decoration,
        }
    }
}

/// Unprefixed typography tokens for one run.
pub fn run_tokens(run: &RunStyle<'_>, settings: &Settings) -> Tokens {
    let mut tokens = Tokens::new();

    let color = top_paint(run.fills)
        .filter(|paint| matches!(paint.kind, PaintKind::Solid { .. }))
        .and_then(|paint| paint_value(paint, settings));
    tokens.push(format!("text-{}", color.as_deref().unwrap_or("black")));

    let size = run.font_size.unwrap_or(settings.base_font_size);
    if let Some(px) = run.font_size {
        tokens.push(format!("text-{}", font_size(px, settings)));
    }
    if let Some(weight) = run.font_weight {
        tokens.push(font_weight(weight));
    }
    if let Some(family) = run.font_family {
        tokens.push(format!("font-['{}']", family.trim().replace(' ', "_")));
    }
    if run.italic {
        tokens.push("italic");
    }
    if let Some(spacing) = run.letter_spacing {
        let px = spacing.to_px(size);
        if px != 0.0 {
            tokens.push(format!("tracking-{}", letter_spacing(px, size, settings)));
        }
    }
    match run.line_height {
        LineHeight::Auto => {}
        LineHeight::Pixels(px) => tokens.push(format!("leading-{}", line_height_px(px, settings))),
        LineHeight::Percent(percent) => tokens.push(format!(
            "leading-{}",
            line_height_percent(percent, size, settings)
        )),
    }
    match run.text_decoration {
        TextDecoration::Underline => tokens.push("underline"),
        TextDecoration::Strikethrough => tokens.push("line-through"),
        TextDecoration::None => {}
    }
    match run.text_case {
        TextCase::Upper => tokens.push("uppercase"),
        TextCase::Lower => tokens.push("lowercase"),
        TextCase::Title => tokens.push("capitalize"),
        TextCase::SmallCaps | TextCase::SmallCapsForced => {
            tokens.push("[font-variant-caps:small-caps]");
        }
        TextCase::Original => {}
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FontName, NodeKind, SpacingUnit, TextStyle};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn text_node(auto_resize: TextAutoResize, style: TextStyle) -> CanonicalNode {
        let props = TextProps {
            characters: "Hello".into(),
            style,
            auto_resize,
            segments: Vec::new(),
        };
        CanonicalNode::test_node("label", NodeKind::Text(Box::new(props)), 80.0, 24.0)
    }

    fn segment(characters: &str, style: &str) -> StyledTextSegment {
        StyledTextSegment {
            characters: characters.into(),
            start: 0,
            end: characters.len(),
            font_name: Some(FontName {
                family: "Open Sans".into(),
                style: style.into(),
            }),
            font_size: Some(24.0),
            font_weight: Some(700.0),
            fills: Default::default(),
            hyperlink: None,
            indentation: 0.0,
            letter_spacing: None,
            line_height: LineHeight::Auto,
            list_type: None,
            text_case: TextCase::Original,
            text_decoration: TextDecoration::None,
            text_style_id: None,
            fill_style_id: None,
            open_type_features: BTreeMap::new(),
            unique_id: "label_span".into(),
        }
    }

    #[test]
    fn auto_width_text_has_no_size_tokens() {
        let settings = Settings::default();
        let node = text_node(TextAutoResize::WidthAndHeight, TextStyle::default());
        let attrs = TextBuilder::new(&node, None, &settings)
            .common_position_styles()
            .build("");
        assert_eq!(attrs, r#" className="left-0 top-0 absolute""#);
    }

    #[test]
    fn auto_height_text_keeps_width() {
        let settings = Settings::default();
        let style = TextStyle {
            align_horizontal: TextAlign::Center,
            align_vertical: TextVAlign::Bottom,
            ..TextStyle::default()
        };
        let node = text_node(TextAutoResize::Height, style);
        let attrs = TextBuilder::new(&node, None, &settings)
            .common_position_styles()
            .text_align_horizontal()
            .text_align_vertical()
            .build("");
        assert_eq!(
            attrs,
            r#" className="w-20 left-0 top-0 absolute text-center align-bottom""#
        );
    }

    #[test]
    fn segment_tokens_override_node_style() {
        let settings = Settings::default();
        let node = text_node(
            TextAutoResize::None,
            TextStyle {
                font_size: Some(16.0),
                letter_spacing: Some(LetterSpacing {
                    value: 5.0,
                    unit: SpacingUnit::Percent,
                }),
                ..TextStyle::default()
            },
        );
        let text = node.text().unwrap();
        let run = segment("Hi", "Bold Italic");
        let tokens = run_tokens(&RunStyle::of_segment(&run, text, &node.fills), &settings);
        assert_eq!(
            tokens.render(""),
            "text-black text-2xl font-bold font-['Open_Sans'] italic tracking-wider"
        );
    }

    #[test]
    fn aggregate_style_without_runs() {
        let settings = Settings::default();
        let node = text_node(
            TextAutoResize::None,
            TextStyle {
                font_size: Some(14.0),
                line_height: LineHeight::Pixels(20.0),
                text_case: TextCase::Upper,
                text_decoration: TextDecoration::Underline,
                ..TextStyle::default()
            },
        )
        .with_fill("#3b82f6");
        let text = node.text().unwrap();
        let tokens = run_tokens(&RunStyle::aggregate(text, &node.fills), &settings);
        assert_eq!(
            tokens.render(""),
            "text-blue-500 text-sm leading-5 underline uppercase"
        );
    }
}
