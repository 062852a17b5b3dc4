//! Scene graph normalizer: (raw export, host node) pairs → canonical tree.
//!
//! Policies run in a fixed order per node: drop rules, container demotion,
//! single-child group elision, unique naming, text enrichment, geometry
//! copy-down, color-variable resolution, layout defaults and finally the
//! pairwise recursion with z-order reconstruction. Validation of raw strings
//! into enums happens here and nowhere else.

use crate::context::Session;
use crate::error::ConvertError;
use crate::host::{HostBounds, HostNode};
use crate::id::NodeId;
use crate::model::*;
use crate::raw::{
    RawHyperlink, RawLayout, RawLineHeight, RawNode, RawPath, RawRect, RawSpacing,
    RawTextSegment, RawTypeStyle,
};
use crate::variables::{ColorVariableResolver, VariableCache};
use futures::future::{LocalBoxFuture, try_join_all};
use futures::FutureExt;

/// Warning recorded when the two trees disagree on a node's child count.
pub const CHILD_COUNT_MISMATCH: &str =
    "Exported and host nodes have different child counts; children were left unprocessed";

/// Warning recorded for text runs whose fill uses a blend mode.
pub const TEXT_BLEND_UNSUPPORTED: &str = "Blend mode is not supported in text colors";

pub struct Normalizer<'a, R> {
    session: &'a Session,
    variables: &'a VariableCache<R>,
}

impl<'a, R: ColorVariableResolver + 'static> Normalizer<'a, R> {
    pub fn new(session: &'a Session, variables: &'a VariableCache<R>) -> Self {
        Self { session, variables }
    }

    /// Normalize a selection of top-level host nodes.
    ///
    /// Resets the per-call name counters, requests every structured export
    /// concurrently, then normalizes the top-level pairs in selection order.
    ///
    /// # Errors
    /// A failed export or a failed color-variable lookup.
    pub async fn normalize_selection<H: HostNode>(
        &self,
        nodes: &[H],
    ) -> Result<Vec<CanonicalNode>, ConvertError> {
        self.session.reset();
        let documents = try_join_all(nodes.iter().map(|node| node.export_json())).await?;

        let mut roots = Vec::with_capacity(nodes.len());
        for (raw, host) in documents.into_iter().zip(nodes) {
            if let Some(node) = self.normalize(raw, host, None, 0.0).await? {
                roots.push(node);
            }
        }
        Ok(roots)
    }

    /// Normalize one pair. `None` means the node is dropped.
    pub fn normalize<'n, H: HostNode>(
        &'n self,
        raw: RawNode,
        host: &'n H,
        parent: Option<NodeId>,
        inherited_rotation: f64,
    ) -> LocalBoxFuture<'n, Result<Option<CanonicalNode>, ConvertError>> {
        async move {
            let mut raw = raw;
            let Some(id) = raw.id_str().map(NodeId::intern) else {
                return Ok(None);
            };
            if !raw.is_visible() || raw.kind == "SLICE" {
                return Ok(None);
            }

            if is_frame_like(&raw.kind) && raw.children.is_empty() {
                log::trace!("{id}: childless {} demoted to RECTANGLE", raw.kind);
                raw.kind = "RECTANGLE".into();
            }

            if raw.kind == "GROUP" {
                if let Some(index) = single_visible_child(&raw) {
                    if let Some(host_child) = paired_child(host, &raw, index) {
                        log::trace!("{id}: single-child group elided");
                        let child = raw.children.swap_remove(index);
                        return self
                            .normalize(child, host_child, parent, inherited_rotation)
                            .await;
                    }
                }
            }

            let raw_children = std::mem::take(&mut raw.children);
            let mut node = self.shell(&raw, id, parent, inherited_rotation, host.bounds());

            if host.kind() == "TEXT" {
                if let NodeKind::Text(text) = &mut node.kind {
                    text.segments = self.text_segments(&node.unique_name, host).await?;
                }
            }
            node.variant_properties = host.variant_properties().cloned();

            if self.session.settings().use_color_variables {
                let variables = self.variables;
                futures::try_join!(
                    variables.resolve_paints(&mut node.fills),
                    variables.resolve_paints(&mut node.strokes),
                    try_join_all(
                        node.effects
                            .iter_mut()
                            .map(|effect| variables.resolve_effect(effect))
                    ),
                )?;
            }

            match host.children() {
                Some(host_children) if host_children.len() == raw_children.len() => {
                    let cumulative =
                        descendant_rotation(&raw.kind, node.geometry.rotation, inherited_rotation);
                    let mut children = Vec::with_capacity(raw_children.len());
                    for (raw_child, host_child) in raw_children.into_iter().zip(host_children) {
                        if let Some(child) = self
                            .normalize(raw_child, host_child, Some(id), cumulative)
                            .await?
                        {
                            children.push(child);
                        }
                    }
                    node.children = children;
                    if !node.layout.is_auto()
                        || node.children.iter().any(|c| c.layout.is_absolute())
                    {
                        node.layout.is_relative = true;
                    }
                    reorder_children(&mut node);
                }
                _ if raw_children.is_empty() => {}
                _ => {
                    self.session.warn(CHILD_COUNT_MISMATCH);
                    let cumulative =
                        descendant_rotation(&raw.kind, node.geometry.rotation, inherited_rotation);
                    node.children = raw_children
                        .into_iter()
                        .filter_map(|child| self.unprocessed(child, Some(id), cumulative))
                        .collect();
                }
            }

            collapse_childless_hug(&mut node);
            log::debug!(
                "normalized {id} {} \"{}\" ({} children)",
                node.kind.type_name(),
                node.unique_name,
                node.children.len()
            );
            Ok(Some(node))
        }
        .boxed_local()
    }

    /// Defaults-only conversion for subtrees that cannot be paired with host
    /// nodes. No variables, no text runs, no elision, no reordering.
    fn unprocessed(
        &self,
        mut raw: RawNode,
        parent: Option<NodeId>,
        inherited_rotation: f64,
    ) -> Option<CanonicalNode> {
        let id = raw.id_str().map(NodeId::intern)?;
        if !raw.is_visible() || raw.kind == "SLICE" {
            return None;
        }
        let raw_children = std::mem::take(&mut raw.children);
        let mut node = self.shell(&raw, id, parent, inherited_rotation, None);
        let cumulative = descendant_rotation(&raw.kind, node.geometry.rotation, inherited_rotation);
        node.children = raw_children
            .into_iter()
            .filter_map(|child| self.unprocessed(child, Some(id), cumulative))
            .collect();
        collapse_childless_hug(&mut node);
        Some(node)
    }

    /// Everything that needs neither the host's children nor async lookups.
    fn shell(
        &self,
        raw: &RawNode,
        id: NodeId,
        parent: Option<NodeId>,
        inherited_rotation: f64,
        host_bounds: Option<HostBounds>,
    ) -> CanonicalNode {
        let unique_name = self.session.unique_name(&raw.name);
        let has_strokes = !raw.strokes.is_empty();

        CanonicalNode {
            id,
            name: raw.name.clone(),
            unique_name,
            kind: node_kind(raw),
            geometry: geometry(raw, host_bounds, inherited_rotation),
            layout: Layout::resolve(&raw.layout),
            fills: raw.fills.iter().map(Paint::from_raw).collect(),
            strokes: raw.strokes.iter().map(Paint::from_raw).collect(),
            stroke_weights: match (raw.individual_stroke_weights, raw.stroke_weight) {
                (Some(w), _) => StrokeWeights {
                    top: w.top,
                    right: w.right,
                    bottom: w.bottom,
                    left: w.left,
                },
                (None, Some(weight)) => StrokeWeights::all(weight),
                (None, None) if has_strokes => StrokeWeights::all(1.0),
                (None, None) => StrokeWeights::default(),
            },
            stroke_align: StrokeAlign::parse(raw.stroke_align.as_deref()),
            effects: raw.effects.iter().map(Effect::from_raw).collect(),
            corner_radius: CornerRadius::from_raw(raw.corner_radius, raw.rectangle_corner_radii),
            opacity: raw.opacity.unwrap_or(1.0),
            blend_mode: BlendMode::parse(raw.blend_mode.as_deref()),
            fill_geometry: raw.fill_geometry.iter().map(vector_path).collect(),
            stroke_geometry: raw.stroke_geometry.iter().map(vector_path).collect(),
            children: Vec::new(),
            parent,
            can_be_flattened: is_flattenable(&raw.kind),
            variant_properties: None,
        }
    }

    /// Read the host's glyph runs, assign segment ids and resolve run fills.
    async fn text_segments<H: HostNode>(
        &self,
        unique_name: &str,
        host: &H,
    ) -> Result<Vec<StyledTextSegment>, ConvertError> {
        let runs = host.styled_text_segments();
        if runs.is_empty() {
            return Ok(Vec::new());
        }

        let base: String = unique_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect::<String>()
            .to_lowercase();
        let single = runs.len() == 1;
        let mut segments: Vec<StyledTextSegment> = runs
            .into_iter()
            .enumerate()
            .map(|(index, run)| {
                let unique_id = if single {
                    format!("{base}_span")
                } else {
                    format!("{base}_span_{:02}", index + 1)
                };
                styled_segment(run, unique_id)
            })
            .collect();

        if self.session.settings().use_color_variables {
            for segment in &segments {
                if segment.fills.iter().any(|f| !f.blend_mode.is_normal()) {
                    self.session.warn(TEXT_BLEND_UNSUPPORTED);
                }
            }
            let variables = self.variables;
            try_join_all(
                segments
                    .iter_mut()
                    .map(|segment| variables.resolve_paints(&mut segment.fills)),
            )
            .await?;
        }
        Ok(segments)
    }
}

// ─── Structural policies ──────────────────────────────────────────────────

/// Only GROUP ancestors contribute rotation to their descendants.
fn descendant_rotation(kind: &str, own: f64, inherited: f64) -> f64 {
    if kind == "GROUP" {
        inherited + own
    } else {
        inherited
    }
}

fn single_visible_child(raw: &RawNode) -> Option<usize> {
    let mut visible = raw
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is_visible())
        .map(|(index, _)| index);
    match (visible.next(), visible.next()) {
        (Some(index), None) => Some(index),
        _ => None,
    }
}

fn paired_child<'h, H: HostNode>(host: &'h H, raw: &RawNode, index: usize) -> Option<&'h H> {
    host.children()
        .filter(|children| children.len() == raw.children.len())
        .and_then(|children| children.get(index))
}

/// Absolutely positioned children move to the front in reverse order; the
/// rest keep their relative order.
fn reorder_children(node: &mut CanonicalNode) {
    if !node.layout.item_reverse_z_index || !node.layout.is_auto() {
        return;
    }
    let (mut absolute, fixed): (Vec<_>, Vec<_>) = std::mem::take(&mut node.children)
        .into_iter()
        .partition(|child| child.layout.is_absolute());
    absolute.reverse();
    absolute.extend(fixed);
    node.children = absolute;
}

fn collapse_childless_hug(node: &mut CanonicalNode) {
    if node.children.is_empty() {
        if node.layout.sizing_horizontal == Sizing::Hug {
            node.layout.sizing_horizontal = Sizing::Fixed;
        }
        if node.layout.sizing_vertical == Sizing::Hug {
            node.layout.sizing_vertical = Sizing::Fixed;
        }
    }
}

// ─── Field conversion ─────────────────────────────────────────────────────

fn node_kind(raw: &RawNode) -> NodeKind {
    let frame = |frame| NodeKind::Frame {
        frame,
        clips_content: raw.clips_content.unwrap_or(false),
    };
    match raw.kind.as_str() {
        "RECTANGLE" => NodeKind::Rectangle,
        "ELLIPSE" => NodeKind::Ellipse,
        "GROUP" => NodeKind::Group,
        "FRAME" => frame(FrameKind::Frame),
        "COMPONENT" => frame(FrameKind::Component),
        "INSTANCE" => frame(FrameKind::Instance),
        "COMPONENT_SET" => frame(FrameKind::ComponentSet),
        "TEXT" => NodeKind::Text(Box::new(text_props(raw))),
        "LINE" => NodeKind::Line,
        "SECTION" => NodeKind::Section,
        "VECTOR" => NodeKind::Vector(VectorKind::Vector),
        "STAR" => NodeKind::Vector(VectorKind::Star),
        "POLYGON" => NodeKind::Vector(VectorKind::Polygon),
        "BOOLEAN_OPERATION" => NodeKind::Vector(VectorKind::BooleanOperation),
        "REGULAR_POLYGON" => NodeKind::Vector(VectorKind::RegularPolygon),
        other => NodeKind::Unsupported(other.to_string()),
    }
}

fn rect(r: RawRect) -> Rect {
    Rect {
        x: r.x,
        y: r.y,
        width: r.width,
        height: r.height,
    }
}

/// Host geometry wins; plugin-style raw fields and the bounding box are
/// fallbacks, in that order.
fn geometry(raw: &RawNode, host: Option<HostBounds>, inherited_rotation: f64) -> Geometry {
    let bbox = raw.absolute_bounding_box.map(rect);
    let pick = |host_value: Option<f64>, raw_value: Option<f64>, bbox_value: Option<f64>| {
        host_value.or(raw_value).or(bbox_value).unwrap_or(0.0)
    };
    Geometry {
        x: pick(host.map(|b| b.x), raw.x, bbox.map(|b| b.x)),
        y: pick(host.map(|b| b.y), raw.y, bbox.map(|b| b.y)),
        width: pick(host.map(|b| b.width), raw.width, bbox.map(|b| b.width)),
        height: pick(host.map(|b| b.height), raw.height, bbox.map(|b| b.height)),
        rotation: raw.rotation.map(f64::to_degrees).unwrap_or(0.0),
        cumulative_rotation: inherited_rotation,
        bounding_box: bbox,
        render_bounds: raw.absolute_render_bounds.map(rect),
    }
}

fn vector_path(path: &RawPath) -> VectorPath {
    VectorPath {
        path: path.path.clone(),
        even_odd: matches!(path.winding_rule.as_deref(), Some("EVENODD")),
    }
}

impl Layout {
    /// Fill every auto-layout field from a raw record, defaulting the missing
    /// ones. Present values pass through unchanged.
    pub fn resolve(raw: &RawLayout) -> Layout {
        let mode = match raw.layout_mode.as_deref() {
            Some("HORIZONTAL") => LayoutMode::Horizontal,
            Some("VERTICAL") => LayoutMode::Vertical,
            _ => LayoutMode::None,
        };
        let sizing = |value: Option<&str>| match value {
            Some("HUG") => Sizing::Hug,
            Some("FILL") => Sizing::Fill,
            _ => Sizing::Fixed,
        };
        let align = |value: Option<&str>| match value {
            Some("CENTER") => AxisAlign::Center,
            Some("MAX") => AxisAlign::Max,
            Some("SPACE_BETWEEN") => AxisAlign::SpaceBetween,
            Some("BASELINE") => AxisAlign::Baseline,
            _ => AxisAlign::Min,
        };
        Layout {
            mode,
            wrap: match raw.layout_wrap.as_deref() {
                Some("WRAP") => LayoutWrap::Wrap,
                _ => LayoutWrap::NoWrap,
            },
            sizing_horizontal: sizing(raw.layout_sizing_horizontal.as_deref()),
            sizing_vertical: sizing(raw.layout_sizing_vertical.as_deref()),
            primary_align: align(raw.primary_axis_align_items.as_deref()),
            counter_align: align(raw.counter_axis_align_items.as_deref()),
            item_spacing: raw.item_spacing.unwrap_or(0.0),
            counter_axis_spacing: raw.counter_axis_spacing,
            padding: Padding {
                top: raw.padding_top.unwrap_or(0.0),
                right: raw.padding_right.unwrap_or(0.0),
                bottom: raw.padding_bottom.unwrap_or(0.0),
                left: raw.padding_left.unwrap_or(0.0),
            },
            grow: raw.layout_grow.unwrap_or(0.0),
            positioning: match raw.layout_positioning.as_deref() {
                Some("ABSOLUTE") => Positioning::Absolute,
                _ => Positioning::Auto,
            },
            stretch: raw.layout_align.as_deref() == Some("STRETCH"),
            item_reverse_z_index: raw.item_reverse_z_index.unwrap_or(false),
            is_relative: false,
        }
    }
}

impl From<&Layout> for RawLayout {
    fn from(layout: &Layout) -> Self {
        let sizing = |s: Sizing| {
            match s {
                Sizing::Fixed => "FIXED",
                Sizing::Hug => "HUG",
                Sizing::Fill => "FILL",
            }
            .to_string()
        };
        let align = |a: AxisAlign| {
            match a {
                AxisAlign::Min => "MIN",
                AxisAlign::Center => "CENTER",
                AxisAlign::Max => "MAX",
                AxisAlign::SpaceBetween => "SPACE_BETWEEN",
                AxisAlign::Baseline => "BASELINE",
            }
            .to_string()
        };
        RawLayout {
            layout_mode: Some(
                match layout.mode {
                    LayoutMode::None => "NONE",
                    LayoutMode::Horizontal => "HORIZONTAL",
                    LayoutMode::Vertical => "VERTICAL",
                }
                .to_string(),
            ),
            layout_wrap: Some(
                match layout.wrap {
                    LayoutWrap::NoWrap => "NO_WRAP",
                    LayoutWrap::Wrap => "WRAP",
                }
                .to_string(),
            ),
            layout_sizing_horizontal: Some(sizing(layout.sizing_horizontal)),
            layout_sizing_vertical: Some(sizing(layout.sizing_vertical)),
            primary_axis_align_items: Some(align(layout.primary_align)),
            counter_axis_align_items: Some(align(layout.counter_align)),
            item_spacing: Some(layout.item_spacing),
            counter_axis_spacing: layout.counter_axis_spacing,
            padding_left: Some(layout.padding.left),
            padding_right: Some(layout.padding.right),
            padding_top: Some(layout.padding.top),
            padding_bottom: Some(layout.padding.bottom),
            layout_grow: Some(layout.grow),
            layout_positioning: Some(
                match layout.positioning {
                    Positioning::Auto => "AUTO",
                    Positioning::Absolute => "ABSOLUTE",
                }
                .to_string(),
            ),
            layout_align: Some(if layout.stretch { "STRETCH" } else { "INHERIT" }.to_string()),
            item_reverse_z_index: Some(layout.item_reverse_z_index),
        }
    }
}

// ─── Text ─────────────────────────────────────────────────────────────────

fn text_case(value: Option<&str>) -> TextCase {
    match value {
        Some("UPPER") => TextCase::Upper,
        Some("LOWER") => TextCase::Lower,
        Some("TITLE") => TextCase::Title,
        Some("SMALL_CAPS") => TextCase::SmallCaps,
        Some("SMALL_CAPS_FORCED") => TextCase::SmallCapsForced,
        _ => TextCase::Original,
    }
}

fn text_decoration(value: Option<&str>) -> TextDecoration {
    match value {
        Some("UNDERLINE") => TextDecoration::Underline,
        Some("STRIKETHROUGH") => TextDecoration::Strikethrough,
        _ => TextDecoration::None,
    }
}

fn text_style(style: &RawTypeStyle) -> TextStyle {
    let line_height = match style.line_height_unit.as_deref() {
        Some("INTRINSIC_%") => LineHeight::Auto,
        Some("FONT_SIZE_%") => style
            .line_height_percent_font_size
            .map_or(LineHeight::Auto, LineHeight::Percent),
        _ => style.line_height_px.map_or(LineHeight::Auto, LineHeight::Pixels),
    };
    let italic = style.italic.unwrap_or(false)
        || style
            .font_style
            .as_deref()
            .is_some_and(|s| s.to_ascii_lowercase().contains("italic"));

    TextStyle {
        font_family: style.font_family.clone(),
        font_style: style.font_style.clone(),
        font_size: style.font_size,
        font_weight: style.font_weight,
        italic,
        letter_spacing: style.letter_spacing.map(|value| LetterSpacing {
            value,
            unit: SpacingUnit::Pixels,
        }),
        line_height,
        align_horizontal: match style.text_align_horizontal.as_deref() {
            Some("CENTER") => TextAlign::Center,
            Some("RIGHT") => TextAlign::Right,
            Some("JUSTIFIED") => TextAlign::Justified,
            _ => TextAlign::Left,
        },
        align_vertical: match style.text_align_vertical.as_deref() {
            Some("CENTER") => TextVAlign::Center,
            Some("BOTTOM") => TextVAlign::Bottom,
            _ => TextVAlign::Top,
        },
        text_case: text_case(style.text_case.as_deref()),
        text_decoration: text_decoration(style.text_decoration.as_deref()),
    }
}

fn text_props(raw: &RawNode) -> TextProps {
    let style = raw.style.clone().unwrap_or_default();
    TextProps {
        characters: raw.characters.clone().unwrap_or_default(),
        auto_resize: match style.text_auto_resize.as_deref() {
            Some("WIDTH_AND_HEIGHT") => TextAutoResize::WidthAndHeight,
            Some("HEIGHT") => TextAutoResize::Height,
            Some("TRUNCATE") => TextAutoResize::Truncate,
            _ => TextAutoResize::None,
        },
        style: text_style(&style),
        segments: Vec::new(),
    }
}

fn hyperlink(link: RawHyperlink) -> Hyperlink {
    Hyperlink {
        kind: link.kind,
        value: link.value,
    }
}

fn letter_spacing(spacing: RawSpacing) -> LetterSpacing {
    LetterSpacing {
        value: spacing.value,
        unit: if spacing.unit == "PERCENT" {
            SpacingUnit::Percent
        } else {
            SpacingUnit::Pixels
        },
    }
}

fn styled_segment(run: RawTextSegment, unique_id: String) -> StyledTextSegment {
    StyledTextSegment {
        font_name: run.font_name.map(|f| FontName {
            family: f.family,
            style: f.style,
        }),
        font_size: run.font_size,
        font_weight: run.font_weight,
        fills: run.fills.iter().map(Paint::from_raw).collect(),
        hyperlink: run.hyperlink.map(hyperlink),
        indentation: run.indentation.unwrap_or(0.0),
        letter_spacing: run.letter_spacing.map(letter_spacing),
        line_height: match run.line_height {
            Some(RawLineHeight::Pixels { value }) => LineHeight::Pixels(value),
            Some(RawLineHeight::Percent { value }) => LineHeight::Percent(value),
            Some(RawLineHeight::Auto) | None => LineHeight::Auto,
        },
        list_type: run
            .list_options
            .map(|list| list.kind)
            .filter(|kind| !kind.is_empty() && kind != "NONE"),
        text_case: text_case(run.text_case.as_deref()),
        text_decoration: text_decoration(run.text_decoration.as_deref()),
        text_style_id: run.text_style_id.filter(|id| !id.is_empty()),
        fill_style_id: run.fill_style_id.filter(|id| !id.is_empty()),
        open_type_features: run.open_type_features,
        characters: run.characters,
        start: run.start,
        end: run.end,
        unique_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SnapshotNode;
    use crate::settings::Settings;
    use crate::variables::StaticVariables;
    use std::rc::Rc;

    fn node(id: &str, kind: &str, name: &str) -> RawNode {
        RawNode {
            id: Some(id.into()),
            kind: kind.into(),
            name: name.into(),
            ..RawNode::default()
        }
    }

    async fn run(raw: RawNode, settings: Settings) -> (Option<CanonicalNode>, Vec<String>) {
        let session = Session::new(settings);
        let cache = VariableCache::new(Rc::new(StaticVariables::default()));
        let normalizer = Normalizer::new(&session, &cache);
        let host = SnapshotNode::mirror(&raw);
        let result = normalizer.normalize(raw, &host, None, 0.0).await.unwrap();
        (result, session.warnings())
    }

    #[tokio::test]
    async fn drops_idless_invisible_and_slices() {
        let mut hidden = node("1:1", "RECTANGLE", "Hidden");
        hidden.visible = Some(false);
        assert!(run(hidden, Settings::default()).await.0.is_none());
        assert!(run(node("", "RECTANGLE", "NoId"), Settings::default()).await.0.is_none());
        assert!(run(node("1:2", "SLICE", "Slice"), Settings::default()).await.0.is_none());
    }

    #[tokio::test]
    async fn childless_frame_becomes_rectangle() {
        let (result, _) = run(node("1:1", "INSTANCE", "Empty"), Settings::default()).await;
        assert_eq!(result.unwrap().kind, NodeKind::Rectangle);
    }

    #[tokio::test]
    async fn single_child_group_is_elided() {
        let mut frame = node("1:1", "FRAME", "Root");
        let mut group = node("1:2", "GROUP", "Wrapper");
        let mut hidden = node("1:4", "RECTANGLE", "Ghost");
        hidden.visible = Some(false);
        group.children = vec![node("1:3", "ELLIPSE", "Dot"), hidden];
        frame.children = vec![group];

        let (root, _) = run(frame, Settings::default()).await;
        let root = root.unwrap();
        assert_eq!(root.children.len(), 1);
        let dot = &root.children[0];
        assert_eq!(dot.kind, NodeKind::Ellipse);
        assert_eq!(dot.parent, Some(NodeId::intern("1:1")));
    }

    #[tokio::test]
    async fn padding_defaults_and_hug_collapse() {
        let mut frame = node("1:1", "FRAME", "Stack");
        frame.layout.layout_mode = Some("VERTICAL".into());
        frame.layout.padding_top = Some(8.0);
        let mut text = node("1:2", "TEXT", "Label");
        text.layout.layout_sizing_horizontal = Some("HUG".into());
        frame.children = vec![text];

        let (root, _) = run(frame, Settings::default()).await;
        let root = root.unwrap();
        assert_eq!(root.layout.padding.top, 8.0);
        assert_eq!(root.layout.padding.left, 0.0);
        assert!(!root.layout.is_relative);
        assert_eq!(root.children[0].layout.sizing_horizontal, Sizing::Fixed);
        let text = root.children[0].text().unwrap();
        assert_eq!(text.auto_resize, TextAutoResize::None);
    }

    #[tokio::test]
    async fn reverse_z_index_puts_absolute_children_first() {
        let mut frame = node("1:1", "FRAME", "Row");
        frame.layout.layout_mode = Some("HORIZONTAL".into());
        frame.layout.item_reverse_z_index = Some(true);
        let absolute = |id: &str, name: &str| {
            let mut child = node(id, "RECTANGLE", name);
            child.layout.layout_positioning = Some("ABSOLUTE".into());
            child
        };
        frame.children = vec![
            node("1:2", "RECTANGLE", "a"),
            absolute("1:3", "b"),
            node("1:4", "RECTANGLE", "c"),
            absolute("1:5", "d"),
        ];

        let (root, _) = run(frame, Settings::default()).await;
        let root = root.unwrap();
        let order: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, ["d", "b", "a", "c"]);
        assert!(root.layout.is_relative);
    }

    #[tokio::test]
    async fn variable_names_are_resolved_when_enabled() {
        let mut rect = node("1:1", "RECTANGLE", "Swatch");
        rect.fills = vec![serde_json::from_str(
            r#"{ "type": "SOLID", "color": { "r": 1, "g": 0, "b": 0 },
                 "boundVariables": { "color": { "type": "VARIABLE_ALIAS", "id": "v:1" } } }"#,
        )
        .unwrap()];

        let session = Session::new(Settings {
            use_color_variables: true,
            ..Settings::default()
        });
        let vars = StaticVariables([("v:1".to_string(), "brand, red".to_string())].into());
        let cache = VariableCache::new(Rc::new(vars));
        let host = SnapshotNode::mirror(&rect);
        let normalized = Normalizer::new(&session, &cache)
            .normalize(rect, &host, None, 0.0)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(normalized.fills[0].variable_color_name(), Some("brand red"));
    }

    #[test]
    fn layout_defaults_are_idempotent() {
        let raw = RawLayout {
            layout_mode: Some("HORIZONTAL".into()),
            padding_left: Some(12.0),
            layout_sizing_vertical: Some("FILL".into()),
            ..RawLayout::default()
        };
        let once = Layout::resolve(&raw);
        let twice = Layout::resolve(&RawLayout::from(&once));
        assert_eq!(once, twice);
        assert_eq!(once.primary_align, AxisAlign::Min);
        assert_eq!(once.padding.right, 0.0);
    }
}
