//! The live design-tool side of a node pair.
//!
//! The normalizer walks two trees in lockstep: the raw REST-style export and
//! the host's own node handles. The host contributes what the export lacks:
//! parent-relative geometry, styled text runs and variant metadata.
//! `SnapshotNode` is a captured host tree, and `SnapshotNode::mirror`
//! synthesizes one from an export alone.

use crate::error::ConvertError;
use crate::raw::{
    RawFontName, RawLineHeight, RawNode, RawSpacing, RawTextSegment, RawTypeStyle,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;

/// Parent-relative position and size as the host reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HostBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A handle to a node in the live design tool.
pub trait HostNode: Sized {
    /// The host's type tag (`FRAME`, `TEXT`, …).
    fn kind(&self) -> &str;

    /// `None` for nodes without a size (e.g. slices on some hosts).
    fn bounds(&self) -> Option<HostBounds>;

    /// `None` for leaf kinds that cannot have children.
    fn children(&self) -> Option<&[Self]>;

    /// Glyph runs of a text node, in document order.
    fn styled_text_segments(&self) -> Vec<RawTextSegment>;

    fn variant_properties(&self) -> Option<&BTreeMap<String, String>>;

    /// Request the tool-native structured export of this node's subtree.
    fn export_json(&self) -> impl Future<Output = Result<RawNode, ConvertError>>;
}

// ─── Snapshot ─────────────────────────────────────────────────────────────

/// A captured host node tree.
///
/// Only top-level snapshot nodes need a `document`; nested nodes are paired
/// with the children of their ancestor's document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub children: Option<Vec<SnapshotNode>>,
    pub styled_text_segments: Vec<RawTextSegment>,
    pub variant_properties: Option<BTreeMap<String, String>>,
    pub document: Option<RawNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Many(Vec<SnapshotNode>),
    Wrapped { nodes: Vec<SnapshotNode> },
    One(Box<SnapshotNode>),
}

impl SnapshotNode {
    /// Load a selection: an array of snapshots, `{ "nodes": [...] }`, or a
    /// single snapshot object.
    ///
    /// # Errors
    /// Returns `ConvertError::Json` if the text matches none of these shapes.
    pub fn load_selection(text: &str) -> Result<Vec<SnapshotNode>, ConvertError> {
        Ok(match serde_json::from_str(text)? {
            SnapshotFile::Many(nodes) | SnapshotFile::Wrapped { nodes } => nodes,
            SnapshotFile::One(node) => vec![*node],
        })
    }

    /// Build a host view of an exported document.
    ///
    /// Geometry comes from `absoluteBoundingBox`, made relative to the nearest
    /// non-group ancestor the way the live host reports it. Text runs are
    /// derived from `characterStyleOverrides` and `styleOverrideTable`.
    pub fn mirror(raw: &RawNode) -> SnapshotNode {
        let mut snapshot = mirror_in(raw, None);
        snapshot.document = Some(raw.clone());
        snapshot
    }
}

fn mirror_in(raw: &RawNode, origin: Option<(f64, f64)>) -> SnapshotNode {
    let bbox = raw.absolute_bounding_box;
    let (ox, oy) = origin.unwrap_or((0.0, 0.0));

    // Group children are positioned in the group's parent space.
    let child_origin = match (raw.kind.as_str(), bbox) {
        ("GROUP", _) => origin,
        (_, Some(b)) => Some((b.x, b.y)),
        (_, None) => origin,
    };

    SnapshotNode {
        id: raw.id.clone().unwrap_or_default(),
        kind: raw.kind.clone(),
        x: bbox.map(|b| b.x - ox).or(raw.x),
        y: bbox.map(|b| b.y - oy).or(raw.y),
        width: bbox.map(|b| b.width).or(raw.width),
        height: bbox.map(|b| b.height).or(raw.height),
        children: (!raw.children.is_empty() || is_container_tag(&raw.kind)).then(|| {
            raw.children
                .iter()
                .map(|child| mirror_in(child, child_origin))
                .collect()
        }),
        styled_text_segments: if raw.kind == "TEXT" {
            text_runs(raw)
        } else {
            Vec::new()
        },
        variant_properties: None,
        document: None,
    }
}

fn is_container_tag(tag: &str) -> bool {
    matches!(
        tag,
        "FRAME" | "GROUP" | "COMPONENT" | "COMPONENT_SET" | "INSTANCE" | "SECTION"
            | "BOOLEAN_OPERATION"
    )
}

/// Split a text node's characters into runs of equal style override.
///
/// `characterStyleOverrides` and the run offsets count UTF-16 code units, so
/// a character outside the BMP occupies two entries.
fn text_runs(raw: &RawNode) -> Vec<RawTextSegment> {
    let Some(characters) = raw.characters.as_deref().filter(|c| !c.is_empty()) else {
        return Vec::new();
    };
    let base = raw.style.clone().unwrap_or_default();

    let mut total = 0;
    let chars: Vec<(usize, char)> = characters
        .chars()
        .map(|c| {
            let at = total;
            total += c.len_utf16();
            (at, c)
        })
        .collect();

    // Overrides shorter than the text mean "base style" for the remainder.
    let override_at = |i: usize| {
        let unit = chars[i].0;
        raw.character_style_overrides.get(unit).copied().unwrap_or(0)
    };

    let mut runs = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let key = override_at(start);
        let mut end = start + 1;
        while end < chars.len() && override_at(end) == key {
            end += 1;
        }
        let style = match raw.style_override_table.get(&key.to_string()) {
            Some(over) if key != 0 => base.merged(over),
            _ => base.clone(),
        };
        runs.push(segment_from_style(
            chars[start..end].iter().map(|(_, c)| c).collect(),
            chars[start].0,
            chars.get(end).map_or(total, |(at, _)| *at),
            &style,
            raw,
        ));
        start = end;
    }
    runs
}

fn segment_from_style(
    characters: String,
    start: usize,
    end: usize,
    style: &RawTypeStyle,
    raw: &RawNode,
) -> RawTextSegment {
    let line_height = match style.line_height_unit.as_deref() {
        Some("INTRINSIC_%") => Some(RawLineHeight::Auto),
        Some("FONT_SIZE_%") => style
            .line_height_percent_font_size
            .map(|value| RawLineHeight::Percent { value }),
        _ => style
            .line_height_px
            .map(|value| RawLineHeight::Pixels { value }),
    };

    RawTextSegment {
        characters,
        start,
        end,
        font_name: style.font_family.as_ref().map(|family| RawFontName {
            family: family.clone(),
            style: style.font_style.clone().unwrap_or_else(|| "Regular".into()),
        }),
        font_size: style.font_size,
        font_weight: style.font_weight,
        fills: style.fills.clone().unwrap_or_else(|| raw.fills.clone()),
        hyperlink: style.hyperlink.clone(),
        indentation: None,
        letter_spacing: style.letter_spacing.map(|value| RawSpacing {
            value,
            unit: "PIXELS".into(),
        }),
        line_height,
        list_options: None,
        text_case: style.text_case.clone(),
        text_decoration: style.text_decoration.clone(),
        text_style_id: None,
        fill_style_id: None,
        open_type_features: style
            .opentype_flags
            .iter()
            .map(|(feature, flag)| (feature.clone(), *flag != 0))
            .collect(),
    }
}

impl HostNode for SnapshotNode {
    fn kind(&self) -> &str {
        match (&self.kind, &self.document) {
            (kind, Some(doc)) if kind.is_empty() => &doc.kind,
            (kind, _) => kind,
        }
    }

    fn bounds(&self) -> Option<HostBounds> {
        Some(HostBounds {
            x: self.x?,
            y: self.y?,
            width: self.width?,
            height: self.height?,
        })
    }

    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn styled_text_segments(&self) -> Vec<RawTextSegment> {
        self.styled_text_segments.clone()
    }

    fn variant_properties(&self) -> Option<&BTreeMap<String, String>> {
        self.variant_properties.as_ref()
    }

    fn export_json(&self) -> impl Future<Output = Result<RawNode, ConvertError>> {
        let result = self.document.clone().ok_or_else(|| ConvertError::Export {
            id: self.id.clone(),
            reason: "snapshot carries no exported document".into(),
        });
        futures::future::ready(result)
    }
}
