//! Auto-layout → flexbox tokens.
//!
//! A container with a layout mode becomes a flex container. Nested auto
//! layout along the same axis uses block `flex`; everything else uses
//! `inline-flex` so the container keeps hugging its content.

use crate::model::{AxisAlign, CanonicalNode, LayoutMode, LayoutWrap};
use crate::tables::spacing;

/// Flex tokens for `node`, or nothing when it has no layout mode.
pub fn auto_layout_tokens(node: &CanonicalNode, parent: Option<&CanonicalNode>) -> Vec<String> {
    let layout = &node.layout;
    if !layout.is_auto() {
        return Vec::new();
    }
    let mut tokens = Vec::new();

    let same_axis = parent.is_some_and(|p| p.layout.mode == layout.mode);
    tokens.push(if same_axis { "flex" } else { "inline-flex" }.to_string());
    if layout.mode == LayoutMode::Vertical {
        tokens.push("flex-col".to_string());
    }
    if layout.wrap == LayoutWrap::Wrap {
        tokens.push("flex-wrap".to_string());
    }

    tokens.push(
        match layout.primary_align {
            AxisAlign::Center => "justify-center",
            AxisAlign::Max => "justify-end",
            AxisAlign::SpaceBetween => "justify-between",
            AxisAlign::Min | AxisAlign::Baseline => "justify-start",
        }
        .to_string(),
    );
    tokens.push(
        match layout.counter_align {
            AxisAlign::Center => "items-center",
            AxisAlign::Max => "items-end",
            AxisAlign::Baseline => "items-baseline",
            AxisAlign::Min | AxisAlign::SpaceBetween => "items-start",
        }
        .to_string(),
    );

    let spaced = layout.item_spacing > 0.0 && layout.primary_align != AxisAlign::SpaceBetween;
    match (layout.wrap, layout.counter_axis_spacing) {
        (LayoutWrap::Wrap, Some(counter)) => {
            let (main, cross) = match layout.mode {
                LayoutMode::Vertical => ("y", "x"),
                _ => ("x", "y"),
            };
            if spaced {
                tokens.push(format!("gap-{main}-{}", spacing(layout.item_spacing)));
            }
            if counter > 0.0 {
                tokens.push(format!("gap-{cross}-{}", spacing(counter)));
            }
        }
        _ if spaced => tokens.push(format!("gap-{}", spacing(layout.item_spacing))),
        _ => {}
    }

    log::trace!("auto layout {}: {}", node.id.as_str(), tokens.join(" "));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use pretty_assertions::assert_eq;

    fn frame(mode: LayoutMode) -> CanonicalNode {
        let mut node = CanonicalNode::test_node(
            "stack",
            NodeKind::Frame {
                frame: crate::model::FrameKind::Frame,
                clips_content: false,
            },
            100.0,
            100.0,
        );
        node.layout.mode = mode;
        node
    }

    #[test]
    fn no_layout_mode_means_no_flex() {
        assert!(auto_layout_tokens(&frame(LayoutMode::None), None).is_empty());
    }

    #[test]
    fn vertical_stack_with_gap() {
        let mut node = frame(LayoutMode::Vertical);
        node.layout.item_spacing = 16.0;
        node.layout.counter_align = AxisAlign::Center;
        assert_eq!(
            auto_layout_tokens(&node, None),
            vec!["inline-flex", "flex-col", "justify-start", "items-center", "gap-4"]
        );
    }

    #[test]
    fn nested_same_axis_uses_block_flex() {
        let parent = frame(LayoutMode::Horizontal);
        let mut node = frame(LayoutMode::Horizontal);
        node.layout.primary_align = AxisAlign::SpaceBetween;
        node.layout.item_spacing = 8.0;
        assert_eq!(
            auto_layout_tokens(&node, Some(&parent)),
            vec!["flex", "justify-between", "items-start"]
        );
    }

    #[test]
    fn wrapping_row_has_separate_gaps() {
        let mut node = frame(LayoutMode::Horizontal);
        node.layout.wrap = LayoutWrap::Wrap;
        node.layout.item_spacing = 8.0;
        node.layout.counter_axis_spacing = Some(12.0);
        assert_eq!(
            auto_layout_tokens(&node, None),
            vec![
                "inline-flex",
                "flex-wrap",
                "justify-start",
                "items-start",
                "gap-x-2",
                "gap-y-3"
            ]
        );
    }
}
