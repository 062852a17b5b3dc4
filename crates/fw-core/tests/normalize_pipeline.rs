//! Integration tests: the canonical tree produced by a conversion call.

use fw_core::raw::RawLayout;
use fw_core::{CanonicalNode, NoVariables, NodeKind, RawNode, Settings, SnapshotNode, convert};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use std::rc::Rc;

async fn tree(document: serde_json::Value) -> Vec<CanonicalNode> {
    let raw: RawNode = serde_json::from_value(document).expect("valid node document");
    normalized(&raw).await
}

async fn normalized(raw: &RawNode) -> Vec<CanonicalNode> {
    let host = SnapshotNode::mirror(raw);
    convert(&[host], Settings::default(), Rc::new(NoVariables))
        .await
        .expect("conversion succeeds")
        .tree
}

fn rect(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "type": "RECTANGLE",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 8, "height": 8 }
    })
}

#[tokio::test]
async fn group_rotations_accumulate_for_descendants() {
    let roots = tree(json!({
        "id": "1:1", "name": "Outer", "type": "GROUP",
        "rotation": 10f64.to_radians(),
        "children": [
            {
                "id": "1:2", "name": "Inner", "type": "GROUP",
                "rotation": 5f64.to_radians(),
                "children": [rect("1:3", "Leaf"), rect("1:4", "Leaf")]
            },
            rect("1:5", "Sibling")
        ]
    }))
    .await;

    let outer = &roots[0];
    assert_eq!(outer.geometry.cumulative_rotation, 0.0);
    let inner = &outer.children[0];
    assert!((inner.geometry.cumulative_rotation - 10.0).abs() < 1e-9);
    let leaf = &inner.children[0];
    assert!((leaf.geometry.cumulative_rotation - 15.0).abs() < 1e-9);
    assert!((outer.children[1].geometry.cumulative_rotation - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn frame_rotation_is_not_inherited() {
    let roots = tree(json!({
        "id": "2:1", "name": "Outer", "type": "GROUP",
        "rotation": 10f64.to_radians(),
        "children": [
            {
                "id": "2:2", "name": "Panel", "type": "FRAME",
                "rotation": 30f64.to_radians(),
                "children": [rect("2:3", "Leaf"), rect("2:4", "Leaf")]
            },
            rect("2:5", "Sibling")
        ]
    }))
    .await;

    let leaf = &roots[0].children[0].children[0];
    assert!((leaf.geometry.cumulative_rotation - 10.0).abs() < 1e-9);
}

#[tokio::test]
async fn every_unique_name_is_distinct() {
    let roots = tree(json!({
        "id": "3:1", "name": "Item", "type": "FRAME",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 64, "height": 64 },
        "children": [
            rect("3:2", "Item"),
            rect("3:3", "Item"),
            rect("3:4", "Item_01"),
            rect("3:5", " Item ")
        ]
    }))
    .await;

    let mut names = Vec::new();
    roots[0].walk(&mut |node| names.push(node.unique_name.as_str()));
    let distinct: HashSet<_> = names.iter().collect();
    assert_eq!(distinct.len(), names.len(), "duplicate in {names:?}");
    assert_eq!(names[0], "Item");
}

#[tokio::test]
async fn auto_layout_padding_is_always_complete() {
    let roots = tree(json!({
        "id": "4:1", "name": "Stack", "type": "FRAME",
        "layoutMode": "HORIZONTAL",
        "paddingLeft": 12,
        "children": [rect("4:2", "A"), rect("4:3", "B")]
    }))
    .await;

    let padding = roots[0].layout.padding;
    assert_eq!(padding.left, 12.0);
    assert_eq!(padding.right, 0.0);
    assert_eq!(padding.top, 0.0);
    assert_eq!(padding.bottom, 0.0);
}

#[tokio::test]
async fn single_child_group_is_replaced_by_its_child() {
    let roots = tree(json!({
        "id": "5:1", "name": "Screen", "type": "FRAME",
        "children": [
            { "id": "5:2", "name": "Wrapper", "type": "GROUP", "children": [rect("5:3", "Only")] },
            rect("5:4", "Other")
        ]
    }))
    .await;

    let names: Vec<_> = roots[0].children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Only", "Other"]);
}

#[tokio::test]
async fn childless_frame_is_emitted_as_a_rectangle() {
    let roots = tree(json!({ "id": "6:1", "name": "Blank", "type": "FRAME" })).await;
    assert_eq!(roots[0].kind, NodeKind::Rectangle);
    assert!(roots[0].children.is_empty());
}

/// Write the canonical values back into the export so the next pass sees
/// every field already present.
fn refeed(raw: &mut RawNode, node: &CanonicalNode) {
    raw.layout = RawLayout::from(&node.layout);
    raw.opacity = Some(node.opacity);
    for (raw_child, child) in raw.children.iter_mut().zip(&node.children) {
        refeed(raw_child, child);
    }
}

#[tokio::test]
async fn normalizing_a_canonical_tree_again_changes_nothing() {
    let mut raw: RawNode = serde_json::from_value(json!({
        "id": "7:1", "name": "Toolbar", "type": "FRAME",
        "absoluteBoundingBox": { "x": 0, "y": 0, "width": 120, "height": 40 },
        "layoutMode": "HORIZONTAL",
        "itemSpacing": 8,
        "paddingLeft": 4,
        "counterAxisAlignItems": "CENTER",
        "fills": [{ "type": "SOLID", "color": { "r": 1, "g": 1, "b": 1, "a": 1 } }],
        "children": [
            {
                "id": "7:2", "name": "Icon", "type": "RECTANGLE",
                "absoluteBoundingBox": { "x": 4, "y": 4, "width": 32, "height": 32 },
                "opacity": 0.5
            },
            {
                "id": "7:3", "name": "Label", "type": "TEXT",
                "absoluteBoundingBox": { "x": 44, "y": 10, "width": 40, "height": 20 },
                "layoutSizingHorizontal": "HUG",
                "characters": "Save",
                "style": { "fontFamily": "Inter", "fontWeight": 400, "fontSize": 14 }
            }
        ]
    }))
    .expect("valid node document");

    let once = normalized(&raw).await;
    refeed(&mut raw, &once[0]);
    let twice = normalized(&raw).await;
    assert_eq!(once, twice);
    assert_eq!(twice[0].layout.padding.right, 0.0);
}
