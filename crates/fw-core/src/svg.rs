//! Inline vector markup for flattenable shapes.

use crate::color::css_color;
use crate::error::EmitError;
use crate::model::{CanonicalNode, Paint, PaintKind, VectorPath, top_paint};
use crate::tables::format_num;
use std::future::Future;

/// Produces `<svg>` markup for a node, or `None` when it has nothing to draw.
pub trait VectorRenderer {
    fn render(
        &self,
        node: &CanonicalNode,
    ) -> impl Future<Output = Result<Option<String>, EmitError>>;
}

/// Renders the fill and stroke outlines exported with the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometrySvg;

impl VectorRenderer for GeometrySvg {
    fn render(
        &self,
        node: &CanonicalNode,
    ) -> impl Future<Output = Result<Option<String>, EmitError>> {
        futures::future::ready(render_geometry(node))
    }
}

fn solid_color(paints: &[Paint]) -> Option<String> {
    let paint = top_paint(paints)?;
    match &paint.kind {
        PaintKind::Solid { color, .. } => Some(css_color(*color, color.a * paint.opacity)),
        _ => None,
    }
}

fn check_path(node: &CanonicalNode, path: &VectorPath) -> Result<(), EmitError> {
    let valid = path.path.chars().all(|c| {
        c.is_ascii_digit()
            || c.is_ascii_whitespace()
            || matches!(c, '.' | '-' | '+' | ',' | 'e' | 'E')
            || "MmLlHhVvCcSsQqTtAaZz".contains(c)
    });
    if valid && !path.path.trim().is_empty() {
        Ok(())
    } else {
        Err(EmitError::InvalidVector {
            node: node.id.as_str().to_string(),
            reason: format!("malformed path data {:?}", path.path),
        })
    }
}

/// Build the `<svg>` element for `node` from its fill/stroke geometry.
///
/// # Errors
/// `EmitError::InvalidVector` when a path contains anything but path data.
pub fn render_geometry(node: &CanonicalNode) -> Result<Option<String>, EmitError> {
    if node.fill_geometry.is_empty() && node.stroke_geometry.is_empty() {
        return Ok(None);
    }
    let geometry = node.geometry;
    let width = format_num(geometry.width);
    let height = format_num(geometry.height);

    let mut out = format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    let fill = solid_color(&node.fills);
    for path in &node.fill_geometry {
        check_path(node, path)?;
        write_path(&mut out, path, fill.as_deref().unwrap_or("none"));
    }
    let stroke = solid_color(&node.strokes);
    for path in &node.stroke_geometry {
        check_path(node, path)?;
        write_path(&mut out, path, stroke.as_deref().unwrap_or("none"));
    }
    out.push_str("</svg>\n");
    Ok(Some(out))
}

fn write_path(out: &mut String, path: &VectorPath, fill: &str) {
    let rule = if path.even_odd {
        " fill-rule=\"evenodd\" clip-rule=\"evenodd\""
    } else {
        ""
    };
    out.push_str(&format!(
        "  <path d=\"{}\" fill=\"{fill}\"{rule} />\n",
        path.path.trim()
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKind, VectorKind};
    use pretty_assertions::assert_eq;

    fn star() -> CanonicalNode {
        let mut node =
            CanonicalNode::test_node("star", NodeKind::Vector(VectorKind::Star), 24.0, 24.0)
                .with_fill("#ef4444");
        node.can_be_flattened = true;
        node
    }

    #[test]
    fn renders_fill_paths() {
        let mut node = star();
        node.fill_geometry = vec![VectorPath {
            path: "M0 0L24 0L12 24Z".into(),
            even_odd: true,
        }];
        let svg = render_geometry(&node).unwrap().unwrap();
        assert_eq!(
            svg,
            "<svg width=\"24\" height=\"24\" viewBox=\"0 0 24 24\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n  <path d=\"M0 0L24 0L12 24Z\" fill=\"#ef4444\" fill-rule=\"evenodd\" clip-rule=\"evenodd\" />\n</svg>\n"
        );
    }

    #[test]
    fn no_geometry_renders_nothing() {
        assert_eq!(render_geometry(&star()).unwrap(), None);
    }

    #[test]
    fn markup_in_path_data_is_rejected() {
        let mut node = star();
        node.fill_geometry = vec![VectorPath {
            path: "M0 0\"/><script>".into(),
            even_odd: false,
        }];
        assert!(matches!(
            render_geometry(&node),
            Err(EmitError::InvalidVector { .. })
        ));
    }
}
