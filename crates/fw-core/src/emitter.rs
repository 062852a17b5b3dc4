//! Emitter: canonical tree → utility-class markup.
//!
//! Walks the tree recursively, dispatching on the node kind. Sibling
//! subtrees are emitted concurrently and reassembled in index order. Every
//! top-level node is a containment boundary: a failing subtree is logged and
//! contributes an empty fragment instead of aborting the batch.

use crate::autolayout::auto_layout_tokens;
use crate::builder::{StyleBuilder, escape_text};
use crate::context::Session;
use crate::error::EmitError;
use crate::model::{CanonicalNode, NodeKind, Paint, VectorKind, top_paint};
use crate::segments::{feature_tag, resolve_segments};
use crate::svg::VectorRenderer;
use crate::tables::format_num;
use crate::text_builder::TextBuilder;
use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all, try_join_all};

/// Warning recorded for every image fill.
pub const IMAGE_PLACEHOLDER: &str = "Image fills are replaced with placeholders";

/// Warning recorded instead of [`IMAGE_PLACEHOLDER`] when image embedding
/// was requested.
pub const IMAGE_EMBED_UNAVAILABLE: &str =
    "Image embedding is not available; image fills are replaced with placeholders";

/// Warning recorded for plain vectors when embedding is off.
pub const VECTOR_UNSUPPORTED: &str = "VECTOR node is not supported without vector embedding";

/// Placeholder image reference for an image fill of the given size.
pub fn placeholder_image(width: f64, height: f64) -> String {
    format!(
        "https://placehold.co/{}x{}",
        format_num(width.round()),
        format_num(height.round())
    )
}

/// Indent every non-blank line by two spaces.
fn indent(code: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct Emitter<'a, V> {
    session: &'a Session,
    vectors: &'a V,
}

impl<'a, V: VectorRenderer> Emitter<'a, V> {
    pub fn new(session: &'a Session, vectors: &'a V) -> Self {
        Self { session, vectors }
    }

    /// Emit the markup for a selection of top-level nodes. The result never
    /// starts with a newline.
    pub async fn emit_selection(&self, roots: &[CanonicalNode]) -> String {
        let fragments = join_all(roots.iter().map(|root| async move {
            match self.emit_node(root, None).await {
                Ok(code) => code,
                Err(err) => {
                    log::warn!("emission of `{}` failed: {err}", root.id.as_str());
                    String::new()
                }
            }
        }))
        .await;
        let code = fragments.concat();
        match code.strip_prefix('\n') {
            Some(rest) => rest.to_string(),
            None => code,
        }
    }

    /// Emit one node and its subtree.
    pub fn emit_node<'n>(
        &'n self,
        node: &'n CanonicalNode,
        parent: Option<&'n CanonicalNode>,
    ) -> LocalBoxFuture<'n, Result<String, EmitError>>
    where
        V: 'n,
    {
        async move {
            check_geometry(node)?;
            log::debug!("emitting {} `{}`", node.kind.type_name(), node.unique_name);

            if self.session.settings().embed_vectors && node.can_be_flattened {
                match self.vectors.render(node).await {
                    Ok(Some(svg)) => return Ok(self.wrap_svg(node, parent, &svg)),
                    Ok(None) => {}
                    Err(err) => log::warn!("falling back to a container: {err}"),
                }
            }

            match &node.kind {
                NodeKind::Group => self.group(node, parent).await,
                NodeKind::Frame { clips_content, .. } => {
                    self.frame(node, parent, *clips_content).await
                }
                NodeKind::Section => self.section(node, parent).await,
                _ => Ok(self.leaf(node, parent)),
            }
        }
        .boxed_local()
    }

    async fn children(&self, node: &CanonicalNode) -> Result<String, EmitError> {
        let parts =
            try_join_all(node.children.iter().map(|child| self.emit_node(child, Some(node))))
                .await?;
        Ok(parts.concat())
    }

    fn wrap_svg(&self, node: &CanonicalNode, parent: Option<&CanonicalNode>, svg: &str) -> String {
        let attrs = StyleBuilder::new(node, parent, self.session.settings())
            .add_data("svg-wrapper", None)
            .position()
            .build("");
        format!("\n<div{attrs}>\n{svg}</div>")
    }

    async fn group(
        &self,
        node: &CanonicalNode,
        parent: Option<&CanonicalNode>,
    ) -> Result<String, EmitError> {
        let geometry = node.geometry;
        if geometry.width < 0.0 || geometry.height <= 0.0 || node.children.is_empty() {
            return Ok(String::new());
        }
        let builder = StyleBuilder::new(node, parent, self.session.settings())
            .blend()
            .size()
            .position();
        let children = self.children(node).await?;
        if builder.has_tokens() {
            Ok(format!("\n<div{}>{}\n</div>", builder.build(""), indent(&children)))
        } else {
            Ok(children)
        }
    }

    async fn frame(
        &self,
        node: &CanonicalNode,
        parent: Option<&CanonicalNode>,
        clips_content: bool,
    ) -> Result<String, EmitError> {
        let children = self.children(node).await?;
        let mut extra = auto_layout_tokens(node, parent);
        if clips_content && !node.children.is_empty() {
            extra.push("overflow-hidden".to_string());
        }
        Ok(self.container(node, parent, &children, &extra.join(" ")))
    }

    async fn section(
        &self,
        node: &CanonicalNode,
        parent: Option<&CanonicalNode>,
    ) -> Result<String, EmitError> {
        let children = self.children(node).await?;
        let attrs = StyleBuilder::new(node, parent, self.session.settings())
            .size()
            .position()
            .custom_color(&node.fills, "bg")
            .build("");
        if children.is_empty() {
            Ok(format!("\n<div{attrs}></div>"))
        } else {
            Ok(format!("\n<div{attrs}>{}\n</div>", indent(&children)))
        }
    }

    /// Kinds that never emit their children.
    fn leaf(&self, node: &CanonicalNode, parent: Option<&CanonicalNode>) -> String {
        // Vector kinds are placed by their render box, not their bounding box.
        let corrected = corrected_bounds(node);
        let node = corrected.as_ref().unwrap_or(node);
        match &node.kind {
            NodeKind::Rectangle | NodeKind::Ellipse => self.container(node, parent, "", ""),
            NodeKind::Vector(kind) => {
                if *kind == VectorKind::Vector {
                    self.session.warn(VECTOR_UNSUPPORTED);
                }
                self.container(node, parent, "", "")
            }
            NodeKind::Text(_) => self.text(node, parent),
            NodeKind::Line => {
                let attrs = StyleBuilder::new(node, parent, self.session.settings())
                    .common_position_styles()
                    .common_shape_styles()
                    .build("");
                format!("\n<div{attrs}></div>")
            }
            other => {
                self.session
                    .warn(format!("{} node is not supported", other.type_name()));
                String::new()
            }
        }
    }

    fn text(&self, node: &CanonicalNode, parent: Option<&CanonicalNode>) -> String {
        let settings = self.session.settings();
        let mut builder = TextBuilder::new(node, parent, settings)
            .common_position_styles()
            .text_align_horizontal()
            .text_align_vertical();

        let resolved = resolve_segments(node, settings);
        let segments: Vec<_> = resolved.iter().map(|r| r.segment.clone()).collect();
        self.session.record_text_styles(&segments);

        let content = match resolved.as_slice() {
            [single] => {
                builder = builder.add_tokens(&single.tokens);
                let text = escape_text(&single.segment.text);
                match feature_tag(&single.segment.open_type_features) {
                    Some(tag) => format!("<{tag}>{text}</{tag}>"),
                    None => text,
                }
            }
            runs => runs
                .iter()
                .map(|run| {
                    let tag = feature_tag(&run.segment.open_type_features).unwrap_or("span");
                    format!(
                        "<{tag} {}=\"{}\">{}</{tag}>",
                        settings.generation_mode.class_attribute(),
                        run.segment.style,
                        escape_text(&run.segment.text)
                    )
                })
                .collect::<String>(),
        };
        format!("\n<div{}>{content}</div>", builder.build(""))
    }

    /// Generic element: position and shape tokens plus `extra`, wrapping the
    /// already-emitted `children`.
    fn container(
        &self,
        node: &CanonicalNode,
        parent: Option<&CanonicalNode>,
        children: &str,
        extra: &str,
    ) -> String {
        let geometry = node.geometry;
        if geometry.width < 0.0 || geometry.height < 0.0 {
            return children.to_string();
        }
        let settings = self.session.settings();
        let mut builder = StyleBuilder::new(node, parent, settings)
            .common_position_styles()
            .common_shape_styles();
        if !builder.has_tokens() && extra.trim().is_empty() {
            return children.to_string();
        }

        let mut tag = "div";
        let mut src = String::new();
        if top_paint(&node.fills).is_some_and(Paint::is_image) {
            self.session.warn(if settings.embed_images {
                IMAGE_EMBED_UNAVAILABLE
            } else {
                IMAGE_PLACEHOLDER
            });
            let url = placeholder_image(geometry.width, geometry.height);
            if node.children.is_empty() {
                tag = "img";
                src = format!(" src=\"{url}\"");
            } else {
                builder = builder.add_attributes(&format!("bg-[url({url})]"));
            }
        }
        let attrs = builder.build(extra);

        if !children.is_empty() {
            format!("\n<{tag}{attrs}{src}>{}\n</{tag}>", indent(children))
        } else if tag == "img" || settings.generation_mode.self_closes_empty() {
            format!("\n<{tag}{attrs}{src} />")
        } else {
            format!("\n<{tag}{attrs}{src}></{tag}>")
        }
    }
}

fn check_geometry(node: &CanonicalNode) -> Result<(), EmitError> {
    let g = node.geometry;
    for (field, value) in [
        ("x", g.x),
        ("y", g.y),
        ("width", g.width),
        ("height", g.height),
        ("rotation", g.rotation),
    ] {
        if !value.is_finite() {
            return Err(EmitError::InvalidGeometry {
                node: node.id.as_str().to_string(),
                field,
            });
        }
    }
    Ok(())
}

/// For flattenable shapes whose render bounds differ from the bounding box:
/// take the render bounds' size, shift the position by the bounds' offset
/// and add the rotation implied by the width difference.
fn corrected_bounds(node: &CanonicalNode) -> Option<CanonicalNode> {
    if !matches!(node.kind, NodeKind::Vector(_)) {
        return None;
    }
    let (bounds, render) = (node.geometry.bounding_box?, node.geometry.render_bounds?);
    if bounds == render {
        return None;
    }
    let correction = -((render.width - bounds.width) / bounds.height)
        .asin()
        .to_degrees();
    if !correction.is_finite() {
        log::trace!("no rotation correction for {}", node.id.as_str());
        return None;
    }
    let mut fixed = node.clone();
    fixed.geometry.width = render.width;
    fixed.geometry.height = render.height;
    // Both boxes are in page space while x/y are parent-relative: moving by
    // their offset puts the node at the render box's origin, in parent space.
    fixed.geometry.x += render.x - bounds.x;
    fixed.geometry.y += render.y - bounds.y;
    fixed.geometry.rotation += correction;
    Some(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rect, TextProps};
    use crate::settings::{GenerationMode, Settings};
    use crate::svg::GeometrySvg;
    use pretty_assertions::assert_eq;

    async fn emit(settings: Settings, roots: &[CanonicalNode]) -> (String, Vec<String>) {
        let session = Session::new(settings);
        let emitter = Emitter::new(&session, &GeometrySvg);
        let code = emitter.emit_selection(roots).await;
        (code, session.warnings())
    }

    fn rect(id: &str, width: f64, height: f64) -> CanonicalNode {
        CanonicalNode::test_node(id, NodeKind::Rectangle, width, height)
    }

    fn group(children: Vec<CanonicalNode>) -> CanonicalNode {
        let mut node = CanonicalNode::test_node("group", NodeKind::Group, 50.0, 50.0);
        node.children = children;
        node
    }

    #[test]
    fn indent_skips_blank_lines() {
        assert_eq!(indent("\n<a />\n\n<b />"), "\n  <a />\n\n  <b />");
    }

    #[tokio::test]
    async fn html_mode_writes_explicit_close_tags() {
        let settings = Settings {
            generation_mode: GenerationMode::Html,
            ..Settings::default()
        };
        let (code, _) = emit(settings, &[rect("box", 8.0, 8.0)]).await;
        assert_eq!(code, r#"<div class="w-2 h-2 left-0 top-0 absolute"></div>"#);
    }

    #[tokio::test]
    async fn degenerate_group_emits_nothing() {
        let mut empty = group(vec![rect("a", 1.0, 1.0)]);
        empty.geometry.height = 0.0;
        let (code, _) = emit(Settings::default(), &[empty]).await;
        assert_eq!(code, "");
    }

    #[tokio::test]
    async fn group_wraps_children_positioned_against_it() {
        let mut child = rect("a", 16.0, 16.0);
        child.geometry.x = 30.0;
        child.geometry.y = 20.0;
        let mut outer = group(vec![child]);
        outer.geometry.x = 10.0;
        outer.geometry.y = 10.0;
        let (code, _) = emit(Settings::default(), &[outer]).await;
        assert_eq!(
            code,
            "<div className=\"w-[50px] h-[50px] left-[10px] top-[10px] absolute\">\n  <div className=\"w-4 h-4 left-[20px] top-[10px] absolute\" />\n</div>"
        );
    }

    #[tokio::test]
    async fn unsupported_kind_warns_and_emits_nothing() {
        let sticky = CanonicalNode::test_node(
            "note",
            NodeKind::Unsupported("STICKY".into()),
            10.0,
            10.0,
        );
        let (code, warnings) = emit(Settings::default(), &[sticky, rect("r", 4.0, 4.0)]).await;
        assert_eq!(code, r#"<div className="w-1 h-1 left-0 top-0 absolute" />"#);
        assert_eq!(warnings, vec!["STICKY node is not supported".to_string()]);
    }

    #[tokio::test]
    async fn failing_top_level_node_is_contained() {
        let mut broken = rect("broken", 10.0, 10.0);
        broken.geometry.width = f64::NAN;
        let (code, _) = emit(Settings::default(), &[broken, rect("ok", 4.0, 4.0)]).await;
        assert_eq!(code, r#"<div className="w-1 h-1 left-0 top-0 absolute" />"#);
    }

    #[tokio::test]
    async fn plain_vector_warns_without_embedding() {
        let mut vector =
            CanonicalNode::test_node("v", NodeKind::Vector(VectorKind::Vector), 4.0, 4.0);
        vector.can_be_flattened = true;
        let (_, warnings) = emit(Settings::default(), &[vector]).await;
        assert_eq!(warnings, vec![VECTOR_UNSUPPORTED.to_string()]);
    }

    #[tokio::test]
    async fn embedded_vector_is_wrapped() {
        let settings = Settings {
            embed_vectors: true,
            ..Settings::default()
        };
        let mut star = CanonicalNode::test_node("s", NodeKind::Vector(VectorKind::Star), 4.0, 4.0)
            .with_fill("#000000");
        star.can_be_flattened = true;
        star.fill_geometry = vec![crate::model::VectorPath {
            path: "M0 0L4 4Z".into(),
            even_odd: false,
        }];
        let (code, warnings) = emit(settings, &[star]).await;
        assert!(warnings.is_empty());
        assert_eq!(
            code,
            "<div data-svg-wrapper className=\"left-0 top-0 absolute\">\n<svg width=\"4\" height=\"4\" viewBox=\"0 0 4 4\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">\n  <path d=\"M0 0L4 4Z\" fill=\"#000000\" />\n</svg>\n</div>"
        );
    }

    #[test]
    fn render_bounds_correct_shape_geometry() {
        let mut star = CanonicalNode::test_node("s", NodeKind::Vector(VectorKind::Star), 10.0, 10.0);
        star.geometry.bounding_box = Some(Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        });
        star.geometry.render_bounds = Some(Rect {
            x: -1.0,
            y: 2.0,
            width: 15.0,
            height: 12.0,
        });
        let fixed = corrected_bounds(&star).unwrap();
        assert_eq!(fixed.geometry.width, 15.0);
        assert_eq!(fixed.geometry.height, 12.0);
        assert_eq!((fixed.geometry.x, fixed.geometry.y), (-1.0, 2.0));
        assert!((fixed.geometry.rotation + 30.0).abs() < 1e-9);

        star.geometry.render_bounds = Some(Rect {
            width: 40.0,
            ..star.geometry.render_bounds.unwrap()
        });
        assert_eq!(corrected_bounds(&star), None);
    }

    #[tokio::test]
    async fn single_run_text_merges_tokens_into_element() {
        let props = TextProps {
            characters: "a < b".into(),
            ..TextProps::default()
        };
        let mut text = CanonicalNode::test_node("t", NodeKind::Text(Box::new(props)), 40.0, 16.0);
        if let NodeKind::Text(props) = &mut text.kind {
            props.auto_resize = crate::model::TextAutoResize::WidthAndHeight;
        }
        let (code, _) = emit(Settings::default(), &[text]).await;
        assert_eq!(
            code,
            r#"<div className="left-0 top-0 absolute text-black">a &lt; b</div>"#
        );
    }
}
