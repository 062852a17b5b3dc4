//! Design node tree → Tailwind markup.
//!
//! A conversion call runs two stages over one selection: the normalizer
//! turns (raw export, host node) pairs into a canonical tree, and the
//! emitter walks that tree into markup. All per-call state lives in a
//! [`Session`] created by [`convert`].

pub mod autolayout;
pub mod builder;
pub mod color;
pub mod context;
pub mod emitter;
pub mod error;
pub mod host;
pub mod id;
pub mod model;
pub mod normalize;
pub mod raw;
pub mod segments;
pub mod settings;
pub mod svg;
pub mod tables;
pub mod text_builder;
pub mod variables;

pub use context::Session;
pub use emitter::Emitter;
pub use error::{ConvertError, EmitError, VariableError};
pub use host::{HostBounds, HostNode, SnapshotNode};
pub use id::NodeId;
pub use model::*;
pub use normalize::Normalizer;
pub use raw::RawNode;
pub use segments::{TextSegment, text_styles_report};
pub use settings::{GenerationMode, Settings};
pub use svg::{GeometrySvg, VectorRenderer};
pub use variables::{ColorVariableResolver, NoVariables, StaticVariables, VariableCache};

use std::rc::Rc;
use std::time::Instant;

/// Everything one conversion call produces.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Generated markup, never starting with a newline.
    pub code: String,
    /// Ordered, de-duplicated warnings.
    pub warnings: Vec<String>,
    /// Text segments resolved during emission, in emission order.
    pub text_styles: Vec<TextSegment>,
    /// The canonical tree the markup was generated from.
    pub tree: Vec<CanonicalNode>,
}

impl Conversion {
    /// The text-styles log rendered as a report.
    pub fn text_styles_report(&self) -> String {
        text_styles_report(&self.text_styles)
    }
}

/// Convert a selection of host nodes, embedding vectors from their exported
/// geometry when enabled.
///
/// # Errors
/// A failed structured export or a failed color-variable lookup. Emission
/// problems never fail the call.
pub async fn convert<H, R>(
    nodes: &[H],
    settings: Settings,
    variables: Rc<R>,
) -> Result<Conversion, ConvertError>
where
    H: HostNode,
    R: ColorVariableResolver + 'static,
{
    convert_with(nodes, settings, variables, &GeometrySvg).await
}

/// [`convert`] with a custom vector renderer.
///
/// # Errors
/// See [`convert`].
pub async fn convert_with<H, R, V>(
    nodes: &[H],
    settings: Settings,
    variables: Rc<R>,
    vectors: &V,
) -> Result<Conversion, ConvertError>
where
    H: HostNode,
    R: ColorVariableResolver + 'static,
    V: VectorRenderer,
{
    let started = Instant::now();
    let session = Session::new(settings);
    let cache = VariableCache::new(variables);

    let tree = Normalizer::new(&session, &cache)
        .normalize_selection(nodes)
        .await?;
    let code = Emitter::new(&session, vectors).emit_selection(&tree).await;

    log::info!(
        "converted {} top-level node(s) in {:?} ({} variable lookup(s))",
        tree.len(),
        started.elapsed(),
        cache.distinct_lookups()
    );
    Ok(Conversion {
        code,
        warnings: session.warnings(),
        text_styles: session.text_styles(),
        tree,
    })
}
