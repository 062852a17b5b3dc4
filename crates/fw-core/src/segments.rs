//! Per-run text segments.
//!
//! Every text node resolves to one or more segments: the run's characters
//! plus its rendered style string. Segments are emitted as `<span>` (or
//! `<sub>`/`<sup>`) children and also collected into the session's
//! text-styles log.

use crate::builder::Tokens;
use crate::model::CanonicalNode;
use crate::settings::Settings;
use crate::text_builder::{RunStyle, run_tokens};
use serde::Serialize;
use std::collections::BTreeMap;

/// A resolved run of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    /// Rendered tokens, custom prefix included.
    pub style: String,
    pub text: String,
    pub open_type_features: BTreeMap<String, bool>,
    pub unique_id: String,
}

/// A segment with its unprefixed tokens, for merging into an element.
#[derive(Debug, Clone)]
pub struct ResolvedSegment {
    pub tokens: Tokens,
    pub segment: TextSegment,
}

/// Resolve the runs of a text node. A node without styled runs yields a
/// single segment carrying the node-wide style.
pub fn resolve_segments(node: &CanonicalNode, settings: &Settings) -> Vec<ResolvedSegment> {
    let Some(text) = node.text() else {
        return Vec::new();
    };
    let resolve = |run: RunStyle<'_>, characters: &str, features, unique_id: String| {
        let tokens = run_tokens(&run, settings);
        ResolvedSegment {
            segment: TextSegment {
                style: tokens.render(&settings.custom_prefix),
                text: characters.to_string(),
                open_type_features: features,
                unique_id,
            },
            tokens,
        }
    };

    if text.segments.is_empty() {
        let base: String = node
            .unique_name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
            .collect();
        let unique_id = format!("{}_span", base.to_lowercase());
        return vec![resolve(
            RunStyle::aggregate(text, &node.fills),
            &text.characters,
            BTreeMap::new(),
            unique_id,
        )];
    }
    text.segments
        .iter()
        .map(|segment| {
            resolve(
                RunStyle::of_segment(segment, text, &node.fills),
                &segment.characters,
                segment.open_type_features.clone(),
                segment.unique_id.clone(),
            )
        })
        .collect()
}

/// `sub` or `sup` when the run enables the matching OpenType feature.
pub fn feature_tag(features: &BTreeMap<String, bool>) -> Option<&'static str> {
    if features.get("SUBS").copied().unwrap_or(false) {
        Some("sub")
    } else if features.get("SUPS").copied().unwrap_or(false) {
        Some("sup")
    } else {
        None
    }
}

/// Human-readable listing of text styles: each segment's text as a `//`
/// comment followed by its tokens one per line, blocks separated by `---`.
pub fn text_styles_report(segments: &[TextSegment]) -> String {
    if segments.is_empty() {
        return "// No text styles in this selection".to_string();
    }
    segments
        .iter()
        .map(|segment| {
            let mut block = format!("// {}", segment.text.replace('\n', " "));
            for token in segment.style.split_whitespace() {
                block.push('\n');
                block.push_str(token);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}
