//! Remote fetch path: pull node documents from the design tool's REST API by
//! id and convert each top-level node into markup.
//!
//! Every document is mirrored into a host view with
//! [`SnapshotNode::mirror`] and converted in its own call, so one failing
//! node leaves an empty fragment instead of failing the whole selection.

use fw_core::{NoVariables, NodeId, RawNode, Settings, SnapshotNode, convert};
use serde::Deserialize;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";

const TOKEN_HEADER: &str = "X-Figma-Token";

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("missing required parameters: an api key, a file id and node ids are all required")]
    MissingParameters,

    #[error("remote API responded with HTTP {status}")]
    Status { status: reqwest::StatusCode },

    #[error("no nodes found in the API response")]
    NoNodes,

    #[error("no document found for node `{0}`")]
    MissingNode(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid API response: {0}")]
    Json(#[from] serde_json::Error),
}

// ─── Response shape ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct NodesResponse {
    nodes: Option<HashMap<String, Option<NodeEntry>>>,
}

#[derive(Debug, Deserialize)]
struct NodeEntry {
    document: Option<RawNode>,
}

/// Split a comma-separated id list. URL-style ids (`1-2`) become `1:2`.
pub fn split_ids(node_ids: &str) -> Vec<String> {
    node_ids
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| NodeId::from_url_form(id).as_str().to_string())
        .collect()
}

/// Pick the requested documents out of a `/nodes` response body, in request
/// order.
///
/// # Errors
/// `NoNodes` without a `nodes` map, `MissingNode` for an id with no document.
pub fn parse_nodes_response(body: &str, ids: &[String]) -> Result<Vec<RawNode>, RemoteError> {
    let response: NodesResponse = serde_json::from_str(body)?;
    let mut nodes = response.nodes.ok_or(RemoteError::NoNodes)?;
    ids.iter()
        .map(|id| {
            nodes
                .remove(id)
                .flatten()
                .and_then(|entry| entry.document)
                .ok_or_else(|| RemoteError::MissingNode(id.clone()))
        })
        .collect()
}

// ─── Client ──────────────────────────────────────────────────────────────

/// Thin wrapper over the `/v1/files/{file}/nodes` endpoint.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl RemoteClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch the documents for `ids` (already normalized) with vector paths.
    ///
    /// # Errors
    /// Transport failures, a non-success status, or a response missing the
    /// requested nodes.
    pub async fn fetch_nodes(
        &self,
        file_id: &str,
        ids: &[String],
    ) -> Result<Vec<RawNode>, RemoteError> {
        let url = format!("{}/v1/files/{file_id}/nodes", self.base_url);
        log::debug!("GET {url} ({} id(s))", ids.len());

        let response = self
            .http
            .get(&url)
            .query(&[("ids", ids.join(",").as_str()), ("geometry", "paths")])
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{url} responded with {status}");
            return Err(RemoteError::Status { status });
        }
        let body = response.text().await?;
        parse_nodes_response(&body, ids)
    }
}

// ─── Conversion ──────────────────────────────────────────────────────────

/// Convert each document on its own. A failed conversion is logged and
/// contributes an empty fragment.
///
/// The REST export has no variable source, so bound colors are always
/// emitted as their raw values.
pub async fn convert_documents(documents: &[RawNode], settings: &Settings) -> String {
    let settings = Settings {
        use_color_variables: false,
        ..settings.clone()
    };
    let mut code = String::new();
    for document in documents {
        let host = SnapshotNode::mirror(document);
        match convert(&[host], settings.clone(), Rc::new(NoVariables)).await {
            Ok(conversion) => {
                for warning in &conversion.warnings {
                    log::warn!("{}: {warning}", document.name);
                }
                code.push_str(&conversion.code);
            }
            Err(err) => log::warn!("conversion of \"{}\" failed: {err}", document.name),
        }
        code.push('\n');
    }
    code.trim().to_string()
}

/// Fetch `node_ids` (comma-separated) from `file_id` and convert them.
///
/// # Errors
/// See [`RemoteError`]. Per-node conversion failures are not errors.
pub async fn generate_from_remote(
    api_key: &str,
    file_id: &str,
    node_ids: &str,
    settings: Settings,
) -> Result<String, RemoteError> {
    RemoteClient::new(api_key)
        .generate(file_id, node_ids, settings)
        .await
}

impl RemoteClient {
    /// [`generate_from_remote`] against this client's base URL.
    ///
    /// # Errors
    /// See [`RemoteError`].
    pub async fn generate(
        &self,
        file_id: &str,
        node_ids: &str,
        settings: Settings,
    ) -> Result<String, RemoteError> {
        let ids = split_ids(node_ids);
        if self.token.trim().is_empty() || file_id.trim().is_empty() || ids.is_empty() {
            return Err(RemoteError::MissingParameters);
        }
        let documents = self.fetch_nodes(file_id.trim(), &ids).await?;
        log::info!("fetched {} document(s) from {file_id}", documents.len());
        Ok(convert_documents(&documents, &settings).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn ids_are_trimmed_and_normalized() {
        assert_eq!(split_ids(" 1-2, 3:4 ,,I5:6;7:8"), ids(&["1:2", "3:4", "I5:6;7:8"]));
        assert!(split_ids(" , ").is_empty());
    }

    #[test]
    fn documents_come_back_in_request_order() {
        let body = r#"{ "nodes": {
            "1:1": { "document": { "id": "1:1", "name": "A", "type": "FRAME" } },
            "2:2": { "document": { "id": "2:2", "name": "B", "type": "TEXT" } }
        } }"#;
        let docs = parse_nodes_response(body, &ids(&["2:2", "1:1"])).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }

    #[test]
    fn response_without_nodes_is_an_error() {
        let err = parse_nodes_response(r#"{ "err": "not found" }"#, &ids(&["1:1"])).unwrap_err();
        assert!(matches!(err, RemoteError::NoNodes));
    }

    #[test]
    fn null_or_documentless_entry_is_missing() {
        let body = r#"{ "nodes": { "1:1": null, "2:2": {} } }"#;
        for id in ["1:1", "2:2", "3:3"] {
            let err = parse_nodes_response(body, &ids(&[id])).unwrap_err();
            assert!(matches!(err, RemoteError::MissingNode(missing) if missing == id));
        }
    }

    #[tokio::test]
    async fn blank_parameters_fail_before_any_request() {
        let client = RemoteClient::new("token").with_base_url("http://127.0.0.1:9");
        for (file, nodes) in [("", "1:1"), ("abc", " , "), ("  ", "1:1")] {
            let err = client.generate(file, nodes, Settings::default()).await.unwrap_err();
            assert!(matches!(err, RemoteError::MissingParameters));
        }
        let err = generate_from_remote(" ", "abc", "1:1", Settings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::MissingParameters));
    }

    #[tokio::test]
    async fn bound_colors_fall_back_to_raw_values() {
        let bound: RawNode = serde_json::from_str(
            r#"{ "id": "1:1", "name": "Bound", "type": "RECTANGLE",
                 "absoluteBoundingBox": { "x": 0, "y": 0, "width": 16, "height": 16 },
                 "fills": [{ "type": "SOLID", "color": { "r": 0, "g": 0, "b": 0 },
                             "boundVariables": { "color": { "id": "VariableID:1:1" } } }] }"#,
        )
        .unwrap();
        let plain: RawNode = serde_json::from_str(
            r#"{ "id": "2:1", "name": "Plain", "type": "RECTANGLE",
                 "absoluteBoundingBox": { "x": 0, "y": 0, "width": 16, "height": 16 } }"#,
        )
        .unwrap();
        let settings = Settings {
            use_color_variables: true,
            ..Settings::default()
        };

        let code = convert_documents(&[bound, plain], &settings).await;
        assert_eq!(
            code,
            concat!(
                r#"<div className="w-4 h-4 left-0 top-0 absolute bg-black" />"#,
                "\n",
                r#"<div className="w-4 h-4 left-0 top-0 absolute" />"#
            )
        );
    }
}
