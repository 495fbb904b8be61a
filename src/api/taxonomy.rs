// SPDX-License-Identifier: MPL-2.0

use super::composite::CompositeId;
use super::model::{LeafDetail, Level, NodeId, NodeRef, TaxonomyNode};
use super::source::{FetchError, TaxonomySource, is_searchable};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Default client-side timeout for search requests.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// The taxonomy deployments the application knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// field → research area → niche
    #[default]
    ResearchAreas,
    /// skill domain → subdomain → skill
    Skills,
}

/// Paths and query parameter names of one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub top: &'static str,
    pub mid: &'static str,
    pub mid_param: &'static str,
    pub leaf: &'static str,
    pub leaf_param: &'static str,
    pub search: &'static str,
    pub details: &'static str,
}

/// Human readable names of the three levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelLabels {
    pub top: &'static str,
    pub mid: &'static str,
    pub leaf: &'static str,
}

impl LevelLabels {
    pub fn of(&self, level: Level) -> &'static str {
        match level {
            Level::Top => self.top,
            Level::Mid => self.mid,
            Level::Leaf => self.leaf,
        }
    }
}

impl Deployment {
    pub const ALL: [Deployment; 2] = [Deployment::ResearchAreas, Deployment::Skills];

    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::ResearchAreas => "research-areas",
            Deployment::Skills => "skills",
        }
    }

    pub fn endpoints(&self) -> Endpoints {
        match self {
            Deployment::ResearchAreas => Endpoints {
                top: "/fields",
                mid: "/areas",
                mid_param: "fieldId",
                leaf: "/niches",
                leaf_param: "areaId",
                search: "/niches/search",
                details: "/niches/details",
            },
            Deployment::Skills => Endpoints {
                top: "/skill-domains",
                mid: "/skill-subdomains",
                mid_param: "domainId",
                leaf: "/skills",
                leaf_param: "subdomainId",
                search: "/skills/search",
                details: "/skills/details",
            },
        }
    }

    pub fn labels(&self) -> LevelLabels {
        match self {
            Deployment::ResearchAreas => LevelLabels {
                top: "Field",
                mid: "Research area",
                leaf: "Niche",
            },
            Deployment::Skills => LevelLabels {
                top: "Domain",
                mid: "Subdomain",
                leaf: "Skill",
            },
        }
    }
}

/// `{ "data": [...] }` envelope returned by every endpoint.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

/// Leaf as returned by the search and details endpoints.
#[derive(Debug, Deserialize)]
struct WireLeaf {
    id: NodeId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    mid: Option<WireMid>,
}

#[derive(Debug, Deserialize)]
struct WireMid {
    id: NodeId,
    name: String,
    #[serde(default)]
    top: Option<NodeRef>,
}

impl TryFrom<WireLeaf> for LeafDetail {
    type Error = String;

    fn try_from(wire: WireLeaf) -> Result<Self, Self::Error> {
        let mid = wire
            .mid
            .ok_or_else(|| format!("leaf {} has no mid reference", wire.id))?;
        let top = mid
            .top
            .ok_or_else(|| format!("mid {} of leaf {} has no top reference", mid.id, wire.id))?;

        if wire.name.trim().is_empty() || mid.name.trim().is_empty() || top.name.trim().is_empty()
        {
            return Err(format!("leaf {} has a blank name in its path", wire.id));
        }

        let leaf = TaxonomyNode {
            id: wire.id,
            name: wire.name,
            description: wire.description.filter(|d| !d.trim().is_empty()),
        };

        Ok(LeafDetail::new(
            top,
            NodeRef {
                id: mid.id,
                name: mid.name,
            },
            &leaf,
        ))
    }
}

/// Keeps the well-formed nodes of a response, logging the rest.
fn decode_nodes(values: Vec<serde_json::Value>) -> Vec<TaxonomyNode> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<TaxonomyNode>(value) {
            Ok(node) if !node.name.trim().is_empty() => Some(node),
            Ok(node) => {
                tracing::warn!("dropping node {} with a blank name", node.id);
                None
            }
            Err(e) => {
                tracing::warn!("dropping malformed node: {}", e);
                None
            }
        })
        .collect()
}

/// Keeps the leaves whose ancestor references are complete, logging the rest.
fn decode_leaves(values: Vec<serde_json::Value>) -> Vec<LeafDetail> {
    values
        .into_iter()
        .filter_map(|value| {
            let wire = match serde_json::from_value::<WireLeaf>(value) {
                Ok(wire) => wire,
                Err(e) => {
                    tracing::warn!("dropping malformed leaf: {}", e);
                    return None;
                }
            };
            match LeafDetail::try_from(wire) {
                Ok(detail) => Some(detail),
                Err(reason) => {
                    tracing::warn!("dropping leaf: {}", reason);
                    None
                }
            }
        })
        .collect()
}

fn send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::TimedOut
    } else {
        FetchError::ConnectionFailed(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct TaxonomyClient {
    client: reqwest::Client,
    base_url: String,
    deployment: Deployment,
    search_timeout: Duration,
}

impl TaxonomyClient {
    /// Create a client for one deployment.
    /// An empty `auth_token` sends no Authorization header.
    pub fn new(
        base_url: &str,
        auth_token: &str,
        deployment: Deployment,
        search_timeout: Duration,
    ) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();

        if !auth_token.is_empty() {
            let auth_value = HeaderValue::from_str(&format!("Bearer {}", auth_token))
                .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;
            headers.insert(AUTHORIZATION, auth_value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))?;

        // Normalize base URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            deployment,
            search_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and unwraps the `data` envelope.
    async fn fetch_data(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<serde_json::Value>, FetchError> {
        let response = request.send().await.map_err(send_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::RequestFailed(format!(
                "Server returned status: {} - {}",
                status, body
            )));
        }

        let envelope: Envelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::TimedOut
            } else {
                FetchError::InvalidResponse(e.to_string())
            }
        })?;

        Ok(envelope.data)
    }

    async fn list_children(
        &self,
        path: &str,
        param: &str,
        parent: NodeId,
    ) -> Result<Vec<TaxonomyNode>, FetchError> {
        let request = self
            .client
            .get(self.url(path))
            .query(&[(param, parent.to_string())]);
        self.fetch_data(request).await.map(decode_nodes)
    }
}

#[async_trait]
impl TaxonomySource for TaxonomyClient {
    async fn list_top(&self) -> Result<Vec<TaxonomyNode>, FetchError> {
        let request = self.client.get(self.url(self.deployment.endpoints().top));
        self.fetch_data(request).await.map(decode_nodes)
    }

    async fn list_mid(&self, top: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        let endpoints = self.deployment.endpoints();
        self.list_children(endpoints.mid, endpoints.mid_param, top)
            .await
    }

    async fn list_leaf(&self, mid: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        let endpoints = self.deployment.endpoints();
        self.list_children(endpoints.leaf, endpoints.leaf_param, mid)
            .await
    }

    async fn search_leaf(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<LeafDetail>, FetchError> {
        if !is_searchable(query) {
            return Ok(Vec::new());
        }

        let request = self
            .client
            .get(self.url(self.deployment.endpoints().search))
            .query(&[
                ("q", query.trim().to_string()),
                ("limit", limit.to_string()),
                ("withAncestors", "true".to_string()),
            ])
            .timeout(self.search_timeout);

        let mut leaves = self.fetch_data(request).await.map(decode_leaves)?;
        leaves.truncate(limit);
        Ok(leaves)
    }

    async fn leaf_details(&self, ids: &[CompositeId]) -> Result<Vec<LeafDetail>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut leaf_ids: Vec<NodeId> = ids.iter().map(|id| id.leaf).collect();
        leaf_ids.sort_unstable();
        leaf_ids.dedup();

        let request = self
            .client
            .post(self.url(self.deployment.endpoints().details))
            .json(&serde_json::json!({ "ids": leaf_ids }));

        let wanted: HashSet<&CompositeId> = ids.iter().collect();
        let details = self.fetch_data(request).await.map(decode_leaves)?;

        Ok(details
            .into_iter()
            .filter(|detail| {
                let keep = wanted.contains(&detail.id);
                if !keep {
                    tracing::debug!("details response has unrequested path {}", detail.id);
                }
                keep
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    fn client(base_url: &str) -> TaxonomyClient {
        TaxonomyClient::new(base_url, "", Deployment::ResearchAreas, DEFAULT_SEARCH_TIMEOUT)
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_levels() {
        let app = Router::new()
            .route(
                "/fields",
                get(|| async {
                    Json(json!({ "data": [
                        { "id": 1, "name": "Computer Science", "description": "CS" },
                        { "id": 2, "name": "Biology" }
                    ]}))
                }),
            )
            .route(
                "/areas",
                get(|Query(q): Query<HashMap<String, String>>| async move {
                    let field = q.get("fieldId").cloned().unwrap_or_default();
                    Json(json!({ "data": [{ "id": 20, "name": format!("Area of {}", field) }] }))
                }),
            );
        let client = client(&serve(app).await);

        let top = client.list_top().await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].description.as_deref(), Some("CS"));
        assert_eq!(top[1].description, None);

        let mid = client.list_mid(1).await.unwrap();
        assert_eq!(mid, vec![TaxonomyNode::new(20, "Area of 1")]);
    }

    #[tokio::test]
    async fn test_malformed_entries_are_dropped() {
        let app = Router::new().route(
            "/niches/search",
            get(|| async {
                Json(json!({ "data": [
                    { "id": 10, "name": "Deep Learning",
                      "mid": { "id": 2, "name": "Machine Learning",
                               "top": { "id": 1, "name": "Computer Science" } } },
                    { "id": 11, "name": "Orphan", "mid": { "id": 2, "name": "Machine Learning" } },
                    { "id": 12, "name": "No ancestors" },
                    { "name": "No id" }
                ]}))
            }),
        );
        let client = client(&serve(app).await);

        let results = client.search_leaf("learning", 20).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, CompositeId::new(1, 2, 10));
        assert_eq!(results[0].top.name, "Computer Science");
    }

    #[tokio::test]
    async fn test_short_search_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/niches/search",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "data": [] }))
                }
            }),
        );
        let client = client(&serve(app).await);

        assert!(client.search_leaf(" a ", 20).await.unwrap().is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_details_is_one_batch_request() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/niches/details",
            post(move |Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let data: Vec<Value> = body["ids"]
                        .as_array()
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|id| {
                            json!({ "id": id, "name": format!("Leaf {}", id),
                                    "mid": { "id": 2, "name": "Mid", "top": { "id": 1, "name": "Top" } } })
                        })
                        .collect();
                    Json(json!({ "data": data }))
                }
            }),
        );
        let client = client(&serve(app).await);

        let ids = vec![
            CompositeId::new(1, 2, 10),
            CompositeId::new(1, 2, 11),
            CompositeId::new(9, 9, 12),
        ];
        let details = client.leaf_details(&ids).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // The third path does not match what the service reports for leaf 12.
        assert_eq!(
            details.iter().map(|d| d.id).collect::<Vec<_>>(),
            vec![CompositeId::new(1, 2, 10), CompositeId::new(1, 2, 11)]
        );
    }

    #[tokio::test]
    async fn test_error_status() {
        let app = Router::new().route(
            "/fields",
            get(|| async { (axum::http::StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let client = client(&serve(app).await);

        assert!(matches!(
            client.list_top().await,
            Err(FetchError::RequestFailed(_))
        ));
    }

    #[test]
    fn test_deployments_differ_only_in_shape() {
        let research = Deployment::ResearchAreas.endpoints();
        let skills = Deployment::Skills.endpoints();
        assert_ne!(research.top, skills.top);
        assert_eq!(Deployment::Skills.labels().leaf, "Skill");
    }
}
