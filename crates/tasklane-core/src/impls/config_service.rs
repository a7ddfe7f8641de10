//! ConfigurationServiceFetcher - reads resources from the configuration service.
//!
//! # エンドポイント
//! - service: `GET {base}/v1/project/{p}/stage/{s}/service/{svc}/resource/{path}`
//! - stage:   `GET {base}/v1/project/{p}/stage/{s}/resource/{path}`
//! - project: `GET {base}/v1/project/{p}/resource/{path}`
//!
//! The response wraps the file content base64-encoded in `resourceContent`.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use urlencoding::encode;

use crate::domain::FetchError;
use crate::ports::{ResourceFetcher, ResourceScope};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceBody {
    resource_content: String,
}

#[derive(Debug, Clone)]
pub struct ConfigurationServiceFetcher {
    client: Client,
    base_url: String,
}

impl ConfigurationServiceFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Picks the most specific level the scope allows.
    pub fn resource_url(&self, scope: &ResourceScope, path: &str) -> String {
        let mut url = format!("{}/v1/project/{}", self.base_url, encode(&scope.project));
        if !scope.stage.is_empty() {
            url.push_str(&format!("/stage/{}", encode(&scope.stage)));
            if !scope.service.is_empty() {
                url.push_str(&format!("/service/{}", encode(&scope.service)));
            }
        }
        url.push_str(&format!("/resource/{}", encode(path)));
        url
    }
}

fn decode_resource(path: &str, body: &[u8]) -> Result<Vec<u8>, FetchError> {
    let resource: ResourceBody = serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    STANDARD
        .decode(resource.resource_content.as_bytes())
        .map_err(|e| FetchError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })
}

#[async_trait]
impl ResourceFetcher for ConfigurationServiceFetcher {
    async fn fetch(&self, scope: &ResourceScope, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.resource_url(scope, path);
        tracing::debug!(%url, "fetching resource");

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(FetchError::NotFound(path.to_string())),
            status if !status.is_success() => Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            }),
            _ => {
                let body = response.bytes().await?;
                decode_resource(path, &body)
            }
        }
    }
}
