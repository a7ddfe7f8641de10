//! ResourceFetcher port - reads configuration files for a task
//!
//! # 実装
//! - `LocalResourceFetcher`: local filesystem（`ENV=local`）
//! - `ConfigurationServiceFetcher`: remote configuration service

use async_trait::async_trait;

use crate::domain::FetchError;

/// Which project/stage/service a resource belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceScope {
    pub project: String,
    pub stage: String,
    pub service: String,
}

#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Returns the raw content of `path`, or `FetchError::NotFound`.
    async fn fetch(&self, scope: &ResourceScope, path: &str) -> Result<Vec<u8>, FetchError>;
}
