//! Remote resource API seen by the proxy handlers

use async_trait::async_trait;
use scenic_core::{Page, PageRequest, RemoteError, ResourceData, ResourceKind};
use serde_json::{Map, Value};

/// List/create/delete over remote files and scenes
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Fetch one page of `kind`
    async fn list(
        &self,
        kind: ResourceKind,
        request: &PageRequest,
    ) -> Result<Page<ResourceData>, RemoteError>;

    /// Delete a single resource by id
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError>;

    /// Create a file resource with the given attributes, returning it
    async fn create_file(&self, attributes: Map<String, Value>)
        -> Result<ResourceData, RemoteError>;
}
