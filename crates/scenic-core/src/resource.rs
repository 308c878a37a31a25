//! Paged remote resources (files and scenes)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used when a request does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Remote resource types exposed through the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Files,
    Scenes,
}

impl ResourceKind {
    /// Collection path segment (`files`, `scenes`)
    pub fn path(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Scenes => "scenes",
        }
    }

    /// JSON:API resource type (`file`, `scene`)
    pub fn resource_type(&self) -> &'static str {
        match self {
            Self::Files => "file",
            Self::Scenes => "scene",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Parameters for listing one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: u32,
    /// Opaque continuation cursor from a previous page
    pub cursor: Option<String>,
    /// Supplied-id filter (files only)
    pub supplied_id: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cursor: None,
            supplied_id: None,
        }
    }
}

/// One page of remote records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub data: Vec<T>,
}

/// A remote record, passed through to callers as-is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    /// Relationships, links and anything else the API returns
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of deleting a single id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DeleteOutcome {
    Deleted,
    Failed { message: String, status: u16 },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}
