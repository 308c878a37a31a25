//! Scene item identity

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Identifier for one renderable item in a scene.
///
/// The canonical hex id is always present; the supplied id is whatever the
/// caller attached when the scene was built. Equality and hashing only look
/// at the hex id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItemId {
    /// Canonical hex identifier
    pub hex: String,
    /// Caller-supplied identifier (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplied_id: Option<String>,
}

impl SceneItemId {
    /// Create an id with only the canonical hex form
    pub fn new(hex: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            supplied_id: None,
        }
    }

    /// Attach a caller-supplied id
    pub fn with_supplied_id(mut self, supplied_id: impl Into<String>) -> Self {
        self.supplied_id = Some(supplied_id.into());
        self
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    /// Supplied id when present, hex id otherwise
    pub fn display_id(&self) -> &str {
        self.supplied_id.as_deref().unwrap_or(&self.hex)
    }
}

impl PartialEq for SceneItemId {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex
    }
}

impl Eq for SceneItemId {}

impl Hash for SceneItemId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hex.hash(state);
    }
}

impl std::fmt::Display for SceneItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_supplied_id() {
        let a = SceneItemId::new("0af3").with_supplied_id("bracket-01");
        let b = SceneItemId::new("0af3");
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_display_prefers_supplied_id() {
        let id = SceneItemId::new("0af3");
        assert_eq!(id.display_id(), "0af3");

        let id = id.with_supplied_id("bracket-01");
        assert_eq!(id.to_string(), "bracket-01");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let id: SceneItemId =
            serde_json::from_str(r#"{"hex":"0af3","suppliedId":"bracket-01"}"#).unwrap();
        assert_eq!(id.hex(), "0af3");
        assert_eq!(id.supplied_id.as_deref(), Some("bracket-01"));
    }
}
