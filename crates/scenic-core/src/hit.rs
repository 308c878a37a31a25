//! Hit-test results reported by the streaming service

use serde::{Deserialize, Serialize};

use crate::item::SceneItemId;

/// A point or direction in scene space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned bounds of a scene item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundingBox {
    /// Center point of the box
    pub fn center(&self) -> Vector3 {
        Vector3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Edge lengths along each axis
    pub fn size(&self) -> Vector3 {
        Vector3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

/// Extra metadata attached to a hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitMetadata {
    /// Human-readable part name
    #[serde(default)]
    pub part_name: Option<String>,
}

/// Result of testing one screen point against the rendered frame.
///
/// Every field is optional: a hit over empty space is a normal result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    /// Item under the cursor, if any
    #[serde(default)]
    pub item_id: Option<SceneItemId>,
    #[serde(default)]
    pub metadata: Option<HitMetadata>,
    /// World-space point where the ray met the geometry
    #[serde(default)]
    pub hit_point: Option<Vector3>,
    /// Surface normal at the hit point
    #[serde(default)]
    pub hit_normal: Option<Vector3>,
    /// Bounds of the hit item
    #[serde(default)]
    pub bounding_box: Option<BoundingBox>,
}

impl Hit {
    /// A hit that found no geometry
    pub fn empty() -> Self {
        Self::default()
    }

    /// A hit on the given item
    pub fn on_item(item_id: SceneItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Self::default()
        }
    }

    pub fn with_part_name(mut self, part_name: impl Into<String>) -> Self {
        self.metadata = Some(HitMetadata {
            part_name: Some(part_name.into()),
        });
        self
    }

    pub fn with_hit_point(mut self, point: Vector3) -> Self {
        self.hit_point = Some(point);
        self
    }

    pub fn with_bounding_box(mut self, bounds: BoundingBox) -> Self {
        self.bounding_box = Some(bounds);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.item_id.is_none()
    }

    pub fn part_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.part_name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_stream_hit() {
        let json = r#"{
            "itemId": {"hex": "7c1e", "suppliedId": "wheel-fl"},
            "metadata": {"partName": "Front Left Wheel"},
            "hitPoint": {"x": 1.0, "y": 2.0, "z": 3.0},
            "boundingBox": {
                "min": {"x": 0.0, "y": 0.0, "z": 0.0},
                "max": {"x": 2.0, "y": 4.0, "z": 6.0}
            }
        }"#;
        let hit: Hit = serde_json::from_str(json).unwrap();
        assert!(!hit.is_empty());
        assert_eq!(hit.part_name(), Some("Front Left Wheel"));
        assert_eq!(hit.hit_point, Some(Vector3::new(1.0, 2.0, 3.0)));

        let bounds = hit.bounding_box.unwrap();
        assert_eq!(bounds.center(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(bounds.size(), Vector3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_empty_object_is_empty_hit() {
        let hit: Hit = serde_json::from_str("{}").unwrap();
        assert!(hit.is_empty());
        assert_eq!(hit.part_name(), None);
    }
}
