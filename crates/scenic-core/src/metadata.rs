//! Projection of hits into side-panel metadata

use serde::{Deserialize, Serialize};

use crate::hit::{BoundingBox, Hit, Vector3};
use crate::item::SceneItemId;

/// Display-ready metadata for the item under the last hit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMetadata {
    /// Part name, when the stream reported one
    pub name: Option<String>,
    /// Canonical hex id of the item
    pub item_id: Option<String>,
    /// Caller-supplied id of the item
    pub supplied_id: Option<String>,
    pub hit_point: Option<Vector3>,
    pub bounding_box: Option<BoundingBox>,
}

impl DisplayMetadata {
    /// Metadata for a node picked by identity rather than by a hit
    pub fn for_node(id: &SceneItemId, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            item_id: Some(id.hex.clone()),
            supplied_id: id.supplied_id.clone(),
            hit_point: None,
            bounding_box: None,
        }
    }

    /// True when nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.item_id.is_none()
            && self.supplied_id.is_none()
            && self.hit_point.is_none()
            && self.bounding_box.is_none()
    }

    /// Supplied id when present, hex id otherwise
    pub fn display_id(&self) -> Option<&str> {
        self.supplied_id.as_deref().or(self.item_id.as_deref())
    }
}

/// Project a hit into display metadata.
///
/// Total over its input. A missing hit or a hit without an item resolves
/// nothing and yields an empty record, even if the stream reported a part
/// name or hit point. An item without a supplied id or part name leaves just
/// those fields empty.
pub fn to_metadata(hit: Option<&Hit>) -> DisplayMetadata {
    let Some((hit, id)) = hit.and_then(|h| h.item_id.as_ref().map(|id| (h, id))) else {
        return DisplayMetadata::default();
    };

    DisplayMetadata {
        name: hit.part_name().map(str::to_string),
        item_id: Some(id.hex.clone()),
        supplied_id: id.supplied_id.clone(),
        hit_point: hit.hit_point,
        bounding_box: hit.bounding_box,
    }
}
