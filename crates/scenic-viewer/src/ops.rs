//! Scene item operations submitted as one batch

use serde::{Deserialize, Serialize};

use crate::material::ColorMaterial;

/// Which items an operation applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ItemQuery {
    All,
    WithItemId(String),
    WithSuppliedId(String),
}

/// What to do with the matched items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemOperation {
    Select { material: ColorMaterial },
    Deselect,
}

/// One query/operation pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneItemOp {
    pub query: ItemQuery,
    pub operation: ItemOperation,
}

/// Ordered operations executed by the scene as a single unit.
///
/// Operations apply in insertion order and no intermediate state is visible
/// to other readers of the scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemBatch {
    ops: Vec<SceneItemOp>,
}

impl ItemBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, query: ItemQuery, operation: ItemOperation) -> Self {
        self.ops.push(SceneItemOp { query, operation });
        self
    }

    pub fn deselect_all(self) -> Self {
        self.push(ItemQuery::All, ItemOperation::Deselect)
    }

    /// Select a single item by canonical id
    pub fn select_item(self, hex: impl Into<String>, material: ColorMaterial) -> Self {
        self.push(
            ItemQuery::WithItemId(hex.into()),
            ItemOperation::Select { material },
        )
    }

    pub fn ops(&self) -> &[SceneItemOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
