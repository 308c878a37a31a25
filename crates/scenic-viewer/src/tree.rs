//! Scene tree adapter
//!
//! Resolves a click on the tree widget to the scene node behind the row.
//! Row lookup is async because the widget may have to scroll the row into
//! view or materialize it lazily.

use async_trait::async_trait;
use scenic_core::SceneItemId;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::canvas::ScreenPoint;
use crate::intent::{IntentKind, IntentSender};

/// A click on the tree widget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowEvent {
    pub position: ScreenPoint,
}

impl RowEvent {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: ScreenPoint::new(x, y),
        }
    }
}

/// Scene node backing a tree row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: SceneItemId,
    pub name: String,
}

/// A tree row; placeholder rows have no node yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub index: usize,
    pub node: Option<TreeNode>,
}

/// The tree-view widget
#[async_trait]
pub trait TreeView: Send + Sync {
    async fn row_for_event(&self, event: &RowEvent) -> Option<Row>;
}

/// Node identity resolved from a row click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedNode {
    pub id: SceneItemId,
    pub name: String,
}

impl SelectedNode {
    /// `supplied id (or hex id),name`
    pub fn label(&self) -> String {
        format!("{},{}", self.id.display_id(), self.name)
    }
}

pub struct SceneTreeAdapter<T> {
    tree: T,
    intents: Option<IntentSender>,
}

impl<T: TreeView> SceneTreeAdapter<T> {
    /// Adapter that only resolves rows
    pub fn new(tree: T) -> Self {
        Self {
            tree,
            intents: None,
        }
    }

    /// Adapter that also selects the clicked node through the controller
    pub fn with_intents(tree: T, intents: IntentSender) -> Self {
        Self {
            tree,
            intents: Some(intents),
        }
    }

    /// Resolve a row click to its node. Rows without a node are ignored.
    pub async fn on_row_click(&self, event: &RowEvent) -> Option<SelectedNode> {
        let ticket = self.intents.as_ref().map(IntentSender::begin);

        let Some(node) = self.tree.row_for_event(event).await.and_then(|row| row.node) else {
            trace!("Row click without a node");
            return None;
        };

        let selected = SelectedNode {
            id: node.id,
            name: node.name,
        };
        debug!(node = %selected.label(), "Selected tree node");

        if let (Some(intents), Some(ticket)) = (&self.intents, ticket) {
            let kind = IntentKind::Select {
                id: selected.id.clone(),
                name: selected.name.clone(),
            };
            if let Err(e) = intents.send(ticket, kind).await {
                warn!(error = %e, "Failed to forward tree selection");
            }
        }

        Some(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::testing::*;
    use crate::selection::SelectionService;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Rows keyed by the y coordinate of the click
    #[derive(Default)]
    struct FakeTree {
        rows: HashMap<u32, Row>,
        lookups: AtomicUsize,
    }

    impl FakeTree {
        fn with_row(mut self, y: u32, node: Option<TreeNode>) -> Self {
            self.rows.insert(
                y,
                Row {
                    index: y as usize,
                    node,
                },
            );
            self
        }
    }

    #[async_trait]
    impl TreeView for FakeTree {
        async fn row_for_event(&self, event: &RowEvent) -> Option<Row> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.rows.get(&(event.position.y as u32)).cloned()
        }
    }

    fn node(hex: &str, supplied: Option<&str>, name: &str) -> TreeNode {
        let id = match supplied {
            Some(s) => SceneItemId::new(hex).with_supplied_id(s),
            None => SceneItemId::new(hex),
        };
        TreeNode {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_row_with_node() {
        let tree = FakeTree::default().with_row(3, Some(node("c3", Some("bolt-3"), "Bolt")));
        let adapter = SceneTreeAdapter::new(tree);

        let selected = adapter.on_row_click(&RowEvent::at(0.0, 3.0)).await.unwrap();
        assert_eq!(selected.id, SceneItemId::new("c3"));
        assert_eq!(selected.label(), "bolt-3,Bolt");
    }

    #[tokio::test]
    async fn test_label_falls_back_to_hex() {
        let tree = FakeTree::default().with_row(1, Some(node("c3", None, "Bolt")));
        let adapter = SceneTreeAdapter::new(tree);
        let selected = adapter.on_row_click(&RowEvent::at(0.0, 1.0)).await.unwrap();
        assert_eq!(selected.label(), "c3,Bolt");
    }

    #[tokio::test]
    async fn test_row_without_node_has_no_side_effect() {
        let (controller, scene) = ready_controller(&["c3"]);
        let (service, sender) = SelectionService::new(controller, 8);
        let tree = FakeTree::default().with_row(2, None);
        let adapter = SceneTreeAdapter::with_intents(tree, sender);

        assert!(adapter.on_row_click(&RowEvent::at(0.0, 2.0)).await.is_none());
        // No row at all
        assert!(adapter.on_row_click(&RowEvent::at(0.0, 9.0)).await.is_none());
        assert_eq!(adapter.tree.lookups.load(Ordering::SeqCst), 2);
        drop(adapter);

        let controller = service.run().await;
        assert!(scene.batches().is_empty());
        assert!(controller.metadata().is_none());
    }

    #[tokio::test]
    async fn test_row_click_drives_selection() {
        let (controller, scene) = ready_controller(&["c3", "d4"]);
        let (service, sender) = SelectionService::new(controller, 8);
        let tree = FakeTree::default()
            .with_row(1, Some(node("c3", None, "Bolt")))
            .with_row(2, Some(node("d4", Some("nut-4"), "Nut")));
        let adapter = SceneTreeAdapter::with_intents(tree, sender);

        adapter.on_row_click(&RowEvent::at(0.0, 1.0)).await.unwrap();
        adapter.on_row_click(&RowEvent::at(0.0, 2.0)).await.unwrap();
        drop(adapter);

        let controller = service.run().await;
        assert!(controller.state().is_selected(&SceneItemId::new("d4")));
        assert_eq!(scene.selected(), vec!["d4".to_string()]);
        assert_eq!(controller.metadata().unwrap().display_id(), Some("nut-4"));
    }
}
