//! Selection controller
//!
//! The controller owns the single-active-selection state and the metadata
//! side panel feed. It is driven either directly (`on_hit`, `select`,
//! `clear`) or through [`SelectionService`], which drains the intent channel
//! shared by the canvas and tree adapters.
//!
//! Protocol:
//! 1. Project the hit into [`DisplayMetadata`] and publish it before any
//!    scene command, regardless of whether the command succeeds.
//! 2. No item: execute `[deselect(all)]`.
//! 3. Item `id`: execute `[deselect(all), select(id, HIGHLIGHT)]` as one
//!    batch, so no frame ever shows two items or none selected in between.
//! 4. Viewer not ready, or no scene loaded: silent no-op.

use scenic_core::{to_metadata, DisplayMetadata, Hit, SceneItemId};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use crate::clock::{InteractionClock, Ticket};
use crate::intent::{IntentKind, IntentSender, SelectionIntent};
use crate::material::{ColorMaterial, HIGHLIGHT};
use crate::ops::ItemBatch;
use crate::viewer::{SceneError, SceneHandle, Viewer, ViewerSlot};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Scene command failed: {0}")]
    Scene(#[from] SceneError),
    #[error("Selection channel closed")]
    ChannelClosed,
}

/// What a selection command ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Exactly this item is now selected
    Selected(SceneItemId),
    /// Nothing is selected
    Cleared,
    /// Viewer or scene not available; nothing was sent
    NotReady,
    /// A newer interaction was already applied; intent dropped
    Stale,
}

/// The single active selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<SceneItemId>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&SceneItemId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: &SceneItemId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    fn select(&mut self, id: SceneItemId) {
        self.selected = Some(id);
    }

    fn clear(&mut self) {
        self.selected = None;
    }
}

/// Owner of the selection state and the metadata feed
pub struct SelectionController<V: Viewer> {
    viewer: ViewerSlot<V>,
    state: SelectionState,
    metadata: watch::Sender<Option<DisplayMetadata>>,
    highlight: ColorMaterial,
    last_applied: Option<Ticket>,
}

impl<V: Viewer> SelectionController<V> {
    pub fn new(viewer: ViewerSlot<V>) -> Self {
        let (metadata, _) = watch::channel(None);
        Self {
            viewer,
            state: SelectionState::default(),
            metadata,
            highlight: HIGHLIGHT,
            last_applied: None,
        }
    }

    /// Use a different highlight material
    pub fn with_highlight(mut self, highlight: ColorMaterial) -> Self {
        self.highlight = highlight;
        self
    }

    /// Feed for the metadata side panel
    pub fn subscribe_metadata(&self) -> watch::Receiver<Option<DisplayMetadata>> {
        self.metadata.subscribe()
    }

    pub fn metadata(&self) -> Option<DisplayMetadata> {
        self.metadata.borrow().clone()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Handle a canvas hit (or the absence of one)
    pub async fn on_hit(&mut self, hit: Option<&Hit>) -> Result<SelectionOutcome, SelectionError> {
        let metadata = to_metadata(hit);
        debug!(
            id = metadata.display_id().unwrap_or("-"),
            name = metadata.name.as_deref().unwrap_or("-"),
            "Hit"
        );
        self.metadata.send_replace(Some(metadata));

        match hit.and_then(|h| h.item_id.clone()) {
            Some(id) => self.select_item(id).await,
            None => self.clear().await,
        }
    }

    /// Select a node picked by identity and show its name and id
    pub async fn select(
        &mut self,
        id: SceneItemId,
        name: &str,
    ) -> Result<SelectionOutcome, SelectionError> {
        self.metadata
            .send_replace(Some(DisplayMetadata::for_node(&id, name)));
        self.select_item(id).await
    }

    /// Deselect every item
    pub async fn clear(&mut self) -> Result<SelectionOutcome, SelectionError> {
        let batch = ItemBatch::new().deselect_all();
        if !self.submit(batch).await? {
            return Ok(SelectionOutcome::NotReady);
        }
        self.state.clear();
        Ok(SelectionOutcome::Cleared)
    }

    /// Apply an intent unless a newer interaction already won
    pub async fn apply(
        &mut self,
        intent: SelectionIntent,
    ) -> Result<SelectionOutcome, SelectionError> {
        if let Some(last) = self.last_applied {
            if intent.ticket <= last {
                debug!(ticket = %intent.ticket, last = %last, "Dropping stale selection intent");
                return Ok(SelectionOutcome::Stale);
            }
        }
        self.last_applied = Some(intent.ticket);

        match intent.kind {
            IntentKind::Hit(hit) => self.on_hit(hit.as_ref()).await,
            IntentKind::Select { id, name } => self.select(id, &name).await,
            IntentKind::Clear => self.clear().await,
        }
    }

    async fn select_item(&mut self, id: SceneItemId) -> Result<SelectionOutcome, SelectionError> {
        let batch = ItemBatch::new()
            .deselect_all()
            .select_item(id.hex(), self.highlight);
        if !self.submit(batch).await? {
            return Ok(SelectionOutcome::NotReady);
        }
        info!(item = %id, "Selected item");
        self.state.select(id.clone());
        Ok(SelectionOutcome::Selected(id))
    }

    /// Send a batch to the scene. Returns false when there is no scene to
    /// send it to.
    async fn submit(&self, batch: ItemBatch) -> Result<bool, SelectionError> {
        let Some(viewer) = self.viewer.current() else {
            debug!(readiness = ?self.viewer.readiness(), "Viewer not ready, skipping selection");
            return Ok(false);
        };
        let Some(scene) = viewer.scene().await else {
            debug!("No scene loaded, skipping selection");
            return Ok(false);
        };

        trace!(ops = batch.len(), "Executing item batch");
        scene.execute(batch).await.map_err(|e| {
            warn!(error = %e, "Scene item batch failed");
            SelectionError::from(e)
        })?;
        Ok(true)
    }
}

/// Runs a [`SelectionController`] over the intent channel
pub struct SelectionService<V: Viewer> {
    controller: SelectionController<V>,
    rx: mpsc::Receiver<SelectionIntent>,
}

impl<V: Viewer> SelectionService<V> {
    /// Create the service and the sender shared by all intent producers
    pub fn new(controller: SelectionController<V>, capacity: usize) -> (Self, IntentSender) {
        let (tx, rx) = mpsc::channel(capacity);
        let sender = IntentSender::new(tx, InteractionClock::new());
        (Self { controller, rx }, sender)
    }

    pub fn subscribe_metadata(&self) -> watch::Receiver<Option<DisplayMetadata>> {
        self.controller.subscribe_metadata()
    }

    /// Process intents one at a time until every sender is dropped.
    /// Returns the controller so its final state can be inspected.
    pub async fn run(mut self) -> SelectionController<V> {
        while let Some(intent) = self.rx.recv().await {
            let ticket = intent.ticket;
            match self.controller.apply(intent).await {
                Ok(outcome) => trace!(ticket = %ticket, ?outcome, "Applied selection intent"),
                Err(e) => warn!(ticket = %ticket, error = %e, "Selection intent failed"),
            }
        }
        debug!("Selection channel closed");
        self.controller
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::ops::{ItemOperation, ItemQuery};
    use scenic_core::Vector3;

    #[tokio::test]
    async fn test_empty_hit_issues_single_deselect() {
        let (mut controller, scene) = ready_controller(&["a", "b"]);

        let outcome = controller.on_hit(Some(&Hit::empty())).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::Cleared);

        let batches = scene.batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], ItemBatch::new().deselect_all());

        let metadata = controller.metadata().unwrap();
        assert!(metadata.is_empty());

        // Part name and hit point without an item still resolve nothing
        let itemless = Hit::empty()
            .with_part_name("Ghost")
            .with_hit_point(Vector3::new(1.0, 2.0, 3.0));
        let outcome = controller.on_hit(Some(&itemless)).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::Cleared);
        assert_eq!(scene.batches().len(), 2);
        assert!(controller.metadata().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_hit_behaves_like_empty_hit() {
        let (mut controller, scene) = ready_controller(&["a"]);
        let outcome = controller.on_hit(None).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::Cleared);
        assert_eq!(scene.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_hit_selects_exactly_one_item() {
        let (mut controller, scene) = ready_controller(&["a", "b", "c"]);

        let hit_a = Hit::on_item(SceneItemId::new("a")).with_part_name("Alpha");
        controller.on_hit(Some(&hit_a)).await.unwrap();
        let hit_b = Hit::on_item(SceneItemId::new("b"));
        let outcome = controller.on_hit(Some(&hit_b)).await.unwrap();

        assert_eq!(outcome, SelectionOutcome::Selected(SceneItemId::new("b")));
        assert_eq!(scene.selected(), vec!["b".to_string()]);
        assert!(controller.state().is_selected(&SceneItemId::new("b")));
        assert!(scene.log.lock().unwrap().max_selected_seen <= 1);

        let batches = scene.batches();
        assert_eq!(batches.len(), 2);
        let ops = batches[1].ops();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].query, ItemQuery::All);
        assert_eq!(ops[0].operation, ItemOperation::Deselect);
        assert_eq!(ops[1].query, ItemQuery::WithItemId("b".to_string()));
        assert_eq!(ops[1].operation, ItemOperation::Select { material: HIGHLIGHT });
    }

    #[tokio::test]
    async fn test_metadata_published_from_hit() {
        let (mut controller, _scene) = ready_controller(&["a"]);
        let mut rx = controller.subscribe_metadata();

        let hit = Hit::on_item(SceneItemId::new("a").with_supplied_id("part-a"))
            .with_part_name("Alpha");
        controller.on_hit(Some(&hit)).await.unwrap();

        assert!(rx.has_changed().unwrap());
        let metadata = rx.borrow_and_update().clone().unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Alpha"));
        assert_eq!(metadata.display_id(), Some("part-a"));
    }

    #[tokio::test]
    async fn test_empty_hit_replaces_previous_metadata() {
        let (mut controller, _scene) = ready_controller(&["a"]);
        let hit = Hit::on_item(SceneItemId::new("a")).with_part_name("Alpha");
        controller.on_hit(Some(&hit)).await.unwrap();
        controller.on_hit(None).await.unwrap();
        assert!(controller.metadata().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_not_ready_is_silent_noop() {
        let slot: ViewerSlot<FakeViewer> = ViewerSlot::new();
        let mut controller = SelectionController::new(slot.clone());

        let hit = Hit::on_item(SceneItemId::new("a")).with_part_name("Alpha");
        let outcome = controller.on_hit(Some(&hit)).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::NotReady);
        assert!(controller.state().is_empty());
        // Metadata still updates
        assert_eq!(controller.metadata().unwrap().name.as_deref(), Some("Alpha"));

        // Viewer mounted but scene not loaded yet
        slot.mark_ready(FakeViewer { scene: None });
        let outcome = controller.on_hit(Some(&hit)).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::NotReady);

        slot.dispose();
        let outcome = controller.on_hit(None).await.unwrap();
        assert_eq!(outcome, SelectionOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_scene_failure_keeps_state_but_publishes_metadata() {
        let (mut controller, scene) = ready_controller(&["a", "b"]);
        controller
            .on_hit(Some(&Hit::on_item(SceneItemId::new("a"))))
            .await
            .unwrap();

        scene.log.lock().unwrap().fail_next = true;
        let hit_b = Hit::on_item(SceneItemId::new("b")).with_part_name("Beta");
        let err = controller.on_hit(Some(&hit_b)).await.unwrap_err();
        assert!(matches!(err, SelectionError::Scene(SceneError::Rejected(_))));

        assert!(controller.state().is_selected(&SceneItemId::new("a")));
        assert_eq!(controller.metadata().unwrap().name.as_deref(), Some("Beta"));
    }

    #[tokio::test]
    async fn test_stale_intent_is_dropped() {
        let (mut controller, scene) = ready_controller(&["a", "b"]);
        let clock = InteractionClock::new();
        let older = clock.tick();
        let newer = clock.tick();

        let outcome = controller
            .apply(SelectionIntent {
                ticket: newer,
                kind: IntentKind::Hit(Some(Hit::on_item(SceneItemId::new("b")))),
            })
            .await
            .unwrap();
        assert_eq!(outcome, SelectionOutcome::Selected(SceneItemId::new("b")));

        // The older click resolves late
        let outcome = controller
            .apply(SelectionIntent {
                ticket: older,
                kind: IntentKind::Hit(Some(
                    Hit::on_item(SceneItemId::new("a")).with_part_name("Alpha"),
                )),
            })
            .await
            .unwrap();
        assert_eq!(outcome, SelectionOutcome::Stale);
        assert_eq!(scene.selected(), vec!["b".to_string()]);
        assert_eq!(scene.batches().len(), 1);
        assert_eq!(controller.metadata().unwrap().item_id.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_select_intent_publishes_node_metadata() {
        let (mut controller, scene) = ready_controller(&["a"]);
        let clock = InteractionClock::new();
        let outcome = controller
            .apply(SelectionIntent {
                ticket: clock.tick(),
                kind: IntentKind::Select {
                    id: SceneItemId::new("a").with_supplied_id("lid"),
                    name: "Lid".to_string(),
                },
            })
            .await
            .unwrap();
        assert_eq!(outcome, SelectionOutcome::Selected(SceneItemId::new("a")));
        assert_eq!(scene.selected(), vec!["a".to_string()]);

        let metadata = controller.metadata().unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Lid"));
        assert_eq!(metadata.display_id(), Some("lid"));
    }

    #[tokio::test]
    async fn test_service_drains_intents_in_order() {
        let (controller, scene) = ready_controller(&["a", "b"]);
        let (service, sender) = SelectionService::new(controller, 8);
        let metadata = service.subscribe_metadata();

        sender
            .submit(IntentKind::Hit(Some(Hit::on_item(SceneItemId::new("a")))))
            .await
            .unwrap();
        sender
            .submit(IntentKind::Select {
                id: SceneItemId::new("b"),
                name: "Beta".to_string(),
            })
            .await
            .unwrap();
        drop(sender);

        let controller = service.run().await;
        assert!(controller.state().is_selected(&SceneItemId::new("b")));
        assert_eq!(scene.selected(), vec!["b".to_string()]);
        assert_eq!(metadata.borrow().as_ref().unwrap().name.as_deref(), Some("Beta"));
    }

    #[tokio::test]
    async fn test_service_survives_failed_intent() {
        let (controller, scene) = ready_controller(&["a"]);
        scene.log.lock().unwrap().fail_next = true;
        let (service, sender) = SelectionService::new(controller, 8);

        sender
            .submit(IntentKind::Hit(Some(Hit::on_item(SceneItemId::new("a")))))
            .await
            .unwrap();
        sender.submit(IntentKind::Clear).await.unwrap();
        drop(sender);

        let controller = service.run().await;
        assert!(controller.state().is_empty());
        assert_eq!(scene.batches().len(), 1);
    }
}
