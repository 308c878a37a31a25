//! Canvas pointer handling: turns clicks into hit intents

use async_trait::async_trait;
use scenic_core::Hit;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::clock::Ticket;
use crate::intent::{IntentKind, IntentSender};
use crate::selection::SelectionError;

/// Pixel position relative to the viewer canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A pointer tap or click on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: ScreenPoint,
    pub button: u16,
}

impl PointerEvent {
    /// Primary-button click at the given point
    pub fn click(x: f32, y: f32) -> Self {
        Self {
            position: ScreenPoint::new(x, y),
            button: 0,
        }
    }
}

/// Hit testing provided by the streaming service
#[async_trait]
pub trait HitTester: Send + Sync {
    /// Test a point against the current frame. None means no hit.
    async fn hit_test(&self, event: &PointerEvent) -> Option<Hit>;
}

/// Forwards canvas clicks to the selection channel
pub struct CanvasAdapter<H> {
    hit_tester: H,
    intents: IntentSender,
}

impl<H: HitTester> CanvasAdapter<H> {
    pub fn new(hit_tester: H, intents: IntentSender) -> Self {
        Self {
            hit_tester,
            intents,
        }
    }

    /// Hit-test a click and emit the result as an intent.
    ///
    /// The ticket is taken when the click arrives, so if an earlier click's
    /// hit test resolves after a later one, the controller drops it.
    pub async fn on_pointer(&self, event: PointerEvent) -> Result<Ticket, SelectionError> {
        let ticket = self.intents.begin();
        let hit = self.hit_tester.hit_test(&event).await;
        trace!(
            ticket = %ticket,
            x = event.position.x,
            y = event.position.y,
            hit = hit.as_ref().is_some_and(|h| !h.is_empty()),
            "Canvas hit test resolved"
        );
        self.intents.send(ticket, IntentKind::Hit(hit)).await?;
        Ok(ticket)
    }
}
