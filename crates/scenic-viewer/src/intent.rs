//! Selection intents emitted by the canvas and the scene tree

use scenic_core::{Hit, SceneItemId};
use tokio::sync::mpsc;

use crate::clock::{InteractionClock, Ticket};
use crate::selection::SelectionError;

/// What an interaction asks the selection controller to do
#[derive(Debug, Clone, PartialEq)]
pub enum IntentKind {
    /// Result of a canvas hit test (None when the stream returned nothing)
    Hit(Option<Hit>),
    /// Select a node picked by identity, e.g. from the scene tree
    Select { id: SceneItemId, name: String },
    /// Deselect everything
    Clear,
}

/// An intent stamped with the ticket of the interaction that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionIntent {
    pub ticket: Ticket,
    pub kind: IntentKind,
}

/// Producer side of the selection channel
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: mpsc::Sender<SelectionIntent>,
    clock: InteractionClock,
}

impl IntentSender {
    pub(crate) fn new(tx: mpsc::Sender<SelectionIntent>, clock: InteractionClock) -> Self {
        Self { tx, clock }
    }

    /// Start an interaction. Take the ticket before any async lookup so the
    /// ticket reflects click order, not completion order.
    pub fn begin(&self) -> Ticket {
        self.clock.tick()
    }

    pub async fn send(&self, ticket: Ticket, kind: IntentKind) -> Result<(), SelectionError> {
        self.tx
            .send(SelectionIntent { ticket, kind })
            .await
            .map_err(|_| SelectionError::ChannelClosed)
    }

    /// Begin and send in one step, for intents that need no lookup
    pub async fn submit(&self, kind: IntentKind) -> Result<Ticket, SelectionError> {
        let ticket = self.begin();
        self.send(ticket, kind).await?;
        Ok(ticket)
    }
}
