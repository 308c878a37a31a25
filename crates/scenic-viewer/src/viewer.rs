//! Viewer and scene handles, and the viewer readiness state machine

use async_trait::async_trait;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info};

use crate::ops::ItemBatch;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Scene rejected the operation: {0}")]
    Rejected(String),
    #[error("Stream disconnected")]
    Disconnected,
}

/// Handle to the loaded scene of a streaming viewer
#[async_trait]
pub trait SceneHandle: Send + Sync {
    /// Execute a batch of item operations as one unit
    async fn execute(&self, batch: ItemBatch) -> Result<(), SceneError>;
}

/// A streaming viewer element
#[async_trait]
pub trait Viewer: Send + Sync {
    type Scene: SceneHandle;

    /// Current scene, or None when no scene is loaded yet
    async fn scene(&self) -> Option<Self::Scene>;
}

/// Lifecycle of the viewer as seen by the selection core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Uninitialized,
    Ready,
    Disposed,
}

enum Slot<V> {
    Uninitialized,
    Ready(Arc<V>),
    Disposed,
}

/// Shared slot holding the viewer once it is mounted.
///
/// Transitions only move forward: `Uninitialized -> Ready -> Disposed`.
/// The slot is queried synchronously, so no lock is held across an await.
pub struct ViewerSlot<V> {
    inner: Arc<RwLock<Slot<V>>>,
}

impl<V> Clone for ViewerSlot<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> Default for ViewerSlot<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ViewerSlot<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Slot::Uninitialized)),
        }
    }

    /// Slot that starts out ready
    pub fn ready(viewer: V) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Slot::Ready(Arc::new(viewer)))),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Slot<V>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slot<V>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mount the viewer. Returns false unless the slot was uninitialized.
    pub fn mark_ready(&self, viewer: V) -> bool {
        let mut slot = self.write();
        match *slot {
            Slot::Uninitialized => {
                *slot = Slot::Ready(Arc::new(viewer));
                info!("Viewer ready");
                true
            }
            Slot::Ready(_) | Slot::Disposed => {
                debug!("Ignoring viewer mount, slot already initialized");
                false
            }
        }
    }

    /// Unmount the viewer for good
    pub fn dispose(&self) {
        let mut slot = self.write();
        if !matches!(*slot, Slot::Disposed) {
            *slot = Slot::Disposed;
            info!("Viewer disposed");
        }
    }

    pub fn readiness(&self) -> Readiness {
        match *self.read() {
            Slot::Uninitialized => Readiness::Uninitialized,
            Slot::Ready(_) => Readiness::Ready,
            Slot::Disposed => Readiness::Disposed,
        }
    }

    /// The viewer, if it is ready
    pub fn current(&self) -> Option<Arc<V>> {
        match &*self.read() {
            Slot::Ready(viewer) => Some(viewer.clone()),
            Slot::Uninitialized | Slot::Disposed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let slot: ViewerSlot<&'static str> = ViewerSlot::new();
        assert_eq!(slot.readiness(), Readiness::Uninitialized);
        assert!(slot.current().is_none());

        assert!(slot.mark_ready("viewer"));
        assert_eq!(slot.readiness(), Readiness::Ready);
        assert_eq!(slot.current().as_deref(), Some(&"viewer"));

        // Second mount is ignored
        assert!(!slot.mark_ready("other"));
        assert_eq!(slot.current().as_deref(), Some(&"viewer"));

        slot.dispose();
        assert_eq!(slot.readiness(), Readiness::Disposed);
        assert!(slot.current().is_none());

        // Disposed never comes back
        assert!(!slot.mark_ready("again"));
        assert_eq!(slot.readiness(), Readiness::Disposed);
    }

    #[test]
    fn test_clones_share_state() {
        let slot: ViewerSlot<u32> = ViewerSlot::new();
        let other = slot.clone();
        slot.mark_ready(7);
        assert_eq!(other.current().as_deref(), Some(&7));
    }
}
