//! Scenic Viewer - Selection and session core of the scene viewer
//!
//! This crate reconciles the views of "what is selected" in a streamed 3D
//! scene: canvas hit tests, scene tree row clicks and the metadata side
//! panel. Rendering, streaming and the tree widget itself are external
//! collaborators reached through the traits in [`viewer`], [`canvas`],
//! [`tree`] and [`session`].
//!
//! Both click paths emit [`SelectionIntent`]s into one channel drained by a
//! [`SelectionService`], which owns the only [`SelectionController`].

pub mod canvas;
pub mod clock;
pub mod intent;
pub mod material;
pub mod ops;
pub mod selection;
pub mod session;
pub mod tree;
pub mod viewer;

pub use canvas::{CanvasAdapter, HitTester, PointerEvent, ScreenPoint};
pub use clock::{InteractionClock, Ticket};
pub use intent::{IntentKind, IntentSender, SelectionIntent};
pub use material::{ColorMaterial, Rgba, HIGHLIGHT};
pub use ops::{ItemBatch, ItemOperation, ItemQuery, SceneItemOp};
pub use selection::{
    SelectionController, SelectionError, SelectionOutcome, SelectionService, SelectionState,
};
pub use session::{NavigationError, Navigator, SessionBinding, SessionState};
pub use tree::{Row, RowEvent, SceneTreeAdapter, SelectedNode, TreeNode, TreeView};
pub use viewer::{Readiness, SceneError, SceneHandle, Viewer, ViewerSlot};
