//! TexGraph Core Library
//!
//! Platform-agnostic scene items and pointer interaction for the TexGraph
//! node editor: nodes with ports, frames, comments, navigation pins, the
//! marquee/group selection and undoable move history.

pub mod comment;
pub mod frame;
pub mod history;
pub mod input;
pub mod item;
pub mod navigation;
pub mod node;
pub mod port;
pub mod scene;
pub mod selection;
pub mod surface;
pub mod viewport;

pub use comment::Comment;
pub use frame::{Frame, XResize, YResize};
pub use history::{Action, ActionError, ActionLog, HistoryResult, MAX_UNDO_HISTORY};
pub use input::{PointerEvent, PointerKind, PointerTracker};
pub use item::{DrawContext, GestureContext, ItemId, ItemRect, ItemRef, RenderState, SpatialItem, rects_overlap};
pub use navigation::Navigation;
pub use node::Node;
pub use port::{Port, PortDirection};
pub use scene::{GestureTarget, Scene, SceneItems};
pub use selection::Selection;
pub use surface::{FontSpec, Surface, ThumbnailId};
pub use viewport::Viewport;
