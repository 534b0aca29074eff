//! Drag-and-drop and keyboard reordering for lists of identifiable items.

pub mod engine;
pub mod events;
pub mod payload;
pub mod types;

use serde::{de::DeserializeOwned, Serialize};

pub use engine::{DragState, DraggableList, ListConfig};
pub use events::{EventBus, GlobalEvent, Subscription};
pub use payload::DragData;
pub use types::{
    CrossDirection, DropEffect, Intent, Key, ListDirection, ListId, Propagation, Response,
};

/// An item that can live in a [`DraggableList`]. Items travel between
/// lists as serialized copies, so they must round-trip through serde.
pub trait DragItem: Clone + Serialize + DeserializeOwned {
    /// Identifier, unique within the list
    fn drag_id(&self) -> &str;

    /// Human-readable name used in announcements
    fn drag_label(&self) -> Option<&str> {
        None
    }
}
