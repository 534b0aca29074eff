//! # Hlavi Board
//!
//! Headless core of a drag-and-drop kanban board.
//!
//! This crate provides the board data model and its persisted store, a
//! generic reorderable-list engine that unifies pointer drags with
//! keyboard "grab and move" reordering, and the composition layer that
//! wires column and card lists to the store. Rendering is left to the
//! host, which forwards pointer, keyboard and focus events and renders the
//! state the crate exposes.

pub mod board;
pub mod config;
pub mod dnd;
pub mod domain;
pub mod error;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use board::{Board, Confirm, DropTarget, EventOutcome, ItemRef};
pub use config::BoardConfig;
pub use dnd::{DragData, DragItem, DraggableList, Intent, Key, ListConfig, ListDirection, ListId};
pub use domain::{BoardState, Card, CardId, CardPatch, Column, ColumnId, NewCard, Priority};
pub use error::{BoardError, Result};
pub use storage::Storage;
pub use store::KanbanStore;
