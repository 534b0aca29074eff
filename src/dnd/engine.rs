//! Reorderable list interaction engine.
//!
//! One [`DraggableList`] drives one list of items. It turns pointer drag
//! events and keyboard "grab and move" events into [`Intent`]s for its
//! owner, and keeps only ephemeral interaction state of its own.
//!
//! # States
//!
//! - **Idle**: nothing dragged or grabbed.
//! - **Pointer-dragging**: `drag_start` recorded the dragged item; `drop`,
//!   `drop_at_end` or `drag_end` return to idle.
//! - **Keyboard-grabbed**: Space/Enter picked up the focused item; arrows
//!   move it, Space/Enter drops it, Escape cancels.
//!
//! The owner mirrors its collection with [`DraggableList::set_items`]
//! after every change; the dragged item is tracked by id so a drag whose
//! item disappears is abandoned instead of acting on a stale index.

use crate::dnd::{
    events::{EventBus, GlobalEvent, Subscription},
    payload::DragData,
    types::{CrossDirection, DropEffect, Intent, Key, ListDirection, ListId, Response},
    DragItem,
};
use crate::error::{BoardError, Result};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DRAG_END_RECLEAR: Duration = Duration::from_millis(0);
const DROP_RECLEAR: Duration = Duration::from_millis(50);

/// Ephemeral interaction state of one list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_index: Option<usize>,
    pub dragged_over_index: Option<usize>,
    pub is_keyboard_mode: bool,
    pub grabbed_index: Option<usize>,
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        !self.is_dragging && self.grabbed_index.is_none()
    }

    fn clear_pointer(&mut self) {
        self.is_dragging = false;
        self.dragged_index = None;
        self.dragged_over_index = None;
    }

    fn release_grab(&mut self) {
        self.grabbed_index = None;
        self.is_keyboard_mode = false;
    }
}

/// Per-list configuration. The capability flags decide which intents the
/// list may emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    pub list_id: ListId,
    pub direction: ListDirection,
    /// Accessible name, used in announcements
    pub label: String,
    /// Accept items dropped from other lists
    pub accepts_moves: bool,
    /// Left/right on a grabbed item of a vertical list moves it to the
    /// adjacent list
    pub cross_moves: bool,
    /// Emit [`Intent::ItemGrabbed`] when an item is grabbed
    pub notifies_grab: bool,
}

impl ListConfig {
    pub fn new(list_id: impl Into<ListId>, direction: ListDirection) -> Self {
        Self {
            list_id: list_id.into(),
            direction,
            label: "Draggable list".to_string(),
            accepts_moves: false,
            cross_moves: false,
            notifies_grab: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn accepting_moves(mut self) -> Self {
        self.accepts_moves = true;
        self
    }

    pub fn with_cross_moves(mut self) -> Self {
        self.cross_moves = true;
        self
    }

    pub fn notifying_grab(mut self) -> Self {
        self.notifies_grab = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClearScope {
    Pointer,
    Full,
}

#[derive(Debug, Clone, Copy)]
struct DeferredClear {
    due: Instant,
    scope: ClearScope,
}

enum DropSlot {
    Item(usize),
    End,
}

pub struct DraggableList<T: DragItem> {
    config: ListConfig,
    items: Vec<T>,
    state: DragState,
    dragged_item_id: Option<String>,
    last_clear_trigger: u64,
    deferred: Vec<DeferredClear>,
    live_region: Option<String>,
    subscription: Option<Subscription>,
}

impl<T: DragItem> DraggableList<T> {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            state: DragState::default(),
            dragged_item_id: None,
            last_clear_trigger: 0,
            deferred: Vec::new(),
            live_region: None,
            subscription: None,
        }
    }

    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.set_items(items);
        self
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn list_id(&self) -> &ListId {
        &self.config.list_id
    }

    /// Renames the list, e.g. after its column was renamed
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.config.label = label.into();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Last announcement, as shown in the polite live region
    pub fn live_region(&self) -> Option<&str> {
        self.live_region.as_deref()
    }

    /// Subscribes to board-wide events. Replacing or dropping the list
    /// releases the previous subscription.
    pub fn attach(&mut self, bus: &EventBus) {
        self.subscription = Some(bus.subscribe());
    }

    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replaces the mirrored collection and drops interaction state that
    /// no longer matches it.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;

        if matches!(self.state.grabbed_index, Some(index) if index >= self.items.len()) {
            debug!(list = %self.config.list_id, "grabbed item no longer in range, releasing");
            self.state.release_grab();
        }

        if self.state.is_dragging {
            let position = self.dragged_item_id.as_deref().and_then(|id| {
                self.items.iter().position(|item| item.drag_id() == id)
            });
            match position {
                Some(index) => self.state.dragged_index = Some(index),
                None => {
                    debug!(list = %self.config.list_id, "dragged item disappeared, abandoning drag");
                    self.reset_pointer();
                }
            }
        }
    }

    /// Starts a pointer drag of the item at `index` and returns the
    /// payload to attach to the drag.
    pub fn drag_start(&mut self, index: usize) -> Result<DragData> {
        let item = self.items.get(index).ok_or(BoardError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })?;
        let data = DragData::encode(&self.config.list_id, index, item)?;

        self.dragged_item_id = Some(item.drag_id().to_string());
        self.state.is_dragging = true;
        self.state.dragged_index = Some(index);
        self.state.is_keyboard_mode = false;
        debug!(list = %self.config.list_id, index, "drag started");
        Ok(data)
    }

    /// Pointer is over the item at `index`; visual feedback only
    pub fn drag_over(&mut self, index: usize) -> DropEffect {
        self.state.dragged_over_index = Some(index);
        DropEffect::Move
    }

    /// Drop onto the item at `index`
    pub fn drop(&mut self, index: usize, data: &DragData) -> Response<T> {
        self.finish_drop(DropSlot::Item(index), data)
    }

    /// Drop onto the zone after the last item
    pub fn drop_at_end(&mut self, data: &DragData) -> Response<T> {
        self.finish_drop(DropSlot::End, data)
    }

    /// The drag started in this list ended, dropped or not
    pub fn drag_end(&mut self) {
        self.reset();
        self.schedule(DRAG_END_RECLEAR, ClearScope::Pointer);
    }

    /// Applies board-wide events received since the last call
    pub fn process_global_events(&mut self) {
        let Some(subscription) = self.subscription.as_mut() else {
            return;
        };
        for event in subscription.drain() {
            match event {
                GlobalEvent::DragEnd => {
                    if self.state.is_dragging
                        || self.state.dragged_index.is_some()
                        || self.state.dragged_over_index.is_some()
                    {
                        self.reset_pointer();
                    }
                }
                GlobalEvent::Escape => self.state.release_grab(),
            }
        }
    }

    /// Applies deferred re-clears that are due at `now`
    pub fn poll_deferred(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.deferred.drain(..).partition(|clear| clear.due <= now);
        self.deferred = pending;

        for clear in due {
            match clear.scope {
                ClearScope::Pointer => self.reset_pointer(),
                ClearScope::Full => self.reset(),
            }
        }
    }

    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Forces a full reset whenever the owner bumps its clear trigger
    pub fn apply_clear_trigger(&mut self, trigger: u64) {
        if trigger == self.last_clear_trigger {
            return;
        }
        self.last_clear_trigger = trigger;
        if trigger > 0 {
            self.reset();
        }
    }

    /// Focus moved to the item at `index`
    pub fn focus(&mut self, index: usize) {
        if matches!(self.state.grabbed_index, Some(grabbed) if grabbed != index) {
            self.state.release_grab();
        }
    }

    /// Focus left an item; `next_focus` is the list now holding focus
    pub fn blur(&mut self, next_focus: Option<&ListId>) {
        if next_focus != Some(&self.config.list_id) {
            self.state.release_grab();
        }
    }

    /// Cancels an active keyboard grab, as when an item of another list
    /// is grabbed. Returns whether a grab was active.
    pub fn cancel_grab(&mut self) -> bool {
        if self.state.grabbed_index.is_none() {
            return false;
        }
        self.state.release_grab();
        self.announce("Move cancelled");
        true
    }

    pub fn key_down(&mut self, index: usize, key: Key) -> Response<T> {
        if index >= self.items.len() {
            return Response::ignored();
        }
        if key.is_activation() {
            return self.toggle_grab(index);
        }

        if self.state.grabbed_index != Some(index) {
            // Keep arrows away from enclosing lists while a sibling may be grabbed
            return if key.is_arrow() {
                Response::swallowed()
            } else {
                Response::ignored()
            };
        }

        if key == Key::Escape {
            self.state.release_grab();
            return Response::consumed().with_announcement(self.announce("Move cancelled"));
        }
        if !key.is_arrow() {
            return Response::ignored();
        }

        let response = Response::consumed();
        let vertical = self.config.direction == ListDirection::Vertical;
        let last = self.items.len().saturating_sub(1);
        let target = match (key, vertical) {
            (Key::ArrowUp, true) | (Key::ArrowLeft, false) => Some(index.saturating_sub(1)),
            (Key::ArrowDown, true) | (Key::ArrowRight, false) => Some((index + 1).min(last)),
            (Key::ArrowLeft, true) => {
                return self.cross_move(index, CrossDirection::Left, response)
            }
            (Key::ArrowRight, true) => {
                return self.cross_move(index, CrossDirection::Right, response)
            }
            _ => None,
        };

        match target {
            Some(to) if to != index => {
                self.state.grabbed_index = Some(to);
                let text = self.announce(format!("Moved item to position {}", to + 1));
                response
                    .with_intent(Intent::Reorder { from: index, to })
                    .with_announcement(text)
            }
            _ => response,
        }
    }

    pub fn is_grabbed(&self, index: usize) -> bool {
        self.state.grabbed_index == Some(index)
    }

    /// True for the item currently being pointer-dragged
    pub fn is_item_dragging(&self, index: usize) -> bool {
        self.state.is_dragging
            && self.state.dragged_index == Some(index)
            && self.items.get(index).map(|item| item.drag_id()) == self.dragged_item_id.as_deref()
    }

    /// True for the drop position under the pointer
    pub fn is_dragged_over(&self, index: usize) -> bool {
        self.state.is_dragging
            && self.state.dragged_over_index == Some(index)
            && self.state.dragged_index != Some(index)
    }

    pub fn aria_grabbed(&self, index: usize) -> bool {
        self.is_grabbed(index)
    }

    pub fn drop_effect(&self) -> DropEffect {
        if self.state.is_dragging {
            DropEffect::Move
        } else {
            DropEffect::None
        }
    }

    /// Items are not pointer-draggable while in keyboard mode
    pub fn is_draggable(&self) -> bool {
        !self.state.is_keyboard_mode
    }

    fn toggle_grab(&mut self, index: usize) -> Response<T> {
        let grabbing = self.state.grabbed_index != Some(index);
        let mut response = Response::consumed();

        if grabbing && self.config.notifies_grab {
            response = response.with_intent(Intent::ItemGrabbed);
        }

        self.state.is_keyboard_mode = grabbing;
        self.state.grabbed_index = if grabbing { Some(index) } else { None };

        let text = if grabbing {
            format!(
                "Grabbed item at position {}. {}",
                index + 1,
                self.move_instructions()
            )
        } else {
            format!("Released item at position {}", index + 1)
        };
        debug!(list = %self.config.list_id, index, grabbing, "keyboard grab toggled");
        response.with_announcement(self.announce(text))
    }

    fn cross_move(
        &mut self,
        index: usize,
        direction: CrossDirection,
        response: Response<T>,
    ) -> Response<T> {
        if !self.config.cross_moves {
            return response;
        }
        let Some(item) = self.items.get(index).cloned() else {
            return response;
        };

        self.state.release_grab();
        let text = self.announce(format!(
            "Moved \"{}\" to the {} column",
            item.drag_label().unwrap_or("item"),
            direction
        ));
        response
            .with_intent(Intent::CrossMove { item, direction })
            .with_announcement(text)
    }

    fn move_instructions(&self) -> &'static str {
        if self.config.direction == ListDirection::Vertical && self.config.cross_moves {
            "Use up/down arrows to move within column, left/right arrows to move between columns, Space to drop, Escape to cancel."
        } else {
            "Use arrow keys to move, Space to drop, Escape to cancel."
        }
    }

    fn finish_drop(&mut self, slot: DropSlot, data: &DragData) -> Response<T> {
        let mut response = Response::consumed();

        match data.source() {
            Ok((source_list, _)) if source_list == self.config.list_id => {
                if let Some(intent) = self.same_list_drop(&slot) {
                    if let Intent::Reorder { from, to } = intent {
                        let text = self.announce(format!(
                            "Moved item from position {} to position {}",
                            from + 1,
                            to + 1
                        ));
                        response = response.with_announcement(text);
                    }
                    response = response.with_intent(intent);
                }
            }
            Ok((source_list, _)) if self.config.accepts_moves => match data.decode_item::<T>() {
                Ok(item) => {
                    let (index, text) = match slot {
                        DropSlot::Item(index) => (
                            index,
                            format!("Moved item to {} at position {}", self.config.label, index + 1),
                        ),
                        DropSlot::End => (
                            self.items.len(),
                            format!("Moved item to {} at end of list", self.config.label),
                        ),
                    };
                    debug!(list = %self.config.list_id, from = %source_list, index, "cross-list drop");
                    let text = self.announce(text);
                    response = response
                        .with_intent(Intent::Move {
                            item,
                            target_list: self.config.list_id.clone(),
                            index,
                        })
                        .with_announcement(text);
                }
                Err(e) => {
                    warn!(list = %self.config.list_id, error = %e, "failed to parse drag data");
                }
            },
            Ok(_) => {}
            Err(e) => {
                warn!(list = %self.config.list_id, error = %e, "failed to parse drag data");
            }
        }

        self.reset();
        self.schedule(DROP_RECLEAR, ClearScope::Full);
        response
    }

    /// The source position comes from the tracked drag, not the payload,
    /// so a collection change between start and drop cannot move the
    /// wrong item.
    fn same_list_drop(&self, slot: &DropSlot) -> Option<Intent<T>> {
        let source_index = match self.state.dragged_index {
            Some(index) if self.state.is_dragging => index,
            _ => {
                debug!(list = %self.config.list_id, "same-list drop without a live drag, ignoring");
                return None;
            }
        };
        let len = self.items.len();
        if source_index >= len {
            warn!(list = %self.config.list_id, source_index, len, "drop source index out of range");
            return None;
        }
        let to = match slot {
            DropSlot::Item(index) => (*index).min(len - 1),
            DropSlot::End => len - 1,
        };
        (to != source_index).then_some(Intent::Reorder {
            from: source_index,
            to,
        })
    }

    fn schedule(&mut self, delay: Duration, scope: ClearScope) {
        self.deferred.push(DeferredClear {
            due: Instant::now() + delay,
            scope,
        });
    }

    fn announce(&mut self, text: impl Into<String>) -> String {
        let text = text.into();
        self.live_region = Some(text.clone());
        text
    }

    fn reset_pointer(&mut self) {
        self.state.clear_pointer();
        self.dragged_item_id = None;
    }

    fn reset(&mut self) {
        self.state = DragState::default();
        self.dragged_item_id = None;
    }
}
