//! Kanban board composition.
//!
//! A [`Board`] binds one horizontal [`DraggableList`] over the columns and
//! one vertical list per column over that column's cards. Host events are
//! addressed with [`ItemRef`] / [`DropTarget`] and routed to the innermost
//! list first; they reach the column list only when the card list lets
//! them propagate. Intents coming back are applied to the store, after
//! which every list is re-synced with the new snapshot.

pub mod forms;

use crate::{
    config::BoardConfig,
    dnd::{
        DragData, DraggableList, EventBus, GlobalEvent, Intent, Key, ListConfig, ListDirection,
        ListId, Response,
    },
    domain::{Card, CardId, CardPatch, Column, ColumnId, NewCard},
    error::{BoardError, Result},
    storage::Storage,
    store::KanbanStore,
};
use forms::{CardForm, ColumnForm, FormMode};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

pub use crate::dnd::CrossDirection;

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// An item on the board, by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Column(usize),
    Card { column: ColumnId, index: usize },
}

/// Where a pointer drag was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column(usize),
    ColumnsEnd,
    Card { column: ColumnId, index: usize },
    CardsEnd { column: ColumnId },
}

/// What the host should do with the event it forwarded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub prevent_default: bool,
    pub announcement: Option<String>,
}

impl EventOutcome {
    fn merge<T>(&mut self, response: &Response<T>) {
        self.prevent_default |= response.prevent_default;
        if let Some(text) = &response.announcement {
            self.announcement = Some(text.clone());
        }
    }
}

pub struct Board<S: Storage> {
    config: BoardConfig,
    store: KanbanStore<S>,
    bus: EventBus,
    columns: DraggableList<Column>,
    card_lists: HashMap<ColumnId, DraggableList<Card>>,
    clear_trigger: u64,
    known_column_count: usize,
}

impl<S: Storage> Board<S> {
    pub async fn open(storage: S, config: BoardConfig) -> Result<Self> {
        let store = KanbanStore::open(storage, &config).await?;
        Ok(Self::from_store(store, config))
    }

    pub fn from_store(store: KanbanStore<S>, config: BoardConfig) -> Self {
        let bus = EventBus::new();
        let mut columns = DraggableList::new(
            ListConfig::new(config.columns_list_id.as_str(), ListDirection::Horizontal)
                .with_label(config.columns_label.clone()),
        );
        columns.attach(&bus);

        let mut board = Self {
            config,
            store,
            bus,
            columns,
            card_lists: HashMap::new(),
            clear_trigger: 0,
            known_column_count: 0,
        };
        board.sync();
        board
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn store(&self) -> &KanbanStore<S> {
        &self.store
    }

    pub fn columns_list(&self) -> &DraggableList<Column> {
        &self.columns
    }

    pub fn card_list(&self, column: &ColumnId) -> Option<&DraggableList<Card>> {
        self.card_lists.get(column)
    }

    pub fn clear_trigger(&self) -> u64 {
        self.clear_trigger
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn drag_start(&mut self, item: &ItemRef) -> Result<DragData> {
        match item {
            ItemRef::Column(index) => self.columns.drag_start(*index),
            // Card drags never start a column drag
            ItemRef::Card { column, index } => self.card_list_mut(column)?.drag_start(*index),
        }
    }

    pub fn drag_over(&mut self, target: &DropTarget) {
        match target {
            DropTarget::Column(index) => {
                self.columns.drag_over(*index);
            }
            DropTarget::Card { column, index } => {
                if let Some(list) = self.card_lists.get_mut(column) {
                    list.drag_over(*index);
                }
            }
            DropTarget::ColumnsEnd | DropTarget::CardsEnd { .. } => {}
        }
    }

    pub async fn drop(&mut self, target: &DropTarget, data: &DragData) -> Result<EventOutcome> {
        let mut outcome = EventOutcome::default();
        match target {
            DropTarget::Column(index) => {
                let response = self.columns.drop(*index, data);
                outcome.merge(&response);
                self.apply_column_intents(response.intents).await?;
            }
            DropTarget::ColumnsEnd => {
                let response = self.columns.drop_at_end(data);
                outcome.merge(&response);
                self.apply_column_intents(response.intents).await?;
            }
            DropTarget::Card { column, .. } | DropTarget::CardsEnd { column } => {
                let Some(list) = self.card_lists.get_mut(column) else {
                    warn!(column = %column, "drop on unknown column, skipping");
                    return Ok(outcome);
                };
                let response = match target {
                    DropTarget::Card { index, .. } => list.drop(*index, data),
                    _ => list.drop_at_end(data),
                };
                outcome.merge(&response);
                self.apply_card_intents(column, response.intents).await?;
            }
        }
        Ok(outcome)
    }

    /// The drag that started on `source` ended. Every list is told, so
    /// lists that never saw the drop still clean up.
    pub fn drag_end(&mut self, source: &ItemRef) {
        match source {
            ItemRef::Column(_) => self.columns.drag_end(),
            ItemRef::Card { column, .. } => {
                if let Some(list) = self.card_lists.get_mut(column) {
                    list.drag_end();
                }
            }
        }
        self.publish(GlobalEvent::DragEnd);
    }

    /// Applies deferred re-clears due at `now` on every list
    pub fn poll_deferred(&mut self, now: Instant) {
        self.columns.poll_deferred(now);
        for list in self.card_lists.values_mut() {
            list.poll_deferred(now);
        }
    }

    pub async fn key_down(&mut self, item: &ItemRef, key: Key) -> Result<EventOutcome> {
        let mut outcome = EventOutcome::default();
        let column_index = match item {
            ItemRef::Column(index) => *index,
            ItemRef::Card { column, index } => {
                let response = self.card_list_mut(column)?.key_down(*index, key);
                outcome.merge(&response);
                let propagate = !response.stops_propagation();
                self.apply_card_intents(column, response.intents).await?;
                if !propagate {
                    return Ok(outcome);
                }
                match self.store.column_index(column) {
                    Some(index) => index,
                    None => return Ok(outcome),
                }
            }
        };

        let response = self.columns.key_down(column_index, key);
        outcome.merge(&response);
        self.apply_column_intents(response.intents).await?;
        Ok(outcome)
    }

    /// Escape pressed anywhere on the page
    pub fn escape_pressed(&mut self) {
        self.publish(GlobalEvent::Escape);
    }

    pub fn focus(&mut self, item: &ItemRef) {
        match item {
            ItemRef::Column(index) => self.columns.focus(*index),
            ItemRef::Card { column, index } => {
                if let Some(list) = self.card_lists.get_mut(column) {
                    list.focus(*index);
                }
                if let Some(column_index) = self.store.column_index(column) {
                    self.columns.focus(column_index);
                }
            }
        }
    }

    /// Focus left `item` for `next`, or for something off the board
    pub fn blur(&mut self, item: &ItemRef, next: Option<&ItemRef>) {
        let columns_id = self.columns.list_id().clone();
        let next_card_list = match next {
            Some(ItemRef::Card { column, .. }) => Some(ListId::from(column.as_str())),
            _ => None,
        };
        // Every item on the board lives inside the column list
        let next_in_columns = next.map(|_| &columns_id);

        if let ItemRef::Card { column, .. } = item {
            if let Some(list) = self.card_lists.get_mut(column) {
                list.blur(next_card_list.as_ref());
            }
        }
        self.columns.blur(next_in_columns);
    }

    pub async fn add_column(&mut self, title: impl Into<String>) -> Result<ColumnId> {
        let id = self.store.add_column(title).await?;
        self.sync();
        Ok(id)
    }

    pub async fn update_column(&mut self, id: &ColumnId, title: impl Into<String>) -> Result<()> {
        if self.store.column(id).is_none() {
            return Err(BoardError::ColumnNotFound(id.to_string()));
        }
        self.store.update_column(id, title).await?;
        self.sync();
        Ok(())
    }

    /// Deletes a column and its cards once the user confirms. Returns
    /// whether anything was deleted.
    pub async fn delete_column(&mut self, id: &ColumnId, confirm: &impl Confirm) -> Result<bool> {
        let Some(column) = self.store.column(id) else {
            return Ok(false);
        };
        let prompt = format!(
            "Delete column \"{}\"? This will also delete all cards in this column.",
            column.title
        );
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        self.store.delete_column(id).await?;
        self.sync();
        Ok(true)
    }

    pub async fn add_card(&mut self, card: NewCard) -> Result<CardId> {
        if self.store.column(&card.column_id).is_none() {
            return Err(BoardError::ColumnNotFound(card.column_id.to_string()));
        }
        let id = self.store.add_card(card).await?;
        self.sync();
        Ok(id)
    }

    pub async fn update_card(&mut self, id: &CardId, patch: CardPatch) -> Result<()> {
        if self.store.card(id).is_none() {
            return Err(BoardError::CardNotFound(id.to_string()));
        }
        self.store.update_card(id, patch).await?;
        self.sync();
        Ok(())
    }

    pub async fn delete_card(&mut self, id: &CardId, confirm: &impl Confirm) -> Result<bool> {
        if self.store.card(id).is_none() {
            return Ok(false);
        }
        if !confirm.confirm("Are you sure you want to delete this card?") {
            return Ok(false);
        }
        self.store.delete_card(id).await?;
        self.sync();
        Ok(true)
    }

    /// Applies a submitted column form. Returns false while the form is
    /// incomplete.
    pub async fn submit_column_form(&mut self, form: &ColumnForm) -> Result<bool> {
        let Some(title) = form.submit() else {
            return Ok(false);
        };
        match &form.mode {
            FormMode::Add => {
                self.add_column(title).await?;
            }
            FormMode::Edit(id) => self.update_column(id, title).await?,
        }
        Ok(true)
    }

    pub async fn submit_card_form(&mut self, form: &CardForm) -> Result<bool> {
        match &form.mode {
            FormMode::Add => {
                let Some(card) = form.submit() else {
                    return Ok(false);
                };
                self.add_card(card).await?;
            }
            FormMode::Edit(id) => {
                let Some(patch) = form.submit_patch() else {
                    return Ok(false);
                };
                self.update_card(id, patch).await?;
            }
        }
        Ok(true)
    }

    async fn apply_column_intents(&mut self, intents: Vec<Intent<Column>>) -> Result<()> {
        for intent in intents {
            match intent {
                Intent::Reorder { from, to } => {
                    self.store.reorder_columns(from, to).await?;
                    self.sync();
                }
                other => debug!(intent = ?other, "column list intent ignored"),
            }
        }
        Ok(())
    }

    async fn apply_card_intents(
        &mut self,
        column: &ColumnId,
        intents: Vec<Intent<Card>>,
    ) -> Result<()> {
        for intent in intents {
            match intent {
                Intent::Reorder { from, to } => self.reorder_card(column, from, to).await?,
                Intent::Move {
                    item,
                    target_list,
                    index,
                } => {
                    let target = ColumnId::from(target_list.as_str());
                    self.move_card(&item, &target, index).await?;
                }
                Intent::CrossMove { item, direction } => {
                    self.cross_move_card(&item, direction).await?
                }
                Intent::ItemGrabbed => {
                    self.columns.cancel_grab();
                }
            }
        }
        Ok(())
    }

    async fn reorder_card(&mut self, column: &ColumnId, from: usize, to: usize) -> Result<()> {
        let Some(card_id) = self
            .card_lists
            .get(column)
            .and_then(|list| list.items().get(from))
            .map(|card| card.id.clone())
        else {
            return Ok(());
        };

        let current = self
            .store
            .cards_for_column(column)
            .iter()
            .position(|card| card.id == card_id);
        if let Some(current) = current.filter(|current| *current != to) {
            self.store
                .reorder_cards_in_column(column, current, to)
                .await?;
            self.sync();
        }
        Ok(())
    }

    async fn move_card(&mut self, card: &Card, target: &ColumnId, index: usize) -> Result<()> {
        if self.store.column(target).is_none() {
            warn!(target = %target, card = %card.id, "target column does not exist");
            return Ok(());
        }
        self.store
            .move_card(&card.id, &card.column_id, target, index)
            .await?;
        self.sync();
        Ok(())
    }

    async fn cross_move_card(&mut self, card: &Card, direction: CrossDirection) -> Result<()> {
        let Some(current) = self.store.column_index(&card.column_id) else {
            return Ok(());
        };
        let forward = direction == CrossDirection::Right;
        let Some(target_index) =
            crate::domain::ordering::step(current, self.store.columns().len(), forward)
        else {
            return Ok(());
        };

        let target = self.store.columns()[target_index].id.clone();
        self.store
            .move_card(&card.id, &card.column_id, &target, 0)
            .await?;
        self.clear_trigger += 1;
        self.sync();
        Ok(())
    }

    fn card_list_mut(&mut self, column: &ColumnId) -> Result<&mut DraggableList<Card>> {
        self.card_lists
            .get_mut(column)
            .ok_or_else(|| BoardError::ColumnNotFound(column.to_string()))
    }

    fn publish(&mut self, event: GlobalEvent) {
        self.bus.publish(event);
        self.columns.process_global_events();
        for list in self.card_lists.values_mut() {
            list.process_global_events();
        }
    }

    /// Mirrors the store snapshot into every list
    fn sync(&mut self) {
        let state = self.store.snapshot();

        self.columns.set_items(state.columns.clone());
        self.card_lists
            .retain(|id, _| state.column(id).is_some());

        for column in &state.columns {
            let label = format!("Cards in {} column", column.title);
            let list = self.card_lists.entry(column.id.clone()).or_insert_with(|| {
                let mut list = DraggableList::new(
                    ListConfig::new(column.id.as_str(), ListDirection::Vertical)
                        .accepting_moves()
                        .with_cross_moves()
                        .notifying_grab(),
                );
                list.attach(&self.bus);
                list
            });
            list.set_label(label);
            list.set_items(state.cards_for_column(&column.id));
        }

        if state.columns.len() != self.known_column_count {
            self.known_column_count = state.columns.len();
            self.clear_trigger += 1;
        }
        self.columns.apply_clear_trigger(self.clear_trigger);
        for list in self.card_lists.values_mut() {
            list.apply_clear_trigger(self.clear_trigger);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn open() -> Board<MemoryStorage> {
        Board::open(MemoryStorage::new(), BoardConfig::default())
            .await
            .unwrap()
    }

    fn column_ids<S: Storage>(board: &Board<S>) -> Vec<String> {
        board
            .store()
            .columns()
            .iter()
            .map(|column| column.id.to_string())
            .collect()
    }

    fn card_ids<S: Storage>(board: &Board<S>, column: &str) -> Vec<String> {
        board
            .store()
            .cards_for_column(&ColumnId::from(column))
            .iter()
            .map(|card| card.id.to_string())
            .collect()
    }

    fn card(column: &str, index: usize) -> ItemRef {
        ItemRef::Card {
            column: ColumnId::from(column),
            index,
        }
    }

    fn yes(_: &str) -> bool {
        true
    }

    fn no(_: &str) -> bool {
        false
    }

    #[tokio::test]
    async fn test_open_builds_one_list_per_column() {
        let board = open().await;

        assert_eq!(board.columns_list().items().len(), 3);
        for column in ["todo", "doing", "done"] {
            let list = board.card_list(&ColumnId::from(column)).unwrap();
            assert_eq!(list.items().len(), card_ids(&board, column).len());
            assert!(list.is_attached());
        }
        assert_eq!(board.event_bus().listener_count(), 4);
        assert_eq!(
            board.card_list(&ColumnId::from("todo")).unwrap().config().label,
            "Cards in Todo column"
        );
    }

    #[tokio::test]
    async fn test_column_and_card_scenario() {
        let mut board = open().await;

        // Reorder columns by pointer: Todo to the last slot
        let data = board.drag_start(&ItemRef::Column(0)).unwrap();
        board.drop(&DropTarget::Column(2), &data).await.unwrap();
        board.drag_end(&ItemRef::Column(0));
        assert_eq!(column_ids(&board), vec!["doing", "done", "todo"]);

        // Drag the first Todo card to the front of Done
        let data = board.drag_start(&card("todo", 0)).unwrap();
        let outcome = board
            .drop(
                &DropTarget::Card {
                    column: ColumnId::from("done"),
                    index: 0,
                },
                &data,
            )
            .await
            .unwrap();
        assert!(outcome.prevent_default);
        let moved = board.store().card(&CardId::from("card-1")).unwrap();
        assert_eq!(moved.column_id.as_str(), "done");
        assert_eq!(card_ids(&board, "done")[0], "card-1");

        // Keyboard on the column list: ArrowRight reorders, never crosses lists
        board.key_down(&ItemRef::Column(1), Key::Space).await.unwrap();
        board
            .key_down(&ItemRef::Column(1), Key::ArrowRight)
            .await
            .unwrap();
        assert_eq!(column_ids(&board), vec!["doing", "todo", "done"]);
        assert_eq!(board.columns_list().state().grabbed_index, Some(2));
    }

    #[tokio::test]
    async fn test_delete_column_with_cards_scenario() {
        let mut board = open().await;
        let doing = ColumnId::from("doing");
        let todo_cards = card_ids(&board, "todo").len();
        let done_cards = card_ids(&board, "done").len();

        assert!(!board.delete_column(&doing, &no).await.unwrap());
        assert!(board.store().column(&doing).is_some());

        assert!(board.delete_column(&doing, &yes).await.unwrap());
        assert!(board.store().column(&doing).is_none());
        assert!(board.card_list(&doing).is_none());
        assert_eq!(board.store().cards().len(), todo_cards + done_cards);
        assert!(board.store().snapshot().is_consistent());
        assert_eq!(board.event_bus().listener_count(), 3);
    }

    #[tokio::test]
    async fn test_delete_prompts_are_shown() {
        let mut board = open().await;
        let seen = std::cell::RefCell::new(Vec::new());
        let record = |prompt: &str| {
            seen.borrow_mut().push(prompt.to_string());
            false
        };

        board
            .delete_column(&ColumnId::from("todo"), &record)
            .await
            .unwrap();
        board
            .delete_card(&CardId::from("card-1"), &record)
            .await
            .unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                "Delete column \"Todo\"? This will also delete all cards in this column."
                    .to_string(),
                "Are you sure you want to delete this card?".to_string(),
            ]
        );
        assert!(board.store().card(&CardId::from("card-1")).is_some());
    }

    #[tokio::test]
    async fn test_keyboard_card_reorder_within_column() {
        let mut board = open().await;

        board.key_down(&card("doing", 0), Key::Enter).await.unwrap();
        let outcome = board
            .key_down(&card("doing", 0), Key::ArrowDown)
            .await
            .unwrap();

        assert_eq!(card_ids(&board, "doing"), vec!["card-4", "card-3"]);
        assert_eq!(
            outcome.announcement.as_deref(),
            Some("Moved item to position 2")
        );
        let list = board.card_list(&ColumnId::from("doing")).unwrap();
        assert_eq!(list.state().grabbed_index, Some(1));
    }

    #[tokio::test]
    async fn test_keyboard_cross_move_lands_at_front_of_adjacent_column() {
        let mut board = open().await;
        let trigger = board.clear_trigger();

        board.key_down(&card("todo", 1), Key::Space).await.unwrap();
        board
            .key_down(&card("todo", 1), Key::ArrowRight)
            .await
            .unwrap();

        assert_eq!(card_ids(&board, "doing"), vec!["card-2", "card-3", "card-4"]);
        assert_eq!(card_ids(&board, "todo"), vec!["card-1"]);
        assert!(board.clear_trigger() > trigger);
        assert!(board
            .card_list(&ColumnId::from("doing"))
            .unwrap()
            .state()
            .is_idle());
    }

    #[tokio::test]
    async fn test_keyboard_cross_move_at_edge_is_noop() {
        let mut board = open().await;

        board.key_down(&card("todo", 0), Key::Space).await.unwrap();
        board
            .key_down(&card("todo", 0), Key::ArrowLeft)
            .await
            .unwrap();

        assert_eq!(card_ids(&board, "todo"), vec!["card-1", "card-2"]);
    }

    #[tokio::test]
    async fn test_grabbing_card_releases_grabbed_column() {
        let mut board = open().await;

        board.key_down(&ItemRef::Column(0), Key::Space).await.unwrap();
        assert_eq!(board.columns_list().state().grabbed_index, Some(0));

        board.key_down(&card("todo", 0), Key::Space).await.unwrap();

        assert_eq!(board.columns_list().state().grabbed_index, None);
        assert_eq!(board.columns_list().live_region(), Some("Move cancelled"));
        assert_eq!(
            board
                .card_list(&ColumnId::from("todo"))
                .unwrap()
                .state()
                .grabbed_index,
            Some(0)
        );
    }

    #[tokio::test]
    async fn test_card_arrow_keys_do_not_reach_column_list() {
        let mut board = open().await;
        board.key_down(&ItemRef::Column(0), Key::Space).await.unwrap();

        // Arrow on a non-grabbed card is swallowed by the card list
        board
            .key_down(&card("todo", 0), Key::ArrowRight)
            .await
            .unwrap();

        assert_eq!(column_ids(&board), vec!["todo", "doing", "done"]);
        assert_eq!(board.columns_list().state().grabbed_index, Some(0));
    }

    #[tokio::test]
    async fn test_unhandled_card_keys_propagate_to_column() {
        let mut board = open().await;
        board.key_down(&ItemRef::Column(0), Key::Space).await.unwrap();

        let outcome = board
            .key_down(&card("todo", 0), Key::Escape)
            .await
            .unwrap();

        assert_eq!(outcome.announcement.as_deref(), Some("Move cancelled"));
        assert!(board.columns_list().state().is_idle());
    }

    #[tokio::test]
    async fn test_drop_on_missing_column_is_skipped() {
        let mut board = open().await;
        let data = board.drag_start(&card("todo", 0)).unwrap();
        let before = board.store().snapshot();

        let target = DropTarget::Card {
            column: ColumnId::from("gone"),
            index: 0,
        };
        let outcome = board.drop(&target, &data).await.unwrap();
        assert_eq!(outcome, EventOutcome::default());

        let outcome = board
            .drop(
                &DropTarget::CardsEnd {
                    column: ColumnId::from("gone"),
                },
                &data,
            )
            .await
            .unwrap();
        assert_eq!(outcome, EventOutcome::default());
        assert_eq!(*board.store().snapshot(), *before);
    }

    #[tokio::test]
    async fn test_stale_move_target_is_ignored() {
        let mut board = open().await;
        let card = board.store().card(&CardId::from("card-1")).unwrap().clone();
        let before = board.store().snapshot();

        board
            .apply_card_intents(
                &ColumnId::from("todo"),
                vec![Intent::Move {
                    item: card,
                    target_list: ListId::from("deleted-column"),
                    index: 0,
                }],
            )
            .await
            .unwrap();

        assert_eq!(*board.store().snapshot(), *before);
    }

    #[tokio::test]
    async fn test_drop_in_end_zone_appends() {
        let mut board = open().await;
        let data = board.drag_start(&card("todo", 0)).unwrap();

        board
            .drop(
                &DropTarget::CardsEnd {
                    column: ColumnId::from("doing"),
                },
                &data,
            )
            .await
            .unwrap();

        assert_eq!(card_ids(&board, "doing"), vec!["card-3", "card-4", "card-1"]);
    }

    #[tokio::test]
    async fn test_drag_end_clears_every_list() {
        let mut board = open().await;
        let source = card("todo", 0);
        board.drag_start(&source).unwrap();
        board.drag_over(&DropTarget::Card {
            column: ColumnId::from("done"),
            index: 0,
        });

        board.drag_end(&source);

        for column in ["todo", "doing", "done"] {
            let state = board.card_list(&ColumnId::from(column)).unwrap().state();
            assert!(!state.is_dragging);
            assert_eq!(state.dragged_over_index, None);
        }
    }

    #[tokio::test]
    async fn test_removing_dragged_card_abandons_drag() {
        let mut board = open().await;
        board.drag_start(&card("doing", 1)).unwrap();

        board
            .delete_card(&CardId::from("card-4"), &yes)
            .await
            .unwrap();

        let list = board.card_list(&ColumnId::from("doing")).unwrap();
        assert!(list.state().is_idle());
        assert_eq!(list.items().len(), 1);
    }

    #[tokio::test]
    async fn test_adding_column_bumps_clear_trigger() {
        let mut board = open().await;
        board.key_down(&card("done", 0), Key::Space).await.unwrap();
        let trigger = board.clear_trigger();

        let id = board.add_column("Review").await.unwrap();

        assert_eq!(board.clear_trigger(), trigger + 1);
        assert!(board.card_list(&id).is_some());
        assert!(board
            .card_list(&ColumnId::from("done"))
            .unwrap()
            .state()
            .is_idle());
    }

    #[tokio::test]
    async fn test_escape_and_blur_release_grabs() {
        let mut board = open().await;
        board.key_down(&card("todo", 0), Key::Space).await.unwrap();
        board.escape_pressed();
        assert!(board
            .card_list(&ColumnId::from("todo"))
            .unwrap()
            .state()
            .is_idle());

        board.key_down(&card("todo", 0), Key::Space).await.unwrap();
        board.blur(&card("todo", 0), Some(&card("todo", 1)));
        assert_eq!(
            board
                .card_list(&ColumnId::from("todo"))
                .unwrap()
                .state()
                .grabbed_index,
            Some(0)
        );
        board.blur(&card("todo", 0), Some(&card("done", 0)));
        assert!(board
            .card_list(&ColumnId::from("todo"))
            .unwrap()
            .state()
            .is_idle());
    }

    #[tokio::test]
    async fn test_forms_drive_store() {
        let mut board = open().await;

        let mut form = ColumnForm::add();
        assert!(!board.submit_column_form(&form).await.unwrap());
        form.title = " Review ".to_string();
        assert!(board.submit_column_form(&form).await.unwrap());
        let review = board.store().columns().last().unwrap().clone();
        assert_eq!(review.title, "Review");

        let mut form = CardForm::add(review.id.clone());
        form.title = "Check PR".to_string();
        form.assignee = "Lee".to_string();
        assert!(board.submit_card_form(&form).await.unwrap());
        let added = board.store().cards_for_column(&review.id)[0].clone();

        let mut form = CardForm::edit(&added);
        form.title = "Check PR #2".to_string();
        assert!(board.submit_card_form(&form).await.unwrap());
        assert_eq!(
            board.store().card(&added.id).unwrap().title,
            "Check PR #2"
        );
        assert_eq!(
            board.card_list(&review.id).unwrap().items()[0].title,
            "Check PR #2"
        );

        form.assignee = " ".to_string();
        assert!(!board.submit_card_form(&form).await.unwrap());
        assert_eq!(board.store().card(&added.id).unwrap().assignee, "Lee");
    }

    #[tokio::test]
    async fn test_add_card_to_unknown_column_is_rejected() {
        let mut board = open().await;

        let result = board.add_card(NewCard::new("nowhere", "T", "A")).await;
        assert!(matches!(result, Err(BoardError::ColumnNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_of_missing_entities_is_rejected() {
        let mut board = open().await;

        let result = board
            .update_card(&CardId::from("ghost"), CardPatch::default())
            .await;
        assert!(matches!(result, Err(BoardError::CardNotFound(_))));

        let result = board.update_column(&ColumnId::from("ghost"), "X").await;
        assert!(matches!(result, Err(BoardError::ColumnNotFound(_))));
    }

    #[tokio::test]
    async fn test_global_events_reach_lists_created_later() {
        let mut board = open().await;
        let id = board.add_column("Later").await.unwrap();
        board
            .add_card(NewCard::new(id.clone(), "Late card", "Ida"))
            .await
            .unwrap();

        board
            .drag_start(&ItemRef::Card {
                column: id.clone(),
                index: 0,
            })
            .unwrap();
        board.publish(GlobalEvent::DragEnd);

        assert!(!board.card_list(&id).unwrap().state().is_dragging);
    }
}
