use crate::domain::{
    card::{Card, CardId, CardPatch, NewCard, Priority},
    column::{Column, ColumnId},
    ordering,
};
use serde::{Deserialize, Serialize};

/// Complete board contents: the ordered columns and every card.
///
/// Column order is the order of `columns`. Card order inside a column is
/// the relative order of that column's entries in `cards`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub columns: Vec<Column>,
    pub cards: Vec<Card>,
}

impl BoardState {
    pub fn new(columns: Vec<Column>, cards: Vec<Card>) -> Self {
        Self { columns, cards }
    }

    /// Built-in dataset used when nothing usable has been persisted
    pub fn seed() -> Self {
        let card = |id: &str, column: &str, title: &str, assignee: &str, priority| {
            NewCard::new(column, title, assignee)
                .with_priority(priority)
                .into_card(CardId::from(id))
        };

        Self {
            columns: vec![
                Column::new("todo", "Todo"),
                Column::new("doing", "Doing"),
                Column::new("done", "Done"),
            ],
            cards: vec![
                card("card-1", "todo", "Design board layout", "Alice", Priority::High),
                card("card-2", "todo", "Write onboarding guide", "Bob", Priority::Low),
                card("card-3", "doing", "Keyboard reordering", "Carol", Priority::High),
                card("card-4", "doing", "Persist board state", "Dave", Priority::Medium),
                card("card-5", "done", "Project setup", "Alice", Priority::Medium),
            ],
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| &column.id == id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|column| &column.id == id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|card| &card.id == id)
    }

    /// Ordered cards of one column
    pub fn cards_for_column(&self, column_id: &ColumnId) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|card| &card.column_id == column_id)
            .cloned()
            .collect()
    }

    pub fn add_column(&mut self, title: String) -> ColumnId {
        let id = ColumnId::generate();
        self.columns.push(Column {
            id: id.clone(),
            title,
        });
        id
    }

    /// Renames a column. Returns false when the id is unknown.
    pub fn update_column(&mut self, id: &ColumnId, title: String) -> bool {
        match self.columns.iter_mut().find(|column| &column.id == id) {
            Some(column) => {
                column.title = title;
                true
            }
            None => false,
        }
    }

    /// Removes a column together with its cards. Returns the number of
    /// cards removed, or `None` when the column is unknown.
    pub fn delete_column(&mut self, id: &ColumnId) -> Option<usize> {
        let index = self.column_index(id)?;
        self.columns.remove(index);

        let before = self.cards.len();
        self.cards.retain(|card| &card.column_id != id);
        Some(before - self.cards.len())
    }

    pub fn reorder_columns(&mut self, from: usize, to: usize) {
        ordering::reorder(&mut self.columns, from, to);
    }

    pub fn add_card(&mut self, card: NewCard) -> CardId {
        let id = CardId::generate();
        self.cards.push(card.into_card(id.clone()));
        id
    }

    pub fn update_card(&mut self, id: &CardId, patch: CardPatch) -> bool {
        match self.cards.iter_mut().find(|card| &card.id == id) {
            Some(card) => {
                card.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete_card(&mut self, id: &CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| &card.id != id);
        before != self.cards.len()
    }

    /// Relocates a card to `to_column` at `new_index` within that column's
    /// cards. The index is clamped to the column's card count. Returns
    /// false when the card is unknown.
    pub fn move_card(&mut self, card_id: &CardId, to_column: &ColumnId, new_index: usize) -> bool {
        let Some(position) = self.cards.iter().position(|card| &card.id == card_id) else {
            return false;
        };
        let mut moved = self.cards.remove(position);
        moved.column_id = to_column.clone();

        let (target, mut rest): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.cards)
            .into_iter()
            .partition(|card| &card.column_id == to_column);

        let split = new_index.min(target.len());
        let mut target = target.into_iter();
        rest.extend(target.by_ref().take(split));
        rest.push(moved);
        rest.extend(target);

        self.cards = rest;
        true
    }

    /// Reorders the cards of one column; cards of other columns keep their
    /// relative order.
    pub fn reorder_cards_in_column(&mut self, column_id: &ColumnId, from: usize, to: usize) {
        let (mut column_cards, mut rest): (Vec<Card>, Vec<Card>) = std::mem::take(&mut self.cards)
            .into_iter()
            .partition(|card| &card.column_id == column_id);

        ordering::reorder(&mut column_cards, from, to);
        rest.extend(column_cards);
        self.cards = rest;
    }

    /// True when every card references an existing column
    pub fn is_consistent(&self) -> bool {
        self.cards
            .iter()
            .all(|card| self.column(&card.column_id).is_some())
    }

    /// Removes cards whose column does not exist. Returns how many went.
    pub fn prune_orphan_cards(&mut self) -> usize {
        let before = self.cards.len();
        let columns = &self.columns;
        self.cards
            .retain(|card| columns.iter().any(|column| column.id == card.column_id));
        before - self.cards.len()
    }
}
