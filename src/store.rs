//! Ordered-collection store: the single owner of board state.
//!
//! Every mutation clones the current snapshot, applies one transformation
//! from [`BoardState`], swaps the result in and persists it. Readers hold
//! `Arc<BoardState>` snapshots and never observe a half-applied change.

use crate::{
    config::BoardConfig,
    domain::{BoardState, Card, CardId, CardPatch, Column, ColumnId, NewCard},
    error::{BoardError, Result},
    storage::Storage,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const STATE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    version: u32,
    saved_at: DateTime<Utc>,
    state: BoardState,
}

/// Decodes a persisted value. Accepts the versioned envelope as well as a
/// bare `{ columns, cards }` document.
pub fn decode_state(raw: &str) -> Result<BoardState> {
    let value: serde_json::Value = serde_json::from_str(raw)?;

    if value.get("version").is_some() {
        let persisted: PersistedState = serde_json::from_value(value)?;
        if persisted.version != STATE_VERSION {
            return Err(BoardError::UnsupportedPayloadVersion {
                found: persisted.version,
                expected: STATE_VERSION,
            });
        }
        return Ok(persisted.state);
    }

    Ok(serde_json::from_value(value)?)
}

/// Encodes state in the versioned envelope
pub fn encode_state(state: &BoardState) -> Result<String> {
    let persisted = PersistedState {
        version: STATE_VERSION,
        saved_at: Utc::now(),
        state: state.clone(),
    };
    Ok(serde_json::to_string(&persisted)?)
}

pub struct KanbanStore<S: Storage> {
    storage: S,
    storage_key: String,
    state: Arc<BoardState>,
}

impl<S: Storage> KanbanStore<S> {
    /// Opens the store, restoring the persisted state when it is present
    /// and readable and falling back to the seed dataset otherwise.
    pub async fn open(storage: S, config: &BoardConfig) -> Result<Self> {
        let mut state = match storage.read(&config.storage_key).await? {
            Some(raw) => match decode_state(&raw) {
                Ok(state) => {
                    debug!(
                        key = %config.storage_key,
                        columns = state.columns.len(),
                        cards = state.cards.len(),
                        "restored board state"
                    );
                    state
                }
                Err(e) => {
                    warn!(key = %config.storage_key, error = %e, "failed to parse stored board state, using seed data");
                    BoardState::seed()
                }
            },
            None => BoardState::seed(),
        };

        if !state.is_consistent() {
            let dropped = state.prune_orphan_cards();
            warn!(key = %config.storage_key, dropped, "stored cards referenced missing columns");
        }

        let store = Self {
            storage,
            storage_key: config.storage_key.clone(),
            state: Arc::new(state),
        };
        store.persist().await?;
        Ok(store)
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    pub fn columns(&self) -> &[Column] {
        &self.state.columns
    }

    pub fn cards(&self) -> &[Card] {
        &self.state.cards
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.state.column(id)
    }

    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.state.column_index(id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.state.card(id)
    }

    pub fn cards_for_column(&self, column_id: &ColumnId) -> Vec<Card> {
        self.state.cards_for_column(column_id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn add_column(&mut self, title: impl Into<String>) -> Result<ColumnId> {
        let title = title.into();
        let id = self.transition(|state| state.add_column(title)).await?;
        debug!(column = %id, "column added");
        Ok(id)
    }

    pub async fn update_column(&mut self, id: &ColumnId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        if self.state.column(id).is_none() {
            return Ok(());
        }
        self.transition(|state| state.update_column(id, title)).await?;
        Ok(())
    }

    pub async fn delete_column(&mut self, id: &ColumnId) -> Result<()> {
        if self.state.column(id).is_none() {
            return Ok(());
        }
        let removed = self.transition(|state| state.delete_column(id)).await?;
        debug!(column = %id, cards_removed = removed.unwrap_or(0), "column deleted");
        Ok(())
    }

    pub async fn reorder_columns(&mut self, from: usize, to: usize) -> Result<()> {
        self.transition(|state| state.reorder_columns(from, to)).await
    }

    pub async fn add_card(&mut self, card: NewCard) -> Result<CardId> {
        let id = self.transition(|state| state.add_card(card)).await?;
        debug!(card = %id, "card added");
        Ok(id)
    }

    pub async fn update_card(&mut self, id: &CardId, patch: CardPatch) -> Result<()> {
        if self.state.card(id).is_none() {
            return Ok(());
        }
        self.transition(|state| state.update_card(id, patch)).await?;
        Ok(())
    }

    pub async fn delete_card(&mut self, id: &CardId) -> Result<()> {
        if self.state.card(id).is_none() {
            return Ok(());
        }
        self.transition(|state| state.delete_card(id)).await?;
        Ok(())
    }

    /// Moves a card into `to_column` at `new_index`. `from_column` is only
    /// used for diagnostics; the source is the card's current column.
    pub async fn move_card(
        &mut self,
        card_id: &CardId,
        from_column: &ColumnId,
        to_column: &ColumnId,
        new_index: usize,
    ) -> Result<()> {
        match self.state.card(card_id) {
            None => return Ok(()),
            Some(card) if &card.column_id != from_column => {
                debug!(card = %card_id, expected = %from_column, actual = %card.column_id, "card source column differs from caller's view");
            }
            Some(_) => {}
        }
        self.transition(|state| state.move_card(card_id, to_column, new_index))
            .await?;
        debug!(card = %card_id, to = %to_column, index = new_index, "card moved");
        Ok(())
    }

    pub async fn reorder_cards_in_column(
        &mut self,
        column_id: &ColumnId,
        from: usize,
        to: usize,
    ) -> Result<()> {
        self.transition(|state| state.reorder_cards_in_column(column_id, from, to))
            .await
    }

    async fn transition<R>(&mut self, apply: impl FnOnce(&mut BoardState) -> R) -> Result<R> {
        let mut next = BoardState::clone(&self.state);
        let result = apply(&mut next);
        self.state = Arc::new(next);
        self.persist().await?;
        Ok(result)
    }

    async fn persist(&self) -> Result<()> {
        let raw = encode_state(&self.state)?;
        self.storage.write(&self.storage_key, &raw).await
    }
}
