pub mod card;
pub mod column;
pub mod ordering;
pub mod state;

pub use card::{Card, CardId, CardPatch, NewCard, Priority};
pub use column::{Column, ColumnId};
pub use state::BoardState;
