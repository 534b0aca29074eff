use crate::domain::column::ColumnId;
use crate::dnd::DragItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a card
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    const PREFIX: &'static str = "card";

    /// Generates a fresh, session-unique card id
    pub fn generate() -> Self {
        Self(format!("{}-{}", Self::PREFIX, Uuid::new_v4()))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Card priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A kanban card. Its position inside a column is its relative position
/// among the board's cards that share its `column_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assignee: String,
    pub priority: Priority,
}

impl Card {
    /// Applies the fields present in `patch`
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(assignee) = patch.assignee {
            self.assignee = assignee;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

impl DragItem for Card {
    fn drag_id(&self) -> &str {
        self.id.as_str()
    }

    fn drag_label(&self) -> Option<&str> {
        Some(&self.title)
    }
}

/// A card that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    pub assignee: String,
    pub priority: Priority,
}

impl NewCard {
    pub fn new(
        column_id: impl Into<ColumnId>,
        title: impl Into<String>,
        assignee: impl Into<String>,
    ) -> Self {
        Self {
            column_id: column_id.into(),
            title: title.into(),
            description: None,
            assignee: assignee.into(),
            priority: Priority::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub(crate) fn into_card(self, id: CardId) -> Card {
        Card {
            id,
            column_id: self.column_id,
            title: self.title,
            description: self.description,
            assignee: self.assignee,
            priority: self.priority,
        }
    }
}

/// Partial card update. `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
}

impl From<NewCard> for CardPatch {
    fn from(card: NewCard) -> Self {
        Self {
            title: Some(card.title),
            description: Some(card.description),
            assignee: Some(card.assignee),
            priority: Some(card.priority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Card {
        NewCard::new("todo", "Write docs", "Ana")
            .with_description("API reference")
            .with_priority(Priority::High)
            .into_card(CardId::from("c1"))
    }

    #[test]
    fn test_card_uses_camel_case_fields() {
        let json = serde_json::to_string(&sample()).unwrap();

        assert!(json.contains(r#""columnId":"todo""#));
        assert!(json.contains(r#""priority":"High""#));
    }

    #[test]
    fn test_missing_description_deserializes() {
        let json = r#"{
            "id": "c9",
            "columnId": "done",
            "title": "Ship",
            "assignee": "Bo",
            "priority": "Low"
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.description, None);
        assert_eq!(card.priority, Priority::Low);
    }

    #[test]
    fn test_apply_patch_merges_present_fields() {
        let mut card = sample();
        card.apply(CardPatch {
            title: Some("Write more docs".to_string()),
            ..CardPatch::default()
        });

        assert_eq!(card.title, "Write more docs");
        assert_eq!(card.assignee, "Ana");
        assert_eq!(card.description.as_deref(), Some("API reference"));
    }

    #[test]
    fn test_apply_patch_can_clear_description() {
        let mut card = sample();
        card.apply(CardPatch {
            description: Some(None),
            ..CardPatch::default()
        });

        assert!(card.description.is_none());
    }
}
