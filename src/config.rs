use serde::{Deserialize, Serialize};

/// Board configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Heading shown by the host above the board
    pub title: String,
    /// Persistence slot holding the serialized board
    pub storage_key: String,
    /// List id of the column list. Card lists use their column id.
    pub columns_list_id: String,
    /// Accessible name of the column list
    pub columns_label: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            title: "Kanban Board".to_string(),
            storage_key: "kanban-board-state".to_string(),
            columns_list_id: "columns".to_string(),
            columns_label: "Kanban columns".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }
}
