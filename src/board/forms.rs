//! Add/edit form models. Rendering is up to the host; these hold the
//! field values and decide when a form may be submitted.

use crate::domain::{Card, CardId, CardPatch, Column, ColumnId, NewCard, Priority};

/// What a submitted form creates or updates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Add,
    Edit(Id),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnForm {
    pub mode: FormMode<ColumnId>,
    pub title: String,
}

impl ColumnForm {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
        }
    }

    pub fn edit(column: &Column) -> Self {
        Self {
            mode: FormMode::Edit(column.id.clone()),
            title: column.title.clone(),
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Trimmed title, or `None` while the form is incomplete
    pub fn submit(&self) -> Option<String> {
        self.can_submit().then(|| self.title.trim().to_string())
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Column",
            FormMode::Edit(_) => "Update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardForm {
    pub mode: FormMode<CardId>,
    pub column_id: ColumnId,
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub priority: Priority,
}

impl CardForm {
    pub fn add(column_id: ColumnId) -> Self {
        Self {
            mode: FormMode::Add,
            column_id,
            title: String::new(),
            description: String::new(),
            assignee: String::new(),
            priority: Priority::default(),
        }
    }

    pub fn edit(card: &Card) -> Self {
        Self {
            mode: FormMode::Edit(card.id.clone()),
            column_id: card.column_id.clone(),
            title: card.title.clone(),
            description: card.description.clone().unwrap_or_default(),
            assignee: card.assignee.clone(),
            priority: card.priority,
        }
    }

    /// Title and assignee are required
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && !self.assignee.trim().is_empty()
    }

    pub fn submit(&self) -> Option<NewCard> {
        if !self.can_submit() {
            return None;
        }
        let description = self.description.trim();
        Some(NewCard {
            column_id: self.column_id.clone(),
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            assignee: self.assignee.trim().to_string(),
            priority: self.priority,
        })
    }

    pub fn submit_patch(&self) -> Option<CardPatch> {
        self.submit().map(CardPatch::from)
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add",
            FormMode::Edit(_) => "Update",
        }
    }
}
