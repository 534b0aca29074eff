use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one list instance; carried in drag payloads to tell
/// same-list drops from cross-list drops.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListId(String);

impl ListId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ListId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Layout axis of a list; decides which arrow keys reorder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListDirection {
    #[default]
    Vertical,
    Horizontal,
}

/// Direction of a keyboard cross-move to an adjacent list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossDirection {
    Left,
    Right,
}

impl fmt::Display for CrossDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Keys the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    pub fn is_activation(self) -> bool {
        matches!(self, Self::Space | Self::Enter)
    }

    pub fn is_arrow(self) -> bool {
        matches!(
            self,
            Self::ArrowUp | Self::ArrowDown | Self::ArrowLeft | Self::ArrowRight
        )
    }
}

/// Maps DOM `KeyboardEvent.key` names
impl From<&str> for Key {
    fn from(name: &str) -> Self {
        match name {
            " " | "Spacebar" => Self::Space,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            _ => Self::Other,
        }
    }
}

/// A change the engine asks its owner to apply. The engine never mutates
/// the backing collection itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent<T> {
    /// Move the item at `from` to `to` within this list
    Reorder { from: usize, to: usize },
    /// Insert `item`, dragged out of another list, into `target_list`
    Move {
        item: T,
        target_list: ListId,
        index: usize,
    },
    /// Transfer `item` to the adjacent list in `direction`
    CrossMove { item: T, direction: CrossDirection },
    /// An item of this list was just grabbed with the keyboard
    ItemGrabbed,
}

/// Whether an event should continue to enclosing lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    #[default]
    Continue,
    Stop,
}

/// Drop effect exposed to assistive technology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Move,
    None,
}

impl DropEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::None => "none",
        }
    }
}

/// Outcome of one event handled by a list
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub intents: Vec<Intent<T>>,
    pub announcement: Option<String>,
    pub propagation: Propagation,
    pub prevent_default: bool,
}

impl<T> Response<T> {
    /// The event is not for this list
    pub fn ignored() -> Self {
        Self {
            intents: Vec::new(),
            announcement: None,
            propagation: Propagation::Continue,
            prevent_default: false,
        }
    }

    /// Handled here; stop propagation and suppress the default action
    pub fn consumed() -> Self {
        Self {
            propagation: Propagation::Stop,
            prevent_default: true,
            ..Self::ignored()
        }
    }

    /// Stop propagation only
    pub fn swallowed() -> Self {
        Self {
            propagation: Propagation::Stop,
            ..Self::ignored()
        }
    }

    pub fn with_intent(mut self, intent: Intent<T>) -> Self {
        self.intents.push(intent);
        self
    }

    pub fn with_announcement(mut self, text: impl Into<String>) -> Self {
        self.announcement = Some(text.into());
        self
    }

    pub fn stops_propagation(&self) -> bool {
        self.propagation == Propagation::Stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom_names() {
        assert_eq!(Key::from(" "), Key::Space);
        assert_eq!(Key::from("Enter"), Key::Enter);
        assert_eq!(Key::from("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from("Tab"), Key::Other);
        assert!(Key::Enter.is_activation());
        assert!(Key::ArrowDown.is_arrow());
        assert!(!Key::Escape.is_arrow());
    }

    #[test]
    fn test_response_builders() {
        let response: Response<()> = Response::consumed().with_announcement("done");
        assert!(response.stops_propagation());
        assert!(response.prevent_default);
        assert_eq!(response.announcement.as_deref(), Some("done"));

        let response: Response<()> = Response::swallowed();
        assert!(response.stops_propagation());
        assert!(!response.prevent_default);

        assert!(!Response::<()>::ignored().stops_propagation());
    }
}
