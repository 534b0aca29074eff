//! Drag payload codec.
//!
//! A drag carries two fields, mirroring the platform's drag-data channel:
//! a plain-text `"<listId>:<index>"` key and a versioned JSON envelope
//! holding a full copy of the dragged item. The key tells the target
//! whether the drag came from itself; cross-list moves need the item copy because the
//! target list cannot look the item up in another list's collection.

use crate::{
    dnd::types::ListId,
    error::{BoardError, Result},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    item: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    item: serde_json::Value,
}

/// Data attached to one drag operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragData {
    pub text: String,
    pub json: Option<String>,
}

impl DragData {
    /// Builds the payload for dragging `item` out of position `index`
    pub fn encode<T: Serialize>(list_id: &ListId, index: usize, item: &T) -> Result<Self> {
        let json = serde_json::to_string(&EnvelopeRef {
            version: PAYLOAD_VERSION,
            item,
        })?;
        Ok(Self {
            text: format!("{list_id}:{index}"),
            json: Some(json),
        })
    }

    /// Rebuilds a payload from the raw format fields of a host event
    pub fn from_parts(text: impl Into<String>, json: Option<String>) -> Self {
        Self {
            text: text.into(),
            json,
        }
    }

    /// Source list id and index encoded in the text field
    pub fn source(&self) -> Result<(ListId, usize)> {
        let (list, index) = self
            .text
            .rsplit_once(':')
            .ok_or_else(|| BoardError::InvalidDragPayload(format!("missing separator in {:?}", self.text)))?;
        if list.is_empty() {
            return Err(BoardError::InvalidDragPayload(format!(
                "empty list id in {:?}",
                self.text
            )));
        }
        let index = index
            .parse::<usize>()
            .map_err(|_| BoardError::InvalidDragPayload(format!("bad index in {:?}", self.text)))?;
        Ok((ListId::from(list), index))
    }

    /// Decodes the item copy from the JSON field
    pub fn decode_item<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self
            .json
            .as_deref()
            .ok_or_else(|| BoardError::InvalidDragPayload("missing item data".to_string()))?;
        let envelope: Envelope = serde_json::from_str(raw)?;
        if envelope.version != PAYLOAD_VERSION {
            return Err(BoardError::UnsupportedPayloadVersion {
                found: envelope.version,
                expected: PAYLOAD_VERSION,
            });
        }
        Ok(serde_json::from_value(envelope.item)?)
    }
}
