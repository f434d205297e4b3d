use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{domain::UserId, errors::Error, Result};

/// Stored in place of a missing `@handle`.
pub const HANDLE_NONE: &str = "none";

/// A curated text message kept by the operator.
///
/// Field order is the CSV column order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMessage {
    pub timestamp: String,
    pub sender_id: i64,
    pub display_name: String,
    pub handle: String,
    pub text: String,
}

impl SavedMessage {
    pub fn sender(&self) -> UserId {
        UserId(self.sender_id)
    }
}

/// Ordered, position-addressed archive.
///
/// Positions are dense: deleting an entry shifts every later entry down by one.
#[derive(Clone, Debug, Default)]
pub struct SavedMessageArchive {
    items: Vec<SavedMessage>,
}

impl SavedMessageArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, msg: SavedMessage) {
        self.items.push(msg);
    }

    /// Remove the entry at `index`. Out of range is a no-op.
    pub fn delete_at(&mut self, index: usize) -> Option<SavedMessage> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&SavedMessage> {
        self.items.get(index)
    }

    pub fn list(&self) -> &[SavedMessage] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn unique_senders(&self) -> usize {
        self.items
            .iter()
            .map(|m| m.sender_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// CSV document with a header row, even when the archive is empty.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        wtr.write_record(["timestamp", "sender_id", "display_name", "handle", "text"])?;
        for msg in &self.items {
            wtr.serialize(msg)?;
        }
        wtr.flush()?;
        wtr.into_inner()
            .map_err(|e| Error::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
    }
}
