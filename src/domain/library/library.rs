//! Ordered collection of recorded items

use crate::domain::recording::{LocationRef, PlaybackHandle, RecordingFileName};

use super::item::{IdGenerator, ItemId, RecordedItem};

/// Recorded items in insertion order, keyed by id.
///
/// Append-only except for removal; ids are never reused.
#[derive(Debug, Default)]
pub struct Library {
    items: Vec<RecordedItem>,
    ids: IdGenerator,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new item at the end and return its freshly assigned id
    pub fn append(
        &mut self,
        now_ms: u64,
        file_name: RecordingFileName,
        location: LocationRef,
        playback: PlaybackHandle,
    ) -> ItemId {
        let id = self.ids.next(now_ms);
        self.items.push(RecordedItem {
            id,
            file_name,
            location,
            playback,
        });
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&RecordedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Swap the playback handle of an item, returning the old one
    pub fn replace_playback(
        &mut self,
        id: ItemId,
        playback: PlaybackHandle,
    ) -> Option<PlaybackHandle> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| std::mem::replace(&mut item.playback, playback))
    }

    /// Remove an item, keeping the relative order of the rest
    pub fn remove(&mut self, id: ItemId) -> Option<RecordedItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[RecordedItem] {
        &self.items
    }

    /// Item at a zero-based position
    pub fn at(&self, index: usize) -> Option<&RecordedItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
