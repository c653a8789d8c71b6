//! Recorded item entity and its identifier

use std::fmt;

use crate::domain::recording::{LocationRef, PlaybackHandle, RecordingFileName};

/// Unique, time-derived identifier of a recorded item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues item ids from a millisecond clock reading.
///
/// Ids are strictly increasing: two calls within the same millisecond (or
/// after the clock steps backwards) still get distinct ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Next id for the given clock reading
    pub fn next(&mut self, now_ms: u64) -> ItemId {
        let raw = match self.last {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last = Some(raw);
        ItemId(raw)
    }
}

/// A successfully persisted recording, ready to be replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedItem {
    pub id: ItemId,
    pub file_name: RecordingFileName,
    pub location: LocationRef,
    pub playback: PlaybackHandle,
}
