//! Library domain module

mod item;
#[allow(clippy::module_inception)]
mod library;

pub use item::{IdGenerator, ItemId, RecordedItem};
pub use library::Library;
