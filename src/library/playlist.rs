use tracing::warn;

use super::media::{ItemId, MediaItem};

/// Ordered items of the current selection batch.
///
/// The playlist is only ever replaced as a whole. Order is selection order and
/// duplicate display names are kept as-is; lookups resolve to the first one.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    items: Vec<MediaItem>,
    generation: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new batch without touching watched state.
    pub fn replace(&mut self, items: Vec<MediaItem>) {
        self.items = items;
        self.generation += 1;
    }

    /// Install a new batch and forget what was watched.
    pub fn rebuild(&mut self, items: Vec<MediaItem>, watched: &mut WatchedSet) {
        self.replace(items);
        watched.clear();
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == id)
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn item(&self, id: &str) -> Option<&MediaItem> {
        self.index_of(id).and_then(|idx| self.items.get(idx))
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Selection batch counter; bumped on every replace.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Watched flags keyed by item identifier, in the order they were first set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchedSet {
    entries: Vec<(ItemId, bool)>,
}

impl WatchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_watched(&mut self, id: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == id) {
            Some(entry) => entry.1 = true,
            None => self.entries.push((id.to_string(), true)),
        }
    }

    pub fn is_watched(&self, id: &str) -> bool {
        self.entries
            .iter()
            .find(|(name, _)| name == id)
            .is_some_and(|(_, watched)| *watched)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Snapshot as `[["a.mp4",true],...]`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| String::from("[]"))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<(ItemId, bool)> = serde_json::from_str(json)?;
        let mut set = Self::new();
        for (id, watched) in entries {
            match set.entries.iter_mut().find(|(name, _)| *name == id) {
                Some(entry) => entry.1 = watched,
                None => set.entries.push((id, watched)),
            }
        }
        Ok(set)
    }

    /// Restore from a persisted snapshot; anything unreadable yields an empty set.
    pub fn restore(snapshot: Option<&str>) -> Self {
        let Some(json) = snapshot else {
            return Self::new();
        };
        match Self::from_json(json) {
            Ok(set) => set,
            Err(e) => {
                warn!(error = %e, "discarding unreadable watched snapshot");
                Self::new()
            }
        }
    }
}
