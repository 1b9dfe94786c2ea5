use crate::library::{ItemId, Playlist, WatchedSet};

/// One row of the playlist as the user sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: ItemId,
    pub name: String,
    pub watched: bool,
    pub playing: bool,
}

impl ListEntry {
    pub fn indicator(&self) -> &'static str {
        if self.playing {
            "▶"
        } else if self.watched {
            "✓"
        } else {
            "☐"
        }
    }
}

/// The rendered playlist. Every render replaces all entries.
#[derive(Debug, Default)]
pub struct ListView {
    entries: Vec<ListEntry>,
    renders: u64,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, playlist: &Playlist, watched: &WatchedSet, current: Option<&str>) {
        self.entries = playlist
            .items()
            .iter()
            .map(|item| ListEntry {
                id: item.name.clone(),
                name: item.name.clone(),
                watched: watched.is_watched(&item.name),
                playing: current == Some(item.name.as_str()),
            })
            .collect();
        self.renders += 1;
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ListEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times the list has been rebuilt.
    #[cfg(test)]
    pub fn renders(&self) -> u64 {
        self.renders
    }
}
