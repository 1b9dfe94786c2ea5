use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub now_playing: Rect,
    pub track_list: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(7), // Now playing
                Constraint::Min(5),    // Playlist
                Constraint::Length(2), // Footer
            ])
            .split(area);

        Self {
            header: main_chunks[0],
            now_playing: main_chunks[1],
            track_list: main_chunks[2],
            footer: main_chunks[3],
        }
    }
}
