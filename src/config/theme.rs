use ratatui::style::Color;

/// The fixed colour palette of the player.
#[derive(Debug, Clone)]
pub struct Theme {
    pub foreground: Color,
    pub foreground_dim: Color,

    pub border_active: Color,
    pub border_inactive: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,

    pub accent: Color,
    pub success: Color,
    pub warning: Color,

    // Playlist rows
    pub item_playing: Color,
    pub item_watched: Color,
    pub item_unwatched: Color,
    pub header: Color,

    pub progress_bar_filled: Color,
    pub progress_bar_empty: Color,
    pub skip_button: Color,

    pub dialog_border: Color,
    pub input_bg: Color,
    pub input_fg: Color,

    pub hint_key: Color,
    pub hint_text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            foreground_dim: Color::DarkGray,

            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            selection_bg: Color::Cyan,
            selection_fg: Color::Black,

            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,

            item_playing: Color::Green,
            item_watched: Color::Gray,
            item_unwatched: Color::White,
            header: Color::Yellow,

            progress_bar_filled: Color::Cyan,
            progress_bar_empty: Color::DarkGray,
            skip_button: Color::Magenta,

            dialog_border: Color::Cyan,
            input_bg: Color::DarkGray,
            input_fg: Color::White,

            hint_key: Color::Yellow,
            hint_text: Color::DarkGray,
        }
    }
}
