use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Row, Table, Widget},
};

use crate::app::{App, InputMode};

/// The playlist: one row per rendered list entry.
pub struct TrackListPanel<'a> {
    app: &'a App,
}

impl<'a> TrackListPanel<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for TrackListPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = &self.app.theme;
        let list = self.app.session.list();
        let is_active = self.app.input_mode == InputMode::Normal;
        let border_style = if is_active {
            Style::default().fg(theme.border_active)
        } else {
            Style::default().fg(theme.border_inactive)
        };

        let watched = list.entries().iter().filter(|e| e.watched).count();
        let title = format!(" Playlist ({}/{} watched) ", watched, list.len());

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let inner = block.inner(area);
        block.render(area, buf);

        if list.is_empty() {
            let hint_style = Style::default().fg(theme.foreground_dim);
            buf.set_string(inner.x + 1, inner.y + 1, "Nothing selected", hint_style);
            buf.set_string(
                inner.x + 1,
                inner.y + 2,
                "Press 'o' to pick files or a folder",
                hint_style,
            );
            return;
        }

        let header_height = 1;
        let visible_rows = inner.height.saturating_sub(header_height) as usize;

        let header_style = Style::default()
            .fg(theme.header)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(vec!["", "Name", "Type"])
            .style(header_style)
            .height(1);

        let playlist = self.app.session.playlist();
        let rows: Vec<Row> = list
            .entries()
            .iter()
            .enumerate()
            .skip(self.app.list_offset)
            .take(visible_rows)
            .map(|(i, entry)| {
                let is_selected = i == self.app.cursor;

                let style = if is_selected && is_active {
                    Style::default()
                        .fg(theme.selection_fg)
                        .bg(theme.selection_bg)
                        .add_modifier(Modifier::BOLD)
                } else if entry.playing {
                    Style::default()
                        .fg(theme.item_playing)
                        .add_modifier(Modifier::BOLD)
                } else if entry.watched {
                    Style::default().fg(theme.item_watched)
                } else {
                    Style::default().fg(theme.item_unwatched)
                };

                let format = playlist
                    .get(i)
                    .map(|item| item.format.label())
                    .unwrap_or("");

                Row::new(vec![
                    entry.indicator().to_string(),
                    entry.name.clone(),
                    format.to_string(),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Min(10),
            Constraint::Length(5),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1);

        Widget::render(table, inner, buf);
    }
}
