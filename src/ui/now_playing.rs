use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::app::{App, LayoutAreas};
use crate::config::Theme;
use crate::device::PlaybackDevice;
use crate::player::{parse_skip_seconds, Phase};

pub struct NowPlayingPanel<'a> {
    app: &'a App,
}

impl<'a> NowPlayingPanel<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }

    fn format_time(secs: f64) -> String {
        let secs = secs.max(0.0) as u64;
        format!("{}:{:02}", secs / 60, secs % 60)
    }

    pub fn render(self, area: Rect, buf: &mut Buffer, layout_areas: &mut LayoutAreas) {
        let theme = &self.app.theme;

        let block = Block::default()
            .title(" Now Playing ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_inactive));

        let inner = block.inner(area);
        block.render(area, buf);
        layout_areas.skip_button = Rect::default();

        let session = &self.app.session;
        let Some(item) = session.current_item() else {
            let dim = Style::default().fg(theme.foreground_dim);
            buf.set_string(inner.x + 1, inner.y + 1, "Nothing playing", dim);
            buf.set_string(inner.x + 1, inner.y + 2, "Select an item and press Enter", dim);
            return;
        };
        if inner.width < 4 || inner.height < 4 {
            return;
        }
        let text_width = inner.width as usize - 2;

        let title_style = Style::default()
            .fg(theme.foreground)
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(inner.x + 1, inner.y, &item.name, text_width, title_style);

        let state = session.state();
        let phase = match state.phase {
            Phase::Idle => "Idle",
            Phase::Loaded => "Paused",
            Phase::Playing => "Playing",
            Phase::Ended => "Ended",
        };
        let detail = format!("{}  {}", item.format.label(), phase);
        buf.set_stringn(
            inner.x + 1,
            inner.y + 1,
            &detail,
            text_width,
            Style::default().fg(theme.accent),
        );

        let progress_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
        self.render_progress(progress_area, buf, theme);

        if state.skip_offered {
            let label = format!("[Skip {:+}s]", parse_skip_seconds(&self.app.config.skip_seconds));
            let x = inner.x + 1;
            let y = inner.y + 4;
            if y < inner.y + inner.height {
                buf.set_string(x, y, &label, Style::default().fg(theme.skip_button).add_modifier(Modifier::BOLD));
                layout_areas.skip_button = Rect::new(x, y, label.chars().count() as u16, 1);
            }
        }
    }

    fn render_progress(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let device = self.app.session.device();
        let position = device.current_time();
        let duration = device.duration();

        let position_str = Self::format_time(position);
        let duration_str = duration.map(Self::format_time).unwrap_or_else(|| String::from("--:--"));

        let time_style = Style::default().fg(theme.foreground_dim);
        buf.set_string(area.x + 1, area.y, &position_str, time_style);

        let duration_x = (area.x + area.width).saturating_sub(duration_str.len() as u16 + 1);
        buf.set_string(duration_x, area.y, &duration_str, time_style);

        let bar_start = area.x + position_str.len() as u16 + 2;
        let bar_end = duration_x.saturating_sub(1);
        let bar_width = bar_end.saturating_sub(bar_start) as usize;
        if bar_width <= 2 {
            return;
        }

        let progress = match duration {
            Some(d) if d > 0.0 => (position / d).clamp(0.0, 1.0),
            _ => 0.0,
        };
        let filled = ((progress * bar_width as f64) as usize).min(bar_width);

        buf.set_string(
            bar_start,
            area.y,
            "━".repeat(filled),
            Style::default().fg(theme.progress_bar_filled),
        );
        buf.set_string(
            bar_start + filled as u16,
            area.y,
            "─".repeat(bar_width - filled),
            Style::default().fg(theme.progress_bar_empty),
        );
    }
}
