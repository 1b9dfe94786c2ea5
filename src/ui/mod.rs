pub mod file_browser;
pub mod layout;
pub mod now_playing;
pub mod track_list;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::app::{App, InputMode, LayoutAreas};
use crate::config::Theme;

pub use file_browser::{FileBrowser, FileBrowserWidget};
pub use layout::AppLayout;
pub use now_playing::NowPlayingPanel;
pub use track_list::TrackListPanel;

pub fn render(app: &mut App, area: Rect, buf: &mut Buffer) {
    let layout = AppLayout::new(area);

    let mut layout_areas = LayoutAreas {
        track_list: layout.track_list,
        ..Default::default()
    };

    render_header(app, layout.header, buf);

    // Populates the skip button area
    NowPlayingPanel::new(app).render(layout.now_playing, buf, &mut layout_areas);
    app.update_layout_areas(layout_areas);

    TrackListPanel::new(app).render(layout.track_list, buf);
    render_footer(app, layout.footer, buf);

    match app.input_mode {
        InputMode::FileBrowser => {
            if let Some(ref browser) = app.file_browser {
                FileBrowserWidget::new(browser, &app.theme).render(area, buf);
            }
        }
        InputMode::EditSkip => render_input_dialog(
            app,
            "Skip",
            "Seconds to jump forward:",
            area,
            buf,
        ),
        InputMode::Help => render_help_dialog(&app.theme, area, buf),
        InputMode::Normal => {}
    }
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = &app.theme;
    let title_style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);

    let title = Line::from(vec![
        Span::styled(" Playr ", title_style),
        Span::styled("│", Style::default().fg(theme.foreground_dim)),
        Span::styled(" Press ", Style::default().fg(theme.foreground_dim)),
        Span::styled("?", Style::default().fg(theme.hint_key)),
        Span::styled(" for help", Style::default().fg(theme.foreground_dim)),
    ]);

    buf.set_line(area.x, area.y, &title, area.width);
}

fn render_footer(app: &App, area: Rect, buf: &mut Buffer) {
    let theme = &app.theme;
    let hint_style = Style::default().fg(theme.hint_text);
    let key_style = Style::default().fg(theme.hint_key);

    let line1 = Line::from(vec![
        Span::styled(" ", hint_style),
        Span::styled("o", key_style),
        Span::styled(":Open  ", hint_style),
        Span::styled("Enter", key_style),
        Span::styled(":Play  ", hint_style),
        Span::styled("Space", key_style),
        Span::styled(":Pause  ", hint_style),
        Span::styled("n/p", key_style),
        Span::styled(":Next/Prev  ", hint_style),
        Span::styled("s", key_style),
        Span::styled(":Skip  ", hint_style),
        Span::styled("e", key_style),
        Span::styled(":Skip secs  ", hint_style),
        Span::styled("q", key_style),
        Span::styled(":Quit", hint_style),
    ]);

    buf.set_line(area.x, area.y, &line1, area.width);

    if let Some(ref msg) = app.status_message {
        if area.height > 1 {
            let status_style = Style::default().fg(theme.success);
            buf.set_stringn(
                area.x + 1,
                area.y + 1,
                msg,
                area.width.saturating_sub(2) as usize,
                status_style,
            );
        }
    }
}

/// Centered box of at most `width` x `height` inside `area`.
fn dialog_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn render_input_dialog(app: &App, title: &str, prompt: &str, area: Rect, buf: &mut Buffer) {
    let theme = &app.theme;
    let dialog_area = dialog_rect(area, 50, 5);
    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);
    if inner.height < 3 {
        return;
    }

    buf.set_string(inner.x + 1, inner.y, prompt, Style::default().fg(theme.foreground));

    let input_style = Style::default().fg(theme.input_fg).bg(theme.input_bg);
    let input_text = format!("{}_", &app.input_buffer);
    buf.set_string(inner.x + 1, inner.y + 1, &input_text, input_style);

    let hint_style = Style::default().fg(theme.hint_text);
    buf.set_string(inner.x + 1, inner.y + 2, "Enter to confirm, Esc to cancel", hint_style);
}

fn render_help_dialog(theme: &Theme, area: Rect, buf: &mut Buffer) {
    let dialog_area = dialog_rect(area, 50, 20);
    Clear.render(dialog_area, buf);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dialog_border));

    let inner = block.inner(dialog_area);
    block.render(dialog_area, buf);

    let help_text = [
        "Playlist:",
        "  j/k or ↑/↓     Move cursor",
        "  Enter / click  Play item",
        "  n / p          Next / previous item",
        "  Space          Pause / resume",
        "  s              Skip forward",
        "  e              Set skip seconds",
        "",
        "Picking media:",
        "  o              Open file browser",
        "  Space          Mark file",
        "  m              Load marked files",
        "  l / Tab        Load whole folder",
        "",
        "  ✓ watched  ☐ unwatched  ▶ current",
        "",
        "Press Esc to close",
    ];

    let desc_style = Style::default().fg(theme.foreground);
    let header_style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);

    for (i, line) in help_text.iter().enumerate() {
        if i as u16 >= inner.height {
            break;
        }

        let style = if line.ends_with(':') && !line.starts_with(' ') {
            header_style
        } else {
            desc_style
        };

        buf.set_string(inner.x + 1, inner.y + i as u16, line, style);
    }
}
