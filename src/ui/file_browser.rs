use std::fs;
use std::path::PathBuf;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::config::Theme;
use crate::library::MediaFormat;

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Directory picker. Shows folders and playable media files only.
pub struct FileBrowser {
    pub current_dir: PathBuf,
    pub entries: Vec<DirEntry>,
    pub selected: usize,
    pub scroll_offset: usize,
    pub error: Option<String>,
    pub parent_selected: bool, // True when ".." is selected
    marked: Vec<PathBuf>,
}

impl FileBrowser {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
        Self::at(home)
    }

    pub fn at(dir: PathBuf) -> Self {
        let mut browser = Self {
            current_dir: dir,
            entries: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            error: None,
            parent_selected: false,
            marked: Vec::new(),
        };
        browser.refresh();
        browser
    }

    pub fn refresh(&mut self) {
        self.entries.clear();
        self.error = None;

        match fs::read_dir(&self.current_dir) {
            Ok(read_dir) => {
                let mut dirs: Vec<DirEntry> = Vec::new();
                let mut files: Vec<DirEntry> = Vec::new();

                for entry in read_dir.flatten() {
                    let path = entry.path();
                    let name = entry.file_name().to_string_lossy().to_string();

                    if name.starts_with('.') {
                        continue;
                    }

                    let is_dir = path.is_dir();
                    if !is_dir && MediaFormat::from_path(&path) == MediaFormat::Unknown {
                        continue;
                    }

                    let entry = DirEntry { name, path, is_dir };
                    if is_dir {
                        dirs.push(entry);
                    } else {
                        files.push(entry);
                    }
                }

                dirs.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
                files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

                self.entries = dirs;
                self.entries.extend(files);
            }
            Err(e) => {
                self.error = Some(format!("Cannot read directory: {}", e));
            }
        }

        self.selected = 0;
        self.scroll_offset = 0;
        self.parent_selected = false;
    }

    pub fn move_up(&mut self) {
        if self.parent_selected {
            return;
        }

        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            }
        } else {
            // Above the first entry sits ".."
            self.parent_selected = true;
            self.scroll_offset = 0;
        }
    }

    pub fn move_down(&mut self, visible_height: usize) {
        if self.parent_selected {
            self.parent_selected = false;
            self.selected = 0;
            return;
        }

        if !self.entries.is_empty() && self.selected < self.entries.len() - 1 {
            self.selected += 1;
            if self.selected >= self.scroll_offset + visible_height {
                self.scroll_offset = self.selected - visible_height + 1;
            }
        }
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent() {
            let old_dir = self.current_dir.clone();
            self.current_dir = parent.to_path_buf();
            self.refresh();

            // Keep the cursor on the directory we came from
            if let Some(old_name) = old_dir.file_name() {
                let old_name = old_name.to_string_lossy();
                if let Some(idx) = self.entries.iter().position(|e| e.name == old_name) {
                    self.selected = idx;
                }
            }
        }
    }

    /// Navigate into the selected directory. Returns false on a file.
    pub fn enter(&mut self) -> bool {
        if self.parent_selected {
            self.go_up();
            return true;
        }

        if let Some(entry) = self.entries.get(self.selected) {
            if entry.is_dir {
                self.current_dir = entry.path.clone();
                self.refresh();
                return true;
            }
        }
        false
    }

    /// Folder to scan: the selected directory, otherwise the one being shown.
    pub fn get_load_path(&self) -> PathBuf {
        if self.parent_selected {
            return self
                .current_dir
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| self.current_dir.clone());
        }

        if let Some(entry) = self.entries.get(self.selected) {
            if entry.is_dir {
                return entry.path.clone();
            }
        }
        self.current_dir.clone()
    }

    /// Mark or unmark the file under the cursor. Marks keep the order they
    /// were made in and survive directory changes.
    pub fn toggle_mark(&mut self) -> bool {
        if self.parent_selected {
            return false;
        }
        let Some(entry) = self.entries.get(self.selected) else {
            return false;
        };
        if entry.is_dir {
            return false;
        }

        match self.marked.iter().position(|p| *p == entry.path) {
            Some(idx) => {
                self.marked.remove(idx);
            }
            None => self.marked.push(entry.path.clone()),
        }
        true
    }

    pub fn is_marked(&self, entry: &DirEntry) -> bool {
        self.marked.contains(&entry.path)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    pub fn take_marked(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.marked)
    }
}

impl Default for FileBrowser {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FileBrowserWidget<'a> {
    browser: &'a FileBrowser,
    theme: &'a Theme,
}

impl<'a> FileBrowserWidget<'a> {
    pub fn new(browser: &'a FileBrowser, theme: &'a Theme) -> Self {
        Self { browser, theme }
    }
}

impl Widget for FileBrowserWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let theme = self.theme;
        let width = (area.width * 70 / 100).clamp(40.min(area.width), 80);
        let height = (area.height * 70 / 100).clamp(10.min(area.height), 30);
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;

        let dialog_area = Rect::new(x, y, width, height);
        Clear.render(dialog_area, buf);

        let title = if self.browser.marked_count() > 0 {
            format!(" Select Media ({} marked) ", self.browser.marked_count())
        } else {
            String::from(" Select Media ")
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dialog_border));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);
        if inner.width < 10 || inner.height < 5 {
            return;
        }
        let text_width = inner.width as usize - 2;

        let path_str = self.browser.current_dir.display().to_string();
        let path_style = Style::default().fg(theme.warning);
        buf.set_string(inner.x + 1, inner.y, tail(&path_str, text_width), path_style);

        let sep = "─".repeat(text_width);
        buf.set_string(inner.x + 1, inner.y + 1, &sep, Style::default().fg(theme.foreground_dim));

        if let Some(ref error) = self.browser.error {
            buf.set_string(inner.x + 1, inner.y + 2, error, Style::default().fg(theme.warning));
            return;
        }

        let list_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height.saturating_sub(4));
        let visible_count = list_area.height as usize;
        let selected_style = Style::default().fg(theme.selection_fg).bg(theme.selection_bg);

        if self.browser.scroll_offset == 0 && visible_count > 0 {
            let parent_style = if self.browser.parent_selected {
                selected_style
            } else {
                Style::default().fg(theme.accent)
            };
            if self.browser.parent_selected {
                buf.set_string(list_area.x + 1, list_area.y, " ".repeat(text_width), parent_style);
            }
            let indicator = if self.browser.parent_selected { "> " } else { "  " };
            let parent_line = Line::from(vec![
                Span::styled(indicator, parent_style),
                Span::styled("..", parent_style.add_modifier(Modifier::BOLD)),
            ]);
            buf.set_line(list_area.x + 1, list_area.y, &parent_line, text_width as u16);
        }

        let entries_start_y = if self.browser.scroll_offset == 0 { 1 } else { 0 };
        let scroll = self
            .browser
            .scroll_offset
            .saturating_sub(if self.browser.scroll_offset > 0 { 1 } else { 0 });

        for (i, entry) in self
            .browser
            .entries
            .iter()
            .skip(scroll)
            .take(visible_count.saturating_sub(entries_start_y))
            .enumerate()
        {
            let y_pos = list_area.y + (entries_start_y + i) as u16;
            let is_selected = !self.browser.parent_selected && i + scroll == self.browser.selected;
            let marked = self.browser.is_marked(entry);

            let style = if is_selected {
                selected_style
            } else if entry.is_dir {
                Style::default().fg(theme.accent)
            } else if marked {
                Style::default().fg(theme.success)
            } else {
                Style::default().fg(theme.foreground)
            };

            let indicator = if is_selected { ">" } else { " " };
            let tag = if entry.is_dir {
                "/"
            } else if marked {
                "*"
            } else {
                " "
            };
            let line_text = format!("{}{} {}", indicator, tag, entry.name);

            if is_selected {
                buf.set_string(list_area.x + 1, y_pos, " ".repeat(text_width), style);
            }
            buf.set_stringn(list_area.x + 1, y_pos, &line_text, text_width, style);
        }

        let footer_y = inner.y + inner.height - 2;
        buf.set_string(inner.x + 1, footer_y, &sep, Style::default().fg(theme.foreground_dim));

        let key = Style::default().fg(theme.hint_key);
        let hint = Style::default().fg(theme.hint_text);
        let controls = Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(":Open  ", hint),
            Span::styled("Space", key),
            Span::styled(":Mark  ", hint),
            Span::styled("m", key),
            Span::styled(":Load marked  ", hint),
            Span::styled("l/Tab", key),
            Span::styled(":Load folder  ", hint),
            Span::styled("Esc", key),
            Span::styled(":Cancel", hint),
        ]);
        buf.set_line(inner.x + 1, footer_y + 1, &controls, text_width as u16);
    }
}

fn tail(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        format!("...{}", s.chars().skip(count - keep).collect::<String>())
    }
}
