use std::path::PathBuf;

use anyhow::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::{database_path, AppConfig, Database, Theme};
use crate::device::RodioDevice;
use crate::events::Action;
use crate::library::{MediaItem, ScanEvent, Scanner};
use crate::player::{parse_skip_seconds, PlayerSession};
use crate::store::{MemoryJar, RecordStore, Records, SqliteJar};
use crate::ui::FileBrowser;

pub type Session = PlayerSession<RodioDevice, Box<dyn RecordStore>>;

/// Cached layout areas for mouse hit testing
#[derive(Default, Clone, Copy)]
pub struct LayoutAreas {
    pub track_list: Rect,
    pub skip_button: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    FileBrowser,
    EditSkip,
    Help,
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub input_buffer: String,

    pub session: Session,
    /// Paths of the current selection, in pick order.
    pub selection: Vec<PathBuf>,

    pub cursor: usize,
    pub list_offset: usize,

    pub config: AppConfig,
    pub db: Database,
    pub theme: Theme,
    pub status_message: Option<String>,

    pub scan_rx: Option<mpsc::Receiver<ScanEvent>>,
    /// Last error reported by the running scan.
    pub scan_error: Option<String>,
    pub file_browser: Option<FileBrowser>,

    pub layout_areas: LayoutAreas,
}

impl App {
    pub fn new() -> Result<Self> {
        let db_path = database_path()?;
        let db = Database::open(&db_path)?;
        let config = db.load_config()?;

        let store: Box<dyn RecordStore> = match SqliteJar::open(&db_path) {
            Ok(jar) => Box::new(jar),
            Err(e) => {
                warn!(error = %e, "record database unavailable, keeping records in memory");
                Box::new(MemoryJar::new())
            }
        };
        let device = RodioDevice::new()?;
        let mut session = PlayerSession::new(device, Records::new(store));

        let initial = Scanner::select_files(&db.load_selection()?);
        let selection = paths_of(&initial);
        session.bootstrap(initial);

        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),

            session,
            selection,

            cursor: 0,
            list_offset: 0,

            config,
            db,
            theme: Theme::default(),
            status_message: None,

            scan_rx: None,
            scan_error: None,
            file_browser: None,

            layout_areas: LayoutAreas::default(),
        };
        app.follow_current_item();

        if let Some(current) = app.session.state().current.clone() {
            app.status_message = Some(format!("Resuming {}", current));
        }
        info!(items = app.selection.len(), "app started");
        Ok(app)
    }

    /// True while a text field owns the keyboard.
    pub fn is_editing_text(&self) -> bool {
        self.input_mode == InputMode::EditSkip
    }

    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_action(action)?,
            InputMode::FileBrowser => self.handle_file_browser_action(action)?,
            InputMode::EditSkip => self.handle_edit_skip_action(action)?,
            InputMode::Help => self.handle_help_action(action),
        }
        Ok(())
    }

    fn handle_normal_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.quit()?,

            Action::Up => self.move_cursor_up(),
            Action::Down => self.move_cursor_down(),
            Action::Enter => self.play_at_cursor(),

            Action::PlayPause => {
                self.session.toggle_pause();
            }
            Action::NextItem => {
                if self.session.next() {
                    self.follow_current_item();
                }
            }
            Action::PrevItem => {
                if self.session.previous() {
                    self.follow_current_item();
                }
            }
            Action::Skip => self.skip(),

            Action::OpenBrowser => {
                self.file_browser = Some(FileBrowser::new());
                self.input_mode = InputMode::FileBrowser;
            }
            Action::EditSkip => {
                self.input_buffer = self.config.skip_seconds.clone();
                self.input_mode = InputMode::EditSkip;
            }
            Action::Help => self.input_mode = InputMode::Help,

            Action::MouseClick { x, y } => self.handle_mouse_click(x, y),
            Action::MouseScrollUp { x, y } => self.handle_mouse_scroll(x, y, true),
            Action::MouseScrollDown { x, y } => self.handle_mouse_scroll(x, y, false),

            _ => {}
        }
        Ok(())
    }

    fn handle_file_browser_action(&mut self, action: Action) -> Result<()> {
        let Some(ref mut browser) = self.file_browser else {
            self.input_mode = InputMode::Normal;
            return Ok(());
        };

        match action {
            Action::Escape | Action::Quit => {
                self.file_browser = None;
                self.input_mode = InputMode::Normal;
            }
            Action::Up => browser.move_up(),
            Action::Down => browser.move_down(20), // Approximate visible height
            Action::Backspace | Action::Left => browser.go_up(),
            Action::Enter | Action::Right => {
                if !browser.enter() {
                    browser.toggle_mark();
                }
            }
            Action::PlayPause => {
                browser.toggle_mark();
            }
            Action::Char('m') => {
                let marked = browser.take_marked();
                self.file_browser = None;
                self.input_mode = InputMode::Normal;
                self.load_files(&marked);
            }
            Action::Tab | Action::Char('l') => {
                let path = browser.get_load_path();
                self.file_browser = None;
                self.input_mode = InputMode::Normal;
                self.load_folder(path);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_edit_skip_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Escape => {
                self.input_buffer.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::Enter => {
                self.config.skip_seconds = std::mem::take(&mut self.input_buffer);
                self.input_mode = InputMode::Normal;
                if let Err(e) = self.db.save_config(&self.config) {
                    warn!(error = %e, "failed to save settings");
                }
                self.status_message = Some(format!(
                    "Skip set to {} seconds",
                    parse_skip_seconds(&self.config.skip_seconds)
                ));
            }
            Action::Backspace => {
                self.input_buffer.pop();
            }
            Action::Char(c) => self.input_buffer.push(c),
            Action::Quit => self.quit()?,
            _ => {}
        }
        Ok(())
    }

    fn handle_help_action(&mut self, action: Action) {
        match action {
            Action::Escape | Action::Help | Action::Quit | Action::Enter => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn skip(&mut self) {
        if self.session.skip(&self.config.skip_seconds) {
            self.status_message = Some(format!(
                "Skipped {:+} s",
                parse_skip_seconds(&self.config.skip_seconds)
            ));
        }
    }

    fn play_at_cursor(&mut self) {
        let Some(id) = self.session.list().get(self.cursor).map(|e| e.id.clone()) else {
            return;
        };
        if !self.session.play(&id) {
            self.status_message = Some(format!("Cannot play {}", id));
        }
    }

    pub fn load_folder(&mut self, path: PathBuf) {
        if !path.is_dir() {
            self.status_message = Some("Invalid folder path".to_string());
            return;
        }

        self.status_message = Some(format!("Scanning: {}", path.display()));

        let (tx, rx) = mpsc::channel(16);
        self.scan_rx = Some(rx);
        self.scan_error = None;

        tokio::spawn(async move {
            if let Err(e) = Scanner::scan_folder(&path, tx).await {
                warn!(path = %path.display(), error = %e, "folder scan failed");
            }
        });
    }

    pub fn load_files(&mut self, paths: &[PathBuf]) {
        let items = Scanner::select_files(paths);
        if items.is_empty() {
            self.status_message = Some("No playable files marked".to_string());
            return;
        }
        let count = items.len();
        self.apply_selection(items);
        self.status_message = Some(format!("Loaded {} files", count));
    }

    fn apply_selection(&mut self, items: Vec<MediaItem>) {
        self.selection = paths_of(&items);
        if let Err(e) = self.db.save_selection(&self.selection) {
            warn!(error = %e, "failed to save selection");
        }

        self.session.on_selection_changed(items);
        self.cursor = 0;
        self.list_offset = 0;
        self.follow_current_item();
    }

    pub fn process_scan_events(&mut self) {
        let events: Vec<ScanEvent> = if let Some(rx) = &mut self.scan_rx {
            let mut events = Vec::new();
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
            events
        } else {
            return;
        };

        for event in events {
            match event {
                ScanEvent::Complete { folder, items } => {
                    self.scan_rx = None;
                    let failure = self.scan_error.take();
                    if items.is_empty() {
                        self.status_message = Some(empty_scan_status(&folder, failure));
                        continue;
                    }
                    let count = items.len();
                    self.apply_selection(items);
                    self.status_message = Some(format!("Loaded {} items from {}", count, folder));
                }
                ScanEvent::Error { path, error } => {
                    let message = format!("Error: {} - {}", path, error);
                    self.status_message = Some(message.clone());
                    self.scan_error = Some(message);
                }
            }
        }
    }

    /// Feed device notifications to the player. Keeps the cursor on the
    /// playing row when playback advances on its own.
    pub fn process_device_events(&mut self) {
        let before = self.session.state().current.clone();
        if self.session.pump_device_events() == 0 {
            return;
        }
        if self.session.state().current != before {
            self.follow_current_item();
            if let Some(current) = &self.session.state().current {
                self.status_message = Some(format!("Now playing {}", current));
            }
        }
    }

    fn follow_current_item(&mut self) {
        let index = self
            .session
            .state()
            .current
            .as_deref()
            .and_then(|id| self.session.playlist().index_of(id));
        if let Some(index) = index {
            self.cursor = index;
            self.ensure_cursor_visible();
        }
    }

    fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.cursor < self.list_offset {
                self.list_offset = self.cursor;
            }
        }
    }

    fn move_cursor_down(&mut self) {
        if self.cursor + 1 < self.session.list().len() {
            self.cursor += 1;
            self.ensure_cursor_visible();
        }
    }

    fn visible_rows(&self) -> usize {
        let area = self.layout_areas.track_list;
        // Borders and the header row
        area.height.saturating_sub(3) as usize
    }

    fn ensure_cursor_visible(&mut self) {
        let visible_rows = self.visible_rows();
        if visible_rows == 0 {
            return;
        }

        if self.cursor >= self.list_offset + visible_rows {
            self.list_offset = self.cursor - visible_rows + 1;
        }
        if self.cursor < self.list_offset {
            self.list_offset = self.cursor;
        }
    }

    fn quit(&mut self) -> Result<()> {
        self.db.save_config(&self.config)?;
        self.db.save_selection(&self.selection)?;
        info!("quitting");
        self.running = false;
        Ok(())
    }

    pub fn update_layout_areas(&mut self, areas: LayoutAreas) {
        self.layout_areas = areas;
    }

    fn handle_mouse_click(&mut self, x: u16, y: u16) {
        let areas = self.layout_areas;

        if Self::point_in_rect(x, y, areas.skip_button) {
            self.skip();
        } else if Self::point_in_rect(x, y, areas.track_list) {
            if let Some(index) = self.row_at(y, areas.track_list) {
                self.cursor = index;
                self.play_at_cursor();
            }
        }
    }

    /// Playlist index of the row drawn at screen line `y`, if any.
    fn row_at(&self, y: u16, area: Rect) -> Option<usize> {
        // Top border plus header row
        let first_row_y = area.y + 2;
        let last_row_y = area.y + area.height.saturating_sub(1);
        if y < first_row_y || y >= last_row_y {
            return None;
        }
        let index = self.list_offset + (y - first_row_y) as usize;
        (index < self.session.list().len()).then_some(index)
    }

    fn handle_mouse_scroll(&mut self, x: u16, y: u16, up: bool) {
        if !Self::point_in_rect(x, y, self.layout_areas.track_list) {
            return;
        }
        if up {
            self.move_cursor_up();
        } else {
            self.move_cursor_down();
        }
    }

    fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
        x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
    }
}

/// Status for a scan that found nothing. A read error from the same scan
/// takes precedence.
fn empty_scan_status(folder: &str, failure: Option<String>) -> String {
    failure.unwrap_or_else(|| format!("No media found in {}", folder))
}

fn paths_of(items: &[MediaItem]) -> Vec<PathBuf> {
    items.iter().map(|i| i.handle.path().to_path_buf()).collect()
}
