mod app;
mod config;
mod device;
mod events;
mod library;
mod player;
mod store;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use events::Action;

/// Log to a file: the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let path = config::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {}", e);
    }

    // Startup errors print before the terminal is taken over
    let mut app = App::new()?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        error!(error = %e, "event loop failed");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| {
            ui::render(app, frame.area(), frame.buffer_mut());
        })?;

        app.process_scan_events();

        // Position checkpoints, auto-advance and deferred starts
        app.process_device_events();

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        let action = if app.is_editing_text() {
                            Action::from_text_key(key)
                        } else {
                            Action::from_key_event(key)
                        };
                        app.handle_action(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    let action = match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            Action::MouseClick { x: mouse.column, y: mouse.row }
                        }
                        MouseEventKind::ScrollUp => {
                            Action::MouseScrollUp { x: mouse.column, y: mouse.row }
                        }
                        MouseEventKind::ScrollDown => {
                            Action::MouseScrollDown { x: mouse.column, y: mouse.row }
                        }
                        _ => Action::None,
                    };
                    if action != Action::None {
                        app.handle_action(action)?;
                    }
                }
                _ => {}
            }
        }
    }

    Ok(())
}
