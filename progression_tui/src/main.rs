//! progression_tui - Interactive TUI for playing through progression choices

mod app;
mod ui;

use app::App;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::File;
use std::io;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "progression_tui.log";

/// Log to a file so the alternate screen stays clean
fn init_logging() -> io::Result<()> {
    let file = File::create(LOG_FILE)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging()?;

    // Optional argument: path to a progression config
    let config_path = std::env::args().nth(1);
    let mut app = match config_path {
        Some(path) => App::from_config_file(&path).map_err(io::Error::other)?,
        None => App::new(),
    };
    info!(
        skills = app.session.progression().skills().len(),
        save = %app.store.path().display(),
        "progression_tui started"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
            (KeyCode::Tab, _) => app.next_tab(),
            (KeyCode::BackTab, _) => app.prev_tab(),
            (KeyCode::Char(c @ '1'..='9'), _) => app.on_digit(c as usize - '1' as usize),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.on_up(),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.on_down(),
            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => app.on_enter(),
            (KeyCode::Char('x'), _) => app.gain_xp(),
            (KeyCode::Char('L'), _) => app.gain_level(),
            (KeyCode::Char('r'), _) => app.reroll(),
            (KeyCode::Char('d'), _) => app.dismiss(),
            (KeyCode::Char('c'), _) => app.resume(),
            (KeyCode::Char('s'), _) => app.save(),
            (KeyCode::Char('l'), _) => app.load(),
            (KeyCode::Char('R'), _) => app.reset(),
            (KeyCode::Char('?'), _) => app.toggle_help(),
            _ => {}
        }
        app.refresh_preview();
    }

    Ok(())
}
