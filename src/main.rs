mod app;
mod config;
mod content;
mod error;
mod event;
mod games;
mod geometry;
mod profiles;
mod progress;
mod sampling;
mod screens;
mod storage;
mod ui;

use std::fs;
use std::io;
use std::path::Path;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use config::Config;
use content::LevelCatalog;
use event::{Event, EventHandler};
use storage::{Store, STORE_FILE};

const LOG_FILE: &str = "wordcade.log";
const LOG_ENV: &str = "WORDCADE_LOG";

/// The terminal belongs to the UI, so logs go to a file in the data directory.
fn init_logging(data_dir: &Path, default_level: &str) {
    let file = match fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("wordcade: logging disabled: {}", e);
            return;
        }
    };
    let env = env_logger::Env::new().filter_or(LOG_ENV, default_level);
    if let Err(e) = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
    {
        eprintln!("wordcade: logging disabled: {}", e);
    }
}

fn load_catalog(config: &Config) -> LevelCatalog {
    let Some(path) = &config.levels_file else {
        return LevelCatalog::bundled();
    };
    match LevelCatalog::load(path) {
        Ok(catalog) if !catalog.is_empty() => {
            log::info!("Loaded {} levels from {}", catalog.levels.len(), path.display());
            catalog
        }
        Ok(_) => {
            log::warn!("{} has no levels; using the bundled catalog", path.display());
            LevelCatalog::bundled()
        }
        Err(e) => {
            log::error!("Could not load {}: {}; using the bundled catalog", path.display(), e);
            LevelCatalog::bundled()
        }
    }
}

fn main() -> io::Result<()> {
    let config = Config::load();
    let data_dir = config.data_dir();
    if let Err(e) = fs::create_dir_all(&data_dir) {
        eprintln!("wordcade: cannot create {}: {}", data_dir.display(), e);
    }
    init_logging(&data_dir, &config.log_level);
    log::info!("Starting wordcade {}", env!("CARGO_PKG_VERSION"));

    let store = Store::open_or_empty(data_dir.join(STORE_FILE));
    let catalog = load_catalog(&config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(&config, catalog, store);
    let event_handler = EventHandler::new(games::TICK_MS);

    // Main loop
    loop {
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        match event_handler.next()? {
            Event::Tick => app.on_tick(),
            Event::Key(key) => app.on_key(key),
            Event::Resize(w, h) => log::debug!("Resized to {}x{}", w, h),
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match app.progress.save(&mut app.store) {
        Ok(()) => {
            if let Some(path) = app.store.path() {
                log::info!("Progress saved to {}", path.display());
            }
        }
        Err(e) => log::error!("Failed to save progress on exit: {}", e),
    }
    log::info!("Bye");

    Ok(())
}
