//! TUI runtime.
//!
//! # Error Handling
//!
//! Background tasks use `let _ =` for channel sends. A send only fails
//! when the receiver is gone, which means the UI is shutting down and
//! the message has nowhere useful to go.

use crate::api::ApiClient;
use crate::app::messages::BackgroundMessage;
use crate::app::{background, input, RuntimeContext};
use crate::config::Config;
use crate::ui::{self, App, View};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Run the TUI application with background API tasks.
pub async fn run_tui(api: ApiClient, config: Config) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let output_dir = match &config.output_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let mut app = App::new(config);

    // Channel for background tasks
    let (tx, rx) = mpsc::channel::<BackgroundMessage>();
    let ctx = RuntimeContext {
        api,
        tx,
        output_dir,
    };

    // Catalog load starts immediately; the grid fills in when it lands.
    app.session.notices.info("Loading plant catalog...");
    background::spawn_catalog_load(&ctx);

    let result = run_loop(&mut terminal, &mut app, rx, &ctx);

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

/// Main event loop with background message handling.
fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<BackgroundMessage>,
    ctx: &RuntimeContext,
) -> Result<()> {
    loop {
        let now = Instant::now();

        // Expire toasts
        app.session.notices.clear_expired(now);

        // Debounce window elapsed: fire the remote search tier. The local
        // filter already ran on each keystroke via rebuild_grid.
        if let Some(cmd) = app.session.search.poll(now) {
            background::spawn_search_command(ctx, cmd);
        }

        // Advance the simulated plan progress
        app.session.progress.tick(now);

        // Reveal pause elapsed after a successful plan
        if app.session.poll_reveal(now) {
            app.view = View::Results;
        }

        // Check for background messages (non-blocking)
        background::drain_messages(app, &rx);

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with fast timeout (snappy animations)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                input::handle_key_event(app, key, ctx)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
