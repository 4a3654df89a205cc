//! Keyboard dispatch.
//!
//! One delegated handler per logical action, keyed by item identity
//! (the grid cursor / the autocomplete cursor) - no per-item bindings.

use crate::app::{background, RuntimeContext};
use crate::ui::{App, InputMode, View};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

pub fn handle_key_event(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) -> Result<()> {
    match app.view {
        View::Progress => handle_progress_view(app, key),
        View::Results => handle_results_view(app, key, ctx),
        View::Catalog => match app.input_mode {
            InputMode::Normal => handle_normal(app, key, ctx),
            InputMode::Search => handle_search(app, key, ctx),
            InputMode::Zip => handle_zip(app, key),
        },
    }
    Ok(())
}

fn handle_normal(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('/') => app.enter_search(),
        KeyCode::Char(' ') => app.toggle_under_cursor(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::PageDown => app.move_cursor(10),
        KeyCode::PageUp => app.move_cursor(-10),
        KeyCode::Char('z') => {
            app.zip_input = app.session.zip_code.clone();
            app.input_mode = InputMode::Zip;
        }
        KeyCode::Char('s') => {
            app.session.garden_size = app.session.garden_size.next();
            persist_defaults(app);
        }
        KeyCode::Char('e') => {
            app.session.experience = app.session.experience.next();
            persist_defaults(app);
        }
        KeyCode::Enter => submit(app, ctx),
        _ => {}
    }
}

fn submit(app: &mut App, ctx: &RuntimeContext) {
    if !app.session.submit_enabled {
        return;
    }
    match app.session.submit(Instant::now()) {
        Ok(submission) => {
            app.view = View::Progress;
            background::spawn_plan_request(ctx, submission);
        }
        Err(e) => app.session.notices.error(&e.to_string()),
    }
}

fn handle_search(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => {
            app.session.search.reset();
            app.exit_search();
        }
        KeyCode::Enter => {
            if let Some(cmd) = app.session.confirm_suggestion() {
                background::spawn_search_command(ctx, cmd);
            }
            // An in-catalog choice changed selection state; reflect it.
            app.rebuild_grid();
        }
        KeyCode::Down => app.session.search.move_cursor(1),
        KeyCode::Up => app.session.search.move_cursor(-1),
        KeyCode::Backspace => {
            let mut query = app.session.search.query().to_string();
            query.pop();
            app.session.search.on_input(&query, now);
            app.rebuild_grid();
        }
        KeyCode::Char(c) => {
            let mut query = app.session.search.query().to_string();
            query.push(c);
            app.session.search.on_input(&query, now);
            app.rebuild_grid();
        }
        _ => {}
    }
}

fn handle_zip(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Enter => {
            app.session.zip_code = app.zip_input.trim().to_string();
            app.input_mode = InputMode::Normal;
            persist_defaults(app);
        }
        KeyCode::Backspace => {
            app.zip_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == ' ' || c == '-' => {
            app.zip_input.push(c);
        }
        _ => {}
    }
}

fn handle_progress_view(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        // Abandon policy: the request keeps running but its response is
        // stale the moment the token is bumped.
        app.session.cancel_plan();
        app.view = View::Catalog;
    }
}

fn handle_results_view(app: &mut App, key: KeyEvent, ctx: &RuntimeContext) {
    match key.code {
        KeyCode::Char('d') => {
            if app.downloading {
                return;
            }
            if let Some(plan) = &app.session.plan {
                app.downloading = true;
                background::spawn_document_download(ctx, plan.plan_id.clone());
            }
        }
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.view = View::Catalog;
        }
        _ => {}
    }
}

/// Remember form defaults for the next session; best-effort.
fn persist_defaults(app: &mut App) {
    app.config.zip_code = if app.session.zip_code.is_empty() {
        None
    } else {
        Some(app.session.zip_code.clone())
    };
    app.config.garden_size = Some(app.session.garden_size.as_str().to_string());
    app.config.experience_level = Some(app.session.experience.as_str().to_string());
    let _ = app.config.save();
}
