//! Application view state and the render tree.
//!
//! Rendering is declarative: every frame maps session state to widgets,
//! so there are no per-item handlers to go stale. Input is dispatched by
//! item identity (the grid cursor) in `app::input`.

pub mod theme;

mod catalog;
mod progress;
mod results;
mod toast;

use crate::config::Config;
use crate::selection::GridEntry;
use crate::session::SessionState;
use ratatui::prelude::*;

/// Which input surface owns keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box; autocomplete panel may be open.
    Search,
    /// Editing the zip code field.
    Zip,
}

/// Which main surface is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Catalog,
    /// Simulated-progress overlay while a plan request is in flight.
    Progress,
    /// Hand-off surface for a completed plan.
    Results,
}

/// Main application state for verdant.
pub struct App {
    pub session: SessionState,
    pub config: Config,

    // Rendered catalog grid (visual handles; selection reconciled onto it)
    pub grid: Vec<GridEntry>,
    pub cursor: usize,
    pub scroll: usize,

    pub input_mode: InputMode,
    pub view: View,
    /// Zip edit buffer, committed on Enter.
    pub zip_input: String,
    pub downloading: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let mut session = SessionState::new();
        if let Some(zip) = &config.zip_code {
            session.zip_code = zip.clone();
        }
        if let Some(size) = config.garden_size.as_deref().and_then(crate::session::GardenSize::parse)
        {
            session.garden_size = size;
        }
        if let Some(level) = config
            .experience_level
            .as_deref()
            .and_then(crate::session::ExperienceLevel::parse)
        {
            session.experience = level;
        }

        Self {
            session,
            config,
            grid: Vec::new(),
            cursor: 0,
            scroll: 0,
            input_mode: InputMode::default(),
            view: View::default(),
            zip_input: String::new(),
            downloading: false,
            should_quit: false,
        }
    }

    /// Rebuild the grid from the catalog and the active query (the local
    /// filter tier), then reconcile selection flags. The render hook for
    /// every CatalogStore / SelectionSet change.
    pub fn rebuild_grid(&mut self) {
        let query = self.session.search.query();
        let make = |r: &crate::catalog::PlantRecord| GridEntry {
            name: r.name.clone(),
            plant_type: r.plant_type.clone(),
            ai_sourced: r.origin == crate::catalog::Origin::AiGenerated,
            selected: false,
        };
        self.grid = if query.is_empty() {
            self.session.catalog.iter().map(make).collect()
        } else {
            self.session.catalog.filter(query).into_iter().map(make).collect()
        };
        self.session.selection.sync_visual_state(&mut self.grid);
        if self.cursor >= self.grid.len() {
            self.cursor = self.grid.len().saturating_sub(1);
        }
    }

    /// Toggle the plant under the cursor. The returned membership drives
    /// the entry's visual state directly, no re-query needed.
    pub fn toggle_under_cursor(&mut self) {
        if let Some(entry) = self.grid.get_mut(self.cursor) {
            entry.selected = self.session.selection.toggle(&entry.name.clone());
        }
    }

    pub fn move_cursor(&mut self, delta: i64) {
        if self.grid.is_empty() {
            return;
        }
        let len = self.grid.len() as i64;
        self.cursor = (self.cursor as i64 + delta).clamp(0, len - 1) as usize;
    }

    pub fn enter_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn exit_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.rebuild_grid();
    }

    pub fn close_progress_view(&mut self) {
        if self.view == View::Progress {
            self.view = View::Catalog;
        }
    }
}

/// Top-level render dispatch.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::vertical([
        Constraint::Length(1),      // header
        Constraint::Min(5),         // catalog grid
        Constraint::Length(3),      // form
        Constraint::Length(1),      // footer
    ])
    .split(area);

    catalog::render_header(frame, app, chunks[0]);
    catalog::render_grid(frame, app, chunks[1]);
    catalog::render_form(frame, app, chunks[2]);
    catalog::render_footer(frame, app, chunks[3]);

    if app.input_mode == InputMode::Search {
        catalog::render_autocomplete(frame, app, chunks[1]);
    }

    match app.view {
        View::Progress => progress::render_progress(frame, app),
        View::Results => results::render_results(frame, app),
        View::Catalog => {}
    }

    if let Some(notice) = app.session.notices.latest() {
        toast::render_toast(frame, notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PlantRecord;

    fn app_with_catalog() -> App {
        let mut app = App::new(Config::default());
        app.session.catalog.load(vec![
            PlantRecord::new("Tomato", "vegetable"),
            PlantRecord::new("Basil", "herb"),
        ]);
        app.rebuild_grid();
        app
    }

    #[test]
    fn test_rebuild_grid_reflects_catalog() {
        let app = app_with_catalog();
        assert_eq!(app.grid.len(), 2);
        assert!(!app.grid[0].selected);
    }

    #[test]
    fn test_toggle_under_cursor_updates_visual_and_membership() {
        let mut app = app_with_catalog();
        app.toggle_under_cursor();
        assert!(app.grid[0].selected);
        assert!(app.session.selection.contains("Tomato"));
        app.toggle_under_cursor();
        assert!(!app.grid[0].selected);
        assert_eq!(app.session.selection.count(), 0);
    }

    #[test]
    fn test_selection_survives_filter_rebuild() {
        let mut app = app_with_catalog();
        app.toggle_under_cursor(); // select Tomato

        // Filter down to Basil, then back to everything.
        app.session.search.on_input("herb", std::time::Instant::now());
        app.rebuild_grid();
        assert_eq!(app.grid.len(), 1);
        assert!(!app.grid[0].selected);

        app.session.search.reset();
        app.rebuild_grid();
        let tomato = app.grid.iter().find(|e| e.name == "Tomato").unwrap();
        assert!(tomato.selected);
    }

    #[test]
    fn test_cursor_clamped_on_shrinking_grid() {
        let mut app = app_with_catalog();
        app.cursor = 1;
        app.session.search.on_input("toma", std::time::Instant::now());
        app.rebuild_grid();
        assert_eq!(app.cursor, 0);
    }
}
