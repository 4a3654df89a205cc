//! Catalog grid, form row and search autocomplete.

use crate::search::Panel;
use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

pub(super) fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let source = if app.session.catalog.source.is_empty() {
        String::new()
    } else {
        format!("  ·  {} catalog", app.session.catalog.source)
    };
    let line = Line::from(vec![
        Span::styled("  verdant", Theme::header()),
        Span::styled(source, Theme::muted()),
        Span::styled(
            format!(
                "  ·  {} plants, {} types",
                app.session.catalog.len(),
                app.session.catalog.types().len()
            ),
            Theme::muted(),
        ),
        Span::styled(
            format!("  ·  {} selected", app.session.selection.count()),
            Theme::selected(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

pub(super) fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::GREY_500))
        .title(grid_title(app));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.grid.is_empty() {
        let hint = if app.session.search.query().is_empty() {
            "No plants loaded. Press '/' to search the catalog."
        } else {
            "No local matches - remote search runs as you pause typing."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, Theme::muted()))),
            inner,
        );
        return;
    }

    let visible = inner.height as usize;
    let scroll = scroll_offset(app.cursor, app.scroll, visible, app.grid.len());

    let items: Vec<ListItem> = app
        .grid
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible)
        .map(|(i, entry)| {
            let marker = if entry.selected { "[x] " } else { "[ ] " };
            let mut spans = vec![
                Span::styled(
                    marker,
                    if entry.selected {
                        Theme::selected()
                    } else {
                        Theme::muted()
                    },
                ),
                Span::styled(entry.name.clone(), Theme::text()),
                Span::styled(format!("  {}", entry.plant_type), Theme::muted()),
            ];
            if entry.ai_sourced {
                spans.push(Span::styled("  AI-sourced", Style::default().fg(Theme::GREEN_PALE)));
            }
            let mut line = Line::from(spans);
            if i == app.cursor {
                line = line.style(Theme::cursor_line());
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn grid_title(app: &App) -> Line<'static> {
    if app.input_mode == InputMode::Search {
        Line::from(vec![
            Span::styled(" search: ", Theme::muted()),
            Span::styled(app.session.search.query().to_string(), Theme::header()),
            Span::styled("▌ ", Style::default().fg(Theme::GREY_300)),
        ])
    } else {
        Line::from(Span::styled(" your garden ", Theme::muted()))
    }
}

fn scroll_offset(cursor: usize, scroll: usize, visible: usize, len: usize) -> usize {
    if visible == 0 || len <= visible {
        return 0;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + visible {
        cursor + 1 - visible
    } else {
        scroll.min(len - visible)
    }
}

pub(super) fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::GREY_500));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let zip = if app.input_mode == InputMode::Zip {
        format!("{}▌", app.zip_input)
    } else if app.session.zip_code.is_empty() {
        "—".to_string()
    } else {
        app.session.zip_code.clone()
    };

    let submit_style = if app.session.submit_enabled {
        Theme::selected()
    } else {
        Theme::muted().add_modifier(Modifier::DIM)
    };

    let line = Line::from(vec![
        Span::styled(" zip ", Theme::muted()),
        Span::styled(zip, Theme::text()),
        Span::styled("   size ", Theme::muted()),
        Span::styled(app.session.garden_size.as_str(), Theme::text()),
        Span::styled("   level ", Theme::muted()),
        Span::styled(app.session.experience.as_str(), Theme::text()),
        Span::styled("   ", Theme::muted()),
        Span::styled(format!("[ {} ]", app.session.submit_label), submit_style),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

pub(super) fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let keys = match app.input_mode {
        InputMode::Search => "type to search · ↑↓ pick · enter add · esc close",
        InputMode::Zip => "type zip code · enter save · esc cancel",
        InputMode::Normal => {
            "space select · / search · z zip · s size · e level · enter generate · q quit"
        }
    };
    let mut spans = vec![Span::styled(format!("  {}", keys), Theme::muted())];
    if app.session.stale_discards > 0 {
        spans.push(Span::styled(
            format!("   stale responses dropped: {}", app.session.stale_discards),
            Style::default().fg(Theme::GREY_500),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Autocomplete panel anchored under the search title.
pub(super) fn render_autocomplete(frame: &mut Frame, app: &App, grid_area: Rect) {
    let rows: Vec<Line> = match app.session.search.panel() {
        Panel::Hidden => return,
        Panel::Resolving => vec![Line::from(Span::styled(
            "  resolving...",
            Theme::muted(),
        ))],
        Panel::OfferGenerate => vec![Line::from(vec![
            Span::styled("  ▸ ", Style::default().fg(Theme::GREEN_PALE)),
            Span::styled(
                format!(
                    "No catalog match for \"{}\" - press enter to grow one with AI",
                    app.session.search.query()
                ),
                Theme::text(),
            ),
        ])],
        Panel::Suggestions(items) => items
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let tag = if s.in_catalog {
                    Span::styled("  in catalog", Theme::muted())
                } else {
                    Span::styled("  + add", Style::default().fg(Theme::GREEN_PALE))
                };
                let mut line = Line::from(vec![
                    Span::styled("  ", Theme::text()),
                    Span::styled(s.name.clone(), Theme::text()),
                    Span::styled(format!("  {}", s.plant_type), Theme::muted()),
                    tag,
                ]);
                if i == app.session.search.cursor() {
                    line = line.style(Theme::cursor_line());
                }
                line
            })
            .collect(),
    };

    let height = (rows.len() as u16 + 2).min(grid_area.height);
    let area = Rect {
        x: grid_area.x + 2,
        y: grid_area.y + 1,
        width: grid_area.width.saturating_sub(4),
        height,
    };
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::GREY_400))
        .style(Style::default().bg(Theme::GREY_700));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(rows), inner);
}
