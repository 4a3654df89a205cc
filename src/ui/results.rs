//! Hand-off surface for a completed plan: summary plus the document
//! download offer. Full plan rendering lives server-side in the PDF.

use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub(super) fn render_results(frame: &mut Frame, app: &App) {
    let Some(plan) = &app.session.plan else {
        return;
    };

    let area = centered(frame.area(), 64, 16);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::GREEN))
        .style(Style::default().bg(Theme::GREY_900))
        .title(Line::from(Span::styled(" your garden plan ", Theme::header())));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::default());

    let mut place = plan.location.city.clone().unwrap_or_default();
    if let Some(state) = &plan.location.state {
        if !place.is_empty() {
            place.push_str(", ");
        }
        place.push_str(state);
    }
    if place.is_empty() {
        place = plan.location.zip_code.clone();
    }
    lines.push(Line::from(vec![
        Span::styled("  location  ", Theme::muted()),
        Span::styled(place, Theme::text()),
    ]));
    if let Some(zone) = &plan.location.usda_zone {
        lines.push(Line::from(vec![
            Span::styled("  usda zone ", Theme::muted()),
            Span::styled(zone.clone(), Theme::text()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("  plants    ", Theme::muted()),
        Span::styled(
            format!("{}", plan.plant_information.len().max(plan.selected_plants.len())),
            Theme::text(),
        ),
    ]));
    lines.push(Line::default());

    for tip in plan.general_tips.iter().take(4) {
        lines.push(Line::from(vec![
            Span::styled("  ▸ ", Style::default().fg(Theme::GREEN_PALE)),
            Span::styled(tip.clone(), Theme::text()),
        ]));
    }

    lines.push(Line::default());
    let download = if app.downloading {
        "  downloading..."
    } else {
        "  d download PDF · esc back to the catalog"
    };
    lines.push(Line::from(Span::styled(
        download,
        Style::default().fg(Theme::GREY_300),
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
