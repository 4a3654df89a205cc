//! Simulated-progress overlay shown while a plan request is in flight.

use crate::progress::StepStatus;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Progress bar fill characters, eighths for a smooth edge.
const PROGRESS_CHARS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

pub(super) fn render_progress(frame: &mut Frame, app: &App) {
    let area = centered(frame.area(), 56, 13);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Theme::GREY_400))
        .style(Style::default().bg(Theme::GREY_900))
        .title(Line::from(Span::styled(
            " growing your plan ",
            Theme::header(),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sim = &app.session.progress;
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::default());

    for (label, status) in sim.steps() {
        let (marker, style) = match status {
            StepStatus::Done => ("✓ ", Theme::selected()),
            StepStatus::Active => ("▸ ", Theme::text()),
            StepStatus::Pending => ("· ", Theme::muted()),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", marker), style),
            Span::styled(label, style),
        ]));
    }

    lines.push(Line::default());
    lines.push(progress_bar(sim.percent(), inner.width.saturating_sub(10)));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("  {}", sim.message()),
        Theme::muted(),
    )));
    lines.push(Line::from(Span::styled(
        "  esc to cancel",
        Style::default().fg(Theme::GREY_500),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn progress_bar(percent: f64, width: u16) -> Line<'static> {
    let width = width.max(10) as usize;
    let filled = percent / 100.0 * width as f64;
    let full = filled as usize;
    let partial = ((filled.fract()) * 8.0) as usize;

    let mut bar = String::new();
    for i in 0..width {
        if i < full {
            bar.push('█');
        } else if i == full && partial > 0 {
            bar.push(PROGRESS_CHARS[partial]);
        } else {
            bar.push('░');
        }
    }

    Line::from(vec![
        Span::styled("  ", Theme::text()),
        Span::styled(bar, Style::default().fg(Theme::GREEN)),
        Span::styled(format!(" {:3.0}%", percent), Theme::text()),
    ])
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
