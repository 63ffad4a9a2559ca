use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{BarChart, Block, Borders, Paragraph};
use storeadmin_core::api::{DashboardPeriod, DashboardStats, SeriesPoint};
use storeadmin_core::format::{format_change, format_count, format_money};

use crate::common::layout::spinner;
use crate::state::{AppState, Loadable};

pub fn render_overview(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(6),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(period_line(app.overview.period)), chunks[0]);

    match &app.overview.stats {
        Loadable::Loaded(stats) => {
            render_cards(frame, stats, chunks[1]);
            render_charts(frame, stats, chunks[2]);
        }
        Loadable::Idle | Loadable::Loading => {
            frame.render_widget(
                Paragraph::new(format!(
                    "{} Loading dashboard...",
                    spinner(app.spinner_frame)
                ))
                .style(Style::default().fg(Color::Yellow)),
                chunks[1],
            );
        }
        Loadable::Failed(message) => {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                    Line::from(Span::styled(
                        "Press r to retry",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]),
                chunks[1],
            );
        }
    }
}

fn period_line(selected: DashboardPeriod) -> Line<'static> {
    let mut spans = vec![Span::styled("Period: ", Style::default().fg(Color::Gray))];
    for period in DashboardPeriod::all() {
        let style = if period == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", period.label()), style));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_cards(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let entries = [
        ("Revenue", format_money(stats.revenue), stats.revenue_change),
        ("Orders", format_count(stats.orders), stats.orders_change),
        ("Pending", format_count(stats.pending_orders), None),
        ("Low stock", format_count(stats.low_stock), None),
    ];

    for ((title, value, change), card) in entries.into_iter().zip(cards.iter()) {
        let mut spans = vec![Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(change) = change {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format_change(change), Style::default().fg(color)));
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {title} "));
        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), *card);
    }
}

fn render_charts(frame: &mut Frame, stats: &DashboardStats, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_series(frame, " Sales ", &stats.sales, Color::Cyan, halves[0]);
    render_series(
        frame,
        " Order volume ",
        &stats.order_volume,
        Color::Magenta,
        halves[1],
    );
}

fn render_series(
    frame: &mut Frame,
    title: &'static str,
    points: &[SeriesPoint],
    color: Color,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);

    if points.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No data for this period",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block),
            area,
        );
        return;
    }

    let bars: Vec<(&str, u64)> = points
        .iter()
        .map(|point| (point.label.as_str(), point.value.max(0.0).round() as u64))
        .collect();
    let inner_width = area.width.saturating_sub(2);
    let count = u16::try_from(bars.len()).unwrap_or(u16::MAX);
    let bar_width = (inner_width / count.max(1)).saturating_sub(1).clamp(1, 9);

    let chart = BarChart::default()
        .block(block)
        .data(bars.as_slice())
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color));
    frame.render_widget(chart, area);
}
