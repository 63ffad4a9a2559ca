//! Pure view functions for the console.
//!
//! Everything here takes `&AppState` and draws; nothing mutates state or
//! returns effects.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs};
use storeadmin_core::session::Screen;
use unicode_width::UnicodeWidthStr;

use crate::common::layout::{centered_rect, spinner};
use crate::common::text::truncate_with_ellipsis;
use crate::features::{customers, inventory, login, orders, overview, settings, staff};
use crate::state::{AppState, ToastLevel};

const HEADER_HEIGHT: u16 = 1;
const NAV_HEIGHT: u16 = 1;
const STATUS_HEIGHT: u16 = 1;

/// Draws the whole console for the current state.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let Some(screen) = app.screen() else {
        render_splash(frame, app, area);
        return;
    };

    if screen == Screen::Login {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(STATUS_HEIGHT)])
            .split(area);
        login::render_login(frame, app, chunks[0]);
        render_status(frame, app, screen, chunks[1]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(NAV_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(frame, app, screen, chunks[0]);
    render_body(frame, app, screen, inset(chunks[1]));
    render_nav(frame, screen, chunks[2]);
    render_status(frame, app, screen, chunks[3]);
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        width: area.width.saturating_sub(2),
        ..area
    }
}

fn render_splash(frame: &mut Frame, app: &AppState, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "Store Admin",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Restoring session...", spinner(app.spinner_frame)),
            Style::default().fg(Color::Gray),
        )),
    ];
    let rect = centered_rect(area, 32, 3);
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        rect,
    );
}

fn render_header(frame: &mut Frame, app: &AppState, screen: Screen, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " Store Admin ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(screen.title(), Style::default().add_modifier(Modifier::BOLD)),
    ];

    if let Some(user) = &app.view.user {
        let mut who = user.display_name().to_string();
        if let Some(store) = &user.store {
            who = format!("{who} · {}", store.name);
        }
        let used: usize = spans.iter().map(Span::width).sum();
        let room = usize::from(area.width).saturating_sub(used + 2);
        let who = truncate_with_ellipsis(&who, room);
        let pad = room.saturating_sub(who.width());
        spans.push(Span::raw(" ".repeat(pad + 1)));
        spans.push(Span::styled(who, Style::default().fg(Color::Gray)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_body(frame: &mut Frame, app: &AppState, screen: Screen, area: Rect) {
    match screen {
        Screen::Login => login::render_login(frame, app, area),
        Screen::Overview => overview::render_overview(frame, app, area),
        Screen::Orders => orders::render_orders(frame, app, area),
        Screen::OrderDetail => orders::render_order_detail(frame, app, area),
        Screen::Inventory => inventory::render_inventory(frame, app, area),
        Screen::InventoryDetail => inventory::render_product_detail(frame, app, area),
        Screen::Customers => customers::render_customers(frame, app, area),
        Screen::Staff => staff::render_staff(frame, app, area),
        Screen::Settings => settings::render_settings(frame, app, area),
    }
}

fn render_nav(frame: &mut Frame, screen: Screen, area: Rect) {
    let titles: Vec<Line> = Screen::NAV_BAR
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let selected = screen
        .nav_tab()
        .and_then(|tab| Screen::NAV_BAR.iter().position(|t| *t == tab));

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
        .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
    frame.render_widget(tabs, area);
}

fn render_status(frame: &mut Frame, app: &AppState, screen: Screen, area: Rect) {
    let line = match &app.toast {
        Some(toast) => {
            let color = match toast.level {
                ToastLevel::Info => Color::Green,
                ToastLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", toast.message),
                Style::default().fg(color),
            ))
        }
        None => Line::from(Span::styled(
            format!(" {}", key_hints(app, screen)),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &AppState, screen: Screen) -> &'static str {
    if app.is_typing() && screen != Screen::Login {
        return "type to search · Enter/Esc done · Ctrl+U clear";
    }
    match screen {
        Screen::Login => "Tab switch field · Enter sign in · Ctrl+R show password · Ctrl+C quit",
        Screen::Overview => "p period · r refresh · Tab next screen · q quit",
        Screen::Orders => "↑↓ select · Enter open · f filter · r refresh · q quit",
        Screen::OrderDetail => "←→ status · Enter apply · r refresh · Esc back",
        Screen::Inventory => "↑↓ select · Enter open · / search · l low stock · r refresh",
        Screen::InventoryDetail => "+/- adjust · 0 reset · Enter save · Esc back",
        Screen::Customers => "↑↓ select · / search · r refresh · q quit",
        Screen::Staff => "↑↓ select · / filter · r refresh · q quit",
        Screen::Settings if app.settings.confirm_logout => "y confirm · n cancel",
        Screen::Settings => "↑↓ select · Enter toggle · q quit",
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use storeadmin_core::api::DashboardPeriod;
    use storeadmin_core::session::{Route, View};

    use super::*;

    fn draw(app: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app(route: Route) -> AppState {
        let user = matches!(route, Route::Screen(screen) if screen != Screen::Login).then(|| {
            serde_json::from_value(serde_json::json!({
                "id": 7, "name": "Amina", "store": {"name": "Corner Shop"}
            }))
            .unwrap()
        });
        AppState::new(
            View {
                route,
                user,
                selected_order_id: None,
                selected_inventory_id: None,
            },
            DashboardPeriod::Today,
            Duration::from_millis(300),
            Instant::now(),
        )
    }

    #[test]
    fn test_splash_while_bootstrapping() {
        let screen = draw(&app(Route::Bootstrapping));
        assert!(screen.contains("Restoring session"));
    }

    #[test]
    fn test_header_and_nav_bar() {
        let screen = draw(&app(Route::Screen(Screen::Staff)));
        assert!(screen.contains("Store Admin"));
        assert!(screen.contains("Amina · Corner Shop"));
        assert!(screen.contains("1 Overview"));
        assert!(screen.contains("6 Settings"));
    }

    #[test]
    fn test_toast_replaces_hints() {
        let mut state = app(Route::Screen(Screen::Orders));
        assert!(draw(&state).contains("f filter"));
        state.show_error("Network error: connection refused");
        let screen = draw(&state);
        assert!(screen.contains("Network error: connection refused"));
        assert!(!screen.contains("f filter"));
    }
}
