use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use storeadmin_core::api::NotificationKind;

use super::LOGOUT_ROW;
use crate::common::TaskKind;
use crate::common::layout::spinner;
use crate::state::AppState;

pub fn render_settings(frame: &mut Frame, app: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Length(7), Constraint::Min(0)])
        .split(area);

    render_profile(frame, app, chunks[0]);
    render_preferences(frame, app, chunks[1]);
}

fn render_profile(frame: &mut Frame, app: &AppState, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let lines = match &app.view.user {
        Some(user) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    user.display_name().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(vec![Span::styled("Email: ", label), Span::raw(user.email.clone())]),
            ];
            if let Some(phone) = &user.phone {
                lines.push(Line::from(vec![
                    Span::styled("Phone: ", label),
                    Span::raw(phone.clone()),
                ]));
            }
            if let Some(role) = &user.role {
                lines.push(Line::from(vec![
                    Span::styled("Role:  ", label),
                    Span::raw(role.clone()),
                ]));
            }
            if let Some(store) = &user.store {
                lines.push(Line::from(vec![
                    Span::styled("Store: ", label),
                    Span::raw(store.name.clone()),
                ]));
            }
            lines
        }
        None => vec![Line::from(Span::styled("Not signed in", label))],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Profile ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_preferences(frame: &mut Frame, app: &AppState, area: Rect) {
    let settings = &app.settings;
    let mut lines = Vec::new();

    for (row, kind) in NotificationKind::all().into_iter().enumerate() {
        let checked = if settings.notifications.get(kind) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(row_line(
            row == settings.selected,
            format!("{checked} {}", kind.label()),
            Style::default(),
        ));
    }

    lines.push(Line::from(""));
    if settings.confirm_logout {
        lines.push(Line::from(Span::styled(
            "Log out of this device? (y/n)",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    } else {
        lines.push(row_line(
            settings.selected == LOGOUT_ROW,
            "Log out".to_string(),
            Style::default().fg(Color::Red),
        ));
    }

    let title = if app.tasks.state(TaskKind::Notifications).is_running() {
        format!(" Notifications {} ", spinner(app.spinner_frame))
    } else {
        " Notifications ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn row_line(selected: bool, text: String, style: Style) -> Line<'static> {
    if selected {
        Line::from(vec![
            Span::styled("› ", Style::default().fg(Color::Cyan)),
            Span::styled(text, style.add_modifier(Modifier::BOLD)),
        ])
    } else {
        Line::from(vec![Span::raw("  "), Span::styled(text, style)])
    }
}
