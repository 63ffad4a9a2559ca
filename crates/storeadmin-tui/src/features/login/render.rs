//! Login form view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{LoginField, LoginState};
use crate::common::layout::{centered_rect, spinner};
use crate::common::text::truncate_with_ellipsis;
use crate::state::AppState;

const FORM_WIDTH: u16 = 56;
const FORM_HEIGHT: u16 = 16;

pub fn render_login(frame: &mut Frame, app: &AppState, area: Rect) {
    let login = &app.login;
    let popup = centered_rect(area, FORM_WIDTH, FORM_HEIGHT);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Store Admin ");
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let value_width = inner.width.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            "Sign in to manage your store",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    lines.extend(field_lines(
        login,
        LoginField::Email,
        "Email",
        truncate_with_ellipsis(&login.email, value_width),
    ));
    let password = if login.show_password {
        login.password.clone()
    } else {
        "•".repeat(login.password.chars().count())
    };
    lines.extend(field_lines(
        login,
        LoginField::Password,
        "Password",
        truncate_with_ellipsis(&password, value_width),
    ));

    if login.submitting {
        lines.push(Line::from(Span::styled(
            format!("{} Signing in...", spinner(app.spinner_frame)),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &login.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter sign in · Tab switch field · Ctrl+R show password",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_lines(
    login: &LoginState,
    field: LoginField,
    label: &'static str,
    value: String,
) -> Vec<Line<'static>> {
    let focused = login.focus == field;
    let error = login.field_error(field);

    let label_style = if error.is_some() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "› " } else { "  " };
    let cursor = if focused { "▏" } else { "" };

    vec![
        Line::from(Span::styled(label, label_style)),
        Line::from(vec![
            Span::styled(marker, label_style),
            Span::raw(value),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]),
        Line::from(Span::styled(
            error.unwrap_or_default().to_string(),
            Style::default().fg(Color::Red),
        )),
    ]
}
