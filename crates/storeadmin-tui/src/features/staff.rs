//! Staff directory with a local name/role filter.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table, TableState};
use storeadmin_core::api::{
    ApiResult, StaffAccess, StaffMember, StaffStatus, active_count, filter_staff,
};

use crate::common::TaskKind;
use crate::common::layout::{render_message, spinner};
use crate::effects::UiEffect;
use crate::features::{clamp_selection, move_selection};
use crate::state::{AppState, Loadable};
use crate::update::report_error;

#[derive(Debug, Clone, Default)]
pub struct StaffState {
    pub members: Loadable<Vec<StaffMember>>,
    pub filter: String,
    pub filter_focused: bool,
    pub selected: usize,
}

impl StaffState {
    pub fn visible(&self) -> Vec<&StaffMember> {
        self.members
            .loaded()
            .map(|members| filter_staff(members, &self.filter))
            .unwrap_or_default()
    }

    fn refilter(&mut self) {
        let len = self.visible().len();
        clamp_selection(&mut self.selected, len);
    }
}

pub fn mount(app: &mut AppState) -> Vec<UiEffect> {
    app.staff.members.start_loading();
    let task = app.task_seq.next_id();
    vec![UiEffect::FetchStaff { task }]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let staff = &mut app.staff;

    if staff.filter_focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => staff.filter_focused = false,
            KeyCode::Backspace => {
                staff.filter.pop();
                staff.refilter();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                staff.filter.push(c);
                staff.refilter();
            }
            _ => {}
        }
        return vec![];
    }

    let len = staff.visible().len();
    if move_selection(&mut staff.selected, len, &key) {
        return vec![];
    }
    match key.code {
        KeyCode::Char('/') => {
            staff.filter_focused = true;
            vec![]
        }
        KeyCode::Char('r') => mount(app),
        _ => vec![],
    }
}

pub fn handle_loaded(app: &mut AppState, result: ApiResult<Vec<StaffMember>>) {
    match result {
        Ok(members) => {
            app.staff.members = Loadable::Loaded(members);
            app.staff.refilter();
        }
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.staff.members.fail(message);
            }
        }
    }
}

fn access_style(access: StaffAccess) -> Style {
    match access {
        StaffAccess::FullAdmin => Style::default().fg(Color::Magenta),
        StaffAccess::PosAccess => Style::default().fg(Color::Cyan),
        StaffAccess::Limited => Style::default().fg(Color::Yellow),
        StaffAccess::Basic => Style::default().fg(Color::Gray),
    }
}

pub fn render_staff(frame: &mut Frame, app: &AppState, area: Rect) {
    let staff = &app.staff;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let label_style = if staff.filter_focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut header = vec![Span::styled("Filter: ", label_style)];
    if staff.filter.is_empty() && !staff.filter_focused {
        header.push(Span::styled(
            "/ to filter by name or role",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        header.push(Span::raw(staff.filter.clone()));
    }
    if staff.filter_focused {
        header.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    if let Some(members) = staff.members.loaded() {
        header.push(Span::styled(
            format!("   {} active of {}", active_count(members), members.len()),
            Style::default().fg(Color::Gray),
        ));
    }
    if app.tasks.state(TaskKind::Staff).is_running() {
        header.push(Span::styled(
            format!("  {}", spinner(app.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    match &staff.members {
        Loadable::Loaded(_) => {}
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, chunks[1]);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading staff...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, chunks[1]);
            return;
        }
    }

    let visible = staff.visible();
    if visible.is_empty() {
        render_message(frame, "No staff members match", Color::DarkGray, chunks[1]);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|member| {
            let status_style = match member.status {
                StaffStatus::Active => Style::default().fg(Color::Green),
                StaffStatus::Inactive => Style::default().fg(Color::DarkGray),
            };
            Row::new(vec![
                Line::from(member.name.clone()),
                Line::from(member.role.clone()),
                Line::from(Span::styled(
                    member.access.as_str(),
                    access_style(member.access),
                )),
                Line::from(Span::styled(member.status.to_string(), status_style)),
                Line::from(member.email.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Length(16),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Min(16),
        ],
    )
    .header(
        Row::new(["Name", "Role", "Access", "Status", "Email"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("› ");

    let mut table_state = TableState::default().with_selected(Some(staff.selected));
    frame.render_stateful_widget(table, chunks[1], &mut table_state);
}
