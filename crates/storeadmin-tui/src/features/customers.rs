//! Customer directory with debounced search.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Row, Table, TableState};
use storeadmin_core::api::{ApiResult, Customer};

use crate::common::layout::{render_message, spinner};
use crate::common::search::search_spans;
use crate::common::{SearchBox, TaskId};
use crate::effects::UiEffect;
use crate::features::{clamp_selection, move_selection};
use crate::state::{AppState, Loadable};
use crate::update::report_error;

#[derive(Debug)]
pub struct CustomersState {
    pub search: SearchBox,
    pub customers: Loadable<Vec<Customer>>,
    pub selected: usize,
}

impl CustomersState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            search: SearchBox::new(debounce),
            customers: Loadable::Idle,
            selected: 0,
        }
    }

    fn len(&self) -> usize {
        self.customers.loaded().map_or(0, Vec::len)
    }
}

pub fn mount(app: &mut AppState) -> Vec<UiEffect> {
    app.customers.customers.start_loading();
    let (ticket, search) = app.customers.search.search_now();
    vec![UiEffect::FetchCustomers { ticket, search }]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let now = app.now;
    let customers = &mut app.customers;

    if customers.search.focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => customers.search.focused = false,
            KeyCode::Backspace => customers.search.backspace(now),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                customers.search.clear(now);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                customers.search.push_char(c, now);
            }
            _ => {}
        }
        return vec![];
    }

    let len = customers.len();
    if move_selection(&mut customers.selected, len, &key) {
        return vec![];
    }
    match key.code {
        KeyCode::Char('/') => {
            customers.search.focused = true;
            vec![]
        }
        KeyCode::Char('r') => mount(app),
        _ => vec![],
    }
}

pub fn handle_loaded(app: &mut AppState, ticket: TaskId, result: ApiResult<Vec<Customer>>) {
    if !app.customers.search.accept(ticket) {
        return;
    }
    match result {
        Ok(customers) => {
            let len = customers.len();
            app.customers.customers = Loadable::Loaded(customers);
            clamp_selection(&mut app.customers.selected, len);
        }
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.customers.customers.fail(message);
            }
        }
    }
}

pub fn render_customers(frame: &mut Frame, app: &AppState, area: Rect) {
    let state = &app.customers;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(search_spans(&state.search, app.spinner_frame))),
        chunks[0],
    );

    let customers = match &state.customers {
        Loadable::Loaded(customers) => customers,
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, chunks[1]);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading customers...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, chunks[1]);
            return;
        }
    };
    if customers.is_empty() {
        render_message(frame, "No customers found", Color::DarkGray, chunks[1]);
        return;
    }

    let rows: Vec<Row> = customers
        .iter()
        .map(|customer| {
            Row::new(vec![
                customer.name.clone(),
                customer.email.clone(),
                customer.phone.clone().unwrap_or_default(),
                customer.order_count.to_string(),
                customer
                    .last_order_date
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(14),
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(7),
            Constraint::Length(14),
        ],
    )
    .header(
        Row::new(["Name", "Email", "Phone", "Orders", "Last order"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("› ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(table, chunks[1], &mut table_state);
}
