use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use storeadmin_core::api::{Order, OrderStatus};
use storeadmin_core::format::format_money;

use crate::common::TaskKind;
use crate::common::layout::{render_message, spinner};
use crate::common::text::truncate_with_ellipsis;
use crate::state::{AppState, Loadable};

fn status_style(status: OrderStatus) -> Style {
    let color = match status {
        OrderStatus::Pending => Color::Yellow,
        OrderStatus::Processing => Color::Blue,
        OrderStatus::Paid => Color::Cyan,
        OrderStatus::Delivered => Color::Green,
        OrderStatus::Cancelled => Color::Red,
    };
    Style::default().fg(color)
}

pub fn render_orders(frame: &mut Frame, app: &AppState, area: Rect) {
    let orders = &app.orders;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let filter = orders
        .status_filter
        .map_or("All", OrderStatus::label)
        .to_string();
    let mut header = vec![
        Span::styled("Status: ", Style::default().fg(Color::Gray)),
        Span::styled(filter, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if app.tasks.state(TaskKind::Orders).is_running() {
        header.push(Span::styled(
            format!("  {}", spinner(app.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    let visible = match &orders.list {
        Loadable::Loaded(_) => orders.visible(),
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, chunks[1]);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading orders...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, chunks[1]);
            return;
        }
    };
    if visible.is_empty() {
        render_message(frame, "No orders match this filter", Color::DarkGray, chunks[1]);
        return;
    }

    let name_width = chunks[1].width.saturating_sub(52) as usize;
    let rows: Vec<Row> = visible
        .iter()
        .map(|order| {
            Row::new(vec![
                Cell::from(order.reference().to_string()),
                Cell::from(truncate_with_ellipsis(&order.customer_name, name_width.max(8))),
                Cell::from(order.placed_at()),
                Cell::from(Span::styled(
                    order.status.label(),
                    status_style(order.status),
                )),
                Cell::from(format_money(order.amount)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(8),
            Constraint::Length(18),
            Constraint::Length(11),
            Constraint::Length(11),
        ],
    )
    .header(
        Row::new(["Order", "Customer", "Placed", "Status", "Amount"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("› ");

    let mut state = TableState::default().with_selected(Some(orders.selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

pub fn render_order_detail(frame: &mut Frame, app: &AppState, area: Rect) {
    let detail = &app.order_detail;
    let order = match &detail.order {
        Loadable::Loaded(order) => order,
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, area);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading order...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, area);
            return;
        }
    };

    let items_height = u16::try_from(order.items.len())
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(items_height),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(summary_lines(order)), chunks[0]);
    render_items(frame, order, chunks[1]);

    let saving = app.tasks.state(TaskKind::OrderStatus).is_running();
    let pending = detail.pending_status.unwrap_or(order.status);
    let mut picker = vec![Span::styled("Set status: ", Style::default().fg(Color::Gray))];
    for status in OrderStatus::all() {
        let style = if status == pending {
            status_style(status).add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            status_style(status).add_modifier(Modifier::DIM)
        };
        picker.push(Span::styled(format!(" {} ", status.label()), style));
        picker.push(Span::raw(" "));
    }
    let hint = if saving {
        format!("{} Saving...", spinner(app.spinner_frame))
    } else if detail.has_change() {
        "Enter to apply".to_string()
    } else {
        "←/→ to choose".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(vec![Line::from(picker)]).block(block.title(format!(" {hint} "))),
        chunks[2],
    );
}

fn summary_lines(order: &Order) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                order.reference().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(order.status.label(), status_style(order.status)),
        ]),
        Line::from(vec![
            Span::styled("Customer: ", label),
            Span::raw(order.customer_name.clone()),
        ]),
    ];
    if let Some(email) = &order.customer_email {
        lines.push(Line::from(vec![
            Span::styled("Email:    ", label),
            Span::raw(email.clone()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Placed:   ", label),
        Span::raw(order.placed_at()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Total:    ", label),
        Span::styled(
            format_money(order.amount),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    lines
}

fn render_items(frame: &mut Frame, order: &Order, area: Rect) {
    let rows: Vec<Row> = order
        .items
        .iter()
        .map(|item| {
            Row::new(vec![
                item.name.clone(),
                format!("×{}", item.quantity),
                format_money(item.price),
                format_money(item.line_total()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Min(10),
            Constraint::Length(6),
            Constraint::Length(11),
            Constraint::Length(11),
        ],
    )
    .header(
        Row::new(["Item", "Qty", "Price", "Total"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(
                " Items · subtotal {} ",
                format_money(order.items_subtotal())
            )),
    );
    frame.render_widget(table, area);
}
