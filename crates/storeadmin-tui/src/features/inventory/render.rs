use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use storeadmin_core::api::Product;
use storeadmin_core::format::format_money;

use crate::common::TaskKind;
use crate::common::layout::{render_message, spinner};
use crate::common::search::search_spans;
use crate::state::{AppState, Loadable};

fn stock_style(product: &Product) -> Style {
    if product.stock <= 0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if product.needs_restock() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Green)
    }
}

pub fn render_inventory(frame: &mut Frame, app: &AppState, area: Rect) {
    let inventory = &app.inventory;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let mut header = search_spans(&inventory.search, app.spinner_frame);
    header.push(Span::raw("   "));
    header.push(Span::styled(
        if inventory.low_stock_only {
            "[x] low stock only"
        } else {
            "[ ] low stock only"
        },
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    match &inventory.products {
        Loadable::Loaded(_) => {}
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, chunks[1]);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading inventory...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, chunks[1]);
            return;
        }
    }

    let visible = inventory.visible();
    if visible.is_empty() {
        render_message(frame, "No products found", Color::DarkGray, chunks[1]);
        return;
    }

    let rows: Vec<Row> = visible
        .iter()
        .map(|product| {
            Row::new(vec![
                Line::from(product.sku.clone()),
                Line::from(product.name.clone()),
                Line::from(product.category.clone().unwrap_or_default()),
                Line::from(Span::styled(product.stock.to_string(), stock_style(product))),
                Line::from(product.price.map(format_money).unwrap_or_default()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(12),
            Constraint::Length(14),
            Constraint::Length(7),
            Constraint::Length(11),
        ],
    )
    .header(
        Row::new(["SKU", "Product", "Category", "Stock", "Price"])
            .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("› ");

    let mut state = TableState::default().with_selected(Some(inventory.selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

pub fn render_product_detail(frame: &mut Frame, app: &AppState, area: Rect) {
    let detail = &app.product_detail;
    let product = match &detail.product {
        Loadable::Loaded(product) => product,
        Loadable::Failed(message) => {
            render_message(frame, message, Color::Red, area);
            return;
        }
        Loadable::Idle | Loadable::Loading => {
            let text = format!("{} Loading product...", spinner(app.spinner_frame));
            render_message(frame, &text, Color::Yellow, area);
            return;
        }
    };

    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::from(Span::styled(
            product.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("SKU:      ", label),
            Span::raw(product.sku.clone()),
        ]),
    ];
    if let Some(category) = &product.category {
        lines.push(Line::from(vec![
            Span::styled("Category: ", label),
            Span::raw(category.clone()),
        ]));
    }
    if let Some(price) = product.price {
        lines.push(Line::from(vec![
            Span::styled("Price:    ", label),
            Span::raw(format_money(price)),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("In stock: ", label),
        Span::styled(product.stock.to_string(), stock_style(product)),
        Span::styled(
            if product.needs_restock() {
                "  needs restock"
            } else {
                ""
            },
            Style::default().fg(Color::Yellow),
        ),
    ]));
    lines.push(Line::from(""));

    let target = detail.target_stock().unwrap_or(product.stock);
    let adjustment = match detail.adjustment {
        0 => String::new(),
        delta if delta > 0 => format!("  (+{delta})"),
        delta => format!("  ({delta})"),
    };
    lines.push(Line::from(vec![
        Span::styled("New stock: ", label),
        Span::styled(
            format!(" − {target} + "),
            Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        ),
        Span::styled(adjustment, Style::default().fg(Color::Cyan)),
    ]));

    let status = if app.tasks.state(TaskKind::StockUpdate).is_running() {
        format!("{} Saving...", spinner(app.spinner_frame))
    } else if detail.adjustment != 0 {
        "Enter to save · 0 to reset".to_string()
    } else {
        "+/- to adjust".to_string()
    };
    lines.push(Line::from(Span::styled(
        status,
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", product.id));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
