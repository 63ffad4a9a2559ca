use crossterm::event::{KeyCode, KeyEvent};
use storeadmin_core::api::{ApiResult, Id, Order, OrderStatus};
use storeadmin_core::session::Screen;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::features::{clamp_selection, move_selection};
use crate::state::{AppState, Loadable};
use crate::update::report_error;

pub fn mount_list(app: &mut AppState) -> Vec<UiEffect> {
    app.orders.list.start_loading();
    let task = app.task_seq.next_id();
    vec![UiEffect::FetchOrders { task }]
}

/// Loads the order the controller has selected.
pub fn mount_detail(app: &mut AppState) -> Vec<UiEffect> {
    let Some(id) = app.view.selected_order_id.clone() else {
        app.order_detail.order = Loadable::Failed("No order selected".to_string());
        return vec![];
    };
    let same_order = app
        .order_detail
        .order
        .loaded()
        .is_some_and(|order| order.id == id);
    if !same_order {
        app.order_detail.order = Loadable::Loading;
        app.order_detail.pending_status = None;
    }
    let task = app.task_seq.next_id();
    vec![UiEffect::FetchOrder { task, id }]
}

pub fn handle_list_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let len = app.orders.visible().len();
    if move_selection(&mut app.orders.selected, len, &key) {
        return vec![];
    }
    match key.code {
        KeyCode::Enter => app
            .orders
            .selected_order()
            .map(|order| UiEffect::Navigate {
                screen: Screen::OrderDetail,
                id: Some(order.id.clone()),
            })
            .into_iter()
            .collect(),
        KeyCode::Char('f') => {
            app.orders.cycle_filter();
            vec![]
        }
        KeyCode::Char('r') => mount_list(app),
        _ => vec![],
    }
}

pub fn handle_detail_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            app.order_detail.step_status(false);
            vec![]
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.order_detail.step_status(true);
            vec![]
        }
        KeyCode::Enter | KeyCode::Char('s') => apply_status(app),
        KeyCode::Char('r') => mount_detail(app),
        _ => vec![],
    }
}

fn apply_status(app: &mut AppState) -> Vec<UiEffect> {
    if !app.order_detail.has_change() || app.tasks.state(TaskKind::OrderStatus).is_running() {
        return vec![];
    }
    let (Some(order), Some(status)) = (
        app.order_detail.order.loaded(),
        app.order_detail.pending_status,
    ) else {
        return vec![];
    };
    let id = order.id.clone();
    let task = app.task_seq.next_id();
    vec![UiEffect::UpdateOrderStatus { task, id, status }]
}

pub fn handle_orders_loaded(app: &mut AppState, result: ApiResult<Vec<Order>>) {
    match result {
        Ok(orders) => {
            app.orders.list = Loadable::Loaded(orders);
            let len = app.orders.visible().len();
            clamp_selection(&mut app.orders.selected, len);
        }
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.orders.list.fail(message);
            }
        }
    }
}

pub fn handle_order_loaded(app: &mut AppState, result: ApiResult<Order>) {
    match result {
        Ok(order) => {
            app.order_detail.pending_status = Some(order.status);
            app.order_detail.order = Loadable::Loaded(order);
        }
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.order_detail.order.fail(message);
            }
        }
    }
}

pub fn handle_status_updated(
    app: &mut AppState,
    id: &Id,
    status: OrderStatus,
    result: ApiResult<Option<String>>,
) {
    match result {
        Ok(message) => {
            if let Some(order) = app
                .order_detail
                .order
                .loaded_mut()
                .filter(|order| order.id == *id)
            {
                order.status = status;
                app.order_detail.pending_status = Some(status);
            }
            if let Some(order) = app
                .orders
                .list
                .loaded_mut()
                .and_then(|orders| orders.iter_mut().find(|order| order.id == *id))
            {
                order.status = status;
            }
            app.show_info(message.unwrap_or_else(|| format!("Order marked {}", status.label())));
        }
        Err(err) => {
            report_error(app, &err);
            let current = app.order_detail.order.loaded().map(|order| order.status);
            app.order_detail.pending_status = current;
        }
    }
}
