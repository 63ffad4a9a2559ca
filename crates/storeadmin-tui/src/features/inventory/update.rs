use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use storeadmin_core::api::{ApiResult, Id, Product};
use storeadmin_core::session::Screen;

use crate::common::{TaskId, TaskKind};
use crate::effects::UiEffect;
use crate::features::{clamp_selection, move_selection};
use crate::state::{AppState, Loadable};
use crate::update::report_error;

/// Runs the current search immediately.
pub fn mount_list(app: &mut AppState) -> Vec<UiEffect> {
    app.inventory.products.start_loading();
    let (ticket, search) = app.inventory.search.search_now();
    vec![UiEffect::FetchProducts { ticket, search }]
}

pub fn mount_detail(app: &mut AppState) -> Vec<UiEffect> {
    let Some(id) = app.view.selected_inventory_id.clone() else {
        app.product_detail.product = Loadable::Failed("No product selected".to_string());
        return vec![];
    };
    let same_product = app
        .product_detail
        .product
        .loaded()
        .is_some_and(|product| product.id == id);
    if !same_product {
        app.product_detail.product = Loadable::Loading;
        app.product_detail.adjustment = 0;
    }
    let task = app.task_seq.next_id();
    vec![UiEffect::FetchProduct { task, id }]
}

pub fn handle_list_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let now = app.now;
    let inventory = &mut app.inventory;

    if inventory.search.focused {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => inventory.search.focused = false,
            KeyCode::Backspace => inventory.search.backspace(now),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                inventory.search.clear(now);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                inventory.search.push_char(c, now);
            }
            _ => {}
        }
        return vec![];
    }

    let len = inventory.visible().len();
    if move_selection(&mut inventory.selected, len, &key) {
        return vec![];
    }
    match key.code {
        KeyCode::Char('/') => {
            inventory.search.focused = true;
            vec![]
        }
        KeyCode::Char('l') => {
            inventory.low_stock_only = !inventory.low_stock_only;
            inventory.selected = 0;
            vec![]
        }
        KeyCode::Enter => inventory
            .visible()
            .get(inventory.selected)
            .map(|product| UiEffect::Navigate {
                screen: Screen::InventoryDetail,
                id: Some(product.id.clone()),
            })
            .into_iter()
            .collect(),
        KeyCode::Char('r') => mount_list(app),
        _ => vec![],
    }
}

pub fn handle_detail_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('+' | '=') | KeyCode::Right | KeyCode::Up => {
            app.product_detail.adjust(1);
            vec![]
        }
        KeyCode::Char('-') | KeyCode::Left | KeyCode::Down => {
            app.product_detail.adjust(-1);
            vec![]
        }
        KeyCode::Char('0') => {
            app.product_detail.adjustment = 0;
            vec![]
        }
        KeyCode::Enter | KeyCode::Char('s') => save_stock(app),
        KeyCode::Char('r') => mount_detail(app),
        _ => vec![],
    }
}

fn save_stock(app: &mut AppState) -> Vec<UiEffect> {
    if app.product_detail.adjustment == 0
        || app.tasks.state(TaskKind::StockUpdate).is_running()
    {
        return vec![];
    }
    let (Some(product), Some(quantity)) = (
        app.product_detail.product.loaded(),
        app.product_detail.target_stock(),
    ) else {
        return vec![];
    };
    let id = product.id.clone();
    let task = app.task_seq.next_id();
    vec![UiEffect::UpdateStock { task, id, quantity }]
}

pub fn handle_products_loaded(
    app: &mut AppState,
    ticket: TaskId,
    result: ApiResult<Vec<Product>>,
) {
    if !app.inventory.search.accept(ticket) {
        return;
    }
    match result {
        Ok(products) => {
            app.inventory.products = Loadable::Loaded(products);
            let len = app.inventory.visible().len();
            clamp_selection(&mut app.inventory.selected, len);
        }
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.inventory.products.fail(message);
            }
        }
    }
}

pub fn handle_product_loaded(app: &mut AppState, result: ApiResult<Product>) {
    match result {
        Ok(product) => app.product_detail.product = Loadable::Loaded(product),
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.product_detail.product.fail(message);
            }
        }
    }
}

pub fn handle_stock_updated(
    app: &mut AppState,
    id: &Id,
    quantity: i64,
    result: ApiResult<Option<String>>,
) {
    match result {
        Ok(message) => {
            if let Some(product) = app
                .product_detail
                .product
                .loaded_mut()
                .filter(|product| product.id == *id)
            {
                product.stock = quantity;
                app.product_detail.adjustment = 0;
            }
            if let Some(product) = app
                .inventory
                .products
                .loaded_mut()
                .and_then(|products| products.iter_mut().find(|product| product.id == *id))
            {
                product.stock = quantity;
            }
            app.show_info(message.unwrap_or_else(|| format!("Stock set to {quantity}")));
        }
        Err(err) => {
            report_error(app, &err);
        }
    }
}
