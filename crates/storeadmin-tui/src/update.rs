//! Console reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. Screen changes are never applied
//! directly: the reducer asks the controller via `UiEffect::Navigate` and
//! mounts the new screen when the resulting `SessionChanged` arrives.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use storeadmin_core::api::{ApiError, ApiErrorKind};
use storeadmin_core::session::{Screen, View};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{customers, inventory, login, orders, overview, settings, staff};
use crate::state::AppState;

/// Fetch tasks owned by a screen; forgotten whenever a screen mounts.
const SCREEN_FETCHES: [TaskKind; 5] = [
    TaskKind::Dashboard,
    TaskKind::Orders,
    TaskKind::OrderLoad,
    TaskKind::ProductLoad,
    TaskKind::Staff,
];

const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";

/// Effects to run once before the first frame.
pub fn init() -> Vec<UiEffect> {
    vec![UiEffect::Bootstrap]
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            app.expire_toast();
            poll_searches(app)
        }
        UiEvent::Frame { width, height, now } => {
            app.width = width;
            app.height = height;
            app.now = now;
            vec![]
        }
        UiEvent::Terminal(event) => handle_terminal_event(app, event),
        UiEvent::SessionChanged(view) => handle_session_changed(app, view),
        UiEvent::TaskStarted { kind, started } => {
            app.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                vec![]
            }
        }
        UiEvent::LoginFinished(result) => {
            login::handle_login_finished(&mut app.login, result);
            vec![]
        }
        UiEvent::DashboardLoaded { period, result } => {
            overview::handle_loaded(app, period, result);
            vec![]
        }
        UiEvent::OrdersLoaded(result) => {
            orders::handle_orders_loaded(app, result);
            vec![]
        }
        UiEvent::OrderLoaded(result) => {
            orders::handle_order_loaded(app, result);
            vec![]
        }
        UiEvent::OrderStatusUpdated { id, status, result } => {
            orders::handle_status_updated(app, &id, status, result);
            vec![]
        }
        UiEvent::ProductsLoaded { ticket, result } => {
            inventory::handle_products_loaded(app, ticket, result);
            vec![]
        }
        UiEvent::ProductLoaded(result) => {
            inventory::handle_product_loaded(app, result);
            vec![]
        }
        UiEvent::StockUpdated {
            id,
            quantity,
            result,
        } => {
            inventory::handle_stock_updated(app, &id, quantity, result);
            vec![]
        }
        UiEvent::CustomersLoaded { ticket, result } => {
            customers::handle_loaded(app, ticket, result);
            vec![]
        }
        UiEvent::StaffLoaded(result) => {
            staff::handle_loaded(app, result);
            vec![]
        }
        UiEvent::NotificationsSaved { previous, result } => {
            settings::handle_saved(app, previous, result);
            vec![]
        }
    }
}

/// Shows `err` as a toast and returns its text, unless it needs no report:
/// cancellations belong to a screen that is gone, and an expired session is
/// announced when the controller drops the user.
pub(crate) fn report_error(app: &mut AppState, err: &ApiError) -> Option<String> {
    match err.kind() {
        ApiErrorKind::Cancelled | ApiErrorKind::AuthenticationExpired => None,
        _ => {
            let message = err.to_string();
            app.show_error(message.clone());
            Some(message)
        }
    }
}

// ============================================================================
// Session changes
// ============================================================================

fn handle_session_changed(app: &mut AppState, view: View) -> Vec<UiEffect> {
    let previous = std::mem::replace(&mut app.view, view);

    if previous.is_authenticated() && !app.view.is_authenticated() {
        if !app.logging_out {
            app.show_error(SESSION_EXPIRED);
        }
        app.logging_out = false;
        app.clear_session_data();
        login::reset_form(&mut app.login);
    }

    let selection_changed = match app.screen() {
        Some(Screen::OrderDetail) => previous.selected_order_id != app.view.selected_order_id,
        Some(Screen::InventoryDetail) => {
            previous.selected_inventory_id != app.view.selected_inventory_id
        }
        _ => false,
    };
    if previous.route == app.view.route && !selection_changed {
        return vec![];
    }
    mount(app)
}

/// Loads whatever the newly shown screen needs.
fn mount(app: &mut AppState) -> Vec<UiEffect> {
    for kind in SCREEN_FETCHES {
        app.tasks.state_mut(kind).clear();
    }
    // Searches typed on a screen die with it.
    if app.screen() != Some(Screen::Inventory) {
        app.inventory.search.invalidate();
    }
    if app.screen() != Some(Screen::Customers) {
        app.customers.search.invalidate();
    }

    match app.screen() {
        None | Some(Screen::Login) => vec![],
        Some(Screen::Overview) => overview::mount(app),
        Some(Screen::Orders) => orders::mount_list(app),
        Some(Screen::OrderDetail) => orders::mount_detail(app),
        Some(Screen::Inventory) => inventory::mount_list(app),
        Some(Screen::InventoryDetail) => inventory::mount_detail(app),
        Some(Screen::Customers) => customers::mount(app),
        Some(Screen::Staff) => staff::mount(app),
        Some(Screen::Settings) => {
            app.settings.confirm_logout = false;
            vec![]
        }
    }
}

fn poll_searches(app: &mut AppState) -> Vec<UiEffect> {
    let now = app.now;
    let effect = match app.screen() {
        Some(Screen::Inventory) => app
            .inventory
            .search
            .poll(now)
            .map(|(ticket, search)| UiEffect::FetchProducts { ticket, search }),
        Some(Screen::Customers) => app
            .customers
            .search
            .poll(now)
            .map(|(ticket, search)| UiEffect::FetchCustomers { ticket, search }),
        _ => None,
    };
    effect.into_iter().collect()
}

// ============================================================================
// Terminal input
// ============================================================================

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Paste(text) => {
            handle_paste(app, &text);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    let Some(screen) = app.screen() else {
        // Splash screen
        return match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![UiEffect::Quit],
            _ => vec![],
        };
    };

    if screen == Screen::Login {
        return login::handle_key(app, key);
    }

    let capturing = app.is_typing() || (screen == Screen::Settings && app.settings.confirm_logout);
    if !capturing && let Some(effects) = handle_global_key(screen, key) {
        return effects;
    }

    match screen {
        Screen::Login => vec![],
        Screen::Overview => overview::handle_key(app, key),
        Screen::Orders => orders::handle_list_key(app, key),
        Screen::OrderDetail => orders::handle_detail_key(app, key),
        Screen::Inventory => inventory::handle_list_key(app, key),
        Screen::InventoryDetail => inventory::handle_detail_key(app, key),
        Screen::Customers => customers::handle_key(app, key),
        Screen::Staff => staff::handle_key(app, key),
        Screen::Settings => settings::handle_key(app, key),
    }
}

/// Quit, tab switching and back navigation.
fn handle_global_key(screen: Screen, key: KeyEvent) -> Option<Vec<UiEffect>> {
    let tabs = Screen::NAV_BAR;
    let current = screen
        .nav_tab()
        .and_then(|tab| tabs.iter().position(|t| *t == tab))
        .unwrap_or(0);

    let target = match key.code {
        KeyCode::Char('q') => return Some(vec![UiEffect::Quit]),
        KeyCode::Esc => return screen.parent().map(|parent| navigate(parent)),
        KeyCode::Tab => tabs[(current + 1) % tabs.len()],
        KeyCode::BackTab => tabs[(current + tabs.len() - 1) % tabs.len()],
        KeyCode::Char(c @ '1'..='9') => {
            let index = c.to_digit(10)? as usize - 1;
            *tabs.get(index)?
        }
        _ => return None,
    };

    if target == screen {
        return Some(vec![]);
    }
    Some(navigate(target))
}

fn navigate(screen: Screen) -> Vec<UiEffect> {
    vec![UiEffect::Navigate { screen, id: None }]
}

fn handle_paste(app: &mut AppState, text: &str) {
    let now = app.now;
    let line = text.lines().next().unwrap_or_default();
    match app.screen() {
        Some(Screen::Login) => login::handle_paste(&mut app.login, text),
        Some(Screen::Inventory) if app.inventory.search.focused => {
            for ch in line.chars() {
                app.inventory.search.push_char(ch, now);
            }
        }
        Some(Screen::Customers) if app.customers.search.focused => {
            for ch in line.chars() {
                app.customers.search.push_char(ch, now);
            }
        }
        Some(Screen::Staff) if app.staff.filter_focused => {
            app.staff.filter.push_str(line);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use storeadmin_core::api::{
        DashboardPeriod, FieldErrors, Id, NotificationSettings, Order, Product, User,
    };
    use storeadmin_core::session::Route;

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskStarted};
    use crate::events::LoginError;
    use crate::state::{Loadable, ToastLevel};

    const DEBOUNCE: Duration = Duration::from_millis(300);

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Amina", "email": "amina@example.com"
        }))
        .unwrap()
    }

    fn view_at(screen: Screen) -> View {
        View {
            route: Route::Screen(screen),
            user: (screen != Screen::Login).then(user),
            selected_order_id: None,
            selected_inventory_id: None,
        }
    }

    fn app_at(screen: Screen) -> AppState {
        let mut app = AppState::new(
            View {
                route: Route::Bootstrapping,
                user: None,
                selected_order_id: None,
                selected_inventory_id: None,
            },
            DashboardPeriod::Today,
            DEBOUNCE,
            Instant::now(),
        );
        update(&mut app, UiEvent::SessionChanged(view_at(screen)));
        app
    }

    fn key(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            update(app, key(KeyCode::Char(c)));
        }
    }

    fn complete(kind: TaskKind, id: TaskId, result: UiEvent) -> UiEvent {
        UiEvent::TaskCompleted {
            kind,
            completed: TaskCompleted {
                id,
                result: Box::new(result),
            },
        }
    }

    fn products(names: &[&str]) -> Vec<Product> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                serde_json::from_value(serde_json::json!({
                    "id": i + 1, "name": name, "stock": 5
                }))
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_bootstrap_to_overview_fetches_dashboard() {
        let mut app = app_at(Screen::Login);
        let effects = update(&mut app, UiEvent::SessionChanged(view_at(Screen::Overview)));

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::FetchDashboard {
                period: DashboardPeriod::Today,
                ..
            }]
        ));
        assert_eq!(app.overview.stats, Loadable::Loading);
    }

    #[test]
    fn test_same_route_does_not_refetch() {
        let mut app = app_at(Screen::Orders);
        let effects = update(&mut app, UiEvent::SessionChanged(view_at(Screen::Orders)));
        assert!(effects.is_empty());
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut app = app_at(Screen::Login);
        let effects = update(&mut app, key(KeyCode::Enter));
        assert!(effects.is_empty());
        let effects = update(&mut app, key(KeyCode::Enter));
        assert!(effects.is_empty());
        assert_eq!(
            app.login.field_error(login::LoginField::Email),
            Some("Email is required")
        );
        assert!(!app.login.submitting);
    }

    #[test]
    fn test_login_submits_credentials() {
        let mut app = app_at(Screen::Login);
        type_text(&mut app, "admin@store.test");
        update(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "secret");

        let effects = update(&mut app, key(KeyCode::Enter));
        let [UiEffect::SubmitLogin { request, .. }] = effects.as_slice() else {
            panic!("expected SubmitLogin, got {effects:?}");
        };
        assert_eq!(request.email, "admin@store.test");
        assert_eq!(request.password, "secret");
        assert!(app.login.submitting);

        // Keys are ignored while the request is in flight
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
    }

    #[test]
    fn test_login_validation_errors_highlight_fields() {
        let mut app = app_at(Screen::Login);
        app.login.submitting = true;
        app.login.password = "secret".to_string();

        let mut field_errors = FieldErrors::new();
        field_errors.insert(
            "email".to_string(),
            vec!["The email must be a valid email address.".to_string()],
        );
        update(
            &mut app,
            UiEvent::LoginFinished(Err(LoginError {
                message: "The given data was invalid.".to_string(),
                field_errors,
            })),
        );

        assert!(!app.login.submitting);
        assert!(app.login.password.is_empty());
        assert_eq!(app.login.error, None);
        assert_eq!(app.login.focus, login::LoginField::Email);
        assert_eq!(
            app.login.field_error(login::LoginField::Email),
            Some("The email must be a valid email address.")
        );
    }

    #[test]
    fn test_login_failure_without_fields_shows_message() {
        let mut app = app_at(Screen::Login);
        app.login.submitting = true;
        update(
            &mut app,
            UiEvent::LoginFinished(Err(LoginError::new("Invalid credentials"))),
        );
        assert_eq!(app.login.error.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_stale_task_completion_is_dropped() {
        let mut app = app_at(Screen::Orders);
        let first = app.task_seq.next_id();
        let second = app.task_seq.next_id();
        for id in [first, second] {
            update(
                &mut app,
                UiEvent::TaskStarted {
                    kind: TaskKind::Orders,
                    started: TaskStarted { id },
                },
            );
        }

        let stale: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"id": "#ORD-1", "status": "pending"}
        ]))
        .unwrap();
        update(
            &mut app,
            complete(TaskKind::Orders, first, UiEvent::OrdersLoaded(Ok(stale))),
        );
        assert!(!app.orders.list.is_loaded());

        update(
            &mut app,
            complete(TaskKind::Orders, second, UiEvent::OrdersLoaded(Ok(vec![]))),
        );
        assert_eq!(app.orders.list, Loadable::Loaded(vec![]));
    }

    #[test]
    fn test_enter_on_order_navigates_with_id() {
        let mut app = app_at(Screen::Orders);
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"id": "#ORD-1", "status": "pending"},
            {"id": "#ORD-2", "status": "paid"}
        ]))
        .unwrap();
        update(&mut app, UiEvent::OrdersLoaded(Ok(orders)));
        update(&mut app, key(KeyCode::Down));

        let effects = update(&mut app, key(KeyCode::Enter));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Navigate { screen: Screen::OrderDetail, id: Some(id) }] if *id == Id::from("#ORD-2")
        ));
    }

    #[test]
    fn test_escape_on_detail_returns_to_list() {
        let mut app = app_at(Screen::OrderDetail);
        let effects = update(&mut app, key(KeyCode::Esc));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Navigate {
                screen: Screen::Orders,
                id: None
            }]
        ));
    }

    #[test]
    fn test_detail_mount_uses_selected_id() {
        let mut app = app_at(Screen::Orders);
        let mut view = view_at(Screen::OrderDetail);
        view.selected_order_id = Some(Id::from("#ORD-9921"));

        let effects = update(&mut app, UiEvent::SessionChanged(view));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::FetchOrder { id, .. }] if *id == Id::from("#ORD-9921")
        ));
    }

    #[test]
    fn test_tab_cycles_nav_bar() {
        let mut app = app_at(Screen::Settings);
        let effects = update(&mut app, key(KeyCode::Tab));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Navigate {
                screen: Screen::Overview,
                ..
            }]
        ));

        let effects = update(&mut app, key(KeyCode::Char('3')));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::Navigate {
                screen: Screen::Inventory,
                ..
            }]
        ));
    }

    #[test]
    fn test_inventory_search_is_debounced() {
        let mut app = app_at(Screen::Inventory);
        let start = app.now;

        update(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "oat");
        assert!(app.is_typing());

        // 'q' while typing is text, not quit
        update(&mut app, key(KeyCode::Char('q')));
        assert_eq!(app.inventory.search.query, "oatq");
        update(&mut app, key(KeyCode::Backspace));

        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: start + Duration::from_millis(100),
            },
        );
        assert!(update(&mut app, UiEvent::Tick).is_empty());

        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: start + DEBOUNCE,
            },
        );
        let effects = update(&mut app, UiEvent::Tick);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::FetchProducts { search: Some(search), .. }] if search == "oat"
        ));
    }

    #[test]
    fn test_leaving_during_debounce_drops_pending_search() {
        let mut app = app_at(Screen::Customers);
        let start = app.now;

        update(&mut app, key(KeyCode::Char('/')));
        type_text(&mut app, "ann");
        assert!(app.customers.search.is_searching());

        update(&mut app, UiEvent::SessionChanged(view_at(Screen::Orders)));
        assert!(!app.customers.search.is_searching());
        assert!(!app.inventory.search.is_searching());

        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: start + DEBOUNCE * 2,
            },
        );
        assert!(update(&mut app, UiEvent::Tick).is_empty());
        assert!(!app.customers.search.is_searching());
    }

    #[test]
    fn test_only_latest_search_results_apply() {
        let mut app = app_at(Screen::Inventory);
        let (older, _) = app.inventory.search.search_now();
        let (latest, _) = app.inventory.search.search_now();

        update(
            &mut app,
            UiEvent::ProductsLoaded {
                ticket: latest,
                result: Ok(products(&["Oat Milk"])),
            },
        );
        update(
            &mut app,
            UiEvent::ProductsLoaded {
                ticket: older,
                result: Ok(products(&["Beans", "Cups"])),
            },
        );

        let names: Vec<_> = app
            .inventory
            .visible()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, ["Oat Milk"]);
    }

    #[test]
    fn test_cancelled_fetch_is_silent() {
        let mut app = app_at(Screen::Staff);
        update(&mut app, UiEvent::StaffLoaded(Err(ApiError::Cancelled)));
        assert!(app.toast.is_none());
        assert_eq!(app.staff.members, Loadable::Loading);

        update(
            &mut app,
            UiEvent::StaffLoaded(Err(ApiError::network("connection refused"))),
        );
        let toast = app.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert!(matches!(app.staff.members, Loadable::Failed(_)));
    }

    #[test]
    fn test_session_expiry_shows_toast_and_clears_data() {
        let mut app = app_at(Screen::Orders);
        update(&mut app, UiEvent::OrdersLoaded(Ok(vec![])));

        update(&mut app, UiEvent::SessionChanged(view_at(Screen::Login)));
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some(SESSION_EXPIRED)
        );
        assert!(!app.orders.list.is_loaded());
    }

    #[test]
    fn test_logout_from_settings_is_not_an_expiry() {
        let mut app = app_at(Screen::Settings);
        for _ in 0..settings::LOGOUT_ROW {
            update(&mut app, key(KeyCode::Down));
        }
        assert!(update(&mut app, key(KeyCode::Enter)).is_empty());
        assert!(app.settings.confirm_logout);

        let effects = update(&mut app, key(KeyCode::Char('y')));
        assert!(matches!(effects.as_slice(), [UiEffect::Logout]));

        update(&mut app, UiEvent::SessionChanged(view_at(Screen::Login)));
        assert!(app.toast.is_none());
        assert!(!app.logging_out);
    }

    #[test]
    fn test_notification_toggle_rolls_back_on_failure() {
        let mut app = app_at(Screen::Settings);
        let effects = update(&mut app, key(KeyCode::Char(' ')));
        let [UiEffect::SaveNotifications {
            settings, previous, ..
        }] = effects.as_slice()
        else {
            panic!("expected SaveNotifications, got {effects:?}");
        };
        assert!(!settings.push_notifications);
        assert_eq!(*previous, NotificationSettings::default());
        assert!(!app.settings.notifications.push_notifications);

        update(
            &mut app,
            UiEvent::NotificationsSaved {
                previous: NotificationSettings::default(),
                result: Err(ApiError::from_status(500, None)),
            },
        );
        assert!(app.settings.notifications.push_notifications);
    }

    #[test]
    fn test_period_cycle_refetches() {
        let mut app = app_at(Screen::Overview);
        let effects = update(&mut app, key(KeyCode::Char('p')));
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::FetchDashboard {
                period: DashboardPeriod::Last7Days,
                ..
            }]
        ));

        // A late answer for the old period is ignored
        update(
            &mut app,
            UiEvent::DashboardLoaded {
                period: DashboardPeriod::Today,
                result: Ok(Default::default()),
            },
        );
        assert!(!app.overview.stats.is_loaded());
    }

    #[test]
    fn test_toast_expires_on_tick() {
        let mut app = app_at(Screen::Overview);
        app.show_info("Saved");
        let start = app.now;

        update(&mut app, UiEvent::Tick);
        assert!(app.toast.is_some());

        update(
            &mut app,
            UiEvent::Frame {
                width: 80,
                height: 24,
                now: start + crate::state::TOAST_DURATION,
            },
        );
        update(&mut app, UiEvent::Tick);
        assert!(app.toast.is_none());
    }

    #[test]
    fn test_stock_update_applies_locally() {
        let mut app = app_at(Screen::InventoryDetail);
        app.product_detail.product = Loadable::Loaded(products(&["Oat Milk"]).remove(0));
        update(&mut app, key(KeyCode::Char('+')));
        update(&mut app, key(KeyCode::Char('+')));

        let effects = update(&mut app, key(KeyCode::Enter));
        let [UiEffect::UpdateStock { id, quantity, .. }] = effects.as_slice() else {
            panic!("expected UpdateStock, got {effects:?}");
        };
        assert_eq!(*quantity, 7);

        update(
            &mut app,
            UiEvent::StockUpdated {
                id: id.clone(),
                quantity: 7,
                result: Ok(None),
            },
        );
        assert_eq!(app.product_detail.target_stock(), Some(7));
        assert_eq!(app.product_detail.adjustment, 0);
    }
}
