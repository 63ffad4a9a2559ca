//! Application state composition.
//!
//! ```text
//! AppState
//! ├── view: View               (latest controller snapshot)
//! ├── task_seq / tasks          (async task lifecycle)
//! ├── toast: Option<Toast>      (transient status message)
//! └── one field per screen      (login form, orders, inventory, ...)
//! ```
//!
//! The controller owns navigation and the session; `view` is a read-only
//! copy that is replaced on every `SessionChanged` event.

use std::time::{Duration, Instant};

use storeadmin_core::api::DashboardPeriod;
use storeadmin_core::session::{Screen, View};

use crate::common::{TaskSeq, Tasks};
use crate::features::customers::CustomersState;
use crate::features::inventory::{InventoryState, ProductDetailState};
use crate::features::login::LoginState;
use crate::features::orders::{OrderDetailState, OrdersState};
use crate::features::overview::OverviewState;
use crate::features::settings::SettingsState;
use crate::features::staff::StaffState;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Remote data as seen by a screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Loadable::Loaded(_))
    }

    /// Shows a spinner unless there is already data to keep on screen.
    pub fn start_loading(&mut self) {
        if !self.is_loaded() {
            *self = Loadable::Loading;
        }
    }

    /// Records a failure unless older data is still worth showing.
    pub fn fail(&mut self, message: impl Into<String>) {
        if !self.is_loaded() {
            *self = Loadable::Failed(message.into());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

pub struct AppState {
    pub should_quit: bool,
    pub view: View,
    /// Clock reading from the latest `Frame` event.
    pub now: Instant,
    pub width: u16,
    pub height: u16,
    pub spinner_frame: usize,
    pub toast: Option<Toast>,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Set when the user asked to log out, so the resulting session loss is
    /// not reported as an expiry.
    pub logging_out: bool,
    pub debounce: Duration,

    pub login: LoginState,
    pub overview: OverviewState,
    pub orders: OrdersState,
    pub order_detail: OrderDetailState,
    pub inventory: InventoryState,
    pub product_detail: ProductDetailState,
    pub customers: CustomersState,
    pub staff: StaffState,
    pub settings: SettingsState,
}

impl AppState {
    pub fn new(view: View, period: DashboardPeriod, debounce: Duration, now: Instant) -> Self {
        Self {
            should_quit: false,
            view,
            now,
            width: 0,
            height: 0,
            spinner_frame: 0,
            toast: None,
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            logging_out: false,
            debounce,
            login: LoginState::default(),
            overview: OverviewState::new(period),
            orders: OrdersState::default(),
            order_detail: OrderDetailState::default(),
            inventory: InventoryState::new(debounce),
            product_detail: ProductDetailState::default(),
            customers: CustomersState::new(debounce),
            staff: StaffState::default(),
            settings: SettingsState::default(),
        }
    }

    pub fn screen(&self) -> Option<Screen> {
        self.view.screen()
    }

    /// True while keystrokes go to a text field rather than to shortcuts.
    pub fn is_typing(&self) -> bool {
        match self.screen() {
            Some(Screen::Login) => true,
            Some(Screen::Inventory) => self.inventory.search.focused,
            Some(Screen::Customers) => self.customers.search.focused,
            Some(Screen::Staff) => self.staff.filter_focused,
            _ => false,
        }
    }

    pub fn show_info(&mut self, message: impl Into<String>) {
        self.show_toast(message, ToastLevel::Info);
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.show_toast(message, ToastLevel::Error);
    }

    fn show_toast(&mut self, message: impl Into<String>, level: ToastLevel) {
        self.toast = Some(Toast {
            message: message.into(),
            level,
            expires_at: self.now + TOAST_DURATION,
        });
    }

    pub fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| self.now >= toast.expires_at)
        {
            self.toast = None;
        }
    }

    /// Forgets everything fetched for the previous user.
    pub fn clear_session_data(&mut self) {
        let period = self.overview.period;
        let debounce = self.debounce;
        self.overview = OverviewState::new(period);
        self.orders = OrdersState::default();
        self.order_detail = OrderDetailState::default();
        self.inventory = InventoryState::new(debounce);
        self.product_detail = ProductDetailState::default();
        self.customers = CustomersState::new(debounce);
        self.staff = StaffState::default();
        self.settings = SettingsState::default();
        self.tasks.clear_all();
    }
}
