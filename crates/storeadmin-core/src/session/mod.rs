//! Session and navigation state.

mod controller;

use std::fmt;

pub use controller::SessionController;

use crate::api::{Id, User};

/// Named screens of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Overview,
    Orders,
    OrderDetail,
    Inventory,
    InventoryDetail,
    Customers,
    Staff,
    Settings,
}

impl Screen {
    /// Screens reachable from the bottom navigation bar, in display order.
    pub const NAV_BAR: [Screen; 6] = [
        Screen::Overview,
        Screen::Orders,
        Screen::Inventory,
        Screen::Customers,
        Screen::Staff,
        Screen::Settings,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Sign in",
            Screen::Overview => "Overview",
            Screen::Orders => "Orders",
            Screen::OrderDetail => "Order Details",
            Screen::Inventory => "Inventory",
            Screen::InventoryDetail => "Product",
            Screen::Customers => "Customers",
            Screen::Staff => "Staff",
            Screen::Settings => "Settings",
        }
    }

    /// The list screen a detail screen returns to.
    pub fn parent(self) -> Option<Screen> {
        match self {
            Screen::OrderDetail => Some(Screen::Orders),
            Screen::InventoryDetail => Some(Screen::Inventory),
            _ => None,
        }
    }

    /// Nav-bar entry highlighted while this screen is shown.
    pub fn nav_tab(self) -> Option<Screen> {
        let tab = self.parent().unwrap_or(self);
        Screen::NAV_BAR.contains(&tab).then_some(tab)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Where the controller currently is. `Bootstrapping` is never a navigation
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Bootstrapping,
    Screen(Screen),
}

impl Route {
    pub fn screen(self) -> Option<Screen> {
        match self {
            Route::Bootstrapping => None,
            Route::Screen(screen) => Some(screen),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub route: Route,
    pub selected_order_id: Option<Id>,
    pub selected_inventory_id: Option<Id>,
}

impl NavigationState {
    pub fn bootstrapping() -> Self {
        Self {
            route: Route::Bootstrapping,
            selected_order_id: None,
            selected_inventory_id: None,
        }
    }

    pub fn login() -> Self {
        Self {
            route: Route::Screen(Screen::Login),
            selected_order_id: None,
            selected_inventory_id: None,
        }
    }
}

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub route: Route,
    pub user: Option<User>,
    pub selected_order_id: Option<Id>,
    pub selected_inventory_id: Option<Id>,
}

impl View {
    pub fn screen(&self) -> Option<Screen> {
        self.route.screen()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_bootstrapping(&self) -> bool {
        self.route == Route::Bootstrapping
    }
}
