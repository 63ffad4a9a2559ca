//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! Navigation goes through the session controller; the reducer only sees its
//! result when the next `SessionChanged` snapshot arrives.

use storeadmin_core::api::{DashboardPeriod, Id, LoginRequest, NotificationSettings, OrderStatus};
use storeadmin_core::session::Screen;

use crate::common::TaskId;

#[derive(Debug)]
pub enum UiEffect {
    Quit,

    /// Validate the persisted credential and leave the splash screen.
    Bootstrap,

    Navigate {
        screen: Screen,
        id: Option<Id>,
    },

    Logout,

    SubmitLogin {
        task: TaskId,
        request: LoginRequest,
    },

    // Screen fetches (scoped to the current screen)
    FetchDashboard {
        task: TaskId,
        period: DashboardPeriod,
    },
    FetchOrders {
        task: TaskId,
    },
    FetchOrder {
        task: TaskId,
        id: Id,
    },
    FetchProducts {
        ticket: TaskId,
        search: Option<String>,
    },
    FetchProduct {
        task: TaskId,
        id: Id,
    },
    FetchCustomers {
        ticket: TaskId,
        search: Option<String>,
    },
    FetchStaff {
        task: TaskId,
    },

    // Mutations (outlive the screen that issued them)
    UpdateOrderStatus {
        task: TaskId,
        id: Id,
        status: OrderStatus,
    },
    UpdateStock {
        task: TaskId,
        id: Id,
        quantity: i64,
    },
    SaveNotifications {
        task: TaskId,
        settings: NotificationSettings,
        previous: NotificationSettings,
    },
}
