//! UI event types.
//!
//! Everything the reducer reacts to: terminal input, frame ticks, session
//! snapshots from the controller, and the results of spawned requests.

use std::time::Instant;

use crossterm::event::Event;
use storeadmin_core::api::{
    ApiError, ApiResult, Customer, DashboardPeriod, DashboardStats, FieldErrors, Id,
    NotificationSettings, Order, OrderStatus, Product, StaffMember,
};
use storeadmin_core::session::View;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick for spinners, toast expiry and debounced searches.
    Tick,

    /// Emitted once per loop iteration, before any other event.
    Frame {
        width: u16,
        height: u16,
        now: Instant,
    },

    Terminal(Event),

    /// The controller published a new snapshot.
    SessionChanged(View),

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    LoginFinished(Result<(), LoginError>),
    DashboardLoaded {
        period: DashboardPeriod,
        result: ApiResult<DashboardStats>,
    },
    OrdersLoaded(ApiResult<Vec<Order>>),
    OrderLoaded(ApiResult<Order>),
    OrderStatusUpdated {
        id: Id,
        status: OrderStatus,
        result: ApiResult<Option<String>>,
    },
    /// Search results carry the ticket they were issued with.
    ProductsLoaded {
        ticket: TaskId,
        result: ApiResult<Vec<Product>>,
    },
    ProductLoaded(ApiResult<Product>),
    StockUpdated {
        id: Id,
        quantity: i64,
        result: ApiResult<Option<String>>,
    },
    CustomersLoaded {
        ticket: TaskId,
        result: ApiResult<Vec<Customer>>,
    },
    StaffLoaded(ApiResult<Vec<StaffMember>>),
    NotificationsSaved {
        previous: NotificationSettings,
        result: ApiResult<Option<String>>,
    },
}

/// Why a sign-in attempt failed, in the shape the login form displays.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginError {
    pub message: String,
    pub field_errors: FieldErrors,
}

impl LoginError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: FieldErrors::new(),
        }
    }
}

impl From<&ApiError> for LoginError {
    fn from(err: &ApiError) -> Self {
        Self {
            message: err.message().to_string(),
            field_errors: err.field_errors().cloned().unwrap_or_default(),
        }
    }
}
