//! Orders list and order detail.

mod render;
mod update;

pub use render::{render_order_detail, render_orders};
use storeadmin_core::api::{Order, OrderStatus, filter_by_status};
pub use update::{
    handle_detail_key, handle_list_key, handle_order_loaded, handle_orders_loaded,
    handle_status_updated, mount_detail, mount_list,
};

use crate::state::Loadable;

#[derive(Debug, Clone, Default)]
pub struct OrdersState {
    pub list: Loadable<Vec<Order>>,
    /// Client-side filter; `None` shows every order.
    pub status_filter: Option<OrderStatus>,
    pub selected: usize,
}

impl OrdersState {
    pub fn visible(&self) -> Vec<&Order> {
        self.list
            .loaded()
            .map(|orders| filter_by_status(orders, self.status_filter))
            .unwrap_or_default()
    }

    pub fn selected_order(&self) -> Option<&Order> {
        self.visible().get(self.selected).copied()
    }

    /// All → Pending → … → Cancelled → All.
    pub fn cycle_filter(&mut self) {
        let all = OrderStatus::all();
        self.status_filter = match self.status_filter {
            None => Some(all[0]),
            Some(current) => all
                .iter()
                .position(|status| *status == current)
                .and_then(|index| all.get(index + 1))
                .copied(),
        };
        self.selected = 0;
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderDetailState {
    pub order: Loadable<Order>,
    /// Status chosen in the picker, applied with Enter.
    pub pending_status: Option<OrderStatus>,
}

impl OrderDetailState {
    /// True when the picker differs from the stored status.
    pub fn has_change(&self) -> bool {
        match (self.order.loaded(), self.pending_status) {
            (Some(order), Some(pending)) => order.status != pending,
            _ => false,
        }
    }

    pub fn step_status(&mut self, forward: bool) {
        let Some(order) = self.order.loaded() else {
            return;
        };
        let all = OrderStatus::all();
        let current = self.pending_status.unwrap_or(order.status);
        let index = all.iter().position(|s| *s == current).unwrap_or(0);
        let next = if forward {
            (index + 1) % all.len()
        } else {
            (index + all.len() - 1) % all.len()
        };
        self.pending_status = Some(all[next]);
    }
}
