pub use storeadmin_core::tasks::{TaskId, TaskSeq};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Dashboard,
    Orders,
    OrderLoad,
    OrderStatus,
    ProductLoad,
    StockUpdate,
    Staff,
    Notifications,
}

#[derive(Debug, Clone, Copy)]
pub struct TaskStarted {
    pub id: TaskId,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, started: &TaskStarted) {
        self.active = Some(started.id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub login: TaskState,
    pub dashboard: TaskState,
    pub orders: TaskState,
    pub order_load: TaskState,
    pub order_status: TaskState,
    pub product_load: TaskState,
    pub stock_update: TaskState,
    pub staff: TaskState,
    pub notifications: TaskState,
}

impl Tasks {
    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::Dashboard => &mut self.dashboard,
            TaskKind::Orders => &mut self.orders,
            TaskKind::OrderLoad => &mut self.order_load,
            TaskKind::OrderStatus => &mut self.order_status,
            TaskKind::ProductLoad => &mut self.product_load,
            TaskKind::StockUpdate => &mut self.stock_update,
            TaskKind::Staff => &mut self.staff,
            TaskKind::Notifications => &mut self.notifications,
        }
    }

    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Login => &self.login,
            TaskKind::Dashboard => &self.dashboard,
            TaskKind::Orders => &self.orders,
            TaskKind::OrderLoad => &self.order_load,
            TaskKind::OrderStatus => &self.order_status,
            TaskKind::ProductLoad => &self.product_load,
            TaskKind::StockUpdate => &self.stock_update,
            TaskKind::Staff => &self.staff,
            TaskKind::Notifications => &self.notifications,
        }
    }

    pub fn is_any_running(&self) -> bool {
        [
            &self.login,
            &self.dashboard,
            &self.orders,
            &self.order_load,
            &self.order_status,
            &self.product_load,
            &self.stock_update,
            &self.staff,
            &self.notifications,
        ]
        .iter()
        .any(|state| state.is_running())
    }

    /// Forgets every in-flight task; their completions will be dropped.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
