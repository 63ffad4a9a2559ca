//! Dashboard KPIs for a selectable period.

mod render;

use crossterm::event::{KeyCode, KeyEvent};
pub use render::render_overview;
use storeadmin_core::api::{ApiResult, DashboardPeriod, DashboardStats};

use crate::effects::UiEffect;
use crate::state::{AppState, Loadable};
use crate::update::report_error;

#[derive(Debug, Clone)]
pub struct OverviewState {
    pub period: DashboardPeriod,
    pub stats: Loadable<DashboardStats>,
}

impl OverviewState {
    pub fn new(period: DashboardPeriod) -> Self {
        Self {
            period,
            stats: Loadable::Idle,
        }
    }
}

pub fn mount(app: &mut AppState) -> Vec<UiEffect> {
    fetch(app)
}

fn fetch(app: &mut AppState) -> Vec<UiEffect> {
    app.overview.stats.start_loading();
    let task = app.task_seq.next_id();
    vec![UiEffect::FetchDashboard {
        task,
        period: app.overview.period,
    }]
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Char('p') | KeyCode::Right => {
            app.overview.period = app.overview.period.next();
            // Figures for another period must not linger while loading.
            app.overview.stats = Loadable::Idle;
            fetch(app)
        }
        KeyCode::Char('r') => fetch(app),
        _ => vec![],
    }
}

pub fn handle_loaded(
    app: &mut AppState,
    period: DashboardPeriod,
    result: ApiResult<DashboardStats>,
) {
    if period != app.overview.period {
        return;
    }
    match result {
        Ok(stats) => app.overview.stats = Loadable::Loaded(stats),
        Err(err) => {
            if let Some(message) = report_error(app, &err) {
                app.overview.stats.fail(message);
            }
        }
    }
}
