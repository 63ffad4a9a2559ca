//! Console runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the only place side effects happen. The reducer returns effects;
//! the runtime turns them into controller calls and spawned requests.
//!
//! ## Inbox
//!
//! Every async source sends `UiEvent`s into one unbounded channel:
//! - spawned handlers (request results, wrapped in task lifecycle events)
//! - the session forwarder (one `SessionChanged` per controller transition)
//!
//! The loop drains the inbox each iteration, polls the terminal, and feeds
//! everything through `update` in arrival order.

mod handlers;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use storeadmin_core::api::{ApiClient, AuthExpiredListener};
use storeadmin_core::config::Config;
use storeadmin_core::credentials::CredentialStore;
use storeadmin_core::session::SessionController;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::ConsoleTerminal;
use crate::{render, terminal, update};

/// Tick cadence while something is animating (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Tick cadence when nothing is in flight.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

type UiEventSender = mpsc::UnboundedSender<UiEvent>;
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Full-screen console runtime.
///
/// The terminal is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: ConsoleTerminal,
    pub state: AppState,
    controller: Arc<SessionController>,
    /// Unscoped client; screen fetches derive a scoped clone per request.
    api: ApiClient,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Builds the controller and API client, then takes over the terminal.
    ///
    /// # Errors
    /// Returns an error if the backend URL is invalid or the terminal cannot
    /// be set up.
    pub fn new(config: &Config, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let controller = Arc::new(SessionController::new(Arc::clone(&credentials)));
        let listener: Arc<dyn AuthExpiredListener> = Arc::clone(&controller) as _;
        let api = ApiClient::from_config(&config.backend, credentials)
            .context("Failed to create API client")?
            .with_auth_listener(listener);

        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let now = Instant::now();
        let state = AppState::new(
            controller.current_view(),
            config.dashboard_period,
            config.search.debounce(),
            now,
        );
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            controller,
            api,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns an error if drawing or reading terminal input fails.
    pub fn run(&mut self) -> Result<()> {
        self.forward_session_changes();
        self.execute_effects(update::init());
        self.event_loop()
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                    now: Instant::now(),
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Renders are batched to the tick cadence
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| render::render(&self.state, frame))?;
                dirty = false;
            }
        }

        tracing::info!("console closed");
        Ok(())
    }

    // ========================================================================
    // Event collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.needs_fast_tick() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        // Block on the terminal only when there is nothing else to process
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn needs_fast_tick(&self) -> bool {
        let state = &self.state;
        state.view.is_bootstrapping()
            || state.tasks.is_any_running()
            || state.inventory.search.is_searching()
            || state.customers.search.is_searching()
            || state.toast.is_some()
            || self.last_terminal_event.elapsed() < IDLE_POLL_DURATION
    }

    /// Relays every controller transition into the inbox.
    fn forward_session_changes(&self) {
        let mut changes = self.controller.subscribe();
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                let view = changes.borrow_and_update().clone();
                if tx.send(UiEvent::SessionChanged(view)).is_err() {
                    break;
                }
            }
        });
    }

    // ========================================================================
    // Effect dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns `f` and sends the event it returns.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Spawns `f` wrapped in a `TaskStarted`/`TaskCompleted` pair.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let completed = TaskCompleted {
                id,
                result: Box::new(f().await),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    /// Client whose requests die with the current screen.
    fn screen_api(&self) -> ApiClient {
        self.api.scoped(self.controller.screen_scope())
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Bootstrap => {
                // The resulting view arrives through the session forwarder.
                let controller = Arc::clone(&self.controller);
                let api = self.api.clone();
                tokio::spawn(async move {
                    controller.bootstrap(&api).await;
                });
            }
            UiEffect::Navigate { screen, id } => {
                self.controller.navigate(screen, id);
            }
            UiEffect::Logout => {
                self.controller.logout();
            }
            UiEffect::SubmitLogin { task, request } => {
                let api = self.api.clone();
                let controller = Arc::clone(&self.controller);
                self.spawn_task(TaskKind::Login, task, move || {
                    handlers::login(api, controller, request)
                });
            }

            // Screen fetches
            UiEffect::FetchDashboard { task, period } => {
                let api = self.screen_api();
                self.spawn_task(TaskKind::Dashboard, task, move || {
                    handlers::dashboard(api, period)
                });
            }
            UiEffect::FetchOrders { task } => {
                let api = self.screen_api();
                self.spawn_task(TaskKind::Orders, task, move || handlers::orders(api));
            }
            UiEffect::FetchOrder { task, id } => {
                let api = self.screen_api();
                self.spawn_task(TaskKind::OrderLoad, task, move || handlers::order(api, id));
            }
            UiEffect::FetchProducts { ticket, search } => {
                let api = self.screen_api();
                self.spawn_effect(move || handlers::products(api, ticket, search));
            }
            UiEffect::FetchProduct { task, id } => {
                let api = self.screen_api();
                self.spawn_task(TaskKind::ProductLoad, task, move || {
                    handlers::product(api, id)
                });
            }
            UiEffect::FetchCustomers { ticket, search } => {
                let api = self.screen_api();
                self.spawn_effect(move || handlers::customers(api, ticket, search));
            }
            UiEffect::FetchStaff { task } => {
                let api = self.screen_api();
                self.spawn_task(TaskKind::Staff, task, move || handlers::staff(api));
            }

            // Mutations
            UiEffect::UpdateOrderStatus { task, id, status } => {
                let api = self.api.clone();
                self.spawn_task(TaskKind::OrderStatus, task, move || {
                    handlers::update_order_status(api, id, status)
                });
            }
            UiEffect::UpdateStock { task, id, quantity } => {
                let api = self.api.clone();
                self.spawn_task(TaskKind::StockUpdate, task, move || {
                    handlers::update_stock(api, id, quantity)
                });
            }
            UiEffect::SaveNotifications {
                task,
                settings,
                previous,
            } => {
                let api = self.api.clone();
                self.spawn_task(TaskKind::Notifications, task, move || {
                    handlers::save_notifications(api, settings, previous)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
