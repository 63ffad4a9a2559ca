//! Raw-mode setup and teardown for the console.
//!
//! The console draws on stderr, so stdout stays free for anything piped.
//! Teardown runs from `TuiRuntime::drop` and from the panic hook.

use std::io::{self, Stderr};
use std::panic;

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

pub type ConsoleTerminal = Terminal<CrosstermBackend<Stderr>>;

const WINDOW_TITLE: &str = "Store Admin";

/// Switches stderr into the alternate screen and wraps it for ratatui.
///
/// # Errors
/// Returns an error if raw mode or the alternate screen cannot be entered.
pub fn setup_terminal() -> Result<ConsoleTerminal> {
    enable_raw_mode().context("enable raw mode")?;
    let mut out = io::stderr();
    execute!(
        out,
        EnterAlternateScreen,
        EnableBracketedPaste,
        SetTitle(WINDOW_TITLE),
        Hide
    )
    .context("enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(out)).context("create terminal")
}

/// Leaves the alternate screen and raw mode. Safe to call more than once.
///
/// # Errors
/// Returns an error if the terminal refuses to leave the alternate screen.
pub fn restore_terminal() -> Result<()> {
    let mut out = io::stderr();
    // Paste mode has to go before raw mode
    let _ = execute!(out, DisableBracketedPaste, Show);
    execute!(out, LeaveAlternateScreen).context("leave alternate screen")?;
    disable_raw_mode().context("disable raw mode")
}

/// Chains a hook that puts the terminal back before the panic message prints.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous(info);
    }));
}
