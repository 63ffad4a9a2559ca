//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod console;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod profile;
pub mod staff;

use comfy_table::{ContentArrangement, Table};

/// Plain table that fits the terminal width.
pub(crate) fn table<const N: usize>(header: [&str; N]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

/// Prints the server's confirmation, or `fallback` when it sent none.
pub(crate) fn confirm(message: Option<String>, fallback: &str) {
    println!("{}", message.unwrap_or_else(|| fallback.to_string()));
}
