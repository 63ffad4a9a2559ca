//! Feature slices for the console (one per screen).

pub mod customers;
pub mod inventory;
pub mod login;
pub mod orders;
pub mod overview;
pub mod settings;
pub mod staff;

use crossterm::event::{KeyCode, KeyEvent};

/// Selection movement shared by every list screen.
pub(crate) fn move_selection(selected: &mut usize, len: usize, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            *selected = selected.saturating_sub(1);
            true
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if *selected + 1 < len {
                *selected += 1;
            }
            true
        }
        KeyCode::Home | KeyCode::Char('g') => {
            *selected = 0;
            true
        }
        KeyCode::End | KeyCode::Char('G') => {
            *selected = len.saturating_sub(1);
            true
        }
        _ => false,
    }
}

/// Keeps a selection inside a list that just changed length.
pub(crate) fn clamp_selection(selected: &mut usize, len: usize) {
    *selected = (*selected).min(len.saturating_sub(1));
}
