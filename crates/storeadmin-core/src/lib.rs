//! Core storeadmin library (config, credentials, API layer, session controller).

pub mod api;
pub mod config;
pub mod credentials;
pub mod format;
pub mod logging;
pub mod session;
pub mod tasks;
