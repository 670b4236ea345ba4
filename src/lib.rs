//! Task-tracking HTTP service: CRUD over todo records backed by SQLite.
//!
//! The binary wires [`Config`] + [`TodoStore`] into the router from
//! [`router::app`]; everything else hangs off the per-request handlers.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;

pub use config::Config;
pub use db::TodoStore;
pub use router::{app, AppState};
