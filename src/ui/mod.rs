//! Ratatui front-end: three entry panels, a row of table shortcuts and a
//! stack of table windows on top.

mod app;
mod commands;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use commands::Action;
pub use terminal::run_app;
