//! ChartWiz TUI: the chart wizard as a terminal interface.
//!
//! One screen per wizard step, a breadcrumb of the step list, a live
//! preview chart on the last step, and a notification line fed by the
//! session.

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
