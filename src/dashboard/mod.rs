//! Dashboard state, orchestration and rendering.
//!
//! [`DashboardController`] owns a [`DashboardState`] and refreshes each panel
//! from the backend; [`view::render`] turns a state snapshot into a terminal
//! frame.

mod controller;
mod state;
pub mod view;

pub use controller::DashboardController;
pub use state::{DashboardState, LogSource, Panel, PanelData, Selection};
