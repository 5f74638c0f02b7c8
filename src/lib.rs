//! craftwatch - terminal dashboard for a Minecraft event-automation backend
//!
//! Polls the backend for the event calendar, event handler status, game
//! server and RCON health, and recent logs, and renders them as one
//! terminal frame.

pub mod calendar;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod health;
pub mod logging;
pub mod scheduler;
