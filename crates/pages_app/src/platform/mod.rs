//! Terminal host for Prompt Pages: plays the background context for one
//! event per invocation, or runs an interactive popup surface.
mod app;
mod config;
mod effects;
mod host;
mod logging;
mod ui;

pub use app::run_app;
