//! Configuration module for the narrator.
//!
//! Provides CLI argument parsing and the Polly voice catalog.

#[allow(clippy::module_inception)]
mod config;
mod voices;

pub use config::{AppConfig, Engine};
