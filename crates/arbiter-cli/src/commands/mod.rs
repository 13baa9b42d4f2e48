//! CLI commands

pub mod analytics;
pub mod config;
pub mod decide;
pub mod replay;
