//! CLI library components for `insight`.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
