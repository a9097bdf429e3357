// src/cli/handlers/mod.rs

// One module per CLI action, plus the state they share.

pub mod build;
pub mod commons;
pub mod example;
pub mod list;
pub mod run;
