// src/core/mod.rs

//! # Core Logic
//!
//! Configuration loading, option-file resolution, template expansion and command
//! composition. Nothing in here spawns processes; that is left to [`crate::system`].

pub mod commons;
pub mod composer;
pub mod config_store;
pub mod context;
pub mod interpolator;
pub mod option_files;
pub mod paths;
pub mod registry;
pub mod task_executor;
