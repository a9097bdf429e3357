//! # System Interaction Layer
//!
//! The boundary between the core application logic and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns external processes with inherited output, retries through
//!   `cmd.exe` on Windows when a program is not found, and checks that required tools are
//!   present on `PATH`.

pub mod executor;
