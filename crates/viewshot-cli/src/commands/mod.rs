//! CLI command implementations
//!
//! Each subcommand has its own module with the implementation logic.

pub mod capture;
pub mod handle;
