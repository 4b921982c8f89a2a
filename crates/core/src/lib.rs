//! Core types shared by the helpdesk schema crates.
//!
//! Holds the constants, environment configuration and the hook seam through
//! which migrations notify the application's model layer.

mod config;
mod constants;
mod env_config;
mod error;
mod hooks;

pub use config::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use hooks::*;
