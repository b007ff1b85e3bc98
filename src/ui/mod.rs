//! # User Interface
//!
//! Colored terminal output for the CLI driver.

pub mod log;

pub use log::{debug, error, header, info, success, warn, Log};
