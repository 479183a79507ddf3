// src/errors/mod.rs
//! Structured error reporting for the proxyz driver.
//!
//! Errors are miette diagnostics; this module renders them.

pub mod report;

pub use report::{
    render_resolve_error, render_to_stderr, render_to_string, snapshot_handler, terminal_handler,
};
