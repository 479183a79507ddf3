// src/lib.rs

// Public modules (the proxyz driver API)
pub mod cli;
pub mod commands;
pub mod errors;
