// src/commands/mod.rs
pub mod methods;
pub mod version;
