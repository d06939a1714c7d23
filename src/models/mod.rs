// src/models/mod.rs
pub mod snapshot;
