// src/monitor/mod.rs
pub mod fetch_loop;
pub mod rotation;
pub mod smoothing;

pub use fetch_loop::FetchLoop;
pub use rotation::PresenceRotator;
