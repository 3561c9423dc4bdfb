// ErrLogView - core/mod.rs
//
// Core log-recovery logic: repair, extraction, filtering, rendering.
// Must NOT depend on: app, platform, or any I/O.

pub mod display;
pub mod extract;
pub mod filter;
pub mod model;
pub mod repair;
