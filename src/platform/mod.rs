// ErrLogView - platform/mod.rs
//
// Platform layer: config directories, OS-backed text sources.
// Dependencies: app::source (the trait it implements), directories crate.

pub mod config;
pub mod console;
