// ErrLogView - app/mod.rs
//
// Application layer: query orchestration, result caching, publishing.
// Dependencies: core layer.
// Must NOT depend on: platform specifics.

pub mod service;
pub mod source;
pub mod viewer;
