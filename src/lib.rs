// ErrLogView - lib.rs
//
// Library entry point. The query surface lives in `app::viewer::LogViewer`;
// the `errlogview` binary is a thin CLI over it.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
