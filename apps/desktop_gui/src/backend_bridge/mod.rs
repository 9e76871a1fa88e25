//! Backend side of the window: a worker thread that owns the HTTP transport.

pub mod commands;
pub mod runtime;
