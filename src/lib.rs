//! Ambient note board host.
//!
//! The `canvas` crate owns geometry, notes, history and gestures. This crate
//! wraps it with everything that touches the outside world: configuration,
//! key-value persistence, JSON export/import, the wallpaper and track
//! catalogs, keyboard shortcuts, and the session that ties them together.

pub mod catalog;
pub mod config;
pub mod export;
pub mod session;
pub mod shortcuts;
pub mod storage;
