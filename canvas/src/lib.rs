//! Canvas core for the ambient note board.
//!
//! This crate owns everything that happens on the infinite note canvas:
//! converting pointer coordinates between screen and canvas space, the ordered
//! note collection, the bounded undo/redo history, hit-testing note chrome, and
//! the drag/resize/pan gesture state machine. It performs no I/O and reads no
//! clock; the host supplies timestamps and persists the resulting
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`], the composition the host drives |
//! | [`doc`] | Note records, sparse patches, and the copy-on-write note store |
//! | [`history`] | Snapshot-based undo/redo over the note collection |
//! | [`camera`] | Screen/canvas coordinate conversions |
//! | [`viewport`] | Pan/zoom controller with configurable bounds |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing pointer positions against note chrome |
//! | [`consts`] | Shared numeric constants (note sizes, zoom limits, chrome geometry) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod history;
pub mod input;
pub mod viewport;
