//! Stage plot editor core.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! stage plot document, the icon catalog, and the pointer/keyboard interaction
//! state machine that places, moves, resizes and labels equipment on the
//! stage. The input list shown beside the canvas is derived from the document
//! on every read. The host JavaScript layer only wires DOM events to the
//! engine and renders what it is told.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Application state with an injected storage port |
//! | [`engine`] | Browser engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Stage document, placed items and their invariants |
//! | [`catalog`] | Built-in icon taxonomy plus custom icons |
//! | [`payload`] | Drag payload wire format |
//! | [`input`] | Input event types and the interaction state machine |
//! | [`hit`] | Hit-testing pointer positions against placed items |
//! | [`viewport`] | Canvas bounds, percentage conversion and zoom |
//! | [`input_list`] | Console input list derived from placed items |
//! | [`ingest`] | Custom icon upload validation |
//! | [`stage_size`] | Stage size dialog form |
//! | [`storage`] | Persisted snapshot and storage backends |
//! | [`consts`] | Shared numeric constants (clamp bounds, timings, sizes) |

pub mod app;
pub mod catalog;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod ingest;
pub mod input;
pub mod input_list;
pub mod payload;
pub mod stage_size;
pub mod storage;
pub mod viewport;
