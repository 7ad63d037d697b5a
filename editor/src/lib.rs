//! Headless level editor engine.
//!
//! This crate owns everything the level editor does between a raw input event
//! and the object list that ends up in a saved level: placing map objects,
//! dragging and resizing them, click / range / rubber-band selection,
//! grouping, and a linear undo history. The host layer (browser shell, test
//! harness, CLI) wires its events to [`engine::EditorCore`] and reacts to the
//! returned [`engine::Action`]s; rendering never happens here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | The editor controller, [`engine::EditorCore`] |
//! | [`doc`] | Map objects, levels, sparse updates and the ordered object store |
//! | [`history`] | Snapshot-based linear undo/redo |
//! | [`selection`] | Selection set with a range anchor |
//! | [`group`] | One-level grouping over the flat `parent_id` model |
//! | [`tree`] | Derived parent/children view for layer lists |
//! | [`camera`] | Screen/level coordinate conversion and level centring |
//! | [`input`] | Tools, modifiers, keys and the gesture state machine |
//! | [`hit`] | Rectangles, point hit-testing and marquee containment |
//! | [`consts`] | Shared numeric constants (thresholds, defaults) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod group;
pub mod history;
pub mod hit;
pub mod input;
pub mod selection;
pub mod tree;
