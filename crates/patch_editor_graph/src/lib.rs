// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch editor core: a node-and-wire graph drawn on a single pan/zoom canvas.
//!
//! The crate is split into:
//! - The patch model (nodes, ports, wires)
//! - A pure layout pass producing node rectangles, port anchors and wire curves
//! - A drawing pass over a [`render::DrawSurface`] capability
//! - Hit testing and an edit state machine for node drag and drag-to-connect
//! - Viewport math turning incremental pan/pinch gestures into `(pan, zoom)`
//!
//! ## Architecture
//!
//! Nothing here caches geometry across frames. Every frame the host calls
//! [`layout::layout_patch`] on the current patch, draws the result, and
//! hit-tests pointer positions against the same layout. The [`ui`] module glues
//! all of it to an `egui::Ui`.

pub mod node;
pub mod port;
pub mod wire;
pub mod patch;
pub mod layout;
pub mod render;
pub mod hit_test;
pub mod viewport;
pub mod gesture;
pub mod interaction;
pub mod config;
pub mod ui;

pub use node::{Node, NodeId};
pub use port::{Port, PortDirection, PortRef};
pub use wire::Wire;
pub use patch::{ConnectionError, Patch};
pub use layout::{layout_patch, LayoutConfig, NodeLayout, PatchLayout, PortLayout, WireCurve, WireLayout};
pub use render::{draw_patch, DrawSurface, PatchStyle};
pub use viewport::{ViewportController, ViewportError, ViewportState, ZoomLimits};
pub use gesture::{GestureEvent, GestureSource, ModifierPanGate};
pub use interaction::{EditMode, EditOutcome, InteractionConfig, PatchInteraction, Selection, WireDrag};
pub use config::{ConfigError, EditorConfig};
pub use ui::{EguiGestures, PatchEditor};
