// SPDX-License-Identifier: MIT OR Apache-2.0
//! Direct-manipulation edits: node dragging, drag-to-connect, selection.
//!
//! [`PatchInteraction`] is a small state machine fed with content-space
//! pointer positions. It holds no geometry of its own; every call takes the
//! layout of the current frame.

use crate::layout::{PatchLayout, WireCurve};
use crate::node::NodeId;
use crate::patch::{ConnectionError, Patch};
use crate::port::{PortDirection, PortRef};
use crate::wire::Wire;
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// Interaction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Extra pick radius around ports and wires, in screen pixels
    pub hit_tolerance: f32,
    /// Snap dragged nodes to the grid on release
    pub snap_to_grid: bool,
    /// Grid size for snapping
    pub grid_size: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hit_tolerance: 6.0,
            snap_to_grid: false,
            grid_size: 20.0,
        }
    }
}

impl InteractionConfig {
    /// Snap a position to the grid if snapping is enabled
    pub fn snap_position(&self, pos: [f32; 2]) -> [f32; 2] {
        if self.snap_to_grid && self.grid_size > 0.0 {
            [
                (pos[0] / self.grid_size).round() * self.grid_size,
                (pos[1] / self.grid_size).round() * self.grid_size,
            ]
        } else {
            pos
        }
    }
}

/// The selected element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// A node
    Node(NodeId),
    /// A wire, by value; it is looked up again in the patch when used
    Wire(Wire),
}

/// A wire being dragged out of a port
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireDrag {
    /// Port the drag started from
    pub anchor: PortRef,
    /// Current pointer position
    pub pointer: Pos2,
}

impl WireDrag {
    /// Curve from the anchor port to the pointer, oriented output to input
    pub fn preview_curve(&self, layout: &PatchLayout) -> Option<WireCurve> {
        let anchor = layout.port_anchor(self.anchor)?;
        Some(match self.anchor.direction {
            PortDirection::Output => WireCurve::between(anchor, self.pointer),
            PortDirection::Input => WireCurve::between(self.pointer, anchor),
        })
    }
}

/// Current interaction mode
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EditMode {
    /// Nothing in progress
    #[default]
    Idle,
    /// Moving a node
    DraggingNode {
        /// Position in `Patch::nodes`
        index: usize,
        /// Pointer position relative to the node's top-left corner
        grab_offset: Vec2,
    },
    /// Dragging out a new wire
    DraggingWire(WireDrag),
}

/// Result of finishing a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Selection changed (or was confirmed) by a click
    Selected(Option<Selection>),
    /// A node drag finished
    NodeMoved {
        /// Moved node
        node: NodeId,
        /// Final position
        position: [f32; 2],
    },
    /// A wire was created
    Connected {
        /// Index of the new wire
        wire: usize,
    },
    /// A wire drag ended on a port that could not accept it
    ConnectionRejected(ConnectionError),
    /// A wire drag ended away from any compatible port
    Cancelled,
}

enum Hit {
    Port(PortRef),
    Node { index: usize, id: NodeId, position: [f32; 2] },
    Wire(Wire),
    Empty,
}

/// Edit state machine for one editor canvas
#[derive(Debug, Clone, Default)]
pub struct PatchInteraction {
    /// Tuning
    pub config: InteractionConfig,
    mode: EditMode,
    selection: Option<Selection>,
}

impl PatchInteraction {
    /// Create an idle interaction with nothing selected
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            mode: EditMode::Idle,
            selection: None,
        }
    }

    /// Current mode
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Current selection
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Replace the selection
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    /// The in-progress wire, if any
    pub fn wire_drag(&self) -> Option<&WireDrag> {
        match &self.mode {
            EditMode::DraggingWire(drag) => Some(drag),
            _ => None,
        }
    }

    fn tolerance(&self, zoom: f32) -> f32 {
        if zoom > 0.0 {
            self.config.hit_tolerance / zoom
        } else {
            self.config.hit_tolerance
        }
    }

    fn hit(&self, patch: &Patch, layout: &PatchLayout, pos: Pos2, zoom: f32) -> Hit {
        let tolerance = self.tolerance(zoom);

        if let Some(port) = layout.port_at(pos, tolerance) {
            return Hit::Port(port);
        }
        if let Some(node) = layout.node_at(pos) {
            if let Some(n) = patch.nodes.get(node.index) {
                return Hit::Node {
                    index: node.index,
                    id: n.id,
                    position: n.position,
                };
            }
        }
        if let Some(wire) = layout.wire_at(pos, tolerance).and_then(|i| patch.wires.get(i)) {
            return Hit::Wire(*wire);
        }
        Hit::Empty
    }

    /// Pointer went down and started dragging at `pos`
    pub fn press(&mut self, patch: &Patch, layout: &PatchLayout, pos: Pos2, zoom: f32) {
        self.mode = match self.hit(patch, layout, pos, zoom) {
            Hit::Port(anchor) => EditMode::DraggingWire(WireDrag { anchor, pointer: pos }),
            Hit::Node { index, id, position } => {
                self.selection = Some(Selection::Node(id));
                EditMode::DraggingNode {
                    index,
                    grab_offset: pos - Pos2::new(position[0], position[1]),
                }
            }
            Hit::Wire(wire) => {
                self.selection = Some(Selection::Wire(wire));
                EditMode::Idle
            }
            Hit::Empty => {
                self.selection = None;
                EditMode::Idle
            }
        };
    }

    /// Pointer moved to `pos` during a drag
    pub fn drag_to(&mut self, patch: &mut Patch, pos: Pos2) {
        match &mut self.mode {
            EditMode::DraggingNode { index, grab_offset } => {
                if let Some(node) = patch.nodes.get_mut(*index) {
                    let top_left = pos - *grab_offset;
                    node.position = [top_left.x, top_left.y];
                }
            }
            EditMode::DraggingWire(drag) => drag.pointer = pos,
            EditMode::Idle => {}
        }
    }

    /// Pointer released at `pos`, ending the current drag
    pub fn release(&mut self, patch: &mut Patch, layout: &PatchLayout, pos: Pos2, zoom: f32) -> Option<EditOutcome> {
        self.drag_to(patch, pos);

        match std::mem::take(&mut self.mode) {
            EditMode::Idle => None,
            EditMode::DraggingNode { index, .. } => {
                let node = patch.nodes.get_mut(index)?;
                node.position = self.config.snap_position(node.position);
                tracing::debug!("Moved node '{}' to {:?}", node.name, node.position);
                Some(EditOutcome::NodeMoved {
                    node: node.id,
                    position: node.position,
                })
            }
            EditMode::DraggingWire(drag) => {
                let wanted = drag.anchor.direction.opposite();
                let Some(target) = layout.port_facing_at(pos, wanted, self.tolerance(zoom)) else {
                    return Some(EditOutcome::Cancelled);
                };

                let (output, input) = match drag.anchor.direction {
                    PortDirection::Output => (drag.anchor, target),
                    PortDirection::Input => (target, drag.anchor),
                };
                match patch.connect(output, input) {
                    Ok(wire) => {
                        tracing::debug!("Connected {output:?} -> {input:?}");
                        // The selected wire may have been replaced
                        if let Some(Selection::Wire(selected)) = self.selection {
                            if patch.wire_index(&selected).is_none() {
                                self.selection = None;
                            }
                        }
                        Some(EditOutcome::Connected { wire })
                    }
                    Err(err) => {
                        tracing::debug!("Connection rejected: {err}");
                        Some(EditOutcome::ConnectionRejected(err))
                    }
                }
            }
        }
    }

    /// A click without drag at `pos`: only changes the selection
    pub fn click(&mut self, patch: &Patch, layout: &PatchLayout, pos: Pos2, zoom: f32) -> EditOutcome {
        self.mode = EditMode::Idle;
        self.selection = match self.hit(patch, layout, pos, zoom) {
            Hit::Port(_) => self.selection,
            Hit::Node { id, .. } => Some(Selection::Node(id)),
            Hit::Wire(wire) => Some(Selection::Wire(wire)),
            Hit::Empty => None,
        };
        EditOutcome::Selected(self.selection)
    }

    /// Abandon the current drag. A dragged node stays where it is.
    pub fn cancel(&mut self) {
        self.mode = EditMode::Idle;
    }

    /// Remove the selected node or wire from the patch
    pub fn delete_selected(&mut self, patch: &mut Patch) -> Option<Selection> {
        let selection = self.selection.take()?;
        let removed = match selection {
            Selection::Node(id) => patch.remove_node(id).is_some(),
            Selection::Wire(wire) => patch
                .wire_index(&wire)
                .and_then(|index| patch.disconnect(index))
                .is_some(),
        };
        if removed {
            tracing::debug!("Deleted {selection:?}");
        }
        removed.then_some(selection)
    }
}
