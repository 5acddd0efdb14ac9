// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout pass: patch in, concrete content-space geometry out.
//!
//! The result is rebuilt from scratch every frame and doubles as the
//! hit-testing index (see [`crate::hit_test`]).

use crate::node::{Node, NodeId};
use crate::patch::Patch;
use crate::port::{PortDirection, PortRef};
use egui::{pos2, vec2, Pos2, Rect, Vec2};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Horizontal control-point offset of a wire, as a fraction of the horizontal
/// distance between its endpoints
pub const WIRE_CONTROL_FACTOR: f32 = 0.4;

/// Geometry constants for the layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed node width
    pub node_width: f32,
    /// Port bounding box (width, height)
    pub port_size: [f32; 2],
    /// Gap between port rows and between ports and the node edge
    pub port_spacing: f32,
    /// Height of the title band above the first port row
    pub header_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            port_size: [20.0, 20.0],
            port_spacing: 10.0,
            header_height: 40.0,
        }
    }
}

impl LayoutConfig {
    /// Vertical distance between consecutive ports
    pub fn row_height(&self) -> f32 {
        self.port_size[1] + self.port_spacing
    }

    /// Port bounding box size
    pub fn port_size(&self) -> Vec2 {
        vec2(self.port_size[0], self.port_size[1])
    }

    /// Derived node size
    pub fn node_size(&self, node: &Node) -> Vec2 {
        vec2(
            self.node_width,
            node.row_count() as f32 * self.row_height() + self.header_height,
        )
    }

    /// Node rectangle in content space
    pub fn node_rect(&self, node: &Node) -> Rect {
        Rect::from_min_size(pos2(node.position[0], node.position[1]), self.node_size(node))
    }

    /// Bounding box of the `index`-th port on one side of a node.
    ///
    /// Does not check that the port exists.
    pub fn port_rect(&self, node: &Node, direction: PortDirection, index: usize) -> Rect {
        let [x, y] = node.position;
        let top = y + self.header_height + index as f32 * self.row_height();
        let left = match direction {
            PortDirection::Input => x + self.port_spacing,
            PortDirection::Output => x + self.node_width - self.port_spacing - self.port_size[0],
        };
        Rect::from_min_size(pos2(left, top), self.port_size())
    }
}

/// Cubic bezier used to draw a wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireCurve {
    /// Output anchor
    pub from: Pos2,
    /// Control point next to the output
    pub ctrl1: Pos2,
    /// Control point next to the input
    pub ctrl2: Pos2,
    /// Input anchor
    pub to: Pos2,
}

impl WireCurve {
    /// S-curve that leaves `from` and enters `to` horizontally
    pub fn between(from: Pos2, to: Pos2) -> Self {
        let d = WIRE_CONTROL_FACTOR * (to.x - from.x).abs();
        Self {
            from,
            ctrl1: pos2(from.x + d, from.y),
            ctrl2: pos2(to.x - d, to.y),
            to,
        }
    }

    /// Evaluate the curve at `t` in `0..=1`
    pub fn point_at(&self, t: f32) -> Pos2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.from.x + 3.0 * mt2 * t * self.ctrl1.x + 3.0 * mt * t2 * self.ctrl2.x + t3 * self.to.x;
        let y = mt3 * self.from.y + 3.0 * mt2 * t * self.ctrl1.y + 3.0 * mt * t2 * self.ctrl2.y + t3 * self.to.y;
        pos2(x, y)
    }

    /// Flatten into `segments + 1` points, endpoints included
    pub fn points(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    /// Box containing the whole curve (the hull of its control points)
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_points(&[self.from, self.ctrl1, self.ctrl2, self.to])
    }

    /// Approximate distance from `p` to the curve
    pub fn distance_to(&self, p: Pos2, segments: usize) -> f32 {
        self.points(segments)
            .windows(2)
            .map(|seg| distance_to_segment(p, seg[0], seg[1]))
            .fold(f32::INFINITY, f32::min)
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Geometry of one port
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortLayout {
    /// Port bounding box
    pub rect: Rect,
    /// Where the label is anchored: its left edge for inputs, right edge for outputs
    pub label_pos: Pos2,
}

impl PortLayout {
    /// Point wires attach to
    pub fn anchor(&self) -> Pos2 {
        self.rect.center()
    }
}

/// Geometry of one node
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    /// Node ID
    pub id: NodeId,
    /// Position in `Patch::nodes`
    pub index: usize,
    /// Node rectangle
    pub rect: Rect,
    /// Centre of the title band
    pub title_pos: Pos2,
    /// Input ports, top to bottom
    pub inputs: Vec<PortLayout>,
    /// Output ports, top to bottom
    pub outputs: Vec<PortLayout>,
}

/// Geometry of one drawable wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WireLayout {
    /// Position in `Patch::wires`
    pub index: usize,
    /// Curve between the two port anchors
    pub curve: WireCurve,
}

/// Result of a layout pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchLayout {
    /// Node geometry, in patch order
    pub nodes: Vec<NodeLayout>,
    /// Wires whose endpoints both resolved, in patch order
    pub wires: Vec<WireLayout>,
    ports: IndexMap<PortRef, Rect>,
}

impl PatchLayout {
    /// Port bounding box
    pub fn port_rect(&self, port: PortRef) -> Option<Rect> {
        self.ports.get(&port).copied()
    }

    /// Point wires attach to: the centre of the port box
    pub fn port_anchor(&self, port: PortRef) -> Option<Pos2> {
        self.port_rect(port).map(|r| r.center())
    }

    /// All indexed ports
    pub fn ports(&self) -> impl Iterator<Item = (PortRef, Rect)> + '_ {
        self.ports.iter().map(|(port, rect)| (*port, *rect))
    }

    /// Number of indexed ports
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Topmost node geometry for an ID
    pub fn node(&self, id: NodeId) -> Option<&NodeLayout> {
        self.nodes.iter().rev().find(|n| n.id == id)
    }

    /// Union of all node rectangles
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes.iter().map(|n| n.rect).reduce(|a, b| a.union(b))
    }
}

/// Lay out every node, port and wire of a patch.
///
/// Never fails. Wires referencing a missing node or port index are left out
/// of [`PatchLayout::wires`].
pub fn layout_patch(patch: &Patch, config: &LayoutConfig) -> PatchLayout {
    let mut layout = PatchLayout {
        nodes: Vec::with_capacity(patch.nodes.len()),
        wires: Vec::with_capacity(patch.wires.len()),
        ports: IndexMap::new(),
    };

    for (index, node) in patch.nodes.iter().enumerate() {
        let rect = config.node_rect(node);
        let label_offset = vec2(config.port_size[0] / 2.0 + config.port_spacing, 0.0);

        let inputs: Vec<_> = (0..node.inputs.len())
            .map(|i| {
                let rect = config.port_rect(node, PortDirection::Input, i);
                PortLayout { rect, label_pos: rect.center() + label_offset }
            })
            .collect();
        let outputs: Vec<_> = (0..node.outputs.len())
            .map(|i| {
                let rect = config.port_rect(node, PortDirection::Output, i);
                PortLayout { rect, label_pos: rect.center() - label_offset }
            })
            .collect();

        for (i, port) in inputs.iter().enumerate() {
            layout.ports.insert(PortRef::input(node.id, i), port.rect);
        }
        for (i, port) in outputs.iter().enumerate() {
            layout.ports.insert(PortRef::output(node.id, i), port.rect);
        }

        layout.nodes.push(NodeLayout {
            id: node.id,
            index,
            rect,
            title_pos: pos2(rect.center().x, rect.top() + config.header_height / 2.0),
            inputs,
            outputs,
        });
    }

    for (index, wire) in patch.wires.iter().enumerate() {
        if let (Some(from), Some(to)) = (
            layout.port_anchor(wire.output_port()),
            layout.port_anchor(wire.input_port()),
        ) {
            layout.wires.push(WireLayout {
                index,
                curve: WireCurve::between(from, to),
            });
        }
    }

    layout
}
