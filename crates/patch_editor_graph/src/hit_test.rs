// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer hit testing against a [`PatchLayout`].
//!
//! Positions are in content space. Tolerances are content-space distances;
//! callers working in screen pixels divide by the zoom first.

use crate::layout::{NodeLayout, PatchLayout};
use crate::port::{PortDirection, PortRef};
use egui::Pos2;

const WIRE_HIT_SEGMENTS: usize = 32;

impl PatchLayout {
    /// Topmost node whose rectangle contains `p`
    pub fn node_at(&self, p: Pos2) -> Option<&NodeLayout> {
        // Later nodes are drawn on top
        self.nodes.iter().rev().find(|n| n.rect.contains(p))
    }

    /// Port whose circle, grown by `tolerance`, contains `p`.
    ///
    /// When several qualify the closest anchor wins. Ports covered by a node
    /// drawn above their own node are not hit.
    pub fn port_at(&self, p: Pos2, tolerance: f32) -> Option<PortRef> {
        self.closest_port(p, tolerance, |_| true)
    }

    /// Like [`Self::port_at`], considering only ports facing `direction`
    pub fn port_facing_at(&self, p: Pos2, direction: PortDirection, tolerance: f32) -> Option<PortRef> {
        self.closest_port(p, tolerance, |port| port.direction == direction)
    }

    fn closest_port(&self, p: Pos2, tolerance: f32, accept: impl Fn(&PortRef) -> bool) -> Option<PortRef> {
        let topmost = self.node_at(p).map(|n| n.index);

        self.ports()
            .filter(|(port, _)| accept(port))
            .filter(|(port, _)| match (topmost, self.node(port.node)) {
                (Some(top), Some(owner)) => owner.index >= top,
                _ => true,
            })
            .filter_map(|(port, rect)| {
                let radius = rect.width().min(rect.height()) / 2.0;
                let distance = rect.center().distance(p);
                (distance <= radius + tolerance).then_some((port, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(port, _)| port)
    }

    /// Index into `Patch::wires` of the topmost wire passing within `tolerance` of `p`
    pub fn wire_at(&self, p: Pos2, tolerance: f32) -> Option<usize> {
        self.wires
            .iter()
            .rev()
            .filter(|w| w.curve.bounding_rect().expand(tolerance).contains(p))
            .find(|w| w.curve.distance_to(p, WIRE_HIT_SEGMENTS) <= tolerance)
            .map(|w| w.index)
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{layout_patch, LayoutConfig};
    use crate::node::Node;
    use crate::patch::Patch;
    use crate::port::{PortDirection, PortRef};
    use crate::wire::Wire;
    use egui::pos2;

    fn overlapping_patch() -> Patch {
        let mut patch = Patch::new();
        let a = patch.add_node(Node::new("A").with_output("out"));
        let b = patch.add_node(Node::new("B").with_position(100.0, 20.0).with_input("in"));
        let c = patch.add_node(Node::new("C").with_position(400.0, 0.0).with_input("in"));
        patch.wires.push(Wire::new(a, 0, c, 0));
        patch.wires.push(Wire::new(a, 0, b, 0));
        patch
    }

    #[test]
    fn test_node_at_prefers_topmost() {
        let patch = overlapping_patch();
        let layout = layout_patch(&patch, &LayoutConfig::default());

        // Inside both A and B: B was drawn last
        assert_eq!(layout.node_at(pos2(150.0, 30.0)).unwrap().id, patch.nodes[1].id);
        assert_eq!(layout.node_at(pos2(10.0, 10.0)).unwrap().id, patch.nodes[0].id);
        assert!(layout.node_at(pos2(-5.0, 10.0)).is_none());
    }

    #[test]
    fn test_port_at_with_tolerance() {
        let patch = overlapping_patch();
        let layout = layout_patch(&patch, &LayoutConfig::default());
        let c = patch.nodes[2].id;

        // C's input circle is centred at (420, 50) with radius 10
        assert_eq!(layout.port_at(pos2(420.0, 50.0), 0.0), Some(PortRef::input(c, 0)));
        assert_eq!(layout.port_at(pos2(432.0, 50.0), 0.0), None);
        assert_eq!(layout.port_at(pos2(432.0, 50.0), 3.0), Some(PortRef::input(c, 0)));
    }

    #[test]
    fn test_port_at_picks_closest() {
        let mut patch = Patch::new();
        let id = patch.add_node(Node::new("N").with_input("a").with_input("b"));
        let layout = layout_patch(&patch, &LayoutConfig::default());

        // Rows are 30 apart; a huge tolerance covers both
        assert_eq!(layout.port_at(pos2(20.0, 78.0), 50.0), Some(PortRef::input(id, 1)));
    }

    #[test]
    fn test_port_under_later_node_is_hidden() {
        let mut patch = Patch::new();
        let a = patch.add_node(Node::new("A").with_output("out"));
        let b = patch.add_node(Node::new("B").with_position(100.0, 0.0).with_input("in"));
        let layout = layout_patch(&patch, &LayoutConfig::default());

        // B covers A's output anchor at (180, 50)
        assert_eq!(layout.node_at(pos2(180.0, 50.0)).unwrap().id, b);
        assert_eq!(layout.port_at(pos2(180.0, 50.0), 6.0), None);
        // B's own port is still reachable
        assert_eq!(layout.port_at(pos2(120.0, 50.0), 0.0), Some(PortRef::input(b, 0)));

        // Raising A uncovers its port again
        patch.nodes.swap(0, 1);
        let layout = layout_patch(&patch, &LayoutConfig::default());
        assert_eq!(layout.port_at(pos2(180.0, 50.0), 6.0), Some(PortRef::output(a, 0)));
    }

    #[test]
    fn test_port_facing_skips_closer_opposite_port() {
        let mut patch = Patch::new();
        let a = patch.add_node(Node::new("A").with_output("out"));
        let c = patch.add_node(Node::new("C").with_position(200.0, 0.0).with_input("in"));
        let layout = layout_patch(&patch, &LayoutConfig::default());

        // A.out at (180, 50) is 15 away, C.in at (220, 50) is 25 away
        let p = pos2(195.0, 50.0);
        assert_eq!(layout.port_at(p, 20.0), Some(PortRef::output(a, 0)));
        assert_eq!(layout.port_facing_at(p, PortDirection::Input, 20.0), Some(PortRef::input(c, 0)));
        assert_eq!(layout.port_facing_at(p, PortDirection::Input, 5.0), None);
    }

    #[test]
    fn test_wire_at() {
        let patch = overlapping_patch();
        let layout = layout_patch(&patch, &LayoutConfig::default());

        // A.out anchor (180, 50) to C.in anchor (420, 50): a straight wire
        assert_eq!(layout.wire_at(pos2(300.0, 52.0), 4.0), Some(0));
        assert_eq!(layout.wire_at(pos2(300.0, 80.0), 4.0), None);
    }
}
