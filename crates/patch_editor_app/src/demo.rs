// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch shown when the editor starts.

use patch_editor_graph::{ConnectionError, Node, Patch, PortRef};

/// A small synth voice: two sources into a filter, a mixer and the output
pub fn demo_patch() -> Result<Patch, ConnectionError> {
    let mut patch = Patch::new();

    let osc = patch.add_node(Node::new("Oscillator").with_position(40.0, 40.0).with_output("out"));
    let lfo = patch.add_node(Node::new("LFO").with_position(40.0, 200.0).with_output("out"));
    let noise = patch.add_node(Node::new("Noise").with_position(40.0, 330.0).with_output("out"));
    let filter = patch.add_node(
        Node::new("Filter")
            .with_position(320.0, 60.0)
            .with_input("in")
            .with_input("cutoff")
            .with_output("out"),
    );
    let mixer = patch.add_node(
        Node::new("Mixer")
            .with_position(600.0, 120.0)
            .with_input("a")
            .with_input("b")
            .with_output("left")
            .with_output("right"),
    );
    let output = patch.add_node(
        Node::new("Output")
            .with_position(880.0, 120.0)
            .with_input("left")
            .with_input("right"),
    );

    patch.connect(PortRef::output(osc, 0), PortRef::input(filter, 0))?;
    patch.connect(PortRef::output(lfo, 0), PortRef::input(filter, 1))?;
    patch.connect(PortRef::output(filter, 0), PortRef::input(mixer, 0))?;
    patch.connect(PortRef::output(noise, 0), PortRef::input(mixer, 1))?;
    patch.connect(PortRef::output(mixer, 0), PortRef::input(output, 0))?;
    patch.connect(PortRef::output(mixer, 1), PortRef::input(output, 1))?;

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patch_editor_graph::{layout_patch, LayoutConfig};

    #[test]
    fn test_demo_patch_is_fully_wired() {
        let patch = demo_patch().unwrap();
        assert_eq!(patch.node_count(), 6);
        assert_eq!(patch.wire_count(), 6);

        let layout = layout_patch(&patch, &LayoutConfig::default());
        assert_eq!(layout.wires.len(), patch.wire_count());
    }

    #[test]
    fn test_demo_nodes_do_not_overlap() {
        let patch = demo_patch().unwrap();
        let layout = layout_patch(&patch, &LayoutConfig::default());

        for (i, a) in layout.nodes.iter().enumerate() {
            for b in &layout.nodes[i + 1..] {
                assert!(!a.rect.intersects(b.rect), "{} overlaps {}", a.index, b.index);
            }
        }
    }
}
