// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch data structure containing nodes and wires.

use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortRef};
use crate::wire::Wire;
use serde::{Deserialize, Serialize};

/// A node graph as shown by the editor.
///
/// Both lists are ordered: nodes are drawn in order (later nodes on top) and
/// wires are drawn after all nodes. Node IDs are expected to be unique but this
/// is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    /// Nodes in draw order
    pub nodes: Vec<Node>,
    /// Wires in draw order
    pub wires: Vec<Wire>,
}

impl Patch {
    /// Create an empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node on top of the others
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node and every wire touching it.
    ///
    /// If the ID is duplicated all copies are removed and the first is returned.
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.wires.retain(|w| !w.involves_node(node_id));

        let mut removed = None;
        let mut i = 0;
        while i < self.nodes.len() {
            if self.nodes[i].id == node_id {
                let node = self.nodes.remove(i);
                removed.get_or_insert(node);
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Get a node by ID.
    ///
    /// With duplicated IDs the last copy wins, matching the layout's port index.
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.iter().rev().find(|n| n.id == node_id)
    }

    /// Get a mutable node by ID (last copy wins)
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().rev().find(|n| n.id == node_id)
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of wires
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Whether a port reference resolves to an existing port
    pub fn has_port(&self, port: PortRef) -> bool {
        self.node(port.node)
            .and_then(|n| n.port(port.direction, port.index))
            .is_some()
    }

    /// Connect an output port to an input port.
    ///
    /// Inputs take a single wire: an existing wire into `input` is replaced.
    /// Returns the index of the new wire.
    pub fn connect(&mut self, output: PortRef, input: PortRef) -> Result<usize, ConnectionError> {
        if output.direction != PortDirection::Output || input.direction != PortDirection::Input {
            return Err(ConnectionError::WrongDirection);
        }

        // Validate nodes exist
        let source = self.node(output.node)
            .ok_or(ConnectionError::NodeNotFound(output.node))?;
        let target = self.node(input.node)
            .ok_or(ConnectionError::NodeNotFound(input.node))?;

        // Validate ports exist
        if source.output(output.index).is_none() {
            return Err(ConnectionError::PortNotFound(output));
        }
        if target.input(input.index).is_none() {
            return Err(ConnectionError::PortNotFound(input));
        }

        if output.node == input.node {
            return Err(ConnectionError::SelfLoop);
        }

        let wire = Wire::new(output.node, output.index, input.node, input.index);
        if self.wires.contains(&wire) {
            return Err(ConnectionError::AlreadyConnected);
        }

        self.wires.retain(|w| w.input_port() != input);
        self.wires.push(wire);
        Ok(self.wires.len() - 1)
    }

    /// Current index of a wire, if it is still in the patch
    pub fn wire_index(&self, wire: &Wire) -> Option<usize> {
        self.wires.iter().position(|w| w == wire)
    }

    /// Remove a wire by index
    pub fn disconnect(&mut self, index: usize) -> Option<Wire> {
        (index < self.wires.len()).then(|| self.wires.remove(index))
    }

    /// Wires ending at an input port
    pub fn wires_into(&self, input: PortRef) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |w| w.input_port() == input)
    }

    /// Wires starting at an output port
    pub fn wires_from(&self, output: PortRef) -> impl Iterator<Item = &Wire> {
        self.wires.iter().filter(move |w| w.output_port() == output)
    }
}

/// Error when creating a wire
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortRef),

    /// Endpoints are not an output followed by an input
    #[error("Wires must run from an output to an input")]
    WrongDirection,

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Identical wire already exists
    #[error("Ports are already connected")]
    AlreadyConnected,
}
