// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the patch.

use crate::port::{Port, PortDirection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the patch.
///
/// The node's rectangle is not stored: its width comes from the layout
/// configuration and its height from [`Node::row_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Instance ID
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Top-left corner in content space
    pub position: [f32; 2],
    /// Input ports, top to bottom
    pub inputs: Vec<Port>,
    /// Output ports, top to bottom
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a node with a fresh ID at the origin and no ports
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            position: [0.0, 0.0],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Use a specific ID
    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Append an input port
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(Port::new(name));
        self
    }

    /// Append an output port
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(Port::new(name));
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get a port by direction and index
    pub fn port(&self, direction: PortDirection, index: usize) -> Option<&Port> {
        match direction {
            PortDirection::Input => self.input(index),
            PortDirection::Output => self.output(index),
        }
    }

    /// Number of port rows, which drives the node height
    pub fn row_count(&self) -> usize {
        self.inputs.len().max(self.outputs.len())
    }
}
