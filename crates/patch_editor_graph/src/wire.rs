// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wire (edge) definitions for the patch.

use crate::node::NodeId;
use crate::port::PortRef;
use serde::{Deserialize, Serialize};

/// A directed connection from an output port to an input port.
///
/// Endpoints are positional. A wire whose node or port index no longer exists
/// is kept as-is and simply not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire {
    /// Source node ID
    pub from: NodeId,
    /// Output index on the source node
    pub output: usize,
    /// Target node ID
    pub to: NodeId,
    /// Input index on the target node
    pub input: usize,
}

impl Wire {
    /// Create a new wire
    pub fn new(from: NodeId, output: usize, to: NodeId, input: usize) -> Self {
        Self {
            from,
            output,
            to,
            input,
        }
    }

    /// The output port this wire starts at
    pub fn output_port(&self) -> PortRef {
        PortRef::output(self.from, self.output)
    }

    /// The input port this wire ends at
    pub fn input_port(&self) -> PortRef {
        PortRef::input(self.to, self.input)
    }

    /// Check if this wire touches a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from == node_id || self.to == node_id
    }
}
