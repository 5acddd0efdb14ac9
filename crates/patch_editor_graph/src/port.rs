// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

impl PortDirection {
    /// The direction a wire from this port must end in
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// A named slot on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Port name, drawn as the label
    pub name: String,
}

impl Port {
    /// Create a new port
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Positional reference to a port: node identity, index and direction.
///
/// This is the key of the per-frame geometry index, so it stays valid only as
/// long as the node's port lists are not reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Index into the node's inputs or outputs
    pub index: usize,
    /// Which list `index` refers to
    pub direction: PortDirection,
}

impl PortRef {
    /// Reference an input port
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            direction: PortDirection::Input,
        }
    }

    /// Reference an output port
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            direction: PortDirection::Output,
        }
    }
}
