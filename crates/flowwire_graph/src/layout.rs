// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node layout constants.

use serde::{Deserialize, Serialize};

/// Layout constants shared by a node and its sockets.
///
/// Node height is never authored; it follows from these values and the
/// socket counts (see [`NodeLayout::height_for`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLayout {
    /// Node body width
    pub width: f32,
    /// Height of the title header
    pub header_height: f32,
    /// Vertical unit per socket row used for the node height
    pub socket_unit: f32,
    /// Vertical distance between consecutive sockets
    pub socket_spacing: f32,
    /// Socket hit/draw radius
    pub socket_radius: f32,
}

impl NodeLayout {
    /// Height of a node holding `inputs` input and `outputs` output sockets:
    /// `unit * (max(inputs, outputs) + 1) + header_height`
    pub fn height_for(&self, inputs: usize, outputs: usize) -> f32 {
        let rows = inputs.max(outputs) + 1;
        self.socket_unit * rows as f32 + self.header_height
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            width: 200.0,
            header_height: 40.0,
            socket_unit: 50.0,
            socket_spacing: 50.0,
            socket_radius: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_for() {
        let layout = NodeLayout::default();
        assert_eq!(layout.height_for(0, 0), 90.0);
        assert_eq!(layout.height_for(2, 1), 190.0);
        assert_eq!(layout.height_for(1, 4), 290.0);
    }
}
