// src/dag/style.rs

//! Display style carried by nodes and edges for marshalers.

use std::fmt;

pub const DEFAULT_NODE_STYLE_TYPE: &str = "rounded,filled,solid";
pub const DEFAULT_NODE_SHAPE: &str = "hexagon";
pub const DEFAULT_EDGE_STYLE_TYPE: &str = "";
pub const DEFAULT_EDGE_SHAPE: &str = "normal";

/// RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub kind: String,
    pub shape: String,
    pub color: Rgb,
}

impl Style {
    pub fn node_default() -> Self {
        Self {
            kind: DEFAULT_NODE_STYLE_TYPE.to_string(),
            shape: DEFAULT_NODE_SHAPE.to_string(),
            color: Rgb::new(230, 230, 230),
        }
    }

    pub fn edge_default() -> Self {
        Self {
            kind: DEFAULT_EDGE_STYLE_TYPE.to_string(),
            shape: DEFAULT_EDGE_SHAPE.to_string(),
            color: Rgb::new(0, 0, 0),
        }
    }
}
