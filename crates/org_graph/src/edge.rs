use crate::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Line pattern of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// Stroke style for an edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub line: LineStyle,
    pub weight: f32,
}

impl EdgeStyle {
    pub fn solid(weight: f32) -> Self {
        Self {
            line: LineStyle::Solid,
            weight,
        }
    }

    pub fn dashed(weight: f32) -> Self {
        Self {
            line: LineStyle::Dashed,
            weight,
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::solid(1.0)
    }
}

/// A derived parent → child link. Never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub style: EdgeStyle,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, style: EdgeStyle) -> Self {
        Self {
            id: EdgeId::between(&from, &to),
            from,
            to,
            style,
        }
    }
}
