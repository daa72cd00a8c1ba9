//! Math utilities and types
//!
//! Provides the fundamental vector types used by the model loaders.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// A vertex carrying a position and a normal.
///
/// STL facets are flat, so every vertex of a facet shares the facet
/// normal; the loaders duplicate it here so downstream consumers get a
/// self-contained vertex record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPositionNormal {
    /// Position in model space
    pub position: Vec3,
    /// Surface normal at the vertex
    pub normal: Vec3,
}

impl VertexPositionNormal {
    /// Create a new vertex from a position and a normal
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}
