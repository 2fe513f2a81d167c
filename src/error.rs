//! Error types for cave generation.

use thiserror::Error;

/// Errors that can occur while generating a cave map or its meshes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaveError {
    /// Width or height was zero.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Square size must be a positive, finite number.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f32),

    /// Wall extrusion height must be a positive, finite number.
    #[error("invalid wall height: {0}")]
    InvalidWallHeight(f32),

    /// Noise frequency must be a positive, finite number.
    #[error("invalid noise frequency: {0}")]
    InvalidNoiseFrequency(f32),

    /// Fill percentage outside 0..=100.
    #[error("invalid fill percent: {0} (expected 0..=100)")]
    InvalidFillPercent(u32),

    /// Mesh generation was handed a grid with no cells.
    #[error("occupancy grid is empty")]
    EmptyGrid,

    /// At least 2x2 cells are needed to form a single marching square.
    #[error("grid {width}x{height} is too small to form a square")]
    GridTooSmall { width: usize, height: usize },

    /// A triangle referenced a vertex that does not exist.
    #[error("vertex index {index} out of range ({vertex_count} vertices)")]
    VertexOutOfRange { index: u32, vertex_count: usize },

    /// Flat index buffer length was not a multiple of three.
    #[error("index buffer length {0} is not a multiple of 3")]
    MalformedIndexBuffer(usize),
}

/// Result type for cave generation.
pub type CaveResult<T> = Result<T, CaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_values() {
        let err = CaveError::InvalidDimensions {
            width: 0,
            height: 12,
        };
        assert_eq!(err.to_string(), "invalid grid dimensions: 0x12");

        let err = CaveError::VertexOutOfRange {
            index: 9,
            vertex_count: 4,
        };
        assert!(err.to_string().contains("9"));
        assert!(err.to_string().contains("4 vertices"));
    }
}
