use thiserror::Error;

/// Result type alias for network operations.
pub type Result<T> = core::result::Result<T, NetworkError>;

/// Errors reported by network construction, propagation and learning.
///
/// All of these are caller errors; the core has no transient failure modes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("topology needs at least 2 layers, got {layers}")]
    TooFewLayers { layers: usize },

    #[error("layer {layer} has width 0")]
    ZeroWidth { layer: usize },

    #[error("failed to reserve {bytes} bytes for network buffers")]
    Allocation { bytes: usize },

    #[error("input has {actual} bytes, input layer expects {expected}")]
    InputLength { expected: usize, actual: usize },

    #[error("learning magnitude must be >= 0, got {magnitude}")]
    NegativeMagnitude { magnitude: i64 },

    #[error("layer index {layer} out of range ({layers} available)")]
    LayerOutOfRange { layer: usize, layers: usize },

    #[error("synapse ({row}, {col}) out of range in connection layer {layer}")]
    PositionOutOfRange { layer: usize, row: usize, col: usize },

    #[error("connection layer {layer} holds {expected} weights, got {actual}")]
    InvalidWeights {
        layer: usize,
        expected: usize,
        actual: usize,
    },
}
