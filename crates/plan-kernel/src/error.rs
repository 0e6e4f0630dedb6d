/// Errors raised by geometric primitives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A zero-length (or near zero-length) vector was normalized.
    #[error("degenerate vector: cannot normalize {context}")]
    DegenerateVector { context: &'static str },

    /// A serialized quaternion had no usable magnitude.
    #[error("invalid orientation quaternion [{x}, {y}, {z}, {w}]")]
    InvalidOrientation { x: f64, y: f64, z: f64, w: f64 },
}
