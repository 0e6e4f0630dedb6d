pub mod error;
pub mod geometry;

pub use error::GeometryError;
pub use geometry::line::Line;
pub use geometry::orientation::Orientation;
pub use geometry::plane::{project_point_onto_plane, Plane};
pub use geometry::point::Point3d;
pub use geometry::vector::Vec3;

/// Squared length at or below which a vector is treated as zero.
pub const DEGENERATE_LENGTH_SQUARED: f64 = 1e-10;
