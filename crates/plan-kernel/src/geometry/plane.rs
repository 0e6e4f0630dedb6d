use serde::{Deserialize, Serialize};

use super::orientation::Orientation;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::GeometryError;

/// Orthogonal projection of `point` onto the plane through `plane_point`
/// with unit `normal`: `point − normal·((point − plane_point)·normal)`.
pub fn project_point_onto_plane(point: Point3d, normal: Vec3, plane_point: Point3d) -> Point3d {
    point - normal * (point - plane_point).dot(&normal)
}

/// An infinite plane given by a point on it and an orientation whose local
/// +Z axis is the plane normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub point: Point3d,
    pub orientation: Orientation,
}

impl Plane {
    pub fn new(point: Point3d, orientation: Orientation) -> Self {
        Self { point, orientation }
    }

    /// Plane through `point` facing `normal` (need not be unit length).
    pub fn from_point_normal(point: Point3d, normal: Vec3) -> Result<Self, GeometryError> {
        Ok(Self {
            point,
            orientation: Orientation::between(Vec3::Z, normal)?,
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> Vec3 {
        self.orientation.normal()
    }

    /// Signed distance of `point` along the normal; positive on the side
    /// the normal points to.
    pub fn signed_distance(&self, point: Point3d) -> f64 {
        (point - self.point).dot(&self.normal())
    }

    pub fn project_point(&self, point: Point3d) -> Point3d {
        project_point_onto_plane(point, self.normal(), self.point)
    }

    /// Same orientation, passing through `point`.
    pub fn parallel_through(&self, point: Point3d) -> Self {
        Self {
            point,
            orientation: self.orientation,
        }
    }

    /// Same orientation, moved `distance` along the normal.
    pub fn offset_along_normal(&self, distance: f64) -> Self {
        self.parallel_through(self.point + self.normal() * distance)
    }

    /// Rotated in place about the line through `self.point` along `axis`.
    pub fn rotated_about(&self, axis: Vec3, angle_deg: f64) -> Result<Self, GeometryError> {
        let rotation = Orientation::from_axis_angle_deg(axis, angle_deg)?;
        Ok(self.rotated_by(&rotation))
    }

    pub fn rotated_by(&self, rotation: &Orientation) -> Self {
        Self {
            point: self.point,
            orientation: self.orientation.premultiply(rotation),
        }
    }

    /// Angle between the two normals, in degrees.
    pub fn angle_between_normals_deg(&self, other: &Plane) -> f64 {
        self.normal().angle_to(&other.normal()).to_degrees()
    }
}
