//! Orientation of a plane as a unit quaternion.
//!
//! A plane's normal is its orientation applied to local +Z, the same
//! convention a renderer uses for a flat quad facing +Z.

use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::vector::Vec3;
use crate::error::GeometryError;

/// A rotation in 3D space.
///
/// Serialized as `[x, y, z, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct Orientation(UnitQuaternion<f64>);

impl Orientation {
    pub fn identity() -> Self {
        Self(UnitQuaternion::identity())
    }

    /// Rotation of `angle_deg` degrees about `axis` (right-hand rule).
    ///
    /// The axis is normalized first; a zero axis is degenerate.
    pub fn from_axis_angle_deg(axis: Vec3, angle_deg: f64) -> Result<Self, GeometryError> {
        let axis = axis.normalize_as("rotation axis")?;
        let unit = Unit::new_unchecked(Vector3::from(axis));
        Ok(Self(UnitQuaternion::from_axis_angle(
            &unit,
            angle_deg.to_radians(),
        )))
    }

    /// Shortest rotation taking the direction `from` onto the direction `to`.
    ///
    /// Opposite directions rotate half a turn about an axis perpendicular
    /// to `from`.
    pub fn between(from: Vec3, to: Vec3) -> Result<Self, GeometryError> {
        let from = from.normalize_as("source direction")?;
        let to = to.normalize_as("target direction")?;
        match UnitQuaternion::rotation_between(&Vector3::from(from), &Vector3::from(to)) {
            Some(q) => Ok(Self(q)),
            None => {
                let helper = if from.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
                let perpendicular = from.cross(&helper);
                Self::from_axis_angle_deg(perpendicular, 180.0)
            }
        }
    }

    pub fn rotate_vector(&self, v: Vec3) -> Vec3 {
        Vec3::from(self.0.transform_vector(&Vector3::from(v)))
    }

    /// Local +Z mapped into world space.
    pub fn normal(&self) -> Vec3 {
        self.rotate_vector(Vec3::Z)
    }

    /// `rotation` applied after `self` (world-space pre-multiplication).
    pub fn premultiply(&self, rotation: &Orientation) -> Self {
        Self(rotation.0 * self.0)
    }

    /// Angle of the rotation taking `self` to `other`, in degrees.
    pub fn angle_to_deg(&self, other: &Orientation) -> f64 {
        self.0.angle_to(&other.0).to_degrees()
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<UnitQuaternion<f64>> for Orientation {
    fn from(q: UnitQuaternion<f64>) -> Self {
        Self(q)
    }
}

impl From<Orientation> for [f64; 4] {
    fn from(o: Orientation) -> Self {
        let q = o.0.quaternion();
        [q.i, q.j, q.k, q.w]
    }
}

impl TryFrom<[f64; 4]> for Orientation {
    type Error = GeometryError;

    fn try_from([x, y, z, w]: [f64; 4]) -> Result<Self, Self::Error> {
        let q = Quaternion::new(w, x, y, z);
        let norm = q.norm();
        if !norm.is_finite() || norm < 1e-12 {
            return Err(GeometryError::InvalidOrientation { x, y, z, w });
        }
        Ok(Self(UnitQuaternion::from_quaternion(q)))
    }
}
