use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::GeometryError;
use crate::DEGENERATE_LENGTH_SQUARED;

/// A vector in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn scale(&self, factor: f64) -> Self {
        *self * factor
    }

    /// True when the vector is too short to carry a direction.
    pub fn is_degenerate(&self) -> bool {
        self.length_squared() <= DEGENERATE_LENGTH_SQUARED
    }

    /// Unit vector in the same direction.
    ///
    /// Fails with [`GeometryError::DegenerateVector`] when
    /// `length_squared() <= 1e-10`.
    pub fn normalize(&self) -> Result<Self, GeometryError> {
        self.normalize_as("vector")
    }

    /// Like [`Vec3::normalize`], naming what was being normalized in the error.
    pub fn normalize_as(&self, context: &'static str) -> Result<Self, GeometryError> {
        if self.is_degenerate() {
            return Err(GeometryError::DegenerateVector { context });
        }
        Ok(*self / self.length())
    }

    /// Angle to `other` in radians, 0 when either vector is zero.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let len_product = self.length() * other.length();
        if len_product < 1e-15 {
            return 0.0;
        }
        (self.dot(other) / len_product).clamp(-1.0, 1.0).acos()
    }

    /// Component of `self` along `axis`. Zero when `axis` is zero.
    pub fn project_on_vector(&self, axis: &Self) -> Self {
        let denom = axis.length_squared();
        if denom < 1e-30 {
            return Self::ZERO;
        }
        *axis * (self.dot(axis) / denom)
    }

    /// Component of `self` orthogonal to the unit vector `normal`.
    pub fn reject_from(&self, normal: &Self) -> Self {
        *self - *normal * self.dot(normal)
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self {
            x: arr[0],
            y: arr[1],
            z: arr[2],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vec3> for Vector3<f64> {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3<f64>> for Vec3 {
    fn from(v: Vector3<f64>) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}
