use serde::{Deserialize, Serialize};

use super::plane::Plane;
use super::point::Point3d;
use super::vector::Vec3;
use crate::error::GeometryError;

/// A directed line segment from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point3d,
    pub end: Point3d,
}

impl Line {
    pub fn new(start: Point3d, end: Point3d) -> Self {
        Self { start, end }
    }

    /// Segment of `length` centered on `center` along `direction`.
    pub fn centered(center: Point3d, direction: Vec3, length: f64) -> Result<Self, GeometryError> {
        let half = direction.normalize_as("line direction")? * (length * 0.5);
        Ok(Self {
            start: center - half,
            end: center + half,
        })
    }

    /// `end - start`, not normalized.
    pub fn vector(&self) -> Vec3 {
        self.end - self.start
    }

    /// Unit direction from start to end.
    pub fn direction(&self) -> Result<Vec3, GeometryError> {
        self.vector().normalize_as("line direction")
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    pub fn midpoint(&self) -> Point3d {
        self.start.midpoint(&self.end)
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// Both endpoints projected orthogonally onto `plane`.
    pub fn project_onto_plane(&self, plane: &Plane) -> Self {
        Self {
            start: plane.project_point(self.start),
            end: plane.project_point(self.end),
        }
    }

    /// Distance from `point` to the infinite line through this segment.
    pub fn distance_to_point(&self, point: Point3d) -> Result<f64, GeometryError> {
        let dir = self.direction()?;
        Ok((point - self.start).reject_from(&dir).length())
    }
}
