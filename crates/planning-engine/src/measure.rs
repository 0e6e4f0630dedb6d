//! Landmark-to-plane distances.

use plan_kernel::{Plane, Point3d};
use plan_types::{LandmarkName, PlaneId};

use crate::types::{DistanceAnnotation, DistanceLabel};

/// Positive on the side the normal points to.
pub fn signed_distance(point: Point3d, plane: &Plane) -> f64 {
    plane.signed_distance(point)
}

pub fn closest_point(point: Point3d, plane: &Plane) -> Point3d {
    point - plane.normal() * signed_distance(point, plane)
}

/// Display text for a distance, always unsigned.
pub fn format_distance(distance: f64) -> String {
    format!("{:.2} mm", distance.abs())
}

/// Annotation for `landmark` at `point` against `plane`.
///
/// The label sits at the middle of the landmark-to-plane segment.
pub fn annotate(landmark: LandmarkName, point: Point3d, plane_id: PlaneId, plane: &Plane) -> DistanceAnnotation {
    let signed = signed_distance(point, plane);
    let projected_point = closest_point(point, plane);
    DistanceAnnotation {
        landmark,
        plane: plane_id,
        point,
        projected_point,
        signed_distance: signed,
        distance: signed.abs(),
        label: DistanceLabel {
            text: format_distance(signed),
            anchor: point.midpoint(&projected_point),
            billboard: true,
        },
    }
}
