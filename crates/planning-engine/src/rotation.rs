use std::collections::BTreeMap;

use plan_kernel::{Orientation, Plane, Vec3};
use plan_types::PlaneId;
use tracing::debug;

use crate::config::RotationMode;
use crate::types::{DerivedPlane, EngineError, PlanningRun};

/// Rotation bookkeeping for one rotatable plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub axis: Vec3,
    /// Total angle about `axis`, in degrees.
    pub angle_deg: f64,
    /// Orientation at angle zero.
    pub base: Orientation,
}

/// Per-plane rotation axes and angles, re-seeded after every run.
#[derive(Debug, Clone, Default)]
pub struct RotationTracker {
    states: BTreeMap<PlaneId, RotationState>,
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all state and take it from the planes of `run`.
    pub fn seed_from(&mut self, run: &PlanningRun) -> Result<(), EngineError> {
        self.states.clear();
        for plane in run.planes.values() {
            let Some(axis) = plane.rotation_axis else {
                continue;
            };
            let undo = Orientation::from_axis_angle_deg(axis, -plane.cumulative_angle_deg)?;
            self.states.insert(
                plane.id,
                RotationState {
                    axis,
                    angle_deg: plane.cumulative_angle_deg,
                    base: plane.geometry.orientation.premultiply(&undo),
                },
            );
        }
        Ok(())
    }

    pub fn state(&self, plane: PlaneId) -> Option<&RotationState> {
        self.states.get(&plane)
    }

    pub fn angle(&self, plane: PlaneId) -> Option<f64> {
        self.state(plane).map(|s| s.angle_deg)
    }

    /// Rotate `plane` about its own point by `delta_deg` and return the new
    /// total angle.
    pub fn rotate(
        &mut self,
        plane: &mut DerivedPlane,
        delta_deg: f64,
        mode: RotationMode,
    ) -> Result<f64, EngineError> {
        if !delta_deg.is_finite() {
            return Err(EngineError::NonFiniteAngle {
                plane: plane.id,
                angle_deg: delta_deg,
            });
        }
        let state = self
            .states
            .get_mut(&plane.id)
            .ok_or(EngineError::UninitializedRotationAxis { plane: plane.id })?;

        let angle_deg = state.angle_deg + delta_deg;
        plane.geometry = match mode {
            RotationMode::Accumulate => plane.geometry.rotated_about(state.axis, delta_deg)?,
            RotationMode::Reapply => {
                let total = Orientation::from_axis_angle_deg(state.axis, angle_deg)?;
                Plane::new(plane.geometry.point, state.base.premultiply(&total))
            }
        };
        state.angle_deg = angle_deg;
        plane.cumulative_angle_deg = angle_deg;

        debug!(plane = %plane.id, delta_deg, angle_deg, ?mode, "rotated plane");
        Ok(angle_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use plan_kernel::Point3d;

    fn run_with(plane: DerivedPlane) -> PlanningRun {
        let mut run = PlanningRun::new();
        run.planes.insert(plane.id, plane);
        run
    }

    fn seeded_plane() -> DerivedPlane {
        let base = Plane::from_point_normal(Point3d::new(1.0, 2.0, 3.0), Vec3::Z).unwrap();
        DerivedPlane::new(PlaneId::VarusValgus, base.rotated_about(Vec3::Y, 3.0).unwrap(), vec![])
            .with_rotation(Vec3::Y, 3.0)
    }

    #[test]
    fn test_seed_recovers_base_orientation() {
        let mut tracker = RotationTracker::new();
        tracker.seed_from(&run_with(seeded_plane())).unwrap();
        let state = tracker.state(PlaneId::VarusValgus).unwrap();
        assert_relative_eq!(state.base.normal().z, 1.0, epsilon = 1e-9);
        assert_eq!(state.angle_deg, 3.0);
    }

    #[test]
    fn test_round_trip_restores_orientation_and_angle() {
        for mode in [RotationMode::Accumulate, RotationMode::Reapply] {
            let mut plane = seeded_plane();
            let original = plane.clone();
            let mut tracker = RotationTracker::new();
            tracker.seed_from(&run_with(plane.clone())).unwrap();

            tracker.rotate(&mut plane, 10.0, mode).unwrap();
            assert_relative_eq!(plane.cumulative_angle_deg, 13.0);
            tracker.rotate(&mut plane, -10.0, mode).unwrap();

            assert_relative_eq!(plane.cumulative_angle_deg, 3.0);
            assert!(plane.geometry.orientation.angle_to_deg(&original.geometry.orientation) < 1e-4);
            assert_eq!(plane.geometry.point, original.geometry.point);
        }
    }

    #[test]
    fn test_modes_agree() {
        let mut a = seeded_plane();
        let mut b = seeded_plane();
        let mut ta = RotationTracker::new();
        let mut tb = RotationTracker::new();
        ta.seed_from(&run_with(a.clone())).unwrap();
        tb.seed_from(&run_with(b.clone())).unwrap();
        for delta in [10.0, 10.0, -1.0, 25.0] {
            ta.rotate(&mut a, delta, RotationMode::Accumulate).unwrap();
            tb.rotate(&mut b, delta, RotationMode::Reapply).unwrap();
        }
        assert!(a.geometry.orientation.angle_to_deg(&b.geometry.orientation) < 1e-4);
        assert_relative_eq!(ta.angle(PlaneId::VarusValgus).unwrap(), 47.0);
    }

    #[test]
    fn test_non_finite_delta_is_rejected() {
        let mut plane = seeded_plane();
        let original = plane.clone();
        let mut tracker = RotationTracker::new();
        tracker.seed_from(&run_with(plane.clone())).unwrap();

        let err = tracker
            .rotate(&mut plane, f64::INFINITY, RotationMode::Reapply)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::NonFiniteAngle { plane: PlaneId::VarusValgus, angle_deg: f64::INFINITY }
        );
        assert!(tracker.rotate(&mut plane, f64::NAN, RotationMode::Accumulate).is_err());
        assert_eq!(plane, original);
        assert_eq!(tracker.angle(PlaneId::VarusValgus), Some(3.0));
    }

    #[test]
    fn test_plane_without_axis_is_rejected() {
        let mut plane = DerivedPlane::new(
            PlaneId::DistalMedial,
            Plane::from_point_normal(Point3d::ORIGIN, Vec3::Z).unwrap(),
            vec![],
        );
        let mut tracker = RotationTracker::new();
        tracker.seed_from(&run_with(plane.clone())).unwrap();
        let err = tracker
            .rotate(&mut plane, 10.0, RotationMode::Accumulate)
            .unwrap_err();
        assert_eq!(err, EngineError::UninitializedRotationAxis { plane: PlaneId::DistalMedial });
        assert_eq!(plane.cumulative_angle_deg, 0.0);
    }
}
