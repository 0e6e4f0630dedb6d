pub mod axis;
pub mod config;
pub mod measure;
pub mod pipeline;
pub mod rotation;
pub mod stages;
pub mod store;
pub mod types;

use std::collections::BTreeMap;

use plan_kernel::Point3d;
use plan_types::{LandmarkName, PlaneId};
use tracing::{debug, info};
use uuid::Uuid;

pub use crate::config::{CoronalAnchor, PlanningConfig, RotationDirection, RotationMode, RotationStep};
pub use crate::rotation::{RotationState, RotationTracker};
pub use crate::store::{LandmarkStore, Upsert};
pub use crate::types::{
    Availability, DerivedLine, DerivedPlane, DistanceAnnotation, DistanceLabel, EngineError,
    Landmark, PlanningRun, StageReport, Unavailable,
};

/// The femoral planning engine.
///
/// Owns the landmark store, the latest planning run and the rotation state
/// of its planes. All mutation goes through `&mut self`, so rotations of a
/// plane are applied one at a time.
pub struct Engine {
    config: PlanningConfig,
    store: LandmarkStore,
    /// Artifacts of the latest run.
    current: Option<PlanningRun>,
    rotations: RotationTracker,
    /// Visibility chosen by the user; carried across runs.
    visibility: BTreeMap<PlaneId, bool>,
}

impl Engine {
    /// Create an engine with a validated configuration.
    pub fn new(config: PlanningConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            store: LandmarkStore::new(),
            current: None,
            rotations: RotationTracker::new(),
            visibility: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next run, except the
    /// rotation step and mode which apply immediately.
    pub fn set_config(&mut self, config: PlanningConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn landmarks(&self) -> &LandmarkStore {
        &self.store
    }

    /// Place a landmark, or move it if it is already placed.
    ///
    /// Built artifacts keep their copied positions until the next run.
    pub fn place_or_update_landmark(
        &mut self,
        name: LandmarkName,
        position: Point3d,
    ) -> Result<Upsert, EngineError> {
        let outcome = self.store.upsert(name, position)?;
        debug!(%name, ?outcome, "landmark placed");
        Ok(outcome)
    }

    pub fn remove_landmark(&mut self, name: LandmarkName) -> Option<Landmark> {
        self.store.remove(name)
    }

    /// Make `name` the only landmark the user may drag.
    pub fn select_landmark(&mut self, name: LandmarkName) -> Result<(), EngineError> {
        let names: Vec<_> = self.store.names().collect();
        if !names.contains(&name) {
            return Err(EngineError::MissingLandmark { name });
        }
        for other in names {
            self.store.set_movable(other, other == name)?;
        }
        Ok(())
    }

    pub fn set_movable(&mut self, name: LandmarkName, movable: bool) -> Result<(), EngineError> {
        self.store.set_movable(name, movable)
    }

    /// Rebuild every artifact from the current landmarks.
    ///
    /// Rotation state is re-seeded from the new planes; visibility is kept.
    pub fn run_planning_pipeline(&mut self) -> Result<&PlanningRun, EngineError> {
        let mut run = pipeline::run_planning_pipeline(&self.store.snapshot(), &self.config);
        run.retires = self.current.as_ref().map(|previous| previous.run_id);
        for plane in run.planes.values_mut() {
            if let Some(visible) = self.visibility.get(&plane.id) {
                plane.visible = *visible;
            }
        }
        self.rotations.seed_from(&run)?;
        if let Some(retired) = run.retires {
            info!(%retired, run_id = %run.run_id, "replacing planning run");
        }
        Ok(self.current.insert(run))
    }

    pub fn current_run(&self) -> Option<&PlanningRun> {
        self.current.as_ref()
    }

    pub fn current_run_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|run| run.run_id)
    }

    pub fn plane(&self, plane: PlaneId) -> Result<&DerivedPlane, EngineError> {
        self.current
            .as_ref()
            .and_then(|run| run.plane(plane))
            .ok_or(EngineError::PlaneNotAvailable { plane })
    }

    fn plane_mut(&mut self, plane: PlaneId) -> Result<&mut DerivedPlane, EngineError> {
        self.current
            .as_mut()
            .and_then(|run| run.planes.get_mut(&plane))
            .ok_or(EngineError::PlaneNotAvailable { plane })
    }

    /// Rotate a plane about its fixed axis and return its new total angle.
    pub fn rotate_plane(&mut self, plane: PlaneId, delta_deg: f64) -> Result<f64, EngineError> {
        let mode = self.config.rotation_mode;
        let target = self
            .current
            .as_mut()
            .and_then(|run| run.planes.get_mut(&plane))
            .ok_or(EngineError::PlaneNotAvailable { plane })?;
        self.rotations.rotate(target, delta_deg, mode)
    }

    /// Rotate by one configured step.
    pub fn rotate_plane_step(
        &mut self,
        plane: PlaneId,
        direction: RotationDirection,
    ) -> Result<f64, EngineError> {
        let delta = direction.sign() * self.config.rotation_step.degrees();
        self.rotate_plane(plane, delta)
    }

    /// Flip a plane's visibility and return the new value.
    pub fn toggle_visibility(&mut self, plane: PlaneId) -> Result<bool, EngineError> {
        let target = self.plane_mut(plane)?;
        target.visible = !target.visible;
        let visible = target.visible;
        self.visibility.insert(plane, visible);
        Ok(visible)
    }

    /// Distance from a placed landmark to a plane of the current run.
    pub fn measure(
        &self,
        landmark: LandmarkName,
        plane: PlaneId,
    ) -> Result<DistanceAnnotation, EngineError> {
        let point = self.store.position(landmark)?;
        let target = self.plane(plane)?;
        Ok(measure::annotate(landmark, point, plane, &target.geometry))
    }

    /// Whether every landmark the current artifacts were built from is
    /// still placed.
    pub fn is_current(&self) -> bool {
        self.stale_dependencies().is_empty()
    }

    /// Landmarks used by the current artifacts that are no longer placed.
    pub fn stale_dependencies(&self) -> Vec<LandmarkName> {
        let Some(run) = &self.current else {
            return Vec::new();
        };
        let mut used: Vec<LandmarkName> = run
            .lines
            .values()
            .flat_map(|line| line.depends_on.iter().copied())
            .chain(run.planes.values().flat_map(|p| p.depends_on.iter().copied()))
            .chain(run.annotations.iter().map(|a| a.landmark))
            .collect();
        used.sort();
        used.dedup();
        self.store.missing(&used)
    }

    pub fn rotation_state(&self, plane: PlaneId) -> Option<&RotationState> {
        self.rotations.state(plane)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: PlanningConfig::default(),
            store: LandmarkStore::new(),
            current: None,
            rotations: RotationTracker::new(),
            visibility: BTreeMap::new(),
        }
    }
}
