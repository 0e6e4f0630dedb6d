use std::collections::BTreeMap;

use plan_kernel::{GeometryError, Line, Plane, Point3d, Vec3};
use plan_types::{LandmarkName, LineId, PlaneId, StageKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named anatomical point placed on the bone model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: LandmarkName,
    pub position: Point3d,
    /// Whether the UI currently lets the user drag this landmark.
    pub movable: bool,
}

/// A reference axis derived from landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedLine {
    pub id: LineId,
    #[serde(flatten)]
    pub geometry: Line,
    /// Landmarks whose positions were copied into this line.
    pub depends_on: Vec<LandmarkName>,
}

impl DerivedLine {
    pub fn direction(&self) -> Result<Vec3, GeometryError> {
        self.geometry.direction()
    }
}

/// A planning plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedPlane {
    pub id: PlaneId,
    #[serde(flatten)]
    pub geometry: Plane,
    /// Fixed at construction. `None` means the plane cannot be rotated.
    pub rotation_axis: Option<Vec3>,
    /// Total rotation about `rotation_axis`, including the construction seed.
    pub cumulative_angle_deg: f64,
    pub visible: bool,
    pub depends_on: Vec<LandmarkName>,
}

impl DerivedPlane {
    pub fn new(id: PlaneId, geometry: Plane, depends_on: Vec<LandmarkName>) -> Self {
        Self {
            id,
            geometry,
            rotation_axis: None,
            cumulative_angle_deg: 0.0,
            visible: true,
            depends_on,
        }
    }

    /// Attach a rotation axis and the angle already applied about it.
    pub fn with_rotation(mut self, axis: Vec3, seed_deg: f64) -> Self {
        self.rotation_axis = Some(axis);
        self.cumulative_angle_deg = seed_deg;
        self
    }

    pub fn normal(&self) -> Vec3 {
        self.geometry.normal()
    }
}

/// Text shown next to a distance segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceLabel {
    pub text: String,
    pub anchor: Point3d,
    /// The label always faces the camera.
    pub billboard: bool,
}

/// Distance from a landmark to a plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceAnnotation {
    pub landmark: LandmarkName,
    pub plane: PlaneId,
    pub point: Point3d,
    /// Closest point on the plane.
    pub projected_point: Point3d,
    /// Positive on the side the plane normal points to.
    pub signed_distance: f64,
    pub distance: f64,
    pub label: DistanceLabel,
}

/// Why a stage produced nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Unavailable {
    MissingLandmarks { names: Vec<LandmarkName> },
    UpstreamUnavailable { stage: StageKind },
    Degenerate { context: String },
    Failed { reason: String },
}

impl From<EngineError> for Unavailable {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MissingLandmark { name } => Unavailable::MissingLandmarks { names: vec![name] },
            EngineError::UpstreamUnavailable { stage } => Unavailable::UpstreamUnavailable { stage },
            EngineError::DegenerateVector(GeometryError::DegenerateVector { context }) => {
                Unavailable::Degenerate {
                    context: context.to_string(),
                }
            }
            other => Unavailable::Failed {
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Availability {
    Available,
    NotAvailable { reason: Unavailable },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageKind,
    pub availability: Availability,
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningRun {
    pub run_id: Uuid,
    /// The run this one replaces; its artifacts should be discarded.
    pub retires: Option<Uuid>,
    pub lines: BTreeMap<LineId, DerivedLine>,
    pub planes: BTreeMap<PlaneId, DerivedPlane>,
    pub annotations: Vec<DistanceAnnotation>,
    /// One report per stage, in construction order.
    pub stages: Vec<StageReport>,
    /// Availability of the reference axes that do not gate the chain.
    pub reference_axes: BTreeMap<LineId, Availability>,
}

impl PlanningRun {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            retires: None,
            lines: BTreeMap::new(),
            planes: BTreeMap::new(),
            annotations: Vec::new(),
            stages: Vec::new(),
            reference_axes: BTreeMap::new(),
        }
    }

    pub fn availability(&self, stage: StageKind) -> Option<&Availability> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| &r.availability)
    }

    pub fn is_available(&self, stage: StageKind) -> bool {
        self.availability(stage)
            .is_some_and(Availability::is_available)
    }

    pub fn line(&self, id: LineId) -> Option<&DerivedLine> {
        self.lines.get(&id)
    }

    pub fn plane(&self, id: PlaneId) -> Option<&DerivedPlane> {
        self.planes.get(&id)
    }

    pub fn available_stage_count(&self) -> usize {
        self.stages
            .iter()
            .filter(|r| r.availability.is_available())
            .count()
    }
}

impl Default for PlanningRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from the planning engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("landmark not placed: {name}")]
    MissingLandmark { name: LandmarkName },

    #[error("geometry error: {0}")]
    DegenerateVector(#[from] GeometryError),

    #[error("upstream stage not available: {stage}")]
    UpstreamUnavailable { stage: StageKind },

    #[error("plane {plane} has no rotation axis")]
    UninitializedRotationAxis { plane: PlaneId },

    #[error("plane {plane} is not available in the current plan")]
    PlaneNotAvailable { plane: PlaneId },

    #[error("landmark {name} has a non-finite position")]
    NonFinitePosition { name: LandmarkName },

    #[error("rotation of {plane} by non-finite angle {angle_deg}")]
    NonFiniteAngle { plane: PlaneId, angle_deg: f64 },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
