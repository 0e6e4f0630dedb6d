use serde::{Deserialize, Serialize};

use plan_kernel::Point3d;
use plan_types::{LandmarkName, PlaneId};
use planning_engine::{
    DerivedPlane, DistanceAnnotation, Landmark, PlanningConfig, PlanningRun, RotationDirection,
};

/// Messages from the UI (JavaScript main thread) to the engine (WASM Worker).
/// Serialized as JSON for postMessage transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UiToEngine {
    // -- Landmarks --
    /// Make a landmark the target of the next placement.
    SelectLandmark { landmark: LandmarkName },
    /// Place or move a landmark. Without a name, the selected landmark is used.
    PlaceLandmark {
        #[serde(default)]
        landmark: Option<LandmarkName>,
        position: Point3d,
    },
    RemoveLandmark { landmark: LandmarkName },

    // -- Planning --
    /// Rebuild every axis and plane from the placed landmarks.
    UpdateLines,
    /// Rotate a plane by one configured step.
    RotatePlane {
        plane: PlaneId,
        direction: RotationDirection,
    },
    /// Rotate a plane by an explicit angle in degrees.
    RotatePlaneBy { plane: PlaneId, degrees: f64 },
    ToggleVisibility { plane: PlaneId },
    Measure {
        landmark: LandmarkName,
        plane: PlaneId,
    },

    // -- Session --
    Configure { config: PlanningConfig },
    GetState,
}

/// Messages from the engine back to the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineToUi {
    /// The landmark set or the selection changed.
    LandmarksChanged {
        landmarks: Vec<Landmark>,
        selected: Option<LandmarkName>,
    },

    /// A planning run finished. Artifacts of `run.retires` should be removed.
    PlanUpdated { run: PlanningRun },

    PlaneRotated { plane: DerivedPlane },

    VisibilityChanged { plane: PlaneId, visible: bool },

    Measured { annotation: DistanceAnnotation },

    Configured { config: PlanningConfig },

    /// Full session snapshot.
    State {
        landmarks: Vec<Landmark>,
        selected: Option<LandmarkName>,
        run: Option<PlanningRun>,
        config: PlanningConfig,
    },

    /// An error occurred in the engine.
    Error { message: String },
}
