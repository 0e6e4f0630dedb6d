use plan_kernel::Point3d;
use plan_types::LandmarkName;
use planning_engine::{Engine, PlanningConfig, Upsert};

/// The engine state wrapper for the WASM bridge.
///
/// Holds the planning engine and the landmark the user is currently placing.
#[derive(Default)]
pub struct EngineState {
    pub engine: Engine,
    /// Landmark chosen in the UI, placed by the next click on the model.
    pub selected: Option<LandmarkName>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlanningConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            engine: Engine::new(config)?,
            selected: None,
        })
    }

    /// Select a landmark for placement. If it is already placed it becomes
    /// the only draggable one.
    pub fn select_landmark(&mut self, name: LandmarkName) -> Result<(), BridgeError> {
        self.selected = Some(name);
        if self.engine.landmarks().contains(name) {
            self.engine.select_landmark(name)?;
        }
        Ok(())
    }

    /// Place `name`, or the selected landmark when `name` is `None`.
    pub fn place_landmark(
        &mut self,
        name: Option<LandmarkName>,
        position: Point3d,
    ) -> Result<Upsert, BridgeError> {
        let name = name.or(self.selected).ok_or(BridgeError::NoLandmarkSelected)?;
        let outcome = self.engine.place_or_update_landmark(name, position)?;
        if self.selected == Some(name) {
            self.engine.select_landmark(name)?;
        }
        Ok(outcome)
    }

    pub fn remove_landmark(&mut self, name: LandmarkName) {
        self.engine.remove_landmark(name);
        if self.selected == Some(name) {
            self.selected = None;
        }
    }
}

/// Errors that can occur in the bridge layer.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("no landmark selected")]
    NoLandmarkSelected,

    #[error("engine error: {0}")]
    Engine(#[from] planning_engine::EngineError),

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_without_selection_fails() {
        let mut state = EngineState::new();
        let err = state.place_landmark(None, Point3d::ORIGIN).unwrap_err();
        assert!(matches!(err, BridgeError::NoLandmarkSelected));
    }

    #[test]
    fn test_place_uses_selection_and_makes_it_movable() {
        let mut state = EngineState::new();
        state.select_landmark(LandmarkName::HipCenter).unwrap();
        state.place_landmark(None, Point3d::new(0.0, 100.0, 0.0)).unwrap();
        let hip = state.engine.landmarks().find(LandmarkName::HipCenter).unwrap();
        assert!(hip.movable);
    }

    #[test]
    fn test_removing_selected_clears_selection() {
        let mut state = EngineState::new();
        state.select_landmark(LandmarkName::FemurCenter).unwrap();
        state.place_landmark(None, Point3d::ORIGIN).unwrap();
        state.remove_landmark(LandmarkName::FemurCenter);
        assert!(state.selected.is_none());
        assert!(state.engine.landmarks().is_empty());
    }
}
