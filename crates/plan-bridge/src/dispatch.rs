use tracing::warn;

use crate::engine_state::{BridgeError, EngineState};
use crate::messages::{EngineToUi, UiToEngine};

/// Dispatch a UI message to the engine and return a response.
///
/// Errors never escape: they are turned into `EngineToUi::Error`.
pub fn dispatch(state: &mut EngineState, msg: UiToEngine) -> EngineToUi {
    match handle_message(state, msg) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "message failed");
            EngineToUi::Error {
                message: e.to_string(),
            }
        }
    }
}

/// Parse a JSON `UiToEngine`, dispatch it and serialize the response.
pub fn dispatch_json(state: &mut EngineState, json_input: &str) -> String {
    let response = match serde_json::from_str::<UiToEngine>(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => EngineToUi::Error {
            message: format!("Failed to parse message: {e}"),
        },
    };
    to_json(&response).unwrap_or_else(|e| {
        format!(r#"{{"type":"Error","message":{:?}}}"#, e.to_string())
    })
}

pub fn to_json(response: &EngineToUi) -> Result<String, BridgeError> {
    serde_json::to_string(response).map_err(|e| BridgeError::Serialization {
        reason: e.to_string(),
    })
}

fn handle_message(state: &mut EngineState, msg: UiToEngine) -> Result<EngineToUi, BridgeError> {
    match msg {
        UiToEngine::SelectLandmark { landmark } => {
            state.select_landmark(landmark)?;
            Ok(landmarks_changed(state))
        }

        UiToEngine::PlaceLandmark { landmark, position } => {
            state.place_landmark(landmark, position)?;
            Ok(landmarks_changed(state))
        }

        UiToEngine::RemoveLandmark { landmark } => {
            state.remove_landmark(landmark);
            Ok(landmarks_changed(state))
        }

        UiToEngine::UpdateLines => {
            let run = state.engine.run_planning_pipeline()?.clone();
            Ok(EngineToUi::PlanUpdated { run })
        }

        UiToEngine::RotatePlane { plane, direction } => {
            state.engine.rotate_plane_step(plane, direction)?;
            plane_rotated(state, plane)
        }

        UiToEngine::RotatePlaneBy { plane, degrees } => {
            state.engine.rotate_plane(plane, degrees)?;
            plane_rotated(state, plane)
        }

        UiToEngine::ToggleVisibility { plane } => {
            let visible = state.engine.toggle_visibility(plane)?;
            Ok(EngineToUi::VisibilityChanged { plane, visible })
        }

        UiToEngine::Measure { landmark, plane } => {
            let annotation = state.engine.measure(landmark, plane)?;
            Ok(EngineToUi::Measured { annotation })
        }

        UiToEngine::Configure { config } => {
            state.engine.set_config(config)?;
            Ok(EngineToUi::Configured {
                config: state.engine.config().clone(),
            })
        }

        UiToEngine::GetState => Ok(EngineToUi::State {
            landmarks: state.engine.landmarks().all().to_vec(),
            selected: state.selected,
            run: state.engine.current_run().cloned(),
            config: state.engine.config().clone(),
        }),
    }
}

fn landmarks_changed(state: &EngineState) -> EngineToUi {
    EngineToUi::LandmarksChanged {
        landmarks: state.engine.landmarks().all().to_vec(),
        selected: state.selected,
    }
}

fn plane_rotated(
    state: &EngineState,
    plane: plan_types::PlaneId,
) -> Result<EngineToUi, BridgeError> {
    Ok(EngineToUi::PlaneRotated {
        plane: state.engine.plane(plane)?.clone(),
    })
}
