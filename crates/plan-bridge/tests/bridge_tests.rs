use plan_bridge::messages::*;
use plan_bridge::*;
use plan_kernel::Point3d;
use plan_types::{LandmarkName, PlaneId, StageKind};
use planning_engine::{PlanningConfig, RotationDirection};

// ── Helper functions ─────────────────────────────────────────────────────

fn place(state: &mut EngineState, landmark: LandmarkName, x: f64, y: f64, z: f64) -> EngineToUi {
    dispatch(
        state,
        UiToEngine::PlaceLandmark {
            landmark: Some(landmark),
            position: Point3d::new(x, y, z),
        },
    )
}

fn planned_state() -> EngineState {
    let mut state = EngineState::new();
    place(&mut state, LandmarkName::FemurCenter, 0.0, 0.0, 0.0);
    place(&mut state, LandmarkName::HipCenter, 0.0, 100.0, 0.0);
    place(&mut state, LandmarkName::MedialEpicondyle, -40.0, -5.0, 3.0);
    place(&mut state, LandmarkName::LateralEpicondyle, 40.0, -3.0, -2.0);
    place(&mut state, LandmarkName::DistalMedialPt, -22.0, -30.0, 4.0);
    match dispatch(&mut state, UiToEngine::UpdateLines) {
        EngineToUi::PlanUpdated { .. } => {}
        other => panic!("expected PlanUpdated, got {other:?}"),
    }
    state
}

// ── Landmark messages ────────────────────────────────────────────────────

#[test]
fn test_select_then_place_uses_selection() {
    let mut state = EngineState::new();
    dispatch(
        &mut state,
        UiToEngine::SelectLandmark {
            landmark: LandmarkName::DistalMedialPt,
        },
    );
    let response = dispatch(
        &mut state,
        UiToEngine::PlaceLandmark {
            landmark: None,
            position: Point3d::new(1.0, 2.0, 3.0),
        },
    );
    match response {
        EngineToUi::LandmarksChanged { landmarks, selected } => {
            assert_eq!(selected, Some(LandmarkName::DistalMedialPt));
            assert_eq!(landmarks.len(), 1);
            assert_eq!(landmarks[0].position, Point3d::new(1.0, 2.0, 3.0));
            assert!(landmarks[0].movable);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_place_without_selection_is_error() {
    let mut state = EngineState::new();
    let response = dispatch(
        &mut state,
        UiToEngine::PlaceLandmark {
            landmark: None,
            position: Point3d::ORIGIN,
        },
    );
    match response {
        EngineToUi::Error { message } => assert!(message.contains("no landmark selected")),
        other => panic!("expected error, got {other:?}"),
    }
}

// ── Planning messages ────────────────────────────────────────────────────

#[test]
fn test_update_lines_reports_stages() {
    let mut state = EngineState::new();
    place(&mut state, LandmarkName::FemurCenter, 0.0, 0.0, 0.0);
    place(&mut state, LandmarkName::HipCenter, 0.0, 100.0, 0.0);
    match dispatch(&mut state, UiToEngine::UpdateLines) {
        EngineToUi::PlanUpdated { run } => {
            assert!(run.is_available(StageKind::MechanicalAxis));
            assert!(!run.is_available(StageKind::CoronalPlane));
            assert!(run.retires.is_none());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_rotate_plane_steps_by_config() {
    let mut state = planned_state();
    let response = dispatch(
        &mut state,
        UiToEngine::RotatePlane {
            plane: PlaneId::VarusValgus,
            direction: RotationDirection::Negative,
        },
    );
    match response {
        EngineToUi::PlaneRotated { plane } => {
            assert_eq!(plane.id, PlaneId::VarusValgus);
            assert!((plane.cumulative_angle_deg - -7.0).abs() < 1e-9);
        }
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_rotate_plane_without_axis_is_error() {
    let mut state = planned_state();
    let response = dispatch(
        &mut state,
        UiToEngine::RotatePlaneBy {
            plane: PlaneId::DistalMedial,
            degrees: 5.0,
        },
    );
    assert!(matches!(response, EngineToUi::Error { .. }));
}

#[test]
fn test_toggle_visibility_and_measure() {
    let mut state = planned_state();
    match dispatch(&mut state, UiToEngine::ToggleVisibility { plane: PlaneId::Coronal }) {
        EngineToUi::VisibilityChanged { plane, visible } => {
            assert_eq!(plane, PlaneId::Coronal);
            assert!(!visible);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    match dispatch(
        &mut state,
        UiToEngine::Measure {
            landmark: LandmarkName::DistalMedialPt,
            plane: PlaneId::DistalResection,
        },
    ) {
        EngineToUi::Measured { annotation } => assert_eq!(annotation.label.text, "10.00 mm"),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[test]
fn test_configure_rejects_invalid_config() {
    let mut state = EngineState::new();
    let config = PlanningConfig {
        distal_resection_offset: f64::INFINITY,
        ..PlanningConfig::default()
    };
    assert!(matches!(
        dispatch(&mut state, UiToEngine::Configure { config }),
        EngineToUi::Error { .. }
    ));
    assert!(matches!(
        dispatch(&mut state, UiToEngine::Configure { config: PlanningConfig::fine() }),
        EngineToUi::Configured { .. }
    ));
}

// ── JSON contract ────────────────────────────────────────────────────────

#[test]
fn test_json_round_trip_through_dispatch() {
    let mut state = EngineState::new();
    let response = dispatch_json(
        &mut state,
        r#"{"type":"PlaceLandmark","landmark":"hipCenter","position":{"x":0.0,"y":100.0,"z":0.0}}"#,
    );
    let value: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["type"], "LandmarksChanged");
    assert_eq!(value["landmarks"][0]["name"], "hipCenter");
}

#[test]
fn test_malformed_json_is_error_response() {
    let mut state = EngineState::new();
    let response = dispatch_json(&mut state, r#"{"type":"Nope"}"#);
    let value: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(value["type"], "Error");
}

#[test]
fn test_get_state_includes_run() {
    let mut state = planned_state();
    match dispatch(&mut state, UiToEngine::GetState) {
        EngineToUi::State {
            landmarks, run, config, ..
        } => {
            assert_eq!(landmarks.len(), 5);
            assert!(run.is_some());
            assert_eq!(config, PlanningConfig::default());
        }
        other => panic!("unexpected response: {other:?}"),
    }
}
