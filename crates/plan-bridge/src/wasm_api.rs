//! WASM entry points for the web worker.
//!
//! This module is only compiled for the `wasm32` target. It provides the
//! `#[wasm_bindgen]` functions that JavaScript calls from the web worker.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::dispatch;
use crate::engine_state::EngineState;
use crate::messages::{EngineToUi, UiToEngine};

// Global engine state, single-threaded in the web worker.
thread_local! {
    static ENGINE_STATE: RefCell<Option<EngineState>> = const { RefCell::new(None) };
}

const NOT_INITIALIZED: &str = r#"{"type":"Error","message":"Engine not initialized. Call init() first."}"#;

/// Initialize the WASM engine. Must be called once before any other function.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();

    ENGINE_STATE.with(|cell| {
        *cell.borrow_mut() = Some(EngineState::new());
    });
}

/// Process a JSON-serialized `UiToEngine` message and return a
/// JSON-serialized `EngineToUi` response.
#[wasm_bindgen]
pub fn process_message(json_input: &str) -> String {
    ENGINE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => dispatch::dispatch_json(state, json_input),
        None => NOT_INITIALIZED.to_string(),
    })
}

/// Get the current session state as JSON.
#[wasm_bindgen]
pub fn get_state() -> String {
    ENGINE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(state) => {
            let response = dispatch::dispatch(state, UiToEngine::GetState);
            dispatch::to_json(&response).unwrap_or_else(|e| {
                let fallback = EngineToUi::Error {
                    message: e.to_string(),
                };
                dispatch::to_json(&fallback).unwrap_or_default()
            })
        }
        None => NOT_INITIALIZED.to_string(),
    })
}
