//! Message bridge between the planning UI and the planning engine.

pub mod dispatch;
pub mod engine_state;
pub mod messages;

#[cfg(target_arch = "wasm32")]
pub mod wasm_api;

pub use dispatch::{dispatch, dispatch_json};
pub use engine_state::{BridgeError, EngineState};
