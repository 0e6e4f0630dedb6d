pub mod artifact;
pub mod landmark;
pub mod stage;

pub use artifact::*;
pub use landmark::*;
pub use stage::*;
