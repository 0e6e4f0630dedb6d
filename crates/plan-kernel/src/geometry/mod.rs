pub mod line;
pub mod orientation;
pub mod plane;
pub mod point;
pub mod vector;
