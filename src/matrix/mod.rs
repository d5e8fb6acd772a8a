//! Matrix module.
//!
//! This module handles:
//! - The row-major integer matrix type
//! - Rectangularity validation
//! - Clockwise quarter-turn rotation
//!
//! Everything here is pure: no I/O, no logging, no shared state.

pub mod rotation;
pub mod types;

pub use rotation::{rotate_clockwise, validate_rectangular};
pub use types::{Dimensions, Matrix};
