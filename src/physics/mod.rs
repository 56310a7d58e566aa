//! Physics module - avian3d setup for the ball and the hoop
//!
//! Bodies are simulated by avian. This module turns body part lists into
//! avian colliders, feeds shot impulses in before each step and keeps the
//! configured gravity and kill plane applied.

mod shapes;
mod systems;

pub use shapes::*;
pub use systems::*;
