//! UI module - notice label, power gauge, status line and debug overlay

mod debug_overlay;
mod hud;
mod notice;
mod power_gauge;

pub use debug_overlay::*;
pub use hud::*;
pub use notice::*;
pub use power_gauge::*;
