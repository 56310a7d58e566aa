//! Session module - the controller and the systems that drive it
//!
//! Per frame, chained: capture input, deliver new anchors, handle gestures,
//! advance the session clock, publish events.

mod controller;
mod state;

pub use controller::*;
pub use state::*;

use bevy::prelude::*;

use crate::events::EventBus;
use crate::input::{Gesture, GestureInput};
use crate::scene::SceneBodies;
use crate::tracking::{SimulatedTracking, TrackingHost};
use crate::ui::NoticeHost;

/// Start tracking and register the tap recognizer
pub fn start_session(
    mut commands: Commands,
    mut controller: ResMut<SessionController>,
    mut tracking: TrackingHost,
) {
    let recognizer = controller.initialize(&mut tracking);
    commands.insert_resource(recognizer);
}

/// Hand anchors found since last frame to the controller
pub fn deliver_anchors(
    mut controller: ResMut<SessionController>,
    mut tracking: ResMut<SimulatedTracking>,
    mut notice: NoticeHost,
) {
    for anchor in tracking.take_new_anchors() {
        controller.on_anchor_added(&anchor, &mut notice);
    }
}

pub fn handle_gestures(
    mut input: ResMut<GestureInput>,
    mut controller: ResMut<SessionController>,
    tracking: TrackingHost,
    mut scene: SceneBodies,
) {
    for gesture in input.drain() {
        match gesture {
            Gesture::TouchDown => controller.on_touch_down(),
            Gesture::Tap(point) => {
                controller.on_tap(point, &tracking, &mut scene);
            }
            Gesture::TouchUp => {
                controller.on_touch_up(&tracking, &mut scene);
            }
        }
    }
}

/// Run charge ticks and delayed work that came due this frame
pub fn advance_session(
    time: Res<Time>,
    mut controller: ResMut<SessionController>,
    mut notice: NoticeHost,
) {
    controller.advance(time.delta(), &mut notice);
}

pub fn publish_session_events(mut controller: ResMut<SessionController>, mut bus: ResMut<EventBus>) {
    bus.emit_all(controller.drain_events());
}
