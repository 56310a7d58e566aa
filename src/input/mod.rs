//! Input module - GestureInput resource and capture_input system
//!
//! Mouse left button and touchscreen both feed one pointer. Each press becomes
//! a touch-down, each release a touch-up, and a short still press also yields
//! a tap, queued ahead of its touch-up.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::*;
use crate::platform::TapRecognizer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    TouchDown,
    /// Screen point in logical pixels
    Tap(Vec2),
    TouchUp,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    started_secs: f64,
    origin: Vec2,
    max_travel: f32,
}

/// Gestures buffered for the session, consumed once per frame
#[derive(Resource, Default)]
pub struct GestureInput {
    queue: Vec<Gesture>,
    press: Option<Press>,
}

impl GestureInput {
    pub fn press(&mut self, at: Vec2, now_secs: f64) {
        // A second pointer going down while one is held is ignored
        if self.press.is_some() {
            return;
        }
        self.press = Some(Press {
            started_secs: now_secs,
            origin: at,
            max_travel: 0.0,
        });
        self.queue.push(Gesture::TouchDown);
    }

    pub fn moved(&mut self, at: Vec2) {
        if let Some(press) = &mut self.press {
            press.max_travel = press.max_travel.max(press.origin.distance(at));
        }
    }

    /// End the press. Without a tap recognizer no taps are produced.
    pub fn release(&mut self, at: Vec2, now_secs: f64, recognizer: Option<&TapRecognizer>) {
        self.moved(at);
        let Some(press) = self.press.take() else {
            return;
        };

        let is_tap = now_secs - press.started_secs <= TAP_MAX_SECS
            && press.max_travel <= TAP_MAX_TRAVEL;

        match recognizer {
            Some(recognizer) if is_tap => {
                self.queue.push(Gesture::Tap(at));
                if !recognizer.cancels_touches {
                    self.queue.push(Gesture::TouchUp);
                }
            }
            _ => self.queue.push(Gesture::TouchUp),
        }
    }

    pub fn drain(&mut self) -> Vec<Gesture> {
        std::mem::take(&mut self.queue)
    }
}

/// Runs in Update to turn mouse and touch state into gestures
pub fn capture_input(
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    time: Res<Time>,
    recognizer: Option<Res<TapRecognizer>>,
    mut input: ResMut<GestureInput>,
) {
    let now = time.elapsed_secs_f64();
    let recognizer = recognizer.as_deref();

    // Touchscreen - first finger only
    if let Some(touch) = touches.iter_just_pressed().next() {
        input.press(touch.position(), now);
    }
    if let Some(touch) = touches.iter().next() {
        input.moved(touch.position());
    }
    if let Some(touch) = touches.iter_just_released().next() {
        input.release(touch.position(), now, recognizer);
    }

    // Mouse
    let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) else {
        // Cursor left the window mid-press: finish the gesture where it started
        if mouse.just_released(MouseButton::Left)
            && let Some(press) = input.press
        {
            input.release(press.origin, now, recognizer);
        }
        return;
    };

    if mouse.just_pressed(MouseButton::Left) {
        input.press(cursor, now);
    }
    if mouse.pressed(MouseButton::Left) {
        input.moved(cursor);
    }
    if mouse.just_released(MouseButton::Left) {
        input.release(cursor, now, recognizer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECOGNIZER: TapRecognizer = TapRecognizer {
        cancels_touches: false,
    };

    #[test]
    fn test_quick_press_is_tap_before_touch_up() {
        let mut input = GestureInput::default();
        input.press(Vec2::new(100.0, 100.0), 1.0);
        input.moved(Vec2::new(103.0, 101.0));
        input.release(Vec2::new(104.0, 101.0), 1.2, Some(&RECOGNIZER));

        assert_eq!(
            input.drain(),
            vec![
                Gesture::TouchDown,
                Gesture::Tap(Vec2::new(104.0, 101.0)),
                Gesture::TouchUp
            ]
        );
        assert!(input.drain().is_empty());
    }

    #[test]
    fn test_long_press_is_not_tap() {
        let mut input = GestureInput::default();
        input.press(Vec2::ZERO, 1.0);
        input.release(Vec2::ZERO, 1.5, Some(&RECOGNIZER));
        assert_eq!(input.drain(), vec![Gesture::TouchDown, Gesture::TouchUp]);
    }

    #[test]
    fn test_drag_is_not_tap() {
        let mut input = GestureInput::default();
        input.press(Vec2::ZERO, 1.0);
        input.moved(Vec2::new(40.0, 0.0));
        // Coming back to the start does not make it a tap again
        input.release(Vec2::ZERO, 1.1, Some(&RECOGNIZER));
        assert_eq!(input.drain(), vec![Gesture::TouchDown, Gesture::TouchUp]);
    }

    #[test]
    fn test_no_taps_without_recognizer() {
        let mut input = GestureInput::default();
        input.press(Vec2::ZERO, 1.0);
        input.release(Vec2::ZERO, 1.05, None);
        assert_eq!(input.drain(), vec![Gesture::TouchDown, Gesture::TouchUp]);
    }

    #[test]
    fn test_cancelling_recognizer_swallows_touch_up() {
        let mut input = GestureInput::default();
        input.press(Vec2::ZERO, 1.0);
        input.release(
            Vec2::ZERO,
            1.05,
            Some(&TapRecognizer {
                cancels_touches: true,
            }),
        );
        assert_eq!(input.drain(), vec![Gesture::TouchDown, Gesture::Tap(Vec2::ZERO)]);
    }

    #[test]
    fn test_second_pointer_and_stray_release_ignored() {
        let mut input = GestureInput::default();
        input.release(Vec2::ZERO, 0.5, Some(&RECOGNIZER));
        assert!(input.drain().is_empty());

        input.press(Vec2::ZERO, 1.0);
        input.press(Vec2::ONE, 1.01);
        assert_eq!(input.drain(), vec![Gesture::TouchDown]);
        // Still held from the first press
        input.release(Vec2::ZERO, 1.05, Some(&RECOGNIZER));
        assert_eq!(input.drain(), vec![Gesture::Tap(Vec2::ZERO), Gesture::TouchUp]);
    }
}
