//! Session controller - turns tracking callbacks and touches into hoop
//! placement and shots
//!
//! All host access goes through the capability traits in `platform`, so every
//! handler can be driven from tests with fakes. Timed work (charge ticks, the
//! hoop settle delay, notice hiding) runs on the controller's own scheduler,
//! advanced by the host each frame.

use bevy::prelude::*;
use std::time::Duration;
use uuid::Uuid;

use super::state::{ChargePhase, HoopPhase, SessionState};
use crate::constants::{BALL_COLOR, BALL_NAME, HOOP_NAME, STATIC_RESTITUTION};
use crate::events::{SessionEvent, SkipReason, TapMiss};
use crate::platform::{
    Anchor, BodyDesc, BodyKind, HitTestFilter, NoticeLabel, PhysicsScene, Shape, ShapePart,
    TapRecognizer, Tracking, TrackingConfig,
};
use crate::scheduler::{FiredTask, Scheduler, SessionTask};
use crate::tuning::{NoticePolicy, SessionTuning};

fn triple(v: Vec3) -> (f32, f32, f32) {
    (v.x, v.y, v.z)
}

#[derive(Resource)]
pub struct SessionController {
    state: SessionState,
    tuning: SessionTuning,
    scheduler: Scheduler,
    session_id: String,
    outbox: Vec<SessionEvent>,
}

impl SessionController {
    pub fn new(tuning: SessionTuning) -> Self {
        Self {
            state: SessionState::new(tuning.power_base, TrackingConfig::horizontal()),
            tuning,
            scheduler: Scheduler::new(),
            session_id: String::new(),
            outbox: Vec::new(),
        }
    }

    /// Start horizontal plane tracking and hand back the tap registration.
    pub fn initialize(&mut self, tracking: &mut impl Tracking) -> TapRecognizer {
        tracking.start(&self.state.tracking_config);

        self.session_id = Uuid::new_v4().to_string();
        let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        info!(
            "Session {} started ({:?} plane detection)",
            &self.session_id[..8],
            self.state.tracking_config.plane_detection
        );
        self.outbox.push(SessionEvent::SessionStart {
            session_id: self.session_id.clone(),
            timestamp,
        });

        TapRecognizer {
            cancels_touches: false,
        }
    }

    // =========================================================================
    // TRACKING CALLBACK
    // =========================================================================

    /// Called once per newly recognized anchor
    pub fn on_anchor_added(&mut self, anchor: &Anchor, notice: &mut impl NoticeLabel) {
        let Anchor::Plane(plane) = anchor else {
            return;
        };

        info!("Plane {} detected at {:?}", plane.id, plane.center);
        self.outbox.push(SessionEvent::PlaneDetected {
            anchor_id: plane.id,
            center: triple(plane.center),
        });

        if self.tuning.notice_policy == NoticePolicy::Restart {
            for task in self.state.notice.pending_hides.drain(..) {
                self.scheduler.cancel(task);
            }
        }

        notice.set_visible(true);
        if !self.state.notice.visible {
            self.outbox.push(SessionEvent::NoticeShown);
        }
        self.state.notice.visible = true;

        let hide = self.scheduler.schedule_once(
            self.tuning.notice_duration(),
            self.state.generation,
            SessionTask::HideNotice,
        );
        self.state.notice.pending_hides.push(hide);
    }

    // =========================================================================
    // INPUT
    // =========================================================================

    /// Place the hoop where the tap hits a detected plane, once per session
    pub fn on_tap<S: PhysicsScene>(
        &mut self,
        point: Vec2,
        tracking: &impl Tracking,
        scene: &mut S,
    ) -> Option<S::Body> {
        let hits = tracking.hit_test(point, HitTestFilter::ExistingPlaneUsingExtent);
        let Some(&position) = hits.first() else {
            debug!("Tap at {:?} hit no plane", point);
            self.outbox.push(SessionEvent::TapMissed {
                reason: TapMiss::NoHit,
            });
            return None;
        };

        if self.state.hoop.is_placed() {
            return None;
        }

        let Some(template) = scene.load_node(&self.tuning.hoop_asset, &self.tuning.hoop_node)
        else {
            debug!(
                "Hoop node {} not found in asset {}",
                self.tuning.hoop_node, self.tuning.hoop_asset
            );
            self.outbox.push(SessionEvent::TapMissed {
                reason: TapMiss::AssetMissing,
            });
            return None;
        };

        let body = scene.add_body(BodyDesc {
            tag: HOOP_NAME.to_string(),
            kind: BodyKind::Static,
            parts: template.parts,
            position,
            restitution: STATIC_RESTITUTION,
            angular_velocity: Vec3::ZERO,
        });

        let ready_task = self.scheduler.schedule_once(
            self.tuning.hoop_settle(),
            self.state.generation,
            SessionTask::HoopReady,
        );
        self.state.hoop = HoopPhase::Placing {
            position,
            ready_task,
        };

        info!("Hoop placed at {:?}", position);
        self.outbox.push(SessionEvent::HoopPlaced {
            pos: triple(position),
        });
        Some(body)
    }

    /// Begin charging power, if the hoop is ready
    pub fn on_touch_down(&mut self) {
        if !self.state.hoop.is_ready() {
            return;
        }

        if self.state.is_charging() && self.tuning.guard_reentrant_charge {
            debug!("Touch-down while already charging, ignored");
            return;
        }

        let tick = self.scheduler.schedule_repeating(
            self.tuning.charge_interval(),
            self.state.generation,
            SessionTask::ChargeTick,
        );
        match &mut self.state.charge {
            ChargePhase::Charging { ticks } => ticks.push(tick),
            ChargePhase::Idle => {
                self.state.charge = ChargePhase::Charging { ticks: vec![tick] };
                self.outbox.push(SessionEvent::ChargeStarted);
            }
        }
    }

    /// Release: stop charging, shoot if the hoop is ready, always reset power
    pub fn on_touch_up<S: PhysicsScene>(
        &mut self,
        tracking: &impl Tracking,
        scene: &mut S,
    ) -> Option<S::Body> {
        let body = if self.state.hoop.is_ready() {
            self.stop_charging();
            self.shoot(tracking, scene)
        } else {
            None
        };

        self.state.power = self.tuning.power_base;
        body
    }

    /// Sweep old balls and launch a new one from the camera with the current power
    pub fn shoot<S: PhysicsScene>(
        &mut self,
        tracking: &impl Tracking,
        scene: &mut S,
    ) -> Option<S::Body> {
        let power = self.state.power;
        let Some(pose) = tracking.current_camera_pose() else {
            debug!("No camera pose, shot skipped");
            self.outbox.push(SessionEvent::ShotSkipped {
                power,
                reason: SkipReason::NoCameraPose,
            });
            return None;
        };

        let removed = scene.remove_nodes(BALL_NAME);

        let forward = pose.forward.normalize_or_zero();
        let position = pose.position + forward * self.tuning.spawn_distance;
        let body = scene.add_body(BodyDesc {
            tag: BALL_NAME.to_string(),
            kind: BodyKind::Dynamic,
            parts: vec![ShapePart {
                offset: Vec3::ZERO,
                shape: Shape::Sphere {
                    radius: self.tuning.ball_radius,
                },
                color: BALL_COLOR,
            }],
            position,
            restitution: self.tuning.ball_restitution,
            angular_velocity: self.tuning.ball_spin,
        });

        let impulse = forward * power * self.tuning.impulse_scale;
        scene.apply_impulse(body, impulse);

        info!("Shot fired with power {:.1}", power);
        self.outbox.push(SessionEvent::ShotFired {
            power,
            pos: triple(position),
            impulse: triple(impulse),
            removed: removed as u32,
        });
        Some(body)
    }

    fn stop_charging(&mut self) {
        if let ChargePhase::Charging { ticks } = std::mem::take(&mut self.state.charge) {
            for tick in ticks {
                self.scheduler.cancel(tick);
            }
        }
    }

    // =========================================================================
    // CLOCK
    // =========================================================================

    /// Move the session clock forward, running every task that comes due
    pub fn advance(&mut self, delta: Duration, notice: &mut impl NoticeLabel) {
        let deadline = self.scheduler.now() + delta;
        while let Some(fired) = self.scheduler.pop_due(deadline) {
            self.run_task(fired, notice);
        }
        self.scheduler.set_now(deadline);
    }

    fn run_task(&mut self, fired: FiredTask, notice: &mut impl NoticeLabel) {
        if fired.generation != self.state.generation {
            return;
        }

        match fired.task {
            SessionTask::ChargeTick => {
                if self.state.is_charging() {
                    self.state.power += self.tuning.power_step;
                }
            }
            SessionTask::HoopReady => {
                if let HoopPhase::Placing { position, .. } = self.state.hoop {
                    self.state.hoop = HoopPhase::Ready { position };
                    info!("Hoop ready, shots enabled");
                    self.outbox.push(SessionEvent::HoopReady);
                }
            }
            SessionTask::HideNotice => {
                self.state.notice.pending_hides.retain(|t| *t != fired.id);
                notice.set_visible(false);
                if self.state.notice.visible {
                    self.outbox.push(SessionEvent::NoticeHidden);
                }
                self.state.notice.visible = false;
            }
        }
    }

    /// Stop the charge tick and drop all pending work of this session
    pub fn teardown(&mut self) {
        self.stop_charging();
        let cancelled = self.scheduler.cancel_generation(self.state.generation);
        self.state.notice.pending_hides.clear();
        self.state.generation += 1;
        if cancelled > 0 {
            debug!("Teardown cancelled {} pending tasks", cancelled);
        }
        self.outbox.push(SessionEvent::Teardown {
            cancelled: cancelled as u32,
        });
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    pub fn power(&self) -> f32 {
        self.state.power
    }

    pub fn hoop_ready(&self) -> bool {
        self.state.hoop.is_ready()
    }

    pub fn is_charging(&self) -> bool {
        self.state.is_charging()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Session clock time
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.outbox)
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionTuning::default())
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::PlaneAnchor;
    use crate::platform::fake::{FakeNotice, FakeScene, FakeTracking};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Controller plus fakes, with a camera at the origin looking down -Z
    struct Rig {
        ctl: SessionController,
        tracking: FakeTracking,
        scene: FakeScene,
        notice: FakeNotice,
    }

    impl Rig {
        fn new() -> Self {
            Self::with_tuning(SessionTuning::default())
        }

        fn with_tuning(tuning: SessionTuning) -> Self {
            let mut rig = Self {
                ctl: SessionController::new(tuning),
                tracking: FakeTracking::with_pose(Vec3::ZERO, Vec3::NEG_Z),
                scene: FakeScene::default(),
                notice: FakeNotice::default(),
            };
            rig.ctl.initialize(&mut rig.tracking);
            rig
        }

        fn advance(&mut self, millis: u64) {
            self.ctl.advance(ms(millis), &mut self.notice);
        }

        fn tap(&mut self) -> Option<usize> {
            self.ctl
                .on_tap(Vec2::new(400.0, 300.0), &self.tracking, &mut self.scene)
        }

        fn touch_down(&mut self) {
            self.ctl.on_touch_down();
        }

        fn touch_up(&mut self) -> Option<usize> {
            self.ctl.on_touch_up(&self.tracking, &mut self.scene)
        }

        fn plane(&mut self, id: u32) {
            let anchor = Anchor::Plane(PlaneAnchor {
                id,
                center: Vec3::ZERO,
                half_extents: Vec2::splat(2.0),
            });
            self.ctl.on_anchor_added(&anchor, &mut self.notice);
        }

        /// Plane under the tap and a placed, settled hoop
        fn ready(&mut self) {
            self.tracking.hits = vec![Vec3::new(0.0, 0.0, -3.0)];
            self.tap();
            self.advance(2000);
            assert!(self.ctl.hoop_ready());
        }
    }

    #[test]
    fn test_initialize_starts_horizontal_tracking() {
        let mut tracking = FakeTracking::default();
        let mut ctl = SessionController::default();
        let recognizer = ctl.initialize(&mut tracking);

        assert_eq!(tracking.started_with, Some(TrackingConfig::horizontal()));
        assert!(!recognizer.cancels_touches);
        assert_eq!(ctl.session_id().len(), 36);
        assert!(matches!(
            ctl.drain_events().as_slice(),
            [SessionEvent::SessionStart { .. }]
        ));
    }

    #[test]
    fn test_touches_without_hoop_never_spawn() {
        let mut rig = Rig::new();
        for _ in 0..5 {
            rig.touch_down();
            rig.advance(500);
            assert!(rig.touch_up().is_none());
        }
        assert_eq!(rig.scene.count_tagged(BALL_NAME), 0);
        assert_eq!(rig.ctl.power(), 1.0);
        // No tick was ever started
        assert_eq!(rig.ctl.pending_tasks(), 0);
    }

    #[test]
    fn test_touches_with_no_plane_ever_detected() {
        let mut rig = Rig::new();
        rig.touch_down();
        rig.advance(300);
        rig.touch_up();
        rig.tap();

        assert_eq!(rig.scene.live().count(), 0);
        assert_eq!(rig.ctl.power(), 1.0);
        assert!(!rig.ctl.state().hoop.is_placed());
        let events = rig.ctl.drain_events();
        assert!(events.contains(&SessionEvent::TapMissed {
            reason: TapMiss::NoHit
        }));
    }

    #[test]
    fn test_hoop_ready_exactly_two_seconds_after_tap() {
        let mut rig = Rig::new();
        rig.tracking.hits = vec![Vec3::new(0.5, 0.0, -2.0), Vec3::new(0.5, 0.0, -6.0)];
        assert!(rig.tap().is_some());

        let hoop = rig.scene.last_tagged(HOOP_NAME).unwrap();
        assert_eq!(hoop.desc.kind, BodyKind::Static);
        assert_eq!(hoop.desc.position, Vec3::new(0.5, 0.0, -2.0));

        rig.advance(1999);
        assert!(!rig.ctl.hoop_ready());
        // Shots are still gated while the hoop settles
        rig.touch_down();
        assert!(!rig.ctl.is_charging());

        rig.advance(1);
        assert!(rig.ctl.hoop_ready());
    }

    #[test]
    fn test_only_one_hoop_per_session() {
        let mut rig = Rig::new();
        rig.tracking.hits = vec![Vec3::ZERO];
        assert!(rig.tap().is_some());
        // A second tap while settling must not add another hoop
        assert!(rig.tap().is_none());
        rig.advance(2500);
        assert!(rig.tap().is_none());

        assert_eq!(rig.scene.count_tagged(HOOP_NAME), 1);
        assert_eq!(rig.scene.loads.len(), 1);
    }

    #[test]
    fn test_missing_hoop_asset_places_nothing() {
        let mut rig = Rig::new();
        rig.tracking.hits = vec![Vec3::ZERO];
        rig.scene.missing_assets = true;

        assert!(rig.tap().is_none());
        rig.advance(3000);
        assert!(!rig.ctl.state().hoop.is_placed());
        assert!(rig.ctl.drain_events().contains(&SessionEvent::TapMissed {
            reason: TapMiss::AssetMissing
        }));

        // The asset showing up later still allows placement
        rig.scene.missing_assets = false;
        assert!(rig.tap().is_some());
    }

    #[test]
    fn test_power_accumulates_one_per_tick() {
        let mut rig = Rig::new();
        rig.ready();

        for n in [0u64, 1, 7, 30] {
            rig.touch_down();
            rig.advance(50 * n);
            assert_eq!(rig.ctl.power(), 1.0 + n as f32);
            rig.touch_up();
            assert_eq!(rig.ctl.power(), 1.0);
        }
    }

    #[test]
    fn test_full_scenario_from_tap_to_shot() {
        let mut rig = Rig::new();
        rig.tracking.hits = vec![Vec3::new(0.0, 0.0, -3.0)];

        // t = 0: tap on plane
        rig.tap();
        // t = 2.0: hoop ready
        rig.advance(2000);
        assert!(rig.ctl.hoop_ready());
        // t = 2.1: touch-down
        rig.advance(100);
        rig.touch_down();
        // held 0.5s = 10 ticks
        rig.advance(500);
        assert_eq!(rig.ctl.power(), 11.0);
        // t = 2.6: touch-up
        assert!(rig.touch_up().is_some());
        assert_eq!(rig.ctl.now(), ms(2600));

        let ball = rig.scene.last_tagged(BALL_NAME).unwrap();
        assert_eq!(ball.desc.kind, BodyKind::Dynamic);
        assert_eq!(ball.desc.restitution, 0.2);
        assert_eq!(ball.desc.position, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(ball.desc.angular_velocity, Vec3::new(3.0 * std::f32::consts::PI, 0.0, 0.0));
        assert_eq!(
            ball.desc.parts[0].shape,
            Shape::Sphere { radius: 0.25 }
        );
        // forward (0,0,-1) * 11 scaled by (1, 2, 0.5)
        assert_eq!(ball.impulses, vec![Vec3::new(0.0, 0.0, -5.5)]);
        assert_eq!(rig.ctl.power(), 1.0);

        // Ticks stop with the release
        rig.advance(1000);
        assert_eq!(rig.ctl.power(), 1.0);
    }

    #[test]
    fn test_impulse_scaling_per_axis() {
        let mut rig = Rig::new();
        rig.ready();
        let forward = Vec3::new(1.0, 2.0, -2.0).normalize();
        rig.tracking.pose = Some(crate::platform::CameraPose {
            position: Vec3::new(1.0, 1.5, 0.0),
            forward,
        });

        rig.touch_down();
        rig.advance(150); // power 4
        rig.touch_up();

        let ball = rig.scene.last_tagged(BALL_NAME).unwrap();
        let expected = Vec3::new(forward.x * 4.0, forward.y * 8.0, forward.z * 2.0);
        assert!(ball.impulses[0].abs_diff_eq(expected, 1e-5));
        assert!(ball.desc.position.abs_diff_eq(Vec3::new(1.0, 1.5, 0.0) + forward, 1e-5));
    }

    #[test]
    fn test_at_most_one_ball_in_scene() {
        let mut rig = Rig::new();
        rig.ready();

        for _ in 0..4 {
            rig.touch_down();
            rig.advance(100);
            rig.touch_up();
            assert_eq!(rig.scene.count_tagged(BALL_NAME), 1);
        }
        // The hoop is never swept with the balls
        assert_eq!(rig.scene.count_tagged(HOOP_NAME), 1);
    }

    #[test]
    fn test_release_without_press_still_shoots_once_ready() {
        let mut rig = Rig::new();
        rig.ready();
        assert!(rig.touch_up().is_some());
        let ball = rig.scene.last_tagged(BALL_NAME).unwrap();
        assert_eq!(ball.impulses[0], Vec3::new(0.0, 0.0, -0.5));
    }

    #[test]
    fn test_no_camera_pose_skips_shot_but_resets_power() {
        let mut rig = Rig::new();
        rig.ready();
        rig.tracking.pose = None;

        rig.touch_down();
        rig.advance(250);
        assert_eq!(rig.ctl.power(), 6.0);
        assert!(rig.touch_up().is_none());

        assert_eq!(rig.scene.count_tagged(BALL_NAME), 0);
        assert_eq!(rig.ctl.power(), 1.0);
        assert!(!rig.ctl.is_charging());
        assert!(rig.ctl.drain_events().contains(&SessionEvent::ShotSkipped {
            power: 6.0,
            reason: SkipReason::NoCameraPose
        }));
    }

    #[test]
    fn test_reentrant_touch_down_is_guarded() {
        let mut rig = Rig::new();
        rig.ready();

        rig.touch_down();
        rig.touch_down();
        rig.advance(500);
        assert_eq!(rig.ctl.power(), 11.0);
    }

    #[test]
    fn test_reentrant_touch_down_unguarded_doubles_rate() {
        let tuning = SessionTuning {
            guard_reentrant_charge: false,
            ..default()
        };
        let mut rig = Rig::with_tuning(tuning);
        rig.ready();

        rig.touch_down();
        rig.touch_down();
        rig.advance(500);
        assert_eq!(rig.ctl.power(), 21.0);

        // One release stops both ticks
        rig.touch_up();
        rig.advance(500);
        assert_eq!(rig.ctl.power(), 1.0);
        assert_eq!(rig.ctl.pending_tasks(), 0);
    }

    #[test]
    fn test_plane_notice_hides_after_three_seconds() {
        let mut rig = Rig::new();
        rig.plane(1);
        assert!(rig.notice.visible);

        rig.advance(2999);
        assert!(rig.notice.visible);
        rig.advance(1);
        assert!(!rig.notice.visible);
        assert_eq!(rig.notice.history, vec![true, false]);
    }

    #[test]
    fn test_point_anchors_do_not_show_notice() {
        let mut rig = Rig::new();
        let anchor = Anchor::Point {
            id: 9,
            position: Vec3::ONE,
        };
        rig.ctl.on_anchor_added(&anchor, &mut rig.notice);
        assert!(rig.notice.history.is_empty());
        assert_eq!(rig.ctl.pending_tasks(), 0);
    }

    #[test]
    fn test_two_planes_independent_hides_race() {
        let tuning = SessionTuning {
            notice_policy: NoticePolicy::Independent,
            ..default()
        };
        let mut rig = Rig::with_tuning(tuning);

        rig.plane(1); // t = 0
        rig.advance(1000);
        rig.plane(2); // t = 1.0

        // First hide fires at t = 3.0 even though plane 2 was found at t = 1.0
        rig.advance(2000);
        assert!(!rig.notice.visible);
        // Second hide at t = 4.0 leaves the label hidden
        rig.advance(1000);
        assert!(!rig.notice.visible);
        assert_eq!(rig.notice.history, vec![true, true, false, false]);
    }

    #[test]
    fn test_two_planes_restart_policy_keeps_notice_up() {
        let mut rig = Rig::new();

        rig.plane(1);
        rig.advance(1000);
        rig.plane(2);

        rig.advance(2000); // t = 3.0
        assert!(rig.notice.visible);
        rig.advance(1000); // t = 4.0
        assert!(!rig.notice.visible);
        assert_eq!(rig.notice.history, vec![true, true, false]);
    }

    #[test]
    fn test_teardown_stops_tick_and_cancels_delays() {
        let mut rig = Rig::new();
        rig.tracking.hits = vec![Vec3::ZERO];
        rig.plane(1);
        rig.tap();

        rig.ctl.teardown();
        assert_eq!(rig.ctl.pending_tasks(), 0);
        rig.advance(5000);
        // Neither the hoop-ready nor the notice hide ran
        assert!(!rig.ctl.hoop_ready());
        assert!(rig.notice.visible);
        assert!(rig.ctl.drain_events().contains(&SessionEvent::Teardown { cancelled: 2 }));
    }

    #[test]
    fn test_teardown_while_charging() {
        let mut rig = Rig::new();
        rig.ready();
        rig.touch_down();
        rig.advance(100);

        rig.ctl.teardown();
        assert!(!rig.ctl.is_charging());
        let power = rig.ctl.power();
        rig.advance(1000);
        assert_eq!(rig.ctl.power(), power);

        // Teardown twice is harmless
        rig.ctl.teardown();
        assert_eq!(rig.ctl.pending_tasks(), 0);
    }

    #[test]
    fn test_event_sequence_for_a_shot() {
        let mut rig = Rig::new();
        rig.ctl.drain_events();
        rig.plane(1);
        rig.ready();
        rig.touch_down();
        rig.advance(50);
        rig.touch_up();

        let codes: Vec<_> = rig
            .ctl
            .drain_events()
            .iter()
            .map(|e| e.type_code())
            .collect();
        assert_eq!(codes, vec!["PD", "N+", "HP", "HR", "CS", "SF"]);
    }
}
