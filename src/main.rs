//! AR Hoops - desktop build
//!
//! Main entry point: app setup and system registration.

use arhoops::{
    AssetStore, ConfigWatcher, DebugTuning, EventBus, EventLogConfig, EventLogger, GestureInput,
    ImpulseQueue, NoticePolicy, SessionConfig, SessionController, SimulatedTracking, camera,
    config_watcher, constants::*, input, log_session_events, parse_evlog, physics, session,
    tracking, ui, update_event_bus_time,
};
use avian3d::prelude::*;
use bevy::dev_tools::fps_overlay::FpsOverlayPlugin;
use bevy::{diagnostic::FrameTimeDiagnosticsPlugin, prelude::*};
use std::path::Path;

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    // Summary mode: --summarize <path.evlog> prints a report and exits
    if let Some(path) = args
        .iter()
        .position(|a| a == "--summarize")
        .and_then(|i| args.get(i + 1))
    {
        match parse_evlog(path) {
            Ok(summary) => {
                if !summary.is_valid() {
                    eprintln!("{} has no session start, report may be partial", path);
                }
                println!("{}", summary.report());
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    // Check for --config <path> override
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned())
        .unwrap_or_else(|| SESSION_CONFIG_FILE.to_string());
    let event_log_flag = args.iter().any(|a| a == "--event-log");
    let independent_notices = args.iter().any(|a| a == "--independent-notices");
    let no_debug_overlay = args.iter().any(|a| a == "--no-debug-overlay");

    // Load config (uses defaults if file doesn't exist)
    let mut config = SessionConfig::load_or_default(&config_path);
    if independent_notices {
        config.session.notice_policy = NoticePolicy::Independent;
    }
    if no_debug_overlay {
        config.debug = DebugTuning {
            show_world_origin: false,
            show_feature_points: false,
            show_planes: false,
            ..config.debug
        };
    }
    let event_log = event_log_flag || config.debug.event_log;

    // Save defaults on first run so the file exists to edit
    if !Path::new(&config_path).exists()
        && let Err(e) = SessionConfig::default().save(&config_path)
    {
        warn!("Failed to save initial config: {}", e);
    }

    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: "AR Hoops".into(),
                    ..default()
                }),
                ..default()
            }),
            FrameTimeDiagnosticsPlugin::default(),
            FpsOverlayPlugin::default(),
            PhysicsPlugins::default(),
        ))
        .insert_resource(ClearColor(ROOM_BACKGROUND))
        .insert_resource(SessionController::new(config.session.clone()))
        .insert_resource(SimulatedTracking::new(&config.tracking))
        .insert_resource(config.physics.clone())
        .insert_resource(config.debug.clone())
        .insert_resource(ConfigWatcher::new(&config_path))
        .insert_resource(EventBus::new())
        .insert_resource(EventLogger::new(EventLogConfig {
            enabled: event_log,
            ..default()
        }))
        .init_resource::<AssetStore>()
        .init_resource::<ImpulseQueue>()
        .init_resource::<GestureInput>()
        // Startup: world, then session (needs the device camera)
        .add_systems(Startup, (setup, session::start_session).chain())
        // Device camera moves before the session reads its pose
        .add_systems(
            Update,
            (camera::camera_look, camera::camera_movement).before(session::handle_gestures),
        )
        // Session pipeline must run in order: tracking -> input -> anchors -> gestures -> clock -> log
        .add_systems(
            Update,
            (
                update_event_bus_time,
                tracking::advance_tracking,
                input::capture_input,
                session::deliver_anchors,
                session::handle_gestures,
                session::advance_session,
                session::publish_session_events,
                log_session_events,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                ui::update_power_gauge,
                ui::update_status_text,
                ui::toggle_debug_overlay,
                ui::draw_debug_overlay,
                config_watcher::check_config_changes,
                physics::sync_gravity,
            ),
        )
        // Shot impulses land before the avian step in FixedPostUpdate
        .add_systems(
            FixedUpdate,
            (physics::apply_impulses, physics::despawn_fallen).chain(),
        )
        .run();
}

/// Setup the scene: camera, light and UI
fn setup(mut commands: Commands) {
    camera::spawn_device_camera(&mut commands);

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    ui::spawn_plane_notice(&mut commands);
    ui::spawn_power_gauge(&mut commands);
    ui::spawn_status_text(&mut commands);
}
