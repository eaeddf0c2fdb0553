//! Tiny-home viewer - Bevy host for the scene construction engine.
//!
//! Loads generated layouts, shows the exterior overview and lets the user
//! walk into rooms. All scene and navigation logic lives in
//! `tinyhome-engine`; this crate only mirrors it and feeds input back.
//!
//! Usage: tinyhome-viewer [--endpoint URL | --layout FILE] [--config FILE]
//!        [--seed N] [--people N] [--budget B] [--climate C] [--needs N]
//!        [--style S]

mod fetch;
mod input;
mod rendering;
mod state;

use bevy::prelude::*;
use tinyhome_engine::NavigationController;

use fetch::{poll_layout_fetches, request_initial_layout, request_layout_on_key, FetchState};
use input::{exit_shortcut, gather_camera_input, pointer_pick};
use rendering::{drive_render_loop, render_hud, setup_hud};
use state::{Engine, FrameInput, FrameLoop, SceneSync, UiState, ViewerConfig};

fn main() {
    let viewer = ViewerConfig::from_args();
    let engine = match viewer
        .engine_config()
        .and_then(NavigationController::new)
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tiny Home Walkthrough".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.62, 0.78, 0.92)))
        .insert_resource(FetchState::new(&viewer))
        .insert_resource(viewer)
        .insert_resource(Engine(engine))
        .insert_resource(FrameLoop::default())
        .insert_resource(FrameInput::default())
        .insert_resource(SceneSync::default())
        .insert_resource(UiState::default())
        .add_systems(Startup, (setup_hud, request_initial_layout))
        .add_systems(
            Update,
            (
                request_layout_on_key,
                poll_layout_fetches,
                exit_shortcut,
                pointer_pick,
                gather_camera_input,
                drive_render_loop,
                render_hud,
            )
                .chain(),
        )
        .run();
}
