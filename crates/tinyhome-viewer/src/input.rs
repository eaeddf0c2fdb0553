//! Input handling for the tiny-home viewer.
//!
//! Left click picks, right drag looks around, scroll zooms the overview,
//! WASD walks inside a room and Escape leaves it.

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use tinyhome_engine::math::{Ray, Vec3 as EngineVec3};
use tinyhome_engine::pick::{PointerButton, PointerEvent, PointerKind};
use tinyhome_engine::Transition;

use crate::state::{Engine, FrameInput, UiState, ViewCamera};

/// Gather this frame's continuous camera input.
pub fn gather_camera_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
    mut input: ResMut<FrameInput>,
) {
    let input = &mut input.0;
    *input = Default::default();
    input.dt = time.delta_secs();

    let dragging = mouse.pressed(MouseButton::Right);
    for ev in motion.read() {
        if dragging {
            input.drag_x += ev.delta.x;
            input.drag_y += ev.delta.y;
        }
    }
    for ev in scroll.read() {
        input.zoom += ev.y.signum();
    }

    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        input.move_forward += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        input.move_forward -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        input.move_right += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        input.move_right -= 1.0;
    }
}

/// Turn mouse releases into engine pointer events, picking under the cursor.
pub fn pointer_pick(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewCamera>>,
    mut engine: ResMut<Engine>,
    mut ui: ResMut<UiState>,
) {
    let button = if mouse.just_released(MouseButton::Left) {
        PointerButton::Primary
    } else if mouse.just_released(MouseButton::Middle) {
        PointerButton::Middle
    } else {
        return;
    };

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, cam_tf)) = cameras.get_single() else {
        return;
    };
    let Ok(view_ray) = camera.viewport_to_world(cam_tf, cursor) else {
        return;
    };

    let ray = Ray::new(
        EngineVec3::new(view_ray.origin.x, view_ray.origin.y, view_ray.origin.z),
        EngineVec3::new(view_ray.direction.x, view_ray.direction.y, view_ray.direction.z),
    );
    let event = PointerEvent {
        kind: PointerKind::Release,
        button,
        hit: engine.0.scene().pick(&ray),
    };
    if let Some(hit) = &event.hit {
        debug!("Picked '{}' at {:.2} units", hit.node_id, hit.distance);
    }

    match engine.0.pointer(&event) {
        Ok(Transition::EnteredInterior(room)) => {
            ui.show(format!("Inside '{}'. Click the floor to walk, the door or Esc to leave.", room));
        }
        Ok(Transition::EnteredExterior) => ui.message = None,
        Ok(_) => {}
        Err(e) if e.is_user_visible() => ui.show(e.to_string()),
        Err(_) => {}
    }
}

/// Escape leaves the current room.
pub fn exit_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut engine: ResMut<Engine>,
    mut ui: ResMut<UiState>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    match engine.0.exit_to_outside() {
        Ok(Transition::EnteredExterior) => ui.message = None,
        Ok(_) => {}
        Err(e) => ui.show(e.to_string()),
    }
}
