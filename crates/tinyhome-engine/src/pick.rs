//! Pointer-pick routing: raw pointer events → semantic navigation events.
//!
//! Dispatch reads the [`PickTarget`] tag attached to the node when it was
//! built; node ids are never parsed.

use crate::math::Vec3;
use crate::navigation::NavMode;
use crate::scene::{PickHit, PickTarget, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Press,
    Release,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One pointer interaction already resolved against the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub button: PointerButton,
    pub hit: Option<PickHit>,
}

impl PointerEvent {
    pub fn primary_release(hit: Option<PickHit>) -> Self {
        Self {
            kind: PointerKind::Release,
            button: PointerButton::Primary,
            hit,
        }
    }
}

/// What the controller is asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    DoorClicked(String),
    FloorClicked(Vec3),
    ExitRequested,
}

/// Classify a pointer event. Pure; the controller performs all mutation.
pub fn route(scene: &SceneGraph, event: &PointerEvent, mode: &NavMode) -> Option<NavEvent> {
    if event.kind != PointerKind::Release || event.button != PointerButton::Primary {
        return None;
    }
    let hit = event.hit.as_ref()?;
    let node = scene.find_by_id(&hit.node_id)?;
    match (mode, &node.pick) {
        (NavMode::Exterior, PickTarget::Door { room }) => Some(NavEvent::DoorClicked(room.clone())),
        (NavMode::Interior(_), PickTarget::Door { .. }) => Some(NavEvent::ExitRequested),
        (NavMode::Interior(_), PickTarget::Floor) => Some(NavEvent::FloorClicked(hit.point)),
        _ => None,
    }
}
