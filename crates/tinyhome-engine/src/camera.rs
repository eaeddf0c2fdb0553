//! Camera rigs and the single-slot holder that keeps exactly one camera
//! attached.
//!
//! Orientation convention: `yaw = 0` looks down -Z, positive yaw turns
//! toward -X, negative pitch looks down.

use serde::{Deserialize, Serialize};

use crate::math::{Aabb, Vec3};

pub type CameraId = u64;

const ORBIT_DRAG_SPEED: f32 = 0.005;
const ORBIT_ZOOM_STEP: f32 = 0.1;
const ORBIT_MIN_DISTANCE: f32 = 2.0;
const ORBIT_MAX_DISTANCE: f32 = 200.0;
const ORBIT_MIN_PITCH: f32 = -1.45;
const ORBIT_MAX_PITCH: f32 = -0.05;

const LOOK_SPEED: f32 = 0.003;
const LOOK_MAX_PITCH: f32 = 1.4;
/// First-person walking speed in units per second.
const WALK_SPEED: f32 = 2.5;

fn forward_from(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        -yaw.sin() * pitch.cos(),
        pitch.sin(),
        -yaw.cos() * pitch.cos(),
    )
}

/// Overview camera circling a target point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitRig {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitRig {
    /// Frame a layout: aim at the middle of its bounds, far enough back
    /// to see all of it.
    pub fn framing(bounds: Option<Aabb>, min_distance: f32) -> Self {
        let (target, distance) = match bounds {
            Some(b) => {
                let target = Vec3::new(
                    (b.min.x + b.max.x) / 2.0,
                    b.max.y / 2.0,
                    (b.min.z + b.max.z) / 2.0,
                );
                let diag = b.min.distance(&b.max);
                (target, (diag * 1.2).max(min_distance))
            }
            None => (Vec3::ZERO, min_distance),
        };
        Self {
            target,
            distance,
            yaw: 0.55,
            pitch: -0.6,
        }
    }
}

/// Walk-through camera standing at a fixed eye height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FirstPersonRig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraRig {
    Orbit(OrbitRig),
    FirstPerson(FirstPersonRig),
}

/// Continuous per-frame input for the active camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraInput {
    /// Pointer drag in pixels since the last frame.
    pub drag_x: f32,
    pub drag_y: f32,
    /// Scroll steps; positive zooms in.
    pub zoom: f32,
    /// -1..1 walk axes.
    pub move_forward: f32,
    pub move_right: f32,
    /// Seconds since the last frame.
    pub dt: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    id: CameraId,
    rig: CameraRig,
}

impl Camera {
    pub fn id(&self) -> CameraId {
        self.id
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    pub fn is_orbit(&self) -> bool {
        matches!(self.rig, CameraRig::Orbit(_))
    }

    pub fn forward(&self) -> Vec3 {
        match &self.rig {
            CameraRig::Orbit(o) => forward_from(o.yaw, o.pitch),
            CameraRig::FirstPerson(f) => forward_from(f.yaw, f.pitch),
        }
    }

    pub fn eye(&self) -> Vec3 {
        match &self.rig {
            CameraRig::Orbit(o) => o.target - forward_from(o.yaw, o.pitch) * o.distance,
            CameraRig::FirstPerson(f) => f.position,
        }
    }

    /// A point the camera is looking at.
    pub fn look_target(&self) -> Vec3 {
        match &self.rig {
            CameraRig::Orbit(o) => o.target,
            CameraRig::FirstPerson(f) => f.position + forward_from(f.yaw, f.pitch),
        }
    }

    /// Apply one frame of continuous input.
    pub fn advance(&mut self, input: &CameraInput) {
        match &mut self.rig {
            CameraRig::Orbit(o) => {
                o.yaw -= input.drag_x * ORBIT_DRAG_SPEED;
                o.pitch = (o.pitch - input.drag_y * ORBIT_DRAG_SPEED)
                    .clamp(ORBIT_MIN_PITCH, ORBIT_MAX_PITCH);
                o.distance = (o.distance * (1.0 - input.zoom * ORBIT_ZOOM_STEP))
                    .clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
            }
            CameraRig::FirstPerson(f) => {
                f.yaw -= input.drag_x * LOOK_SPEED;
                f.pitch =
                    (f.pitch - input.drag_y * LOOK_SPEED).clamp(-LOOK_MAX_PITCH, LOOK_MAX_PITCH);
                let ahead = Vec3::new(-f.yaw.sin(), 0.0, -f.yaw.cos());
                let right = Vec3::new(f.yaw.cos(), 0.0, -f.yaw.sin());
                let step = WALK_SPEED * input.dt;
                f.position = f.position
                    + ahead * (input.move_forward * step)
                    + right * (input.move_right * step);
            }
        }
    }
}

/// Holds the one attached camera. Replacing it always disposes the old
/// camera before the new one is attached.
#[derive(Debug)]
pub struct CameraSlot {
    active: Camera,
    next_id: CameraId,
    last_disposed: Option<CameraId>,
}

impl CameraSlot {
    pub fn new(rig: CameraRig) -> Self {
        Self {
            active: Camera { id: 1, rig },
            next_id: 2,
            last_disposed: None,
        }
    }

    pub fn active(&self) -> &Camera {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Camera {
        &mut self.active
    }

    /// Dispose the active camera and attach a fresh one built from `rig`.
    /// Returns the new camera's id.
    pub fn replace(&mut self, rig: CameraRig) -> CameraId {
        self.last_disposed = Some(self.active.id);
        let id = self.next_id;
        self.next_id += 1;
        self.active = Camera { id, rig };
        id
    }

    /// Id of the camera most recently detached by [`replace`](Self::replace).
    pub fn last_disposed(&self) -> Option<CameraId> {
        self.last_disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(x: f32, z: f32) -> Camera {
        Camera {
            id: 1,
            rig: CameraRig::FirstPerson(FirstPersonRig {
                position: Vec3::new(x, 1.6, z),
                yaw: 0.0,
                pitch: 0.0,
            }),
        }
    }

    #[test]
    fn zero_yaw_looks_down_negative_z() {
        let cam = fp(2.0, 3.3);
        assert!(cam.forward().approx_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn walking_forward_keeps_eye_height() {
        let mut cam = fp(2.0, 3.3);
        cam.advance(&CameraInput {
            move_forward: 1.0,
            dt: 0.4,
            ..Default::default()
        });
        assert!(cam.eye().approx_eq(&Vec3::new(2.0, 1.6, 2.3), 1e-5));
    }

    #[test]
    fn orbit_eye_is_above_target() {
        let rig = OrbitRig::framing(None, 15.0);
        let cam = Camera {
            id: 1,
            rig: CameraRig::Orbit(rig),
        };
        assert!(cam.eye().y > 0.0);
        assert!((cam.eye().distance(&cam.look_target()) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn orbit_zoom_and_pitch_clamped() {
        let mut cam = Camera {
            id: 1,
            rig: CameraRig::Orbit(OrbitRig::framing(None, 15.0)),
        };
        for _ in 0..200 {
            cam.advance(&CameraInput {
                zoom: 1.0,
                drag_y: 500.0,
                ..Default::default()
            });
        }
        let CameraRig::Orbit(o) = cam.rig() else {
            panic!("expected orbit rig");
        };
        assert_eq!(o.distance, ORBIT_MIN_DISTANCE);
        assert_eq!(o.pitch, ORBIT_MIN_PITCH);
    }

    #[test]
    fn replace_disposes_previous() {
        let mut slot = CameraSlot::new(CameraRig::Orbit(OrbitRig::framing(None, 15.0)));
        let first = slot.active().id();
        assert_eq!(slot.last_disposed(), None);
        let second = slot.replace(*fp(0.0, 0.0).rig());
        assert_ne!(first, second);
        assert_eq!(slot.last_disposed(), Some(first));
        assert_eq!(slot.active().id(), second);

        let third = slot.replace(*fp(1.0, 1.0).rig());
        assert_eq!(slot.last_disposed(), Some(second));
        assert_eq!(slot.active().id(), third);
    }

    #[test]
    fn framing_covers_layout() {
        let b = Aabb {
            min: Vec3::new(0.0, 0.0, 0.0),
            max: Vec3::new(40.0, 3.0, 30.0),
        };
        let rig = OrbitRig::framing(Some(b), 15.0);
        assert_eq!(rig.target, Vec3::new(20.0, 1.5, 15.0));
        assert!(rig.distance > 50.0);
    }
}
