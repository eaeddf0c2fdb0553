//! Per-refresh presentation contract.
//!
//! The host calls [`RenderLoop::tick`] once per display refresh. A tick
//! advances whatever camera is attached *now* and hands the scene plus that
//! camera to the host's [`Presenter`]. Nothing is cached between ticks, so
//! a camera swap between two ticks is picked up by the next one.

use crate::camera::{Camera, CameraInput};
use crate::navigation::NavigationController;
use crate::scene::SceneGraph;

/// Host side of presentation (a renderer, or a recorder in tests).
pub trait Presenter {
    fn present(&mut self, scene: &SceneGraph, camera: &Camera);
}

#[derive(Debug, Default)]
pub struct RenderLoop {
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(
        &mut self,
        nav: &mut NavigationController,
        input: &CameraInput,
        presenter: &mut dyn Presenter,
    ) {
        nav.advance_camera(input);
        presenter.present(nav.scene(), nav.camera());
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraId;
    use crate::config::EngineConfig;
    use crate::layout::{LayoutModel, Room};
    use crate::pick::NavEvent;

    #[derive(Default)]
    struct Recorder {
        seen: Vec<(CameraId, u64)>,
    }

    impl Presenter for Recorder {
        fn present(&mut self, scene: &SceneGraph, camera: &Camera) {
            self.seen.push((camera.id(), scene.revision()));
        }
    }

    #[test]
    fn picks_up_camera_swap_between_ticks() {
        let mut nav = NavigationController::new(EngineConfig::default()).unwrap();
        let room = Room::new("bed1", 0.0, 0.0, 4.0, 3.0, 2.5).with_features(["door"]);
        nav.layout_ready(LayoutModel::new("", vec![room]).unwrap()).unwrap();
        let mut rl = RenderLoop::new();
        let mut rec = Recorder::default();
        let input = CameraInput::default();

        rl.tick(&mut nav, &input, &mut rec);
        nav.handle(NavEvent::DoorClicked("bed1".into())).unwrap();
        rl.tick(&mut nav, &input, &mut rec);

        assert_eq!(rl.frames(), 2);
        assert_ne!(rec.seen[0].0, rec.seen[1].0);
        assert_eq!(rec.seen[1].0, nav.camera().id());
        assert!(rec.seen[1].1 > rec.seen[0].1);
    }

    #[test]
    fn tick_advances_active_camera() {
        let mut nav = NavigationController::new(EngineConfig::default()).unwrap();
        let before = nav.camera().eye();
        let mut rec = Recorder::default();
        RenderLoop::new().tick(
            &mut nav,
            &CameraInput {
                drag_x: 100.0,
                ..Default::default()
            },
            &mut rec,
        );
        assert!(!nav.camera().eye().approx_eq(&before, 1e-4));
    }
}
