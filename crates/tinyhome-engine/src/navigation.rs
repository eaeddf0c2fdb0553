//! Navigation state machine: exterior overview ⇄ first-person interior.
//!
//! The controller owns the scene graph and the camera slot. Every
//! transition builds its new node set first and only then swaps the graph
//! and the camera, so a failed transition leaves mode, scene and camera as
//! they were.
//!
//! | From | Event | To |
//! |------|-------|----|
//! | any | layout ready | Exterior (fresh layout) |
//! | Exterior | door clicked | Interior(room) |
//! | Interior(r) | floor clicked | Interior(r), camera moved |
//! | Interior(r) | exit requested | Exterior |

use crate::camera::{Camera, CameraInput, CameraRig, CameraSlot, FirstPersonRig, OrbitRig};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::fetch::{FetchTicket, FetchTracker};
use crate::geometry::GeometryBuilder;
use crate::layout::LayoutModel;
use crate::math::Vec3;
use crate::pick::{route, NavEvent, PointerEvent};
use crate::scene::{SceneGraph, SceneNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMode {
    Exterior,
    Interior(String),
}

/// Outcome of a handled event.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    EnteredExterior,
    EnteredInterior(String),
    /// Camera repositioned inside the current room.
    Moved(Vec3),
    /// Event has no meaning in the current mode.
    Ignored,
}

pub struct NavigationController {
    builder: GeometryBuilder,
    layout: LayoutModel,
    mode: NavMode,
    scene: SceneGraph,
    cameras: CameraSlot,
    fetches: FetchTracker,
}

impl NavigationController {
    /// Starts in Exterior with no rooms, permanent nodes installed and an
    /// overview camera attached.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let overview = OrbitRig::framing(None, config.overview_min_distance);
        let builder = GeometryBuilder::new(config);
        let mut scene = SceneGraph::new();
        scene.add_all(builder.permanent_nodes())?;
        Ok(Self {
            builder,
            layout: LayoutModel::default(),
            mode: NavMode::Exterior,
            scene,
            cameras: CameraSlot::new(CameraRig::Orbit(overview)),
            fetches: FetchTracker::new(),
        })
    }

    pub fn mode(&self) -> &NavMode {
        &self.mode
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        self.cameras.active()
    }

    pub fn cameras(&self) -> &CameraSlot {
        &self.cameras
    }

    pub fn layout(&self) -> &LayoutModel {
        &self.layout
    }

    pub fn explanation(&self) -> &str {
        self.layout.explanation()
    }

    pub fn config(&self) -> &EngineConfig {
        self.builder.config()
    }

    /// Apply a freshly validated layout. Always lands in Exterior.
    pub fn layout_ready(&mut self, layout: LayoutModel) -> Result<Transition> {
        let nodes = self.builder.build_exterior_scene(&layout);
        self.swap_scene(nodes)?;
        self.layout = layout;
        self.mode = NavMode::Exterior;
        self.attach_overview();
        log::info!(
            "Layout applied: {} rooms, {} scene nodes",
            self.layout.rooms().len(),
            self.scene.len()
        );
        Ok(Transition::EnteredExterior)
    }

    pub fn handle(&mut self, event: NavEvent) -> Result<Transition> {
        let inside = matches!(self.mode, NavMode::Interior(_));
        match event {
            NavEvent::DoorClicked(room) if !inside => self.enter_interior(&room),
            NavEvent::FloorClicked(point) if inside => Ok(self.walk_to(point)),
            NavEvent::ExitRequested if inside => self.exit_interior(),
            event => {
                log::debug!("Ignoring {:?} in {:?}", event, self.mode);
                Ok(Transition::Ignored)
            }
        }
    }

    /// Route a pointer event and act on it.
    pub fn pointer(&mut self, event: &PointerEvent) -> Result<Transition> {
        match route(&self.scene, event, &self.mode) {
            Some(nav) => self.handle(nav),
            None => Ok(Transition::Ignored),
        }
    }

    /// Host "exit to outside" trigger; same as an in-scene door exit.
    pub fn exit_to_outside(&mut self) -> Result<Transition> {
        self.handle(NavEvent::ExitRequested)
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.fetches.issue();
        log::debug!("Layout fetch #{} issued", ticket.generation());
        ticket
    }

    /// Ok while `ticket` is the newest fetch.
    pub fn check_fetch(&self, ticket: FetchTicket) -> Result<()> {
        self.fetches.check(ticket)
    }

    /// Parse, validate and apply a fetch result. Stale tickets and
    /// malformed bodies leave the engine untouched.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, body: &str) -> Result<Transition> {
        if let Err(e) = self.fetches.check(ticket) {
            log::debug!("{}", e);
            return Err(e);
        }
        let layout = LayoutModel::from_json(body).map_err(|e| self.reject(e))?;
        self.layout_ready(layout)
    }

    /// Continuous input for whichever camera is attached right now.
    pub fn advance_camera(&mut self, input: &CameraInput) {
        self.cameras.active_mut().advance(input);
    }

    fn enter_interior(&mut self, name: &str) -> Result<Transition> {
        let room = self
            .layout
            .room(name)
            .ok_or_else(|| EngineError::RoomNotFound(name.to_string()))
            .map_err(|e| self.reject(e))?;
        let nodes = self
            .builder
            .build_interior(room)
            .map_err(|e| self.reject(e))?;
        let door = room.door_point();
        let cfg = self.builder.config();
        let rig = FirstPersonRig {
            position: Vec3::new(door.x, cfg.eye_height, door.z + cfg.door_standoff),
            yaw: 0.0,
            pitch: 0.0,
        };

        self.swap_scene(nodes)?;
        self.cameras.replace(CameraRig::FirstPerson(rig));
        self.mode = NavMode::Interior(name.to_string());
        log::info!("Entered room '{}'", name);
        Ok(Transition::EnteredInterior(name.to_string()))
    }

    fn walk_to(&mut self, point: Vec3) -> Transition {
        let eye = self.builder.config().eye_height;
        match self.cameras.active_mut().rig_mut() {
            CameraRig::FirstPerson(f) => {
                f.position = Vec3::new(point.x, eye, point.z);
                Transition::Moved(f.position)
            }
            CameraRig::Orbit(_) => Transition::Ignored,
        }
    }

    fn exit_interior(&mut self) -> Result<Transition> {
        let nodes = self.builder.build_exterior_scene(&self.layout);
        self.swap_scene(nodes)?;
        self.mode = NavMode::Exterior;
        self.attach_overview();
        log::info!("Returned to exterior overview");
        Ok(Transition::EnteredExterior)
    }

    fn swap_scene(&mut self, nodes: Vec<SceneNode>) -> Result<()> {
        if let Err(e) = self.scene.rebuild(nodes) {
            return Err(self.reject(e));
        }
        Ok(())
    }

    /// Keep an attached orbit camera (re-aimed at the layout); otherwise
    /// dispose the current camera and attach a new overview.
    fn attach_overview(&mut self) {
        let framed = OrbitRig::framing(
            self.layout.bounds(),
            self.builder.config().overview_min_distance,
        );
        match self.cameras.active_mut().rig_mut() {
            CameraRig::Orbit(o) => {
                o.target = framed.target;
                o.distance = framed.distance;
            }
            CameraRig::FirstPerson(_) => {
                self.cameras.replace(CameraRig::Orbit(framed));
            }
        }
    }

    fn reject(&self, err: EngineError) -> EngineError {
        if err.is_invariant_violation() {
            log::error!("Transition aborted in {:?}: {}", self.mode, err);
        } else {
            log::warn!("Transition rejected in {:?}: {}", self.mode, err);
        }
        err
    }
}
