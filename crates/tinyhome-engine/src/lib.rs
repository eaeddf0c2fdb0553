//! Scene construction and navigation engine for generated tiny homes.
//!
//! Turns a layout document (rooms, footprints, feature tags) into a scene
//! graph of primitive nodes and runs the exterior ⇄ interior navigation
//! state machine on top of it. Nothing here depends on a renderer: hosts
//! mirror [`scene::SceneGraph`] into their own entities and feed pointer
//! picks back in.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`camera`] | Orbit and first-person rigs, single attached-camera slot |
//! | [`config`] | Policy constants (path length, wall thickness, eye height) |
//! | [`error`] | Engine error kinds |
//! | [`fetch`] | Layout request payload, last-issued-wins fetch tickets |
//! | [`geometry`] | Room → exterior / interior node sets |
//! | [`layout`] | Validated, immutable layout model |
//! | [`math`] | Vectors, rays, axis-aligned boxes |
//! | [`navigation`] | Exterior/interior state machine |
//! | [`pick`] | Pointer events → navigation events |
//! | [`render_loop`] | Per-refresh presentation contract |
//! | [`scene`] | Scene nodes and the scene graph |

pub mod camera;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod layout;
pub mod math;
pub mod navigation;
pub mod pick;
pub mod render_loop;
pub mod scene;

pub use error::{EngineError, Result};
pub use layout::{LayoutModel, Room};
pub use navigation::{NavMode, NavigationController, Transition};
