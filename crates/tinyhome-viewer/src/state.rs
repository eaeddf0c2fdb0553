//! State management for the tiny-home viewer.
//!
//! Contains resource types and Bevy components used throughout the viewer.

use std::path::PathBuf;

use bevy::prelude::*;
use tinyhome_engine::camera::{CameraId, CameraInput};
use tinyhome_engine::config::{ColorScheme, EngineConfig};
use tinyhome_engine::fetch::LayoutRequest;
use tinyhome_engine::render_loop::RenderLoop;
use tinyhome_engine::{EngineError, NavigationController};

// ============================================================================
// RESOURCES
// ============================================================================

#[derive(Resource)]
pub struct Engine(pub NavigationController);

#[derive(Resource, Default)]
pub struct FrameLoop(pub RenderLoop);

/// Camera input gathered this frame, consumed by the render loop.
#[derive(Resource, Default)]
pub struct FrameInput(pub CameraInput);

/// Which renderer entities currently mirror the engine's scene.
#[derive(Resource, Default)]
pub struct SceneSync {
    pub revision: Option<u64>,
    pub permanent_spawned: bool,
    pub nodes: Vec<Entity>,
    pub camera: Option<(CameraId, Entity)>,
}

#[derive(Resource, Default)]
pub struct UiState {
    pub message: Option<String>,
    pub message_timer: f32,
}

impl UiState {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.message_timer = 6.0;
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ViewerConfig {
    /// Layout service URL; preferences are POSTed here on every generate.
    pub endpoint: Option<String>,
    /// Layout JSON re-read on every generate; built-in demos when unset.
    pub layout_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    /// Overrides the configured colour scheme with seeded random tints.
    pub seed: Option<u64>,
    pub request: LayoutRequest,
}

impl ViewerConfig {
    pub fn from_args() -> Self {
        let argv: Vec<String> = std::env::args().collect();
        Self::from_argv(&argv)
    }

    /// Parse a full argv, program name first.
    pub fn from_argv(argv: &[String]) -> Self {
        Self::parse(argv.get(1..).unwrap_or_default())
    }

    pub fn parse(args: &[String]) -> Self {
        let mut config = Self::default();
        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match (args[i].as_str(), value) {
                ("--endpoint" | "-e", Some(v)) => {
                    config.endpoint = Some(v);
                    i += 2;
                }
                ("--layout" | "-l", Some(v)) => {
                    config.layout_path = Some(PathBuf::from(v));
                    i += 2;
                }
                ("--config" | "-c", Some(v)) => {
                    config.config_path = Some(PathBuf::from(v));
                    i += 2;
                }
                ("--seed" | "-s", Some(v)) => {
                    config.seed = v.parse().ok();
                    i += 2;
                }
                ("--people", Some(v)) => {
                    if let Ok(n) = v.parse() {
                        config.request.num_people = n;
                    }
                    i += 2;
                }
                ("--budget", Some(v)) => {
                    config.request.budget = v;
                    i += 2;
                }
                ("--climate", Some(v)) => {
                    config.request.climate = v;
                    i += 2;
                }
                ("--needs", Some(v)) => {
                    config.request.needs = v;
                    i += 2;
                }
                ("--style", Some(v)) => {
                    config.request.style = v;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        config
    }

    pub fn engine_config(&self) -> Result<EngineConfig, EngineError> {
        let mut config = match &self.config_path {
            Some(path) => {
                let body = std::fs::read_to_string(path)
                    .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
                EngineConfig::from_json(&body)?
            }
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.color_scheme = ColorScheme::Random { seed };
        }
        Ok(config)
    }
}

// ============================================================================
// BEVY COMPONENTS
// ============================================================================

/// Renderer entity mirroring one engine scene node.
#[derive(Component)]
pub struct NodeEntity;

#[derive(Component)]
pub struct ViewCamera;

#[derive(Component)]
pub struct ExplanationText;

#[derive(Component)]
pub struct StatusText;
