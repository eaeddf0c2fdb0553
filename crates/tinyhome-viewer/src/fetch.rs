//! Layout fetching for the viewer.
//!
//! Every request runs as a background task and carries an engine fetch
//! ticket. Tasks are never cancelled; results from superseded tickets are
//! dropped by the engine when they land.
//!
//! With `--endpoint` the user's preferences are POSTed to the layout
//! service; otherwise layouts come from `--layout FILE` or the demos.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task};
use tinyhome_engine::fetch::{FetchTicket, LayoutRequest};
use tinyhome_engine::EngineError;

use crate::state::{Engine, UiState, ViewerConfig};

const DEMO_LAYOUTS: [&str; 3] = [
    r#"{
        "explanation": "A single-person studio with a sleeping loft feel.",
        "rooms": [
            {"name": "bed1", "x": 0, "y": 0, "width": 4, "length": 3, "height": 2.5,
             "features": ["door", "window", "roof"]}
        ]
    }"#,
    r#"{
        "explanation": "Two cabins along a shared garden, a bath tucked between them.",
        "rooms": [
            {"name": "living", "x": 0, "y": 0, "width": 5, "length": 4, "height": 2.6,
             "features": ["door", "window", "roof"]},
            {"name": "bath", "x": 5, "y": 0, "width": 2, "length": 2, "height": 2.3,
             "features": ["window"]},
            {"name": "loft", "x": 8, "y": 0, "width": 4, "length": 4, "height": 2.8,
             "features": ["door", "bed", "plant"]}
        ]
    }"#,
    r#"{
        "explanation": "A compact family home with a kitchen, two bedrooms and a green corner.",
        "rooms": [
            {"name": "kitchen", "x": 0, "y": 0, "width": 3.5, "length": 3, "height": 2.5,
             "features": ["door", "window", "plant"]},
            {"name": "bedroom1", "x": 4.5, "y": 0, "width": 3, "length": 3.5, "height": 2.5,
             "features": ["door", "bed", "roof"]},
            {"name": "bedroom2", "x": 8.5, "y": 0, "width": 3, "length": 3.5, "height": 2.5,
             "features": ["door", "bed", "window"]}
        ]
    }"#,
];

/// Where layout documents come from.
#[derive(Debug, Clone)]
pub enum LayoutSource {
    /// Layout service; each request POSTs the current preferences.
    Endpoint(String),
    /// Re-read on every request.
    File(PathBuf),
    /// Built-in layouts, rotated per request.
    Demo { next: usize },
}

impl LayoutSource {
    fn load(
        &mut self,
        request: &LayoutRequest,
    ) -> impl std::future::Future<Output = Result<String, String>> + Send {
        let source = self.clone();
        let payload = request.to_json();
        if let LayoutSource::Demo { next } = self {
            *next = (*next + 1) % DEMO_LAYOUTS.len();
        }
        async move {
            match source {
                LayoutSource::Endpoint(url) => post_layout_request(&url, &payload),
                LayoutSource::File(path) => std::fs::read_to_string(&path)
                    .map_err(|e| format!("Could not read {}: {}", path.display(), e)),
                LayoutSource::Demo { next } => Ok(DEMO_LAYOUTS[next].to_string()),
            }
        }
    }
}

/// Blocking POST; runs on the async compute pool, never the main thread.
fn post_layout_request(url: &str, payload: &str) -> Result<String, String> {
    let response = ureq::post(url)
        .set("Content-Type", "application/json")
        .send_string(payload)
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => format!("Layout service at {} returned {}", url, code),
            other => format!("Could not reach {}: {}", url, other),
        })?;
    response
        .into_string()
        .map_err(|e| format!("Could not read response from {}: {}", url, e))
}

#[derive(Resource)]
pub struct FetchState {
    pub source: LayoutSource,
    pending: Vec<(FetchTicket, Task<Result<String, String>>)>,
}

impl FetchState {
    pub fn new(config: &ViewerConfig) -> Self {
        let source = match (&config.endpoint, &config.layout_path) {
            (Some(url), _) => LayoutSource::Endpoint(url.clone()),
            (None, Some(path)) => LayoutSource::File(path.clone()),
            (None, None) => LayoutSource::Demo { next: 0 },
        };
        Self {
            source,
            pending: Vec::new(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }
}

fn spawn_fetch(engine: &mut Engine, fetches: &mut FetchState, config: &ViewerConfig) {
    let ticket = engine.0.begin_fetch();
    info!(
        "Requesting layout #{}: {}",
        ticket.generation(),
        config.request.to_json()
    );
    let task = AsyncComputeTaskPool::get().spawn(fetches.source.load(&config.request));
    fetches.pending.push((ticket, task));
}

pub fn request_initial_layout(
    mut engine: ResMut<Engine>,
    mut fetches: ResMut<FetchState>,
    config: Res<ViewerConfig>,
) {
    spawn_fetch(&mut engine, &mut fetches, &config);
}

/// G generates a new layout; earlier requests keep running but lose.
pub fn request_layout_on_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut engine: ResMut<Engine>,
    mut fetches: ResMut<FetchState>,
    config: Res<ViewerConfig>,
) {
    if keyboard.just_pressed(KeyCode::KeyG) {
        spawn_fetch(&mut engine, &mut fetches, &config);
    }
}

pub fn poll_layout_fetches(
    mut engine: ResMut<Engine>,
    mut fetches: ResMut<FetchState>,
    mut ui: ResMut<UiState>,
) {
    fetches.pending.retain_mut(|(ticket, task)| {
        let Some(result) = block_on(future::poll_once(task)) else {
            return true;
        };
        let outcome = result
            .map_err(|reason| (engine.0.check_fetch(*ticket).is_ok(), reason))
            .map(|body| engine.0.complete_fetch(*ticket, &body));
        match outcome {
            Ok(Ok(_)) => ui.message = None,
            Ok(Err(EngineError::StaleResponse { ticket, latest })) => {
                debug!("Dropped layout #{} (latest #{})", ticket, latest);
            }
            Ok(Err(e)) => ui.show(e.to_string()),
            Err((true, reason)) => {
                warn!("{}", reason);
                ui.show(reason);
            }
            Err((false, reason)) => debug!("Stale fetch failed: {}", reason),
        }
        false
    });
}
