//! Mirrors the engine's scene graph and camera into Bevy entities.
//!
//! Node entities are despawned and respawned whenever the scene revision
//! changes. The Bevy camera entity follows the engine's camera identity:
//! a new engine camera despawns the old entity before spawning its own.

use bevy::prelude::*;
use tinyhome_engine::camera::Camera as EngineCamera;
use tinyhome_engine::math::Vec3 as EngineVec3;
use tinyhome_engine::render_loop::Presenter;
use tinyhome_engine::scene::{Primitive, SceneGraph, SceneNode};

use crate::fetch::FetchState;
use crate::state::{
    Engine, ExplanationText, FrameInput, FrameLoop, NodeEntity, SceneSync, StatusText, UiState,
    ViewCamera,
};

fn to_bevy(v: EngineVec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

struct BevyPresenter<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    sync: &'a mut SceneSync,
}

impl BevyPresenter<'_, '_, '_> {
    fn spawn_node(&mut self, node: &SceneNode) -> Option<Entity> {
        let translation = to_bevy(node.transform.translation);
        let r = node.transform.rotation;
        let transform = Transform::from_translation(translation)
            .with_rotation(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z));
        let tag = (NodeEntity, Name::new(node.id.clone()));

        let mesh: Mesh = match node.primitive {
            Primitive::Box {
                width,
                height,
                depth,
            } => Cuboid::new(width, height, depth).into(),
            Primitive::Plane { width, length } => {
                Plane3d::default().mesh().size(width, length).into()
            }
            Primitive::Cylinder { radius, height } => Cylinder::new(radius, height).into(),
            Primitive::Sphere { radius } => Sphere::new(radius).into(),
            Primitive::GroundPlane { size } => Plane3d::default().mesh().size(size, size).into(),
            Primitive::AmbientLight { brightness } => {
                self.commands.insert_resource(AmbientLight {
                    color: Color::srgb(0.95, 0.95, 1.0),
                    brightness,
                });
                return None;
            }
            Primitive::DirectionalLight { illuminance } => {
                let entity = self
                    .commands
                    .spawn((
                        DirectionalLight {
                            illuminance,
                            shadows_enabled: true,
                            ..default()
                        },
                        Transform::from_translation(translation).looking_at(Vec3::ZERO, Vec3::Y),
                        tag,
                    ))
                    .id();
                return Some(entity);
            }
        };

        let [red, green, blue] = node.material.color;
        let color = Color::srgb(red, green, blue);
        let emissive = if node.material.emissive {
            LinearRgba::from(color) * 4.0
        } else {
            LinearRgba::BLACK
        };
        let entity = self
            .commands
            .spawn((
                Mesh3d(self.meshes.add(mesh)),
                MeshMaterial3d(self.materials.add(StandardMaterial {
                    base_color: color,
                    emissive,
                    perceptual_roughness: 0.85,
                    ..default()
                })),
                transform,
                tag,
            ))
            .id();
        Some(entity)
    }
}

impl Presenter for BevyPresenter<'_, '_, '_> {
    fn present(&mut self, scene: &SceneGraph, camera: &EngineCamera) {
        if !self.sync.permanent_spawned {
            for node in scene.nodes().iter().filter(|n| n.permanent) {
                self.spawn_node(node);
            }
            self.sync.permanent_spawned = true;
        }

        if self.sync.revision != Some(scene.revision()) {
            for entity in std::mem::take(&mut self.sync.nodes) {
                self.commands.entity(entity).despawn_recursive();
            }
            for node in scene.transient_nodes() {
                if let Some(entity) = self.spawn_node(node) {
                    self.sync.nodes.push(entity);
                }
            }
            self.sync.revision = Some(scene.revision());
        }

        let transform = Transform::from_translation(to_bevy(camera.eye()))
            .looking_at(to_bevy(camera.look_target()), Vec3::Y);
        match self.sync.camera {
            Some((id, entity)) if id == camera.id() => {
                self.commands.entity(entity).insert(transform);
            }
            previous => {
                if let Some((old, entity)) = previous {
                    debug!("Disposing camera #{}", old);
                    self.commands.entity(entity).despawn_recursive();
                }
                let entity = self
                    .commands
                    .spawn((Camera3d::default(), transform, ViewCamera))
                    .id();
                self.sync.camera = Some((camera.id(), entity));
            }
        }
    }
}

/// One render-loop tick per frame.
pub fn drive_render_loop(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut engine: ResMut<Engine>,
    mut frame_loop: ResMut<FrameLoop>,
    mut sync: ResMut<SceneSync>,
    input: Res<FrameInput>,
) {
    let mut presenter = BevyPresenter {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
        sync: &mut sync,
    };
    frame_loop.0.tick(&mut engine.0, &input.0, &mut presenter);
}

pub fn setup_hud(mut commands: Commands) {
    // Explanation (top-left)
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 15.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            max_width: Val::Px(420.0),
            ..default()
        },
        ExplanationText,
    ));

    // Mode, messages and controls (bottom-left)
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.9, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        },
        StatusText,
    ));
}

pub fn render_hud(
    engine: Res<Engine>,
    fetches: Res<FetchState>,
    time: Res<Time>,
    mut ui: ResMut<UiState>,
    mut explanation: Query<&mut Text, (With<ExplanationText>, Without<StatusText>)>,
    mut status: Query<&mut Text, (With<StatusText>, Without<ExplanationText>)>,
) {
    if ui.message.is_some() {
        ui.message_timer -= time.delta_secs();
        if ui.message_timer <= 0.0 {
            ui.message = None;
        }
    }

    if let Ok(mut text) = explanation.get_single_mut() {
        let current = engine.0.explanation();
        if text.0 != current {
            text.0 = current.to_string();
        }
    }

    if let Ok(mut text) = status.get_single_mut() {
        let mode = match engine.0.mode() {
            tinyhome_engine::NavMode::Exterior => format!(
                "Outside | {} rooms | click a door to enter",
                engine.0.layout().rooms().len()
            ),
            tinyhome_engine::NavMode::Interior(room) => format!("Inside '{}'", room),
        };
        let mut lines = vec![mode];
        if fetches.in_flight() > 0 {
            lines.push("Generating layout...".into());
        }
        if let Some(msg) = &ui.message {
            lines.push(msg.clone());
        }
        lines.push("[G] new layout  [RMB drag] look  [Scroll] zoom  [WASD] walk  [Esc] exit".into());
        text.0 = lines.join("\n");
    }
}
