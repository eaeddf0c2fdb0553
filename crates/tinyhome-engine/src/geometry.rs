//! Room → scene node builders.
//!
//! Pure functions: the same room and config always yield the same node
//! ids and transforms. Node ids are `<role>_<room name>`, so nodes from
//! different rooms never collide within one snapshot.
//!
//! World mapping: a room's ground-plane `x` is world X, its `y` is world
//! Z, and height runs along +Y. The door always sits on the southern edge
//! (`z = y + length`).

use std::f32::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ColorScheme, EngineConfig};
use crate::error::{EngineError, Result};
use crate::layout::{Feature, LayoutModel, Room};
use crate::math::Vec3;
use crate::scene::{Material, PickTarget, Primitive, SceneNode};

/// Plant pairs flanking the path, as fractions of the path length.
const PLANT_STATIONS: [f32; 2] = [0.3, 0.75];
/// Gap between the path edge and the plant pots.
const PLANT_SETBACK: f32 = 0.5;
const POT_RADIUS: f32 = 0.2;
const POT_HEIGHT: f32 = 0.35;
const FOLIAGE_RADIUS: f32 = 0.3;
const PATH_THICKNESS: f32 = 0.02;
const BED_HEIGHT: f32 = 0.5;
/// Interior floor sits just above the ground plane so picks land on it.
const FLOOR_LIFT: f32 = 0.01;

const ROOM_PALETTE: [[f32; 3]; 8] = [
    [0.60, 0.80, 1.00],
    [0.98, 0.80, 0.55],
    [0.70, 0.90, 0.70],
    [0.95, 0.70, 0.75],
    [0.80, 0.75, 0.95],
    [0.95, 0.92, 0.65],
    [0.65, 0.85, 0.85],
    [0.90, 0.78, 0.68],
];

const DOOR: Material = Material::rgb(0.45, 0.30, 0.18);
const PATH: Material = Material::rgb(0.72, 0.70, 0.66);
const POT: Material = Material::rgb(0.72, 0.38, 0.22);
const FOLIAGE: Material = Material::rgb(0.22, 0.55, 0.25);
const GLASS: Material = Material::rgb(0.55, 0.75, 0.95);
const ROOF: Material = Material::rgb(0.55, 0.22, 0.18);
const BED: Material = Material::rgb(0.90, 0.90, 0.95);
const FLOOR: Material = Material::rgb(0.76, 0.60, 0.42);
const WALL: Material = Material::rgb(0.93, 0.91, 0.86);
const CEILING: Material = Material::rgb(0.97, 0.97, 0.97);
const WOOD: Material = Material::rgb(0.50, 0.34, 0.20);
const METAL: Material = Material::rgb(0.30, 0.30, 0.32);
const BULB: Material = Material::glowing(1.0, 0.92, 0.70);
const GROUND: Material = Material::rgb(0.55, 0.68, 0.48);

/// Footprint (x, z) of a bed sized to the room.
fn bed_size(room: &Room) -> (f32, f32) {
    ((room.width * 0.35).min(1.0), (room.length * 0.6).min(2.0))
}

/// FNV-1a; stable across runs and platforms, unlike `DefaultHasher`.
fn name_hash(name: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for b in name.bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h
}

pub struct GeometryBuilder {
    config: EngineConfig,
}

impl GeometryBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn room_color(&self, room: &Room) -> Material {
        let h = name_hash(&room.name);
        match self.config.color_scheme {
            ColorScheme::Palette => {
                let [r, g, b] = ROOM_PALETTE[(h % ROOM_PALETTE.len() as u64) as usize];
                Material::rgb(r, g, b)
            }
            ColorScheme::Random { seed } => {
                let mut rng = StdRng::seed_from_u64(seed ^ h);
                Material::rgb(
                    rng.gen_range(0.45..0.95),
                    rng.gen_range(0.45..0.95),
                    rng.gen_range(0.45..0.95),
                )
            }
        }
    }

    /// Ground plane plus global lights. Installed once; survives clears.
    pub fn permanent_nodes(&self) -> Vec<SceneNode> {
        vec![
            SceneNode::new(
                "ground",
                Primitive::GroundPlane {
                    size: self.config.ground_size,
                },
                Vec3::ZERO,
            )
            .with_material(GROUND)
            .permanent(),
            SceneNode::new(
                "light_ambient",
                Primitive::AmbientLight { brightness: 500.0 },
                Vec3::ZERO,
            )
            .permanent(),
            SceneNode::new(
                "light_sun",
                Primitive::DirectionalLight {
                    illuminance: 2000.0,
                },
                Vec3::new(10.0, 20.0, 10.0),
            )
            .permanent(),
        ]
    }

    /// Exterior representation of one room.
    pub fn build(&self, room: &Room) -> Vec<SceneNode> {
        let mut nodes = vec![SceneNode::new(
            format!("room_{}", room.name),
            Primitive::Box {
                width: room.width,
                height: room.height,
                depth: room.length,
            },
            room.center(),
        )
        .with_material(self.room_color(room))];

        if room.has_door() {
            nodes.extend(self.door_approach(room));
        }
        for feature in &room.features {
            if let Some(node) = self.decoration(room, feature) {
                nodes.push(node);
            }
        }
        nodes
    }

    /// Exterior node sets for every room, in declaration order.
    pub fn build_exterior_scene(&self, layout: &LayoutModel) -> Vec<SceneNode> {
        layout.rooms().iter().flat_map(|r| self.build(r)).collect()
    }

    fn door_height(&self, room: &Room) -> f32 {
        self.config.door_height.min(room.height * 0.9)
    }

    fn door_width(&self, room: &Room) -> f32 {
        self.config.door_width.min(room.width * 0.8)
    }

    /// Door slab, garden path, and the plant pairs lining the path.
    fn door_approach(&self, room: &Room) -> Vec<SceneNode> {
        let cfg = &self.config;
        let door = room.door_point();
        let door_h = self.door_height(room);
        let door_w = self.door_width(room);
        let mut nodes = Vec::with_capacity(2 + PLANT_STATIONS.len() * 4);

        nodes.push(
            SceneNode::new(
                format!("door_{}", room.name),
                Primitive::Box {
                    width: door_w,
                    height: door_h,
                    depth: cfg.wall_thickness,
                },
                Vec3::new(door.x, door_h / 2.0, door.z + cfg.wall_thickness / 2.0),
            )
            .with_material(DOOR)
            .with_pick(PickTarget::Door {
                room: room.name.clone(),
            }),
        );

        nodes.push(
            SceneNode::new(
                format!("path_{}", room.name),
                Primitive::Box {
                    width: cfg.path_width,
                    height: PATH_THICKNESS,
                    depth: cfg.path_length,
                },
                Vec3::new(
                    door.x,
                    PATH_THICKNESS / 2.0,
                    door.z + cfg.path_length / 2.0,
                ),
            )
            .with_material(PATH),
        );

        let side = cfg.path_width / 2.0 + PLANT_SETBACK;
        let mut i = 0;
        for station in PLANT_STATIONS {
            let z = door.z + station * cfg.path_length;
            for dx in [-side, side] {
                let x = door.x + dx;
                nodes.push(
                    SceneNode::new(
                        format!("plant_pot{}_{}", i, room.name),
                        Primitive::Cylinder {
                            radius: POT_RADIUS,
                            height: POT_HEIGHT,
                        },
                        Vec3::new(x, POT_HEIGHT / 2.0, z),
                    )
                    .with_material(POT),
                );
                nodes.push(
                    SceneNode::new(
                        format!("plant_leaf{}_{}", i, room.name),
                        Primitive::Sphere {
                            radius: FOLIAGE_RADIUS,
                        },
                        Vec3::new(x, POT_HEIGHT + FOLIAGE_RADIUS * 0.8, z),
                    )
                    .with_material(FOLIAGE),
                );
                i += 1;
            }
        }
        nodes
    }

    /// Per-feature decorative primitive. Door geometry is handled by
    /// [`door_approach`](Self::door_approach); unknown tags draw nothing.
    fn decoration(&self, room: &Room, feature: &Feature) -> Option<SceneNode> {
        let c = room.center();
        let node = match feature {
            Feature::Door | Feature::Other(_) => return None,
            // West face, upper half.
            Feature::Window => SceneNode::new(
                format!("window_{}", room.name),
                Primitive::Box {
                    width: 0.05,
                    height: (room.height * 0.35).min(1.0),
                    depth: (room.length * 0.5).min(1.2),
                },
                Vec3::new(room.x - 0.03, room.height * 0.6, c.z),
            )
            .with_material(GLASS),
            // Overhanging slab on top.
            Feature::Roof => SceneNode::new(
                format!("roof_{}", room.name),
                Primitive::Box {
                    width: room.width + 0.4,
                    height: 0.15,
                    depth: room.length + 0.4,
                },
                Vec3::new(c.x, room.height + 0.075, c.z),
            )
            .with_material(ROOF),
            // Shrub off the north-west corner.
            Feature::Plant => SceneNode::new(
                format!("shrub_{}", room.name),
                Primitive::Sphere { radius: 0.35 },
                Vec3::new(room.x - 0.5, 0.35, room.y - 0.5),
            )
            .with_material(FOLIAGE),
            // Daybed outside the east wall.
            Feature::Bed => {
                let (w, l) = bed_size(room);
                SceneNode::new(
                    format!("bed_{}", room.name),
                    Primitive::Box {
                        width: w,
                        height: BED_HEIGHT,
                        depth: l,
                    },
                    Vec3::new(room.x + room.width + 0.1 + w / 2.0, BED_HEIGHT / 2.0, c.z),
                )
                .with_material(BED)
            }
        };
        Some(node)
    }

    /// Walkable interior of one room. The southern wall is left out so
    /// the doorway stays open.
    pub fn build_interior(&self, room: &Room) -> Result<Vec<SceneNode>> {
        if !room.has_door() {
            return Err(EngineError::PrimaryDoorMissing(room.name.clone()));
        }
        let cfg = &self.config;
        let t = cfg.wall_thickness;
        let (w, l, h) = (room.width, room.length, room.height);
        let c = room.center();
        let name = &room.name;

        let mut nodes = vec![
            SceneNode::new(
                format!("floor_{}", name),
                Primitive::Plane {
                    width: w,
                    length: l,
                },
                Vec3::new(c.x, FLOOR_LIFT, c.z),
            )
            .with_material(FLOOR)
            .with_pick(PickTarget::Floor),
            // North
            SceneNode::new(
                format!("wall0_{}", name),
                Primitive::Box {
                    width: w,
                    height: h,
                    depth: t,
                },
                Vec3::new(c.x, h / 2.0, room.y),
            )
            .with_material(WALL),
            // West
            SceneNode::new(
                format!("wall1_{}", name),
                Primitive::Box {
                    width: t,
                    height: h,
                    depth: l,
                },
                Vec3::new(room.x, h / 2.0, c.z),
            )
            .with_material(WALL),
            // East
            SceneNode::new(
                format!("wall2_{}", name),
                Primitive::Box {
                    width: t,
                    height: h,
                    depth: l,
                },
                Vec3::new(room.x + w, h / 2.0, c.z),
            )
            .with_material(WALL),
            SceneNode::new(
                format!("ceiling_{}", name),
                Primitive::Plane {
                    width: w,
                    length: l,
                },
                Vec3::new(c.x, h, c.z),
            )
            .with_rotation(Vec3::new(PI, 0.0, 0.0))
            .with_material(CEILING),
        ];

        // Door leaf swung inward against the west jamb of the opening.
        let door = room.door_point();
        let door_w = self.door_width(room);
        let door_h = self.door_height(room);
        nodes.push(
            SceneNode::new(
                format!("door_{}", name),
                Primitive::Box {
                    width: 0.05,
                    height: door_h,
                    depth: door_w,
                },
                Vec3::new(door.x - door_w / 2.0, door_h / 2.0, door.z - door_w / 2.0),
            )
            .with_material(DOOR)
            .with_pick(PickTarget::Door { room: name.clone() }),
        );

        let lamp_x = room.x + w * 0.85;
        let lamp_z = room.y + l * 0.15;
        let pole_h = (h * 0.6).min(1.5);
        let table_r = w.min(l) * 0.12;
        nodes.extend([
            SceneNode::new(
                format!("bench_{}", name),
                Primitive::Box {
                    width: w * 0.4,
                    height: 0.45,
                    depth: 0.5,
                },
                Vec3::new(room.x + w * 0.3, 0.225, room.y + l * 0.15),
            )
            .with_material(WOOD),
            SceneNode::new(
                format!("table_{}", name),
                Primitive::Cylinder {
                    radius: table_r,
                    height: 0.75,
                },
                Vec3::new(c.x, 0.375, c.z),
            )
            .with_material(WOOD),
            SceneNode::new(
                format!("lamp_pole_{}", name),
                Primitive::Cylinder {
                    radius: 0.04,
                    height: pole_h,
                },
                Vec3::new(lamp_x, pole_h / 2.0, lamp_z),
            )
            .with_material(METAL),
            SceneNode::new(
                format!("lamp_bulb_{}", name),
                Primitive::Sphere { radius: 0.15 },
                Vec3::new(lamp_x, pole_h + 0.15, lamp_z),
            )
            .with_material(BULB),
        ]);

        // Along the east wall, south of the lamp.
        if room.has(&Feature::Bed) {
            let (bed_w, bed_l) = bed_size(room);
            nodes.push(
                SceneNode::new(
                    format!("bed_{}", name),
                    Primitive::Box {
                        width: bed_w,
                        height: BED_HEIGHT,
                        depth: bed_l,
                    },
                    Vec3::new(
                        room.x + w - t / 2.0 - bed_w / 2.0,
                        BED_HEIGHT / 2.0,
                        c.z + l * 0.1,
                    ),
                )
                .with_material(BED),
            );
        }
        Ok(nodes)
    }
}

impl Default for GeometryBuilder {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
