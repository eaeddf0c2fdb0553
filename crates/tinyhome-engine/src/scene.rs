//! Scene graph: the render-time container of primitive nodes.
//!
//! Nodes are plain descriptors. Hosts mirror them into renderer entities
//! and use [`SceneGraph::revision`] to know when to re-sync.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::math::{Aabb, Ray, Vec3};

/// Primitive shape with its dimensions. Lights carry no geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    /// Flat rectangle in the XZ plane, facing +Y before rotation.
    Plane { width: f32, length: f32 },
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
    GroundPlane { size: f32 },
    AmbientLight { brightness: f32 },
    DirectionalLight { illuminance: f32 },
}

impl Primitive {
    /// Axis-aligned extents, or `None` for lights.
    pub fn extents(&self) -> Option<Vec3> {
        match *self {
            Primitive::Box {
                width,
                height,
                depth,
            } => Some(Vec3::new(width, height, depth)),
            Primitive::Plane { width, length } => Some(Vec3::new(width, 0.0, length)),
            Primitive::Cylinder { radius, height } => {
                Some(Vec3::new(radius * 2.0, height, radius * 2.0))
            }
            Primitive::Sphere { radius } => Some(Vec3::new(radius * 2.0, radius * 2.0, radius * 2.0)),
            Primitive::GroundPlane { size } => Some(Vec3::new(size, 0.0, size)),
            Primitive::AmbientLight { .. } | Primitive::DirectionalLight { .. } => None,
        }
    }

    pub fn is_light(&self) -> bool {
        self.extents().is_none()
    }
}

/// Position plus Euler rotation (XYZ order, radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// sRGB base colour, 0..1 per channel.
    pub color: [f32; 3],
    pub emissive: bool,
}

impl Material {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: [r, g, b],
            emissive: false,
        }
    }

    pub const fn glowing(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: [r, g, b],
            emissive: true,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::rgb(0.8, 0.8, 0.8)
    }
}

/// What clicking a node means, attached when the node is built.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PickTarget {
    #[default]
    None,
    Door {
        room: String,
    },
    Floor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    pub primitive: Primitive,
    pub transform: Transform,
    pub material: Material,
    pub permanent: bool,
    pub pick: PickTarget,
}

impl SceneNode {
    pub fn new(id: impl Into<String>, primitive: Primitive, translation: Vec3) -> Self {
        Self {
            id: id.into(),
            primitive,
            transform: Transform {
                translation,
                rotation: Vec3::ZERO,
            },
            material: Material::default(),
            permanent: false,
            pick: PickTarget::None,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_pick(mut self, pick: PickTarget) -> Self {
        self.pick = pick;
        self
    }

    pub fn permanent(mut self) -> Self {
        self.permanent = true;
        self
    }

    /// World bounds. Builders only rotate by half turns, so the
    /// unrotated extents are exact.
    pub fn bounds(&self) -> Option<Aabb> {
        self.primitive
            .extents()
            .map(|ext| Aabb::from_center_extents(self.transform.translation, ext))
    }
}

/// Nearest node under a pick ray.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    pub node_id: String,
    pub point: Vec3,
    pub distance: f32,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    revision: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a node that survives [`clear`](Self::clear).
    pub fn insert_permanent(&mut self, node: SceneNode) -> Result<()> {
        self.add_all(vec![node.permanent()])
    }

    /// Remove every non-permanent node.
    pub fn clear(&mut self) {
        self.nodes.retain(|n| n.permanent);
        self.revision += 1;
    }

    /// Insert a node set. All-or-nothing: a colliding id rejects the set.
    pub fn add_all(&mut self, incoming: Vec<SceneNode>) -> Result<()> {
        self.check_incoming(&incoming, true)?;
        self.nodes.extend(incoming);
        self.revision += 1;
        Ok(())
    }

    /// Clear and add in one step. Validation happens before the clear, so
    /// a failing rebuild leaves the graph untouched.
    pub fn rebuild(&mut self, incoming: Vec<SceneNode>) -> Result<()> {
        self.check_incoming(&incoming, false)?;
        self.nodes.retain(|n| n.permanent);
        self.nodes.extend(incoming);
        self.revision += 1;
        Ok(())
    }

    fn check_incoming(&self, incoming: &[SceneNode], include_transient: bool) -> Result<()> {
        let mut ids: HashSet<&str> = self
            .nodes
            .iter()
            .filter(|n| include_transient || n.permanent)
            .map(|n| n.id.as_str())
            .collect();
        for node in incoming {
            if !ids.insert(node.id.as_str()) {
                return Err(EngineError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes_by_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a SceneNode> {
        self.nodes.iter().filter(move |n| n.id.starts_with(prefix))
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn transient_nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(|n| !n.permanent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bumped on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Nearest geometry hit along `ray`. Untagged nodes still occlude.
    pub fn pick(&self, ray: &Ray) -> Option<PickHit> {
        let mut best: Option<PickHit> = None;
        for node in &self.nodes {
            let Some(bounds) = node.bounds() else {
                continue;
            };
            let Some(t) = bounds.intersect(ray) else {
                continue;
            };
            if best.as_ref().map_or(true, |b| t < b.distance) {
                best = Some(PickHit {
                    node_id: node.id.clone(),
                    point: ray.at(t),
                    distance: t,
                });
            }
        }
        best
    }
}
