//! Layout model: the validated, immutable form of a generated floor plan.
//!
//! The document arrives as JSON shaped like
//! `{ "explanation": "...", "rooms": [ { "name", "x", "y", "width",
//! "length", "height", "features": [..] } ] }`. Validation runs once in
//! [`LayoutModel::from_json`] / [`LayoutModel::new`]; afterwards the model
//! never changes.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::math::{Aabb, Vec3};

/// A room feature tag. Unknown tags are preserved but draw nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Feature {
    Door,
    Window,
    Roof,
    Plant,
    Bed,
    Other(String),
}

impl From<String> for Feature {
    fn from(tag: String) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "door" => Feature::Door,
            "window" => Feature::Window,
            "roof" => Feature::Roof,
            "plant" => Feature::Plant,
            "bed" => Feature::Bed,
            _ => Feature::Other(tag),
        }
    }
}

impl From<&str> for Feature {
    fn from(tag: &str) -> Self {
        Feature::from(tag.to_string())
    }
}

impl From<Feature> for String {
    fn from(f: Feature) -> Self {
        match f {
            Feature::Door => "door".into(),
            Feature::Window => "window".into(),
            Feature::Roof => "roof".into(),
            Feature::Plant => "plant".into(),
            Feature::Bed => "bed".into(),
            Feature::Other(tag) => tag,
        }
    }
}

/// One room footprint. `(x, y)` is the footprint origin on the ground
/// plane; the room covers `[x, x+width] × [y, y+length]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub length: f32,
    pub height: f32,
    #[serde(default)]
    pub features: BTreeSet<Feature>,
}

impl Room {
    pub fn new(name: &str, x: f32, y: f32, width: f32, length: f32, height: f32) -> Self {
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            length,
            height,
            features: BTreeSet::new(),
        }
    }

    pub fn with_features<I, F>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<Feature>,
    {
        self.features.extend(features.into_iter().map(Into::into));
        self
    }

    pub fn has(&self, feature: &Feature) -> bool {
        self.features.contains(feature)
    }

    pub fn has_door(&self) -> bool {
        self.has(&Feature::Door)
    }

    /// World-space centre of the room volume.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.x + self.width / 2.0,
            self.height / 2.0,
            self.y + self.length / 2.0,
        )
    }

    /// Ground-level midpoint of the southern (door) edge, at `y + length`.
    pub fn door_point(&self) -> Vec3 {
        Vec3::new(self.x + self.width / 2.0, 0.0, self.y + self.length)
    }
}

/// Check each room's dimensions are finite and positive.
pub fn check_room_dimensions(rooms: &[Room]) -> Vec<String> {
    let mut problems = Vec::new();
    for r in rooms {
        if !(r.x.is_finite() && r.y.is_finite()) {
            problems.push(format!("room '{}' has a non-finite origin", r.name));
        }
        let dims = [r.width, r.length, r.height];
        if dims.iter().any(|d| !d.is_finite() || *d <= 0.0) {
            problems.push(format!(
                "room '{}' has non-positive dimensions: {}×{}×{}",
                r.name, r.width, r.length, r.height
            ));
        }
    }
    problems
}

/// Check room names are present and unique; they seed node ids.
pub fn check_room_names(rooms: &[Room]) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, r) in rooms.iter().enumerate() {
        if r.name.trim().is_empty() {
            problems.push(format!("room #{} has an empty name", i));
        } else if !seen.insert(r.name.as_str()) {
            problems.push(format!("room name '{}' is used more than once", r.name));
        }
    }
    problems
}

/// Validated layout document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutModel {
    explanation: String,
    rooms: Vec<Room>,
}

impl LayoutModel {
    pub fn new(explanation: impl Into<String>, rooms: Vec<Room>) -> Result<Self> {
        let mut problems = check_room_names(&rooms);
        problems.extend(check_room_dimensions(&rooms));
        if !problems.is_empty() {
            return Err(EngineError::MalformedLayout(problems.join("; ")));
        }
        Ok(Self {
            explanation: explanation.into(),
            rooms,
        })
    }

    /// Parse and validate a layout response body.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut doc) = value else {
            return Err(EngineError::MalformedLayout(
                "response is not a JSON object".into(),
            ));
        };
        let rooms = match doc.remove("rooms") {
            Some(rooms @ serde_json::Value::Array(_)) => rooms,
            Some(_) => {
                return Err(EngineError::MalformedLayout(
                    "`rooms` is not an array".into(),
                ))
            }
            None => {
                return Err(EngineError::MalformedLayout(
                    "response has no `rooms` array".into(),
                ))
            }
        };
        let rooms: Vec<Room> = serde_json::from_value(rooms)?;
        let explanation = doc
            .get("explanation")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();
        Self::new(explanation, rooms)
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// World-space box enclosing every room volume.
    pub fn bounds(&self) -> Option<Aabb> {
        let first = self.rooms.first()?;
        let mut min = Vec3::new(first.x, 0.0, first.y);
        let mut max = Vec3::new(first.x + first.width, first.height, first.y + first.length);
        for r in &self.rooms[1..] {
            min.x = min.x.min(r.x);
            min.z = min.z.min(r.y);
            max.x = max.x.max(r.x + r.width);
            max.y = max.y.max(r.height);
            max.z = max.z.max(r.y + r.length);
        }
        Some(Aabb { min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BED1: &str = r#"{
        "explanation": "One bedroom.",
        "rooms": [
            {"name":"bed1","x":0,"y":0,"width":4,"length":3,"height":2.5,"features":["door"]}
        ]
    }"#;

    #[test]
    fn parses_a_valid_layout() {
        let layout = LayoutModel::from_json(BED1).unwrap();
        assert_eq!(layout.explanation(), "One bedroom.");
        assert_eq!(layout.rooms().len(), 1);
        let room = layout.room("bed1").unwrap();
        assert!(room.has_door());
        assert_eq!(room.center(), Vec3::new(2.0, 1.25, 1.5));
        assert_eq!(room.door_point(), Vec3::new(2.0, 0.0, 3.0));
    }

    #[test]
    fn empty_object_is_malformed() {
        let err = LayoutModel::from_json("{}").unwrap_err();
        assert!(matches!(err, EngineError::MalformedLayout(_)));
    }

    #[test]
    fn rooms_must_be_an_array() {
        let err = LayoutModel::from_json(r#"{"rooms": {"a": 1}}"#).unwrap_err();
        assert_eq!(
            err,
            EngineError::MalformedLayout("`rooms` is not an array".into())
        );
    }

    #[test]
    fn non_object_is_malformed() {
        assert!(LayoutModel::from_json("[1, 2]").is_err());
        assert!(LayoutModel::from_json("not json").is_err());
    }

    #[test]
    fn missing_explanation_is_empty() {
        let layout = LayoutModel::from_json(r#"{"rooms": []}"#).unwrap();
        assert_eq!(layout.explanation(), "");
        assert!(layout.is_empty());
        assert!(layout.bounds().is_none());
    }

    #[test]
    fn duplicate_names_rejected() {
        let rooms = vec![
            Room::new("kitchen", 0.0, 0.0, 3.0, 3.0, 2.5),
            Room::new("kitchen", 3.0, 0.0, 3.0, 3.0, 2.5),
        ];
        let err = LayoutModel::new("", rooms).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn zero_width_rejected() {
        let rooms = vec![Room::new("bath", 0.0, 0.0, 0.0, 2.0, 2.5)];
        let err = LayoutModel::new("", rooms).unwrap_err();
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn features_are_a_set_and_case_insensitive() {
        let body = r#"{"rooms":[{"name":"a","x":0,"y":0,"width":1,"length":1,"height":1,
            "features":["Door","door","skylight"]}]}"#;
        let layout = LayoutModel::from_json(body).unwrap();
        let room = &layout.rooms()[0];
        assert_eq!(room.features.len(), 2);
        assert!(room.has_door());
        assert!(room.has(&Feature::Other("skylight".into())));
    }

    #[test]
    fn bounds_cover_all_rooms() {
        let rooms = vec![
            Room::new("a", 0.0, 0.0, 4.0, 3.0, 2.5),
            Room::new("b", 4.0, -1.0, 2.0, 2.0, 3.0),
        ];
        let layout = LayoutModel::new("", rooms).unwrap();
        let b = layout.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(6.0, 3.0, 3.0));
    }
}
