//! Integration tests for the full layout → scene → navigation pipeline.
//!
//! Exercises: layout JSON → exterior build → door pick → interior build
//! → floor walk → exit, plus fetch staleness and malformed responses.
//!
//! All tests are pure logic with no renderer.

use tinyhome_engine::camera::CameraRig;
use tinyhome_engine::config::EngineConfig;
use tinyhome_engine::math::{Ray, Vec3};
use tinyhome_engine::pick::{NavEvent, PointerButton, PointerEvent, PointerKind};
use tinyhome_engine::scene::SceneNode;
use tinyhome_engine::{EngineError, LayoutModel, NavMode, NavigationController, Transition};

// ── Helpers ────────────────────────────────────────────────────────────

const BED1: &str = r#"{"rooms":[{"name":"bed1","x":0,"y":0,"width":4,"length":3,"height":2.5,"features":["door"]}]}"#;

const COTTAGE: &str = r#"{
    "explanation": "Compact two-room cottage.",
    "rooms": [
        {"name":"living","x":0,"y":0,"width":5,"length":4,"height":2.7,"features":["door","window","roof"]},
        {"name":"bath","x":5,"y":0,"width":2,"length":2,"height":2.4,"features":["window"]},
        {"name":"loft","x":8,"y":0,"width":4,"length":4,"height":2.2,"features":["door","bed","plant"]}
    ]
}"#;

fn controller() -> NavigationController {
    NavigationController::new(EngineConfig::default()).unwrap()
}

fn loaded(body: &str) -> NavigationController {
    let mut nav = controller();
    let ticket = nav.begin_fetch();
    nav.complete_fetch(ticket, body).unwrap();
    nav
}

fn transient(nav: &NavigationController) -> Vec<SceneNode> {
    let mut nodes: Vec<SceneNode> = nav.scene().transient_nodes().cloned().collect();
    nodes.sort_by(|a, b| a.id.cmp(&b.id));
    nodes
}

/// Cast a ray from the camera eye through `target` and release on it.
fn click_at(nav: &mut NavigationController, id: &str, target: Vec3) -> Transition {
    let eye = nav.camera().eye();
    let hit = nav
        .scene()
        .pick(&Ray::new(eye, target - eye))
        .expect("ray should hit something");
    assert_eq!(hit.node_id, id, "ray from camera was occluded");
    nav.pointer(&PointerEvent::primary_release(Some(hit))).unwrap()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn bed1_round_trip() {
    let mut nav = loaded(BED1);
    let exterior = transient(&nav);

    let room = nav.scene().find_by_id("room_bed1").unwrap();
    assert_eq!(room.transform.translation, Vec3::new(2.0, 1.25, 1.5));
    for id in ["door_bed1", "path_bed1"] {
        assert!(nav.scene().find_by_id(id).is_some(), "missing {}", id);
    }
    assert_eq!(nav.scene().nodes_by_prefix("plant_pot").count(), 4);

    let t = nav.handle(NavEvent::DoorClicked("bed1".into())).unwrap();
    assert_eq!(t, Transition::EnteredInterior("bed1".into()));
    assert_eq!(nav.mode(), &NavMode::Interior("bed1".into()));
    let floor = nav.scene().find_by_id("floor_bed1").unwrap();
    assert_eq!(floor.primitive.extents(), Some(Vec3::new(4.0, 0.0, 3.0)));
    assert!(nav.camera().eye().approx_eq(&Vec3::new(2.0, 1.6, 3.3), 1e-5));
    assert!(nav
        .camera()
        .forward()
        .approx_eq(&Vec3::new(0.0, 0.0, -1.0), 1e-5));
    assert!(nav.scene().find_by_id("room_bed1").is_none());

    let t = nav.handle(NavEvent::ExitRequested).unwrap();
    assert_eq!(t, Transition::EnteredExterior);
    assert_eq!(nav.mode(), &NavMode::Exterior);
    assert_eq!(transient(&nav), exterior);
    assert!(nav.scene().find_by_id("floor_bed1").is_none());
    assert!(nav.camera().is_orbit());
}

#[test]
fn picking_drives_the_whole_walkthrough() {
    let mut nav = loaded(BED1);

    assert_eq!(
        click_at(&mut nav, "door_bed1", Vec3::new(2.0, 1.0, 3.05)),
        Transition::EnteredInterior("bed1".into())
    );

    // East of the door leaf, clear of the table.
    let moved = click_at(&mut nav, "floor_bed1", Vec3::new(3.0, 0.01, 2.5));
    let Transition::Moved(p) = moved else {
        panic!("expected a camera move, got {:?}", moved);
    };
    assert!(p.approx_eq(&Vec3::new(3.0, 1.6, 2.5), 1e-4));
    assert!(matches!(nav.mode(), NavMode::Interior(_)));

    // The open door leaf stands against the west jamb.
    assert_eq!(
        click_at(&mut nav, "door_bed1", Vec3::new(1.5, 1.0, 2.5)),
        Transition::EnteredExterior
    );
}

#[test]
fn floor_click_moves_horizontally_only() {
    let mut nav = loaded(BED1);
    nav.handle(NavEvent::DoorClicked("bed1".into())).unwrap();
    let before = nav.scene().revision();
    let camera = nav.camera().id();

    let t = nav
        .handle(NavEvent::FloorClicked(Vec3::new(1.0, 0.01, 0.5)))
        .unwrap();
    assert_eq!(t, Transition::Moved(Vec3::new(1.0, 1.6, 0.5)));
    assert_eq!(nav.scene().revision(), before);
    assert_eq!(nav.camera().id(), camera);
    assert_eq!(nav.mode(), &NavMode::Interior("bed1".into()));
}

#[test]
fn interior_ignores_door_clicks_for_other_rooms() {
    let mut nav = loaded(COTTAGE);
    nav.handle(NavEvent::DoorClicked("living".into())).unwrap();
    let t = nav.handle(NavEvent::DoorClicked("loft".into())).unwrap();
    assert_eq!(t, Transition::Ignored);
    assert_eq!(nav.mode(), &NavMode::Interior("living".into()));
}

#[test]
fn exactly_one_camera_after_every_transition() {
    let mut nav = loaded(COTTAGE);
    let steps = vec![
        NavEvent::DoorClicked("living".into()),
        NavEvent::FloorClicked(Vec3::new(1.0, 0.0, 1.0)),
        NavEvent::ExitRequested,
        NavEvent::DoorClicked("bath".into()),
        NavEvent::DoorClicked("loft".into()),
        NavEvent::ExitRequested,
        NavEvent::ExitRequested,
    ];
    let mut seen_ids = vec![nav.camera().id()];
    for step in steps {
        let disposed_before = nav.cameras().last_disposed();
        let _ = nav.handle(step);
        let id = nav.camera().id();
        assert_ne!(nav.cameras().last_disposed(), Some(id));
        if seen_ids.last() != Some(&id) {
            // The camera it replaced was detached, and no other.
            assert_eq!(nav.cameras().last_disposed(), seen_ids.last().copied());
            assert!(!seen_ids.contains(&id), "camera id {} reused", id);
            seen_ids.push(id);
        } else {
            assert_eq!(nav.cameras().last_disposed(), disposed_before);
        }
    }
    // living in, out, loft in, out.
    assert_eq!(seen_ids.len(), 5);
}

#[test]
fn new_layout_while_inside_resets_to_exterior() {
    let mut nav = loaded(COTTAGE);
    nav.handle(NavEvent::DoorClicked("living".into())).unwrap();
    let ticket = nav.begin_fetch();
    nav.complete_fetch(ticket, BED1).unwrap();
    assert_eq!(nav.mode(), &NavMode::Exterior);
    assert!(nav.camera().is_orbit());
    assert!(nav.scene().find_by_id("floor_living").is_none());
    assert!(nav.scene().find_by_id("room_living").is_none());
    assert!(nav.scene().find_by_id("room_bed1").is_some());
    assert!(nav.layout().room("living").is_none());
}

#[test]
fn malformed_response_leaves_scene_untouched() {
    let mut nav = loaded(COTTAGE);
    let before = transient(&nav);
    let revision = nav.scene().revision();
    let ticket = nav.begin_fetch();
    let err = nav.complete_fetch(ticket, "{}").unwrap_err();
    assert!(matches!(err, EngineError::MalformedLayout(_)));
    assert!(err.is_user_visible());
    assert_eq!(transient(&nav), before);
    assert_eq!(nav.scene().revision(), revision);
    assert_eq!(nav.explanation(), "Compact two-room cottage.");
}

#[test]
fn earlier_fetch_resolving_late_is_dropped() {
    let mut nav = controller();
    let first = nav.begin_fetch();
    let second = nav.begin_fetch();

    nav.complete_fetch(second, BED1).unwrap();
    let err = nav.complete_fetch(first, COTTAGE).unwrap_err();
    assert_eq!(
        err,
        EngineError::StaleResponse {
            ticket: first.generation(),
            latest: second.generation()
        }
    );
    assert!(nav.scene().find_by_id("room_bed1").is_some());
    assert!(nav.scene().find_by_id("room_living").is_none());
}

#[test]
fn exterior_rebuild_is_idempotent() {
    let mut nav = loaded(COTTAGE);
    let first = transient(&nav);
    nav.layout_ready(nav.layout().clone()).unwrap();
    assert_eq!(transient(&nav), first);
}

#[test]
fn doorless_room_cannot_be_entered() {
    let mut nav = loaded(COTTAGE);
    assert!(nav.scene().find_by_id("door_bath").is_none());
    let err = nav.handle(NavEvent::DoorClicked("bath".into())).unwrap_err();
    assert_eq!(err, EngineError::PrimaryDoorMissing("bath".into()));
    assert_eq!(nav.mode(), &NavMode::Exterior);
}

#[test]
fn non_primary_pointer_events_do_nothing() {
    let mut nav = loaded(BED1);
    let door = nav.scene().find_by_id("door_bed1").unwrap().clone();
    let eye = nav.camera().eye();
    let hit = nav
        .scene()
        .pick(&Ray::new(eye, door.transform.translation - eye));
    let ev = PointerEvent {
        kind: PointerKind::Release,
        button: PointerButton::Secondary,
        hit,
    };
    assert_eq!(nav.pointer(&ev).unwrap(), Transition::Ignored);
    assert_eq!(nav.mode(), &NavMode::Exterior);
}

#[test]
fn config_policy_flows_into_scene() {
    let config = EngineConfig::from_json(r#"{"eye_height": 1.75, "path_length": 4.0}"#).unwrap();
    let mut nav = NavigationController::new(config).unwrap();
    nav.layout_ready(LayoutModel::from_json(BED1).unwrap()).unwrap();
    let path = nav.scene().find_by_id("path_bed1").unwrap();
    assert_eq!(path.primitive.extents().unwrap().z, 4.0);

    nav.handle(NavEvent::DoorClicked("bed1".into())).unwrap();
    let CameraRig::FirstPerson(f) = nav.camera().rig() else {
        panic!("expected first-person camera");
    };
    assert_eq!(f.position.y, 1.75);
}
