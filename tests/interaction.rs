use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tree3d::carousel::{phase_of, PhotoPhase, REVEAL_FRAMES};
use tree3d::driver::{Command, World};
use tree3d::explosion::{revive_ticks_bound, FREEZE_AFTER_FRAMES, REVIVE_EPSILON};
use tree3d::input::InputEvent;
use tree3d::picking::Viewport;
use tree3d::scene::{Scene, SNOW_EXTENT};
use tree3d::state::MotionMode;

const TICK: Duration = Duration::from_millis(16);

struct Harness {
    world: World,
    ticks: u32,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let scene = Scene::build(&mut rng, Vec::new(), 300);
        Harness {
            world: World::new(scene, Viewport::new(160, 96), rng),
            ticks: 0,
        }
    }

    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.ticks += 1;
            self.world.tick(TICK * self.ticks);
        }
    }

    fn explode(&mut self) {
        assert_eq!(self.world.handle(InputEvent::DoubleClick), None);
    }

    /// Screen position of the photo closest to the camera
    fn front_photo(&self) -> (usize, Vec2) {
        let world = &self.world;
        let rotation = world.scene.carousel_rotation;
        let eye = world.camera.position();
        let (index, photo) = world
            .scene
            .photos
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                let da = a.world_position(rotation).distance_squared(eye);
                let db = b.world_position(rotation).distance_squared(eye);
                da.total_cmp(&db)
            })
            .expect("photos");
        let ndc = world
            .camera
            .view_projection()
            .project_point3(photo.world_position(rotation));
        (index, world.viewport().to_pixel(ndc.truncate()))
    }
}

#[test]
fn explosion_launches_ornaments_outward() {
    let mut harness = Harness::new(1);
    harness.explode();
    assert_eq!(harness.world.motion_mode(), MotionMode::Exploding);
    assert!(harness.world.state.photos_visible());

    for ornament in &harness.world.scene.ornaments {
        let radial = Vec3::new(ornament.position.x, 0.0, ornament.position.z);
        assert!(ornament.velocity.dot(radial) >= 0.0);
        assert!(ornament.velocity.length() > 0.0);
    }
    for photo in &harness.world.scene.photos {
        assert_eq!(photo.opacity, 1.0);
    }
}

#[test]
fn frozen_ornaments_stay_put() {
    let mut harness = Harness::new(2);
    harness.explode();
    harness.run(FREEZE_AFTER_FRAMES);
    assert_eq!(harness.world.motion_mode(), MotionMode::Exploding);

    harness.run(1);
    assert_eq!(harness.world.motion_mode(), MotionMode::Frozen);
    let positions: Vec<Vec3> = harness
        .world
        .scene
        .ornaments
        .iter()
        .map(|o| o.position)
        .collect();

    harness.run(25);
    let later: Vec<Vec3> = harness
        .world
        .scene
        .ornaments
        .iter()
        .map(|o| o.position)
        .collect();
    assert_eq!(positions, later);

    // A second double-click while exploded changes nothing
    harness.explode();
    assert_eq!(harness.world.motion_mode(), MotionMode::Frozen);
}

#[test]
fn reset_brings_every_ornament_home() {
    let mut harness = Harness::new(3);
    harness.explode();
    harness.run(FREEZE_AFTER_FRAMES + 5);

    let farthest = harness
        .world
        .scene
        .ornaments
        .iter()
        .map(|o| o.distance_to_origin())
        .fold(0.0, f32::max);
    assert!(farthest > 10.0);

    assert_eq!(harness.world.handle(InputEvent::Reset), None);
    assert_eq!(harness.world.motion_mode(), MotionMode::Reviving);
    assert!(!harness.world.state.photos_visible());
    assert_eq!(harness.world.state.selected_photo(), None);

    harness.run(revive_ticks_bound(farthest) + 2);
    assert_eq!(harness.world.motion_mode(), MotionMode::Idle);
    for ornament in &harness.world.scene.ornaments {
        assert!(ornament.distance_to_origin() < REVIVE_EPSILON);
    }

    // The tree can be exploded again after a full round trip
    harness.explode();
    assert_eq!(harness.world.motion_mode(), MotionMode::Exploding);
    assert_eq!(harness.world.state.explode_frames, 0);
}

#[test]
fn reset_before_explosion_is_ignored() {
    let mut harness = Harness::new(4);
    harness.world.handle(InputEvent::Reset);
    assert_eq!(harness.world.motion_mode(), MotionMode::Idle);
}

#[test]
fn clicking_a_photo_focuses_it() {
    let mut harness = Harness::new(5);
    harness.explode();
    harness.run(REVEAL_FRAMES + 10);

    let (front, pixel) = harness.front_photo();
    harness.world.handle(InputEvent::PointerDown(pixel));
    assert_eq!(harness.world.state.selected_photo(), Some(front));
    assert_eq!(phase_of(&harness.world.state, front), PhotoPhase::Focused);

    harness.run(30);
    let focused = &harness.world.scene.photos[front];
    assert_eq!(focused.opacity, 1.0);
    for (index, photo) in harness.world.scene.photos.iter().enumerate() {
        if index != front {
            assert!(photo.opacity < 0.5);
        }
    }

    // Clicking empty sky clears the selection
    harness.world.handle(InputEvent::PointerDown(Vec2::new(1.0, 1.0)));
    assert_eq!(harness.world.state.selected_photo(), None);
}

#[test]
fn selection_waits_for_the_reveal() {
    let mut harness = Harness::new(6);
    harness.explode();
    harness.run(10);

    let (front, pixel) = harness.front_photo();
    harness.world.handle(InputEvent::PointerDown(pixel));
    assert_eq!(harness.world.state.selected_photo(), Some(front));
    assert_eq!(phase_of(&harness.world.state, front), PhotoPhase::Reveal);

    harness.run(REVEAL_FRAMES - 10);
    assert_eq!(phase_of(&harness.world.state, front), PhotoPhase::Focused);
}

#[test]
fn photos_cannot_be_picked_before_the_explosion() {
    let mut harness = Harness::new(7);
    harness.run(5);
    let (_, pixel) = harness.front_photo();
    harness.world.handle(InputEvent::PointerDown(pixel));
    assert_eq!(harness.world.state.selected_photo(), None);
}

#[test]
fn snow_keeps_falling_inside_the_volume() {
    let mut harness = Harness::new(8);
    harness.run(1000);
    for flake in &harness.world.scene.snow {
        assert!(flake.y >= -SNOW_EXTENT && flake.y <= SNOW_EXTENT);
    }
}

#[test]
fn pause_and_commands_pass_through() {
    let mut harness = Harness::new(9);
    assert_eq!(harness.world.handle(InputEvent::TogglePause), None);
    assert!(harness.world.paused);
    assert_eq!(
        harness.world.handle(InputEvent::PlaySound),
        Some(Command::PlaySound)
    );
    assert_eq!(harness.world.handle(InputEvent::Quit), Some(Command::Quit));
}
