//! Per-tick orchestration of the scene and a fixed-step scheduler.

use crate::camera::Camera;
use crate::input::InputEvent;
use crate::picking::{resolve_selection, Viewport};
use crate::scene::{Scene, SNOW_EXTENT};
use crate::state::{InteractionState, MotionMode};
use crate::{carousel, explosion};
use glam::Vec3;
use rand::rngs::StdRng;
use std::time::Duration;

pub const STAR_SPIN: f32 = 0.05;
pub const TREE_SPIN: f32 = 0.003;
/// Tree spin while the ornaments are blown away
pub const TREE_SPIN_EXPLODED: f32 = 0.0005;
pub const CAROUSEL_SPIN: f32 = 0.0015;
pub const SNOW_FALL: f32 = 0.12;
/// Most ticks run in one frame before the backlog is dropped
pub const MAX_CATCH_UP: u32 = 5;

/// Side effects requested by input handling, carried out by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    PlaySound,
    ToggleDebug,
    Quit,
}

/// Everything the frame driver and the input handlers operate on
pub struct World {
    pub scene: Scene,
    pub state: InteractionState,
    pub camera: Camera,
    pub paused: bool,
    viewport: Viewport,
    rng: StdRng,
}

impl World {
    pub fn new(scene: Scene, viewport: Viewport, rng: StdRng) -> Self {
        let mut camera = Camera::new(1.0);
        camera.set_viewport(viewport.width, viewport.height);
        World {
            scene,
            state: InteractionState::new(),
            camera,
            paused: false,
            viewport,
            rng,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.state.motion_mode(self.scene.all_frozen())
    }

    /// Advances the whole scene by one tick. `now` is the time since startup.
    pub fn tick(&mut self, now: Duration) {
        let scene = &mut self.scene;
        scene.star_rotation += STAR_SPIN;

        explosion::advance(
            &mut self.state,
            &mut scene.ornaments,
            now.as_secs_f64() * 1000.0,
        );
        carousel::advance(
            &mut self.state,
            &mut scene.photos,
            scene.carousel_rotation,
            self.camera.position(),
        );
        advance_snow(&mut scene.snow);

        scene.tree_rotation += if self.state.exploded {
            TREE_SPIN_EXPLODED
        } else {
            TREE_SPIN
        };
        scene.carousel_rotation += CAROUSEL_SPIN;
        self.camera.update();
    }

    /// Applies one input event between ticks
    pub fn handle(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::PointerDown(pixel) => {
                let picked = resolve_selection(
                    pixel,
                    self.viewport,
                    &self.camera,
                    &self.scene.photos,
                    self.scene.carousel_rotation,
                    self.state.photos_visible(),
                );
                if self.state.photos_visible() && picked != self.state.selected_photo() {
                    log::debug!("selection: {:?}", picked);
                }
                self.state.select_photo(picked);
            }
            InputEvent::DoubleClick => {
                explosion::explode(
                    &mut self.state,
                    &mut self.scene.ornaments,
                    &mut self.scene.photos,
                    &mut self.rng,
                );
            }
            InputEvent::Reset => {
                explosion::reset(&mut self.state);
            }
            InputEvent::Drag(delta) => self.camera.orbit(delta, self.viewport.height),
            InputEvent::Zoom(steps) => self.camera.zoom(steps),
            InputEvent::Resize(viewport) => {
                log::debug!("resize: {}x{}", viewport.width, viewport.height);
                self.viewport = viewport;
                self.camera.set_viewport(viewport.width, viewport.height);
            }
            InputEvent::TogglePause => self.paused = !self.paused,
            InputEvent::PlaySound => return Some(Command::PlaySound),
            InputEvent::ToggleDebug => return Some(Command::ToggleDebug),
            InputEvent::Quit => return Some(Command::Quit),
        }
        None
    }
}

/// Lets every particle fall and wraps those below the floor back to the top
pub fn advance_snow(snow: &mut [Vec3]) {
    for particle in snow.iter_mut() {
        particle.y -= SNOW_FALL;
        if particle.y < -SNOW_EXTENT {
            particle.y = SNOW_EXTENT;
        }
    }
}

/// Converts elapsed wall time into a whole number of fixed ticks
#[derive(Clone, Debug)]
pub struct FixedStep {
    step: Duration,
    accumulator: Duration,
}

impl FixedStep {
    pub fn new(rate_hz: u32) -> Self {
        FixedStep {
            step: Duration::from_secs(1) / rate_hz.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Adds `elapsed` and returns how many ticks are due
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < MAX_CATCH_UP {
            self.accumulator -= self.step;
            ticks += 1;
        }
        if self.accumulator >= self.step {
            log::debug!("dropping {:?} of tick backlog", self.accumulator);
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Time left until the next tick is due
    pub fn until_next(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}
