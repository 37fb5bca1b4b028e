//! Ornament motion: `Idle → Exploding → Frozen → Reviving → Idle`.

use crate::carousel::REVEAL_SCALE;
use crate::scene::{Ornament, PhotoPlane};
use crate::state::InteractionState;
use glam::Vec3;
use rand::Rng;

/// Ticks of ballistic drift before the ornaments freeze
pub const FREEZE_AFTER_FRAMES: u32 = 35;
/// Range of the outward speed, units per tick
pub const MIN_SPEED: f32 = 3.0;
pub const MAX_SPEED: f32 = 6.0;
/// Exponential blend toward the rest position per revive tick
pub const REVIVE_BLEND: f32 = 0.08;
/// Revive ends once every ornament is this close to its rest position
pub const REVIVE_EPSILON: f32 = 0.05;

/// Blows the ornaments off the tree and reveals the photos.
///
/// Returns `false` without touching anything if the tree is already exploded. An explosion
/// during a revive cancels the revive.
pub fn explode<R: Rng>(
    state: &mut InteractionState,
    ornaments: &mut [Ornament],
    photos: &mut [PhotoPlane],
    rng: &mut R,
) -> bool {
    if state.exploded {
        return false;
    }

    state.exploded = true;
    state.reviving = false;
    state.explode_frames = 0;
    state.show_photos();
    state.select_photo(None);

    for photo in photos.iter_mut() {
        photo.opacity = 1.0;
        photo.scale = Vec3::splat(REVEAL_SCALE);
    }

    for ornament in ornaments.iter_mut() {
        let direction = ornament.position.try_normalize().unwrap_or(Vec3::Y);
        ornament.velocity = direction * rng.gen_range(MIN_SPEED..MAX_SPEED);
        ornament.frozen = false;
    }

    log::info!("explode: {} ornaments launched", ornaments.len());
    true
}

/// Starts the revive. Only actionable while exploded; returns whether it fired.
pub fn reset(state: &mut InteractionState) -> bool {
    if !state.exploded {
        log::debug!("reset ignored: tree is not exploded");
        return false;
    }

    state.reviving = true;
    state.exploded = false;
    state.hide_photos();

    log::info!("reset: reviving ornaments");
    true
}

/// Advances every ornament by one tick, including the emissive pulse
pub fn advance(state: &mut InteractionState, ornaments: &mut [Ornament], time_ms: f64) {
    for ornament in ornaments.iter_mut() {
        ornament.emissive_intensity = emissive_intensity(time_ms, ornament.color_phase);

        if state.exploded && !ornament.frozen {
            ornament.position += ornament.velocity;
        }
        if state.reviving {
            ornament.position = ornament.position.lerp(ornament.origin(), REVIVE_BLEND);
        }
    }

    if state.exploded {
        state.explode_frames += 1;
        if state.explode_frames > FREEZE_AFTER_FRAMES && !ornaments.iter().all(|o| o.frozen) {
            for ornament in ornaments.iter_mut() {
                ornament.frozen = true;
            }
            log::info!("explode: frozen after {} ticks", state.explode_frames);
        }
    }

    if state.reviving
        && ornaments
            .iter()
            .all(|o| o.distance_to_origin() < REVIVE_EPSILON)
    {
        state.reviving = false;
        log::info!("revive: complete");
    }
}

/// Emissive intensity of an ornament at wall-clock `time_ms`
pub fn emissive_intensity(time_ms: f64, phase: f32) -> f32 {
    1.5 + ((time_ms * 0.006) as f32 + phase).sin() * 1.2
}

/// Upper bound on the revive ticks needed from an initial distance `d0`
pub fn revive_ticks_bound(d0: f32) -> u32 {
    if d0 < REVIVE_EPSILON {
        return 0;
    }
    ((REVIVE_EPSILON / d0).ln() / (1.0 - REVIVE_BLEND).ln()).ceil() as u32 + 1
}
