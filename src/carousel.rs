//! Photo ring placement: reveal intro, orbiting, and the focused photo.
//!
//! Every change is an exponential approach toward a per-tick target, which gives the
//! photos their floating motion.

use crate::scene::PhotoPlane;
use crate::state::InteractionState;
use glam::Vec3;

pub const RING_RADIUS: f32 = 9.0;
pub const RING_HEIGHT: f32 = 6.0;
/// Ticks the reveal intro lasts; selection is ignored until then
pub const REVEAL_FRAMES: u32 = 40;
pub const REVEAL_BLEND: f32 = 0.1;
pub const REVEAL_SCALE: f32 = 1.2;
pub const FOCUS_POSITION: Vec3 = Vec3::new(0.0, 7.0, 8.0);
pub const FOCUS_SCALE: f32 = 2.8;
pub const FOCUS_BLEND: f32 = 0.12;
pub const ORBIT_BLEND: f32 = 0.08;
/// Per-tick advance of each photo's own angle and of the shared offset
pub const ORBIT_SPEED: f32 = 0.002;
pub const ORBIT_OPACITY: f32 = 0.75;
pub const DIMMED_OPACITY: f32 = 0.2;

/// Which behaviour a photo follows on the current tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoPhase {
    Reveal,
    Focused,
    Orbiting,
}

/// Point on the ring at `angle`
pub fn ring_slot(angle: f32) -> Vec3 {
    Vec3::new(angle.cos() * RING_RADIUS, RING_HEIGHT, angle.sin() * RING_RADIUS)
}

/// Advances the carousel by one tick. Does nothing while the photos are hidden.
pub fn advance(
    state: &mut InteractionState,
    photos: &mut [PhotoPlane],
    carousel_rotation: f32,
    eye: Vec3,
) {
    if !state.photos_visible() {
        return;
    }

    state.orbit_angle_offset += ORBIT_SPEED;
    state.photo_reveal_frames += 1;

    let selected = state.selected_photo();
    for (index, photo) in photos.iter_mut().enumerate() {
        match phase_of(state, index) {
            PhotoPhase::Reveal => {
                approach(photo, ring_slot(photo.angle), REVEAL_SCALE, REVEAL_BLEND);
                photo.opacity = 1.0;
            }
            PhotoPhase::Focused => {
                approach(photo, FOCUS_POSITION, FOCUS_SCALE, FOCUS_BLEND);
                photo.opacity = 1.0;
            }
            PhotoPhase::Orbiting => {
                photo.angle += ORBIT_SPEED;
                let target = ring_slot(photo.angle + state.orbit_angle_offset);
                approach(photo, target, 1.0, ORBIT_BLEND);
                photo.opacity = if selected.is_some() {
                    DIMMED_OPACITY
                } else {
                    ORBIT_OPACITY
                };
            }
        }
        photo.face(carousel_rotation, eye);
    }
}

/// Behaviour of photo `index` for the current reveal counter and selection
pub fn phase_of(state: &InteractionState, index: usize) -> PhotoPhase {
    if state.photo_reveal_frames < REVEAL_FRAMES {
        PhotoPhase::Reveal
    } else if state.selected_photo() == Some(index) {
        PhotoPhase::Focused
    } else {
        PhotoPhase::Orbiting
    }
}

fn approach(photo: &mut PhotoPlane, position: Vec3, scale: f32, blend: f32) {
    photo.position = photo.position.lerp(position, blend);
    photo.scale = photo.scale.lerp(Vec3::splat(scale), blend);
}
