//! Pointer → photo selection by casting a camera ray against the photo quads.

use crate::camera::{Camera, Ray, NEAR};
use crate::scene::{PhotoPlane, PHOTO_SIZE};
use glam::{Vec2, Vec3};

/// Size of the presentation surface in device pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Viewport { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Device pixel coordinates to normalized device coordinates (y up)
    pub fn to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            pixel.x / self.width as f32 * 2.0 - 1.0,
            -(pixel.y / self.height as f32) * 2.0 + 1.0,
        )
    }

    /// Normalized device coordinates back to device pixels
    pub fn to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width as f32,
            (1.0 - ndc.y) * 0.5 * self.height as f32,
        )
    }
}

/// Returns the index of the nearest photo under `pointer`.
///
/// Yields `None` when picking is disabled, the viewport has no area, there are no photos,
/// or the ray misses every photo. Equidistant hits resolve to the lower index.
pub fn resolve_selection(
    pointer: Vec2,
    viewport: Viewport,
    camera: &Camera,
    photos: &[PhotoPlane],
    carousel_rotation: f32,
    enabled: bool,
) -> Option<usize> {
    if !enabled || viewport.is_empty() || photos.is_empty() {
        return None;
    }

    let ray = camera.ray(viewport.to_ndc(pointer));
    let mut hits: Vec<(f32, usize)> = photos
        .iter()
        .enumerate()
        .filter_map(|(index, photo)| {
            intersect_photo(&ray, photo, carousel_rotation).map(|distance| (distance, index))
        })
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.first().map(|&(_, index)| index)
}

/// Distance along `ray` to a double-sided photo quad, if it is hit
pub fn intersect_photo(ray: &Ray, photo: &PhotoPlane, carousel_rotation: f32) -> Option<f32> {
    let normal = photo.normal();
    let denom = ray.direction.dot(normal);
    if denom.abs() < 1e-6 {
        return None;
    }

    let center = photo.world_position(carousel_rotation);
    let distance = (center - ray.origin).dot(normal) / denom;
    if distance < NEAR {
        return None;
    }

    let local = ray.origin + ray.direction * distance - center;
    let half = photo.scale * (PHOTO_SIZE * 0.5);
    let x = local.dot(photo.orientation * Vec3::X);
    let y = local.dot(photo.orientation * Vec3::Y);
    (x.abs() <= half.x && y.abs() <= half.y).then_some(distance)
}
