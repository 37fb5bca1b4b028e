//! Static scene construction: ornaments on a cone, the star, snow and the photo ring.
//!
//! Everything here is created once at startup. Later phases only mutate transforms and
//! material parameters of these entities.

use crate::assets::TextureHandle;
use crate::math::{hsl_to_rgb, Rgb};
use glam::{Mat3, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;

pub const TREE_HEIGHT: f32 = 14.0;
pub const RING_STEP: f32 = 0.45;
pub const CONE_SLOPE: f32 = 0.6;
pub const ORNAMENT_RADIUS: f32 = 0.23;
/// Tree group origin in world space
pub const TREE_OFFSET: Vec3 = Vec3::new(0.0, -2.0, 0.0);
pub const STAR_HEIGHT: f32 = 15.0;
pub const STAR_RADIUS: f32 = 1.7;
pub const PHOTO_COUNT: usize = 11;
/// Side length of an unscaled photo plane
pub const PHOTO_SIZE: f32 = 3.6;
pub const SNOW_COUNT: usize = 1500;
/// Half side of the cube the snow lives in
pub const SNOW_EXTENT: f32 = 50.0;

/// One decorative sphere on the tree
#[derive(Clone, Debug)]
pub struct Ornament {
    /// Tree-local position
    pub position: Vec3,
    origin: Vec3,
    pub velocity: Vec3,
    pub frozen: bool,
    /// Phase offset of the emissive pulse
    pub color_phase: f32,
    pub color: Rgb,
    pub emissive_intensity: f32,
}

impl Ornament {
    pub fn new(origin: Vec3, color: Rgb, color_phase: f32) -> Self {
        Ornament {
            position: origin,
            origin,
            velocity: Vec3::ZERO,
            frozen: false,
            color_phase,
            color,
            emissive_intensity: 1.5,
        }
    }

    /// Rest position on the tree. Never changes after construction.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn distance_to_origin(&self) -> f32 {
        self.position.distance(self.origin)
    }
}

/// A billboarded photo on the carousel ring
#[derive(Clone, Debug)]
pub struct PhotoPlane {
    /// Orbital position on the ring in radians
    pub angle: f32,
    pub image: TextureHandle,
    /// Carousel-local position
    pub position: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
    /// World-space orientation; the plane normal is the local +Z axis
    pub orientation: Quat,
    /// Flat colour used when the image is missing
    pub tint: Rgb,
}

impl PhotoPlane {
    pub fn new(index: usize, image: TextureHandle) -> Self {
        PhotoPlane {
            angle: index as f32 * (TAU / PHOTO_COUNT as f32),
            image,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
            orientation: Quat::IDENTITY,
            tint: hsl_to_rgb(index as f32 / PHOTO_COUNT as f32, 0.5, 0.45),
        }
    }

    pub fn world_position(&self, carousel_rotation: f32) -> Vec3 {
        Quat::from_rotation_y(carousel_rotation) * self.position
    }

    /// Turns the plane so its front faces `eye`
    pub fn face(&mut self, carousel_rotation: f32, eye: Vec3) {
        let center = self.world_position(carousel_rotation);
        let forward = (eye - center).try_normalize().unwrap_or(Vec3::Z);
        let right = Vec3::Y.cross(forward).try_normalize().unwrap_or(Vec3::X);
        let up = forward.cross(right);
        self.orientation = Quat::from_mat3(&Mat3::from_cols(right, up, forward));
    }

    /// World-space corners: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self, carousel_rotation: f32) -> [Vec3; 4] {
        let center = self.world_position(carousel_rotation);
        let half = self.scale * (PHOTO_SIZE * 0.5);
        let right = self.orientation * Vec3::X * half.x;
        let up = self.orientation * Vec3::Y * half.y;
        [
            center - right + up,
            center + right + up,
            center + right - up,
            center - right - up,
        ]
    }

    pub fn normal(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

/// All entities of the scene plus the decorative group rotations
#[derive(Clone, Debug)]
pub struct Scene {
    pub ornaments: Vec<Ornament>,
    pub photos: Vec<PhotoPlane>,
    pub snow: Vec<Vec3>,
    pub star_rotation: f32,
    pub tree_rotation: f32,
    pub carousel_rotation: f32,
}

impl Scene {
    /// Builds the scene. `textures` is the ordered photo list; missing entries render untextured.
    pub fn build<R: Rng>(rng: &mut R, textures: Vec<TextureHandle>, snow_count: usize) -> Self {
        let ornaments = build_ornaments(rng);
        let photos = textures
            .into_iter()
            .chain(std::iter::repeat(None))
            .take(PHOTO_COUNT)
            .enumerate()
            .map(|(i, image)| PhotoPlane::new(i, image))
            .collect();
        let snow = (0..snow_count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * SNOW_EXTENT * 2.0,
                    (rng.gen::<f32>() - 0.5) * SNOW_EXTENT * 2.0,
                    (rng.gen::<f32>() - 0.5) * SNOW_EXTENT * 2.0,
                )
            })
            .collect();

        log::info!(
            "scene built: {} ornaments, {} photos, {} snow particles",
            ornaments.len(),
            PHOTO_COUNT,
            snow_count
        );

        Scene {
            ornaments,
            photos,
            snow,
            star_rotation: 0.0,
            tree_rotation: 0.0,
            carousel_rotation: 0.0,
        }
    }

    /// Tree-local to world transform
    pub fn tree_transform(&self) -> Mat4 {
        Mat4::from_translation(TREE_OFFSET) * Mat4::from_rotation_y(self.tree_rotation)
    }

    /// Star-local to world transform
    pub fn star_transform(&self) -> Mat4 {
        self.tree_transform()
            * Mat4::from_translation(Vec3::new(0.0, STAR_HEIGHT, 0.0))
            * Mat4::from_rotation_y(self.star_rotation)
    }

    /// Whether every ornament has stopped after an explosion
    pub fn all_frozen(&self) -> bool {
        self.ornaments.iter().all(|o| o.frozen)
    }
}

/// Lays ornaments out in horizontal rings; radius shrinks and population grows with height
fn build_ornaments<R: Rng>(rng: &mut R) -> Vec<Ornament> {
    let mut ornaments = Vec::new();
    for ring in 0.. {
        let y = ring as f32 * RING_STEP;
        if y >= TREE_HEIGHT {
            break;
        }
        let radius = (TREE_HEIGHT - y) * CONE_SLOPE;
        let count = (8.0 + y * 2.0).ceil() as usize;
        for _ in 0..count {
            let azimuth = rng.gen::<f32>() * TAU;
            let origin = Vec3::new(azimuth.cos() * radius, y, azimuth.sin() * radius);
            let color = hsl_to_rgb(rng.gen::<f32>(), 0.9, 0.6);
            let phase = ornaments.len() as f32;
            ornaments.push(Ornament::new(origin, color, phase));
        }
    }
    ornaments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scene(seed: u64) -> Scene {
        Scene::build(&mut StdRng::seed_from_u64(seed), Vec::new(), SNOW_COUNT)
    }

    #[test]
    fn ornaments_sit_on_the_cone() {
        let scene = scene(7);
        assert!(!scene.ornaments.is_empty());
        for o in &scene.ornaments {
            let radius = (TREE_HEIGHT - o.origin().y) * CONE_SLOPE;
            let horizontal = Vec3::new(o.origin().x, 0.0, o.origin().z).length();
            assert!((horizontal - radius).abs() < 1e-3);
            assert!(o.origin().y >= 0.0 && o.origin().y < TREE_HEIGHT);
            assert_eq!(o.position, o.origin());
            assert!(!o.frozen);
        }
    }

    #[test]
    fn ring_population_grows_with_height() {
        let scene = scene(1);
        let bottom = scene.ornaments.iter().filter(|o| o.origin().y == 0.0).count();
        let top_y = 31.0 * RING_STEP;
        let top = scene
            .ornaments
            .iter()
            .filter(|o| (o.origin().y - top_y).abs() < 1e-4)
            .count();
        assert_eq!(bottom, 8);
        assert!(top > bottom);
    }

    #[test]
    fn build_is_deterministic_per_seed() {
        let a = scene(42);
        let b = scene(42);
        assert_eq!(a.ornaments.len(), b.ornaments.len());
        for (x, y) in a.ornaments.iter().zip(&b.ornaments) {
            assert_eq!(x.origin(), y.origin());
            assert_eq!(x.color, y.color);
        }
        assert_eq!(a.snow, b.snow);
    }

    #[test]
    fn photos_are_evenly_spaced_and_untextured_when_missing() {
        let scene = scene(3);
        assert_eq!(scene.photos.len(), PHOTO_COUNT);
        for (i, p) in scene.photos.iter().enumerate() {
            assert!((p.angle - i as f32 * TAU / PHOTO_COUNT as f32).abs() < 1e-6);
            assert!(p.image.is_none());
        }
    }

    #[test]
    fn snow_fills_the_bounding_cube() {
        let scene = scene(9);
        assert_eq!(scene.snow.len(), SNOW_COUNT);
        for p in &scene.snow {
            assert!(p.abs().max_element() <= SNOW_EXTENT);
        }
    }

    #[test]
    fn facing_points_the_normal_at_the_eye() {
        let mut photo = PhotoPlane::new(0, None);
        photo.position = Vec3::new(9.0, 6.0, 0.0);
        let eye = Vec3::new(0.0, 10.0, 38.0);
        photo.face(0.0, eye);
        let to_eye = (eye - photo.world_position(0.0)).normalize();
        assert!(photo.normal().dot(to_eye) > 0.999);
    }
}
