//! Draws a [`World`] into the software framebuffer.

use crate::camera::{FOV_Y_DEGREES, NEAR};
use crate::driver::World;
use crate::graphics::{
    bloom, draw_disc, draw_line, draw_textured_triangle, draw_triangle, Framebuffer,
};
use crate::math::{add_emissive, apply_lighting, calculate_normal, hex, Rgb};
use crate::picking::Viewport;
use crate::scene::{PhotoPlane, ORNAMENT_RADIUS, SNOW_EXTENT, STAR_RADIUS};
use crate::vertex::Vertex;
use glam::{Mat4, Vec2, Vec3};

pub const BACKGROUND: Rgb = [3, 5, 14];
/// Warm point light above and in front of the tree
pub const LIGHT_POSITION: Vec3 = Vec3::new(0.0, 25.0, 20.0);
const ORNAMENT_EMISSIVE: Rgb = hex(0xffaa55);
const STAR_COLOR: Rgb = hex(0xffdd88);
const STAR_EMISSIVE: Rgb = hex(0xffaa00);
const SNOW_COLOR: Rgb = [235, 240, 255];
const PHOTO_BORDER: Rgb = [230, 230, 230];
pub const BLOOM_THRESHOLD: f32 = 0.85;
pub const BLOOM_STRENGTH: f32 = 0.7;

/// Unit octahedron used for the star
const OCTAHEDRON: [Vec3; 6] = [
    Vec3::X,
    Vec3::NEG_X,
    Vec3::Y,
    Vec3::NEG_Y,
    Vec3::Z,
    Vec3::NEG_Z,
];
const OCTAHEDRON_FACES: [(usize, usize, usize); 8] = [
    (0, 2, 4),
    (4, 2, 1),
    (1, 2, 5),
    (5, 2, 0),
    (4, 3, 0),
    (1, 3, 4),
    (5, 3, 1),
    (0, 3, 5),
];

/// World → screen mapping for one frame
struct Projector {
    view: Mat4,
    view_projection: Mat4,
    viewport: Viewport,
    /// Pixels per world unit at unit depth
    focal: f32,
}

impl Projector {
    fn new(world: &World, viewport: Viewport) -> Self {
        Projector {
            view: world.camera.view(),
            view_projection: world.camera.view_projection(),
            viewport,
            focal: viewport.height as f32 * 0.5 / (FOV_Y_DEGREES.to_radians() * 0.5).tan(),
        }
    }

    /// Projects a world point; `None` if it lies behind the near plane
    fn project(&self, position: Vec3, uv: Vec2) -> Option<Vertex> {
        let depth = -self.view.transform_point3(position).z;
        if depth <= NEAR {
            return None;
        }
        let ndc = self.view_projection.project_point3(position);
        let screen = self.viewport.to_pixel(ndc.truncate());
        Some(Vertex {
            position,
            screen_position: [screen.x, screen.y],
            depth,
            uv,
        })
    }
}

pub struct Renderer {
    framebuffer: Framebuffer,
    bloom: bool,
}

impl Renderer {
    pub fn new(viewport: Viewport, bloom: bool) -> Self {
        Renderer {
            framebuffer: Framebuffer::new(viewport.width, viewport.height),
            bloom,
        }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// Renders the opaque geometry, then the photos back to front, then the glow
    pub fn render(&mut self, world: &World) -> &Framebuffer {
        let viewport = world.viewport();
        self.framebuffer.resize(viewport.width, viewport.height);
        self.framebuffer.clear(BACKGROUND);
        if viewport.is_empty() {
            return &self.framebuffer;
        }

        let projector = Projector::new(world, viewport);
        self.draw_snow(world, &projector);
        self.draw_ornaments(world, &projector);
        self.draw_star(world, &projector);
        if world.state.photos_visible() {
            self.draw_photos(world, &projector);
        }

        if self.bloom {
            let radius = (viewport.height / 40).max(1);
            bloom(&mut self.framebuffer, BLOOM_THRESHOLD, BLOOM_STRENGTH, radius);
        }
        &self.framebuffer
    }

    fn draw_snow(&mut self, world: &World, projector: &Projector) {
        for particle in &world.scene.snow {
            let Some(v) = projector.project(*particle, Vec2::ZERO) else {
                continue;
            };
            // Distant flakes fade into the background
            let fade = (1.0 - v.depth / (SNOW_EXTENT * 3.0)).clamp(0.25, 1.0);
            self.framebuffer.plot(
                v.screen_position[0] as isize,
                v.screen_position[1] as isize,
                v.depth,
                apply_lighting(SNOW_COLOR, fade),
            );
        }
    }

    fn draw_ornaments(&mut self, world: &World, projector: &Projector) {
        let tree = world.scene.tree_transform();
        for ornament in &world.scene.ornaments {
            let position = tree.transform_point3(ornament.position);
            let Some(v) = projector.project(position, Vec2::ZERO) else {
                continue;
            };
            let radius = ORNAMENT_RADIUS * projector.focal / v.depth;
            let color = add_emissive(
                apply_lighting(ornament.color, 0.75),
                ORNAMENT_EMISSIVE,
                ornament.emissive_intensity * 0.15,
            );
            draw_disc(&mut self.framebuffer, v.screen_position, radius, v.depth, color);
        }
    }

    fn draw_star(&mut self, world: &World, projector: &Projector) {
        let transform = world.scene.star_transform();
        let corners = OCTAHEDRON.map(|p| transform.transform_point3(p * STAR_RADIUS));
        let color = add_emissive(STAR_COLOR, STAR_EMISSIVE, 0.6);
        for (a, b, c) in OCTAHEDRON_FACES {
            let projected = (
                projector.project(corners[a], Vec2::ZERO),
                projector.project(corners[b], Vec2::ZERO),
                projector.project(corners[c], Vec2::ZERO),
            );
            let (Some(v0), Some(v1), Some(v2)) = projected else {
                continue;
            };
            let normal = calculate_normal(corners[a], corners[b], corners[c]);
            draw_triangle(&v0, &v1, &v2, &mut self.framebuffer, normal, LIGHT_POSITION, color);
        }
    }

    fn draw_photos(&mut self, world: &World, projector: &Projector) {
        let rotation = world.scene.carousel_rotation;
        let eye = world.camera.position();
        let mut order: Vec<&PhotoPlane> = world.scene.photos.iter().collect();
        order.sort_by(|a, b| {
            let da = a.world_position(rotation).distance_squared(eye);
            let db = b.world_position(rotation).distance_squared(eye);
            db.total_cmp(&da)
        });

        for photo in order {
            self.draw_photo(photo, rotation, projector);
        }
    }

    fn draw_photo(&mut self, photo: &PhotoPlane, rotation: f32, projector: &Projector) {
        let corners = photo.corners(rotation);
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let mut vertices = Vec::with_capacity(4);
        for (corner, uv) in corners.into_iter().zip(uvs) {
            match projector.project(corner, uv) {
                Some(v) => vertices.push(v),
                None => return,
            }
        }

        let texture = photo.image.as_deref();
        for (a, b, c) in [(0, 1, 2), (0, 2, 3)] {
            draw_textured_triangle(
                &vertices[a],
                &vertices[b],
                &vertices[c],
                &mut self.framebuffer,
                texture,
                photo.tint,
                photo.opacity,
            );
        }

        if texture.is_none() {
            let depth = vertices.iter().map(|v| v.depth).fold(f32::INFINITY, f32::min);
            for i in 0..4 {
                let (from, to) = (&vertices[i], &vertices[(i + 1) % 4]);
                draw_line(
                    from.screen_position[0],
                    from.screen_position[1],
                    to.screen_position[0],
                    to.screen_position[1],
                    depth,
                    &mut self.framebuffer,
                    apply_lighting(PHOTO_BORDER, photo.opacity),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> World {
        let mut rng = StdRng::seed_from_u64(11);
        let scene = Scene::build(&mut rng, Vec::new(), 200);
        World::new(scene, Viewport::new(80, 48), rng)
    }

    fn lit_pixels(fb: &Framebuffer) -> usize {
        let mut count = 0;
        for y in 0..fb.height() {
            for x in 0..fb.width() {
                if fb.pixel(x, y) != BACKGROUND {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn renders_the_tree_into_the_viewport() {
        let world = world();
        let mut renderer = Renderer::new(world.viewport(), false);
        let fb = renderer.render(&world);
        assert_eq!((fb.width(), fb.height()), (80, 48));
        assert!(lit_pixels(fb) > 50);
    }

    #[test]
    fn empty_viewport_renders_nothing() {
        let mut world = world();
        world.handle(crate::input::InputEvent::Resize(Viewport::new(0, 0)));
        let mut renderer = Renderer::new(Viewport::new(10, 10), true);
        let fb = renderer.render(&world);
        assert_eq!(fb.width() * fb.height(), 0);
    }
}
