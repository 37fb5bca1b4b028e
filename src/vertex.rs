use glam::{Vec2, Vec3};

/// Vertex structure with world position, screen position, depth and texture coordinates
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub position: Vec3,
    pub screen_position: [f32; 2],
    /// View-space distance along the camera axis
    pub depth: f32,
    pub uv: Vec2,
}
