use crate::assets::Texture;
use crate::math::{
    apply_lighting, blend, calculate_light_intensity, edge_function, luminance, Rgb,
};
use crate::vertex::Vertex;
use glam::Vec3;

/// Colour and depth buffers of the software rasterizer
#[derive(Clone, Debug)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<Rgb>,
    depth: Vec<f32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Framebuffer {
            width,
            height,
            color: vec![[0; 3]; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if (width, height) != (self.width, self.height) {
            *self = Framebuffer::new(width, height);
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.color[y * self.width + x]
    }

    /// Writes an opaque sample if it passes the depth test
    pub fn plot(&mut self, x: isize, y: isize, depth: f32, color: Rgb) {
        if let Some(offset) = self.offset(x, y) {
            if depth < self.depth[offset] {
                self.depth[offset] = depth;
                self.color[offset] = color;
            }
        }
    }

    /// Blends a translucent sample over the buffer without writing depth
    pub fn blend(&mut self, x: isize, y: isize, depth: f32, color: Rgb, opacity: f32) {
        if let Some(offset) = self.offset(x, y) {
            if depth < self.depth[offset] {
                self.color[offset] = blend(self.color[offset], color, opacity);
            }
        }
    }

    fn offset(&self, x: isize, y: isize) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

/// Pixel bounding box of a triangle clamped to the buffer
fn bounding_box(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    width: usize,
    height: usize,
) -> Option<(usize, usize, usize, usize)> {
    let xs = [v0.screen_position[0], v1.screen_position[0], v2.screen_position[0]];
    let ys = [v0.screen_position[1], v1.screen_position[1], v2.screen_position[1]];
    let min_x = xs.iter().fold(f32::INFINITY, |a, &b| a.min(b)).floor().max(0.0);
    let max_x = xs.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)).ceil();
    let min_y = ys.iter().fold(f32::INFINITY, |a, &b| a.min(b)).floor().max(0.0);
    let max_y = ys.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b)).ceil();
    if width == 0 || height == 0 || max_x < 0.0 || max_y < 0.0 {
        return None;
    }
    let max_x = max_x.min(width as f32 - 1.0);
    let max_y = max_y.min(height as f32 - 1.0);
    if min_x > max_x || min_y > max_y {
        return None;
    }
    Some((min_x as usize, max_x as usize, min_y as usize, max_y as usize))
}

/// Normalized barycentric weights of the pixel centre, or `None` outside the triangle
fn barycentric(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    area: f32,
    x: usize,
    y: usize,
) -> Option<[f32; 3]> {
    let p = [x as f32 + 0.5, y as f32 + 0.5];
    let w0 = edge_function(&v1.screen_position, &v2.screen_position, &p) / area;
    let w1 = edge_function(&v2.screen_position, &v0.screen_position, &p) / area;
    let w2 = edge_function(&v0.screen_position, &v1.screen_position, &p) / area;
    (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0).then_some([w0, w1, w2])
}

/// Draws a lit opaque triangle with per-pixel point lighting
pub fn draw_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    framebuffer: &mut Framebuffer,
    normal: Vec3,
    light_pos_world: Vec3,
    base_color: Rgb,
) {
    let Some((min_x, max_x, min_y, max_y)) =
        bounding_box(v0, v1, v2, framebuffer.width, framebuffer.height)
    else {
        return;
    };

    // Either winding is accepted; the sign of the area normalizes the weights.
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < f32::EPSILON {
        return;
    }

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let Some([w0, w1, w2]) = barycentric(v0, v1, v2, area, x, y) else {
                continue;
            };
            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let position = v0.position * w0 + v1.position * w1 + v2.position * w2;
            let intensity = calculate_light_intensity(normal, position, light_pos_world);
            let shaded = apply_lighting(base_color, intensity);
            framebuffer.plot(x as isize, y as isize, depth, shaded);
        }
    }
}

/// Draws a translucent, perspective-correct textured triangle. Depth is tested, not written.
///
/// Without a texture the triangle is filled with `tint`.
pub fn draw_textured_triangle(
    v0: &Vertex,
    v1: &Vertex,
    v2: &Vertex,
    framebuffer: &mut Framebuffer,
    texture: Option<&Texture>,
    tint: Rgb,
    opacity: f32,
) {
    let Some((min_x, max_x, min_y, max_y)) =
        bounding_box(v0, v1, v2, framebuffer.width, framebuffer.height)
    else {
        return;
    };
    let area = edge_function(&v0.screen_position, &v1.screen_position, &v2.screen_position);
    if area.abs() < f32::EPSILON || v0.depth <= 0.0 || v1.depth <= 0.0 || v2.depth <= 0.0 {
        return;
    }
    let inv = [1.0 / v0.depth, 1.0 / v1.depth, 1.0 / v2.depth];

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let Some([w0, w1, w2]) = barycentric(v0, v1, v2, area, x, y) else {
                continue;
            };
            let inv_depth = w0 * inv[0] + w1 * inv[1] + w2 * inv[2];
            let depth = 1.0 / inv_depth;
            let color = match texture {
                Some(texture) => {
                    let uv = (v0.uv * inv[0] * w0 + v1.uv * inv[1] * w1 + v2.uv * inv[2] * w2)
                        * depth;
                    texture.sample(uv)
                }
                None => tint,
            };
            framebuffer.blend(x as isize, y as isize, depth, color, opacity);
        }
    }
}

/// Draws a shaded sphere impostor centred on a screen position
pub fn draw_disc(
    framebuffer: &mut Framebuffer,
    center: [f32; 2],
    radius: f32,
    depth: f32,
    color: Rgb,
) {
    let radius = radius.max(0.75);
    let (width, height) = (framebuffer.width as f32, framebuffer.height as f32);
    let min_x = (center[0] - radius).floor().max(0.0) as isize;
    let max_x = (center[0] + radius).ceil().min(width - 1.0) as isize;
    let min_y = (center[1] - radius).floor().max(0.0) as isize;
    let max_y = (center[1] + radius).ceil().min(height - 1.0) as isize;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = (x as f32 + 0.5 - center[0]) / radius;
            let dy = (y as f32 + 0.5 - center[1]) / radius;
            let r2 = dx * dx + dy * dy;
            if r2 > 1.0 {
                continue;
            }
            // Brighter toward the upper-left, like a lit ball
            let rim = (1.0 - r2).sqrt();
            let intensity = 0.55 + 0.45 * rim - 0.15 * (dx + dy);
            framebuffer.plot(x, y, depth, apply_lighting(color, intensity));
        }
    }
}

/// Draws a line between two points in the framebuffer using Bresenham's algorithm
pub fn draw_line(
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    depth: f32,
    framebuffer: &mut Framebuffer,
    color: Rgb,
) {
    let (mut x0, mut y0, x1, y1) = (
        x0.round() as isize,
        y0.round() as isize,
        x1.round() as isize,
        y1.round() as isize,
    );
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy; // error value e_xy

    // Lines that leave the screen by a wide margin are not worth walking
    let limit = (framebuffer.width + framebuffer.height) as isize * 4;
    if dx > limit || -dy > limit {
        return;
    }

    loop {
        framebuffer.blend(x0, y0, depth, color, 1.0);

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Adds a blurred copy of the bright pixels back onto the image
pub fn bloom(framebuffer: &mut Framebuffer, threshold: f32, strength: f32, radius: usize) {
    let (width, height) = (framebuffer.width, framebuffer.height);
    if width == 0 || height == 0 {
        return;
    }

    let mut bright: Vec<[f32; 3]> = framebuffer
        .color
        .iter()
        .map(|&c| {
            if luminance(c) > threshold {
                c.map(|v| v as f32)
            } else {
                [0.0; 3]
            }
        })
        .collect();

    box_blur(&mut bright, width, height, radius, true);
    box_blur(&mut bright, width, height, radius, false);

    for (pixel, glow) in framebuffer.color.iter_mut().zip(&bright) {
        for i in 0..3 {
            pixel[i] = (pixel[i] as f32 + glow[i] * strength).min(255.0) as u8;
        }
    }
}

/// One separable pass of a box blur
fn box_blur(buffer: &mut [[f32; 3]], width: usize, height: usize, radius: usize, horizontal: bool) {
    let source = buffer.to_vec();
    let (outer, inner) = if horizontal { (height, width) } else { (width, height) };
    let index = |o: usize, i: usize| if horizontal { o * width + i } else { i * width + o };
    let weight = 1.0 / (2 * radius + 1) as f32;
    for o in 0..outer {
        for i in 0..inner {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius).min(inner - 1);
            let mut sum = [0.0f32; 3];
            for k in lo..=hi {
                let s = source[index(o, k)];
                sum[0] += s[0];
                sum[1] += s[1];
                sum[2] += s[2];
            }
            buffer[index(o, i)] = sum.map(|v| v * weight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn vertex(x: f32, y: f32, depth: f32, uv: Vec2) -> Vertex {
        Vertex {
            position: Vec3::new(x, y, -depth),
            screen_position: [x, y],
            depth,
            uv,
        }
    }

    #[test]
    fn depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(4, 4);
        fb.plot(1, 1, 5.0, [10, 10, 10]);
        fb.plot(1, 1, 9.0, [200, 200, 200]);
        assert_eq!(fb.pixel(1, 1), [10, 10, 10]);
        fb.plot(1, 1, 2.0, [50, 50, 50]);
        assert_eq!(fb.pixel(1, 1), [50, 50, 50]);
        fb.plot(-1, 7, 0.0, [1, 1, 1]);
    }

    #[test]
    fn triangle_covers_its_interior_in_either_winding() {
        for flip in [false, true] {
            let mut fb = Framebuffer::new(8, 8);
            let a = vertex(0.0, 0.0, 1.0, Vec2::ZERO);
            let b = vertex(8.0, 0.0, 1.0, Vec2::ZERO);
            let c = vertex(0.0, 8.0, 1.0, Vec2::ZERO);
            let (b, c) = if flip { (c, b) } else { (b, c) };
            draw_triangle(&a, &b, &c, &mut fb, Vec3::Z, Vec3::new(0.0, 0.0, 10.0), [200, 0, 0]);
            assert_ne!(fb.pixel(1, 1), [0, 0, 0]);
            assert_eq!(fb.pixel(7, 7), [0, 0, 0]);
        }
    }

    #[test]
    fn translucent_triangle_blends_without_texture() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear([0, 0, 100]);
        let a = vertex(0.0, 0.0, 1.0, Vec2::ZERO);
        let b = vertex(4.0, 0.0, 1.0, Vec2::X);
        let c = vertex(0.0, 4.0, 1.0, Vec2::Y);
        draw_textured_triangle(&a, &b, &c, &mut fb, None, [200, 0, 0], 0.5);
        assert_eq!(fb.pixel(0, 0), [100, 0, 50]);
    }

    #[test]
    fn bloom_leaves_dark_images_alone() {
        let mut fb = Framebuffer::new(6, 6);
        fb.clear([20, 20, 20]);
        bloom(&mut fb, 0.85, 0.7, 2);
        assert!(fb.color.iter().all(|&c| c == [20, 20, 20]));
    }

    #[test]
    fn bloom_spreads_bright_pixels() {
        let mut fb = Framebuffer::new(7, 7);
        fb.plot(3, 3, 1.0, [255, 255, 255]);
        bloom(&mut fb, 0.85, 0.7, 1);
        assert_ne!(fb.pixel(4, 3), [0, 0, 0]);
        assert_eq!(fb.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn line_stops_at_its_end_point() {
        let mut fb = Framebuffer::new(5, 5);
        draw_line(0.0, 0.0, 3.0, 0.0, 1.0, &mut fb, [9, 9, 9]);
        assert_eq!(fb.pixel(3, 0), [9, 9, 9]);
        assert_eq!(fb.pixel(4, 0), [0, 0, 0]);
    }
}
