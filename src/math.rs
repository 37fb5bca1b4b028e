use glam::Vec3;

/// An RGB colour with 8-bit channels
pub type Rgb = [u8; 3];

/// Edge function used in rasterization
pub fn edge_function(a: &[f32; 2], b: &[f32; 2], c: &[f32; 2]) -> f32 {
    (c[0] - a[0]) * (b[1] - a[1]) - (c[1] - a[1]) * (b[0] - a[0])
}

/// Calculates the normal vector of a triangle
pub fn calculate_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Calculates the light intensity based on the normal vector and light position
pub fn calculate_light_intensity(normal: Vec3, position: Vec3, light_pos: Vec3) -> f32 {
    let light_dir = (light_pos - position).normalize_or_zero();
    normal.dot(light_dir).abs().max(0.1) // Ensure a minimum ambient light
}

/// Applies lighting to a color
pub fn apply_lighting(color: Rgb, intensity: f32) -> Rgb {
    color.map(|c| (c as f32 * intensity).min(255.0) as u8)
}

/// Adds an emissive contribution on top of a base color, saturating at white
pub fn add_emissive(color: Rgb, emissive: Rgb, intensity: f32) -> Rgb {
    let mut out = color;
    for (o, e) in out.iter_mut().zip(emissive) {
        *o = (*o as f32 + e as f32 * intensity).clamp(0.0, 255.0) as u8;
    }
    out
}

/// Blends `src` over `dst` with the given opacity
pub fn blend(dst: Rgb, src: Rgb, opacity: f32) -> Rgb {
    let a = opacity.clamp(0.0, 1.0);
    let mut out = dst;
    for i in 0..3 {
        out[i] = (src[i] as f32 * a + dst[i] as f32 * (1.0 - a)).round() as u8;
    }
    out
}

/// Scalar linear interpolation
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Converts a hex colour literal to RGB
pub const fn hex(value: u32) -> Rgb {
    [(value >> 16) as u8, (value >> 8) as u8, value as u8]
}

/// Converts HSL (all components in [0, 1]) to RGB
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> Rgb {
    if s <= 0.0 {
        let v = (l * 255.0).round() as u8;
        return [v, v, v];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0)]
}

/// Perceived brightness of a colour in [0, 1]
pub fn luminance(color: Rgb) -> f32 {
    (0.2126 * color[0] as f32 + 0.7152 * color[1] as f32 + 0.0722 * color[2] as f32) / 255.0
}
