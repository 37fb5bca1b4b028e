//! Photo texture loading.
//!
//! A photo that fails to load is reported and replaced by `None`, which the renderer draws
//! as a flat tinted plane.

use crate::error::{Error, Result};
use crate::math::Rgb;
use glam::Vec2;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Longest side a photo is downscaled to; the terminal cannot show more detail
pub const TEXTURE_MAX_SIDE: u32 = 96;

/// CPU-side RGB texture
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

pub type TextureHandle = Option<Rc<Texture>>;

impl Texture {
    /// Builds a texture from row-major pixels. Returns `None` if the sizes disagree.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width * height) as usize {
            return None;
        }
        Some(Texture {
            width,
            height,
            pixels,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let image = image::open(path).map_err(|source| Error::Texture {
            path: path.to_path_buf(),
            source,
        })?;
        let rgb = image.thumbnail(TEXTURE_MAX_SIDE, TEXTURE_MAX_SIDE).to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| p.0).collect();
        Ok(Texture {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest-neighbour sample, `uv` clamped to [0, 1]
    pub fn sample(&self, uv: Vec2) -> Rgb {
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = ((uv.x * self.width as f32) as u32).min(self.width - 1);
        let y = ((uv.y * self.height as f32) as u32).min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Ordered photo paths: `1.jpg` through `{count}.jpg` inside `dir`
pub fn photo_paths(dir: &Path, count: usize) -> Vec<PathBuf> {
    (1..=count).map(|i| dir.join(format!("{i}.jpg"))).collect()
}

/// Loads every photo, degrading failures to untextured handles
pub fn load_photos(paths: &[PathBuf]) -> Vec<TextureHandle> {
    paths
        .iter()
        .map(|path| match Texture::load(path) {
            Ok(texture) => {
                log::debug!(
                    "loaded {} ({}x{})",
                    path.display(),
                    texture.width(),
                    texture.height()
                );
                Some(Rc::new(texture))
            }
            Err(err) => {
                log::warn!("{err}: {}; drawing photo untextured", source_message(&err));
                None
            }
        })
        .collect()
}

fn source_message(err: &Error) -> String {
    std::error::Error::source(err)
        .map(|s| s.to_string())
        .unwrap_or_default()
}
