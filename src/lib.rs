//! A decorated tree rendered in the terminal: ornaments that burst apart, freeze and
//! fly back, a carousel of photos that can be picked with the mouse, and falling snow.

pub mod assets;
pub mod audio;
pub mod camera;
pub mod carousel;
pub mod config;
pub mod driver;
pub mod error;
pub mod explosion;
pub mod graphics;
pub mod input;
pub mod math;
pub mod picking;
pub mod render;
pub mod scene;
pub mod state;
pub mod surface;
pub mod vertex;
