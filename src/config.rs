use crate::audio::DEFAULT_PLAYER;
use crate::scene::SNOW_COUNT;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line configuration
#[derive(Clone, Debug, Parser)]
#[command(version, about)]
pub struct Config {
    /// Simulation ticks per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Seed for the ornament, colour and snow layout (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding the photos 1.jpg through 11.jpg
    #[arg(long, default_value = "images")]
    pub photos: PathBuf,

    /// Sound clip played by the music button
    #[arg(long, default_value = "images/voice/voice.m4a")]
    pub sound: PathBuf,

    /// Command used to play the sound clip; the clip path is appended
    #[arg(long, default_value = DEFAULT_PLAYER)]
    pub player: String,

    /// Number of snow particles
    #[arg(long, default_value_t = SNOW_COUNT)]
    pub snow: usize,

    /// Longest gap between the presses of a double-click, in milliseconds
    #[arg(long, default_value_t = 400)]
    pub double_click_ms: u64,

    /// Disable the bloom glow
    #[arg(long)]
    pub no_bloom: bool,

    /// Start with the debug overlay shown
    #[arg(long)]
    pub debug: bool,

    /// Log file; the terminal itself is used for the picture
    #[arg(long, default_value = "tree3d.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn double_click_window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}
