//! Fire-and-forget sound clip playback through an external player process.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

pub const DEFAULT_PLAYER: &str = "ffplay -nodisp -autoexit -loglevel quiet";

pub struct AudioPlayer {
    program: Vec<String>,
    clip: PathBuf,
    child: Option<Child>,
}

impl AudioPlayer {
    /// `command_line` is split on whitespace; the clip path is appended as the last argument
    pub fn new(command_line: &str, clip: impl Into<PathBuf>) -> Self {
        AudioPlayer {
            program: command_line.split_whitespace().map(str::to_owned).collect(),
            clip: clip.into(),
            child: None,
        }
    }

    pub fn clip(&self) -> &Path {
        &self.clip
    }

    /// Plays the clip from the start, cutting off a playback still in progress.
    /// Never waits for the clip to finish.
    pub fn play(&mut self) -> Result<()> {
        self.stop();

        let (program, args) = self.program.split_first().ok_or(Error::NoPlayer)?;
        if !self.clip.is_file() {
            return Err(Error::MissingClip(self.clip.clone()));
        }

        let child = Command::new(program)
            .args(args)
            .arg(&self.clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| Error::Audio {
                command: self.program.join(" "),
                source,
            })?;
        log::info!("audio: playing {} (pid {})", self.clip.display(), child.id());
        self.child = Some(child);
        Ok(())
    }

    /// Whether a playback process is still running
    pub fn is_playing(&mut self) -> bool {
        self.reap();
        self.child.is_some()
    }

    /// Collects a finished player process without blocking
    pub fn reap(&mut self) {
        if let Some(child) = &mut self.child {
            match child.try_wait() {
                Ok(Some(status)) => {
                    log::debug!("audio: player exited with {status}");
                    self.child = None;
                }
                Ok(None) => {}
                Err(err) => {
                    log::warn!("audio: lost track of player: {err}");
                    self.child = None;
                }
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already exited players make kill fail; that is fine.
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_rejected() {
        let mut player = AudioPlayer::new("   ", "Cargo.toml");
        assert!(matches!(player.play(), Err(Error::NoPlayer)));
        assert!(!player.is_playing());
    }

    #[test]
    fn missing_clip_is_reported() {
        let mut player = AudioPlayer::new(DEFAULT_PLAYER, "no/such/clip.m4a");
        assert!(matches!(player.play(), Err(Error::MissingClip(_))));
    }

    #[test]
    fn unknown_player_is_reported() {
        let mut player = AudioPlayer::new("tree3d-no-such-player-binary", "Cargo.toml");
        assert!(matches!(player.play(), Err(Error::Audio { .. })));
        assert!(!player.is_playing());
    }
}
