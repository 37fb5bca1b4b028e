use std::path::PathBuf;

/// Errors raised by the plumbing around the scene core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load texture {}", .path.display())]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to start audio player `{command}`")]
    Audio {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("audio player command is empty")]
    NoPlayer,
    #[error("sound clip {} does not exist", .0.display())]
    MissingClip(PathBuf),
    #[error("terminal I/O failed")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
