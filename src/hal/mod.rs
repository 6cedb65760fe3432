//! Seams to the world outside the HUD core: video feeds, the presentation surface, command
//! input and the raw telemetry byte stream.

pub mod input;
pub mod io;
pub mod video;

use core::fmt;

pub use input::{Command, CommandSource};
pub use io::{ByteSource, Reader};
pub use video::{Presenter, VideoFeed};

#[derive(Debug)]
pub enum Error {
    /// Collaborator could not deliver, e.g. camera disconnected
    Unavailable(&'static str),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Unavailable(what) => write!(f, "{} unavailable", what),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
