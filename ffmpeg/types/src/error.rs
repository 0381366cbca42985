/*!
    Error type shared by the ffmpeg crates.
*/

use thiserror::Error;

use crate::StreamType;

/**
    Errors produced while opening, decoding, transforming or writing media.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("no {0} stream found")]
    StreamNotFound(StreamType),
}

impl Error {
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /**
        Returns true if this error means the input file does not exist.
    */
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            Error::codec("decoder not found").to_string(),
            "codec error: decoder not found"
        );
        assert_eq!(
            Error::StreamNotFound(StreamType::Video).to_string(),
            "no video stream found"
        );
    }

    #[test]
    fn not_found_detection() {
        let err = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.mp4",
        ));
        assert!(err.is_not_found());
        assert!(!Error::invalid_data("short buffer").is_not_found());
    }
}
