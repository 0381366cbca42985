/*!
    Media source and demuxing for the ffmpeg crate ecosystem.

    This crate handles the input side of the media pipeline. It opens media
    files, parses containers, describes their streams, and produces encoded
    packets that downstream crates can decode or remux.
*/

mod codec_config;
pub mod convert;
mod packet;
mod probe;
mod source;

pub use codec_config::CodecConfig;
pub use packet::SourcePacket;
pub use probe::probe;
pub use source::{Source, SourceConfig, StreamFilter};
