/*!
    Media output and muxing for the ffmpeg crate ecosystem.

    This crate handles the output side of the media pipeline. It declares
    stream-copy output streams from source codec parameters and writes encoded
    packets into a container, rescaling their timestamps on the way.
*/

mod config;
mod sink;

pub use config::{SinkConfig, SinkStream};
pub use sink::Sink;
