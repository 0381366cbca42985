/*!
    Shared types for the ffmpeg crate ecosystem.

    This crate defines the vocabulary of the ecosystem, the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.
*/

mod error;
mod format;
mod frame;
mod packet;
mod rational;
mod stream;

pub use error::{Error, Result};
pub use format::{PictureType, PixelFormat};
pub use frame::{LumaPlane, VideoFrame, pack_rows};
pub use packet::Packet;
pub use rational::{MediaDuration, Pts, Rational, Rounding, rescale};
pub use stream::{MediaInfo, StreamDetail, StreamInfo, StreamMapping, StreamType};
