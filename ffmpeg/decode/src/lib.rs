/*!
    Media decoding for the ffmpeg crate ecosystem.

    This crate transforms encoded packets into raw frames, driving FFmpeg's
    send/receive decoding loop and copying frames out of FFmpeg-owned memory.
*/

mod video;

pub use video::VideoDecoder;
