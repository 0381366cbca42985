mod frames;
mod image;
mod remux;

pub use frames::{FrameDumpConfig, FrameDumpSummary, dump_frames};
pub use image::{ImageFormat, save_luma};
pub use remux::{RemuxConfig, RemuxSummary, remux};

use ffmpeg_types::MediaInfo;

/**
    Print the container line followed by one line per stream.
*/
pub fn print_media_info(info: &MediaInfo) {
    println!("{}", info);
    for stream in &info.streams {
        println!("{}", stream);
    }
}
