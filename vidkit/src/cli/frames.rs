use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::media::{FrameDumpConfig, ImageFormat, dump_frames};

#[derive(Parser, Debug)]
pub struct FramesCommand {
    /// Input media file
    #[arg(long, short, default_value = super::DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory the frame images are written to
    #[arg(long, short, default_value = "Output/Frames")]
    pub output_dir: PathBuf,

    /// File name prefix, files are named `<prefix>.<frame number>.<ext>`
    #[arg(long, default_value = "frame")]
    pub prefix: String,

    /// Image format of the written frames
    #[arg(long, value_enum, default_value_t = ImageFormat::Pgm)]
    pub image_format: ImageFormat,

    /// Stop after writing this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Leave files already in the output directory alone
    #[arg(long)]
    pub keep_existing: bool,
}

impl FramesCommand {
    pub fn run(self) -> Result<()> {
        let config = FrameDumpConfig {
            input: self.input,
            output_dir: self.output_dir,
            prefix: self.prefix,
            image_format: self.image_format,
            max_frames: self.max_frames,
            clean_output_dir: !self.keep_existing,
        };

        let summary = dump_frames(&config)?;
        println!(
            "Wrote {} frames from {} packets to {}",
            summary.frames_written,
            summary.packets_read,
            config.output_dir.display()
        );
        Ok(())
    }
}
