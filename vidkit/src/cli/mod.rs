use anyhow::Result;
use clap::{Parser, Subcommand};

mod frames;
mod probe;
mod remux;

pub use frames::FramesCommand;
pub use probe::ProbeCommand;
pub use remux::RemuxCommand;

/// Sample clip used when no input is given.
pub const DEFAULT_INPUT: &str = "Resources/SampleVideo_1280x720_2mb.mp4";

#[derive(Parser, Debug)]
#[command(name = "vidkit")]
#[command(about = "Dump decoded video frames as grayscale images, or remux a file by packet copy")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode the video stream and write each frame's luma plane as an image
    Frames(FramesCommand),
    /// Copy every audio, video and subtitle stream into another container
    Remux(RemuxCommand),
    /// Print container and stream information
    Probe(ProbeCommand),
}

impl Args {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Frames(cmd) => cmd.run(),
            Command::Remux(cmd) => cmd.run(),
            Command::Probe(cmd) => cmd.run(),
        }
    }
}
