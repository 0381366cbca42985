use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct ProbeCommand {
    /// Input media file
    #[arg(long, short, default_value = super::DEFAULT_INPUT)]
    pub input: PathBuf,
}

impl ProbeCommand {
    pub fn run(self) -> Result<()> {
        let info = ffmpeg_source::probe(&self.input)
            .with_context(|| format!("failed to probe {}", self.input.display()))?;
        crate::media::print_media_info(&info);
        Ok(())
    }
}
