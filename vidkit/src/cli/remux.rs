use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::media::{RemuxConfig, remux};

#[derive(Parser, Debug)]
pub struct RemuxCommand {
    /// Input media file
    #[arg(long, short, default_value = super::DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Output file, the container format is guessed from its extension
    #[arg(long, short, default_value = "Output/Remuxing/remuxed.ts")]
    pub output: PathBuf,

    /// Force a container format by muxer name (e.g. `mpegts`, `matroska`)
    #[arg(long, short)]
    pub format: Option<String>,

    /// Muxer option as KEY=VALUE, may be repeated
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,
}

impl RemuxCommand {
    pub fn run(self) -> Result<()> {
        let config = RemuxConfig {
            input: self.input,
            output: self.output,
            format: self.format,
            options: self.options,
        };

        let result = remux(&config);
        if let Ok(summary) = &result {
            println!(
                "Wrote {} packets in {} streams to {}",
                summary.packets_written,
                summary.streams,
                config.output.display()
            );
            if summary.packets_skipped > 0 {
                println!("Skipped {} packets of streams not copied", summary.packets_skipped);
            }
        }
        println!("end");

        result.map(|_| ())
    }
}

fn parse_key_value(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{}`", s))?;
    if key.is_empty() {
        return Err(anyhow!("empty option name in `{}`", s));
    }
    Ok((key.to_string(), value.to_string()))
}
