/*!
    Remux pipeline: copy every audio, video and subtitle stream of a file
    into another container without decoding.
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use ffmpeg_sink::{Sink, SinkConfig, SinkStream};
use ffmpeg_source::{Source, SourceConfig, StreamFilter};
use ffmpeg_types::StreamMapping;

#[derive(Clone, Debug)]
pub struct RemuxConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Muxer name. Guessed from the output file name when `None`.
    pub format: Option<String>,
    /// Muxer options applied when writing the header.
    pub options: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemuxSummary {
    pub packets_written: u64,
    /// Packets of streams that were not copied.
    pub packets_skipped: u64,
    pub streams: usize,
}

/**
    Run the remux pipeline: read packets from the input and write the ones of
    mapped streams to the output, timestamps rescaled to the output time bases.
*/
pub fn remux(config: &RemuxConfig) -> Result<RemuxSummary> {
    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut source = Source::open(
        &config.input,
        SourceConfig::default().with_stream_filter(StreamFilter::AllMedia),
    )
    .with_context(|| format!("failed to open {}", config.input.display()))?;

    let media_info = source.media_info().clone();
    super::print_media_info(&media_info);

    let mapping = StreamMapping::new(media_info.stream_types());
    let mut sink_config = SinkConfig::new();
    if let Some(format) = &config.format {
        sink_config = sink_config.with_format(format.clone());
    }
    for (key, value) in &config.options {
        sink_config = sink_config.with_option(key.clone(), value.clone());
    }

    for (input_index, output_index) in mapping.iter() {
        let Some(output_index) = output_index else {
            println!("Stream #{}: not copied", input_index);
            continue;
        };

        let codec = source
            .codec_config(input_index)
            .cloned()
            .with_context(|| format!("no codec parameters for stream {}", input_index))?;
        let time_base = source
            .time_base(input_index)
            .with_context(|| format!("no time base for stream {}", input_index))?;

        println!("Stream #{} -> #{}", input_index, output_index);
        sink_config = sink_config.with_stream(SinkStream::copy_of(codec, time_base));
    }

    if mapping.output_count() == 0 {
        bail!(
            "{} has no audio, video or subtitle streams to copy",
            config.input.display()
        );
    }

    let mut sink = Sink::file(&config.output, sink_config)
        .with_context(|| format!("failed to create {}", config.output.display()))?;

    info!(
        output = %config.output.display(),
        streams = sink.stream_count(),
        "copying packets"
    );

    // The trailer is written even when copying stops on an error
    let copied = copy_packets(&mut source, &mut sink, &mapping);
    let stream_packets: Vec<u64> = (0..sink.stream_count())
        .map(|index| sink.stream_packets_written(index).unwrap_or(0))
        .collect();
    let summary = RemuxSummary {
        packets_written: sink.packets_written(),
        packets_skipped: source.packets_skipped(),
        streams: sink.stream_count(),
    };
    let finished = sink.finish().context("failed to finish output");

    copied?;
    finished?;

    for (index, count) in stream_packets.iter().enumerate() {
        println!("Output stream #{}: {} packets", index, count);
    }
    debug!(?summary, "remux finished");

    Ok(summary)
}

fn copy_packets(source: &mut Source, sink: &mut Sink, mapping: &StreamMapping) -> Result<()> {
    while let Some(packet) = source.next_source_packet().context("failed to read packet")? {
        let input_index = packet.stream_index();
        let output_index = mapping
            .output_index(input_index)
            .with_context(|| format!("stream {} has no output stream", input_index))?;

        let pts = packet.pts();
        sink.write(packet, output_index).with_context(|| {
            format!("failed to write packet of stream {} (pts {:?})", input_index, pts)
        })?;
    }
    Ok(())
}
