/*!
    Frame dump pipeline: decode the video stream and write every frame's
    luma plane as a grayscale image.
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use ffmpeg_decode::VideoDecoder;
use ffmpeg_source::{Source, SourceConfig, StreamFilter};
use ffmpeg_transform::LumaTransform;
use ffmpeg_types::{Error, PixelFormat, StreamType, VideoFrame};

use super::image::{ImageFormat, save_luma};

#[derive(Clone, Debug)]
pub struct FrameDumpConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub image_format: ImageFormat,
    /// Stop after this many frames. `None` dumps the whole stream.
    pub max_frames: Option<u64>,
    /// Delete the files already in `output_dir` before writing.
    pub clean_output_dir: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameDumpSummary {
    pub packets_read: u64,
    pub frames_written: u64,
}

/**
    Run the frame dump.

    Prints the container and stream lines, then one line per frame as it is
    written to `<output_dir>/<prefix>.<frame number>.<ext>`.
*/
pub fn dump_frames(config: &FrameDumpConfig) -> Result<FrameDumpSummary> {
    prepare_output_dir(&config.output_dir, config.clean_output_dir)?;

    let mut source = Source::open(
        &config.input,
        SourceConfig::default().with_stream_filter(StreamFilter::VideoOnly),
    )
    .with_context(|| format!("failed to open {}", config.input.display()))?;

    super::print_media_info(source.media_info());

    let index = source
        .first_selected(StreamType::Video)
        .ok_or(Error::StreamNotFound(StreamType::Video))?;
    let codec_config = source
        .codec_config(index)
        .cloned()
        .ok_or(Error::StreamNotFound(StreamType::Video))?;
    let time_base = source
        .time_base(index)
        .ok_or(Error::StreamNotFound(StreamType::Video))?;

    info!(stream = index, %time_base, "decoding video stream");

    // Pixel formats the frame types cannot describe go straight to grayscale
    let decoder = VideoDecoder::new(codec_config, time_base)
        .context("failed to open decoder")?
        .with_fallback_format(PixelFormat::Gray8);
    let mut writer = FrameWriter::new(config);
    let packets_read = decode_into(&mut source, decoder, &mut writer)?;

    Ok(FrameDumpSummary {
        packets_read,
        frames_written: writer.written,
    })
}

/**
    Feed every packet to the decoder and hand its frames to the writer,
    draining the decoder at end of stream. Returns the packets read.
*/
fn decode_into(
    source: &mut Source,
    mut decoder: VideoDecoder,
    writer: &mut FrameWriter<'_>,
) -> Result<u64> {
    let mut packets_read = 0;

    while let Some(packet) = source.next_packet().context("failed to read packet")? {
        packets_read += 1;
        for frame in decoder.decode(&packet).context("failed to decode packet")? {
            if writer.is_full() {
                debug!(packets_read, "frame limit reached");
                return Ok(packets_read);
            }
            writer.write(&frame)?;
        }
    }

    for frame in decoder.flush().context("failed to flush decoder")? {
        if writer.is_full() {
            break;
        }
        writer.write(&frame)?;
    }

    debug!(
        packets_read,
        frames_decoded = decoder.frames_decoded(),
        "end of stream"
    );
    Ok(packets_read)
}

struct FrameWriter<'a> {
    config: &'a FrameDumpConfig,
    transform: LumaTransform,
    written: u64,
}

impl<'a> FrameWriter<'a> {
    fn new(config: &'a FrameDumpConfig) -> Self {
        Self {
            config,
            transform: LumaTransform::new(),
            written: 0,
        }
    }

    fn is_full(&self) -> bool {
        self.config.max_frames.is_some_and(|max| self.written >= max)
    }

    fn write(&mut self, frame: &VideoFrame) -> Result<()> {
        println!("{}", frame);

        let luma = self
            .transform
            .extract(frame)
            .with_context(|| format!("failed to extract luma of frame {}", frame.frame_number))?;

        let path = frame_path(
            &self.config.output_dir,
            &self.config.prefix,
            frame.frame_number,
            self.config.image_format,
        );
        save_luma(&luma, &path, self.config.image_format)?;

        self.written += 1;
        Ok(())
    }
}

pub(crate) fn frame_path(dir: &Path, prefix: &str, frame_number: u64, format: ImageFormat) -> PathBuf {
    dir.join(format!("{}.{}.{}", prefix, frame_number, format.extension()))
}

/**
    Create the output directory, optionally removing the files already in it.
    Subdirectories are left alone.
*/
fn prepare_output_dir(dir: &Path, clean: bool) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    if !clean {
        return Ok(());
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            let path = entry.path();
            std::fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(dir = %dir.display(), removed, "cleared output directory");
    }
    Ok(())
}
