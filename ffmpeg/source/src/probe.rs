/*!
    Probing functionality for extracting media metadata.
*/

use std::path::Path;
use std::time::Duration;

use ffmpeg_next::{Stream, format::context::Input as InputContext};

use ffmpeg_types::{Error, MediaInfo, Rational, Result, StreamDetail, StreamInfo, StreamType};

use crate::convert::{pixel_format_from_ffmpeg, rational_from_ffmpeg, stream_type_from_ffmpeg};

/**
    Probe a media file to extract metadata without reading any packets.

    Reads just enough of the file to determine the container format and the
    codec details of every stream.

    # Example

    ```ignore
    let info = probe("video.mp4")?;
    println!("{info}");
    for stream in &info.streams {
        println!("{stream}");
    }
    ```
*/
pub fn probe<P: AsRef<Path>>(path: P) -> Result<MediaInfo> {
    let input = open_input(path.as_ref())?;
    Ok(extract_media_info(&input))
}

/**
    Open an input container and read its stream information.
*/
pub(crate) fn open_input(path: &Path) -> Result<InputContext> {
    ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;

    ffmpeg_next::format::input(&path).map_err(|e| {
        if e.to_string().contains("No such file") {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: {}", path.display(), e),
            ))
        } else {
            Error::codec(format!("could not open {}: {}", path.display(), e))
        }
    })
}

/**
    Extract MediaInfo from an already-opened input context.
*/
pub(crate) fn extract_media_info(input: &InputContext) -> MediaInfo {
    let format = input.format();

    let duration = if input.duration() > 0 {
        Some(Duration::from_micros(input.duration() as u64))
    } else {
        None
    };

    // SAFETY: reading a plain field of the AVFormatContext owned by `input`
    let bit_rate = unsafe { (*input.as_ptr()).bit_rate };

    MediaInfo {
        format_name: format.name().to_string(),
        format_long_name: format.description().to_string(),
        duration,
        bit_rate: (bit_rate > 0).then_some(bit_rate as u64),
        streams: input.streams().map(|s| extract_stream_info(&s)).collect(),
    }
}

fn extract_stream_info(stream: &Stream) -> StreamInfo {
    let parameters = stream.parameters();
    let stream_type = stream_type_from_ffmpeg(parameters.medium());
    let time_base = rational_from_ffmpeg(stream.time_base());
    let codec_id = parameters.id();

    let codec_long_name =
        ffmpeg_next::decoder::find(codec_id).map(|codec| codec.description().to_string());

    // SAFETY: We're reading from a valid AVCodecParameters pointer that FFmpeg owns
    let (bit_rate, width, height, channels, sample_rate) = unsafe {
        let ptr = parameters.as_ptr();
        (
            (*ptr).bit_rate,
            (*ptr).width,
            (*ptr).height,
            (*ptr).ch_layout.nb_channels,
            (*ptr).sample_rate,
        )
    };

    let detail = match stream_type {
        StreamType::Video => {
            // The decoder context knows the pixel format once parameters are applied
            let pixel_format = ffmpeg_next::codec::context::Context::from_parameters(parameters)
                .ok()
                .and_then(|ctx| ctx.decoder().video().ok())
                .and_then(|decoder| pixel_format_from_ffmpeg(decoder.format()));

            StreamDetail::Video {
                width: width.max(0) as u32,
                height: height.max(0) as u32,
                pixel_format,
            }
        }
        StreamType::Audio => StreamDetail::Audio {
            channels: channels.max(0) as u16,
            sample_rate: sample_rate.max(0) as u32,
        },
        _ => StreamDetail::Other,
    };

    StreamInfo {
        index: stream.index(),
        stream_type,
        time_base,
        codec_name: codec_id.name().to_string(),
        codec_long_name,
        codec_id: format!("{codec_id:?}"),
        bit_rate: (bit_rate > 0).then_some(bit_rate as u64),
        duration: stream_duration(stream.duration(), time_base),
        detail,
    }
}

/**
    Convert a stream duration in time base units to wall time.
*/
fn stream_duration(duration: i64, time_base: Rational) -> Option<Duration> {
    if duration <= 0 || !time_base.is_valid_time_base() {
        return None;
    }
    let seconds = duration as f64 * time_base.to_f64();
    Some(Duration::from_secs_f64(seconds))
}
