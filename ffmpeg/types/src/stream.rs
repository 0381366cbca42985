/*!
    Stream information types.
*/

use std::fmt;
use std::time::Duration;

use crate::{PixelFormat, Rational};

/**
    Kind of elementary stream inside a container.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Unknown,
}

impl StreamType {
    /**
        Returns true for the stream kinds that get carried over when remuxing.
    */
    pub const fn is_media(self) -> bool {
        matches!(self, Self::Video | Self::Audio | Self::Subtitle)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
            Self::Attachment => "attachment",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
    Kind-specific stream details.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamDetail {
    Video {
        width: u32,
        height: u32,
        /// `None` when the decoder reports a format outside [`PixelFormat`].
        pixel_format: Option<PixelFormat>,
    },
    Audio {
        channels: u16,
        sample_rate: u32,
    },
    Other,
}

/**
    Information about one stream of a container.
*/
#[derive(Clone, Debug)]
pub struct StreamInfo {
    /// Index of the stream inside its container.
    pub index: usize,
    pub stream_type: StreamType,
    pub time_base: Rational,
    /// Short codec name, e.g. `h264`.
    pub codec_name: String,
    /// Descriptive codec name, when a decoder is available.
    pub codec_long_name: Option<String>,
    /// FFmpeg's identifier for the codec, e.g. `H264`.
    pub codec_id: String,
    /// Bitrate in bits per second (if known).
    pub bit_rate: Option<u64>,
    /// Total duration (may be unavailable for some streams).
    pub duration: Option<Duration>,
    pub detail: StreamDetail,
}

impl fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            StreamDetail::Video { width, height, .. } => {
                write!(f, "Video Codec: resolution {width} x {height}")?
            }
            StreamDetail::Audio {
                channels,
                sample_rate,
            } => write!(
                f,
                "Audio Codec: {channels} channels, sample rate {sample_rate}"
            )?,
            StreamDetail::Other => write!(f, "{} stream", self.stream_type)?,
        }
        write!(
            f,
            "\tCodec {}, ID {}, bit_rate {}",
            self.codec_long_name.as_deref().unwrap_or(&self.codec_name),
            self.codec_id,
            self.bit_rate.unwrap_or(0)
        )
    }
}

/**
    Combined information about a media source.
*/
#[derive(Clone, Debug, Default)]
pub struct MediaInfo {
    /// Short container name, e.g. `mov,mp4,m4a,3gp,3g2,mj2`.
    pub format_name: String,
    /// Descriptive container name, e.g. `QuickTime / MOV`.
    pub format_long_name: String,
    /// Total duration of the media (may be unavailable).
    pub duration: Option<Duration>,
    /// Overall bitrate in bits per second (if known).
    pub bit_rate: Option<u64>,
    /// Every stream of the container, in container order.
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    /**
        Returns the first stream of the given type.
    */
    pub fn first(&self, stream_type: StreamType) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.stream_type == stream_type)
    }

    /**
        Returns true if this media has video.
    */
    pub fn has_video(&self) -> bool {
        self.first(StreamType::Video).is_some()
    }

    /**
        Returns true if this media has audio.
    */
    pub fn has_audio(&self) -> bool {
        self.first(StreamType::Audio).is_some()
    }

    /**
        Stream types in container order, suitable for [`StreamMapping::new`].
    */
    pub fn stream_types(&self) -> impl Iterator<Item = StreamType> + '_ {
        self.streams.iter().map(|s| s.stream_type)
    }
}

impl fmt::Display for MediaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Format {}, duration ", self.format_long_name)?;
        match self.duration {
            Some(duration) => write!(f, "{} us", duration.as_micros()),
            None => write!(f, "unknown"),
        }
    }
}

/**
    Mapping from input stream indices to output stream indices.

    Media streams (audio, video, subtitle) get consecutive output indices in
    input order. Every other stream is unmapped and its packets are dropped.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamMapping {
    outputs: Vec<Option<usize>>,
}

impl StreamMapping {
    pub fn new<I>(stream_types: I) -> Self
    where
        I: IntoIterator<Item = StreamType>,
    {
        let mut next = 0;
        let outputs = stream_types
            .into_iter()
            .map(|stream_type| {
                stream_type.is_media().then(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect();

        Self { outputs }
    }

    /**
        Output index for an input stream, or `None` if the stream is dropped
        or the index is out of range.
    */
    pub fn output_index(&self, input_index: usize) -> Option<usize> {
        self.outputs.get(input_index).copied().flatten()
    }

    /**
        Number of input streams the mapping was built from.
    */
    pub fn input_count(&self) -> usize {
        self.outputs.len()
    }

    /**
        Number of streams in the output.
    */
    pub fn output_count(&self) -> usize {
        self.outputs.iter().flatten().count()
    }

    /**
        Iterate `(input, output)` pairs, in input order.
    */
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        self.outputs.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_stream(index: usize) -> StreamInfo {
        StreamInfo {
            index,
            stream_type: StreamType::Video,
            time_base: Rational::new(1, 12800),
            codec_name: "h264".into(),
            codec_long_name: Some("H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10".into()),
            codec_id: "H264".into(),
            bit_rate: Some(1_205_959),
            duration: None,
            detail: StreamDetail::Video {
                width: 1280,
                height: 720,
                pixel_format: Some(PixelFormat::Yuv420p),
            },
        }
    }

    fn audio_stream(index: usize) -> StreamInfo {
        StreamInfo {
            index,
            stream_type: StreamType::Audio,
            time_base: Rational::new(1, 48000),
            codec_name: "aac".into(),
            codec_long_name: None,
            codec_id: "AAC".into(),
            bit_rate: None,
            duration: None,
            detail: StreamDetail::Audio {
                channels: 6,
                sample_rate: 48000,
            },
        }
    }

    #[test]
    fn stream_info_display() {
        assert_eq!(
            video_stream(0).to_string(),
            "Video Codec: resolution 1280 x 720\t\
             Codec H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10, ID H264, bit_rate 1205959"
        );
        assert_eq!(
            audio_stream(1).to_string(),
            "Audio Codec: 6 channels, sample rate 48000\tCodec aac, ID AAC, bit_rate 0"
        );
    }

    #[test]
    fn media_info_display_and_lookup() {
        let info = MediaInfo {
            format_name: "mov,mp4,m4a,3gp,3g2,mj2".into(),
            format_long_name: "QuickTime / MOV".into(),
            duration: Some(Duration::from_micros(13_504_000)),
            bit_rate: None,
            streams: vec![audio_stream(0), video_stream(1)],
        };

        assert_eq!(info.to_string(), "Format QuickTime / MOV, duration 13504000 us");
        assert!(info.has_video());
        assert!(info.has_audio());
        assert_eq!(info.first(StreamType::Video).map(|s| s.index), Some(1));
        assert!(info.first(StreamType::Subtitle).is_none());
        assert_eq!(MediaInfo::default().to_string(), "Format , duration unknown");
    }

    #[test]
    fn mapping_skips_non_media_streams() {
        let mapping = StreamMapping::new([
            StreamType::Video,
            StreamType::Data,
            StreamType::Audio,
            StreamType::Attachment,
            StreamType::Subtitle,
        ]);

        assert_eq!(mapping.input_count(), 5);
        assert_eq!(mapping.output_count(), 3);
        assert_eq!(mapping.output_index(0), Some(0));
        assert_eq!(mapping.output_index(1), None);
        assert_eq!(mapping.output_index(2), Some(1));
        assert_eq!(mapping.output_index(3), None);
        assert_eq!(mapping.output_index(4), Some(2));
    }

    #[test]
    fn mapping_out_of_range_is_unmapped() {
        let mapping = StreamMapping::new([StreamType::Video]);
        assert_eq!(mapping.output_index(7), None);
        assert_eq!(
            mapping.iter().collect::<Vec<_>>(),
            vec![(0, Some(0))]
        );
    }

    #[test]
    fn stream_type_media_kinds() {
        assert!(StreamType::Subtitle.is_media());
        assert!(!StreamType::Data.is_media());
        assert_eq!(StreamType::Attachment.to_string(), "attachment");
    }
}
