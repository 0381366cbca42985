/*!
    Sink configuration.
*/

use ffmpeg_source::CodecConfig;
use ffmpeg_types::Rational;

/**
    One output stream, declared as a copy of a source stream.
*/
#[derive(Clone, Debug)]
pub struct SinkStream {
    /// Codec parameters copied verbatim into the output stream.
    pub codec: CodecConfig,
    /// Time base of the packets that will be written; a hint for the muxer.
    pub time_base: Rational,
}

impl SinkStream {
    pub fn copy_of(codec: CodecConfig, time_base: Rational) -> Self {
        Self { codec, time_base }
    }
}

/**
    Configuration for creating a [`crate::Sink`].
*/
#[derive(Clone, Debug, Default)]
pub struct SinkConfig {
    /// Muxer short name (e.g. `mpegts`). Guessed from the file name when `None`.
    pub format: Option<String>,
    /// Output streams, in output index order.
    pub streams: Vec<SinkStream>,
    /// Muxer options passed when writing the header (e.g. `movflags`).
    pub options: Vec<(String, String)>,
}

impl SinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Force a container format instead of guessing it from the file name.
    */
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /**
        Append an output stream. Its output index is its position in the list.
    */
    pub fn with_stream(mut self, stream: SinkStream) -> Self {
        self.streams.push(stream);
        self
    }

    /**
        Add a muxer option.
    */
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), value.into()));
        self
    }
}
