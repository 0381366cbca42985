/*!
    Opaque codec configuration for passing to decoders and muxers.
*/

use ffmpeg_next::codec;

use ffmpeg_types::StreamType;

use crate::convert::stream_type_from_ffmpeg;

/**
    Opaque codec configuration extracted from a source stream.

    This holds the codec parameters needed to create a decoder for the stream
    or to declare an identical stream in an output container.
*/
pub struct CodecConfig {
    parameters: codec::Parameters,
}

impl CodecConfig {
    pub(crate) fn new(parameters: codec::Parameters) -> Self {
        Self { parameters }
    }

    pub fn stream_type(&self) -> StreamType {
        stream_type_from_ffmpeg(self.parameters.medium())
    }

    pub fn codec_id(&self) -> codec::Id {
        self.parameters.id()
    }

    pub fn parameters(&self) -> &codec::Parameters {
        &self.parameters
    }

    pub fn into_parameters(self) -> codec::Parameters {
        self.parameters
    }
}

impl Clone for CodecConfig {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
        }
    }
}

impl std::fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecConfig")
            .field("codec_id", &self.parameters.id())
            .field("medium", &self.parameters.medium())
            .finish_non_exhaustive()
    }
}
