/*!
    Encoded packet type.
*/

use crate::{MediaDuration, Pts, Rational, StreamType};

/**
    A unit of compressed data belonging to one stream.

    Timestamps are expressed in `time_base`, which is the time base of the
    stream the packet was read from.
*/
#[derive(Clone, Debug)]
pub struct Packet {
    pub data: Vec<u8>,
    pub pts: Option<Pts>,
    pub dts: Option<Pts>,
    pub duration: MediaDuration,
    pub time_base: Rational,
    pub is_keyframe: bool,
    /// Index of the stream inside the container it came from.
    pub stream_index: usize,
    pub stream_type: StreamType,
}

impl Packet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data: Vec<u8>,
        pts: Option<Pts>,
        dts: Option<Pts>,
        duration: MediaDuration,
        time_base: Rational,
        is_keyframe: bool,
        stream_index: usize,
        stream_type: StreamType,
    ) -> Self {
        Self {
            data,
            pts,
            dts,
            duration,
            time_base,
            is_keyframe,
            stream_index,
            stream_type,
        }
    }

    /**
        Returns a copy of this packet addressed to another stream index.
    */
    pub fn with_stream_index(mut self, stream_index: usize) -> Self {
        self.stream_index = stream_index;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
