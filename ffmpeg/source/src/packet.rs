/*!
    Demuxed packets that keep their FFmpeg representation.
*/

use ffmpeg_types::{Packet, Pts, Rational, StreamType};

use crate::convert::{duration_from_ffmpeg, pts_from_ffmpeg};

/**
    A packet as read from the container.

    Unlike [`Packet`], this keeps the demuxer's `AVPacket` whole: side data
    (new extradata, skip samples) and every flag travel with it, so a muxer
    can write it back out unchanged apart from its timestamps and index.
*/
pub struct SourcePacket {
    packet: ffmpeg_next::Packet,
    time_base: Rational,
    stream_type: StreamType,
}

impl SourcePacket {
    pub(crate) fn new(
        packet: ffmpeg_next::Packet,
        time_base: Rational,
        stream_type: StreamType,
    ) -> Self {
        Self {
            packet,
            time_base,
            stream_type,
        }
    }

    /// Index of the stream inside the source container.
    pub fn stream_index(&self) -> usize {
        self.packet.stream()
    }

    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }

    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    pub fn pts(&self) -> Option<Pts> {
        pts_from_ffmpeg(self.packet.pts())
    }

    pub fn dts(&self) -> Option<Pts> {
        pts_from_ffmpeg(self.packet.dts())
    }

    pub fn is_keyframe(&self) -> bool {
        self.packet.is_key()
    }

    pub fn packet(&self) -> &ffmpeg_next::Packet {
        &self.packet
    }

    pub fn into_inner(self) -> ffmpeg_next::Packet {
        self.packet
    }

    /**
        Copy the payload and timing out into an FFmpeg-free [`Packet`].
    */
    pub fn to_packet(&self) -> Packet {
        Packet::new(
            self.packet.data().map(|d| d.to_vec()).unwrap_or_default(),
            self.pts(),
            self.dts(),
            duration_from_ffmpeg(self.packet.duration()),
            self.time_base,
            self.is_keyframe(),
            self.stream_index(),
            self.stream_type,
        )
    }
}

impl std::fmt::Debug for SourcePacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourcePacket")
            .field("stream_index", &self.stream_index())
            .field("stream_type", &self.stream_type)
            .field("pts", &self.pts())
            .field("dts", &self.dts())
            .field("size", &self.packet.size())
            .finish_non_exhaustive()
    }
}
