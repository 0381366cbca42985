/*!
    Media sink implementation.
*/

use std::path::Path;

use ffmpeg_next::{Dictionary, codec, format::context::Output as OutputContext};
use tracing::debug;

use ffmpeg_source::SourcePacket;
use ffmpeg_source::convert::{rational_from_ffmpeg, rational_to_ffmpeg};
use ffmpeg_types::{Error, Rational, Result, Rounding, rescale};

use crate::config::SinkConfig;

/**
    Media sink for writing to container files.

    Takes encoded packets and writes them into a container format (MPEG-TS,
    MP4, MKV, etc.) without re-encoding.
*/
pub struct Sink {
    output: OutputContext,
    /// Time base of each output stream, as chosen by the muxer.
    time_bases: Vec<Rational>,
    /// Packets written, per output stream.
    packets_written: Vec<u64>,
}

impl Sink {
    /**
        Create a new sink that writes to a file.

        Declares every configured stream, opens the file and writes the
        container header.
    */
    pub fn file<P: AsRef<Path>>(path: P, config: SinkConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;

        let path = path.as_ref();

        let mut output = match config.format.as_deref() {
            Some(format) => ffmpeg_next::format::output_as(path, format),
            None => ffmpeg_next::format::output(path),
        }
        .map_err(|e| {
            Error::codec(format!(
                "failed to create output {}: {}",
                path.display(),
                e
            ))
        })?;

        for stream in &config.streams {
            let mut out_stream = output
                .add_stream(ffmpeg_next::encoder::find(codec::Id::None))
                .map_err(|e| Error::codec(format!("failed to add output stream: {}", e)))?;

            out_stream.set_parameters(stream.codec.parameters().clone());

            // The source container's codec tag may mean nothing to this muxer
            // SAFETY: writing a plain field of the stream's AVCodecParameters
            unsafe {
                (*out_stream.parameters().as_mut_ptr()).codec_tag = 0;
            }

            out_stream.set_time_base(rational_to_ffmpeg(stream.time_base));
        }

        let mut opts = Dictionary::new();
        for (key, value) in &config.options {
            opts.set(key, value);
        }

        output
            .write_header_with(opts)
            .map_err(|e| Error::codec(format!("failed to write header: {}", e)))?;

        // Muxers are free to replace the requested time bases while writing the header
        let time_bases: Vec<Rational> = output
            .streams()
            .map(|s| rational_from_ffmpeg(s.time_base()))
            .collect();

        debug!(
            path = %path.display(),
            format = output.format().name(),
            streams = time_bases.len(),
            "wrote container header"
        );

        let packets_written = vec![0; time_bases.len()];

        Ok(Self {
            output,
            time_bases,
            packets_written,
        })
    }

    /**
        Time base the muxer chose for an output stream.
    */
    pub fn stream_time_base(&self, index: usize) -> Option<Rational> {
        self.time_bases.get(index).copied()
    }

    pub fn stream_count(&self) -> usize {
        self.time_bases.len()
    }

    /**
        Total packets written across all output streams.
    */
    pub fn packets_written(&self) -> u64 {
        self.packets_written.iter().sum()
    }

    /**
        Packets written to one output stream.
    */
    pub fn stream_packets_written(&self, index: usize) -> Option<u64> {
        self.packets_written.get(index).copied()
    }

    /**
        Write a demuxed packet to output stream `output_index`.

        Timestamps are rescaled from the packet's source time base to the
        output stream's time base and the byte position is reset. Payload,
        side data and flags are written as they were read.
    */
    pub fn write(&mut self, packet: SourcePacket, output_index: usize) -> Result<()> {
        let stream_time_base = self.stream_time_base(output_index).ok_or_else(|| {
            Error::invalid_data(format!(
                "no output stream {} (sink has {})",
                output_index,
                self.time_bases.len()
            ))
        })?;

        let source_time_base = packet.time_base();
        let mut ffmpeg_pkt = packet.into_inner();

        let timing = PacketTiming::rescaled(
            ffmpeg_pkt.pts(),
            ffmpeg_pkt.dts(),
            ffmpeg_pkt.duration(),
            source_time_base,
            stream_time_base,
        );

        ffmpeg_pkt.set_stream(output_index);
        ffmpeg_pkt.set_pts(timing.pts);
        ffmpeg_pkt.set_dts(timing.dts);
        ffmpeg_pkt.set_duration(timing.duration);

        // Byte offsets in the source file mean nothing in the output
        ffmpeg_pkt.set_position(-1);

        write_interleaved(&mut self.output, &mut ffmpeg_pkt)?;

        if let Some(count) = self.packets_written.get_mut(output_index) {
            *count += 1;
        }
        Ok(())
    }

    /**
        Finish writing and close the sink.

        This writes any trailing metadata (duration, seeking index) and
        finalizes the container. The file may be corrupt if this is not called.
    */
    pub fn finish(mut self) -> Result<()> {
        self.output
            .write_trailer()
            .map_err(|e| Error::codec(format!("failed to write trailer: {}", e)))?;

        debug!(packets = self.packets_written(), "wrote container trailer");
        Ok(())
    }
}

/**
    Timestamps of a packet expressed in an output stream's time base.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PacketTiming {
    pts: Option<i64>,
    dts: Option<i64>,
    duration: i64,
}

impl PacketTiming {
    /**
        Presentation and decoding timestamps round away from zero, durations
        to the nearest unit. Missing timestamps stay missing.
    */
    fn rescaled(
        pts: Option<i64>,
        dts: Option<i64>,
        duration: i64,
        from: Rational,
        to: Rational,
    ) -> Self {
        Self {
            pts: pts.map(|ts| rescale(ts, from, to, Rounding::Inf)),
            dts: dts.map(|ts| rescale(ts, from, to, Rounding::Inf)),
            duration: rescale(duration, from, to, Rounding::NearInf),
        }
    }
}

/**
    Hand a packet to the interleaving muxer.

    `ffmpeg_next::Packet::write_interleaved` refuses packets without payload,
    so those (side data only) go through the C call directly.
*/
fn write_interleaved(output: &mut OutputContext, packet: &mut ffmpeg_next::Packet) -> Result<()> {
    if !packet.is_empty() {
        return packet
            .write_interleaved(output)
            .map_err(|e| Error::codec(format!("failed to write packet: {}", e)));
    }

    // SAFETY: both pointers come from live wrappers, the muxer takes over the
    // packet's references and leaves it blank
    let ret = unsafe {
        ffmpeg_next::ffi::av_interleaved_write_frame(output.as_mut_ptr(), packet.as_mut_ptr())
    };
    if ret < 0 {
        return Err(Error::codec(format!(
            "failed to write packet: {}",
            ffmpeg_next::Error::from(ret)
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("time_bases", &self.time_bases)
            .field("packets_written", &self.packets_written)
            .finish_non_exhaustive()
    }
}
