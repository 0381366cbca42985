/*!
    Video decoder implementation.
*/

use ffmpeg_next::{
    codec::{self, decoder::Video as VideoDecoderFFmpeg},
    ffi,
    format::Pixel,
    software::scaling::{context::Context as ScalerContext, flag::Flags as ScalerFlags},
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::debug;

use ffmpeg_source::CodecConfig;
use ffmpeg_source::convert::{
    picture_type_from_ffmpeg, pixel_format_from_ffmpeg, pixel_format_to_ffmpeg,
};
use ffmpeg_types::{Error, Packet, PixelFormat, Pts, Rational, Result, VideoFrame, pack_rows};

/**
    Video decoder.

    Decodes video packets into frames. Frames are numbered from 1 in the
    order the decoder hands them out.

    Frames in a pixel format [`PixelFormat`] has no variant for (yuv411p,
    yuva420p, gray16, pal8, ...) are converted to the fallback format with
    swscale, [`PixelFormat::Yuv444p`] unless set otherwise.
*/
pub struct VideoDecoder {
    decoder: VideoDecoderFFmpeg,
    time_base: Rational,
    frames_decoded: u64,
    fallback_format: PixelFormat,
    converter: FrameConverter,
}

impl VideoDecoder {
    /**
        Create a new video decoder from codec configuration.

        # Arguments

        * `codec_config` - Codec configuration from the source
        * `time_base` - Time base for the video stream
    */
    pub fn new(codec_config: CodecConfig, time_base: Rational) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;

        let codec_id = codec_config.codec_id();
        let codec = ffmpeg_next::decoder::find(codec_id).ok_or_else(|| {
            Error::unsupported_format(format!("no decoder available for {:?}", codec_id))
        })?;

        let decoder_ctx = codec::context::Context::from_parameters(codec_config.into_parameters())
            .map_err(|e| Error::codec(e.to_string()))?;

        let decoder = decoder_ctx
            .decoder()
            .open_as(codec)
            .and_then(|opened| opened.video())
            .map_err(|e| Error::codec(format!("failed to open decoder: {}", e)))?;

        debug!(
            codec = codec.name(),
            width = decoder.width(),
            height = decoder.height(),
            format = ?decoder.format(),
            "opened video decoder"
        );

        Ok(Self {
            decoder,
            time_base,
            frames_decoded: 0,
            fallback_format: PixelFormat::Yuv444p,
            converter: FrameConverter::default(),
        })
    }

    /**
        Set the format frames are converted to when their own pixel format
        cannot be represented.
    */
    pub fn with_fallback_format(mut self, format: PixelFormat) -> Self {
        self.fallback_format = format;
        self
    }

    /**
        Get the time base for this decoder.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Number of frames received from the decoder so far.
    */
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /**
        Decode a packet, returning decoded frames.

        May return zero, one, or multiple frames depending on codec buffering.
        B-frames cause the decoder to buffer frames internally.
    */
    pub fn decode(&mut self, packet: &Packet) -> Result<Vec<VideoFrame>> {
        let mut ffmpeg_pkt = if packet.data.is_empty() {
            ffmpeg_next::Packet::empty()
        } else {
            ffmpeg_next::Packet::copy(&packet.data)
        };

        ffmpeg_pkt.set_pts(packet.pts.map(|p| p.0));
        ffmpeg_pkt.set_dts(packet.dts.map(|p| p.0));
        ffmpeg_pkt.set_duration(packet.duration.0);
        if packet.is_keyframe {
            ffmpeg_pkt.set_flags(ffmpeg_next::packet::Flags::KEY);
        }

        // EAGAIN means the decoder's output is full: drain it, then retry once
        match self.decoder.send_packet(&ffmpeg_pkt) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => {
                let mut all_frames = self.receive_frames()?;
                match self.decoder.send_packet(&ffmpeg_pkt) {
                    Ok(()) => all_frames.extend(self.receive_frames()?),
                    Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => {
                        return Err(Error::codec("decoder still full after draining"));
                    }
                    Err(e) => return Err(Error::codec(e.to_string())),
                }
                return Ok(all_frames);
            }
            Err(e) => return Err(Error::codec(e.to_string())),
        }

        self.receive_frames()
    }

    /**
        Flush the decoder to get any remaining buffered frames.

        Call this at end of stream to retrieve frames the decoder has buffered.
    */
    pub fn flush(&mut self) -> Result<Vec<VideoFrame>> {
        let mut all_frames = self.receive_frames()?;

        match self.decoder.send_eof() {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => {
                all_frames.extend(self.receive_frames()?);
                let _ = self.decoder.send_eof();
            }
            Err(ffmpeg_next::Error::Eof) => {}
            Err(e) => return Err(Error::codec(e.to_string())),
        }

        all_frames.extend(self.receive_frames()?);
        Ok(all_frames)
    }

    /**
        Receive all available frames from the decoder.
    */
    fn receive_frames(&mut self) -> Result<Vec<VideoFrame>> {
        let mut frames = Vec::new();
        let mut decoded_frame = VideoFrameFFmpeg::empty();

        loop {
            match self.decoder.receive_frame(&mut decoded_frame) {
                Ok(()) => {
                    self.frames_decoded += 1;
                    frames.push(self.convert_frame(&decoded_frame)?);
                }
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => break,
                Err(ffmpeg_next::Error::Eof) => break,
                Err(e) => return Err(Error::codec(format!("decoding failed: {}", e))),
            }
        }

        Ok(frames)
    }

    /**
        Convert an FFmpeg frame to our VideoFrame type.
    */
    fn convert_frame(&mut self, frame: &VideoFrameFFmpeg) -> Result<VideoFrame> {
        let width = frame.width();
        let height = frame.height();

        if width == 0 || height == 0 {
            return Err(Error::invalid_data("frame has zero dimensions"));
        }

        let (format, data) = match pixel_format_from_ffmpeg(frame.format()) {
            Some(format) => (format, copy_frame_data(frame, format)?),
            None => {
                let converted = self.converter.convert(frame, self.fallback_format)?;
                (
                    self.fallback_format,
                    copy_frame_data(&converted, self.fallback_format)?,
                )
            }
        };

        // SAFETY: reading a plain field of the AVFrame owned by `frame`
        let pkt_dts = unsafe { (*frame.as_ptr()).pkt_dts };

        let mut out = VideoFrame::new(
            data,
            width,
            height,
            format,
            frame.pts().map(Pts),
            self.time_base,
        );
        out.pkt_dts = (pkt_dts != ffi::AV_NOPTS_VALUE).then_some(Pts(pkt_dts));
        out.picture_type = picture_type_from_ffmpeg(frame.kind());
        out.is_keyframe = frame.is_key();
        out.frame_number = self.frames_decoded;
        Ok(out)
    }
}

/**
    Converts FFmpeg frames between pixel formats with swscale.

    The scaler is created on first use and recreated when the input format,
    size or target changes.
*/
#[derive(Default)]
struct FrameConverter {
    state: Option<ConverterState>,
}

struct ConverterState {
    context: ScalerContext,
    src_format: Pixel,
    dst_format: Pixel,
    width: u32,
    height: u32,
}

impl FrameConverter {
    fn convert(&mut self, frame: &VideoFrameFFmpeg, to: PixelFormat) -> Result<VideoFrameFFmpeg> {
        let (src_format, width, height) = (frame.format(), frame.width(), frame.height());
        let dst_format = pixel_format_to_ffmpeg(to);
        if src_format == Pixel::None || dst_format == Pixel::None {
            return Err(Error::unsupported_format(format!(
                "cannot convert {:?} to {:?}",
                src_format, to
            )));
        }

        let stale = self.state.as_ref().is_none_or(|state| {
            state.src_format != src_format
                || state.dst_format != dst_format
                || state.width != width
                || state.height != height
        });
        if stale {
            let context = ScalerContext::get(
                src_format,
                width,
                height,
                dst_format,
                width,
                height,
                ScalerFlags::BILINEAR,
            )
            .map_err(|e| {
                Error::unsupported_format(format!(
                    "no conversion from {:?} to {:?}: {}",
                    src_format, to, e
                ))
            })?;

            debug!(from = ?src_format, ?to, width, height, "converting decoder output");
            self.state = Some(ConverterState {
                context,
                src_format,
                dst_format,
                width,
                height,
            });
        }

        let state = self
            .state
            .as_mut()
            .ok_or_else(|| Error::codec("format converter not initialized"))?;

        let mut converted = VideoFrameFFmpeg::new(dst_format, width, height);
        state
            .context
            .run(frame, &mut converted)
            .map_err(|e| Error::codec(format!("pixel format conversion failed: {}", e)))?;
        Ok(converted)
    }
}

/**
    Copy every plane of an FFmpeg frame into a contiguous buffer, dropping
    stride padding.
*/
fn copy_frame_data(frame: &VideoFrameFFmpeg, format: PixelFormat) -> Result<Vec<u8>> {
    let layout = format.plane_layout(frame.width(), frame.height());
    let mut output = Vec::with_capacity(format.frame_len(frame.width(), frame.height()));

    for (plane, (row_bytes, rows)) in layout.into_iter().enumerate() {
        pack_rows(frame.data(plane), frame.stride(plane), row_bytes, rows, &mut output)?;
    }

    Ok(output)
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("time_base", &self.time_base)
            .field("frames_decoded", &self.frames_decoded)
            .field("fallback_format", &self.fallback_format)
            .finish_non_exhaustive()
    }
}
