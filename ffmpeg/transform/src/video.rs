/*!
    Grayscale extraction from video frames.
*/

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{context::Context as ScalerContext, flag::Flags as ScalerFlags},
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::debug;

use ffmpeg_source::convert::pixel_format_to_ffmpeg;
use ffmpeg_types::{Error, LumaPlane, PixelFormat, Result, VideoFrame, pack_rows};

/**
    Scaling algorithm used when a frame has to go through swscale.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Nearest neighbor - fastest, lowest quality.
    Nearest,
    /// Bilinear interpolation - fast, acceptable quality.
    #[default]
    Bilinear,
    /// Bicubic interpolation - moderate speed, good quality.
    Bicubic,
}

impl ScalingAlgorithm {
    fn to_ffmpeg_flags(self) -> ScalerFlags {
        match self {
            Self::Nearest => ScalerFlags::POINT,
            Self::Bilinear => ScalerFlags::BILINEAR,
            Self::Bicubic => ScalerFlags::BICUBIC,
        }
    }
}

/**
    Extracts the luma (Y) plane of video frames as 8-bit grayscale.

    Formats whose first plane is 8-bit luma are sliced without conversion.
    Anything else (packed RGB, 10-bit YUV) is converted to GRAY8 with
    swscale. The scaler context is lazily initialized on first use and
    reinitialized if the input format or size changes.
*/
#[derive(Default)]
pub struct LumaTransform {
    algorithm: ScalingAlgorithm,
    scaler_state: Option<ScalerState>,
}

struct ScalerState {
    context: ScalerContext,
    src_width: u32,
    src_height: u32,
    src_format: PixelFormat,
}

impl LumaTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Set the scaling algorithm used for converted formats.
    */
    pub fn with_algorithm(mut self, algorithm: ScalingAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /**
        Returns true once a swscale context has been created.
    */
    pub fn uses_scaler(&self) -> bool {
        self.scaler_state.is_some()
    }

    /**
        Extract the luma plane of a frame.
    */
    pub fn extract(&mut self, frame: &VideoFrame) -> Result<LumaPlane> {
        if frame.width == 0 || frame.height == 0 {
            return Err(Error::invalid_data("input frame has zero dimensions"));
        }

        let expected = frame.format.frame_len(frame.width, frame.height);
        if frame.data.len() < expected {
            return Err(Error::invalid_data(format!(
                "frame data has {} bytes, {:?} {}x{} needs {}",
                frame.data.len(),
                frame.format,
                frame.width,
                frame.height,
                expected
            )));
        }

        if let Some(luma) = frame.luma() {
            return Ok(luma);
        }

        let needs_init = match &self.scaler_state {
            None => true,
            Some(state) => {
                state.src_width != frame.width
                    || state.src_height != frame.height
                    || state.src_format != frame.format
            }
        };

        if needs_init {
            self.init_scaler(frame.width, frame.height, frame.format)?;
        }

        self.scale_frame(frame)
    }

    fn init_scaler(&mut self, width: u32, height: u32, format: PixelFormat) -> Result<()> {
        let src_pixel = pixel_format_to_ffmpeg(format);
        if src_pixel == Pixel::None {
            return Err(Error::unsupported_format(format!(
                "pixel format {:?} cannot be converted",
                format
            )));
        }

        let context = ScalerContext::get(
            src_pixel,
            width,
            height,
            Pixel::GRAY8,
            width,
            height,
            self.algorithm.to_ffmpeg_flags(),
        )
        .map_err(|e| Error::codec(format!("failed to create scaler: {}", e)))?;

        debug!(?format, width, height, "created grayscale scaler");

        self.scaler_state = Some(ScalerState {
            context,
            src_width: width,
            src_height: height,
            src_format: format,
        });

        Ok(())
    }

    fn scale_frame(&mut self, frame: &VideoFrame) -> Result<LumaPlane> {
        let state = self
            .scaler_state
            .as_mut()
            .ok_or_else(|| Error::codec("scaler not initialized"))?;

        let mut src_frame =
            VideoFrameFFmpeg::new(pixel_format_to_ffmpeg(frame.format), frame.width, frame.height);
        copy_data_to_ffmpeg_frame(&mut src_frame, frame);

        let mut dst_frame = VideoFrameFFmpeg::new(Pixel::GRAY8, frame.width, frame.height);

        state
            .context
            .run(&src_frame, &mut dst_frame)
            .map_err(|e| Error::codec(format!("scaling failed: {}", e)))?;

        let mut data = Vec::new();
        pack_rows(
            dst_frame.data(0),
            dst_frame.stride(0),
            frame.width as usize,
            frame.height as usize,
            &mut data,
        )?;

        LumaPlane::new(frame.width, frame.height, data)
    }
}

/**
    Copy the packed planes of our VideoFrame into a strided FFmpeg frame.

    The caller has checked that `src.data` holds a full frame.
*/
fn copy_data_to_ffmpeg_frame(dst: &mut VideoFrameFFmpeg, src: &VideoFrame) {
    let mut offset = 0;
    for (plane, (row_bytes, rows)) in src
        .format
        .plane_layout(src.width, src.height)
        .into_iter()
        .enumerate()
    {
        let stride = dst.stride(plane);
        let dst_data = dst.data_mut(plane);
        for row in 0..rows {
            let dst_start = row * stride;
            dst_data[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.data[offset..offset + row_bytes]);
            offset += row_bytes;
        }
    }
}

impl std::fmt::Debug for LumaTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LumaTransform")
            .field("algorithm", &self.algorithm)
            .field("initialized", &self.scaler_state.is_some())
            .finish()
    }
}
