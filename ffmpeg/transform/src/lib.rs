/*!
    Media frame transformation for the ffmpeg crate ecosystem.

    This crate turns decoded video frames into 8-bit grayscale images, reading
    the luma plane directly when the pixel format has one and converting
    through swscale otherwise.
*/

mod video;

pub use video::{LumaTransform, ScalingAlgorithm};
