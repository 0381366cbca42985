/*!
    Writing luma planes as grayscale image files.
*/

use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};

use ffmpeg_types::LumaPlane;

/**
    Grayscale image format for dumped frames.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ImageFormat {
    /// Binary portable graymap (`P5`, maxval 255).
    #[default]
    Pgm,
    /// 8-bit grayscale PNG.
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pgm => "pgm",
            Self::Png => "png",
        }
    }
}

/**
    Encode a luma plane in the given format.
*/
pub fn encode_luma(plane: &LumaPlane, format: ImageFormat) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(plane.data.len() + 32);

    match format {
        ImageFormat::Pgm => PnmEncoder::new(&mut bytes)
            .with_subtype(PnmSubtype::Graymap(SampleEncoding::Binary))
            .write_image(&plane.data, plane.width, plane.height, ExtendedColorType::L8),
        ImageFormat::Png => PngEncoder::new(&mut bytes).write_image(
            &plane.data,
            plane.width,
            plane.height,
            ExtendedColorType::L8,
        ),
    }
    .with_context(|| format!("failed to encode {}x{} frame", plane.width, plane.height))?;

    Ok(bytes)
}

/**
    Write a luma plane to `path`, replacing any existing file.
*/
pub fn save_luma(plane: &LumaPlane, path: &Path, format: ImageFormat) -> Result<()> {
    let bytes = encode_luma(plane, format)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
}
