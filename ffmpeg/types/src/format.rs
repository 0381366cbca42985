/*!
    Pixel format and picture type vocabulary.
*/

/**
    Video pixel formats.

    This is the subset of formats the decoder hands out as [`crate::VideoFrame`]s.
    Not all FFmpeg pixel formats are represented.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Planar YUV 4:2:0, 10-bit little-endian (HDR content)
    Yuv420p10,
    /// Semi-planar YUV 4:2:0, 12bpp (common hardware decoder output)
    Nv12,
    /// Semi-planar YUV 4:2:0, 10-bit little-endian
    P010le,
    /// Single 8-bit luma plane
    Gray8,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed BGRA, 32bpp
    Bgra,
}

impl PixelFormat {
    /**
        Returns the number of bits per pixel for this format.

        For planar formats, this is the average bits per pixel.
    */
    pub const fn bits_per_pixel(self) -> u32 {
        match self {
            Self::Gray8 => 8,
            Self::Yuv420p | Self::Nv12 => 12,
            Self::Yuv420p10 | Self::P010le => 15,
            Self::Yuv422p => 16,
            Self::Rgb24 | Self::Bgr24 | Self::Yuv444p => 24,
            Self::Bgra | Self::Rgba => 32,
        }
    }

    /**
        Returns true if this is a planar (or semi-planar) format.
    */
    pub const fn is_planar(self) -> bool {
        match self {
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p | Self::Yuv420p10 => true,
            Self::Nv12 | Self::P010le | Self::Gray8 => true,
            Self::Bgra | Self::Rgba | Self::Rgb24 | Self::Bgr24 => false,
        }
    }

    /**
        Row width in bytes and row count of each plane, in storage order.

        Chroma planes of subsampled formats round up for odd dimensions.
    */
    pub fn plane_layout(self, width: u32, height: u32) -> Vec<(usize, usize)> {
        let w = width as usize;
        let h = height as usize;
        let cw = w.div_ceil(2);
        let ch = h.div_ceil(2);

        match self {
            Self::Yuv420p => vec![(w, h), (cw, ch), (cw, ch)],
            Self::Yuv422p => vec![(w, h), (cw, h), (cw, h)],
            Self::Yuv444p => vec![(w, h), (w, h), (w, h)],
            Self::Yuv420p10 => vec![(w * 2, h), (cw * 2, ch), (cw * 2, ch)],
            Self::Nv12 => vec![(w, h), (cw * 2, ch)],
            Self::P010le => vec![(w * 2, h), (cw * 4, ch)],
            Self::Gray8 => vec![(w, h)],
            Self::Rgb24 | Self::Bgr24 => vec![(w * 3, h)],
            Self::Rgba | Self::Bgra => vec![(w * 4, h)],
        }
    }

    /**
        Total bytes of a tightly packed frame of this format.
    */
    pub fn frame_len(self, width: u32, height: u32) -> usize {
        self.plane_layout(width, height)
            .iter()
            .map(|(row_bytes, rows)| row_bytes * rows)
            .sum()
    }

    /**
        Length of the 8-bit luma plane that leads a packed frame of this format.

        Returns `None` for formats that do not start with one (packed RGB,
        high bit depth YUV); those need a conversion to get grayscale.
    */
    pub fn luma_plane_len(self, width: u32, height: u32) -> Option<usize> {
        match self {
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p | Self::Nv12 | Self::Gray8 => {
                Some(width as usize * height as usize)
            }
            _ => None,
        }
    }
}

/**
    Picture type of a decoded frame.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PictureType {
    #[default]
    None,
    /// Intra
    I,
    /// Predicted
    P,
    /// Bi-directionally predicted
    B,
    /// S(GMC)-VOP MPEG-4
    S,
    /// Switching intra
    Si,
    /// Switching predicted
    Sp,
    /// BI type
    Bi,
}

impl PictureType {
    /**
        The single-letter code FFmpeg uses when printing picture types.
    */
    pub const fn as_char(self) -> char {
        match self {
            Self::None => '?',
            Self::I => 'I',
            Self::P => 'P',
            Self::B => 'B',
            Self::S => 'S',
            Self::Si => 'i',
            Self::Sp => 'p',
            Self::Bi => 'b',
        }
    }
}
