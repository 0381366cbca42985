/*!
    Decoded frame types.
*/

use std::fmt;

use crate::{Error, PictureType, PixelFormat, Pts, Rational, Result};

/**
    A decoded video frame with tightly packed planes.

    Plane order and sizes follow [`PixelFormat::plane_layout`].
*/
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pts: Option<Pts>,
    /// DTS of the packet that produced this frame.
    pub pkt_dts: Option<Pts>,
    pub picture_type: PictureType,
    pub is_keyframe: bool,
    /// 1-based position of this frame in decoder output order.
    pub frame_number: u64,
    pub time_base: Rational,
}

impl VideoFrame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        format: PixelFormat,
        pts: Option<Pts>,
        time_base: Rational,
    ) -> Self {
        Self {
            data,
            width,
            height,
            format,
            pts,
            pkt_dts: None,
            picture_type: PictureType::None,
            is_keyframe: false,
            frame_number: 0,
            time_base,
        }
    }

    /**
        Borrow the leading 8-bit luma plane, if the format has one.
    */
    pub fn luma(&self) -> Option<LumaPlane> {
        let len = self.format.luma_plane_len(self.width, self.height)?;
        let data = self.data.get(..len)?;
        Some(LumaPlane {
            width: self.width,
            height: self.height,
            data: data.to_vec(),
        })
    }
}

impl fmt::Display for VideoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame {} ({}), pts {}, dts {}, key_frame {}",
            self.picture_type.as_char(),
            self.frame_number,
            TimestampDisplay(self.pts),
            TimestampDisplay(self.pkt_dts),
            u8::from(self.is_keyframe)
        )
    }
}

struct TimestampDisplay(Option<Pts>);

impl fmt::Display for TimestampDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(Pts(ts)) => write!(f, "{ts}"),
            None => f.write_str("N/A"),
        }
    }
}

/**
    A tightly packed 8-bit grayscale image.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaPlane {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl LumaPlane {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_data(format!(
                "luma plane of {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/**
    Copy `rows` rows of `row_bytes` bytes out of a strided buffer into a
    tightly packed one, appending to `out`.

    The last row only needs `row_bytes` bytes, not a full stride.
*/
pub fn pack_rows(
    src: &[u8],
    stride: usize,
    row_bytes: usize,
    rows: usize,
    out: &mut Vec<u8>,
) -> Result<()> {
    if rows == 0 || row_bytes == 0 {
        return Ok(());
    }
    if stride < row_bytes {
        return Err(Error::invalid_data(format!(
            "stride {stride} shorter than row of {row_bytes} bytes"
        )));
    }
    let needed = stride * (rows - 1) + row_bytes;
    if src.len() < needed {
        return Err(Error::invalid_data(format!(
            "plane has {} bytes, need {needed}",
            src.len()
        )));
    }

    out.reserve(row_bytes * rows);
    for row in src.chunks(stride).take(rows) {
        out.extend_from_slice(&row[..row_bytes]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_rows_drops_padding() {
        #[rustfmt::skip]
        let src = [
            1, 2, 3, 0xAA,
            4, 5, 6, 0xAA,
            7, 8, 9,
        ];
        let mut out = Vec::new();
        pack_rows(&src, 4, 3, 3, &mut out).unwrap();
        assert_eq!(out, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn pack_rows_rejects_short_source() {
        let mut out = Vec::new();
        let err = pack_rows(&[0; 10], 4, 3, 3, &mut out).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(pack_rows(&[0; 10], 2, 3, 1, &mut out).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn luma_is_leading_plane() {
        // 2x2 yuv420p: 4 luma bytes, then one U and one V byte
        let frame = VideoFrame::new(
            vec![10, 20, 30, 40, 128, 128],
            2,
            2,
            PixelFormat::Yuv420p,
            Some(Pts(0)),
            Rational::new(1, 25),
        );
        let luma = frame.luma().unwrap();
        assert_eq!(luma, LumaPlane::new(2, 2, vec![10, 20, 30, 40]).unwrap());
    }

    #[test]
    fn luma_unavailable_for_packed_rgb() {
        let frame = VideoFrame::new(
            vec![0; 12],
            2,
            2,
            PixelFormat::Rgb24,
            None,
            Rational::new(1, 25),
        );
        assert!(frame.luma().is_none());
    }

    #[test]
    fn luma_plane_checks_length() {
        assert!(LumaPlane::new(3, 2, vec![0; 5]).is_err());
    }

    #[test]
    fn frame_display() {
        let mut frame = VideoFrame::new(
            Vec::new(),
            0,
            0,
            PixelFormat::Yuv420p,
            Some(Pts(1024)),
            Rational::new(1, 12800),
        );
        frame.picture_type = PictureType::I;
        frame.frame_number = 1;
        frame.is_keyframe = true;
        assert_eq!(
            frame.to_string(),
            "Frame I (1), pts 1024, dts N/A, key_frame 1"
        );
    }
}
