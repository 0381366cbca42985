/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use ffmpeg_next::{format::Pixel, media::Type, picture};

use ffmpeg_types::{MediaDuration, PictureType, PixelFormat, Pts, Rational, StreamType};

/**
    Convert ffmpeg_next::Rational to our Rational.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

/**
    Convert our Rational to ffmpeg_next::Rational.
*/
pub fn rational_to_ffmpeg(r: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(r.num, r.den)
}

/**
    Convert ffmpeg_next pixel format to our PixelFormat.

    Full-range (JPEG) YUV variants share the memory layout of their
    limited-range counterparts and map onto them.
*/
pub fn pixel_format_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    match format {
        Pixel::YUV420P | Pixel::YUVJ420P => Some(PixelFormat::Yuv420p),
        Pixel::YUV422P | Pixel::YUVJ422P => Some(PixelFormat::Yuv422p),
        Pixel::YUV444P | Pixel::YUVJ444P => Some(PixelFormat::Yuv444p),
        Pixel::YUV420P10LE => Some(PixelFormat::Yuv420p10),
        Pixel::NV12 => Some(PixelFormat::Nv12),
        Pixel::P010LE => Some(PixelFormat::P010le),
        Pixel::GRAY8 => Some(PixelFormat::Gray8),
        Pixel::RGB24 => Some(PixelFormat::Rgb24),
        Pixel::BGR24 => Some(PixelFormat::Bgr24),
        Pixel::RGBA => Some(PixelFormat::Rgba),
        Pixel::BGRA => Some(PixelFormat::Bgra),
        _ => None,
    }
}

/**
    Convert our PixelFormat to ffmpeg_next's pixel format.
*/
pub fn pixel_format_to_ffmpeg(format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Yuv420p => Pixel::YUV420P,
        PixelFormat::Yuv422p => Pixel::YUV422P,
        PixelFormat::Yuv444p => Pixel::YUV444P,
        PixelFormat::Yuv420p10 => Pixel::YUV420P10LE,
        PixelFormat::Nv12 => Pixel::NV12,
        PixelFormat::P010le => Pixel::P010LE,
        PixelFormat::Gray8 => Pixel::GRAY8,
        PixelFormat::Rgb24 => Pixel::RGB24,
        PixelFormat::Bgr24 => Pixel::BGR24,
        PixelFormat::Rgba => Pixel::RGBA,
        PixelFormat::Bgra => Pixel::BGRA,
        _ => Pixel::None,
    }
}

pub fn stream_type_from_ffmpeg(medium: Type) -> StreamType {
    match medium {
        Type::Video => StreamType::Video,
        Type::Audio => StreamType::Audio,
        Type::Subtitle => StreamType::Subtitle,
        Type::Data => StreamType::Data,
        Type::Attachment => StreamType::Attachment,
        Type::Unknown => StreamType::Unknown,
    }
}

pub fn picture_type_from_ffmpeg(kind: picture::Type) -> PictureType {
    match kind {
        picture::Type::I => PictureType::I,
        picture::Type::P => PictureType::P,
        picture::Type::B => PictureType::B,
        picture::Type::S => PictureType::S,
        picture::Type::SI => PictureType::Si,
        picture::Type::SP => PictureType::Sp,
        picture::Type::BI => PictureType::Bi,
        picture::Type::None => PictureType::None,
    }
}

/**
    Create a Pts from an optional i64 timestamp.
*/
pub fn pts_from_ffmpeg(pts: Option<i64>) -> Option<Pts> {
    pts.map(Pts)
}

/**
    Create a MediaDuration from an i64 duration.
*/
pub fn duration_from_ffmpeg(duration: i64) -> MediaDuration {
    MediaDuration(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jpeg_range_formats_share_layout() {
        assert_eq!(
            pixel_format_from_ffmpeg(Pixel::YUVJ420P),
            Some(PixelFormat::Yuv420p)
        );
        assert_eq!(pixel_format_from_ffmpeg(Pixel::PAL8), None);
    }

    #[test]
    fn pixel_format_round_trip() {
        for format in [PixelFormat::Yuv420p, PixelFormat::Gray8, PixelFormat::P010le] {
            assert_eq!(
                pixel_format_from_ffmpeg(pixel_format_to_ffmpeg(format)),
                Some(format)
            );
        }
    }

    #[test]
    fn media_types() {
        assert_eq!(stream_type_from_ffmpeg(Type::Subtitle), StreamType::Subtitle);
        assert_eq!(stream_type_from_ffmpeg(Type::Data), StreamType::Data);
    }

    #[test]
    fn picture_types() {
        assert_eq!(picture_type_from_ffmpeg(picture::Type::B), PictureType::B);
        assert_eq!(
            picture_type_from_ffmpeg(picture::Type::None).as_char(),
            '?'
        );
    }
}
