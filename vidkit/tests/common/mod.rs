#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use ffmpeg_next::{
    Dictionary, Packet, Rational, codec, encoder, ffi, format, format::Pixel, frame, media,
};

pub const WIDTH: u32 = 64;
pub const HEIGHT: u32 = 48;
pub const AUDIO_RATE: i32 = 44100;

const FRAME_RATE: i32 = 25;

pub fn vidkit<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_vidkit"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run vidkit")
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("temporary paths are UTF-8")
}

pub fn count_files(dir: &Path, extension: &str) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some(extension))
        .count()
}

/**
    Write a clip with three streams: `frame_count` frames of MPEG-4 video,
    MP2 audio of about the same length, and a text attachment.

    Returns `Ok(false)` when either encoder is not built in.
*/
pub fn write_test_clip(path: &Path, frame_count: i64) -> Result<bool, ffmpeg_next::Error> {
    ffmpeg_next::init()?;

    let (Some(video_codec), Some(audio_codec)) = (
        encoder::find(codec::Id::MPEG4),
        encoder::find(codec::Id::MP2),
    ) else {
        return Ok(false);
    };

    let mut octx = format::output(path)?;
    let mut video = add_video(&mut octx, video_codec, Pixel::YUV420P)?;
    let mut audio = add_audio(&mut octx, audio_codec)?;
    add_text_attachment(&mut octx, "notes.txt", b"vidkit test clip\n")?;

    octx.write_header()?;
    video.route.read_stream_time_base(&octx);
    audio.route.read_stream_time_base(&octx);

    for i in 0..frame_count {
        video.encoder.send_frame(&video_frame(Pixel::YUV420P, i))?;
        video.route.write_encoded(&mut video.encoder, &mut octx)?;
    }
    video.encoder.send_eof()?;
    video.route.write_encoded(&mut video.encoder, &mut octx)?;

    // Whole MP2 frames covering the video
    let frame_size = audio.encoder.frame_size().max(1) as i64;
    let samples = frame_count * AUDIO_RATE as i64 / FRAME_RATE as i64;
    let mut pts = 0;
    while pts < samples {
        audio.encoder.send_frame(&silent_audio_frame(frame_size as usize, pts)?)?;
        audio.route.write_encoded(&mut audio.encoder, &mut octx)?;
        pts += frame_size;
    }
    audio.encoder.send_eof()?;
    audio.route.write_encoded(&mut audio.encoder, &mut octx)?;

    octx.write_trailer()?;
    Ok(true)
}

/**
    Write `frame_count` frames of uncompressed video in `pixel_format`.
    Use a container that stores raw video of any layout (e.g. `.nut`).
*/
pub fn write_raw_clip(
    path: &Path,
    frame_count: i64,
    pixel_format: Pixel,
) -> Result<bool, ffmpeg_next::Error> {
    ffmpeg_next::init()?;

    let Some(video_codec) = encoder::find(codec::Id::RAWVIDEO) else {
        return Ok(false);
    };

    let mut octx = format::output(path)?;
    let mut video = add_video(&mut octx, video_codec, pixel_format)?;

    octx.write_header()?;
    video.route.read_stream_time_base(&octx);

    for i in 0..frame_count {
        video.encoder.send_frame(&video_frame(pixel_format, i))?;
        video.route.write_encoded(&mut video.encoder, &mut octx)?;
    }
    video.encoder.send_eof()?;
    video.route.write_encoded(&mut video.encoder, &mut octx)?;

    octx.write_trailer()?;
    Ok(true)
}

struct Track<E> {
    encoder: E,
    route: Route,
}

/// Where an encoder's packets go, and the time bases on both sides.
struct Route {
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
}

impl Route {
    fn new(stream_index: usize, time_base: Rational) -> Self {
        Self {
            stream_index,
            encoder_time_base: time_base,
            stream_time_base: time_base,
        }
    }

    fn read_stream_time_base(&mut self, octx: &format::context::Output) {
        if let Some(stream) = octx.stream(self.stream_index) {
            self.stream_time_base = stream.time_base();
        }
    }

    fn write_encoded(
        &self,
        encoder: &mut encoder::Encoder,
        octx: &mut format::context::Output,
    ) -> Result<(), ffmpeg_next::Error> {
        let mut packet = Packet::empty();
        while encoder.receive_packet(&mut packet).is_ok() {
            packet.set_stream(self.stream_index);
            packet.rescale_ts(self.encoder_time_base, self.stream_time_base);
            packet.write_interleaved(octx)?;
        }
        Ok(())
    }
}

fn add_video(
    octx: &mut format::context::Output,
    codec: ffmpeg_next::Codec,
    pixel_format: Pixel,
) -> Result<Track<encoder::video::Encoder>, ffmpeg_next::Error> {
    let time_base = Rational::new(1, FRAME_RATE);

    // No global header: codec headers stay in-band, so a stream copy into
    // any container still decodes
    let mut video = codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()?;
    video.set_width(WIDTH);
    video.set_height(HEIGHT);
    video.set_format(pixel_format);
    video.set_time_base(time_base);
    video.set_frame_rate(Some(Rational::new(FRAME_RATE, 1)));
    video.set_gop(5);
    let encoder = video.open_as(codec)?;

    let mut stream = octx.add_stream(codec)?;
    stream.set_parameters(&encoder);
    stream.set_time_base(time_base);

    Ok(Track {
        route: Route::new(stream.index(), time_base),
        encoder,
    })
}

fn add_audio(
    octx: &mut format::context::Output,
    codec: ffmpeg_next::Codec,
) -> Result<Track<encoder::audio::Encoder>, ffmpeg_next::Error> {
    let time_base = Rational::new(1, AUDIO_RATE);

    let mut audio = codec::context::Context::new_with_codec(codec)
        .encoder()
        .audio()?;
    audio.set_rate(AUDIO_RATE);
    audio.set_format(format::Sample::I16(format::sample::Type::Packed));
    audio.set_bit_rate(64_000);
    audio.set_time_base(time_base);
    // SAFETY: the context is not opened yet, its channel layout is ours to set
    unsafe {
        ffi::av_channel_layout_default(&mut (*audio.as_mut_ptr()).ch_layout, 1);
    }
    let encoder = audio.open_as(codec)?;

    let mut stream = octx.add_stream(codec)?;
    stream.set_parameters(&encoder);
    stream.set_time_base(time_base);

    Ok(Track {
        route: Route::new(stream.index(), time_base),
        encoder,
    })
}

fn add_text_attachment(
    octx: &mut format::context::Output,
    filename: &str,
    contents: &[u8],
) -> Result<(), ffmpeg_next::Error> {
    let mut stream = octx.add_stream(encoder::find(codec::Id::None))?;

    let mut metadata = Dictionary::new();
    metadata.set("filename", filename);
    metadata.set("mimetype", "text/plain");
    stream.set_metadata(metadata);

    // SAFETY: the parameters belong to the stream just added; the extradata
    // buffer is allocated with av_mallocz so the stream frees it
    unsafe {
        let parameters = stream.parameters().as_mut_ptr();
        (*parameters).codec_type = ffi::AVMediaType::AVMEDIA_TYPE_ATTACHMENT;
        (*parameters).codec_id = ffi::AVCodecID::AV_CODEC_ID_TEXT;

        let padding = ffi::AV_INPUT_BUFFER_PADDING_SIZE as usize;
        let extradata = ffi::av_mallocz(contents.len() + padding) as *mut u8;
        assert!(!extradata.is_null(), "out of memory");
        std::ptr::copy_nonoverlapping(contents.as_ptr(), extradata, contents.len());
        (*parameters).extradata = extradata;
        (*parameters).extradata_size = contents.len() as i32;
    }

    Ok(())
}

/// A moving gradient in the first plane, mid grey in the others.
fn video_frame(pixel_format: Pixel, index: i64) -> frame::Video {
    let mut picture = frame::Video::new(pixel_format, WIDTH, HEIGHT);
    for plane in 0..picture.planes() {
        let stride = picture.stride(plane);
        let cols = picture.plane_width(plane) as usize;
        let rows = picture.plane_height(plane) as usize;
        let data = picture.data_mut(plane);
        for y in 0..rows {
            for x in 0..cols {
                data[y * stride + x] = if plane == 0 {
                    ((x + y) * 2 + index as usize * 8) as u8
                } else {
                    128
                };
            }
        }
    }
    picture.set_pts(Some(index));
    picture
}

fn silent_audio_frame(samples: usize, pts: i64) -> Result<frame::Audio, ffmpeg_next::Error> {
    let mut audio = frame::Audio::empty();
    // SAFETY: describing and allocating a frame we own
    unsafe {
        let ptr = audio.as_mut_ptr();
        (*ptr).format = ffi::AVSampleFormat::AV_SAMPLE_FMT_S16 as i32;
        (*ptr).nb_samples = samples as i32;
        (*ptr).sample_rate = AUDIO_RATE;
        ffi::av_channel_layout_default(&mut (*ptr).ch_layout, 1);
        let ret = ffi::av_frame_get_buffer(ptr, 0);
        if ret < 0 {
            return Err(ffmpeg_next::Error::from(ret));
        }
    }
    audio.data_mut(0).fill(0);
    audio.set_pts(Some(pts));
    Ok(audio)
}

/**
    Packets of one stream of a container, in demux order.
*/
#[derive(Debug)]
pub struct StreamPackets {
    pub medium: media::Type,
    pub time_base: Rational,
    pub dts: Vec<Option<i64>>,
}

impl StreamPackets {
    /// Decoding timestamps relative to the first packet.
    pub fn relative_dts(&self) -> Vec<i64> {
        let dts: Vec<i64> = self.dts.iter().map(|d| d.expect("packet without dts")).collect();
        let first = dts.first().copied().unwrap_or(0);
        dts.iter().map(|d| d - first).collect()
    }
}

pub fn read_packets(path: &Path) -> Result<Vec<StreamPackets>, ffmpeg_next::Error> {
    ffmpeg_next::init()?;

    let mut ictx = format::input(path)?;
    let mut streams: Vec<StreamPackets> = ictx
        .streams()
        .map(|s| StreamPackets {
            medium: s.parameters().medium(),
            time_base: s.time_base(),
            dts: Vec::new(),
        })
        .collect();

    loop {
        let mut packet = Packet::empty();
        match packet.read(&mut ictx) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => break,
            Err(e) => return Err(e),
        }
        if let Some(stream) = streams.get_mut(packet.stream()) {
            stream.dts.push(packet.dts());
        }
    }

    Ok(streams)
}

pub fn stream_of(streams: &[StreamPackets], medium: media::Type) -> &StreamPackets {
    streams
        .iter()
        .find(|s| s.medium == medium)
        .unwrap_or_else(|| panic!("no {medium:?} stream"))
}
