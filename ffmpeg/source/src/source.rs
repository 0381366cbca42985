/*!
    Media source implementation.
*/

use std::path::Path;

use ffmpeg_next::{format::context::Input as InputContext, media::Type};
use tracing::{debug, trace};

use ffmpeg_types::{Error, MediaInfo, Packet, Rational, Result, StreamType};

use crate::codec_config::CodecConfig;
use crate::convert::{rational_from_ffmpeg, stream_type_from_ffmpeg};
use crate::packet::SourcePacket;
use crate::probe::{extract_media_info, open_input};

/**
    Configuration for opening a media source.
*/
#[derive(Clone, Debug, Default)]
pub struct SourceConfig {
    /// Which streams to demux.
    pub stream_filter: StreamFilter,
}

impl SourceConfig {
    pub fn with_stream_filter(mut self, stream_filter: StreamFilter) -> Self {
        self.stream_filter = stream_filter;
        self
    }
}

/**
    Filter for selecting which streams to demux.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamFilter {
    /// Only the best video stream.
    VideoOnly,
    /// Only the best audio stream.
    AudioOnly,
    /// The best video and the best audio stream.
    #[default]
    Both,
    /// Every audio, video and subtitle stream.
    AllMedia,
}

/**
    A selected stream and what downstream crates need to consume it.
*/
#[derive(Clone, Debug)]
struct SelectedStream {
    stream_type: StreamType,
    time_base: Rational,
    codec_config: CodecConfig,
}

/**
    A media source that produces encoded packets.

    Created by [`Source::open`]. Provides access to stream
    information and produces packets via iteration.
*/
pub struct Source {
    input: InputContext,
    media_info: MediaInfo,
    /// Indexed by container stream index, `None` for streams not selected.
    selected: Vec<Option<SelectedStream>>,
    packets_skipped: u64,
}

impl Source {
    /**
        Open a media file.

        # Example

        ```ignore
        let source = Source::open("video.mp4", SourceConfig::default())?;
        println!("{}", source.media_info());
        ```
    */
    pub fn open<P: AsRef<Path>>(path: P, config: SourceConfig) -> Result<Self> {
        let input = open_input(path.as_ref())?;
        let media_info = extract_media_info(&input);
        let selected = select_streams(&input, config.stream_filter);

        debug!(
            path = %path.as_ref().display(),
            filter = ?config.stream_filter,
            selected = selected.iter().flatten().count(),
            "opened source"
        );

        Ok(Self {
            input,
            media_info,
            selected,
            packets_skipped: 0,
        })
    }

    /**
        Get the media info for this source.
    */
    pub fn media_info(&self) -> &MediaInfo {
        &self.media_info
    }

    /**
        Container indices of the selected streams, in container order.
    */
    pub fn selected_streams(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(index, s)| s.as_ref().map(|_| index))
    }

    /**
        Codec configuration of a selected stream.

        Pass this to `ffmpeg-decode` to create a decoder, or to `ffmpeg-sink`
        to declare a stream-copy output stream.
    */
    pub fn codec_config(&self, index: usize) -> Option<&CodecConfig> {
        self.stream(index).map(|s| &s.codec_config)
    }

    /**
        Time base of a selected stream.
    */
    pub fn time_base(&self, index: usize) -> Option<Rational> {
        self.stream(index).map(|s| s.time_base)
    }

    /**
        Container index of the first selected stream of the given type.
    */
    pub fn first_selected(&self, stream_type: StreamType) -> Option<usize> {
        self.selected_streams()
            .find(|&index| self.stream(index).map(|s| s.stream_type) == Some(stream_type))
    }

    fn stream(&self, index: usize) -> Option<&SelectedStream> {
        self.selected.get(index).and_then(Option::as_ref)
    }

    /**
        Number of packets skipped so far because their stream was not selected.
    */
    pub fn packets_skipped(&self) -> u64 {
        self.packets_skipped
    }

    /**
        Read the next packet from the source, keeping the demuxer's packet
        whole.

        Returns `Ok(Some(packet))` for each packet, `Ok(None)` at end of stream,
        or an error if something goes wrong.

        Packets are returned in file order, interleaved between streams.
        Packets of streams that were not selected are skipped.
    */
    pub fn next_source_packet(&mut self) -> Result<Option<SourcePacket>> {
        loop {
            let mut ffmpeg_packet = ffmpeg_next::Packet::empty();
            match ffmpeg_packet.read(&mut self.input) {
                Ok(()) => {}
                Err(ffmpeg_next::Error::Eof) => return Ok(None),
                Err(e) => return Err(Error::codec(format!("failed to read packet: {}", e))),
            }

            let stream_index = ffmpeg_packet.stream();
            let Some(stream) = self.stream(stream_index) else {
                trace!(stream_index, "skipping packet of unselected stream");
                self.packets_skipped += 1;
                continue;
            };

            return Ok(Some(SourcePacket::new(
                ffmpeg_packet,
                stream.time_base,
                stream.stream_type,
            )));
        }
    }

    /**
        Read the next packet from the source as an FFmpeg-free [`Packet`].
    */
    pub fn next_packet(&mut self) -> Result<Option<Packet>> {
        Ok(self.next_source_packet()?.map(|packet| packet.to_packet()))
    }
}

/**
    Decide which container streams a filter selects.
*/
fn select_streams(input: &InputContext, filter: StreamFilter) -> Vec<Option<SelectedStream>> {
    let mut selected: Vec<Option<SelectedStream>> = vec![None; input.nb_streams() as usize];

    let wanted: Vec<usize> = match filter {
        StreamFilter::VideoOnly => best_index(input, Type::Video).into_iter().collect(),
        StreamFilter::AudioOnly => best_index(input, Type::Audio).into_iter().collect(),
        StreamFilter::Both => best_index(input, Type::Video)
            .into_iter()
            .chain(best_index(input, Type::Audio))
            .collect(),
        StreamFilter::AllMedia => input
            .streams()
            .filter(|s| stream_type_from_ffmpeg(s.parameters().medium()).is_media())
            .map(|s| s.index())
            .collect(),
    };

    for stream in input.streams().filter(|s| wanted.contains(&s.index())) {
        let parameters = stream.parameters();
        let index = stream.index();
        if let Some(slot) = selected.get_mut(index) {
            *slot = Some(SelectedStream {
                stream_type: stream_type_from_ffmpeg(parameters.medium()),
                time_base: rational_from_ffmpeg(stream.time_base()),
                codec_config: CodecConfig::new(parameters),
            });
        }
    }

    selected
}

fn best_index(input: &InputContext, medium: Type) -> Option<usize> {
    input.streams().best(medium).map(|s| s.index())
}

/**
    Iterator adapter for Source that yields packets.
*/
impl Iterator for Source {
    type Item = Result<Packet>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_both() {
        assert_eq!(SourceConfig::default().stream_filter, StreamFilter::Both);
        assert_eq!(
            SourceConfig::default()
                .with_stream_filter(StreamFilter::AllMedia)
                .stream_filter,
            StreamFilter::AllMedia
        );
    }

    #[test]
    fn open_missing_file_fails() {
        match Source::open("no/such/input.mp4", SourceConfig::default()) {
            Err(err) => assert!(err.is_not_found(), "unexpected error: {err}"),
            Ok(_) => panic!("opening a missing file succeeded"),
        }
    }
}
