//! Video-file frame source using FFmpeg.
//!
//! Decodes a local video file and yields frames scaled to packed RGB24 at
//! the file's native resolution. Decode happens in-memory, one frame per
//! `grab`; end of file is a per-call failure, not a session teardown.

use anyhow::{bail, Context, Result};
use ffmpeg_next as ffmpeg;

use super::CaptureSession;
use crate::frame::{ChannelOrder, Origin, RawFrame};

pub(crate) struct FfmpegFileSession {
    path: String,
    input: ffmpeg::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    /// Set once the demuxer is exhausted and the decoder has been flushed.
    flushed: bool,
}

impl FfmpegFileSession {
    pub(crate) fn open(path: &str) -> Result<Self> {
        ffmpeg::init().context("initialize ffmpeg")?;
        let path = path.to_string();
        let input = ffmpeg::format::input(&path)
            .with_context(|| format!("open file input '{}' with ffmpeg", path))?;
        let input_stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| anyhow::anyhow!("file has no video track"))?;
        let stream_index = input_stream.index();
        let context = ffmpeg::codec::context::Context::from_parameters(input_stream.parameters())
            .context("load video decoder parameters")?;
        let decoder = context
            .decoder()
            .video()
            .context("open ffmpeg video decoder")?;

        let scaler = ffmpeg::software::scaling::context::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::util::format::pixel::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg::software::scaling::flag::Flags::BILINEAR,
        )
        .context("create ffmpeg scaler")?;

        log::info!(
            "FfmpegFileSession: opened {} ({}x{})",
            path,
            decoder.width(),
            decoder.height()
        );

        Ok(Self {
            path,
            input,
            stream_index,
            decoder,
            scaler,
            flushed: false,
        })
    }

    fn deliver(&mut self, decoded: &ffmpeg::frame::Video) -> Result<RawFrame> {
        let mut rgb_frame = ffmpeg::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgb_frame)
            .context("scale frame to RGB")?;
        let (pixels, width, height) = frame_to_pixels(&rgb_frame)?;
        Ok(RawFrame::new(
            pixels,
            width,
            height,
            Origin::TopLeft,
            ChannelOrder::Rgb,
        ))
    }
}

impl CaptureSession for FfmpegFileSession {
    fn grab(&mut self) -> Result<RawFrame> {
        let mut decoded = ffmpeg::frame::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return self.deliver(&decoded);
            }
            if self.flushed {
                bail!("end of stream: {}", self.path);
            }

            // Feed the decoder one more packet from our stream, or flush
            // it once the demuxer runs dry.
            let mut fed = false;
            for (stream, packet) in self.input.packets() {
                if stream.index() != self.stream_index {
                    continue;
                }
                self.decoder
                    .send_packet(&packet)
                    .context("send packet to ffmpeg decoder")?;
                fed = true;
                break;
            }
            if !fed {
                self.decoder.send_eof().context("flush ffmpeg decoder")?;
                self.flushed = true;
            }
        }
    }

    fn native_size(&self) -> (u32, u32) {
        (self.decoder.width(), self.decoder.height())
    }
}

/// Compact a possibly strided RGB24 frame into a tightly packed buffer.
fn frame_to_pixels(frame: &ffmpeg::frame::Video) -> Result<(Vec<u8>, u32, u32)> {
    let width = frame.width();
    let height = frame.height();
    let row_bytes = (width as usize) * 3;
    let stride = frame.stride(0) as usize;
    let data = frame.data(0);

    if stride == row_bytes {
        return Ok((data.to_vec(), width, height));
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let end = start + row_bytes;
        pixels.extend_from_slice(
            data.get(start..end)
                .context("ffmpeg frame row is out of bounds")?,
        );
    }

    Ok((pixels, width, height))
}
