//! Frame normalization pass.
//!
//! Copies one raw frame into the caller's `RgbImage`, applying at most two
//! corrections: a vertical flip when the source origin is bottom-left, and
//! an in-place blue/red swap when the source is tagged blue-first. Any
//! other channel tag is passed through unchanged.

use anyhow::{anyhow, Result};

use crate::frame::{ChannelOrder, Origin, RawFrame};
use crate::image::RgbImage;

/// Copy `frame` into `image`, normalizing to RGB, top-left origin.
///
/// `image` is resized to the frame's reported dimensions first; resizing to
/// the current size does not reallocate. Fails only when the frame's buffer
/// does not match its own reported geometry, in which case `image` holds
/// the frame's dimensions but unspecified content (the adapter zeroes it).
pub(crate) fn copy_normalized(frame: &RawFrame, image: &mut RgbImage) -> Result<()> {
    let row_bytes = frame
        .width
        .checked_mul(3)
        .ok_or_else(|| anyhow!("frame width overflows row size"))? as usize;
    let expected = row_bytes
        .checked_mul(frame.height as usize)
        .ok_or_else(|| anyhow!("frame dimensions overflow buffer size"))?;
    let src = frame.bytes();
    if src.len() != expected {
        return Err(anyhow!(
            "frame buffer length mismatch: expected {}, got {}",
            expected,
            src.len()
        ));
    }

    image.resize(frame.width, frame.height);
    let dst = image.as_bytes_mut();

    match frame.origin {
        Origin::TopLeft => dst.copy_from_slice(src),
        Origin::BottomLeft => {
            let rows = frame.height as usize;
            for (row, dst_row) in dst.chunks_exact_mut(row_bytes).enumerate() {
                let src_start = (rows - 1 - row) * row_bytes;
                dst_row.copy_from_slice(&src[src_start..src_start + row_bytes]);
            }
        }
    }

    if frame.channels == ChannelOrder::Bgr {
        swap_blue_red(dst);
    }

    Ok(())
}

/// In-place blue/red swap over a packed 3-byte-per-pixel buffer.
fn swap_blue_red(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(data: Vec<u8>, w: u32, h: u32, origin: Origin, channels: ChannelOrder) -> RawFrame {
        RawFrame::new(data, w, h, origin, channels)
    }

    #[test]
    fn top_left_rgb_copies_straight_across() -> Result<()> {
        let src: Vec<u8> = (0..12).collect();
        let mut image = RgbImage::new();

        copy_normalized(&frame(src.clone(), 2, 2, Origin::TopLeft, ChannelOrder::Rgb), &mut image)?;

        assert_eq!(image.as_bytes(), &src[..]);
        Ok(())
    }

    #[test]
    fn bottom_left_frame_matches_top_left_capture() -> Result<()> {
        // The same picture delivered both ways must normalize identically.
        let top_down: Vec<u8> = (0..18).collect();
        let bottom_up: Vec<u8> = top_down
            .chunks_exact(6)
            .rev()
            .flatten()
            .copied()
            .collect();

        let mut from_top = RgbImage::new();
        let mut from_bottom = RgbImage::new();
        copy_normalized(
            &frame(top_down, 2, 3, Origin::TopLeft, ChannelOrder::Rgb),
            &mut from_top,
        )?;
        copy_normalized(
            &frame(bottom_up, 2, 3, Origin::BottomLeft, ChannelOrder::Rgb),
            &mut from_bottom,
        )?;

        assert_eq!(from_top, from_bottom);
        Ok(())
    }

    #[test]
    fn bgr_frame_swaps_first_and_third_channels() -> Result<()> {
        let src = vec![10, 20, 30, 40, 50, 60];
        let mut image = RgbImage::new();

        copy_normalized(&frame(src, 2, 1, Origin::TopLeft, ChannelOrder::Bgr), &mut image)?;

        assert_eq!(image.as_bytes(), &[30, 20, 10, 60, 50, 40]);
        Ok(())
    }

    #[test]
    fn unknown_channel_tag_passes_through() -> Result<()> {
        let src = vec![10, 20, 30];
        let mut image = RgbImage::new();

        copy_normalized(
            &frame(src.clone(), 1, 1, Origin::TopLeft, ChannelOrder::Unknown),
            &mut image,
        )?;

        assert_eq!(image.as_bytes(), &src[..]);
        Ok(())
    }

    #[test]
    fn buffer_length_mismatch_is_rejected() {
        let mut image = RgbImage::new();
        let bad = frame(vec![0u8; 5], 2, 2, Origin::TopLeft, ChannelOrder::Rgb);
        assert!(copy_normalized(&bad, &mut image).is_err());
    }
}
