//! Raw frame and geometry types.
//!
//! A `RawFrame` is the transient product of one fetch: the backend's pixel
//! buffer together with the two tags the normalization pass acts on, row
//! origin and channel order. Frames are consumed synchronously by the
//! adapter; nothing is buffered or retained between fetches.

/// Row-order convention of a raw frame's pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Row 0 is the top of the picture. Copied straight across.
    TopLeft,
    /// Row 0 is the bottom of the picture. Flipped vertically during copy.
    BottomLeft,
}

/// Which color occupies the first byte of each pixel.
///
/// Only blue-first buffers are converted; any tag the grabber does not
/// recognize is passed through unchanged, the same as `Rgb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Red-green-blue. Already the output order, no conversion.
    Rgb,
    /// Blue-green-red. Converted to red-green-blue in place.
    Bgr,
    /// A channel layout the grabber does not recognize. Passed through.
    Unknown,
}

/// Width/height associated with a capture session.
///
/// Resolved once at open time (config override or device query) and held
/// for the lifetime of the session. Superseded per-frame by the size the
/// backend actually reports, without re-opening.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One captured frame, as reported by the backend.
///
/// The buffer is 3 bytes per pixel, tightly packed (no row padding);
/// backends that decode strided data compact it before constructing the
/// frame. Lives only until the adapter has copied it into the caller's
/// `RgbImage`.
pub struct RawFrame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub origin: Origin,
    pub channels: ChannelOrder,
}

impl RawFrame {
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        origin: Origin,
        channels: ChannelOrder,
    ) -> Self {
        Self {
            data,
            width,
            height,
            origin,
            channels,
        }
    }

    /// Pixel bytes, row-major in the order `origin` describes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}
