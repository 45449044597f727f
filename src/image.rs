//! Caller-owned normalized output image.
//!
//! `RgbImage` is the destination buffer the host passes into every fetch.
//! It is always red-green-blue, top-left origin, 3 bytes per pixel, tightly
//! packed. The adapter resizes and overwrites it in place and never retains
//! a reference across calls.

const BYTES_PER_PIXEL: usize = 3;

/// A red-green-blue, top-left-origin pixel buffer, resizable in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an image of the given size, zero-filled.
    pub fn with_size(width: u32, height: u32) -> Self {
        let mut image = Self::new();
        image.resize(width, height);
        image
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize to the given dimensions.
    ///
    /// Resizing to the current size is a no-op and never reallocates;
    /// shrinking keeps the existing allocation. Newly exposed pixels are
    /// zero, surviving pixel bytes keep their values.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let len = width as usize * height as usize * BYTES_PER_PIXEL;
        self.data.resize(len, 0);
        self.width = width;
        self.height = height;
    }

    /// Zero every pixel, keeping the current dimensions.
    pub fn zero(&mut self) {
        self.data.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The `[r, g, b]` bytes at (x, y), origin top-left. Panics if out of
    /// bounds; intended for hosts and tests, not the copy path.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [self.data[offset], self.data[offset + 1], self.data[offset + 2]]
    }
}
