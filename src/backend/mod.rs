//! Capture session backends.
//!
//! This module provides the native capture sessions the adapter wraps:
//! - Synthetic sources (`stub://` paths, testing)
//! - Local video files (feature: capture-file-ffmpeg)
//! - V4L2 camera devices (feature: capture-v4l2)
//!
//! All backends yield `RawFrame` instances tagged with their row origin and
//! channel order; the adapter owns normalization. A session is exclusively
//! owned between open and close, is not safe for concurrent access, and
//! performs no internal locking.

mod synthetic;

#[cfg(feature = "capture-file-ffmpeg")]
pub(crate) mod file_ffmpeg;
#[cfg(feature = "capture-v4l2")]
pub(crate) mod v4l2;

use anyhow::Result;

use crate::frame::RawFrame;

pub use synthetic::{SyntheticConfig, SyntheticSession};

/// An open native capture source.
///
/// `grab` blocks the calling thread until the backend yields a frame or
/// reports failure; there is no timeout and no internal queue. Implemented
/// by the built-in backends and by hosts plugging in their own source.
pub trait CaptureSession {
    /// Capture the next frame. Failure (end of stream, device error,
    /// transient read miss) affects only this call; the session stays
    /// usable and a later call may succeed again.
    fn grab(&mut self) -> Result<RawFrame>;

    /// The source's native (width, height), as reported at open time.
    fn native_size(&self) -> (u32, u32);
}

/// Open the named path as a frame source.
pub(crate) fn open_file(path: &str) -> Result<Box<dyn CaptureSession>> {
    if path.starts_with(synthetic::STUB_SCHEME) {
        return Ok(Box::new(SyntheticSession::from_stub_path(path)?));
    }
    #[cfg(feature = "capture-file-ffmpeg")]
    {
        Ok(Box::new(file_ffmpeg::FfmpegFileSession::open(path)?))
    }
    #[cfg(not(feature = "capture-file-ffmpeg"))]
    {
        anyhow::bail!("file capture requires the capture-file-ffmpeg feature")
    }
}

/// Open the default camera device.
pub(crate) fn open_camera() -> Result<Box<dyn CaptureSession>> {
    #[cfg(feature = "capture-v4l2")]
    {
        Ok(Box::new(v4l2::V4l2CameraSession::open(
            v4l2::DEFAULT_DEVICE,
        )?))
    }
    #[cfg(not(feature = "capture-v4l2"))]
    {
        anyhow::bail!("no camera backend available (capture-v4l2 feature disabled)")
    }
}
