//! The capture adapter.
//!
//! `CaptureAdapter` owns at most one capture session at a time and turns
//! its raw frames into normalized RGB images. Operations return booleans;
//! diagnostics go to the log and are advisory only. All failure paths
//! leave the caller's image zeroed at a well-defined size, so callers
//! never have to tell "old frame" from "failed fetch" by inspecting
//! pixels.
//!
//! The adapter is single-threaded and synchronous: `get_image` blocks
//! until the backend yields a frame or reports failure, and the host is
//! responsible for serializing calls. In practice one thread owns one
//! adapter for its entire lifetime.

use crate::backend::{self, CaptureSession};
use crate::config::GrabberConfig;
use crate::frame::FrameGeometry;
use crate::image::RgbImage;
use crate::normalize::copy_normalized;

/// A single-device, pull-based frame source.
///
/// States are Closed (no session) and Open. `open` always replaces any
/// existing session, `close` is an idempotent no-op when already Closed,
/// and `get_image` in the Closed state is a defined failure, not an error.
#[derive(Default)]
pub struct CaptureAdapter {
    session: Option<Box<dyn CaptureSession>>,
    /// Geometry resolved at open time; immutable for the session.
    geometry: FrameGeometry,
    /// Size of the most recent frame, which supersedes `geometry` when
    /// zeroing the output after a failure.
    last_frame_size: Option<(u32, u32)>,
}

impl CaptureAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a capture source.
    ///
    /// Any previously open session is closed first, so calling `open`
    /// twice is safe and simply replaces the session. With `file` set the
    /// named path is opened as a frame source; with it absent, the default
    /// camera. On failure the adapter stays Closed and a later `open` with
    /// corrected configuration may succeed.
    pub fn open(&mut self, config: &GrabberConfig) -> bool {
        self.close();

        let session = match &config.file {
            Some(file) if file.is_empty() => {
                log::error!("no file name specified");
                return false;
            }
            Some(file) => match backend::open_file(file) {
                Ok(session) => session,
                Err(err) => {
                    log::error!("unable to open file '{}' for capture: {:#}", file, err);
                    return false;
                }
            },
            None => match backend::open_camera() {
                Ok(session) => session,
                Err(err) => {
                    log::error!("unable to open camera for capture: {:#}", err);
                    return false;
                }
            },
        };

        self.install(session, config);
        true
    }

    /// Open with a caller-supplied session instead of the built-in
    /// backends. Same replacement semantics as `open`; used by hosts with
    /// their own capture stack, and by tests.
    pub fn open_with(&mut self, session: Box<dyn CaptureSession>, config: &GrabberConfig) -> bool {
        self.close();
        self.install(session, config);
        true
    }

    fn install(&mut self, session: Box<dyn CaptureSession>, config: &GrabberConfig) {
        // Config overrides win verbatim; only missing values are queried
        // from the session.
        let (native_width, native_height) = session.native_size();
        self.geometry = FrameGeometry::new(
            config.width.unwrap_or(native_width),
            config.height.unwrap_or(native_height),
        );
        self.last_frame_size = None;
        self.session = Some(session);
        log::info!(
            "capture session open ({}x{})",
            self.geometry.width,
            self.geometry.height
        );
    }

    /// Release the capture session, if one is held.
    ///
    /// Idempotent: closing an already-closed adapter is a no-op success.
    /// Dropping the session releases the backend's resources; success
    /// means no session handle remains.
    pub fn close(&mut self) -> bool {
        self.session = None;
        true
    }

    /// Fetch the next frame into `image`.
    ///
    /// Blocks until the backend yields a frame or reports failure. On
    /// success `image` holds the frame at the size the backend reported
    /// for it (which supersedes the open-time geometry, without
    /// re-opening). On failure, or when no session is open, `image` is
    /// zeroed at the last-known size and the call returns false; the
    /// session stays open and the caller may simply fetch again.
    pub fn get_image(&mut self, image: &mut RgbImage) -> bool {
        let Some(session) = self.session.as_mut() else {
            self.zero_output(image);
            return false;
        };

        let frame = match session.grab() {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("frame capture failed: {:#}", err);
                self.zero_output(image);
                return false;
            }
        };

        if let Err(err) = copy_normalized(&frame, image) {
            log::warn!("discarding malformed frame: {:#}", err);
            // The bad frame's reported size still counts as the most
            // recent report; the zeroed output must match it.
            self.last_frame_size = Some((frame.width, frame.height));
            self.zero_output(image);
            return false;
        }

        self.last_frame_size = Some((frame.width, frame.height));
        log::trace!("{} by {} frame", frame.width, frame.height);
        true
    }

    /// The geometry resolved at open time. Stays at the open-time values
    /// even when frames arrive at a different size.
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    fn zero_output(&self, image: &mut RgbImage) {
        let (width, height) = self
            .last_frame_size
            .unwrap_or((self.geometry.width, self.geometry.height));
        // No geometry was ever resolved on a never-opened adapter; keep
        // the caller's dimensions rather than collapsing the buffer.
        if width != 0 || height != 0 {
            image.resize(width, height);
        }
        image.zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{SyntheticConfig, SyntheticSession};

    fn synthetic(config: SyntheticConfig) -> Box<dyn CaptureSession> {
        Box::new(SyntheticSession::new(config))
    }

    #[test]
    fn geometry_defaults_to_native_size() {
        let mut adapter = CaptureAdapter::new();
        assert!(adapter.open_with(synthetic(SyntheticConfig::default()), &GrabberConfig::default()));
        assert_eq!(adapter.geometry(), FrameGeometry::new(640, 480));
    }

    #[test]
    fn config_overrides_take_precedence_over_native_size() {
        let mut adapter = CaptureAdapter::new();
        let config = GrabberConfig {
            width: Some(320),
            height: Some(240),
            ..GrabberConfig::default()
        };
        assert!(adapter.open_with(synthetic(SyntheticConfig::default()), &config));
        assert_eq!(adapter.geometry(), FrameGeometry::new(320, 240));
    }

    #[test]
    fn close_is_idempotent() {
        let mut adapter = CaptureAdapter::new();
        assert!(adapter.close());
        assert!(adapter.close());

        assert!(adapter.open_with(synthetic(SyntheticConfig::default()), &GrabberConfig::default()));
        assert!(adapter.close());
        assert!(adapter.close());
        assert!(!adapter.is_open());
    }

    #[test]
    fn get_image_while_closed_zeroes_and_fails() {
        let mut adapter = CaptureAdapter::new();
        let mut image = RgbImage::with_size(2, 2);
        image.as_bytes_mut().fill(9);

        assert!(!adapter.get_image(&mut image));
        // Never opened, so the caller's dimensions are preserved.
        assert_eq!((image.width(), image.height()), (2, 2));
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }
}
