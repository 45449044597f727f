//! Synthetic frame source.
//!
//! Deterministic pixel-pattern session used by tests and by `stub://` file
//! paths. Configurable in geometry, row origin, channel order, and an
//! optional frame limit after which the session reports end of stream,
//! which lets tests exercise the adapter's failure path without a device.

use anyhow::{anyhow, bail, Result};

use super::CaptureSession;
use crate::frame::{ChannelOrder, Origin, RawFrame};

pub(crate) const STUB_SCHEME: &str = "stub://";

/// Configuration for a synthetic session.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    pub width: u32,
    pub height: u32,
    pub origin: Origin,
    pub channels: ChannelOrder,
    /// Frames to yield before reporting end of stream. `None` never ends.
    pub frame_limit: Option<u64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            origin: Origin::TopLeft,
            channels: ChannelOrder::Rgb,
            frame_limit: None,
        }
    }
}

/// Synthetic frame source.
pub struct SyntheticSession {
    config: SyntheticConfig,
    frame_count: u64,
}

impl SyntheticSession {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            frame_count: 0,
        }
    }

    /// Parse a `stub://name` path, with an optional `?frames=N` limit.
    pub(crate) fn from_stub_path(path: &str) -> Result<Self> {
        let rest = path
            .strip_prefix(STUB_SCHEME)
            .ok_or_else(|| anyhow!("not a stub path: {}", path))?;
        let mut config = SyntheticConfig::default();
        if let Some((_, query)) = rest.split_once('?') {
            for param in query.split('&') {
                match param.split_once('=') {
                    Some(("frames", value)) => {
                        let frames: u64 = value
                            .parse()
                            .map_err(|_| anyhow!("invalid frames value in {}", path))?;
                        config.frame_limit = Some(frames);
                    }
                    _ => bail!("unrecognized stub parameter in {}", path),
                }
            }
        }
        log::info!("SyntheticSession: opened {}", path);
        Ok(Self::new(config))
    }

    /// Generate pixel data that varies per frame and is never all-zero.
    fn generate_pixels(&self) -> Vec<u8> {
        let pixel_count = self.config.width as usize * self.config.height as usize * 3;
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count) % 255 + 1) as u8;
        }
        pixels
    }
}

impl CaptureSession for SyntheticSession {
    fn grab(&mut self) -> Result<RawFrame> {
        if let Some(limit) = self.config.frame_limit {
            if self.frame_count >= limit {
                bail!("end of stream after {} frames", limit);
            }
        }
        self.frame_count += 1;
        Ok(RawFrame::new(
            self.generate_pixels(),
            self.config.width,
            self.config.height,
            self.config.origin,
            self.config.channels,
        ))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_path_without_query_never_ends() -> Result<()> {
        let mut session = SyntheticSession::from_stub_path("stub://front_camera")?;
        for _ in 0..3 {
            let frame = session.grab()?;
            assert_eq!(frame.width, 640);
            assert_eq!(frame.height, 480);
        }
        Ok(())
    }

    #[test]
    fn stub_path_frame_limit_is_honored() -> Result<()> {
        let mut session = SyntheticSession::from_stub_path("stub://clip?frames=2")?;
        assert!(session.grab().is_ok());
        assert!(session.grab().is_ok());
        assert!(session.grab().is_err());
        Ok(())
    }

    #[test]
    fn malformed_stub_query_is_rejected() {
        assert!(SyntheticSession::from_stub_path("stub://clip?frames=many").is_err());
        assert!(SyntheticSession::from_stub_path("stub://clip?loop=1").is_err());
    }

    #[test]
    fn frames_are_never_all_zero() -> Result<()> {
        let mut session = SyntheticSession::new(SyntheticConfig {
            width: 4,
            height: 4,
            ..SyntheticConfig::default()
        });
        let frame = session.grab()?;
        assert!(frame.bytes().iter().any(|&b| b != 0));
        Ok(())
    }
}
