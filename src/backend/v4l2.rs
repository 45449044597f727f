//! V4L2 camera frame source.
//!
//! Opens a local device node (e.g., /dev/video0) and captures packed RGB
//! frames through a memory-mapped buffer stream. The negotiated pixel
//! format decides the frame's channel-order tag: drivers that only offer
//! BGR3 are tagged blue-first and corrected by the adapter.

use anyhow::{bail, Context, Result};
use ouroboros::self_referencing;

use super::CaptureSession;
use crate::frame::{ChannelOrder, Origin, RawFrame};

pub(crate) const DEFAULT_DEVICE: &str = "/dev/video0";

pub(crate) struct V4l2CameraSession {
    device_path: String,
    state: V4l2State,
    width: u32,
    height: u32,
    channels: ChannelOrder,
}

#[self_referencing]
struct V4l2State {
    device: v4l::Device,
    #[borrows(mut device)]
    #[covariant]
    stream: v4l::prelude::MmapStream<'this, v4l::Device>,
}

impl V4l2CameraSession {
    pub(crate) fn open(device_path: &str) -> Result<Self> {
        use v4l::buffer::Type;
        use v4l::video::Capture;

        let mut device = v4l::Device::with_path(device_path)
            .with_context(|| format!("open v4l2 device {}", device_path))?;
        let mut format = device.format().context("read v4l2 format")?;
        format.fourcc = v4l::FourCC::new(b"RGB3");

        let format = match device.set_format(&format) {
            Ok(format) => format,
            Err(err) => {
                log::warn!(
                    "V4l2CameraSession: failed to set format on {}: {}",
                    device_path,
                    err
                );
                device
                    .format()
                    .context("read v4l2 format after set failure")?
            }
        };

        let channels = match &format.fourcc.repr {
            b"RGB3" => ChannelOrder::Rgb,
            b"BGR3" => ChannelOrder::Bgr,
            other => bail!(
                "device {} negotiated unsupported pixel format {}",
                device_path,
                v4l::FourCC::new(other)
            ),
        };

        let state = V4l2StateBuilder {
            device,
            stream_builder: |device| {
                v4l::prelude::MmapStream::with_buffers(device, Type::VideoCapture, 4)
                    .map_err(|err| anyhow::Error::new(err).context("create v4l2 buffer stream"))
            },
        }
        .try_build()?;

        log::info!(
            "V4l2CameraSession: opened {} ({}x{})",
            device_path,
            format.width,
            format.height
        );

        Ok(Self {
            device_path: device_path.to_string(),
            state,
            width: format.width,
            height: format.height,
            channels,
        })
    }
}

impl CaptureSession for V4l2CameraSession {
    fn grab(&mut self) -> Result<RawFrame> {
        use v4l::io::traits::CaptureStream;

        let (buf, _meta) = self
            .state
            .with_mut(|fields| fields.stream.next())
            .with_context(|| format!("capture v4l2 frame from {}", self.device_path))?;

        let expected = self.width as usize * self.height as usize * 3;
        if buf.len() < expected {
            bail!(
                "short v4l2 frame from {}: expected {} bytes, got {}",
                self.device_path,
                expected,
                buf.len()
            );
        }

        Ok(RawFrame::new(
            buf[..expected].to_vec(),
            self.width,
            self.height,
            Origin::TopLeft,
            self.channels,
        ))
    }

    fn native_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
