//! framegrab - frame grabber adapter
//!
//! This crate wraps a native capture session (a camera or a video file) and
//! exposes a pull-based "get next image" operation. Every captured frame is
//! normalized into a fixed, caller-agnostic pixel format: red-green-blue
//! channel order, top-left origin.
//!
//! The adapter is responsible for:
//! - Session lifecycle: open/close/reopen safety, exactly one session at a time
//! - Resolving frame geometry at open time (config override or device query)
//! - Per-frame orientation correction (bottom-left sources are flipped)
//! - Per-frame channel-order correction (blue-first sources are swapped)
//!
//! The adapter is NOT responsible for:
//! - Multi-camera management or frame-rate control
//! - Encoding, compression, or buffering of frames
//! - Threading - one thread owns one adapter for its entire lifetime
//!
//! # Module Structure
//!
//! - `backend`: Capture sessions (synthetic, video files, V4L2 cameras)
//! - `grabber`: The `CaptureAdapter` itself
//! - `frame`: Raw frame and geometry types
//! - `image`: The caller-owned normalized output image
//! - `config`: Key-value / file / env configuration

pub mod backend;
pub mod config;
pub mod frame;
pub mod grabber;
pub mod image;
mod normalize;

pub use backend::{CaptureSession, SyntheticConfig, SyntheticSession};
pub use config::GrabberConfig;
pub use frame::{ChannelOrder, FrameGeometry, Origin, RawFrame};
pub use grabber::CaptureAdapter;
pub use image::RgbImage;
