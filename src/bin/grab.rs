//! grab - pull frames from a camera or video file and report what arrived

use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use framegrab::{CaptureAdapter, GrabberConfig, RgbImage};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Video file to open instead of the default camera.
    #[arg(long)]
    file: Option<String>,
    /// Advertised frame width override.
    #[arg(long)]
    width: Option<u32>,
    /// Advertised frame height override.
    #[arg(long)]
    height: Option<u32>,
    /// Number of fetches to attempt.
    #[arg(long, default_value_t = 10)]
    frames: u64,
    /// Write the last successfully captured frame here as binary PPM.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = GrabberConfig::load()?;
    if args.file.is_some() {
        config.file = args.file;
    }
    if args.width.is_some() {
        config.width = args.width;
    }
    if args.height.is_some() {
        config.height = args.height;
    }

    let mut adapter = CaptureAdapter::new();
    if !adapter.open(&config) {
        return Err(anyhow!("failed to open capture source"));
    }
    let geometry = adapter.geometry();
    log::info!("advertised geometry: {}x{}", geometry.width, geometry.height);

    let mut image = RgbImage::new();
    let mut last_good: Option<RgbImage> = None;
    let mut captured = 0u64;
    for n in 0..args.frames {
        if adapter.get_image(&mut image) {
            captured += 1;
            log::info!("frame {}: {}x{}", n, image.width(), image.height());
            if args.out.is_some() {
                last_good = Some(image.clone());
            }
        } else {
            log::warn!("frame {}: no data", n);
        }
    }

    adapter.close();
    log::info!("captured {}/{} frames", captured, args.frames);

    if let Some(path) = args.out {
        let image = last_good.ok_or_else(|| anyhow!("no frame captured, nothing to write"))?;
        write_ppm(&path, &image)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}

fn write_ppm(path: &PathBuf, image: &RgbImage) -> Result<()> {
    let mut file = File::create(path)?;
    write!(file, "P6\n{} {}\n255\n", image.width(), image.height())?;
    file.write_all(image.as_bytes())?;
    Ok(())
}
