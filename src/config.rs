//! Grabber configuration.
//!
//! The host hands the adapter a small key-value configuration: `file`
//! selects a video file over the default camera, `w`/`h` override the
//! geometry advertised to callers. Standalone hosts can also load the same
//! options from a JSON file named by `FRAMEGRAB_CONFIG`, with `FRAMEGRAB_*`
//! environment overrides on top.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
struct GrabberConfigFile {
    file: Option<String>,
    w: Option<u32>,
    h: Option<u32>,
}

/// Options consumed by `CaptureAdapter::open`.
///
/// `file` set to an empty string means "no file specified" and fails the
/// open before any resource is touched. `width`/`height` are taken
/// verbatim when present; they are not checked against the source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrabberConfig {
    /// Path to a video file to open instead of a camera.
    pub file: Option<String>,
    /// Override the captured-frame width advertised to the caller.
    pub width: Option<u32>,
    /// Override the captured-frame height advertised to the caller.
    pub height: Option<u32>,
}

impl GrabberConfig {
    /// Build a configuration from a host-provided key-value store.
    ///
    /// Recognized keys are `file`, `w`, and `h`; unknown keys are ignored
    /// so hosts can pass their full option set through. A later duplicate
    /// key wins. Malformed integer values are errors.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            match key {
                "file" => config.file = Some(value.to_string()),
                "w" => config.width = Some(parse_dimension(key, value)?),
                "h" => config.height = Some(parse_dimension(key, value)?),
                _ => {}
            }
        }
        Ok(config)
    }

    /// Load from the `FRAMEGRAB_CONFIG` JSON file (if set) and apply
    /// `FRAMEGRAB_FILE` / `FRAMEGRAB_WIDTH` / `FRAMEGRAB_HEIGHT` overrides.
    pub fn load() -> Result<Self> {
        let file_cfg = match std::env::var("FRAMEGRAB_CONFIG").ok() {
            Some(path) => read_config_file(Path::new(&path))?,
            None => GrabberConfigFile::default(),
        };
        let mut cfg = Self {
            file: file_cfg.file,
            width: file_cfg.w,
            height: file_cfg.h,
        };
        cfg.apply_env()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(file) = std::env::var("FRAMEGRAB_FILE") {
            self.file = Some(file);
        }
        if let Ok(width) = std::env::var("FRAMEGRAB_WIDTH") {
            self.width = Some(parse_dimension("FRAMEGRAB_WIDTH", &width)?);
        }
        if let Ok(height) = std::env::var("FRAMEGRAB_HEIGHT") {
            self.height = Some(parse_dimension("FRAMEGRAB_HEIGHT", &height)?);
        }
        Ok(())
    }
}

fn parse_dimension(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| anyhow!("{} must be a non-negative integer, got '{}'", key, value))
}

fn read_config_file(path: &Path) -> Result<GrabberConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_recognizes_known_keys() -> Result<()> {
        let cfg = GrabberConfig::from_pairs([
            ("file", "clip.avi"),
            ("w", "320"),
            ("h", "240"),
            ("device", "grabber"),
        ])?;
        assert_eq!(cfg.file.as_deref(), Some("clip.avi"));
        assert_eq!(cfg.width, Some(320));
        assert_eq!(cfg.height, Some(240));
        Ok(())
    }

    #[test]
    fn from_pairs_later_duplicate_wins() -> Result<()> {
        let cfg = GrabberConfig::from_pairs([("w", "320"), ("w", "640")])?;
        assert_eq!(cfg.width, Some(640));
        Ok(())
    }

    #[test]
    fn from_pairs_rejects_malformed_dimensions() {
        assert!(GrabberConfig::from_pairs([("w", "wide")]).is_err());
        assert!(GrabberConfig::from_pairs([("h", "-1")]).is_err());
    }

    #[test]
    fn empty_pairs_yield_defaults() -> Result<()> {
        let cfg = GrabberConfig::from_pairs(Vec::<(&str, &str)>::new())?;
        assert_eq!(cfg, GrabberConfig::default());
        Ok(())
    }
}
