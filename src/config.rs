use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Tunable settings for meme composition.
///
/// Every section falls back to its defaults when absent from the file, so an
/// empty TOML document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub font: FontConfig,
    pub qr: QrConfig,
    pub layout: LayoutConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.font.validate()?;
        self.qr.validate()?;
        self.layout.validate()?;
        Ok(())
    }
}

/// Caption font settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType candidates, tried in order before the built-in bitmap font.
    pub paths: Vec<PathBuf>,

    /// Em size of caption glyphs, in pixels.
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf"),
                PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf"),
            ],
            size: 40.0,
        }
    }
}

impl FontConfig {
    fn validate(&self) -> Result<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "font.size".to_string(),
                value: self.size.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// QR bitmap rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Pixels per QR module.
    pub module_size: u32,

    /// Quiet zone width, in modules.
    pub border: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: 4,
        }
    }
}

impl QrConfig {
    /// Largest accepted `module_size`; a version 40 code with the widest
    /// border still renders under 11k pixels square.
    pub const MAX_MODULE_SIZE: u32 = 50;

    /// Largest accepted quiet zone, in modules.
    pub const MAX_BORDER: u32 = 20;

    fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_MODULE_SIZE).contains(&self.module_size) {
            return Err(ConfigError::InvalidValue {
                key: "qr.module_size".to_string(),
                value: self.module_size.to_string(),
            }
            .into());
        }
        if self.border > Self::MAX_BORDER {
            return Err(ConfigError::InvalidValue {
                key: "qr.border".to_string(),
                value: self.border.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Fixed offsets used when placing elements on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance from the top of each right-hand quadrant to its QR code.
    pub qr_top_offset: u32,

    /// Distance from the top of each right-hand quadrant to its caption.
    pub caption_top_offset: u32,

    /// Thickness of the two divider lines.
    pub divider_width: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            qr_top_offset: 100,
            caption_top_offset: 10,
            divider_width: 5,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        if self.divider_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.divider_width".to_string(),
                value: self.divider_width.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
