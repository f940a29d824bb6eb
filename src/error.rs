use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while composing a meme.
#[derive(Error, Debug)]
pub enum MemeError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot encode {len}-byte payload as a QR code: {source}")]
    Encoding {
        len: usize,
        #[source]
        source: qrcode::types::QrError,
    },

    #[error(
        "QR bitmap too large: {modules} modules, {border} module border, {module_size} px per module"
    )]
    QrBitmapSize {
        modules: u32,
        border: u32,
        module_size: u32,
    },

    #[error("cannot infer an image format from output path {}", path.display())]
    UnsupportedOutput { path: PathBuf },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("failed to read configuration file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to parse configuration file {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, MemeError>;

impl MemeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
