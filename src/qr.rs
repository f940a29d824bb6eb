use image::{ImageBuffer, Rgb, RgbImage};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::config::QrConfig;
use crate::error::{MemeError, Result};

/// How a QR matrix is turned into pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QrStyle {
    pub module_size: u32,
    pub border: u32,
    /// `None` leaves the choice to the encoder.
    pub ec_level: Option<EcLevel>,
}

impl Default for QrStyle {
    fn default() -> Self {
        Self::from(&QrConfig::default())
    }
}

impl From<&QrConfig> for QrStyle {
    fn from(config: &QrConfig) -> Self {
        Self {
            module_size: config.module_size,
            border: config.border,
            ec_level: None,
        }
    }
}

/// Encode `text` with the smallest QR version that fits and return the
/// module grid, `true` for dark.
pub fn generate_qr_data(text: &str, ec_level: Option<EcLevel>) -> Result<Vec<Vec<bool>>> {
    let code = match ec_level {
        Some(level) => QrCode::with_error_correction_level(text, level),
        None => QrCode::new(text),
    }
    .map_err(|source| MemeError::Encoding {
        len: text.len(),
        source,
    })?;

    let modules = code.to_colors();
    let width = code.width();
    debug!(
        "Encoded {} bytes as {:?} ({}x{} modules)",
        text.len(),
        code.version(),
        width,
        width
    );

    let mut qr_data = vec![vec![false; width]; width];
    for y in 0..width {
        for x in 0..width {
            qr_data[y][x] = matches!(modules[y * width + x], qrcode::Color::Dark);
        }
    }

    Ok(qr_data)
}

/// Render `text` as a black-on-white QR bitmap surrounded by a quiet zone.
pub fn generate_qr_image(text: &str, style: &QrStyle) -> Result<RgbImage> {
    let qr_data = generate_qr_data(text, style.ec_level)?;
    render_modules(&qr_data, style.module_size, style.border)
}

/// Largest bitmap side: a version 40 code at the largest accepted
/// border and module size.
const MAX_QR_SIDE: u32 = (177 + 2 * QrConfig::MAX_BORDER) * QrConfig::MAX_MODULE_SIZE;

fn render_modules(qr_data: &[Vec<bool>], module_size: u32, border: u32) -> Result<RgbImage> {
    let modules = qr_data.len() as u32;
    let side = border
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(modules))
        .and_then(|total| total.checked_mul(module_size))
        .filter(|&side| module_size > 0 && side <= MAX_QR_SIDE)
        .ok_or(MemeError::QrBitmapSize {
            modules,
            border,
            module_size,
        })?;

    Ok(ImageBuffer::from_fn(side, side, |x, y| {
        let mx = (x / module_size).checked_sub(border);
        let my = (y / module_size).checked_sub(border);
        let dark = match (mx, my) {
            (Some(mx), Some(my)) if mx < modules && my < modules => {
                qr_data[my as usize][mx as usize]
            }
            _ => false,
        };
        if dark {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    }))
}
