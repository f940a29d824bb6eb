use font8x8::UnicodeFonts;
use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use tracing::debug;

use crate::config::FontConfig;

/// Width and height of a font8x8 glyph.
const BITMAP_GLYPH_PX: u32 = 8;

/// Font used for the two captions.
pub enum CaptionFont {
    TrueType { font: Font<'static>, scale: Scale },
    /// font8x8 glyphs, each pixel blown up to `scale × scale`.
    Bitmap { scale: u32 },
}

impl CaptionFont {
    /// Try each configured TrueType file in order, falling back to the
    /// built-in bitmap font when none can be loaded.
    pub fn load(config: &FontConfig) -> Self {
        for path in &config.paths {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    debug!("Font {} unavailable: {}", path.display(), e);
                    continue;
                }
            };
            match Font::try_from_vec(bytes) {
                Some(font) => {
                    debug!("Using caption font {}", path.display());
                    let scale = em_scale(&font, config.size);
                    return Self::TrueType { font, scale };
                }
                None => debug!("Font {} is not a valid TrueType file", path.display()),
            }
        }

        debug!("No TrueType font found, using built-in bitmap font");
        Self::bitmap(config.size)
    }

    /// Built-in font sized as close to `px` as whole-pixel scaling allows.
    pub fn bitmap(px: f32) -> Self {
        let scale = (px / BITMAP_GLYPH_PX as f32).round().max(1.0) as u32;
        Self::Bitmap { scale }
    }

    /// Rendered width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        match self {
            Self::TrueType { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let mut width: f32 = 0.0;
                for glyph in font.layout(text, *scale, point(0.0, v_metrics.ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        width = width.max(bb.max.x as f32);
                    }
                }
                width.ceil() as u32
            }
            Self::Bitmap { scale } => text.chars().count() as u32 * BITMAP_GLYPH_PX * scale,
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels falling
    /// outside the image are skipped.
    pub fn draw(&self, img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, text: &str) {
        match self {
            Self::TrueType { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                let origin = point(x as f32, y as f32 + v_metrics.ascent);
                for glyph in font.layout(text, *scale, origin) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, v| {
                        let px = gx as i64 + bb.min.x as i64;
                        let py = gy as i64 + bb.min.y as i64;
                        if let Some(dst) = pixel_mut(img, px, py) {
                            blend(dst, color, v);
                        }
                    });
                }
            }
            Self::Bitmap { scale } => {
                let cell = (BITMAP_GLYPH_PX * scale) as i64;
                for (i, ch) in text.chars().enumerate() {
                    draw_bitmap_char(img, x + i as i64 * cell, y, ch, *scale, color);
                }
            }
        }
    }
}

/// rusttype scales the ascent-to-descent height; convert so the em square
/// is `px` tall.
fn em_scale(font: &Font<'_>, px: f32) -> Scale {
    let v_metrics = font.v_metrics_unscaled();
    let units_per_em = font.units_per_em() as f32;
    let line_height = v_metrics.ascent - v_metrics.descent;
    if units_per_em <= 0.0 || line_height <= 0.0 {
        return Scale::uniform(px);
    }
    Scale::uniform(px * line_height / units_per_em)
}

/// First TrueType font found in the default search list, for tests that
/// need real glyph metrics.
#[cfg(test)]
pub(crate) fn system_font_path() -> Option<std::path::PathBuf> {
    FontConfig::default()
        .paths
        .into_iter()
        .chain(
            [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
                "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
                "/Library/Fonts/Arial.ttf",
                "C:\\Windows\\Fonts\\arialbd.ttf",
            ]
            .map(std::path::PathBuf::from),
        )
        .find(|path| path.is_file())
}

/// font8x8 glyphs are one byte per row, bit 0 leftmost.
fn draw_bitmap_char(img: &mut RgbImage, x: i64, y: i64, ch: char, scale: u32, color: Rgb<u8>) {
    let glyph = font8x8::BASIC_FONTS.get(ch).unwrap_or([0u8; 8]);
    let scale = scale as i64;
    for (row, &bits) in glyph.iter().enumerate() {
        for col in 0..BITMAP_GLYPH_PX as i64 {
            if bits & (1 << col) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    let px = x + col * scale + sx;
                    let py = y + row as i64 * scale + sy;
                    if let Some(dst) = pixel_mut(img, px, py) {
                        *dst = color;
                    }
                }
            }
        }
    }
}

fn pixel_mut(img: &mut RgbImage, x: i64, y: i64) -> Option<&mut Rgb<u8>> {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return None;
    }
    Some(img.get_pixel_mut(x as u32, y as u32))
}

fn blend(dst: &mut Rgb<u8>, color: Rgb<u8>, coverage: f32) {
    let a = coverage.clamp(0.0, 1.0);
    if a == 0.0 {
        return;
    }
    let inv = 1.0 - a;
    for c in 0..3 {
        dst.0[c] = (color.0[c] as f32 * a + dst.0[c] as f32 * inv).round() as u8;
    }
}
