use std::borrow::Cow;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use qrcode::EcLevel;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{MemeError, Result};
use crate::font::CaptionFont;
use crate::layout::{Layout, Rect};
use crate::payload::QrPayload;
use crate::qr::{generate_qr_image, QrStyle};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Photos and captions for the left and right columns.
#[derive(Debug, Clone, Copy)]
pub struct MemeSources<'a> {
    pub no_image: &'a Path,
    pub yes_image: &'a Path,
    pub upper_text: &'a str,
    pub lower_text: &'a str,
}

/// Data for the upper and lower QR codes.
#[derive(Debug, Clone)]
pub struct QrPair {
    pub upper: QrPayload,
    pub lower: QrPayload,
}

impl QrPair {
    pub fn from_args(upper: &str, lower: &str) -> Self {
        Self {
            upper: QrPayload::from_arg(upper),
            lower: QrPayload::from_arg(lower),
        }
    }
}

/// Builds memes from photos, or stamps QR codes onto finished templates.
pub struct MemeComposer {
    config: Config,
    qr_style: QrStyle,
    font: CaptionFont,
}

impl MemeComposer {
    pub fn new(config: Config, ec_level: Option<EcLevel>) -> Self {
        let font = CaptionFont::load(&config.font);
        let qr_style = QrStyle {
            ec_level,
            ..QrStyle::from(&config.qr)
        };
        Self {
            config,
            qr_style,
            font,
        }
    }

    /// Replace the caption font picked by [`MemeComposer::new`].
    #[cfg(test)]
    pub fn with_font(mut self, font: CaptionFont) -> Self {
        self.font = font;
        self
    }

    /// Compose a fresh meme and write it to `output`.
    pub fn compose_from_images(
        &self,
        sources: &MemeSources<'_>,
        qr: &QrPair,
        output: &Path,
    ) -> Result<()> {
        let canvas = self.render_from_images(sources, qr)?;
        save_image(&DynamicImage::ImageRgb8(canvas), output)
    }

    /// Overlay fresh QR codes onto `template` and write it to `output`.
    pub fn compose_from_template(&self, template: &Path, qr: &QrPair, output: &Path) -> Result<()> {
        let image = self.render_from_template(template, qr)?;
        save_image(&image, output)
    }

    pub fn render_from_images(&self, sources: &MemeSources<'_>, qr: &QrPair) -> Result<RgbImage> {
        let no_image = open_image(sources.no_image)?.to_rgb8();
        let yes_image = open_image(sources.yes_image)?.to_rgb8();

        let layout = Layout::for_sources(
            no_image.dimensions(),
            yes_image.dimensions(),
            &self.config.layout,
        );
        info!("Canvas size: {}x{}", layout.width, layout.height);

        let mut canvas = RgbImage::from_pixel(layout.width, layout.height, WHITE);
        imageops::replace(&mut canvas, &no_image, 0, 0);
        imageops::replace(&mut canvas, &yes_image, 0, no_image.height() as i64);

        let (upper_qr, lower_qr) = self.qr_codes(qr, &layout)?;
        paste_qr(&mut canvas, &upper_qr, layout.upper_qr());
        paste_qr(&mut canvas, &lower_qr, layout.lower_qr());

        let (x, y) = layout.upper_caption(self.font.text_width(sources.upper_text));
        self.font.draw(&mut canvas, x, y, BLACK, sources.upper_text);
        let (x, y) = layout.lower_caption(self.font.text_width(sources.lower_text));
        self.font.draw(&mut canvas, x, y, BLACK, sources.lower_text);

        // Dividers go last so nothing covers them.
        fill_rect(&mut canvas, layout.vertical_divider(), BLACK);
        fill_rect(&mut canvas, layout.horizontal_divider(), BLACK);

        Ok(canvas)
    }

    /// The template keeps its own colour type and bit depth.
    pub fn render_from_template(&self, template: &Path, qr: &QrPair) -> Result<DynamicImage> {
        let mut canvas = open_image(template)?;
        let (width, height) = canvas.dimensions();
        info!(
            "Template size: {}x{} ({:?})",
            width,
            height,
            canvas.color()
        );

        let layout = Layout::new(width, height, &self.config.layout);
        let (upper_qr, lower_qr) = self.qr_codes(qr, &layout)?;
        for (code, at) in [(upper_qr, layout.upper_qr()), (lower_qr, layout.lower_qr())] {
            // DynamicImage converts each pixel into the template's own format.
            let code = DynamicImage::ImageRgb8(code).to_rgba8();
            imageops::replace(&mut canvas, &code, at.x, at.y);
        }
        Ok(canvas)
    }

    /// Encode both payloads and scale them to the layout's QR size.
    fn qr_codes(&self, qr: &QrPair, layout: &Layout) -> Result<(RgbImage, RgbImage)> {
        let (width, height) = layout.qr_size();
        let upper = self.scaled_qr(&qr.upper, width, height)?;
        let lower = self.scaled_qr(&qr.lower, width, height)?;
        Ok((upper, lower))
    }

    fn scaled_qr(&self, payload: &QrPayload, width: u32, height: u32) -> Result<RgbImage> {
        let code = generate_qr_image(&payload.resolve()?, &self.qr_style)?;
        debug!(
            "Resizing {}x{} QR code to {}x{}",
            code.width(),
            code.height(),
            width,
            height
        );
        Ok(resize_qr(&code, width, height))
    }
}

fn open_image(path: &Path) -> Result<DynamicImage> {
    debug!("Loading image: {}", path.display());
    image::open(path).map_err(|e| MemeError::image(path, e))
}

/// Stretch to exactly `width × height`; the aspect ratio is not preserved.
fn resize_qr(code: &RgbImage, width: u32, height: u32) -> RgbImage {
    if width == 0 || height == 0 {
        return RgbImage::new(width, height);
    }
    imageops::resize(code, width, height, FilterType::CatmullRom)
}

fn paste_qr(canvas: &mut RgbImage, code: &RgbImage, at: Rect) {
    imageops::replace(canvas, code, at.x, at.y);
}

fn fill_rect(img: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.width as i64).min(img.width() as i64);
    let y1 = (rect.y + rect.height as i64).min(img.height() as i64);
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// Write `image` in the format implied by the extension of `path`.
///
/// The format is checked before the file is created, so an unusable output
/// path never leaves an empty file behind.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    let format = match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::Bmp)) => {
            format
        }
        _ => {
            return Err(MemeError::UnsupportedOutput {
                path: path.to_path_buf(),
            })
        }
    };

    debug!("Saving {:?} image to {}", format, path.display());
    encodable(image, format)
        .save_with_format(path, format)
        .map_err(|e| MemeError::image(path, e))
}

/// Convert to a colour type the encoder for `format` accepts, keeping the
/// image untouched when it already is one.
fn encodable(image: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    use image::ColorType::*;

    match (format, image.color()) {
        (ImageFormat::Png, L8 | La8 | Rgb8 | Rgba8 | L16 | La16 | Rgb16 | Rgba16)
        | (ImageFormat::Jpeg, L8 | Rgb8)
        | (ImageFormat::Bmp, L8 | La8 | Rgb8 | Rgba8)
        | (ImageFormat::Gif, Rgb8 | Rgba8) => Cow::Borrowed(image),
        // JPEG has no alpha channel.
        (ImageFormat::Jpeg, _) => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
        (_, color) if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}
