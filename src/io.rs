use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, bail};
use glitch_core::{EffectSpec, Image8};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info};

/// JPEG quality for full-resolution output.
pub const FULL_JPEG_QUALITY: u8 = 95;

/// Decode any supported image file into an 8-bit buffer.
///
/// Grayscale, RGB and RGBA are kept as is; other layouts are converted to
/// RGB, or RGBA when they carry alpha.
pub fn load_image(path: &Path) -> Result<Image8> {
    info!(?path, "loading image file");
    let t0 = std::time::Instant::now();

    let img =
        image::open(path).with_context(|| format!("failed to open image: {}", path.display()))?;
    debug!(
        elapsed_ms = t0.elapsed().as_millis(),
        width = img.width(),
        height = img.height(),
        "image decode"
    );

    let (width, height) = (img.width(), img.height());
    let (channels, data) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other if other.color().has_alpha() => (4, other.into_rgba8().into_raw()),
        other => (3, other.into_rgb8().into_raw()),
    };
    Ok(Image8::from_data(width, height, channels, data)?)
}

/// Encode `image` to `path`, picking the format from the extension.
///
/// JPEG output drops alpha and uses `jpeg_quality`.
pub fn save_image(path: &Path, image: &Image8, jpeg_quality: u8) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("unknown output format: {}", path.display()))?;
    let dynamic = glitch_preview::to_dynamic(image)?;

    match format {
        ImageFormat::Jpeg => {
            let file = File::create(path)
                .with_context(|| format!("create output: {}", path.display()))?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), jpeg_quality);
            let dynamic = if image.channels == 4 {
                DynamicImage::ImageRgb8(dynamic.into_rgb8())
            } else {
                dynamic
            };
            dynamic
                .write_with_encoder(encoder)
                .with_context(|| format!("encode JPEG: {}", path.display()))?;
        }
        ImageFormat::Png | ImageFormat::Tiff => {
            dynamic
                .save_with_format(path, format)
                .with_context(|| format!("write image: {}", path.display()))?;
        }
        other => bail!("unsupported output format {other:?}: {}", path.display()),
    }

    debug!(?path, ?format, "wrote image");
    Ok(())
}

pub fn load_spec(path: &Path) -> Result<EffectSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read effect spec: {}", path.display()))?;
    EffectSpec::from_json(&text).with_context(|| format!("parse effect spec: {}", path.display()))
}
