use std::fmt;

use glitch_core::{Error, Image8, Result};
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use tracing::debug;

/// Preview quality presets. Each bounds the longer image side and carries a
/// JPEG quality hint for encoding the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PreviewMode {
    Fast,
    #[default]
    Balanced,
    HighQuality,
}

impl PreviewMode {
    pub const ALL: [PreviewMode; 3] = [
        PreviewMode::Fast,
        PreviewMode::Balanced,
        PreviewMode::HighQuality,
    ];

    pub fn max_size(self) -> u32 {
        match self {
            PreviewMode::Fast => 300,
            PreviewMode::Balanced => 500,
            PreviewMode::HighQuality => 800,
        }
    }

    pub fn quality(self) -> u8 {
        match self {
            PreviewMode::Fast => 75,
            PreviewMode::Balanced => 85,
            PreviewMode::HighQuality => 95,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PreviewMode::Fast => "Fast",
            PreviewMode::Balanced => "Balanced",
            PreviewMode::HighQuality => "High Quality",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PreviewMode::Fast => "Fast preview (300px max)",
            PreviewMode::Balanced => "Balanced quality (500px max)",
            PreviewMode::HighQuality => "High quality (800px max)",
        }
    }

    /// Look a mode up by label or id. Anything unrecognized is `Balanced`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Fast" | "fast" => PreviewMode::Fast,
            "High Quality" | "high_quality" | "high-quality" => PreviewMode::HighQuality,
            "Balanced" | "balanced" => PreviewMode::Balanced,
            other => {
                debug!(mode = other, "unknown preview mode, using Balanced");
                PreviewMode::Balanced
            }
        }
    }
}

impl fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Target size for a downscale whose longer side becomes `max_size`.
///
/// Returns `None` when the image already fits.
pub fn preview_dimensions(width: u32, height: u32, max_size: u32) -> Option<(u32, u32)> {
    if width.max(height) <= max_size {
        return None;
    }
    let shrink = |short: u32, long: u32| {
        ((f64::from(short) * (f64::from(max_size) / f64::from(long))) as u32).max(1)
    };
    if height > width {
        Some((shrink(width, height), max_size))
    } else {
        Some((max_size, shrink(height, width)))
    }
}

/// Downscale `image` for interactive preview. Never upscales.
pub fn scale_for_preview(image: &Image8, mode: PreviewMode) -> Result<Image8> {
    if image.width == 0 || image.height == 0 {
        return Err(Error::invalid(format!(
            "cannot preview a {}x{} image",
            image.width, image.height
        )));
    }
    let Some((w, h)) = preview_dimensions(image.width, image.height, mode.max_size()) else {
        return Ok(image.clone());
    };

    let resized = to_dynamic(image)?.resize_exact(w, h, FilterType::Lanczos3);
    debug!(
        from = ?(image.width, image.height),
        to = ?(w, h),
        mode = mode.label(),
        "scaled for preview"
    );
    Image8::from_data(w, h, image.channels, resized.into_bytes())
}

/// [`scale_for_preview`] with the mode given by name.
pub fn scale_for_preview_named(image: &Image8, mode: &str) -> Result<Image8> {
    scale_for_preview(image, PreviewMode::from_name(mode))
}

/// Wrap an [`Image8`] in the matching `image` buffer type.
pub fn to_dynamic(image: &Image8) -> Result<DynamicImage> {
    let (w, h, data) = (image.width, image.height, image.data.clone());
    let dynamic = match image.channels {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
        c => {
            return Err(Error::invalid(format!("unsupported channel count {c}")));
        }
    };
    dynamic.ok_or_else(|| Error::processing("image buffer does not match its dimensions"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_table() {
        assert_eq!(PreviewMode::Fast.max_size(), 300);
        assert_eq!(PreviewMode::Balanced.max_size(), 500);
        assert_eq!(PreviewMode::HighQuality.max_size(), 800);
        assert_eq!(PreviewMode::HighQuality.quality(), 95);
        assert_eq!(PreviewMode::default(), PreviewMode::Balanced);
    }

    #[test]
    fn mode_names_round_trip_and_fall_back() {
        for mode in PreviewMode::ALL {
            assert_eq!(PreviewMode::from_name(mode.label()), mode);
        }
        assert_eq!(PreviewMode::from_name("high-quality"), PreviewMode::HighQuality);
        assert_eq!(PreviewMode::from_name("Ultra"), PreviewMode::Balanced);
        assert_eq!(PreviewMode::from_name(""), PreviewMode::Balanced);
    }

    #[test]
    fn dimensions_follow_longer_side() {
        assert_eq!(preview_dimensions(1000, 500, 300), Some((300, 150)));
        assert_eq!(preview_dimensions(500, 1000, 300), Some((150, 300)));
        assert_eq!(preview_dimensions(1000, 1000, 500), Some((500, 500)));
        // 333 * 300 / 1000 = 99.9 -> 99
        assert_eq!(preview_dimensions(1000, 333, 300), Some((300, 99)));
        assert_eq!(preview_dimensions(300, 200, 300), None);
        assert_eq!(preview_dimensions(5000, 2, 300), Some((300, 1)));
    }

    #[test]
    fn small_images_pass_through() {
        let img = Image8::filled(120, 80, 3, 9).unwrap();
        let out = scale_for_preview(&img, PreviewMode::Fast).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn large_images_shrink_for_every_layout() {
        for channels in [1, 3, 4] {
            let img = Image8::filled(640, 360, channels, 200).unwrap();
            let out = scale_for_preview(&img, PreviewMode::Fast).unwrap();
            assert_eq!(out.dims(), (300, 168, channels));
            assert!(out.data.iter().all(|&v| v.abs_diff(200) <= 1));
        }
    }

    #[test]
    fn unknown_name_uses_balanced() {
        let img = Image8::filled(1000, 400, 3, 0).unwrap();
        let out = scale_for_preview_named(&img, "nonsense").unwrap();
        assert_eq!((out.width, out.height), (500, 200));
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = Image8 {
            width: 0,
            height: 0,
            channels: 3,
            data: Vec::new(),
        };
        assert!(scale_for_preview(&img, PreviewMode::Fast).is_err());
    }
}
