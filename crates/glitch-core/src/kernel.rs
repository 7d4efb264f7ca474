//! Convolution kernels and sampling primitives shared by the filter modules.
//!
//! All convolutions here are correlations anchored at `(width / 2, height / 2)`
//! with clamp-to-edge borders, so no black frame is introduced at the edges.

use crate::error::{Error, Result};
use crate::image_buf::ImageBuf;

/// Round an even size up to the next odd one. Applied to every kernel size
/// and blur degree taken as a parameter.
pub fn oddify(n: u32) -> u32 {
    if n % 2 == 0 { n + 1 } else { n }
}

/// Dense 2D kernel, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    pub width: usize,
    pub height: usize,
    pub weights: Vec<f32>,
}

impl Kernel {
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            weights: vec![0.0; width * height],
        }
    }

    pub fn uniform(width: usize, height: usize, weight: f32) -> Self {
        Self {
            width,
            height,
            weights: vec![weight; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.weights[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, w: f32) {
        self.weights[y * self.width + x] = w;
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    pub fn nonzero_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }

    /// Nonzero taps as `(dx, dy, weight)` offsets relative to the anchor.
    fn taps(&self) -> Vec<(isize, isize, f32)> {
        let ax = (self.width / 2) as isize;
        let ay = (self.height / 2) as isize;
        let mut taps = Vec::new();
        for ky in 0..self.height {
            for kx in 0..self.width {
                let w = self.get(kx, ky);
                if w != 0.0 {
                    taps.push((kx as isize - ax, ky as isize - ay, w));
                }
            }
        }
        taps
    }
}

/// Square kernel holding a one-pixel line through its center.
///
/// The side is `oddify(length)`. The line runs from `center - offset` to
/// `center + offset`, where the offsets are `center * cos(angle)` and
/// `center * sin(angle)` truncated toward zero. If the rasterized line
/// carries no weight the all-zero kernel is returned as is.
pub fn motion_line_kernel(length: u32, angle_degrees: f64) -> Kernel {
    let size = oddify(length) as usize;
    let center = (size / 2) as i64;
    let rad = angle_degrees.to_radians();
    let x_offset = (center as f64 * rad.cos()) as i64;
    let y_offset = (center as f64 * rad.sin()) as i64;

    let mut kernel = Kernel::zeros(size, size);
    draw_line(
        &mut kernel,
        (center - x_offset, center - y_offset),
        (center + x_offset, center + y_offset),
    );

    let sum = kernel.sum();
    if sum > 0.0 {
        for w in &mut kernel.weights {
            *w /= sum;
        }
    }
    kernel
}

/// Bresenham rasterization (8-connected, endpoints inclusive).
fn draw_line(kernel: &mut Kernel, from: (i64, i64), to: (i64, i64)) {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && (x as usize) < kernel.width && (y as usize) < kernel.height {
            kernel.set(x as usize, y as usize, 1.0);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Uniform averaging kernel of side `oddify(size)`.
pub fn box_kernel(size: u32) -> Kernel {
    let side = oddify(size) as usize;
    Kernel::uniform(side, side, 1.0 / (side * side) as f32)
}

/// Normalized 1D Gaussian of length `oddify(size)`.
///
/// Sigma follows the usual auto-derivation for a zero sigma:
/// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel_1d(size: u32) -> Vec<f32> {
    let size = oddify(size) as usize;
    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size / 2) as f64;
    let denom = 2.0 * sigma * sigma;

    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

#[inline]
fn clamp_coord(v: isize, len: usize) -> usize {
    v.clamp(0, len as isize - 1) as usize
}

/// 2D correlation with clamp-to-edge borders. Returns a new buffer.
pub fn convolve(image: &ImageBuf, kernel: &Kernel) -> ImageBuf {
    let mut out = image.zeros_like();
    let (w, h) = (image.width as usize, image.height as usize);
    if w == 0 || h == 0 {
        return out;
    }
    let ch = image.channels as usize;
    let taps = kernel.taps();

    for y in 0..h {
        for x in 0..w {
            let dst = (y * w + x) * ch;
            for &(dx, dy, kw) in &taps {
                let sx = clamp_coord(x as isize + dx, w);
                let sy = clamp_coord(y as isize + dy, h);
                let src = (sy * w + sx) * ch;
                for c in 0..ch {
                    out.data[dst + c] += kw * image.data[src + c];
                }
            }
        }
    }
    out
}

/// Horizontal then vertical pass of a symmetric 1D kernel.
pub fn convolve_separable(image: &ImageBuf, kernel: &[f32]) -> ImageBuf {
    let (w, h) = (image.width as usize, image.height as usize);
    if w == 0 || h == 0 || kernel.is_empty() {
        return image.clone();
    }
    let ch = image.channels as usize;
    let radius = (kernel.len() / 2) as isize;

    let mut tmp = image.zeros_like();
    for y in 0..h {
        for x in 0..w {
            let dst = (y * w + x) * ch;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = clamp_coord(x as isize + ki as isize - radius, w);
                let src = (y * w + sx) * ch;
                for c in 0..ch {
                    tmp.data[dst + c] += kw * image.data[src + c];
                }
            }
        }
    }

    let mut out = image.zeros_like();
    for y in 0..h {
        for x in 0..w {
            let dst = (y * w + x) * ch;
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = clamp_coord(y as isize + ki as isize - radius, h);
                let src = (sy * w + x) * ch;
                for c in 0..ch {
                    out.data[dst + c] += kw * tmp.data[src + c];
                }
            }
        }
    }
    out
}

/// Shift content by `(dx, dy)` pixels, replicating edge pixels into the
/// exposed border.
pub fn translate(image: &ImageBuf, dx: i64, dy: i64) -> ImageBuf {
    let mut out = image.zeros_like();
    let (w, h) = (image.width as usize, image.height as usize);
    if w == 0 || h == 0 {
        return out;
    }
    let ch = image.channels as usize;

    for y in 0..h {
        let sy = clamp_coord((y as i64 - dy) as isize, h);
        for x in 0..w {
            let sx = clamp_coord((x as i64 - dx) as isize, w);
            let src = (sy * w + sx) * ch;
            let dst = (y * w + x) * ch;
            out.data[dst..dst + ch].copy_from_slice(&image.data[src..src + ch]);
        }
    }
    out
}

/// Copy the `width x height` window starting at `(x, y)`.
pub fn crop(image: &ImageBuf, x: u32, y: u32, width: u32, height: u32) -> Result<ImageBuf> {
    let fits_x = x.checked_add(width).is_some_and(|end| end <= image.width);
    let fits_y = y.checked_add(height).is_some_and(|end| end <= image.height);
    if !fits_x || !fits_y {
        return Err(Error::processing(format!(
            "crop {width}x{height}+{x}+{y} exceeds {}x{}",
            image.width, image.height
        )));
    }

    let ch = image.channels as usize;
    let mut data = Vec::with_capacity(width as usize * height as usize * ch);
    for row in y..y + height {
        let start = (row as usize * image.width as usize + x as usize) * ch;
        data.extend_from_slice(&image.data[start..start + width as usize * ch]);
    }
    ImageBuf::from_data(width, height, image.channels, data)
}

/// Per-axis sampling positions for pixel-center aligned bilinear resize.
fn bilinear_axis(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|i| {
            let f = ((i as f64 + 0.5) * scale - 0.5).max(0.0);
            let i0 = (f.floor() as usize).min(src_len - 1);
            let i1 = (i0 + 1).min(src_len - 1);
            let t = (f - i0 as f64).clamp(0.0, 1.0) as f32;
            (i0, i1, t)
        })
        .collect()
}

/// Bilinear resample of the working image to `new_width x new_height`.
pub fn resize_bilinear(image: &ImageBuf, new_width: u32, new_height: u32) -> Result<ImageBuf> {
    if image.width == 0 || image.height == 0 {
        return Err(Error::processing("cannot resample an empty image"));
    }
    if new_width == 0 || new_height == 0 {
        return Err(Error::invalid(format!(
            "resample target {new_width}x{new_height} has a zero dimension"
        )));
    }

    let mut out = ImageBuf::new(new_width, new_height, image.channels)?;
    let (w, ch) = (image.width as usize, image.channels as usize);
    let xs = bilinear_axis(w, new_width as usize);
    let ys = bilinear_axis(image.height as usize, new_height as usize);

    let mut dst = 0;
    for &(y0, y1, ty) in &ys {
        for &(x0, x1, tx) in &xs {
            let p00 = (y0 * w + x0) * ch;
            let p01 = (y0 * w + x1) * ch;
            let p10 = (y1 * w + x0) * ch;
            let p11 = (y1 * w + x1) * ch;
            for c in 0..ch {
                let top = image.data[p00 + c] * (1.0 - tx) + image.data[p01 + c] * tx;
                let bottom = image.data[p10 + c] * (1.0 - tx) + image.data[p11 + c] * tx;
                out.data[dst + c] = top * (1.0 - ty) + bottom * ty;
            }
            dst += ch;
        }
    }
    Ok(out)
}
