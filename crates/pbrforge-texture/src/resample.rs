//! Resampling and 8-bit quantization.
//!
//! Resizes go through `image`'s Lanczos3 filter, which widens its support
//! when minifying and so behaves as an area filter for downsampling.
//! Fields are padded toroidally by the filter support before resizing and
//! cropped afterwards, so tileable input stays tileable.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Pixel, Rgb};

use crate::field::{ScalarField, VectorField3};

/// Lanczos3 support radius in source pixels at unit scale.
const LANCZOS3_SUPPORT: f64 = 3.0;

/// Quantize a unit value to 8 bits with rounding.
#[inline]
pub fn quantize(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Wrap padding along one axis as `(source_pad, target_pad)`.
///
/// The source pad covers the filter support and is a multiple of
/// `src / gcd(src, dst)`, so the target pad is a whole number of pixels and
/// padded and unpadded pixel centers line up.
fn wrap_padding(src: u32, dst: u32) -> (u32, u32) {
    let step = src / gcd(src, dst);
    let support = LANCZOS3_SUPPORT * (src as f64 / dst as f64).max(1.0);
    let needed = support.ceil() as u32 + 1;
    let source_pad = needed.div_ceil(step) * step;
    (source_pad, source_pad / step * (dst / gcd(src, dst)))
}

/// Resize a `width` x `height` toroidal image read through `sample`.
fn resize_wrapped<P>(
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
    sample: impl Fn(i64, i64) -> P,
) -> ImageBuffer<P, Vec<f32>>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    let (pad_x, new_pad_x) = wrap_padding(width, new_width);
    let (pad_y, new_pad_y) = wrap_padding(height, new_height);

    let padded = ImageBuffer::from_fn(width + 2 * pad_x, height + 2 * pad_y, |x, y| {
        sample(x as i64 - pad_x as i64, y as i64 - pad_y as i64)
    });
    let resized = imageops::resize(
        &padded,
        new_width + 2 * new_pad_x,
        new_height + 2 * new_pad_y,
        FilterType::Lanczos3,
    );
    imageops::crop_imm(&resized, new_pad_x, new_pad_y, new_width, new_height).to_image()
}

/// Resize a scalar field. Same-size requests return an unchanged copy.
///
/// Lanczos ringing is clamped back into [0, 1].
pub fn resample_scalar(field: &ScalarField, width: u32, height: u32) -> ScalarField {
    if field.width == width && field.height == height {
        return field.clone();
    }

    let resized: ImageBuffer<Luma<f32>, Vec<f32>> =
        resize_wrapped(field.width, field.height, width, height, |x, y| {
            Luma([field.get_wrapped(x, y) as f32])
        });

    ScalarField {
        width,
        height,
        data: resized
            .pixels()
            .map(|p| (p.0[0] as f64).clamp(0.0, 1.0))
            .collect(),
    }
}

/// Resize a color field component-wise.
pub fn resample_color(field: &VectorField3, width: u32, height: u32) -> VectorField3 {
    if field.width == width && field.height == height {
        return field.clone();
    }

    let resized: ImageBuffer<Rgb<f32>, Vec<f32>> =
        resize_wrapped(field.width, field.height, width, height, |x, y| {
            let [r, g, b] = field.get_wrapped(x, y);
            Rgb([r as f32, g as f32, b as f32])
        });

    VectorField3 {
        width,
        height,
        data: resized
            .pixels()
            .map(|p| p.0.map(|c| (c as f64).clamp(0.0, 1.0)))
            .collect(),
    }
}

/// Resize an encoded normal field and restore unit length.
pub fn resample_normals(field: &VectorField3, width: u32, height: u32) -> VectorField3 {
    if field.width == width && field.height == height {
        return field.clone();
    }
    renormalize_normals(&resample_color(field, width, height))
}

/// Re-normalize every encoded normal to unit length.
///
/// A degenerate vector becomes the flat normal.
pub fn renormalize_normals(field: &VectorField3) -> VectorField3 {
    VectorField3 {
        width: field.width,
        height: field.height,
        data: field
            .data
            .iter()
            .map(|v| {
                let n = v.map(|c| c * 2.0 - 1.0);
                let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
                if len < 1e-9 {
                    [0.5, 0.5, 1.0]
                } else {
                    n.map(|c| (c / len + 1.0) * 0.5)
                }
            })
            .collect(),
    }
}
