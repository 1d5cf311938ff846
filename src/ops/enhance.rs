// ============================================================================
// ENHANCEMENTS — factor-parametrized adjustments (brightness, color,
// contrast, sharpness)
// ============================================================================
//
// Each enhancement is a linear blend between the input and a "degenerate"
// version of it:
//
//     out = degenerate + factor · (input − degenerate)
//
// factor 1.0 reproduces the input exactly, 0.0 yields the degenerate image
// (black / grayscale / flat gray / smoothed), and values up to 2.0 push past
// the input in the opposite direction. The blend is continuous and monotonic
// in the factor, which is what the UI slider relies on.

use image::RgbaImage;
use rayon::prelude::*;

use super::filters;

/// ITU-R 601-2 luma, the grayscale reference for color and contrast.
#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    (299.0 * r + 587.0 * g + 114.0 * b) / 1000.0
}

/// Row-parallel per-pixel transform. RGB is replaced, alpha carried through.
fn map_pixels<F>(src: &RgbaImage, transform: F) -> RgbaImage
where
    F: Fn(f32, f32, f32) -> (f32, f32, f32) + Sync,
{
    let w = src.width() as usize;
    let h = src.height() as usize;
    if w == 0 || h == 0 {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w * 4;
    let mut dst_raw = vec![0u8; w * h * 4];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let row_in = &src_raw[y * stride..(y + 1) * stride];
            for x in 0..w {
                let pi = x * 4;
                let (nr, ng, nb) = transform(
                    row_in[pi] as f32,
                    row_in[pi + 1] as f32,
                    row_in[pi + 2] as f32,
                );
                row_out[pi] = nr.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 1] = ng.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 2] = nb.round().clamp(0.0, 255.0) as u8;
                row_out[pi + 3] = row_in[pi + 3];
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw).unwrap_or_else(|| src.clone())
}

/// Scale luminance. Degenerate: black — factor 0 blacks the region out.
pub fn brightness(src: &RgbaImage, factor: f32) -> RgbaImage {
    map_pixels(src, |r, g, b| (r * factor, g * factor, b * factor))
}

/// Scale chroma. Degenerate: the grayscale image — factor 0 desaturates.
pub fn color(src: &RgbaImage, factor: f32) -> RgbaImage {
    map_pixels(src, |r, g, b| {
        let l = luma(r, g, b);
        (
            l + factor * (r - l),
            l + factor * (g - l),
            l + factor * (b - l),
        )
    })
}

/// Scale deviation from the region's mean gray. Degenerate: a solid gray at
/// the mean luminance of the region the operation runs on.
pub fn contrast(src: &RgbaImage, factor: f32) -> RgbaImage {
    let mean = mean_luma(src);
    map_pixels(src, |r, g, b| {
        (
            mean + factor * (r - mean),
            mean + factor * (g - mean),
            mean + factor * (b - mean),
        )
    })
}

/// Blend against a smoothed copy: factor 0 is fully smoothed, 2.0 roughly
/// doubles the local detail (an edge-enhanced look).
pub fn sharpness(src: &RgbaImage, factor: f32) -> RgbaImage {
    let smoothed = filters::convolve(src, &filters::SMOOTH);
    let w = src.width() as usize;
    let stride = w * 4;
    let src_raw = src.as_raw();
    let smooth_raw = smoothed.as_raw();
    let mut dst_raw = vec![0u8; src_raw.len()];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let off = y * stride;
            for x in 0..w {
                let pi = x * 4;
                for c in 0..3 {
                    let s = smooth_raw[off + pi + c] as f32;
                    let v = src_raw[off + pi + c] as f32;
                    row_out[pi + c] = (s + factor * (v - s)).round().clamp(0.0, 255.0) as u8;
                }
                row_out[pi + 3] = src_raw[off + pi + 3];
            }
        });

    RgbaImage::from_raw(src.width(), src.height(), dst_raw).unwrap_or_else(|| src.clone())
}

/// Mean luma of the whole buffer, rounded to the nearest integer gray level
/// the way histogram-mean contrast references are conventionally taken.
fn mean_luma(src: &RgbaImage) -> f32 {
    let raw = src.as_raw();
    let pixels = raw.len() / 4;
    if pixels == 0 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for px in raw.chunks_exact(4) {
        sum += f64::from(luma(px[0] as f32, px[1] as f32, px[2] as f32));
    }
    ((sum / pixels as f64) + 0.5).floor() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        let mut img = RgbaImage::new(6, 4);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([
                (x * 40) as u8,
                (y * 60) as u8,
                (x * 10 + y * 20) as u8,
                255,
            ]);
        }
        img
    }

    #[test]
    fn factor_one_is_byte_identical() {
        let img = sample();
        assert_eq!(brightness(&img, 1.0), img);
        assert_eq!(color(&img, 1.0), img);
        assert_eq!(contrast(&img, 1.0), img);
        assert_eq!(sharpness(&img, 1.0), img);
    }

    #[test]
    fn brightness_zero_is_black() {
        let out = brightness(&sample(), 0.0);
        for px in out.pixels() {
            assert_eq!(&px.0[..3], &[0, 0, 0]);
            assert_eq!(px.0[3], 255);
        }
    }

    #[test]
    fn brightness_two_never_darkens() {
        let img = sample();
        let out = brightness(&img, 2.0);
        for (a, b) in img.pixels().zip(out.pixels()) {
            for c in 0..3 {
                assert!(b.0[c] >= a.0[c]);
            }
        }
    }

    #[test]
    fn color_zero_desaturates() {
        let out = color(&sample(), 0.0);
        for px in out.pixels() {
            assert_eq!(px.0[0], px.0[1]);
            assert_eq!(px.0[1], px.0[2]);
        }
    }

    #[test]
    fn contrast_zero_is_flat_mean_gray() {
        let img = sample();
        let out = contrast(&img, 0.0);
        let first = out.get_pixel(0, 0).0;
        for px in out.pixels() {
            assert_eq!(px.0, first);
        }
        assert_eq!(first[0], first[1]);
        assert_eq!(first[1], first[2]);
    }

    #[test]
    fn contrast_is_monotone_in_factor_per_channel() {
        let img = sample();
        let lo = contrast(&img, 0.5);
        let hi = contrast(&img, 1.5);
        let mid = contrast(&img, 1.0);
        for ((l, m), h) in lo.pixels().zip(mid.pixels()).zip(hi.pixels()) {
            for c in 0..3 {
                // Moving the factor away from 1 pushes each channel further
                // from the mean, in the same direction on both sides.
                let (lo_c, mid_c, hi_c) = (l.0[c] as i16, m.0[c] as i16, h.0[c] as i16);
                assert!((hi_c - mid_c) * (mid_c - lo_c) >= 0);
            }
        }
    }

    #[test]
    fn sharpness_zero_equals_smooth_filter() {
        let img = sample();
        assert_eq!(sharpness(&img, 0.0), filters::convolve(&img, &filters::SMOOTH));
    }

    #[test]
    fn alpha_is_untouched() {
        let mut img = sample();
        img.put_pixel(1, 1, Rgba([10, 20, 30, 77]));
        for out in [
            brightness(&img, 0.3),
            color(&img, 1.7),
            contrast(&img, 0.2),
            sharpness(&img, 1.9),
        ] {
            assert_eq!(out.get_pixel(1, 1).0[3], 77);
        }
    }
}
