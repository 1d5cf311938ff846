// ============================================================================
// CONVOLUTION FILTERS — the ten fixed-kernel filters
// ============================================================================
//
// Kernels follow the classic image-processing definitions of the same names
// (integer weights with a normalizing divisor and an additive offset). The
// margin that the kernel cannot reach is copied from the source, so a filter
// on a uniform image is exactly the identity and region crops keep their
// original border bytes.

use image::RgbaImage;
use rayon::prelude::*;

/// A square convolution kernel: `out = clamp(Σ(w·px) / scale + offset)`.
pub struct Kernel {
    pub size: usize,
    pub weights: &'static [f32],
    pub scale: f32,
    pub offset: f32,
}

#[rustfmt::skip]
pub const BLUR: Kernel = Kernel {
    size: 5,
    weights: &[
        1.0, 1.0, 1.0, 1.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 0.0, 0.0, 0.0, 1.0,
        1.0, 1.0, 1.0, 1.0, 1.0,
    ],
    scale: 16.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const CONTOUR: Kernel = Kernel {
    size: 3,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  8.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
    scale: 1.0,
    offset: 255.0,
};

#[rustfmt::skip]
pub const DETAIL: Kernel = Kernel {
    size: 3,
    weights: &[
         0.0, -1.0,  0.0,
        -1.0, 10.0, -1.0,
         0.0, -1.0,  0.0,
    ],
    scale: 6.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const EDGE_ENHANCE: Kernel = Kernel {
    size: 3,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0, 10.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
    scale: 2.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const EDGE_ENHANCE_MORE: Kernel = Kernel {
    size: 3,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  9.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
    scale: 1.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const EMBOSS: Kernel = Kernel {
    size: 3,
    weights: &[
        -1.0, 0.0, 0.0,
         0.0, 1.0, 0.0,
         0.0, 0.0, 0.0,
    ],
    scale: 1.0,
    offset: 128.0,
};

#[rustfmt::skip]
pub const FIND_EDGES: Kernel = Kernel {
    size: 3,
    weights: &[
        -1.0, -1.0, -1.0,
        -1.0,  8.0, -1.0,
        -1.0, -1.0, -1.0,
    ],
    scale: 1.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const SHARPEN: Kernel = Kernel {
    size: 3,
    weights: &[
        -2.0, -2.0, -2.0,
        -2.0, 32.0, -2.0,
        -2.0, -2.0, -2.0,
    ],
    scale: 16.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const SMOOTH: Kernel = Kernel {
    size: 3,
    weights: &[
        1.0, 1.0, 1.0,
        1.0, 5.0, 1.0,
        1.0, 1.0, 1.0,
    ],
    scale: 13.0,
    offset: 0.0,
};

#[rustfmt::skip]
pub const SMOOTH_MORE: Kernel = Kernel {
    size: 5,
    weights: &[
        1.0, 1.0,  1.0, 1.0, 1.0,
        1.0, 5.0,  5.0, 5.0, 1.0,
        1.0, 5.0, 44.0, 5.0, 1.0,
        1.0, 5.0,  5.0, 5.0, 1.0,
        1.0, 1.0,  1.0, 1.0, 1.0,
    ],
    scale: 100.0,
    offset: 0.0,
};

/// Convolve the RGB channels with `kernel`, rows in parallel. Alpha is
/// carried through from the source. Images smaller than the kernel are
/// returned unchanged — there is no neighborhood to filter.
pub fn convolve(src: &RgbaImage, kernel: &Kernel) -> RgbaImage {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let margin = kernel.size / 2;
    if w < kernel.size || h < kernel.size {
        return src.clone();
    }

    let src_raw = src.as_raw();
    let stride = w * 4;
    let inv_scale = 1.0 / kernel.scale;

    // Start from a copy so the unreachable margin keeps its source bytes.
    let mut dst_raw = src_raw.clone();

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            if y < margin || y >= h - margin {
                return;
            }
            for x in margin..w - margin {
                let mut r = 0.0f32;
                let mut g = 0.0f32;
                let mut b = 0.0f32;
                for ky in 0..kernel.size {
                    let sy = y + ky - margin;
                    let row_off = sy * stride;
                    for kx in 0..kernel.size {
                        let kv = kernel.weights[ky * kernel.size + kx];
                        if kv == 0.0 {
                            continue;
                        }
                        let sx = x + kx - margin;
                        let idx = row_off + sx * 4;
                        r += src_raw[idx] as f32 * kv;
                        g += src_raw[idx + 1] as f32 * kv;
                        b += src_raw[idx + 2] as f32 * kv;
                    }
                }
                let pi = x * 4;
                row_out[pi] = (r * inv_scale + kernel.offset).round().clamp(0.0, 255.0) as u8;
                row_out[pi + 1] = (g * inv_scale + kernel.offset).round().clamp(0.0, 255.0) as u8;
                row_out[pi + 2] = (b * inv_scale + kernel.offset).round().clamp(0.0, 255.0) as u8;
                // pi + 3 (alpha) already holds the source value from the copy.
            }
        });

    RgbaImage::from_raw(w as u32, h as u32, dst_raw)
        .unwrap_or_else(|| src.clone())
}
