// ============================================================================
// REGION COMPOSITOR — apply an operation inside a selection, leave the rest
// ============================================================================
//
// Two strategies, deliberately asymmetric:
//
// * Box: crop the selection, run the operation on the crop only, paste the
//   result back at the original offset. Cost scales with the selection area
//   and every byte outside the box is untouched by construction.
// * Polygon: run the operation on a full-image copy, then composite the
//   filtered pixels through the mask. Filters need the surrounding context
//   to blend correctly across an irregular boundary, so the whole image is
//   transformed even though only masked pixels survive.

use image::{RgbaImage, imageops};
use rayon::prelude::*;

use crate::mask::{self, SelectionGeometry};
use crate::ops::{self, OperationSpec};

/// Apply `spec` to the selected region of `image`, returning a new image.
/// The input is never mutated; repeating the call with the same inputs
/// yields the same output.
pub fn apply_to_region(
    image: &RgbaImage,
    selection: &SelectionGeometry,
    spec: &OperationSpec,
) -> RgbaImage {
    match selection {
        SelectionGeometry::Box(region) => {
            if region.covers(image.width(), image.height()) {
                return ops::apply(image, spec);
            }
            let crop = imageops::crop_imm(
                image,
                region.left,
                region.top,
                region.width(),
                region.height(),
            )
            .to_image();
            let filtered = ops::apply(&crop, spec);

            let mut out = image.clone();
            imageops::replace(
                &mut out,
                &filtered,
                i64::from(region.left),
                i64::from(region.top),
            );
            out
        }
        SelectionGeometry::Polygon(_) => {
            let pixel_mask = mask::rasterize(selection, image.width(), image.height());
            if pixel_mask.is_empty() {
                // Degenerate lasso — true no-op, not an error.
                return image.clone();
            }
            let filtered = ops::apply(image, spec);
            composite_masked(image, &filtered, &pixel_mask)
        }
    }
}

/// `out[p] = mask[p] ? filtered[p] : original[p]`, rows in parallel.
fn composite_masked(
    original: &RgbaImage,
    filtered: &RgbaImage,
    pixel_mask: &mask::PixelMask,
) -> RgbaImage {
    let w = original.width() as usize;
    let stride = w * 4;
    let orig_raw = original.as_raw();
    let filt_raw = filtered.as_raw();
    let mask_raw = pixel_mask.as_raw();
    let mut dst_raw = vec![0u8; orig_raw.len()];

    dst_raw
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row_out)| {
            let off = y * stride;
            let mask_row = y * w;
            for x in 0..w {
                let pi = x * 4;
                let src = if mask_raw[mask_row + x] > 0 {
                    &filt_raw[off + pi..off + pi + 4]
                } else {
                    &orig_raw[off + pi..off + pi + 4]
                };
                row_out[pi..pi + 4].copy_from_slice(src);
            }
        });

    RgbaImage::from_raw(original.width(), original.height(), dst_raw)
        .unwrap_or_else(|| original.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::BoxRegion;
    use crate::ops::OperationKind;
    use image::Rgba;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        let mut img = RgbaImage::new(w, h);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255]);
        }
        img
    }

    fn spec(kind: OperationKind, factor: f32) -> OperationSpec {
        OperationSpec { kind, factor }
    }

    #[test]
    fn box_filter_leaves_outside_byte_identical() {
        let img = gradient(100, 100);
        let region = SelectionGeometry::Box(BoxRegion {
            left: 10,
            top: 10,
            right: 50,
            bottom: 50,
        });
        let out = apply_to_region(&img, &region, &spec(OperationKind::FindEdges, 1.0));
        let mut changed = 0;
        for y in 0..100 {
            for x in 0..100 {
                let inside = (10..50).contains(&x) && (10..50).contains(&y);
                if !inside {
                    assert_eq!(out.get_pixel(x, y), img.get_pixel(x, y), "({x},{y}) leaked");
                } else if out.get_pixel(x, y) != img.get_pixel(x, y) {
                    changed += 1;
                }
            }
        }
        assert!(changed > 0, "filter had no visible effect inside the box");
    }

    #[test]
    fn lasso_filter_leaves_unmasked_pixels_untouched() {
        let img = gradient(40, 40);
        let lasso = SelectionGeometry::Polygon(vec![
            (5.0, 5.0),
            (30.0, 8.0),
            (25.0, 32.0),
            (8.0, 28.0),
        ]);
        let pixel_mask = mask::rasterize(&lasso, 40, 40);
        assert!(!pixel_mask.is_empty());

        let out = apply_to_region(&img, &lasso, &spec(OperationKind::Brightness, 0.0));
        for y in 0..40 {
            for x in 0..40 {
                if pixel_mask.contains(x, y) {
                    assert_eq!(&out.get_pixel(x, y).0[..3], &[0, 0, 0]);
                } else {
                    assert_eq!(out.get_pixel(x, y), img.get_pixel(x, y));
                }
            }
        }
    }

    #[test]
    fn empty_mask_is_a_true_noop() {
        let img = gradient(20, 20);
        let degenerate = SelectionGeometry::Polygon(vec![(3.0, 3.0), (15.0, 15.0)]);
        let out = apply_to_region(&img, &degenerate, &spec(OperationKind::FindEdges, 1.0));
        assert_eq!(out, img);
    }

    #[test]
    fn identity_enhancement_is_byte_identical() {
        let img = gradient(30, 30);
        let full = SelectionGeometry::full_image(30, 30);
        for kind in [
            OperationKind::Brightness,
            OperationKind::Color,
            OperationKind::Contrast,
            OperationKind::Sharpness,
        ] {
            assert_eq!(apply_to_region(&img, &full, &spec(kind, 1.0)), img);
        }
    }

    #[test]
    fn input_image_is_not_mutated() {
        let img = gradient(16, 16);
        let snapshot = img.clone();
        let full = SelectionGeometry::full_image(16, 16);
        let _ = apply_to_region(&img, &full, &spec(OperationKind::Emboss, 1.0));
        assert_eq!(img, snapshot);
    }

    #[test]
    fn box_contrast_uses_crop_statistics() {
        // A dark crop inside a bright image: contrast factor 0 flattens the
        // crop to the CROP's mean, not the global mean.
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([240, 240, 240, 255]));
        for y in 5..10 {
            for x in 5..10 {
                img.put_pixel(x, y, Rgba([10, 10, 10, 255]));
            }
        }
        let region = SelectionGeometry::Box(BoxRegion {
            left: 5,
            top: 5,
            right: 10,
            bottom: 10,
        });
        let out = apply_to_region(&img, &region, &spec(OperationKind::Contrast, 0.0));
        // Crop is uniform 10s, so its mean is 10 and factor 0 keeps it at 10.
        assert_eq!(out.get_pixel(7, 7), &Rgba([10, 10, 10, 255]));
        assert_eq!(out.get_pixel(0, 0), &Rgba([240, 240, 240, 255]));
    }
}
