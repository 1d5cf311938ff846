// ============================================================================
// COORDINATE MAPPER — viewer axes (origin bottom-left) → raster (top-left)
// ============================================================================
//
// The viewer draws the image into a plot whose y axis runs 0..height from the
// image's BOTTOM edge upward, while raster storage puts row 0 at the TOP.
// Selections therefore arrive y-flipped relative to pixel space:
//
//     raster_top    = height - viewer_y_upper
//     raster_bottom = height - viewer_y_lower
//
// The x axis already matches raster columns. All mapped geometry is expressed
// in raster pixel coordinates; viewer coordinates never leave this module.

use serde::{Deserialize, Serialize};

use crate::mask::{BoxRegion, SelectionGeometry};

/// A selection event as emitted by the viewer, in viewer coordinate space.
///
/// Box drags arrive as axis ranges, lasso drags as parallel point arrays —
/// the two shapes the plotting widget's relayout payload takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectionEvent {
    Box {
        x_range: [f64; 2],
        y_range: [f64; 2],
    },
    Lasso {
        x: Vec<f64>,
        y: Vec<f64>,
    },
}

/// Translate a viewer selection into raster-space geometry.
///
/// * `None` (no selection yet) → the full-image box.
/// * A box that clips to zero area → the full-image box. A selection is a
///   no-op-safe default, never an error.
/// * Lasso points keep their emission order; closure is implicit.
pub fn map_selection(
    event: Option<&SelectionEvent>,
    width: u32,
    height: u32,
) -> SelectionGeometry {
    match event {
        None => SelectionGeometry::full_image(width, height),
        Some(SelectionEvent::Box { x_range, y_range }) => {
            map_box(x_range, y_range, width, height)
        }
        Some(SelectionEvent::Lasso { x, y }) => map_lasso(x, y, height),
    }
}

fn map_box(x_range: &[f64; 2], y_range: &[f64; 2], width: u32, height: u32) -> SelectionGeometry {
    // Normalize: the viewer reports left-to-right, but a right-to-left drag
    // can invert the ranges. Order explicitly before flipping.
    let (x_lo, x_hi) = ordered(x_range[0], x_range[1]);
    let (y_lo, y_hi) = ordered(y_range[0], y_range[1]);

    let left = clamp_axis(x_lo, width);
    let right = clamp_axis(x_hi, width);
    let top = clamp_axis(f64::from(height) - y_hi, height);
    let bottom = clamp_axis(f64::from(height) - y_lo, height);

    if left >= right || top >= bottom {
        // Degenerate or fully out-of-frame drag — fall back to the whole image.
        return SelectionGeometry::full_image(width, height);
    }

    SelectionGeometry::Box(BoxRegion {
        left,
        top,
        right,
        bottom,
    })
}

fn map_lasso(xs: &[f64], ys: &[f64], height: u32) -> SelectionGeometry {
    let points = xs
        .iter()
        .zip(ys.iter())
        .map(|(&x, &y)| (x as f32, (f64::from(height) - y) as f32))
        .collect();
    SelectionGeometry::Polygon(points)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Round a viewer coordinate to the nearest pixel index, clamped to [0, max].
fn clamp_axis(v: f64, max: u32) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    (v.round() as u64).min(u64::from(max)) as u32
}
