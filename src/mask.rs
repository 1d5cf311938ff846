// ============================================================================
// MASK RASTERIZER — selection geometry → binary per-pixel inclusion mask
// ============================================================================

use image::GrayImage;

/// Axis-aligned rectangular region in raster coordinates.
/// Invariants: `left < right`, `top < bottom`, all within image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRegion {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoxRegion {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// True when the box spans the entire image.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.left == 0 && self.top == 0 && self.right == width && self.bottom == height
    }
}

/// A user selection, always in raster pixel coordinates (the coordinate
/// mapper has already removed any viewer-space notion of "up").
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionGeometry {
    Box(BoxRegion),
    /// Ordered boundary points; closure back to the first point is implicit.
    Polygon(Vec<(f32, f32)>),
}

impl SelectionGeometry {
    pub fn full_image(width: u32, height: u32) -> Self {
        SelectionGeometry::Box(BoxRegion {
            left: 0,
            top: 0,
            right: width,
            bottom: height,
        })
    }
}

/// Binary inclusion mask over a pixel grid. 255 = included, 0 = excluded.
/// Derived per operation, never persisted.
pub struct PixelMask {
    bits: GrayImage,
    covered: u64,
}

impl PixelMask {
    pub fn width(&self) -> u32 {
        self.bits.width()
    }

    pub fn height(&self) -> u32 {
        self.bits.height()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.bits.width() && y < self.bits.height() && self.bits.get_pixel(x, y).0[0] > 0
    }

    /// Number of included pixels.
    pub fn coverage(&self) -> u64 {
        self.covered
    }

    /// An empty mask makes the whole operation a no-op.
    pub fn is_empty(&self) -> bool {
        self.covered == 0
    }

    /// Raw row-major 0/255 bytes, one per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.bits.as_raw()
    }
}

/// Rasterize a selection onto a `width` × `height` pixel grid.
///
/// Box: every pixel with `left ≤ x < right` and `top ≤ y < bottom`.
///
/// Polygon: even-odd scanline fill tested against pixel centers. For each row
/// the crossing x-intercepts are paired into spans `[a, b)`; a pixel is
/// included when its center `x + 0.5` lies in the span, i.e.
/// `x ∈ [ceil(a - 0.5), ceil(b - 0.5))`. Left-inclusive / right-exclusive, so
/// two polygons sharing an edge tile the plane with no double cover and no gap.
pub fn rasterize(geometry: &SelectionGeometry, width: u32, height: u32) -> PixelMask {
    match geometry {
        SelectionGeometry::Box(region) => rasterize_box(region, width, height),
        SelectionGeometry::Polygon(points) => rasterize_polygon(points, width, height),
    }
}

fn rasterize_box(region: &BoxRegion, width: u32, height: u32) -> PixelMask {
    let mut bits = GrayImage::new(width, height);
    let right = region.right.min(width);
    let bottom = region.bottom.min(height);
    let mut covered = 0u64;
    for y in region.top..bottom {
        for x in region.left..right {
            bits.put_pixel(x, y, image::Luma([255]));
            covered += 1;
        }
    }
    PixelMask { bits, covered }
}

fn rasterize_polygon(points: &[(f32, f32)], width: u32, height: u32) -> PixelMask {
    let mut bits = GrayImage::new(width, height);
    let mut covered = 0u64;

    // Fewer than three distinct vertices cannot enclose area; collinear and
    // zero-area rings fall out of the scanline pairing naturally.
    if distinct_points(points) < 3 {
        return PixelMask { bits, covered };
    }

    let n = points.len();
    let mut nodes: Vec<f32> = Vec::with_capacity(8);

    for y in 0..height {
        let yc = y as f32 + 0.5; // pixel row center
        nodes.clear();

        // Walk the edges, including the implicit closing edge n-1 → 0.
        for i in 0..n {
            let j = (i + 1) % n;
            let yi = points[i].1;
            let yj = points[j].1;
            if (yi < yc && yj >= yc) || (yj < yc && yi >= yc) {
                let t = (yc - yi) / (yj - yi);
                nodes.push(points[i].0 + t * (points[j].0 - points[i].0));
            }
        }
        nodes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Fill between pairs of crossings.
        let mut k = 0;
        while k + 1 < nodes.len() {
            let x_start = span_bound(nodes[k], width);
            let x_end = span_bound(nodes[k + 1], width);
            for x in x_start..x_end {
                bits.put_pixel(x, y, image::Luma([255]));
                covered += 1;
            }
            k += 2;
        }
    }

    PixelMask { bits, covered }
}

/// First pixel index whose center `x + 0.5` is ≥ the crossing, clamped to the
/// row. Used for both span ends, which is what makes spans half-open.
fn span_bound(crossing: f32, width: u32) -> u32 {
    let b = (crossing - 0.5).ceil();
    if b <= 0.0 {
        0
    } else {
        (b as u64).min(u64::from(width)) as u32
    }
}

fn distinct_points(points: &[(f32, f32)]) -> usize {
    let mut seen: Vec<(f32, f32)> = Vec::with_capacity(points.len());
    for &p in points {
        if !seen.contains(&p) {
            seen.push(p);
        }
    }
    seen.len()
}
