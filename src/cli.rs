// ============================================================================
// regionfx CLI — apply one operation to a region of an image file
// ============================================================================
//
// Usage examples:
//   regionfx -i photo.png -o out.png --op sharpen
//   regionfx -i photo.jpg -o out.png --op brightness --factor 1.4
//   regionfx -i photo.png -o out.png --op find_edges --select-box 10,10,200,150
//   regionfx -i photo.png -o out.png --op smooth --lasso "30,20 90,25 70,110"
//
// Region coordinates on the command line are raster-space (origin top-left),
// not viewer-space — there is no plot axis to flip here.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::compositor;
use crate::mask::{BoxRegion, SelectionGeometry};
use crate::ops::OperationSpec;

/// Headless region image processor.
#[derive(Parser, Debug)]
#[command(
    name = "regionfx",
    about = "Apply a filter or enhancement to a region of an image",
    long_about = "Apply one of the built-in filters (blur, contour, detail, edge_enhance,\n\
                  edge_enhance_more, emboss, find_edges, sharpen, smooth, smooth_more) or\n\
                  enhancements (brightness, color, contrast, sharpness) to a rectangular\n\
                  or polygonal region of an image. With no region flags the whole image\n\
                  is processed."
)]
pub struct CliArgs {
    /// Input image file (PNG, JPEG, WEBP, BMP).
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output file. Written as PNG regardless of extension.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Operation id, e.g. "sharpen" or "brightness".
    #[arg(long, value_name = "ID")]
    pub op: String,

    /// Enhancement strength in [0, 2]; 1.0 leaves the image unchanged.
    /// Ignored by the fixed filters.
    #[arg(long, value_name = "0..2")]
    pub factor: Option<f32>,

    /// Rectangular region as left,top,right,bottom in pixel coordinates.
    #[arg(long, value_name = "L,T,R,B", conflicts_with = "lasso")]
    pub select_box: Option<String>,

    /// Polygonal region as space-separated x,y pixel points (at least 3).
    #[arg(long, value_name = "\"x,y x,y ...\"")]
    pub lasso: Option<String>,

    /// Print timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the CLI to completion. `0` = success, `1` = failure.
pub fn run(args: CliArgs) -> ExitCode {
    match run_inner(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run_inner(args: &CliArgs) -> Result<(), String> {
    let spec = OperationSpec::from_id(&args.op, args.factor).map_err(|e| e.to_string())?;
    if args.factor.is_some() && !spec.kind.is_enhancement() {
        eprintln!("warning: --factor is ignored by the {} filter", spec.kind.label());
    }

    let start = Instant::now();
    let bytes = std::fs::read(&args.input)
        .map_err(|e| format!("could not read '{}': {e}", args.input.display()))?;
    let image = crate::codec::decode(&bytes).map_err(|e| e.to_string())?;
    let (w, h) = image.dimensions();

    let selection = parse_selection(args, w, h)?;
    let result = compositor::apply_to_region(&image, &selection, &spec);

    let png = crate::codec::encode_png(&result).map_err(|e| e.to_string())?;
    std::fs::write(&args.output, png)
        .map_err(|e| format!("could not write '{}': {e}", args.output.display()))?;

    if args.verbose {
        println!(
            "{} on {}x{} → {} ({:.0}ms)",
            spec.kind.label(),
            w,
            h,
            args.output.display(),
            start.elapsed().as_secs_f64() * 1000.0
        );
    }
    Ok(())
}

fn parse_selection(args: &CliArgs, width: u32, height: u32) -> Result<SelectionGeometry, String> {
    if let Some(spec) = &args.select_box {
        let parts: Vec<u32> = spec
            .split(',')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("bad --select-box '{spec}': {e}"))?;
        let [left, top, right, bottom] = parts[..] else {
            return Err(format!("bad --select-box '{spec}': expected L,T,R,B"));
        };
        let region = BoxRegion {
            left,
            top,
            right: right.min(width),
            bottom: bottom.min(height),
        };
        if region.left >= region.right || region.top >= region.bottom {
            return Err(format!("bad --select-box '{spec}': zero-area region"));
        }
        return Ok(SelectionGeometry::Box(region));
    }

    if let Some(spec) = &args.lasso {
        let mut points = Vec::new();
        for pair in spec.split_whitespace() {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| format!("bad --lasso point '{pair}': expected x,y"))?;
            let x: f32 = x.trim().parse().map_err(|e| format!("bad --lasso x '{x}': {e}"))?;
            let y: f32 = y.trim().parse().map_err(|e| format!("bad --lasso y '{y}': {e}"))?;
            points.push((x, y));
        }
        if points.len() < 3 {
            return Err("--lasso needs at least 3 points".to_string());
        }
        return Ok(SelectionGeometry::Polygon(points));
    }

    Ok(SelectionGeometry::full_image(width, height))
}
