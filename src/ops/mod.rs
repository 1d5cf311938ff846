// ============================================================================
// OPERATION REGISTRY — closed enum of filters and enhancements
// ============================================================================
//
// The control panel speaks string ids; internally every operation is a
// variant of `OperationKind` so dispatch is exhaustive and an unknown id is
// rejected once, at parse time. Filters take no parameter; enhancements take
// a strength factor in [0, 2] where 1.0 is the identity.

pub mod enhance;
pub mod filters;

use image::RgbaImage;

use crate::error::{Error, Result};

/// Lower bound of the enhancement factor range.
pub const FACTOR_MIN: f32 = 0.0;
/// Upper bound of the enhancement factor range.
pub const FACTOR_MAX: f32 = 2.0;
/// Identity factor — applying an enhancement at 1.0 changes nothing.
pub const FACTOR_IDENTITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    // Fixed-kernel convolution filters.
    Blur,
    Contour,
    Detail,
    EdgeEnhance,
    EdgeEnhanceMore,
    Emboss,
    FindEdges,
    Sharpen,
    Smooth,
    SmoothMore,
    // Factor-parametrized enhancements.
    Brightness,
    Color,
    Contrast,
    Sharpness,
}

impl OperationKind {
    /// Parse a control-panel operation id. Hyphens and underscores are
    /// interchangeable ("edge-enhance-more" == "edge_enhance_more").
    pub fn parse(id: &str) -> Result<Self> {
        let normalized = id.trim().to_ascii_lowercase().replace('-', "_");
        Ok(match normalized.as_str() {
            "blur" => Self::Blur,
            "contour" => Self::Contour,
            "detail" => Self::Detail,
            "edge_enhance" => Self::EdgeEnhance,
            "edge_enhance_more" => Self::EdgeEnhanceMore,
            "emboss" => Self::Emboss,
            "find_edges" => Self::FindEdges,
            "sharpen" => Self::Sharpen,
            "smooth" => Self::Smooth,
            "smooth_more" => Self::SmoothMore,
            "brightness" => Self::Brightness,
            "color" => Self::Color,
            "contrast" => Self::Contrast,
            "sharpness" => Self::Sharpness,
            _ => return Err(Error::UnsupportedOperation(id.to_string())),
        })
    }

    /// True for operations that consume the strength factor.
    pub fn is_enhancement(self) -> bool {
        matches!(
            self,
            Self::Brightness | Self::Color | Self::Contrast | Self::Sharpness
        )
    }

    /// Human-readable name for logs and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Blur => "Blur",
            Self::Contour => "Contour",
            Self::Detail => "Detail",
            Self::EdgeEnhance => "Edge Enhance",
            Self::EdgeEnhanceMore => "Edge Enhance More",
            Self::Emboss => "Emboss",
            Self::FindEdges => "Find Edges",
            Self::Sharpen => "Sharpen",
            Self::Smooth => "Smooth",
            Self::SmoothMore => "Smooth More",
            Self::Brightness => "Brightness",
            Self::Color => "Color",
            Self::Contrast => "Contrast",
            Self::Sharpness => "Sharpness",
        }
    }
}

/// A validated, ready-to-run operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationSpec {
    pub kind: OperationKind,
    pub factor: f32,
}

impl OperationSpec {
    /// Build a spec from the control panel's raw inputs. Finite factors
    /// outside [0, 2] are clamped; non-finite factors are rejected. Filters
    /// ignore the factor entirely.
    pub fn new(kind: OperationKind, factor: Option<f32>) -> Result<Self> {
        let factor = match factor {
            None => FACTOR_IDENTITY,
            Some(f) if !f.is_finite() => return Err(Error::InvalidParameter(f)),
            Some(f) => f.clamp(FACTOR_MIN, FACTOR_MAX),
        };
        Ok(Self { kind, factor })
    }

    /// Parse id + factor in one step.
    pub fn from_id(id: &str, factor: Option<f32>) -> Result<Self> {
        Self::new(OperationKind::parse(id)?, factor)
    }
}

/// Apply an operation to a rectangular region (a crop in box mode, the whole
/// image in lasso mode). Pure: the input is untouched.
pub fn apply(region: &RgbaImage, spec: &OperationSpec) -> RgbaImage {
    use OperationKind::*;
    match spec.kind {
        Blur => filters::convolve(region, &filters::BLUR),
        Contour => filters::convolve(region, &filters::CONTOUR),
        Detail => filters::convolve(region, &filters::DETAIL),
        EdgeEnhance => filters::convolve(region, &filters::EDGE_ENHANCE),
        EdgeEnhanceMore => filters::convolve(region, &filters::EDGE_ENHANCE_MORE),
        Emboss => filters::convolve(region, &filters::EMBOSS),
        FindEdges => filters::convolve(region, &filters::FIND_EDGES),
        Sharpen => filters::convolve(region, &filters::SHARPEN),
        Smooth => filters::convolve(region, &filters::SMOOTH),
        SmoothMore => filters::convolve(region, &filters::SMOOTH_MORE),
        Brightness => enhance::brightness(region, spec.factor),
        Color => enhance::color(region, spec.factor),
        Contrast => enhance::contrast(region, spec.factor),
        Sharpness => enhance::sharpness(region, spec.factor),
    }
}
