// ============================================================================
// ERROR TAXONOMY — every fallible boundary of the engine returns one of these
// ============================================================================
//
// Degenerate selections are deliberately NOT represented here: a zero-area
// box falls back to the full-image box and a degenerate lasso rasterizes to
// an empty mask, both of which are no-ops rather than failures.

use uuid::Uuid;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The uploaded bytes could not be decoded as a supported raster format.
    /// Fatal to the request; the session keeps its previous image.
    #[error("unsupported or corrupt image data: {0}")]
    UnsupportedFormat(#[source] image::ImageError),

    /// PNG encoding for viewer transport failed.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The control panel sent an operation id the registry does not know.
    /// The request is rejected and the image left unchanged.
    #[error("unknown operation '{0}'")]
    UnsupportedOperation(String),

    /// Enhancement factor was not a finite number. Finite values outside
    /// [0, 2] are clamped instead (the UI slider already bounds them).
    #[error("enhancement factor must be a finite number, got {0}")]
    InvalidParameter(f32),

    /// No session exists under the given key.
    #[error("unknown session {0}")]
    UnknownSession(Uuid),

    /// A data URI upload was malformed (bad prefix or invalid base64).
    #[error("malformed image data URI: {0}")]
    BadDataUri(String),
}
