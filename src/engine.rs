// ============================================================================
// ENGINE — one viewer event in, one viewer image out
// ============================================================================
//
// The engine is the boundary the UI glue talks to. Each call is a single
// logical request: an upload replaces the session's image wholesale, a
// run-operation maps the selection, rasterizes, composites and commits. Both
// return the encoded image the viewer should display next (plus the pixel
// dimensions it needs to interpret the next selection event).
//
// `run_operation` is synchronous; `spawn_operation` moves the compute onto
// the rayon pool and reports back over an mpsc channel, the same
// spawn-and-poll shape a single-threaded front end uses to stay responsive.
// Either way the session's ticket sequencing guarantees a stale result never
// overwrites a newer one.

use std::sync::Arc;
use std::sync::mpsc;

use uuid::Uuid;

use crate::codec;
use crate::compositor;
use crate::coords::{self, SelectionEvent};
use crate::error::Result;
use crate::ops::OperationSpec;
use crate::session::SessionStore;

/// What the viewer displays: an encoded PNG data URI plus the raster
/// dimensions the coordinate mapper needs on the next round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerImage {
    pub width: u32,
    pub height: u32,
    pub data_uri: String,
}

/// Completion message for an off-thread operation.
pub struct OperationOutcome {
    pub session: Uuid,
    pub seq: u64,
    /// `false` when the result arrived after a newer request and was dropped.
    pub committed: bool,
    pub result: Result<ViewerImage>,
}

pub struct Engine {
    sessions: SessionStore,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            sessions: SessionStore::new(),
        }
    }

    pub fn create_session(&self) -> Uuid {
        let id = self.sessions.create();
        log::info!("session {id} created");
        id
    }

    pub fn close_session(&self, id: Uuid) {
        self.sessions.remove(id);
    }

    /// Encode the session's current image for display.
    pub fn current_view(&self, id: Uuid) -> Result<ViewerImage> {
        encode_view(&self.sessions.snapshot(id)?)
    }

    /// Handle an upload event: raw bytes + filename.
    ///
    /// A filename equal to the session's current one is treated as the same
    /// file and leaves the image as-is (filename-equality heuristic, kept
    /// from the original behavior). A decode failure leaves the previous
    /// image displayed and surfaces `UnsupportedFormat`.
    pub fn upload(&self, id: Uuid, bytes: &[u8], filename: &str) -> Result<ViewerImage> {
        if self.sessions.is_same_upload(id, filename)? {
            log::info!("session {id}: '{filename}' re-uploaded, keeping current image");
            return self.current_view(id);
        }

        let image = codec::decode(bytes)?;
        let (w, h) = image.dimensions();
        log::info!("session {id}: uploaded '{filename}' ({w}x{h})");
        self.sessions.replace_image(id, image, filename.to_string())?;
        self.current_view(id)
    }

    /// Handle an upload delivered as a browser `data:` URI.
    pub fn upload_data_uri(&self, id: Uuid, uri: &str, filename: &str) -> Result<ViewerImage> {
        if self.sessions.is_same_upload(id, filename)? {
            return self.current_view(id);
        }
        let image = codec::decode_data_uri(uri)?;
        self.sessions.replace_image(id, image, filename.to_string())?;
        self.current_view(id)
    }

    /// Handle a run-operation event synchronously.
    ///
    /// * `op_id == None` — no operation chosen in the control panel: no-op,
    ///   the current image is returned unchanged.
    /// * `selection == None` — no selection drawn yet: the operation applies
    ///   to the full image.
    ///
    /// Errors (unknown op, bad factor) reject the request and leave the
    /// image untouched.
    pub fn run_operation(
        &self,
        id: Uuid,
        selection: Option<&SelectionEvent>,
        op_id: Option<&str>,
        factor: Option<f32>,
    ) -> Result<ViewerImage> {
        let Some(op_id) = op_id else {
            return self.current_view(id);
        };
        let spec = OperationSpec::from_id(op_id, factor)?;

        let ticket = self.sessions.begin_request(id)?;
        let original = self.sessions.snapshot(id)?;
        let (w, h) = original.dimensions();

        let geometry = coords::map_selection(selection, w, h);
        let result = compositor::apply_to_region(&original, &geometry, &spec);

        if self.sessions.commit(ticket, result.clone())? {
            log::info!("session {id}: applied {} (seq {})", spec.kind.label(), ticket.seq);
            encode_view(&result)
        } else {
            // A newer request landed while this one computed.
            log::warn!("session {id}: discarded stale result (seq {})", ticket.seq);
            self.current_view(id)
        }
    }

    /// Run an operation off the calling thread. Validation (unknown op, bad
    /// factor, unknown session) still happens synchronously so the caller
    /// can surface it immediately; only the pixel work is deferred. The
    /// outcome — committed or discarded as stale — arrives on `done`.
    pub fn spawn_operation(
        self: &Arc<Self>,
        id: Uuid,
        selection: Option<SelectionEvent>,
        op_id: &str,
        factor: Option<f32>,
        done: mpsc::Sender<OperationOutcome>,
    ) -> Result<()> {
        let spec = OperationSpec::from_id(op_id, factor)?;
        let ticket = self.sessions.begin_request(id)?;
        let original = self.sessions.snapshot(id)?;
        let engine = Arc::clone(self);

        rayon::spawn(move || {
            let (w, h) = original.dimensions();
            let geometry = coords::map_selection(selection.as_ref(), w, h);
            let result = compositor::apply_to_region(&original, &geometry, &spec);

            let committed = match engine.sessions.commit(ticket, result.clone()) {
                Ok(c) => c,
                Err(_) => false, // session closed while computing
            };
            let outcome = OperationOutcome {
                session: id,
                seq: ticket.seq,
                committed,
                result: encode_view(&result),
            };
            let _ = done.send(outcome);
        });
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_view(image: &image::RgbaImage) -> Result<ViewerImage> {
    Ok(ViewerImage {
        width: image.width(),
        height: image.height(),
        data_uri: codec::to_data_uri(image)?,
    })
}
