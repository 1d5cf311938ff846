// ============================================================================
// SESSIONS — per-user image state and request sequencing
// ============================================================================
//
// Every browser session owns exactly one working image; nothing is shared
// between sessions, so a keyed map needs no cross-session coordination.
// Operations may finish out of order when they run off-thread, so each run
// takes a ticket stamped with a monotonically increasing sequence number and
// a result only commits while its ticket is still the newest issued — the
// last user action always wins and stale in-flight results are discarded.

use std::collections::HashMap;
use std::sync::Mutex;

use image::RgbaImage;
use uuid::Uuid;

use crate::codec;
use crate::error::{Error, Result};

/// One user's working state.
struct Session {
    image: RgbaImage,
    /// Filename of the most recent upload. Uploading the same name again is
    /// treated as "unchanged" — a filename-equality heuristic kept from the
    /// original behavior (see DESIGN.md).
    filename: Option<String>,
    /// Sequence number of the most recently issued operation ticket.
    latest_seq: u64,
}

/// Permission slip for committing one operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub session: Uuid,
    pub seq: u64,
}

/// Keyed session map. All methods lock internally; callers never hold locks
/// across an operation's compute phase.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session seeded with the placeholder canvas.
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Session {
            image: codec::blank_canvas(codec::DEFAULT_CANVAS_WIDTH, codec::DEFAULT_CANVAS_HEIGHT),
            filename: None,
            latest_seq: 0,
        };
        self.sessions.lock().expect("session map poisoned").insert(id, session);
        id
    }

    pub fn remove(&self, id: Uuid) {
        self.sessions.lock().expect("session map poisoned").remove(&id);
    }

    /// Snapshot the current image (cheap relative to filtering; keeps the
    /// lock out of the compute phase).
    pub fn snapshot(&self, id: Uuid) -> Result<RgbaImage> {
        let map = self.sessions.lock().expect("session map poisoned");
        map.get(&id)
            .map(|s| s.image.clone())
            .ok_or(Error::UnknownSession(id))
    }

    pub fn dimensions(&self, id: Uuid) -> Result<(u32, u32)> {
        let map = self.sessions.lock().expect("session map poisoned");
        map.get(&id)
            .map(|s| s.image.dimensions())
            .ok_or(Error::UnknownSession(id))
    }

    /// True when `filename` matches the session's current upload name.
    pub fn is_same_upload(&self, id: Uuid, filename: &str) -> Result<bool> {
        let map = self.sessions.lock().expect("session map poisoned");
        map.get(&id)
            .map(|s| s.filename.as_deref() == Some(filename))
            .ok_or(Error::UnknownSession(id))
    }

    /// Replace the session's image wholesale (upload path). Resets nothing
    /// else: in-flight operation results against the old image will still be
    /// sequenced out by their tickets.
    pub fn replace_image(&self, id: Uuid, image: RgbaImage, filename: String) -> Result<()> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        let session = map.get_mut(&id).ok_or(Error::UnknownSession(id))?;
        session.image = image;
        session.filename = Some(filename);
        // An upload supersedes any operation still in flight.
        session.latest_seq += 1;
        Ok(())
    }

    /// Issue a ticket for a new operation, invalidating all earlier ones.
    pub fn begin_request(&self, id: Uuid) -> Result<RequestTicket> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        let session = map.get_mut(&id).ok_or(Error::UnknownSession(id))?;
        session.latest_seq += 1;
        Ok(RequestTicket {
            session: id,
            seq: session.latest_seq,
        })
    }

    /// Commit an operation result. Returns `false` (and drops the image)
    /// when a newer ticket has been issued since — last write wins.
    pub fn commit(&self, ticket: RequestTicket, image: RgbaImage) -> Result<bool> {
        let mut map = self.sessions.lock().expect("session map poisoned");
        let session = map
            .get_mut(&ticket.session)
            .ok_or(Error::UnknownSession(ticket.session))?;
        if ticket.seq != session.latest_seq {
            return Ok(false);
        }
        session.image = image;
        Ok(true)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
