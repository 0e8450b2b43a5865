//! Change notifications delivered by the host.
//!
//! ## Learning: Events as Values
//!
//! The host does not call back into the controller with closures. It hands
//! over a small `Copy` value describing what changed, and the controller
//! decides what to do with it. No references to manage, no lifetimes.

/// What changed since the previous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewUpdate {
    /// The document text changed
    pub doc_changed: bool,
    /// The visible region moved or resized
    pub viewport_changed: bool,
}

impl ViewUpdate {
    /// An update that changes nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// A document edit.
    pub fn doc_changed() -> Self {
        Self {
            doc_changed: true,
            viewport_changed: false,
        }
    }

    /// A scroll or resize.
    pub fn viewport_changed() -> Self {
        Self {
            doc_changed: false,
            viewport_changed: true,
        }
    }

    /// Whether this update makes the current decorations stale.
    pub fn requires_rebuild(&self) -> bool {
        self.doc_changed || self.viewport_changed
    }
}
