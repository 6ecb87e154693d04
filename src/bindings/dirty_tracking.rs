// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
This module implements "dirty tracking" for a single texture.

The tracker approximates everything modified since the last upload with one
bounding rectangle.  This trades some upload area for O(1) bookkeeping per update.

The states are

```text
  Clean ──mark_dirty──▶ Partial(rect) ──mark_fully_dirty──▶ Full
    ▲                     │  ▲                               │
    │                     └──┘ (rect grows by union)         │
    └──────────────────────── clear ─────────────────────────┘
```

There is no way back from `Full` or `Partial` except [DirtyRegionTracker::clear].
*/

use crate::bindings::coordinates::Rect;

/// A dirty rect covering at least this fraction (numerator/denominator) of the
/// logical area is uploaded as a whole.
const FULL_UPLOAD_NUMERATOR: u64 = 3;
const FULL_UPLOAD_DENOMINATOR: u64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    Clean,
    /// Bounding box of every rect marked since the last clear.
    Partial(Rect),
    /// The whole buffer must be uploaded; any rect is irrelevant.
    Full,
}

/// What to upload before the next draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPlan {
    Nothing,
    Partial(Rect),
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyRegionTracker {
    state: DirtyState,
}

impl DirtyRegionTracker {
    /// Creates a tracker, fully dirty when `dirty` is set.
    pub fn new(dirty: bool) -> Self {
        DirtyRegionTracker {
            state: if dirty {
                DirtyState::Full
            } else {
                DirtyState::Clean
            },
        }
    }

    pub fn state(&self) -> DirtyState {
        self.state
    }

    /// Adds `rect` to the dirty region.  Empty rects are ignored.
    pub fn mark_dirty(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.state = match self.state {
            DirtyState::Full => DirtyState::Full,
            DirtyState::Clean => DirtyState::Partial(rect),
            DirtyState::Partial(existing) => DirtyState::Partial(existing.union(rect)),
        };
    }

    pub fn mark_fully_dirty(&mut self) {
        self.state = DirtyState::Full;
    }

    pub fn clear(&mut self) {
        self.state = DirtyState::Clean;
    }

    pub fn is_dirty(&self) -> bool {
        self.state != DirtyState::Clean
    }

    pub fn is_fully_dirty(&self) -> bool {
        self.state == DirtyState::Full
    }

    /// The partial dirty rect, if the tracker is partially dirty.
    pub fn dirty_rect(&self) -> Option<Rect> {
        match self.state {
            DirtyState::Partial(rect) => Some(rect),
            _ => None,
        }
    }

    /**
    Decides between no upload, a partial upload and a full upload for a buffer
    whose logical size is `width` x `height`.

    The dirty rect is clipped first, since the logical size may have shrunk
    after it was marked.
    */
    pub fn plan(&self, width: u16, height: u16) -> UploadPlan {
        match self.state {
            DirtyState::Clean => UploadPlan::Nothing,
            DirtyState::Full => UploadPlan::Full,
            DirtyState::Partial(rect) => {
                let rect = rect.clamp_to(width, height);
                if rect.is_empty() {
                    UploadPlan::Nothing
                } else if rect.area() * FULL_UPLOAD_DENOMINATOR
                    >= Rect::full(width, height).area() * FULL_UPLOAD_NUMERATOR
                {
                    UploadPlan::Full
                } else {
                    UploadPlan::Partial(rect)
                }
            }
        }
    }
}

impl Default for DirtyRegionTracker {
    fn default() -> Self {
        DirtyRegionTracker::new(true)
    }
}
