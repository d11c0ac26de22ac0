/// Coalesces redraw requests into at most one render per frame.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedrawScheduler {
    pending: bool,
    coalesced: u32,
}

impl RedrawScheduler {
    /// Create a new scheduler with no pending redraw.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a redraw before the next frame.
    pub fn request(&mut self) {
        if self.pending {
            self.coalesced += 1;
        }
        self.pending = true;
    }

    /// Check if a redraw is pending.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending redraw.
    ///
    /// Returns whether a redraw was pending.
    pub fn take(&mut self) -> bool {
        if self.coalesced > 0 {
            log::trace!("Coalesced {} redraw requests", self.coalesced);
        }

        self.coalesced = 0;
        std::mem::take(&mut self.pending)
    }
}
