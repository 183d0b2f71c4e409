//! Counter-based completion barrier.

/// Fires exactly once, when the number of resolved sources equals `expected`.
///
/// `expected` is the number of *distinct* sources, so a `src` listed twice
/// counts once and cannot hold the barrier open. Equality is exact: an
/// observation above `expected` does not fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionBarrier {
    expected: usize,
    fired: bool,
}

impl CompletionBarrier {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            fired: false,
        }
    }

    /// Report the current resolved count. Returns `true` on the one call
    /// that completes the barrier and `false` on every other call.
    pub fn observe(&mut self, resolved: usize) -> bool {
        if self.fired || resolved != self.expected {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
