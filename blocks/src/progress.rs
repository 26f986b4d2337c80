use abstutil::Timer;

/// Reports how far along a long loop is. Passed in explicitly, so quiet runs and tests can swap
/// in something else.
pub trait Progress {
    fn begin(&mut self, label: &str, total: usize);
    /// Called exactly once per item, whether or not the item succeeded
    fn increment(&mut self);
    /// Surfaces a problem with one item, without stopping the loop
    fn interrupt(&mut self, warning: &str);
}

impl Progress for Timer {
    fn begin(&mut self, label: &str, total: usize) {
        if total > 0 {
            self.start_iter(label, total);
        }
    }

    fn increment(&mut self) {
        self.next();
    }

    // Every warning is repeated in the summary
    fn interrupt(&mut self, warning: &str) {
        debug!("{warning}");
    }
}

/// Discards everything
pub struct Quiet;

impl Progress for Quiet {
    fn begin(&mut self, _: &str, _: usize) {}
    fn increment(&mut self) {}
    fn interrupt(&mut self, _: &str) {}
}
