use std::sync::atomic::{AtomicBool, Ordering};

/// Open/closed state of the widget panel. Closed unless asked otherwise.
///
/// Independent of the conversation: toggling never touches messages and
/// never cancels an in-flight question.
#[derive(Debug)]
pub struct VisibilityController {
    open: AtomicBool,
}

impl VisibilityController {
    #[must_use]
    pub const fn new(open: bool) -> Self {
        Self {
            open: AtomicBool::new(open),
        }
    }

    /// Flip the panel and return the new state.
    pub fn toggle(&self) -> bool {
        !self.open.fetch_xor(true, Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

impl Default for VisibilityController {
    fn default() -> Self {
        Self::new(false)
    }
}
