use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Stable reference to a node inside an [`Arena`](crate::Arena).
///
/// The wrapped number is the node id: unique for the lifetime of the process
/// and never reused, so a handle can't alias a newer node after release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub(crate) usize);

impl Handle {
    /// Returns the raw numeric identifier for debugging or external maps.
    pub fn as_raw(&self) -> usize {
        self.0
    }

    pub(crate) fn fresh() -> Self {
        Handle(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_increase() {
        let a = Handle::fresh();
        let b = Handle::fresh();
        assert!(b.as_raw() > a.as_raw());
        assert_ne!(a, b);
    }
}
