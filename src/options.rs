/// Construction settings shared by every container in the crate.
///
/// ```
/// use redwood::{RedwoodOptions, RedwoodSet};
///
/// let options = RedwoodOptions::default().with_capacity(64).with_max_size(2);
/// let mut set = RedwoodSet::with_options(options);
///
/// set.insert(1).unwrap();
/// set.insert(2).unwrap();
/// assert!(set.insert(3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedwoodOptions {
    pub(crate) capacity: usize,
    pub(crate) max_size: Option<usize>,
}

impl RedwoodOptions {
    /// Number of node slots allocated up front.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Caps the number of elements below the addressable limit.
    #[must_use]
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }
}
