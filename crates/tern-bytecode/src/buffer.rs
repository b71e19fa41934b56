//! Growable storage with a shared capacity policy.
//!
//! The emission buffer, the VM operand stack, and the VM call-frame stack
//! are all backed by [`GrowBuf`]: owned, resizable storage that grows by 50%
//! (floored at the requested minimum) up to a hard ceiling. Growth past the
//! ceiling is an explicit [`CapacityError`], never an allocation blowup.

/// Initial capacity for a fresh buffer.
const INITIAL_CAPACITY: usize = 10;

/// The capacity ceiling of a [`GrowBuf`] was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("capacity limit of {limit} elements exceeded")]
pub struct CapacityError {
    /// The configured element ceiling.
    pub limit: usize,
}

/// Compute the next capacity: current plus 50%, floored at `min` and capped
/// at `limit`.
pub fn new_capacity(capacity: usize, min: usize, limit: usize) -> usize {
    let grown = capacity + (capacity >> 1);
    grown.max(min).min(limit)
}

/// A growable buffer with a hard element ceiling.
#[derive(Debug, Clone)]
pub struct GrowBuf<T> {
    items: Vec<T>,
    limit: usize,
}

impl<T> GrowBuf<T> {
    /// Create an empty buffer that may hold at most `limit` elements.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY.min(limit)),
            limit,
        }
    }

    /// Append an element.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the buffer already holds `limit`
    /// elements.
    pub fn push(&mut self, item: T) -> Result<(), CapacityError> {
        self.reserve_for(self.items.len() + 1)?;
        self.items.push(item);
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// The last element, if any.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Mutable access to the last element, if any.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable element at `index`, if in bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Drop every element, keeping the allocation and the ceiling.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of elements currently held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The configured element ceiling.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// View the contents as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Consume the buffer, returning its contents trimmed to length.
    pub fn into_boxed_slice(self) -> Box<[T]> {
        self.items.into_boxed_slice()
    }

    /// Ensure capacity for `needed` elements, applying the growth policy.
    fn reserve_for(&mut self, needed: usize) -> Result<(), CapacityError> {
        if needed > self.limit {
            return Err(CapacityError { limit: self.limit });
        }
        let capacity = self.items.capacity();
        if needed > capacity {
            let target = new_capacity(capacity, needed, self.limit);
            self.items.reserve_exact(target - self.items.len());
        }
        Ok(())
    }
}

impl<T: Copy> GrowBuf<T> {
    /// Append every element of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the combined length would exceed the
    /// ceiling; the buffer is left unchanged in that case.
    pub fn extend_from_slice(&mut self, other: &[T]) -> Result<(), CapacityError> {
        self.reserve_for(self.items.len() + other.len())?;
        self.items.extend_from_slice(other);
        Ok(())
    }
}
