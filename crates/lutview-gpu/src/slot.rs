//! Single-value mailbox between the host and the draw loop.

/// Holds at most one value waiting to be consumed.
///
/// A newer value replaces an older one that was never taken; there is no
/// queue. The draw loop drains the slot with [`take`](Self::take).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSlot<T> {
    value: Option<T>,
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> PendingSlot<T> {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the one it superseded.
    pub fn put(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    /// Removes and returns the pending value.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }

    /// The pending value, if any.
    pub fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.value.is_some()
    }

    /// Stores `value` only if the slot is empty. Returns whether it was stored.
    pub fn put_if_empty(&mut self, value: T) -> bool {
        if self.value.is_some() {
            return false;
        }
        self.value = Some(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_overwrites_older() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.put(1), None);
        assert_eq!(slot.put(2), Some(1));
        assert_eq!(slot.peek(), Some(&2));
        assert_eq!(slot.take(), Some(2));
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn put_if_empty_keeps_existing() {
        let mut slot = PendingSlot::new();
        assert!(slot.put_if_empty("a"));
        assert!(!slot.put_if_empty("b"));
        assert_eq!(slot.take(), Some("a"));
    }
}
