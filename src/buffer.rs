//! Output buffer allocation.
//!
//! The decoder never allocates PCM output on its own. The host hands it an
//! [`OutputAllocator`] and the decoder asks it for exactly one buffer per
//! processed input buffer.

use bytes::BytesMut;
use tracing::trace;

/// Source of output buffers.
pub trait OutputAllocator {
    /// Return a zero-filled buffer of exactly `size` bytes, or `None` if the
    /// request cannot be satisfied.
    fn allocate_output(&mut self, size: usize) -> Option<BytesMut>;
}

impl<F> OutputAllocator for F
where
    F: FnMut(usize) -> Option<BytesMut>,
{
    fn allocate_output(&mut self, size: usize) -> Option<BytesMut> {
        self(size)
    }
}

/// Allocates output on the heap, optionally refusing oversized requests.
#[derive(Debug, Clone, Default)]
pub struct HeapAllocator {
    max_bytes: Option<usize>,
}

impl HeapAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any request larger than `max_bytes`
    #[must_use]
    pub fn with_limit(max_bytes: usize) -> Self {
        Self {
            max_bytes: Some(max_bytes),
        }
    }

    #[must_use]
    pub fn max_bytes(&self) -> Option<usize> {
        self.max_bytes
    }
}

impl OutputAllocator for HeapAllocator {
    fn allocate_output(&mut self, size: usize) -> Option<BytesMut> {
        if let Some(max) = self.max_bytes {
            if size > max {
                trace!(size, max, "refusing output allocation");
                return None;
            }
        }
        Some(BytesMut::zeroed(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_allocator_exact_size() {
        let mut alloc = HeapAllocator::new();
        let buf = alloc.allocate_output(640).unwrap();
        assert_eq!(buf.len(), 640);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_heap_allocator_limit() {
        let mut alloc = HeapAllocator::with_limit(320);
        assert!(alloc.allocate_output(320).is_some());
        assert!(alloc.allocate_output(640).is_none());
        assert_eq!(alloc.max_bytes(), Some(320));
    }

    #[test]
    fn test_closure_allocator() {
        let mut requests = Vec::new();
        let mut alloc = |size: usize| -> Option<BytesMut> {
            requests.push(size);
            None
        };
        assert!(alloc.allocate_output(960).is_none());
        assert_eq!(requests, vec![960]);
    }
}
