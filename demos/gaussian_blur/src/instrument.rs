use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// A global allocator that forwards to the system allocator and counts the
/// bytes currently allocated on the heap.
pub struct TrackingAllocator {
    allocated: AtomicUsize,
    peak: AtomicUsize,
}

impl TrackingAllocator {
    pub const fn new() -> Self {
        Self {
            allocated: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bytes currently allocated.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Highest value of [`Self::allocated`] since the last [`Self::reset_peak`].
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    pub fn reset_peak(&self) {
        self.peak.store(self.allocated(), Ordering::Relaxed);
    }

    fn grow(&self, bytes: usize) {
        let now = self.allocated.fetch_add(bytes, Ordering::Relaxed) + bytes;
        self.peak.fetch_max(now, Ordering::Relaxed);
    }

    fn shrink(&self, bytes: usize) {
        self.allocated.fetch_sub(bytes, Ordering::Relaxed);
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            self.grow(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            self.grow(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        self.shrink(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            if new_size > layout.size() {
                self.grow(new_size - layout.size());
            } else {
                self.shrink(layout.size() - new_size);
            }
        }
        new_ptr
    }
}

/// Wall clock time and heap usage of a measured call.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    pub elapsed: Duration,
    /// Heap bytes still allocated after the call minus the ones before it.
    pub heap_delta: isize,
    /// Highest heap growth reached during the call.
    pub heap_peak: usize,
}

/// Run `f` and measure it with `allocator`.
pub fn measure<T>(allocator: &TrackingAllocator, f: impl FnOnce() -> T) -> (T, RunStats) {
    let heap_before = allocator.allocated();
    allocator.reset_peak();
    let start = Instant::now();

    let out = f();

    let elapsed = start.elapsed();
    let heap_after = allocator.allocated();
    let stats = RunStats {
        elapsed,
        heap_delta: heap_after as isize - heap_before as isize,
        heap_peak: allocator.peak().saturating_sub(heap_before),
    };

    (out, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracking_allocator_counts_bytes() {
        let tracker = TrackingAllocator::new();
        let layout = Layout::from_size_align(1024, 8).unwrap();

        unsafe {
            let ptr = tracker.alloc(layout);
            assert!(!ptr.is_null());
            assert_eq!(tracker.allocated(), 1024);

            let ptr = tracker.realloc(ptr, layout, 4096);
            assert!(!ptr.is_null());
            assert_eq!(tracker.allocated(), 4096);
            assert_eq!(tracker.peak(), 4096);

            tracker.dealloc(ptr, Layout::from_size_align(4096, 8).unwrap());
        }

        assert_eq!(tracker.allocated(), 0);
        assert_eq!(tracker.peak(), 4096);

        tracker.reset_peak();
        assert_eq!(tracker.peak(), 0);
    }

    #[test]
    fn measure_reports_retained_heap() {
        let tracker = TrackingAllocator::new();
        let layout = Layout::from_size_align(256, 8).unwrap();

        let (ptr, stats) = measure(&tracker, || unsafe { tracker.alloc(layout) });
        assert_eq!(stats.heap_delta, 256);
        assert_eq!(stats.heap_peak, 256);

        unsafe { tracker.dealloc(ptr, layout) };
        assert_eq!(tracker.allocated(), 0);
    }
}
