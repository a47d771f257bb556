//! C-compatible buffer metrics.

use growbuf_arena::BufferMetrics;

/// Fixed-layout copy of a buffer's metrics plus its current shape.
///
/// All fields are `u64` for ABI portability (not `usize`).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrowbufMetrics {
    /// Number of populated slots.
    pub len: u64,
    /// Number of allocated slots.
    pub capacity: u64,
    /// Number of growth (doubling) steps performed.
    pub grow_events: u64,
    /// Number of shrink (halving) steps that reduced capacity.
    pub shrink_events: u64,
    /// Elements destroyed by the buffer itself.
    pub destroyed_elements: u64,
    /// Largest capacity reached, in slots.
    pub peak_capacity: u64,
    /// Current size of the backing storage, in bytes.
    pub memory_bytes: u64,
}

// 7×u64 = 56 bytes, align 8.
const _: () = assert!(std::mem::size_of::<GrowbufMetrics>() == 56);
const _: () = assert!(std::mem::align_of::<GrowbufMetrics>() == 8);

impl GrowbufMetrics {
    pub(crate) fn from_rust(m: &BufferMetrics, len: usize, capacity: usize) -> Self {
        Self {
            len: len as u64,
            capacity: capacity as u64,
            grow_events: m.grow_events,
            shrink_events: m.shrink_events,
            destroyed_elements: m.destroyed_elements,
            peak_capacity: m.peak_capacity as u64,
            memory_bytes: m.memory_bytes as u64,
        }
    }
}
